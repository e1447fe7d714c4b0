//! HTTP transport seam
//!
//! Everything that touches the network goes through [`Transport`], so the
//! metadata client and the download pipeline can run against a scripted
//! implementation in tests.

use crate::{Error, Result, WorkshopConfig};
use reqwest::blocking::{Client, Response};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Blocking HTTP operations used by the Workshop client
pub trait Transport {
    /// POST form-encoded `fields` to `url` and return the response body
    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<String>;

    /// GET `url` and stream the body into a new file at `destination`
    ///
    /// Returns the number of bytes written.
    fn download(&self, url: &str, destination: &Path) -> Result<u64>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<String> {
        (**self).post_form(url, fields)
    }

    fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        (**self).download(url, destination)
    }
}

/// [`Transport`] backed by a blocking reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client with the configured timeout and User-Agent
    pub fn new(config: &WorkshopConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::network(&config.api_url, e))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<String> {
        log::debug!("POST {url} ({} fields)", fields.len());

        let response = self
            .client
            .post(url)
            .form(fields)
            .send()
            .map_err(|e| Error::network(url, e))?;
        let response = check_status(url, response)?;

        response.text().map_err(|e| Error::network(url, e))
    }

    fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        log::debug!("GET {url} -> {}", destination.display());

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::network(url, e))?;
        let mut response = check_status(url, response)?;

        let mut writer = BufWriter::new(File::create(destination)?);
        let written = response
            .copy_to(&mut writer)
            .map_err(|e| Error::network(url, e))?;
        writer.flush()?;

        log::debug!("Downloaded {written} bytes from {url}");
        Ok(written)
    }
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(Error::Status {
        url: url.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}
