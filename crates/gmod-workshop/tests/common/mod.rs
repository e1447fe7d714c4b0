//! Scripted transport and fixtures for pipeline tests

#![allow(dead_code)]

use gmod_workshop::{Error, Result, Transport};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const API_URL: &str = "http://api.example.invalid/details";

/// Transport that replays canned responses and records every call
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<String>>>,
    files: HashMap<String, Vec<u8>>,
    partial: HashMap<String, Vec<u8>>,
    pub posts: RefCell<Vec<Vec<(String, String)>>>,
    pub downloads: RefCell<Vec<(String, PathBuf)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a details response body
    pub fn respond(self, body: &str) -> Self {
        self.responses.borrow_mut().push_back(Ok(body.to_string()));
        self
    }

    /// Queue a failed details request
    pub fn fail(self, error: Error) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    /// Serve `data` for GET requests to `url`
    pub fn serve(mut self, url: &str, data: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), data);
        self
    }

    /// Write `data` for `url`, then drop the connection
    pub fn serve_partial(mut self, url: &str, data: Vec<u8>) -> Self {
        self.partial.insert(url.to_string(), data);
        self
    }
}

impl Transport for ScriptedTransport {
    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<String> {
        self.posts.borrow_mut().push(fields.to_vec());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::network(url, "no scripted response")))
    }

    fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        self.downloads
            .borrow_mut()
            .push((url.to_string(), destination.to_path_buf()));
        if let Some(data) = self.partial.get(url) {
            std::fs::write(destination, data)?;
            return Err(Error::network(url, "connection reset by peer"));
        }
        let data = self.files.get(url).ok_or_else(|| Error::Status {
            url: url.to_string(),
            status: 404,
            reason: "Not Found".to_string(),
        })?;
        std::fs::write(destination, data)?;
        Ok(data.len() as u64)
    }
}

/// URL a fixture item is served from
pub fn file_url(id: u64) -> String {
    format!("http://cdn.example.invalid/ugc/{id}")
}

/// Details JSON for one existing item
pub fn item_json(id: u64, title: &str) -> String {
    format!(
        r#"{{"publishedfileid": "{id}", "result": 1, "title": {title:?},
            "creator": "76561197960287930", "file_url": "{url}",
            "time_created": 1357000000, "time_updated": 1458000000,
            "views": 10, "subscriptions": 2, "favorited": 1, "banned": 0,
            "tags": [{{"tag": "Addon"}}, {{"tag": "Build"}}]}}"#,
        url = file_url(id)
    )
}

/// Details JSON for an item that no longer exists
pub fn missing_json(id: u64) -> String {
    format!(r#"{{"publishedfileid": "{id}", "result": 9}}"#)
}

/// Wrap detail objects in the API envelope
pub fn envelope(details: &[String]) -> String {
    format!(
        r#"{{"response": {{"result": 1, "resultcount": {}, "publishedfiledetails": [{}]}}}}"#,
        details.len(),
        details.join(",")
    )
}

/// LZMA-compress `data` the way the Workshop CDN serves bundles
pub fn lzma_bundle(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    lzma_rs::lzma_compress(&mut Cursor::new(data.to_vec()), &mut out)
        .expect("in-memory compression succeeds");
    out
}
