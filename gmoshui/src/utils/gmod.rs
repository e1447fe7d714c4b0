//! Locating the Garry's Mod install

use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Usual `garrysmod` folder locations, `~` meaning the home directory
pub const GMOD_DIR_CANDIDATES: &[&str] = &[
    "C:/Program Files/Steam/SteamApps/common/GarrysMod/garrysmod",
    "C:/Program Files (x86)/Steam/SteamApps/common/GarrysMod/garrysmod",
    "D:/Program Files/Steam/SteamApps/common/GarrysMod/garrysmod",
    "D:/Program Files (x86)/Steam/SteamApps/common/GarrysMod/garrysmod",
    "~/.steam/steam/steamapps/common/GarrysMod/garrysmod",
    "~/.steam/steam/SteamApps/common/GarrysMod/garrysmod",
    "~/.local/share/Steam/steamapps/common/GarrysMod/garrysmod",
    "~/.local/share/Steam/SteamApps/common/GarrysMod/garrysmod",
    "~/Library/Application Support/Steam/SteamApps/common/GarrysMod/garrysmod",
];

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };

    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

/// First existing directory among `candidates`
pub fn find_existing_dir<'a, I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .map(expand_home)
        .find(|path| path.is_dir())
}

/// Resolve the `garrysmod` folder: an explicit path wins, otherwise the
/// first known install location that exists
pub fn resolve_gmod_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let found = find_existing_dir(GMOD_DIR_CANDIDATES.iter().copied());
    match &found {
        Some(path) => log::info!("Found Garry's Mod at {}", path.display()),
        None => log::debug!("No Garry's Mod install in the usual locations"),
    }
    found
}
