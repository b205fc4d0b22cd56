use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub(crate) const CACHE_MANIFEST_FILE: &str = "manifest.json";
pub(crate) const CACHE_FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct CacheEntry {
    pub url: String,
    pub file_name: String,
    pub sha256_hex: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct CacheManifest {
    pub format_version: u16,
    pub entries: BTreeMap<String, CacheEntry>,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self {
            format_version: CACHE_FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum ManifestReadState {
    Missing,
    Unreadable(String),
    Present(CacheManifest),
}

pub(crate) fn read_manifest(path: &Path) -> io::Result<ManifestReadState> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Ok(ManifestReadState::Missing)
        }
        Err(error) => return Err(error),
    };
    let manifest = match serde_json::from_str::<CacheManifest>(&raw) {
        Ok(manifest) => manifest,
        Err(error) => return Ok(ManifestReadState::Unreadable(error.to_string())),
    };
    if manifest.format_version != CACHE_FORMAT_VERSION {
        return Ok(ManifestReadState::Unreadable(format!(
            "format_version {} != {CACHE_FORMAT_VERSION}",
            manifest.format_version
        )));
    }
    Ok(ManifestReadState::Present(manifest))
}
