use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::atomic_io::write_bytes_atomic;
use super::hashing::{cache_file_name, sha256_hex};
use super::manifest::{
    read_manifest, CacheEntry, CacheManifest, ManifestReadState, CACHE_MANIFEST_FILE,
};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to write asset cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode asset cache manifest: {0}")]
    EncodeManifest(#[source] serde_json::Error),
}

/// On-disk copy of fetched asset bytes, keyed by asset key and url.
#[derive(Debug)]
pub struct AssetCache {
    dir: PathBuf,
    manifest: CacheManifest,
}

impl AssetCache {
    /// Opens the cache rooted at `dir`. A missing or unreadable manifest
    /// starts an empty cache.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let manifest_path = dir.join(CACHE_MANIFEST_FILE);
        let manifest = match read_manifest(&manifest_path) {
            Ok(ManifestReadState::Present(manifest)) => manifest,
            Ok(ManifestReadState::Missing) => CacheManifest::default(),
            Ok(ManifestReadState::Unreadable(reason)) => {
                warn!(
                    path = %manifest_path.display(),
                    reason = reason.as_str(),
                    "asset_cache_manifest_unreadable_starting_empty"
                );
                CacheManifest::default()
            }
            Err(error) => {
                warn!(
                    path = %manifest_path.display(),
                    error = %error,
                    "asset_cache_manifest_read_failed_starting_empty"
                );
                CacheManifest::default()
            }
        };
        Self { dir, manifest }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_count(&self) -> usize {
        self.manifest.entries.len()
    }

    /// Returns cached bytes when the entry matches `url` and its digest.
    pub fn lookup(&self, key: &str, url: &str) -> Option<Vec<u8>> {
        let entry = self.manifest.entries.get(key)?;
        if entry.url != url {
            debug!(key, cached_url = entry.url.as_str(), url, "asset_cache_url_changed");
            return None;
        }
        let path = self.dir.join(&entry.file_name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(key, path = %path.display(), error = %error, "asset_cache_file_unreadable");
                return None;
            }
        };
        if bytes.len() as u64 != entry.byte_len || sha256_hex(&bytes) != entry.sha256_hex {
            warn!(key, path = %path.display(), "asset_cache_digest_mismatch");
            return None;
        }
        Some(bytes)
    }

    pub fn store(&mut self, key: &str, url: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let file_name = cache_file_name(key, url);
        let path = self.dir.join(&file_name);
        write_bytes_atomic(&path, bytes).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;

        let previous = self.manifest.entries.insert(
            key.to_string(),
            CacheEntry {
                url: url.to_string(),
                file_name: file_name.clone(),
                sha256_hex: sha256_hex(bytes),
                byte_len: bytes.len() as u64,
            },
        );
        self.write_manifest()?;

        if let Some(stale) = previous.filter(|entry| entry.file_name != file_name) {
            let _ = fs::remove_file(self.dir.join(stale.file_name));
        }
        Ok(())
    }

    fn write_manifest(&self) -> Result<(), CacheError> {
        let path = self.dir.join(CACHE_MANIFEST_FILE);
        let text =
            serde_json::to_string_pretty(&self.manifest).map_err(CacheError::EncodeManifest)?;
        write_bytes_atomic(&path, text.as_bytes())
            .map_err(|source| CacheError::Write { path, source })
    }
}
