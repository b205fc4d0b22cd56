use thiserror::Error;
use tracing::{info, warn};

use super::cache::AssetCache;
use super::fetch::{AssetFetcher, FetchError};
use super::keys::{validate_asset_key, AssetKeyError};
use super::queue::{AssetQueue, ImageRequest};
use super::texture::{Texture, TextureStore};

#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error(transparent)]
    InvalidKey(#[from] AssetKeyError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to decode image '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    Cache,
    Network,
}

#[derive(Debug, Default)]
pub struct AssetLoadReport {
    pub textures: TextureStore,
    pub failures: Vec<(String, AssetLoadError)>,
}

/// Resolves every queued image through the cache, falling back to `fetcher`.
/// Failures are logged and collected; the scene still starts without them.
pub fn load_queue(
    queue: &AssetQueue,
    cache: &mut AssetCache,
    fetcher: &dyn AssetFetcher,
) -> AssetLoadReport {
    let mut report = AssetLoadReport::default();
    for request in queue.requests() {
        match load_image(request, cache, fetcher) {
            Ok((texture, source)) => {
                info!(
                    key = request.key.as_str(),
                    source = ?source,
                    width = texture.width(),
                    height = texture.height(),
                    "asset_loaded"
                );
                report.textures.insert(request.key.clone(), texture);
            }
            Err(error) => {
                warn!(
                    key = request.key.as_str(),
                    url = request.url.as_str(),
                    error = %error,
                    "asset_load_failed_using_placeholder"
                );
                report.failures.push((request.key.clone(), error));
            }
        }
    }
    report
}

fn load_image(
    request: &ImageRequest,
    cache: &mut AssetCache,
    fetcher: &dyn AssetFetcher,
) -> Result<(Texture, AssetSource), AssetLoadError> {
    validate_asset_key(&request.key)?;

    if let Some(bytes) = cache.lookup(&request.key, &request.url) {
        match Texture::decode(&bytes) {
            Ok(texture) => return Ok((texture, AssetSource::Cache)),
            Err(error) => warn!(
                key = request.key.as_str(),
                error = %error,
                "asset_cache_entry_undecodable_refetching"
            ),
        }
    }

    let bytes = fetcher.fetch(&request.url)?;
    let texture = Texture::decode(&bytes).map_err(|source| AssetLoadError::Decode {
        key: request.key.clone(),
        source,
    })?;
    if let Err(error) = cache.store(&request.key, &request.url, &bytes) {
        warn!(key = request.key.as_str(), error = %error, "asset_cache_write_failed");
    }
    Ok((texture, AssetSource::Network))
}
