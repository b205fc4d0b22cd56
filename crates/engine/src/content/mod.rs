mod atomic_io;
mod cache;
mod fetch;
mod hashing;
mod keys;
mod loader;
mod manifest;
mod queue;
mod texture;

pub use cache::{AssetCache, CacheError};
pub use fetch::{AssetFetcher, FetchError, HttpFetcher, DEFAULT_FETCH_TIMEOUT, MAX_ASSET_BYTES};
pub use keys::AssetKeyError;
pub use loader::{load_queue, AssetLoadError, AssetLoadReport, AssetSource};
pub use queue::{AssetQueue, ImageRequest};
pub use texture::{Texture, TextureStore, MISSING_TEXTURE_SIZE};
