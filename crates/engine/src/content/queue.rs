use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub key: String,
    pub url: String,
}

/// Images a scene asks for during preload, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AssetQueue {
    requests: Vec<ImageRequest>,
}

impl AssetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an image. A key that is already queued keeps its first url.
    pub fn image(&mut self, key: impl Into<String>, url: impl Into<String>) -> &mut Self {
        let key = key.into();
        let url = url.into();
        if let Some(existing) = self.requests.iter().find(|request| request.key == key) {
            warn!(
                key = key.as_str(),
                kept_url = existing.url.as_str(),
                ignored_url = url.as_str(),
                "asset_key_already_queued"
            );
            return self;
        }
        self.requests.push(ImageRequest { key, url });
        self
    }

    pub fn requests(&self) -> &[ImageRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
