use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetKeyError {
    #[error("asset key must not be empty")]
    Empty,
    #[error("asset key must not start with '-' or '_'")]
    LeadingSeparator,
    #[error("asset key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Asset keys double as cache file stems, so they stay filesystem-neutral.
pub(crate) fn validate_asset_key(key: &str) -> Result<(), AssetKeyError> {
    let Some(first) = key.chars().next() else {
        return Err(AssetKeyError::Empty);
    };
    if matches!(first, '-' | '_') {
        return Err(AssetKeyError::LeadingSeparator);
    }
    match key
        .chars()
        .find(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-')))
    {
        Some(character) => Err(AssetKeyError::InvalidCharacter { character }),
        None => Ok(()),
    }
}
