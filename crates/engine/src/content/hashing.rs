use sha2::{Digest, Sha256};

/// Length of the url digest prefix embedded in cache file names.
const URL_TAG_HEX_LEN: usize = 16;

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    to_hex_lower(&Sha256::digest(bytes))
}

/// Cache file name for `key` fetched from `url`; a changed url yields a new file.
pub(crate) fn cache_file_name(key: &str, url: &str) -> String {
    let digest = sha256_hex(url.as_bytes());
    format!("{key}-{}.bin", &digest[..URL_TAG_HEX_LEN])
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input_matches_known_digest() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn cache_file_name_tracks_url() {
        let a = cache_file_name("ground", "https://example.test/a.png");
        let b = cache_file_name("ground", "https://example.test/b.png");
        assert_ne!(a, b);
        assert!(a.starts_with("ground-"));
        assert!(a.ends_with(".bin"));
        assert_eq!(a.len(), "ground-".len() + 16 + ".bin".len());
    }
}
