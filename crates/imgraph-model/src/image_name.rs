//! Uploaded image naming
//!
//! Uploaded file names carry a content-hash suffix, `"<file>-<8 hex digits>"`,
//! so identical names with different content stay distinct on the backend.

/// Length of the `"-" + 8 hex digits` suffix
pub const HASH_SUFFIX_LEN: usize = 9;

const HASH_HEX_LEN: usize = HASH_SUFFIX_LEN - 1;

/// Name an uploaded image after its file name and encoded content
///
/// The suffix is the first 4 bytes of the Blake3 hash of `encoded`, in lowercase hex.
#[must_use]
pub fn hashed_image_name(file_name: &str, encoded: &str) -> String {
    let hash = blake3::hash(encoded.as_bytes());
    format!("{file_name}-{}", hex::encode(&hash.as_bytes()[..HASH_HEX_LEN / 2]))
}

/// Recover the original file name from an uploaded image name
///
/// Names without a hash suffix (for example `"User Edited"` on hand-made
/// edges) are returned unchanged.
#[must_use]
pub fn display_source_name(name: &str) -> &str {
    if !has_hash_suffix(name) {
        return name;
    }
    &name[..name.len() - HASH_SUFFIX_LEN]
}

fn has_hash_suffix(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.len() < HASH_SUFFIX_LEN {
        return false;
    }
    let suffix = &bytes[bytes.len() - HASH_SUFFIX_LEN..];
    suffix[0] == b'-' && suffix[1..].iter().all(u8::is_ascii_hexdigit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_name_has_eight_hex_digits() {
        let name = hashed_image_name("chart.png", "aGVsbG8=");
        assert!(name.starts_with("chart.png-"));
        assert_eq!(name.len(), "chart.png".len() + HASH_SUFFIX_LEN);
        assert!(name[name.len() - 8..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hashed_name_depends_on_content() {
        assert_ne!(
            hashed_image_name("a.png", "AAAA"),
            hashed_image_name("a.png", "BBBB")
        );
        assert_eq!(
            hashed_image_name("a.png", "AAAA"),
            hashed_image_name("a.png", "AAAA")
        );
    }

    #[test]
    fn strips_suffix() {
        assert_eq!(display_source_name("flow.png-0a1b2c3d"), "flow.png");
        let name = hashed_image_name("диаграмма.png", "xyz");
        assert_eq!(display_source_name(&name), "диаграмма.png");
    }

    #[test]
    fn leaves_unsuffixed_names() {
        assert_eq!(display_source_name("User Edited"), "User Edited");
        assert_eq!(display_source_name("short"), "short");
        assert_eq!(display_source_name("flow.png-zzzzzzzz"), "flow.png-zzzzzzzz");
    }
}
