//! Object-key rules for uploaded images.
//!
//! Keys have the shape `users/{owner_id}/{uuid}.{ext}`. The owner id is
//! embedded at grant time and checked again at registration, so a caller
//! cannot register an object uploaded under someone else's prefix.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;

/// Content types an upload grant may be issued for.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Regex pattern a registered object key must match in full.
pub const OBJECT_KEY_PATTERN: &str = r"^users/(\d+)/([a-f0-9-]{36}\.(png|jpg|jpeg|gif|webp))$";

static OBJECT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(OBJECT_KEY_PATTERN).expect("valid regex"));

/// Components extracted from a well-formed object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    pub owner_id: DbId,
    /// Last path segment, e.g. `3f0c...e1.png`.
    pub filename: String,
    pub content_type: &'static str,
}

/// File extension for a whitelisted content type (case-insensitive).
pub fn extension_for(content_type: &str) -> Result<&'static str, CoreError> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => Ok("png"),
        "image/jpeg" => Ok("jpg"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        other => Err(CoreError::InvalidInput(format!(
            "Unsupported content type '{other}'. Must be one of: {}",
            ALLOWED_CONTENT_TYPES.join(", ")
        ))),
    }
}

/// Content type stored for a key's extension.
pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Build a fresh key under `owner_id`'s prefix for the given content type.
pub fn generate_object_key(owner_id: DbId, content_type: &str) -> Result<String, CoreError> {
    let ext = extension_for(content_type)?;
    Ok(format!("users/{owner_id}/{}.{ext}", Uuid::new_v4()))
}

/// Validate a client-supplied key and extract its owner id and filename.
pub fn parse_object_key(key: &str) -> Result<ParsedKey, CoreError> {
    let invalid = || CoreError::InvalidInput(format!("Malformed object key '{key}'"));

    let caps = OBJECT_KEY_RE.captures(key).ok_or_else(invalid)?;
    let owner_id = caps[1].parse::<DbId>().map_err(|_| invalid())?;
    let content_type = content_type_for_extension(&caps[3]).ok_or_else(invalid)?;

    Ok(ParsedKey {
        owner_id,
        filename: caps[2].to_string(),
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const UUID: &str = "0b6f5a3e-2c1d-4e8f-9a7b-1c2d3e4f5a6b";

    #[test]
    fn extension_mapping_is_case_insensitive() {
        assert_eq!(extension_for("image/PNG").unwrap(), "png");
        assert_eq!(extension_for("IMAGE/JPEG").unwrap(), "jpg");
        assert_eq!(extension_for("image/webp").unwrap(), "webp");
    }

    #[test]
    fn pdf_is_rejected() {
        assert_matches!(
            extension_for("application/pdf"),
            Err(CoreError::InvalidInput(_))
        );
        assert_matches!(
            generate_object_key(1, "application/pdf"),
            Err(CoreError::InvalidInput(_))
        );
    }

    #[test]
    fn generated_key_parses_back_to_owner() {
        let key = generate_object_key(42, "image/gif").unwrap();
        assert!(key.starts_with("users/42/"));
        assert!(key.ends_with(".gif"));

        let parsed = parse_object_key(&key).unwrap();
        assert_eq!(parsed.owner_id, 42);
        assert_eq!(parsed.content_type, "image/gif");
    }

    #[test]
    fn generated_keys_are_unique() {
        let a = generate_object_key(1, "image/png").unwrap();
        let b = generate_object_key(1, "image/png").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_extracts_filename_and_infers_jpeg() {
        let parsed = parse_object_key(&format!("users/7/{UUID}.jpeg")).unwrap();
        assert_eq!(parsed.owner_id, 7);
        assert_eq!(parsed.filename, format!("{UUID}.jpeg"));
        assert_eq!(parsed.content_type, "image/jpeg");
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for key in [
            format!("users/abc/{UUID}.png"),
            format!("users/7/{UUID}.pdf"),
            format!("other/7/{UUID}.png"),
            format!("users/7/{UUID}.png/extra"),
            "users/7/not-a-uuid.png".to_string(),
            format!("users/7/{}.png", UUID.to_uppercase()),
            format!("users/99999999999999999999/{UUID}.png"),
        ] {
            assert_matches!(parse_object_key(&key), Err(CoreError::InvalidInput(_)), "{key}");
        }
    }
}
