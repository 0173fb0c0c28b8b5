//! Field validation run before each mutation.

use crate::error::CoreError;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;
pub const MAX_NOTE_CONTENT_LENGTH: usize = 2_000;

/// Title must be non-blank and at most [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "Title must not be empty".to_string(),
        ));
    }
    check_length("Title", title, MAX_TITLE_LENGTH)
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    check_length("Description", description, MAX_DESCRIPTION_LENGTH)
}

/// Note content must be non-blank and at most [`MAX_NOTE_CONTENT_LENGTH`] characters.
pub fn validate_note_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "Content must not be empty".to_string(),
        ));
    }
    check_length("Content", content, MAX_NOTE_CONTENT_LENGTH)
}

// Limits count characters, not bytes.
fn check_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::InvalidInput(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn blank_title_rejected() {
        assert_matches!(validate_title("   "), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn title_at_limit_accepted() {
        let title = "a".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn title_over_limit_rejected() {
        let title = "a".repeat(MAX_TITLE_LENGTH + 1);
        assert_matches!(validate_title(&title), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn multibyte_characters_count_once() {
        let title = "건".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn empty_description_is_fine() {
        assert!(validate_description("").is_ok());
    }

    #[test]
    fn description_over_limit_rejected() {
        let text = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert_matches!(validate_description(&text), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn note_content_limits() {
        assert_matches!(validate_note_content(""), Err(CoreError::InvalidInput(_)));
        assert!(validate_note_content(&"x".repeat(MAX_NOTE_CONTENT_LENGTH)).is_ok());
        assert_matches!(
            validate_note_content(&"x".repeat(MAX_NOTE_CONTENT_LENGTH + 1)),
            Err(CoreError::InvalidInput(_))
        );
    }
}
