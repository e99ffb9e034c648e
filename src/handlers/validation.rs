use thiserror::Error;

pub const MAX_TEXT_CHARS: usize = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Text is required")]
    EmptyText,
    #[error("Text is too long ({len} characters, maximum is {max})")]
    TooLong { len: usize, max: usize },
}

/// Checks submitted text before any remote call is made.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_TEXT_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lengths_within_bounds() {
        assert_eq!(validate_text("a"), Ok(()));
        assert_eq!(validate_text("I love my job"), Ok(()));
        assert_eq!(validate_text(&"a".repeat(MAX_TEXT_CHARS)), Ok(()));
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert_eq!(validate_text(""), Err(ValidationError::EmptyText));
        assert_eq!(validate_text(" \n\t "), Err(ValidationError::EmptyText));
    }

    #[test]
    fn rejects_over_limit() {
        assert_eq!(
            validate_text(&"a".repeat(MAX_TEXT_CHARS + 1)),
            Err(ValidationError::TooLong {
                len: MAX_TEXT_CHARS + 1,
                max: MAX_TEXT_CHARS
            })
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 10000 two-byte characters is still within the limit
        assert_eq!(validate_text(&"é".repeat(MAX_TEXT_CHARS)), Ok(()));
    }
}
