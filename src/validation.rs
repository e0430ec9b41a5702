//! Validation of player-authored text (personal quests, player name) and of the
//! persisted document before it is parsed.

/// Longest accepted personal quest name, in characters.
pub const MAX_QUEST_NAME_CHARS: usize = 80;
/// Longest accepted personal quest description, in bytes.
pub const MAX_DESCRIPTION_BYTES: usize = 1024;
/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_CHARS: usize = 40;
/// Upper bound on the size of the game document file.
pub const MAX_DOCUMENT_BYTES: u64 = 4 * 1024 * 1024;

/// Text validation errors with messages suitable for returning to the client.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} is too long (maximum {max})")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} contains control characters")]
    ControlCharacters { field: &'static str },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("File size exceeds limit ({limit} bytes)")]
    FileSizeExceeded { limit: u64 },
}

/// Validate a single-line name: trimmed, non-empty, bounded, no control characters.
fn validate_name(value: &str, field: &'static str, max_chars: usize) -> Result<String, TextError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty { field });
    }
    if trimmed.chars().count() > max_chars {
        return Err(TextError::TooLong {
            field,
            max: max_chars,
        });
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(TextError::ControlCharacters { field });
    }
    Ok(trimmed.to_string())
}

/// Personal quest names are required and returned trimmed.
pub fn validate_quest_name(name: &str) -> Result<String, TextError> {
    validate_name(name, "Quest name", MAX_QUEST_NAME_CHARS)
}

pub fn validate_player_name(name: &str) -> Result<String, TextError> {
    validate_name(name, "Player name", MAX_PLAYER_NAME_CHARS)
}

/// Descriptions are optional. Control characters other than newline and tab are dropped.
pub fn sanitize_description(description: &str) -> Result<String, TextError> {
    let trimmed = description.trim();
    if trimmed.len() > MAX_DESCRIPTION_BYTES {
        return Err(TextError::TooLong {
            field: "Description",
            max: MAX_DESCRIPTION_BYTES,
        });
    }
    Ok(trimmed
        .chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect())
}

/// Validate file size before reading
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), SecurityError> {
    if size > max_size {
        return Err(SecurityError::FileSizeExceeded { limit: max_size });
    }
    Ok(())
}
