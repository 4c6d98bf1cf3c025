//! Validation utilities and regex patterns

use crate::SourceConfig;
use darah_common::DatasetKind;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use validator::{ValidationError, ValidationErrors};

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Telegram bot tokens: numeric bot id, a colon, then the secret
pub static BOT_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+:[A-Za-z0-9_-]+$").expect("Invalid bot token regex pattern")
});

/// Telegram chat ids: signed integer or public `@username`
pub static CHAT_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?[0-9]+|@[A-Za-z][A-Za-z0-9_]{4,})$").expect("Invalid chat id regex pattern")
});

/// Validate a hex color
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_REGEX.is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_hex_color"))
    }
}

/// Validate the bot token format. An empty token means "not configured" and passes.
pub fn validate_bot_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() || BOT_TOKEN_REGEX.is_match(token) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_bot_token_format"))
    }
}

/// Validate the chat id format. An empty id means "not configured" and passes.
pub fn validate_chat_id(chat_id: &str) -> Result<(), ValidationError> {
    if chat_id.is_empty() || CHAT_ID_REGEX.is_match(chat_id) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_chat_id_format"))
    }
}

/// Validate an IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<(), ValidationError> {
    if timezone.is_empty() {
        return Err(ValidationError::new("empty_timezone"));
    }

    timezone
        .parse::<chrono_tz::Tz>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_timezone"))
}

/// Validate a log filter: a level name or `target=level` directives
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if darah_common::is_valid_filter(level) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate a log line format name
pub fn validate_log_format(format: &str) -> Result<(), ValidationError> {
    darah_common::LogFormat::from_name(format)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("invalid_log_format"))
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

/// Every dataset kind must be configured exactly once and local file names must not collide
pub fn validate_sources(sources: &[SourceConfig]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let mut kinds = HashSet::new();
    let mut names = HashSet::new();
    for source in sources {
        if !kinds.insert(source.kind) {
            let mut err = ValidationError::new("duplicate_source_kind");
            err.message = Some(format!("dataset '{}' is configured more than once", source.kind).into());
            errors.add("sources", err);
        }
        let name = source.local_file_name();
        if name.is_empty() {
            let mut err = ValidationError::new("empty_source_file_name");
            err.message = Some(format!("cannot derive a file name from '{}'", source.url).into());
            errors.add("sources", err);
        } else if !names.insert(name.clone()) {
            let mut err = ValidationError::new("duplicate_source_file_name");
            err.message = Some(format!("file name '{}' is used by more than one source", name).into());
            errors.add("sources", err);
        }
    }

    for kind in DatasetKind::ALL {
        if !kinds.contains(&kind) {
            let mut err = ValidationError::new("missing_source_kind");
            err.message = Some(format!("no source configured for dataset '{}'", kind).into());
            errors.add("sources", err);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
