//! Application-wide error types using thiserror.

use darah_common::DarahError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Error raised by one of the library stages.
    #[error(transparent)]
    Stage(#[from] DarahError),

    /// A chart could not be delivered; the remaining charts were not sent.
    #[error("Failed to send chart {index} ({file_name}): {source}")]
    Send {
        index: usize,
        file_name: String,
        #[source]
        source: DarahError,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_error_names_chart() {
        let err = BotError::Send {
            index: 2,
            file_name: "Donation Retention Percentage.png".to_string(),
            source: DarahError::telegram_with_code("Bad Request: chat not found", 400),
        };
        let message = err.to_string();
        assert!(message.contains("chart 2"));
        assert!(message.contains("Donation Retention Percentage.png"));
        assert!(message.contains("chat not found"));
    }

    #[test]
    fn test_stage_error_is_transparent() {
        let err: BotError = DarahError::data("missing column 'daily'").into();
        assert_eq!(err.to_string(), DarahError::data("missing column 'daily'").to_string());
    }
}
