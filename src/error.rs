use thiserror::Error;

/// Failures while building or applying rewrite rules
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(
        "rule \"{rule}\" still matched after {passes} passes over the whole text; \
         is its replacement re-creating its own pattern?"
    )]
    NonConvergent { rule: String, passes: usize },
    #[error("invalid rule pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// Failures while attributing speakers across two caption tracks
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("speaker track is not usable: {reason}")]
    InvalidSource { reason: String },
}

/// Failures while reading a caption track
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("invalid timestamp {value:?} on line {line}")]
    InvalidTimestamp { value: String, line: usize },
    #[error("invalid caption file: {message}")]
    InvalidFormat { message: String },
}

/// Outcome of the interactive file-name check
#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("declined to continue with {target}")]
    Declined { target: String },
    #[error("failed to read confirmation: {0}")]
    Io(#[from] std::io::Error),
}

impl RewriteError {
    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            source: Box::new(source),
        }
    }
}

impl MergeError {
    pub(crate) fn invalid_source(reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            reason: reason.into(),
        }
    }
}

impl CaptionError {
    pub(crate) fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
