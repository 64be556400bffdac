//! Errors raised while reading G-code listings

use thiserror::Error;

/// Listing read error
#[derive(Error, Debug)]
pub enum ListingError {
    /// The listing could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be turned into a motion command
    #[error("Parse error at line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}

impl ListingError {
    /// Create a parse error for a one-based line number
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for listing operations
pub type ListingResult<T> = std::result::Result<T, ListingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ListingError::parse(12, "G04 without P word");
        assert_eq!(err.to_string(), "Parse error at line 12: G04 without P word");
    }
}
