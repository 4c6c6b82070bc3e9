//! Errors raised by the lookup engines.

use thiserror::Error;

/// Errors returned when parsing prefixes and addresses, or when configuring a trie.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A dotted-quad address or CIDR prefix could not be parsed, or its prefix length is outside
    /// `0..=32`.
    #[error("invalid address format: {input:?}")]
    InvalidAddressFormat {
        /// The rejected input.
        input: String,
    },
    /// A multibit trie was configured with a stride outside `1..=32`.
    #[error("invalid stride {0}: must be between 1 and 32")]
    InvalidStride(u8),
}

impl Error {
    pub(crate) fn invalid_format(input: &str) -> Self {
        Self::InvalidAddressFormat {
            input: input.to_string(),
        }
    }
}
