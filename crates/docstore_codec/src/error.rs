//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding, decoding or path parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a document.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode input.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },

    /// NaN values are forbidden in the binary encoding.
    #[error("NaN values are forbidden")]
    NaNForbidden,

    /// Indefinite-length items are forbidden.
    #[error("indefinite-length items are forbidden")]
    IndefiniteLengthForbidden,

    /// Invalid UTF-8 string.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Input is structurally invalid.
    #[error("invalid structure: {message}")]
    InvalidStructure {
        /// Description of the structural error.
        message: String,
    },

    /// Unsupported item type in the input.
    #[error("unsupported type: {type_name}")]
    UnsupportedType {
        /// Name of the unsupported type.
        type_name: String,
    },

    /// Integer outside the i64 range.
    #[error("integer overflow")]
    IntegerOverflow,

    /// A length prefix exceeds the decoder's limit.
    #[error("size limit exceeded: claimed {claimed}, max allowed {max_allowed}")]
    SizeLimitExceeded {
        /// Length claimed by the input.
        claimed: u64,
        /// Configured maximum.
        max_allowed: u64,
    },

    /// Nesting deeper than the decoder's limit.
    #[error("nesting depth exceeds {max_depth}")]
    DepthLimitExceeded {
        /// Configured maximum depth.
        max_depth: usize,
    },

    /// An object has the same key twice.
    #[error("duplicate object key '{key}'")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// A textual path could not be parsed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The input text.
        path: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }

    /// Create an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Create an unsupported type error.
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }

    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
