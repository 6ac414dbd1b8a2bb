//! Registration Error Types
//!
//! Recognition itself never fails: a symbol with no transition is a silent
//! non-match, not an error. The only errors the engine reports are usage
//! errors at registration time.

use thiserror::Error;

/// Result type for registration operations
pub type Result<T> = std::result::Result<T, RegisterError>;

/// Pattern registration error types
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// Sequence path with no symbols
    ///
    /// The trie model requires at least one symbol to produce a terminal
    /// node distinct from the root, so a zero-length path is rejected
    /// rather than silently ignored.
    #[error("sequence path must contain at least one symbol")]
    EmptySequence,

    /// Chord definition with no symbols
    #[error("chord must contain at least one symbol")]
    EmptyChord,
}
