//! Error taxonomy shared by every decoder in this crate.

use std::fmt;

/// A single error type returned by every `decode`/`parse` entry point.
///
/// There is deliberately no `Ok` variant here -- a successful decode is
/// simply `Result::Ok`. The variants below mirror the outcomes a caller
/// feeding this crate truncated or malformed wire captures needs to be able
/// to tell apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The buffer ended before the declared message length was reached.
    /// The caller should read more bytes from its source and retry; no
    /// bytes were consumed.
    #[error("truncated input: need more bytes to continue decoding")]
    Partial,

    /// The wire data is structurally malformed: a length that violates a
    /// per-field invariant, an unknown mandatory enum value, or a nested
    /// length that disagrees with its enclosing length.
    #[error("malformed BGP message: {0}")]
    InvalidMsg(String),

    /// The wire encoding is well-formed but this decoder does not
    /// understand the attribute type or address family in question.
    /// Suppressible via [`crate::DecoderOptions::ignore_not_implemented`].
    #[error("unimplemented attribute or address family: {0}")]
    NotImplemented(String),

    /// The declared total message length fell outside `[19, 4096]`.
    #[error("declared message length {0} is outside the valid range [19, 4096]")]
    MalformedMsg(u16),

    /// An allocation failed. Reserved for API fidelity with the taxonomy
    /// this crate's source format defines; this decoder never calls
    /// `try_reserve` itself (inputs are bounded to 4096 bytes), so in
    /// practice this variant is not produced by safe Rust code paths.
    #[error("allocation failed")]
    OutOfMemory,
}

impl Error {
    /// Shorthand for constructing an [`Error::InvalidMsg`] from a `Display`able reason.
    pub(crate) fn invalid(reason: impl fmt::Display) -> Error {
        Error::InvalidMsg(reason.to_string())
    }

    /// Shorthand for constructing an [`Error::NotImplemented`] from a `Display`able reason.
    pub(crate) fn not_implemented(reason: impl fmt::Display) -> Error {
        Error::NotImplemented(reason.to_string())
    }
}

/// Reinterprets a [`Error::Partial`] raised while decoding a sub-cursor that
/// was itself carved from a fully available parent buffer (via
/// [`crate::ParseCursor::take`]) as a malformed declared length instead of a
/// genuine end-of-input. Used at framing boundaries -- a length-prefixed
/// field, once sliced off, can only run out internally because the length
/// it declared disagreed with what it actually contains.
pub(crate) fn remap_framed(e: Error) -> Error {
    match e {
        Error::Partial => Error::invalid("length-prefixed field ended before its declared length"),
        other => other,
    }
}
