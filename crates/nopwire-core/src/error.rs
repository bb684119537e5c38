//! Closed error enumeration and the `Status<T>` result carrier.
//!
//! Mirrors `vitte-core::CoreError`'s shape (hand-rolled `Display`, `std::error::Error`
//! gated behind the `std` feature) rather than reaching for a derive macro here: this
//! crate is the `no_std`-friendly foundation, so `thiserror` stays an optional,
//! currently-unused dependency kept for parity with the teacher crate it's modeled on
//! (see DESIGN.md).

use core::fmt;

#[cfg(feature = "std")]
use std::borrow::Cow;

#[cfg(not(feature = "std"))]
use alloc::borrow::Cow;

/// Closed enumeration of failure kinds, exactly as specified by the wire
/// format's error taxonomy. Stable API identities; values are not
/// wire-visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ErrorKind {
    /// No error; used only for default/empty construction, never surfaced.
    None,
    /// The leading tag does not match any tag accepted for the target type.
    UnexpectedEncodingType,
    /// A handle's wire type tag does not match the decoder's policy.
    UnexpectedHandleType,
    /// A `Variant` active index is outside `-1..N-1` for the declared type.
    UnexpectedVariantType,
    /// A container's decoded length fails a static-arity or divisibility check.
    InvalidContainerLength,
    /// A `Structure`'s decoded member count does not equal the declared count.
    InvalidMemberCount,
    /// A `String`'s byte length is not a multiple of the code-unit width.
    InvalidStringLength,
    /// A table's on-wire namespace hash does not match the declared hash.
    InvalidTableHash,
    /// A handle reference could not be resolved by the Reader.
    InvalidHandleReference,
    /// A resolved handle value was itself invalid.
    InvalidHandleValue,
    /// Reserved for dependent RPC-style layers; not produced by the codec.
    InvalidInterfaceMethod,
    /// Two table entries in the same read declared the same id.
    DuplicateTableEntry,
    /// The Reader ran out of bytes before a read completed.
    ReadLimitReached,
    /// The Writer refused to accept more bytes.
    WriteLimitReached,
    /// The underlying byte stream reported a transport failure.
    StreamError,
    /// Reserved for dependent RPC-style layers; not produced by the codec.
    ProtocolError,
    /// An I/O adapter reported a failure (e.g. a `std::io::Error`).
    IOError,
    /// An unrecoverable failure from the host environment.
    SystemError,
    /// Reserved for diagnostic builds; not produced in normal operation.
    DebugError,
}

impl ErrorKind {
    /// A canonical human-readable string per kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "no error",
            Self::UnexpectedEncodingType => "unexpected encoding type",
            Self::UnexpectedHandleType => "unexpected handle type",
            Self::UnexpectedVariantType => "unexpected variant type",
            Self::InvalidContainerLength => "invalid container length",
            Self::InvalidMemberCount => "invalid member count",
            Self::InvalidStringLength => "invalid string length",
            Self::InvalidTableHash => "invalid table hash",
            Self::InvalidHandleReference => "invalid handle reference",
            Self::InvalidHandleValue => "invalid handle value",
            Self::InvalidInterfaceMethod => "invalid interface method",
            Self::DuplicateTableEntry => "duplicate table entry",
            Self::ReadLimitReached => "read limit reached",
            Self::WriteLimitReached => "write limit reached",
            Self::StreamError => "stream error",
            Self::ProtocolError => "protocol error",
            Self::IOError => "I/O error",
            Self::SystemError => "system error",
            Self::DebugError => "debug error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `Status` error: a closed `ErrorKind` plus an optional contextual
/// message. The codec performs no local recovery — every failure reaches
/// the immediate caller unchanged.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    context: Option<Cow<'static, str>>,
}

impl Error {
    /// Builds an error with no additional context.
    pub const fn new(kind: ErrorKind) -> Self {
        Self { kind, context: None }
    }

    /// Builds an error carrying a contextual message (e.g. the offset a
    /// truncated read failed at).
    pub fn with_context(kind: ErrorKind, context: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, context: Some(context.into()) }
    }

    /// The closed error kind.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{}: {ctx}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::with_context(ErrorKind::IOError, e.to_string())
    }
}

/// The uniform result carrier used throughout the codec: either the value
/// or a closed [`ErrorKind`] wrapped in [`Error`].
pub type Status<T> = Result<T, Error>;
