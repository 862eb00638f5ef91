use core::fmt;

/// A structured error code identifying the reason a codec or pointer operation failed.
///
/// This enum is intentionally stable and string-free to remain hot-path friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Unexpected end-of-input while decoding.
    UnexpectedEof,
    /// Arithmetic overflow while computing a length/offset.
    LengthOverflow,
    /// Output buffer is too small for the encoded result.
    OutputTooSmall,

    /// Half-precision float encountered on decode.
    DecodeFloat16,
    /// Unsigned 64-bit payload cannot be represented as signed 64-bit.
    DecodeExceedInt64,
    /// Reserved additional-info value (28..30) was used.
    DecodeInfoReserved,
    /// Indefinite-length encoding was used on a major type that forbids it.
    DecodeIndefinite,
    /// Reserved simple-type info value (28..30) on major type 7.
    DecodeSimpleType,
    /// A tag number outside the enumerated set was encountered on decode.
    DecodeTagUnsupported,
    /// Nesting depth limit exceeded while decoding.
    DepthLimitExceeded,
    /// Invalid UTF-8 in a text string.
    Utf8Invalid,
    /// Tag-35 content is not a valid regular expression.
    InvalidRegex,

    /// Encoder received a value kind it cannot serialise.
    UnknownType,
    /// Map cardinality exceeds the configured `max_keys`.
    MaxKeysExceeded,

    /// Text pointer is malformed (missing leading `/` or dangling `~` escape).
    ExpectedJsonPointer,
    /// CBOR pointer bytes do not begin with an indefinite text string.
    ExpectedCborPointer,
    /// Text pointer exceeds the configured maximum length.
    PointerTooLong,
    /// Pointer segment cannot be applied at the current location.
    InvalidPointer,
    /// Array segment is not a decimal index (or points past the final item).
    InvalidArrayOffset,
    /// Map key named by the pointer segment is absent.
    NoKey,
    /// Document contains a shape the structural walker does not support.
    InvalidDocument,
    /// Document bytes are malformed or truncated during pointer traversal.
    MalformedDocument,
}

/// A codec error with a stable code and the byte offset where it was detected.
///
/// Offsets refer to the input buffer of the failing operation. All errors are
/// fatal at this layer; the caller is expected to discard any partial output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborError {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset into the input where the error was detected.
    pub offset: usize,
}

impl CborError {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::OutputTooSmall => "output buffer too small",

            ErrorCode::DecodeFloat16 => "cannot decode half-precision float",
            ErrorCode::DecodeExceedInt64 => "value exceeds signed 64-bit range",
            ErrorCode::DecodeInfoReserved => "reserved additional info value",
            ErrorCode::DecodeIndefinite => "indefinite length forbidden for major type",
            ErrorCode::DecodeSimpleType => "reserved simple-type value",
            ErrorCode::DecodeTagUnsupported => "unsupported CBOR tag",
            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::Utf8Invalid => "text must be valid UTF-8",
            ErrorCode::InvalidRegex => "invalid regular expression",

            ErrorCode::UnknownType => "cannot encode value kind",
            ErrorCode::MaxKeysExceeded => "map exceeds configured max keys",

            ErrorCode::ExpectedJsonPointer => "malformed json pointer",
            ErrorCode::ExpectedCborPointer => "expected cbor-encoded pointer",
            ErrorCode::PointerTooLong => "json pointer exceeds configured length",
            ErrorCode::InvalidPointer => "pointer cannot be applied here",
            ErrorCode::InvalidArrayOffset => "invalid array offset in pointer",
            ErrorCode::NoKey => "missing map key",
            ErrorCode::InvalidDocument => "document shape not walkable",
            ErrorCode::MalformedDocument => "malformed document",
        };

        write!(f, "cbor error at {}: {msg}", self.offset)
    }
}

impl std::error::Error for CborError {}
