use crate::{CborError, ErrorCode};

/// Which indefinite-length container an [`Value::IndefiniteStart`] opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndefiniteKind {
    /// Major type 2, chunked byte string.
    Bytes,
    /// Major type 3, chunked text string.
    Text,
    /// Major type 4, streamed array.
    Array,
    /// Major type 5, streamed map.
    Map,
}

/// An arbitrary-precision integer carried by CBOR tag 2 (positive) or
/// tag 3 (negative), as a big-endian magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigNum {
    negative: bool,
    magnitude: Vec<u8>,
}

impl BigNum {
    /// Construct from sign and big-endian magnitude bytes.
    #[inline]
    #[must_use]
    pub const fn new(negative: bool, magnitude: Vec<u8>) -> Self {
        Self {
            negative,
            magnitude,
        }
    }

    /// Sign flag: `true` if this represents a negative bignum (tag 3).
    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Return the big-endian magnitude bytes.
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> &[u8] {
        &self.magnitude
    }
}

/// A compiled regular expression carried by CBOR tag 35.
///
/// The pattern is compiled at construction (and therefore at decode time);
/// two values compare equal when their pattern texts are equal.
#[derive(Debug, Clone)]
pub struct Regexp(regex::Regex);

impl Regexp {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegex` if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, CborError> {
        regex::Regex::new(pattern)
            .map(Self)
            .map_err(|_| CborError::new(ErrorCode::InvalidRegex, 0))
    }

    /// The source pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Borrow the compiled expression.
    #[must_use]
    pub const fn regex(&self) -> &regex::Regex {
        &self.0
    }
}

impl PartialEq for Regexp {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl From<regex::Regex> for Regexp {
    fn from(re: regex::Regex) -> Self {
        Self(re)
    }
}

/// A dynamically-typed CBOR data-item.
///
/// Each enumerated tag keeps its own variant so that re-encoding a decoded
/// value reproduces the input bytes (a plain timestamp could not distinguish
/// a tag-0 text datetime from a tag-1 epoch).
///
/// `IndefiniteStart` and `BreakStop` are streaming primitives for callers
/// that hand-assemble indefinite containers; the decoder never returns them
/// (it fuses indefinite containers into their materialised form).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// CBOR null.
    Null,
    /// CBOR undefined.
    Undefined,
    /// Boolean.
    Bool(bool),
    /// Major type 0.
    Unsigned(u64),
    /// Major type 1, always negative.
    Signed(i64),
    /// Major type 7, single-precision. Never narrowed or widened.
    F32(f32),
    /// Major type 7, double-precision.
    F64(f64),
    /// Major type 2.
    Bytes(Vec<u8>),
    /// Major type 3.
    Text(String),
    /// Major type 4.
    Array(Vec<Value>),
    /// Major type 5. Input order and duplicate keys are preserved.
    Map(Vec<(Value, Value)>),
    /// Major type 7 simple value outside the assigned range.
    Simple(u8),
    /// Header of an indefinite-length container (streaming encode only).
    IndefiniteStart(IndefiniteKind),
    /// Break-stop terminator (streaming encode only).
    BreakStop,
    /// Tag 0, RFC 3339 text datetime (carried verbatim).
    DateTime(String),
    /// Tag 1, whole seconds since the epoch.
    Epoch(i64),
    /// Tag 1, fractional seconds since the epoch.
    EpochMicro(f64),
    /// Tag 2/3, arbitrary-precision integer.
    BigNum(BigNum),
    /// Tag 4, decimal fraction `mantissa * 10^exponent`.
    DecimalFraction {
        /// Power-of-ten exponent.
        exponent: i64,
        /// Decimal mantissa.
        mantissa: i64,
    },
    /// Tag 5, binary float `mantissa * 2^exponent`.
    BigFloat {
        /// Power-of-two exponent.
        exponent: i64,
        /// Binary mantissa.
        mantissa: i64,
    },
    /// Tag 24, an embedded CBOR data-item carried as a byte string.
    EmbeddedCbor(Vec<u8>),
    /// Tag 35, regular expression.
    Regexp(Regexp),
    /// Tag 55799, self-describe prefix wrapping encoded CBOR bytes.
    SelfDescribe(Vec<u8>),
}

impl Value {
    /// Returns `true` for CBOR null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Boolean payload, if this is a boolean.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Unsigned integer payload. Non-negative `Signed` values also qualify.
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Unsigned(u) => Some(*u),
            Self::Signed(i) => {
                if *i >= 0 {
                    Some(*i as u64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Signed integer payload. `Unsigned` values within range also qualify.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Signed(i) => Some(*i),
            Self::Unsigned(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Floating-point payload; 32-bit floats widen losslessly.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(f) => Some(*f),
            Self::F32(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    /// Byte-string payload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Text-string payload.
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Array items.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Map entries in input order.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(pairs) => Some(pairs),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Unsigned(u64::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::Unsigned(u64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Unsigned(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Unsigned(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::Signed(i64::from(v))
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Signed(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Signed(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Signed(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<BigNum> for Value {
    fn from(v: BigNum) -> Self {
        Self::BigNum(v)
    }
}
