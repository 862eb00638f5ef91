use core::fmt;

use crate::encode::encode_value;
use crate::pointer;
use crate::value::Value;
use crate::wire::Writer;
use crate::{CborError, ErrorCode};

/// How the JSON bridge interprets numbers.
///
/// The policy is carried read-only by the core for its collaborators; the raw
/// CBOR codec itself encodes whatever [`Value`] variant it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// Treat a number as an integer, falling back to 32-bit float.
    SmartNumber32,
    /// Treat a number as an integer, falling back to 64-bit float.
    SmartNumber,
    /// Treat numbers as 64-bit signed integers.
    IntNumber,
    /// Treat numbers as 32-bit floats.
    FloatNumber32,
    /// Treat numbers as 64-bit floats.
    FloatNumber,
    /// Keep numbers as JSON-encoded text.
    JsonNumber,
    /// Collate numbers as N where -1 < N < 1.
    Decimal,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SmartNumber32 => "SmartNumber32",
            Self::SmartNumber => "SmartNumber",
            Self::IntNumber => "IntNumber",
            Self::FloatNumber32 => "FloatNumber32",
            Self::FloatNumber => "FloatNumber",
            Self::JsonNumber => "JsonNumber",
            Self::Decimal => "Decimal",
        };
        f.write_str(s)
    }
}

/// Method used to encode collection types, arrays and maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerEncoding {
    /// Encode the number of items up front (definite length).
    LengthPrefix,
    /// Encode collections as an indefinite sequence of items.
    Stream,
}

impl fmt::Display for ContainerEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LengthPrefix => "LengthPrefix",
            Self::Stream => "Stream",
        };
        f.write_str(s)
    }
}

/// Default maximum number of keys allowed in a map.
pub const MAX_KEYS: usize = 1000;

/// Default maximum size of a JSON-pointer path in bytes.
pub const MAX_POINTER_LEN: usize = 1024;

/// Encode/decode policy. Read-only after construction; distinct
/// configurations can drive concurrent operations on disjoint buffers with
/// no coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    nk: NumberKind,
    ct: ContainerEncoding,
    max_keys: usize,
    max_pointer_len: usize,
}

impl Config {
    /// A configuration with the default settings: `FloatNumber`, `Stream`,
    /// [`MAX_KEYS`], [`MAX_POINTER_LEN`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nk: NumberKind::FloatNumber,
            ct: ContainerEncoding::Stream,
            max_keys: MAX_KEYS,
            max_pointer_len: MAX_POINTER_LEN,
        }
    }

    /// Set the number-interpretation policy.
    #[must_use]
    pub const fn set_number_kind(mut self, nk: NumberKind) -> Self {
        self.nk = nk;
        self
    }

    /// Set the container-encoding policy.
    #[must_use]
    pub const fn set_container_encoding(mut self, ct: ContainerEncoding) -> Self {
        self.ct = ct;
        self
    }

    /// Set the maximum number of keys allowed in a map at encode time.
    #[must_use]
    pub const fn set_max_keys(mut self, n: usize) -> Self {
        self.max_keys = n;
        self
    }

    /// Set the maximum size for a JSON-pointer path.
    #[must_use]
    pub const fn set_max_pointer_len(mut self, n: usize) -> Self {
        self.max_pointer_len = n;
        self
    }

    /// The number-interpretation policy.
    #[must_use]
    pub const fn number_kind(&self) -> NumberKind {
        self.nk
    }

    /// The container-encoding policy.
    #[must_use]
    pub const fn container_encoding(&self) -> ContainerEncoding {
        self.ct
    }

    /// The map-cardinality cap applied at encode time.
    #[must_use]
    pub const fn max_keys(&self) -> usize {
        self.max_keys
    }

    /// The JSON-pointer length cap.
    #[must_use]
    pub const fn max_pointer_len(&self) -> usize {
        self.max_pointer_len
    }

    /// Encode one data-item into `out[0..n]` and return `n`.
    ///
    /// Arrays and maps follow this configuration's container encoding; maps
    /// larger than `max_keys` are rejected.
    ///
    /// # Errors
    ///
    /// Returns `OutputTooSmall` if `out` cannot hold the encoding,
    /// `MaxKeysExceeded` on oversized maps.
    pub fn encode(&self, value: &Value, out: &mut [u8]) -> Result<usize, CborError> {
        let mut w = Writer::new(out);
        encode_value(value, self, &mut w)?;
        Ok(w.position())
    }

    /// Encode a slice of key/value pairs as a single map data-item.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Config::encode`].
    pub fn mapslice_to_cbor(
        &self,
        pairs: &[(Value, Value)],
        out: &mut [u8],
    ) -> Result<usize, CborError> {
        let mut w = Writer::new(out);
        crate::encode::encode_map_pairs(pairs, self, &mut w)?;
        Ok(w.position())
    }

    /// Convert an RFC 6901 text pointer into the CBOR pointer format,
    /// enforcing this configuration's `max_pointer_len`.
    ///
    /// # Errors
    ///
    /// Returns `PointerTooLong` when the text exceeds the cap, plus the
    /// failure modes of [`pointer::from_json_pointer`].
    pub fn from_json_pointer(&self, path: &str, out: &mut [u8]) -> Result<usize, CborError> {
        if path.len() > self.max_pointer_len {
            return Err(CborError::new(ErrorCode::PointerTooLong, self.max_pointer_len));
        }
        pointer::from_json_pointer(path, out)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nk:{}, ct:{}, max_keys:{}, max_pointer_len:{}",
            self.nk, self.ct, self.max_keys, self.max_pointer_len
        )
    }
}
