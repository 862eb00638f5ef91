//! # streamcbor
//!
//! An RFC 7049 (CBOR) codec paired with an RFC 6901 (JSON-Pointer) engine
//! that addresses sub-documents *inside* the encoded bytes, without
//! re-decoding them.
//!
//! ## Design principles
//!
//! - **Caller-owned buffers.** Encoders write in place into a `&mut [u8]`
//!   and return the byte count; running out of room is an error, never a
//!   panic.
//! - **Minimal-width integers.** Every encoder path cascades down to the
//!   smallest header width that fits; widths are never widened gratuitously.
//! - **Tags round-trip.** Each enumerated tag (0, 1, 2, 3, 4, 5, 24, 35,
//!   55799) is a distinct [`Value`] variant, so re-encoding a decoded value
//!   reproduces its input.
//! - **Pointer traversal is structural.** [`lookup`] walks the encoded
//!   document in O(size) without materialising values, and [`set`]/[`del`]
//!   are pure splices — the surrounding stream containers carry no counts
//!   to fix up.
//!
//! Decoding accepts any RFC 7049 encoding of a value (canonical-form
//! enforcement is out of scope), with two restrictions: half-precision
//! floats are rejected, and the encoder never produces indefinite-length
//! byte or text strings (it decodes them by concatenating their chunks).
//!
//! ## Feature flags
//!
//! - `simdutf8` *(default)*: SIMD-accelerated UTF-8 validation for text
//!   strings on decode.
//! - `serde`: `Serialize`/`Deserialize` for [`Value`] over the JSON-ish
//!   subset.
//!
//! ## Example
//!
//! ```
//! use streamcbor::{decode, encode, from_json_pointer, get, Value};
//!
//! let doc = Value::Map(vec![(
//!     Value::Text("items".into()),
//!     Value::Array(vec![Value::Unsigned(1), Value::Unsigned(2)]),
//! )]);
//!
//! let mut buf = [0u8; 64];
//! let n = encode(&doc, &mut buf)?;
//!
//! let mut ptr = [0u8; 32];
//! let p = from_json_pointer("/items/1", &mut ptr)?;
//!
//! assert_eq!(get(&buf[..n], &ptr[..p])?, &[0x02]);
//! assert_eq!(decode(&buf[..n])?.0, doc);
//! # Ok::<(), streamcbor::CborError>(())
//! ```
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

mod config;
mod decode;
mod encode;
mod error;
mod pointer;
#[cfg(feature = "serde")]
mod serde_impl;
mod utf8;
mod value;
mod wire;

pub use crate::config::{Config, ContainerEncoding, NumberKind, MAX_KEYS, MAX_POINTER_LEN};
pub use crate::decode::{decode, MAX_DEPTH};
pub use crate::encode::encode;
pub use crate::error::{CborError, ErrorCode};
pub use crate::pointer::{
    del, from_json_pointer, get, items_end, lookup, set, to_json_pointer,
};
pub use crate::value::{BigNum, IndefiniteKind, Regexp, Value};
pub use crate::wire::{hdr, info, major};
