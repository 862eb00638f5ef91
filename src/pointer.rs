//! RFC 6901 JSON-Pointer support over CBOR-encoded documents.
//!
//! Pointers themselves have a CBOR representation:
//!
//! ```text
//! cbor-pointer :  | text-chunk-start |
//!                     | tag-33 | len | segment-1 |
//!                     | tag-33 | len | segment-2 |
//!                     ...
//!                 | break-stop |
//! ```
//!
//! The lookup engine walks the *encoded* document without materialising
//! values. It only understands the shapes the stream encoder produces:
//! integers, definite text, indefinite arrays and maps, simples, floats and
//! tag-33 wrapped keys. Documents built with length-prefixed containers are
//! not walkable; that is a restriction of the pointer engine, not of the
//! codec.

use crate::encode::{encode_break_stop, encode_tag, encode_text_raw, encode_text_start};
use crate::wire::{
    decode_length, hdr, info, len_to_usize, major, Writer, BRKSTP, FLT32, FLT64,
    INDEFINITE_LENGTH, INFO24, INFO27, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, TAG_JSON_STRING,
    TYPE0, TYPE1, TYPE3, TYPE4, TYPE5, TYPE6, TYPE7,
};
use crate::{CborError, ErrorCode};

// Tag 33 always takes the two-byte form `d8 21`.
const TAG_HDR: u8 = hdr(TYPE6, INFO24);
const TAG_BYTE: u8 = TAG_JSON_STRING as u8;

const MAX_WALK_DEPTH: usize = 256;

fn byte_at(buf: &[u8], pos: usize) -> Result<u8, CborError> {
    buf.get(pos)
        .copied()
        .ok_or_else(|| CborError::new(ErrorCode::MalformedDocument, pos))
}

// Length decode in walker context: truncation is a malformed document,
// anything else (reserved info, indefinite) is an unwalkable shape.
fn walk_length(buf: &[u8], pos: usize) -> Result<(usize, usize), CborError> {
    let (len, n) = decode_length(buf, pos).map_err(|e| {
        let code = match e.code {
            ErrorCode::UnexpectedEof => ErrorCode::MalformedDocument,
            _ => ErrorCode::InvalidDocument,
        };
        CborError::new(code, e.offset)
    })?;
    Ok((len_to_usize(len, pos)?, n))
}

/// Convert an RFC 6901 text pointer into its CBOR representation, writing
/// into `out[0..n]` and returning `n`.
///
/// `~1` unescapes to `/` and `~0` to `~` inside segments. A trailing `/`
/// produces a final empty segment. The empty pointer encodes as exactly the
/// indefinite-text header followed by break-stop.
///
/// # Errors
///
/// Returns `ExpectedJsonPointer` when a non-empty pointer does not start
/// with `/` or when a `~` escape is dangling, and `OutputTooSmall` when
/// `out` cannot hold the encoding.
pub fn from_json_pointer(path: &str, out: &mut [u8]) -> Result<usize, CborError> {
    let p = path.as_bytes();
    if !p.is_empty() && p[0] != b'/' {
        return Err(CborError::new(ErrorCode::ExpectedJsonPointer, 0));
    }

    let mut w = Writer::new(out);
    encode_text_start(&mut w)?;

    let mut part: Vec<u8> = Vec::with_capacity(16);
    let mut i = 0;
    while i < p.len() {
        match p[i] {
            b'~' => match p.get(i + 1) {
                Some(b'1') => {
                    part.push(b'/');
                    i += 2;
                }
                Some(b'0') => {
                    part.push(b'~');
                    i += 2;
                }
                _ => return Err(CborError::new(ErrorCode::ExpectedJsonPointer, i)),
            },
            b'/' => {
                if !part.is_empty() {
                    encode_tag(TAG_JSON_STRING, &mut w)?;
                    encode_text_raw(&part, &mut w)?;
                    part.clear();
                }
                i += 1;
            }
            c => {
                part.push(c);
                i += 1;
            }
        }
    }
    if !part.is_empty() || p.last() == Some(&b'/') {
        encode_tag(TAG_JSON_STRING, &mut w)?;
        encode_text_raw(&part, &mut w)?;
    }

    encode_break_stop(&mut w)?;
    Ok(w.position())
}

/// Convert a CBOR-encoded pointer back into RFC 6901 text, writing into
/// `out[0..n]` and returning `n`.
///
/// # Errors
///
/// Returns `ExpectedCborPointer` when `bin` does not start with the
/// indefinite-text header, `InvalidPointer` on junk between segments and
/// `OutputTooSmall` when `out` cannot hold the text.
pub fn to_json_pointer(bin: &[u8], out: &mut [u8]) -> Result<usize, CborError> {
    if bin.first() != Some(&hdr(TYPE3, INDEFINITE_LENGTH)) {
        return Err(CborError::new(ErrorCode::ExpectedCborPointer, 0));
    }

    let mut w = Writer::new(out);
    let mut i = 1;
    loop {
        let b = byte_at(bin, i)?;
        if b == BRKSTP {
            break;
        }
        if b != TAG_HDR || byte_at(bin, i + 1)? != TAG_BYTE {
            return Err(CborError::new(ErrorCode::InvalidPointer, i));
        }
        i += 2;
        w.write_u8(b'/')?;
        let (ln, j) = walk_length(bin, i)?;
        let end = i + j + ln;
        if end > bin.len() {
            return Err(CborError::new(ErrorCode::MalformedDocument, i));
        }
        for &c in &bin[i + j..end] {
            match c {
                b'/' => w.write(b"~1")?,
                b'~' => w.write(b"~0")?,
                _ => w.write_u8(c)?,
            }
        }
        i = end;
    }
    Ok(w.position())
}

/// Return the byte length of the first data-item in `buf`.
///
/// Supports the pointer-walkable subset only; see the module docs.
///
/// # Errors
///
/// Returns `InvalidDocument` for unwalkable shapes and `MalformedDocument`
/// for truncated input.
pub fn items_end(buf: &[u8]) -> Result<usize, CborError> {
    items_end_at(buf, 0)
}

fn items_end_at(buf: &[u8], depth: usize) -> Result<usize, CborError> {
    if depth > MAX_WALK_DEPTH {
        return Err(CborError::new(ErrorCode::DepthLimitExceeded, 0));
    }
    let first = byte_at(buf, 0)?;
    let mjr = major(first);
    let inf = info(first);

    let end = match mjr {
        TYPE0 | TYPE1 => {
            if inf < INFO24 {
                1
            } else if inf <= INFO27 {
                1 + (1usize << (inf - INFO24))
            } else {
                return Err(CborError::new(ErrorCode::InvalidDocument, 0));
            }
        }
        TYPE3 if inf != INDEFINITE_LENGTH => {
            let (ln, j) = walk_length(buf, 0)?;
            j + ln
        }
        TYPE4 if inf == INDEFINITE_LENGTH => {
            let mut n = 1;
            loop {
                if byte_at(buf, n)? == BRKSTP {
                    break n + 1;
                }
                n += items_end_at(&buf[n..], depth + 1)?;
            }
        }
        TYPE5 if inf == INDEFINITE_LENGTH => {
            let mut n = 1;
            loop {
                if byte_at(buf, n)? == BRKSTP {
                    break n + 1;
                }
                n += items_end_at(&buf[n..], depth + 1)?; // key
                n += items_end_at(&buf[n..], depth + 1)?; // value
            }
        }
        TYPE6 => {
            if first != TAG_HDR || byte_at(buf, 1)? != TAG_BYTE {
                return Err(CborError::new(ErrorCode::InvalidDocument, 0));
            }
            if major(byte_at(buf, 2)?) != TYPE3 {
                return Err(CborError::new(ErrorCode::InvalidDocument, 2));
            }
            let (ln, j) = walk_length(buf, 2)?;
            2 + j + ln
        }
        TYPE7 => match inf {
            SIMPLE_FALSE | SIMPLE_TRUE | SIMPLE_NULL => 1,
            FLT32 => 1 + 4,
            FLT64 => 1 + 8,
            _ => return Err(CborError::new(ErrorCode::InvalidDocument, 0)),
        },
        _ => return Err(CborError::new(ErrorCode::InvalidDocument, 0)),
    };

    if end > buf.len() {
        return Err(CborError::new(ErrorCode::MalformedDocument, 0));
    }
    Ok(end)
}

fn parse_index(part: &[u8], off: usize) -> Result<usize, CborError> {
    if part.is_empty() {
        return Err(CborError::new(ErrorCode::InvalidArrayOffset, off));
    }
    let mut v: usize = 0;
    for &c in part {
        if !c.is_ascii_digit() {
            return Err(CborError::new(ErrorCode::InvalidArrayOffset, off));
        }
        v = v
            .checked_mul(10)
            .and_then(|x| x.checked_add(usize::from(c - b'0')))
            .ok_or_else(|| CborError::new(ErrorCode::InvalidArrayOffset, off))?;
    }
    Ok(v)
}

// Does the encoded map key at `key` carry exactly `part` as its text
// payload? Keys are bare definite text, optionally wrapped in tag 33.
fn key_matches(key: &[u8], part: &[u8]) -> Result<bool, CborError> {
    let k = if key.len() >= 2 && key[0] == TAG_HDR && key[1] == TAG_BYTE {
        &key[2..]
    } else {
        key
    };
    let Some(&first) = k.first() else {
        return Ok(false);
    };
    if major(first) != TYPE3 || info(first) == INDEFINITE_LENGTH {
        return Ok(false);
    }
    let (ln, j) = walk_length(k, 0)?;
    let end = j + ln;
    if end > k.len() {
        return Err(CborError::new(ErrorCode::MalformedDocument, 0));
    }
    Ok(&k[j..end] == part)
}

// Resolve one pointer segment inside the window `(n, m)` of `doc` and
// return the located sub-item's absolute byte range.
fn locate(part: &[u8], doc: &[u8], n: usize, m: usize) -> Result<(usize, usize), CborError> {
    let first = byte_at(doc, n)?;

    if first == hdr(TYPE4, INDEFINITE_LENGTH) {
        let mut pos = n + 1;
        if part == b"-" {
            // "-" addresses the slot past the final item: a zero-width
            // window at the break-stop, where `set` splices an append.
            loop {
                if byte_at(doc, pos)? == BRKSTP {
                    return Ok((pos, pos));
                }
                pos += items_end(&doc[pos..])?;
            }
        }
        let index = parse_index(part, n)?;
        for _ in 0..index {
            if byte_at(doc, pos)? == BRKSTP {
                return Err(CborError::new(ErrorCode::InvalidArrayOffset, pos));
            }
            pos += items_end(&doc[pos..])?;
            if pos > m {
                return Err(CborError::new(ErrorCode::MalformedDocument, pos));
            }
        }
        if byte_at(doc, pos)? == BRKSTP {
            return Err(CborError::new(ErrorCode::InvalidArrayOffset, pos));
        }
        let end = pos + items_end(&doc[pos..])?;
        return Ok((pos, end));
    }

    if first == hdr(TYPE5, INDEFINITE_LENGTH) {
        let mut pos = n + 1;
        loop {
            if byte_at(doc, pos)? == BRKSTP {
                return Err(CborError::new(ErrorCode::NoKey, pos));
            }
            let klen = items_end(&doc[pos..])?;
            let vstart = pos + klen;
            let vlen = items_end(&doc[vstart..])?;
            if key_matches(&doc[pos..vstart], part)? {
                return Ok((vstart, vstart + vlen));
            }
            pos = vstart + vlen;
            if pos > m {
                return Err(CborError::new(ErrorCode::MalformedDocument, pos));
            }
        }
    }

    Err(CborError::new(ErrorCode::InvalidPointer, n))
}

/// Locate the byte range of the sub-document addressed by a CBOR-encoded
/// `pointer` inside `doc`.
///
/// Offsets are absolute into `doc`, so nested pointers compose with the
/// splice operations. The empty pointer addresses the whole document.
///
/// # Errors
///
/// Returns `ExpectedCborPointer` for a malformed pointer frame,
/// `InvalidPointer` when a segment is applied to a non-container,
/// `InvalidArrayOffset`/`NoKey` for unresolvable segments and
/// `MalformedDocument`/`InvalidDocument` for unwalkable documents.
pub fn lookup(pointer: &[u8], doc: &[u8]) -> Result<(usize, usize), CborError> {
    if pointer.first() != Some(&hdr(TYPE3, INDEFINITE_LENGTH)) {
        return Err(CborError::new(ErrorCode::ExpectedCborPointer, 0));
    }

    let (mut n, mut m) = (0, doc.len());
    let mut i = 1;
    loop {
        let b = byte_at(pointer, i)?;
        if b == BRKSTP {
            return Ok((n, m));
        }
        if b != TAG_HDR || byte_at(pointer, i + 1)? != TAG_BYTE {
            return Err(CborError::new(ErrorCode::InvalidPointer, i));
        }
        i += 2;
        let (ln, j) = walk_length(pointer, i)?;
        let end = i + j + ln;
        if end > pointer.len() {
            return Err(CborError::new(ErrorCode::MalformedDocument, i));
        }
        let (s, e) = locate(&pointer[i + j..end], doc, n, m)?;
        n = s;
        m = e;
        i = end;
    }
}

/// Return the encoded sub-document addressed by `pointer`.
///
/// # Errors
///
/// Same failure modes as [`lookup`].
pub fn get<'a>(doc: &'a [u8], pointer: &[u8]) -> Result<&'a [u8], CborError> {
    let (n, m) = lookup(pointer, doc)?;
    Ok(&doc[n..m])
}

/// Replace the sub-document addressed by `pointer` with the encoded `item`,
/// splicing `doc[..start] ++ item ++ doc[end..]` into `out` and returning
/// the output length.
///
/// No length fixups are needed: the surrounding containers are indefinite
/// and carry no counts.
///
/// # Errors
///
/// Same failure modes as [`lookup`], plus `OutputTooSmall`.
pub fn set(doc: &[u8], pointer: &[u8], item: &[u8], out: &mut [u8]) -> Result<usize, CborError> {
    let (n, m) = lookup(pointer, doc)?;
    let total = doc.len() - (m - n) + item.len();
    if out.len() < total {
        return Err(CborError::new(ErrorCode::OutputTooSmall, out.len()));
    }
    out[..n].copy_from_slice(&doc[..n]);
    out[n..n + item.len()].copy_from_slice(item);
    out[n + item.len()..total].copy_from_slice(&doc[m..]);
    Ok(total)
}

/// Delete the sub-document addressed by `pointer`, splicing
/// `doc[..start] ++ doc[end..]` into `out` and returning the output length.
///
/// # Errors
///
/// Same failure modes as [`lookup`], plus `OutputTooSmall`.
pub fn del(doc: &[u8], pointer: &[u8], out: &mut [u8]) -> Result<usize, CborError> {
    let (n, m) = lookup(pointer, doc)?;
    let total = doc.len() - (m - n);
    if out.len() < total {
        return Err(CborError::new(ErrorCode::OutputTooSmall, out.len()));
    }
    out[..n].copy_from_slice(&doc[..n]);
    out[n..total].copy_from_slice(&doc[m..]);
    Ok(total)
}
