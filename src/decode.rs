use crate::utf8;
use crate::value::{BigNum, IndefiniteKind, Regexp, Value};
use crate::wire::{
    decode_length, info, len_to_usize, major, read_be_u16, read_be_u32, read_be_u64, read_exact,
    read_u8, BRKSTP, FLT16, FLT32, FLT64, INDEFINITE_LENGTH, INFO24, INFO25, INFO26, INFO27,
    SIMPLE_BYTE,
    SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED, TAG_BIG_FLOAT, TAG_DATE_TIME,
    TAG_DECIMAL_FRACTION, TAG_EMBEDDED_CBOR, TAG_EPOCH, TAG_NEG_BIGNUM, TAG_POS_BIGNUM,
    TAG_REGEXP, TAG_SELF_DESCRIBE, TYPE0, TYPE1, TYPE2, TYPE3, TYPE4, TYPE5, TYPE6, TYPE7,
};
use crate::{CborError, ErrorCode};

/// Maximum container/tag nesting depth accepted on decode.
pub const MAX_DEPTH: usize = 256;

// Cap speculative pre-allocation so a hostile length claim cannot reserve
// memory before the items have actually been seen.
const PREALLOC_LIMIT: usize = 1024;

/// What a dispatch-table slot produced for its header byte.
///
/// Leaf items come back whole; containers and tags come back as their kind
/// plus header width, and the driver decides how to loop.
enum Decoded {
    Item(Value),
    DefiniteArray(usize),
    DefiniteMap(usize),
    Indefinite(IndefiniteKind),
    Tag(u64),
    Break,
}

type DecodeFn = fn(&[u8], usize) -> Result<(Decoded, usize), CborError>;

/// Decode one data-item from the front of `data`.
///
/// Returns the decoded value and the number of bytes consumed. Trailing
/// bytes are left for the caller.
///
/// # Errors
///
/// Returns the decode-error taxonomy of [`ErrorCode`]: reserved info values,
/// forbidden indefinite headers, half-precision floats, out-of-range signed
/// payloads, unsupported tags, invalid UTF-8, truncation, or a break-stop
/// outside an indefinite container.
pub fn decode(data: &[u8]) -> Result<(Value, usize), CborError> {
    decode_at(data, 0, 0)
}

fn decode_at(data: &[u8], pos: usize, depth: usize) -> Result<(Value, usize), CborError> {
    if depth > MAX_DEPTH {
        return Err(CborError::new(ErrorCode::DepthLimitExceeded, pos));
    }
    let first = read_u8(data, pos)?;
    let (decoded, mut n) = DECODERS[first as usize](data, pos)?;
    match decoded {
        Decoded::Item(v) => Ok((v, n)),
        Decoded::Break => Err(CborError::new(ErrorCode::MalformedDocument, pos)),
        Decoded::DefiniteArray(len) => {
            let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
            for _ in 0..len {
                let (item, n1) = decode_at(data, pos + n, depth + 1)?;
                items.push(item);
                n += n1;
            }
            Ok((Value::Array(items), n))
        }
        Decoded::DefiniteMap(len) => {
            let mut pairs = Vec::with_capacity(len.min(PREALLOC_LIMIT));
            for _ in 0..len {
                let (key, n1) = decode_at(data, pos + n, depth + 1)?;
                let (value, n2) = decode_at(data, pos + n + n1, depth + 1)?;
                pairs.push((key, value));
                n += n1 + n2;
            }
            Ok((Value::Map(pairs), n))
        }
        Decoded::Indefinite(kind) => decode_indefinite(data, pos, n, depth, kind),
        Decoded::Tag(tag) => {
            let (content, n1) = decode_at(data, pos + n, depth + 1)?;
            let v = wrap_tag(tag, content, pos)?;
            Ok((v, n + n1))
        }
    }
}

// Consume items until a break-stop at this nesting level. Byte and text
// chunks concatenate (each chunk header must be a definite-length string of
// the same major type); arrays collect items; maps collect (key, value)
// pairs with the break-stop only legal at a pair boundary.
fn decode_indefinite(
    data: &[u8],
    pos: usize,
    mut n: usize,
    depth: usize,
    kind: IndefiniteKind,
) -> Result<(Value, usize), CborError> {
    match kind {
        IndefiniteKind::Bytes => {
            let mut buf = Vec::new();
            loop {
                let b = read_u8(data, pos + n)?;
                if b == BRKSTP {
                    return Ok((Value::Bytes(buf), n + 1));
                }
                if major(b) != TYPE2 || info(b) == INDEFINITE_LENGTH {
                    return Err(CborError::new(ErrorCode::MalformedDocument, pos + n));
                }
                let (chunk, n1) = decode_at(data, pos + n, depth + 1)?;
                match chunk {
                    Value::Bytes(c) => buf.extend_from_slice(&c),
                    _ => return Err(CborError::new(ErrorCode::MalformedDocument, pos + n)),
                }
                n += n1;
            }
        }
        IndefiniteKind::Text => {
            let mut buf = String::new();
            loop {
                let b = read_u8(data, pos + n)?;
                if b == BRKSTP {
                    return Ok((Value::Text(buf), n + 1));
                }
                if major(b) != TYPE3 || info(b) == INDEFINITE_LENGTH {
                    return Err(CborError::new(ErrorCode::MalformedDocument, pos + n));
                }
                let (chunk, n1) = decode_at(data, pos + n, depth + 1)?;
                match chunk {
                    Value::Text(c) => buf.push_str(&c),
                    _ => return Err(CborError::new(ErrorCode::MalformedDocument, pos + n)),
                }
                n += n1;
            }
        }
        IndefiniteKind::Array => {
            let mut items = Vec::new();
            loop {
                if read_u8(data, pos + n)? == BRKSTP {
                    return Ok((Value::Array(items), n + 1));
                }
                let (item, n1) = decode_at(data, pos + n, depth + 1)?;
                items.push(item);
                n += n1;
            }
        }
        IndefiniteKind::Map => {
            let mut pairs = Vec::new();
            loop {
                if read_u8(data, pos + n)? == BRKSTP {
                    return Ok((Value::Map(pairs), n + 1));
                }
                let (key, n1) = decode_at(data, pos + n, depth + 1)?;
                let (value, n2) = decode_at(data, pos + n + n1, depth + 1)?;
                pairs.push((key, value));
                n += n1 + n2;
            }
        }
    }
}

fn int_item(v: &Value, off: usize) -> Result<i64, CborError> {
    match v {
        Value::Unsigned(u) => {
            i64::try_from(*u).map_err(|_| CborError::new(ErrorCode::DecodeExceedInt64, off))
        }
        Value::Signed(i) => Ok(*i),
        _ => Err(CborError::new(ErrorCode::MalformedDocument, off)),
    }
}

fn exponent_pair(content: Value, off: usize) -> Result<(i64, i64), CborError> {
    let Value::Array(items) = content else {
        return Err(CborError::new(ErrorCode::MalformedDocument, off));
    };
    let pair: [Value; 2] = items
        .try_into()
        .map_err(|_| CborError::new(ErrorCode::MalformedDocument, off))?;
    Ok((int_item(&pair[0], off)?, int_item(&pair[1], off)?))
}

fn wrap_tag(tag: u64, content: Value, off: usize) -> Result<Value, CborError> {
    let malformed = CborError::new(ErrorCode::MalformedDocument, off);
    match tag {
        TAG_DATE_TIME => match content {
            Value::Text(s) => Ok(Value::DateTime(s)),
            _ => Err(malformed),
        },
        TAG_EPOCH => match content {
            Value::Unsigned(u) => i64::try_from(u)
                .map(Value::Epoch)
                .map_err(|_| CborError::new(ErrorCode::DecodeExceedInt64, off)),
            Value::Signed(i) => Ok(Value::Epoch(i)),
            Value::F64(f) => Ok(Value::EpochMicro(f)),
            Value::F32(f) => Ok(Value::EpochMicro(f64::from(f))),
            _ => Err(malformed),
        },
        TAG_POS_BIGNUM | TAG_NEG_BIGNUM => match content {
            Value::Bytes(b) => Ok(Value::BigNum(BigNum::new(tag == TAG_NEG_BIGNUM, b))),
            _ => Err(malformed),
        },
        TAG_DECIMAL_FRACTION => {
            let (exponent, mantissa) = exponent_pair(content, off)?;
            Ok(Value::DecimalFraction { exponent, mantissa })
        }
        TAG_BIG_FLOAT => {
            let (exponent, mantissa) = exponent_pair(content, off)?;
            Ok(Value::BigFloat { exponent, mantissa })
        }
        TAG_EMBEDDED_CBOR => match content {
            Value::Bytes(b) => Ok(Value::EmbeddedCbor(b)),
            _ => Err(malformed),
        },
        TAG_REGEXP => match content {
            Value::Text(s) => Regexp::new(&s)
                .map(Value::Regexp)
                .map_err(|e| CborError::new(e.code, off)),
            _ => Err(malformed),
        },
        TAG_SELF_DESCRIBE => match content {
            Value::Bytes(b) => Ok(Value::SelfDescribe(b)),
            _ => Err(malformed),
        },
        _ => Err(CborError::new(ErrorCode::DecodeTagUnsupported, off)),
    }
}

//---- dispatch-table handlers, one per class of header byte

fn err_reserved(_data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    Err(CborError::new(ErrorCode::DecodeInfoReserved, pos))
}

fn err_indefinite(_data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    Err(CborError::new(ErrorCode::DecodeIndefinite, pos))
}

fn err_simple_reserved(_data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    Err(CborError::new(ErrorCode::DecodeSimpleType, pos))
}

fn err_float16(_data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    Err(CborError::new(ErrorCode::DecodeFloat16, pos))
}

fn decode_type0_small(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let b = read_u8(data, pos)?;
    Ok((Decoded::Item(Value::Unsigned(u64::from(info(b)))), 1))
}

fn decode_type0_info24(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let v = read_u8(data, pos + 1)?;
    Ok((Decoded::Item(Value::Unsigned(u64::from(v))), 2))
}

fn decode_type0_info25(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let v = read_be_u16(data, pos + 1)?;
    Ok((Decoded::Item(Value::Unsigned(u64::from(v))), 3))
}

fn decode_type0_info26(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let v = read_be_u32(data, pos + 1)?;
    Ok((Decoded::Item(Value::Unsigned(u64::from(v))), 5))
}

fn decode_type0_info27(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let v = read_be_u64(data, pos + 1)?;
    Ok((Decoded::Item(Value::Unsigned(v)), 9))
}

fn decode_type1_small(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let b = read_u8(data, pos)?;
    Ok((Decoded::Item(Value::Signed(-i64::from(info(b)) - 1)), 1))
}

fn decode_type1_info24(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let v = read_u8(data, pos + 1)?;
    Ok((Decoded::Item(Value::Signed(-i64::from(v) - 1)), 2))
}

fn decode_type1_info25(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let v = read_be_u16(data, pos + 1)?;
    Ok((Decoded::Item(Value::Signed(-i64::from(v) - 1)), 3))
}

fn decode_type1_info26(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let v = read_be_u32(data, pos + 1)?;
    Ok((Decoded::Item(Value::Signed(-i64::from(v) - 1)), 5))
}

fn decode_type1_info27(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let v = read_be_u64(data, pos + 1)?;
    if v > i64::MAX as u64 {
        return Err(CborError::new(ErrorCode::DecodeExceedInt64, pos));
    }
    Ok((Decoded::Item(Value::Signed(-(v as i64) - 1)), 9))
}

fn decode_type2(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let (len, n) = decode_length(data, pos)?;
    let len = len_to_usize(len, pos)?;
    let payload = read_exact(data, pos + n, len)?;
    Ok((Decoded::Item(Value::Bytes(payload.to_vec())), n + len))
}

fn decode_type2_indefinite(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Indefinite(IndefiniteKind::Bytes), 1))
}

fn decode_type3(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let (len, n) = decode_length(data, pos)?;
    let len = len_to_usize(len, pos)?;
    let payload = read_exact(data, pos + n, len)?;
    let text = utf8::validate(payload).map_err(|()| CborError::new(ErrorCode::Utf8Invalid, pos))?;
    Ok((Decoded::Item(Value::Text(text.to_owned())), n + len))
}

fn decode_type3_indefinite(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Indefinite(IndefiniteKind::Text), 1))
}

fn decode_type4(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let (len, n) = decode_length(data, pos)?;
    Ok((Decoded::DefiniteArray(len_to_usize(len, pos)?), n))
}

fn decode_type4_indefinite(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Indefinite(IndefiniteKind::Array), 1))
}

fn decode_type5(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let (len, n) = decode_length(data, pos)?;
    Ok((Decoded::DefiniteMap(len_to_usize(len, pos)?), n))
}

fn decode_type5_indefinite(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Indefinite(IndefiniteKind::Map), 1))
}

fn decode_tag(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let (tag, n) = decode_length(data, pos)?;
    Ok((Decoded::Tag(tag), n))
}

fn decode_simple_small(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let b = read_u8(data, pos)?;
    Ok((Decoded::Item(Value::Simple(info(b))), 1))
}

fn decode_false(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Item(Value::Bool(false)), 1))
}

fn decode_true(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Item(Value::Bool(true)), 1))
}

fn decode_null(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Item(Value::Null), 1))
}

fn decode_undefined(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Item(Value::Undefined), 1))
}

fn decode_simple_byte(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let code = read_u8(data, pos + 1)?;
    Ok((Decoded::Item(Value::Simple(code)), 2))
}

fn decode_float32(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let bits = read_be_u32(data, pos + 1)?;
    Ok((Decoded::Item(Value::F32(f32::from_bits(bits))), 5))
}

fn decode_float64(data: &[u8], pos: usize) -> Result<(Decoded, usize), CborError> {
    let bits = read_be_u64(data, pos + 1)?;
    Ok((Decoded::Item(Value::F64(f64::from_bits(bits))), 9))
}

fn decode_break(_data: &[u8], _pos: usize) -> Result<(Decoded, usize), CborError> {
    Ok((Decoded::Break, 1))
}

//---- the 256-entry dispatch table, one slot per possible header byte

static DECODERS: [DecodeFn; 256] = build_decoders();

#[allow(clippy::too_many_lines)]
const fn build_decoders() -> [DecodeFn; 256] {
    let mut t: [DecodeFn; 256] = [err_reserved; 256];
    let mut i: usize;

    // type0: unsigned integer
    i = 0;
    while i < INFO24 as usize {
        t[TYPE0 as usize + i] = decode_type0_small;
        i += 1;
    }
    t[(TYPE0 | INFO24) as usize] = decode_type0_info24;
    t[(TYPE0 | INFO25) as usize] = decode_type0_info25;
    t[(TYPE0 | INFO26) as usize] = decode_type0_info26;
    t[(TYPE0 | INFO27) as usize] = decode_type0_info27;
    // 28..30 stay err_reserved
    t[(TYPE0 | INDEFINITE_LENGTH) as usize] = err_indefinite;

    // type1: negative integer
    i = 0;
    while i < INFO24 as usize {
        t[TYPE1 as usize + i] = decode_type1_small;
        i += 1;
    }
    t[(TYPE1 | INFO24) as usize] = decode_type1_info24;
    t[(TYPE1 | INFO25) as usize] = decode_type1_info25;
    t[(TYPE1 | INFO26) as usize] = decode_type1_info26;
    t[(TYPE1 | INFO27) as usize] = decode_type1_info27;
    t[(TYPE1 | INDEFINITE_LENGTH) as usize] = err_indefinite;

    // type2: byte string
    i = 0;
    while i <= INFO27 as usize {
        t[TYPE2 as usize + i] = decode_type2;
        i += 1;
    }
    t[(TYPE2 | INDEFINITE_LENGTH) as usize] = decode_type2_indefinite;

    // type3: text string
    i = 0;
    while i <= INFO27 as usize {
        t[TYPE3 as usize + i] = decode_type3;
        i += 1;
    }
    t[(TYPE3 | INDEFINITE_LENGTH) as usize] = decode_type3_indefinite;

    // type4: array
    i = 0;
    while i <= INFO27 as usize {
        t[TYPE4 as usize + i] = decode_type4;
        i += 1;
    }
    t[(TYPE4 | INDEFINITE_LENGTH) as usize] = decode_type4_indefinite;

    // type5: map
    i = 0;
    while i <= INFO27 as usize {
        t[TYPE5 as usize + i] = decode_type5;
        i += 1;
    }
    t[(TYPE5 | INDEFINITE_LENGTH) as usize] = decode_type5_indefinite;

    // type6: tagged data-item
    i = 0;
    while i <= INFO27 as usize {
        t[TYPE6 as usize + i] = decode_tag;
        i += 1;
    }
    t[(TYPE6 | INDEFINITE_LENGTH) as usize] = err_indefinite;

    // type7: simple types, floats, break-stop
    i = 0;
    while i < SIMPLE_FALSE as usize {
        t[TYPE7 as usize + i] = decode_simple_small;
        i += 1;
    }
    t[(TYPE7 | SIMPLE_FALSE) as usize] = decode_false;
    t[(TYPE7 | SIMPLE_TRUE) as usize] = decode_true;
    t[(TYPE7 | SIMPLE_NULL) as usize] = decode_null;
    t[(TYPE7 | SIMPLE_UNDEFINED) as usize] = decode_undefined;
    t[(TYPE7 | SIMPLE_BYTE) as usize] = decode_simple_byte;
    t[(TYPE7 | FLT16) as usize] = err_float16;
    t[(TYPE7 | FLT32) as usize] = decode_float32;
    t[(TYPE7 | FLT64) as usize] = decode_float64;
    t[(TYPE7 | 28) as usize] = err_simple_reserved;
    t[(TYPE7 | 29) as usize] = err_simple_reserved;
    t[(TYPE7 | 30) as usize] = err_simple_reserved;
    t[(TYPE7 | INDEFINITE_LENGTH) as usize] = decode_break;

    t
}
