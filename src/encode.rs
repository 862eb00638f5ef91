use crate::config::{Config, ContainerEncoding};
use crate::value::{BigNum, IndefiniteKind, Value};
use crate::wire::{
    hdr, Writer, BRKSTP, INDEFINITE_LENGTH, INFO24, INFO25, INFO26, INFO27, MAX_SMALL_INT,
    SIMPLE_BYTE, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED, TAG_BIG_FLOAT,
    TAG_DATE_TIME, TAG_DECIMAL_FRACTION, TAG_EMBEDDED_CBOR, TAG_EPOCH, TAG_NEG_BIGNUM,
    TAG_POS_BIGNUM, TAG_REGEXP, TAG_SELF_DESCRIBE, TYPE0, TYPE1, TYPE2, TYPE3, TYPE4, TYPE5,
    TYPE6, TYPE7, FLT32, FLT64,
};
use crate::{CborError, ErrorCode};

/// Encode one data-item into `out[0..n]` with the default configuration
/// (stream containers) and return `n`.
///
/// # Errors
///
/// Returns `OutputTooSmall` if `out` cannot hold the encoding and
/// `MaxKeysExceeded` for maps larger than the default key cap.
pub fn encode(value: &Value, out: &mut [u8]) -> Result<usize, CborError> {
    Config::new().encode(value, out)
}

fn encode_null(w: &mut Writer<'_>) -> Result<(), CborError> {
    w.write_u8(hdr(TYPE7, SIMPLE_NULL))
}

fn encode_bool(v: bool, w: &mut Writer<'_>) -> Result<(), CborError> {
    w.write_u8(hdr(TYPE7, if v { SIMPLE_TRUE } else { SIMPLE_FALSE }))
}

fn encode_undefined(w: &mut Writer<'_>) -> Result<(), CborError> {
    w.write_u8(hdr(TYPE7, SIMPLE_UNDEFINED))
}

pub(crate) fn encode_break_stop(w: &mut Writer<'_>) -> Result<(), CborError> {
    w.write_u8(BRKSTP)
}

// Integer encoders cascade down so only the minimal width is emitted: each
// width first tests whether the next-smaller encoder can take the value.

fn encode_uint8(item: u8, w: &mut Writer<'_>) -> Result<(), CborError> {
    if item <= MAX_SMALL_INT {
        return w.write_u8(hdr(TYPE0, item)); // 0..23
    }
    w.write_u8(hdr(TYPE0, INFO24))?;
    w.write_u8(item) // 24..255
}

fn encode_uint16(item: u16, w: &mut Writer<'_>) -> Result<(), CborError> {
    if item < 256 {
        return encode_uint8(item as u8, w);
    }
    w.write_u8(hdr(TYPE0, INFO25))?;
    w.write(&item.to_be_bytes()) // 256..65535
}

fn encode_uint32(item: u32, w: &mut Writer<'_>) -> Result<(), CborError> {
    if item < 65_536 {
        return encode_uint16(item as u16, w);
    }
    w.write_u8(hdr(TYPE0, INFO26))?;
    w.write(&item.to_be_bytes()) // 65536..4294967295
}

pub(crate) fn encode_uint64(item: u64, w: &mut Writer<'_>) -> Result<(), CborError> {
    if item < 4_294_967_296 {
        return encode_uint32(item as u32, w);
    }
    w.write_u8(hdr(TYPE0, INFO27))?;
    w.write(&item.to_be_bytes())
}

fn encode_int8(item: i8, w: &mut Writer<'_>) -> Result<(), CborError> {
    if item > MAX_SMALL_INT as i8 {
        w.write_u8(hdr(TYPE0, INFO24))?;
        w.write_u8(item as u8) // 24..127
    } else if item < -(MAX_SMALL_INT as i8) - 1 {
        w.write_u8(hdr(TYPE1, INFO24))?;
        w.write_u8((-(i16::from(item) + 1)) as u8) // -128..-25
    } else if item < 0 {
        w.write_u8(hdr(TYPE1, (-(item + 1)) as u8)) // -24..-1
    } else {
        w.write_u8(hdr(TYPE0, item as u8)) // 0..23
    }
}

fn encode_int16(item: i16, w: &mut Writer<'_>) -> Result<(), CborError> {
    if item > 127 {
        if item < 256 {
            w.write_u8(hdr(TYPE0, INFO24))?;
            return w.write_u8(item as u8); // 128..255
        }
        w.write_u8(hdr(TYPE0, INFO25))?;
        return w.write(&item.to_be_bytes()); // 256..32767
    }
    if item < -128 {
        let n = (-(i32::from(item) + 1)) as u16;
        if n < 256 {
            w.write_u8(hdr(TYPE1, INFO24))?;
            return w.write_u8(n as u8); // -256..-129
        }
        w.write_u8(hdr(TYPE1, INFO25))?; // -32768..-257
        return w.write(&n.to_be_bytes());
    }
    encode_int8(item as i8, w)
}

fn encode_int32(item: i32, w: &mut Writer<'_>) -> Result<(), CborError> {
    if item > 32_767 {
        if item < 65_536 {
            w.write_u8(hdr(TYPE0, INFO25))?;
            return w.write(&(item as u16).to_be_bytes()); // 32768..65535
        }
        w.write_u8(hdr(TYPE0, INFO26))?; // 65536..2147483647
        return w.write(&item.to_be_bytes());
    }
    if item < -32_768 {
        let n = (-(i64::from(item) + 1)) as u32;
        if n < 65_536 {
            w.write_u8(hdr(TYPE1, INFO25))?;
            return w.write(&(n as u16).to_be_bytes()); // -65536..-32769
        }
        w.write_u8(hdr(TYPE1, INFO26))?; // -2147483648..-65537
        return w.write(&n.to_be_bytes());
    }
    encode_int16(item as i16, w)
}

pub(crate) fn encode_int64(item: i64, w: &mut Writer<'_>) -> Result<(), CborError> {
    if item > 2_147_483_647 {
        if item < 4_294_967_296 {
            w.write_u8(hdr(TYPE0, INFO26))?;
            return w.write(&(item as u32).to_be_bytes()); // 2147483648..4294967295
        }
        w.write_u8(hdr(TYPE0, INFO27))?;
        return w.write(&item.to_be_bytes());
    }
    if item < -2_147_483_648 {
        let n = (-(item + 1)) as u64;
        if n < 4_294_967_296 {
            w.write_u8(hdr(TYPE1, INFO26))?;
            return w.write(&(n as u32).to_be_bytes()); // -4294967296..-2147483649
        }
        w.write_u8(hdr(TYPE1, INFO27))?; // -9223372036854775808..-4294967297
        return w.write(&n.to_be_bytes());
    }
    encode_int32(item as i32, w)
}

// Floats are never narrowed; the value kind picks the width.

fn encode_float32(item: f32, w: &mut Writer<'_>) -> Result<(), CborError> {
    w.write_u8(hdr(TYPE7, FLT32))?;
    w.write(&item.to_bits().to_be_bytes())
}

fn encode_float64(item: f64, w: &mut Writer<'_>) -> Result<(), CborError> {
    w.write_u8(hdr(TYPE7, FLT64))?;
    w.write(&item.to_bits().to_be_bytes())
}

// Strings and containers write their length through the unsigned-integer
// encoder and then retag the header byte, which keeps width selection in a
// single place.

pub(crate) fn encode_bytes(item: &[u8], w: &mut Writer<'_>) -> Result<(), CborError> {
    let start = w.position();
    encode_uint64(item.len() as u64, w)?;
    w.retag(start, TYPE2);
    w.write(item)
}

pub(crate) fn encode_text_raw(item: &[u8], w: &mut Writer<'_>) -> Result<(), CborError> {
    let start = w.position();
    encode_bytes(item, w)?;
    w.retag(start, TYPE3);
    Ok(())
}

fn encode_text(item: &str, w: &mut Writer<'_>) -> Result<(), CborError> {
    encode_text_raw(item.as_bytes(), w)
}

pub(crate) fn encode_text_start(w: &mut Writer<'_>) -> Result<(), CborError> {
    w.write_u8(hdr(TYPE3, INDEFINITE_LENGTH))
}

fn encode_simple_type(code: u8, w: &mut Writer<'_>) -> Result<(), CborError> {
    if code < 32 {
        return w.write_u8(hdr(TYPE7, code));
    }
    w.write_u8(hdr(TYPE7, SIMPLE_BYTE))?;
    w.write_u8(code)
}

pub(crate) fn encode_tag(tag: u64, w: &mut Writer<'_>) -> Result<(), CborError> {
    let start = w.position();
    encode_uint64(tag, w)?;
    w.retag(start, TYPE6);
    Ok(())
}

fn encode_array_items(
    items: &[Value],
    config: &Config,
    w: &mut Writer<'_>,
) -> Result<(), CborError> {
    match config.container_encoding() {
        ContainerEncoding::LengthPrefix => {
            let start = w.position();
            encode_uint64(items.len() as u64, w)?;
            w.retag(start, TYPE4);
            for item in items {
                encode_value(item, config, w)?;
            }
            Ok(())
        }
        ContainerEncoding::Stream => {
            w.write_u8(hdr(TYPE4, INDEFINITE_LENGTH))?;
            for item in items {
                encode_value(item, config, w)?;
            }
            encode_break_stop(w)
        }
    }
}

pub(crate) fn encode_map_pairs(
    pairs: &[(Value, Value)],
    config: &Config,
    w: &mut Writer<'_>,
) -> Result<(), CborError> {
    if pairs.len() > config.max_keys() {
        return Err(CborError::new(ErrorCode::MaxKeysExceeded, w.position()));
    }
    match config.container_encoding() {
        ContainerEncoding::LengthPrefix => {
            let start = w.position();
            encode_uint64(pairs.len() as u64, w)?;
            w.retag(start, TYPE5);
            for (key, value) in pairs {
                encode_value(key, config, w)?;
                encode_value(value, config, w)?;
            }
            Ok(())
        }
        ContainerEncoding::Stream => {
            w.write_u8(hdr(TYPE5, INDEFINITE_LENGTH))?;
            for (key, value) in pairs {
                encode_value(key, config, w)?;
                encode_value(value, config, w)?;
            }
            encode_break_stop(w)
        }
    }
}

fn encode_bignum(item: &BigNum, w: &mut Writer<'_>) -> Result<(), CborError> {
    let tag = if item.is_negative() {
        TAG_NEG_BIGNUM
    } else {
        TAG_POS_BIGNUM
    };
    encode_tag(tag, w)?;
    encode_bytes(item.magnitude(), w)
}

// Tags 4 and 5 share the 2-item [exponent, mantissa] array shape. The pair
// is always a definite array; container policy applies to value containers
// only.
fn encode_exponent_pair(
    tag: u64,
    exponent: i64,
    mantissa: i64,
    w: &mut Writer<'_>,
) -> Result<(), CborError> {
    encode_tag(tag, w)?;
    w.write_u8(hdr(TYPE4, 2))?;
    encode_int64(exponent, w)?;
    encode_int64(mantissa, w)
}

fn encode_indefinite_start(kind: IndefiniteKind, w: &mut Writer<'_>) -> Result<(), CborError> {
    let major = match kind {
        IndefiniteKind::Bytes => TYPE2,
        IndefiniteKind::Text => TYPE3,
        IndefiniteKind::Array => TYPE4,
        IndefiniteKind::Map => TYPE5,
    };
    w.write_u8(hdr(major, INDEFINITE_LENGTH))
}

pub(crate) fn encode_value(
    value: &Value,
    config: &Config,
    w: &mut Writer<'_>,
) -> Result<(), CborError> {
    match value {
        Value::Null => encode_null(w),
        Value::Undefined => encode_undefined(w),
        Value::Bool(v) => encode_bool(*v, w),
        Value::Unsigned(v) => encode_uint64(*v, w),
        Value::Signed(v) => encode_int64(*v, w),
        Value::F32(v) => encode_float32(*v, w),
        Value::F64(v) => encode_float64(*v, w),
        Value::Bytes(v) => encode_bytes(v, w),
        Value::Text(v) => encode_text(v, w),
        Value::Array(items) => encode_array_items(items, config, w),
        Value::Map(pairs) => encode_map_pairs(pairs, config, w),
        Value::Simple(code) => encode_simple_type(*code, w),
        Value::IndefiniteStart(kind) => encode_indefinite_start(*kind, w),
        Value::BreakStop => encode_break_stop(w),
        Value::DateTime(s) => {
            encode_tag(TAG_DATE_TIME, w)?;
            encode_text(s, w)
        }
        Value::Epoch(secs) => {
            encode_tag(TAG_EPOCH, w)?;
            encode_int64(*secs, w)
        }
        Value::EpochMicro(secs) => {
            encode_tag(TAG_EPOCH, w)?;
            encode_float64(*secs, w)
        }
        Value::BigNum(num) => encode_bignum(num, w),
        Value::DecimalFraction { exponent, mantissa } => {
            encode_exponent_pair(TAG_DECIMAL_FRACTION, *exponent, *mantissa, w)
        }
        Value::BigFloat { exponent, mantissa } => {
            encode_exponent_pair(TAG_BIG_FLOAT, *exponent, *mantissa, w)
        }
        Value::EmbeddedCbor(bytes) => {
            encode_tag(TAG_EMBEDDED_CBOR, w)?;
            encode_bytes(bytes, w)
        }
        Value::Regexp(re) => {
            encode_tag(TAG_REGEXP, w)?;
            encode_text(re.as_str(), w)
        }
        Value::SelfDescribe(bytes) => {
            encode_tag(TAG_SELF_DESCRIBE, w)?;
            encode_bytes(bytes, w)
        }
    }
}
