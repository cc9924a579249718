// AMF0 codec

use byteorder::{BigEndian, ByteOrder};

use super::{AMFDecodingCursor, AmfDecodeError};

pub const AMF0_TYPE_NUMBER: u8 = 0x00;
pub const AMF0_TYPE_BOOL: u8 = 0x01;
pub const AMF0_TYPE_STRING: u8 = 0x02;
pub const AMF0_TYPE_OBJECT: u8 = 0x03;
pub const AMF0_TYPE_NULL: u8 = 0x05;
pub const AMF0_TYPE_UNDEFINED: u8 = 0x06;
pub const AMF0_TYPE_LONG_STRING: u8 = 0x0C;

pub const AMF0_OBJECT_TERM_CODE: u8 = 0x09;

/// Scalar AMF0 value
///
/// Only the types the command codec reads or writes are represented.
/// Anything else found while reading an object is skipped or rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum AMF0Value {
    Number(f64),
    Bool(bool),
    String(String),
}

impl AMF0Value {
    /// Encodes the value, with its type marker
    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            AMF0Value::Number(n) => amf0_encode_number(buf, *n),
            AMF0Value::Bool(b) => amf0_encode_bool(buf, *b),
            AMF0Value::String(s) => amf0_encode_string(buf, s),
        }
    }

    /// Reads a value of any supported type
    pub fn read(cursor: &mut AMFDecodingCursor) -> Result<AMF0Value, AmfDecodeError> {
        match cursor.look_byte()? {
            AMF0_TYPE_NUMBER => Ok(AMF0Value::Number(amf0_decode_number(cursor)?)),
            AMF0_TYPE_BOOL => Ok(AMF0Value::Bool(amf0_decode_bool(cursor)?)),
            AMF0_TYPE_STRING | AMF0_TYPE_LONG_STRING => {
                Ok(AMF0Value::String(amf0_decode_string(cursor)?))
            }
            marker => Err(AmfDecodeError::UnsupportedMarker(marker)),
        }
    }

    /// Skips one value of any supported type, including null and undefined
    pub fn skip(cursor: &mut AMFDecodingCursor) -> Result<(), AmfDecodeError> {
        match cursor.look_byte()? {
            AMF0_TYPE_NULL | AMF0_TYPE_UNDEFINED => cursor.skip(1),
            _ => AMF0Value::read(cursor).map(|_| ()),
        }
    }
}

/// Encodes a number: marker + 8-byte big endian double
pub fn amf0_encode_number(buf: &mut Vec<u8>, num: f64) {
    let mut b = [0u8; 8];
    BigEndian::write_f64(&mut b, num);

    buf.push(AMF0_TYPE_NUMBER);
    buf.extend_from_slice(&b);
}

/// Encodes a boolean: marker + 1 byte
pub fn amf0_encode_bool(buf: &mut Vec<u8>, b: bool) {
    buf.push(AMF0_TYPE_BOOL);
    buf.push(b as u8);
}

/// Encodes a string: marker + 2-byte big endian length + raw bytes
///
/// Strings longer than 65535 bytes are written as AMF0 long strings
pub fn amf0_encode_string(buf: &mut Vec<u8>, s: &str) {
    if s.len() > u16::MAX as usize {
        let mut len = [0u8; 4];
        BigEndian::write_u32(&mut len, s.len() as u32);

        buf.push(AMF0_TYPE_LONG_STRING);
        buf.extend_from_slice(&len);
        buf.extend_from_slice(s.as_bytes());
    } else {
        buf.push(AMF0_TYPE_STRING);
        amf0_encode_object_key(buf, s);
    }
}

/// Encodes null
pub fn amf0_encode_null(buf: &mut Vec<u8>) {
    buf.push(AMF0_TYPE_NULL);
}

/// Encodes an object key: 2-byte big endian length + raw bytes, no marker
pub fn amf0_encode_object_key(buf: &mut Vec<u8>, key: &str) {
    let mut len = [0u8; 2];
    BigEndian::write_u16(&mut len, key.len() as u16);

    buf.extend_from_slice(&len);
    buf.extend_from_slice(key.as_bytes());
}

/// Encodes an object with its marker, properties in the given order, and the end marker
pub fn amf0_encode_object(buf: &mut Vec<u8>, properties: &[(&str, AMF0Value)]) {
    buf.push(AMF0_TYPE_OBJECT);

    for (key, value) in properties {
        amf0_encode_object_key(buf, key);
        value.encode(buf);
    }

    buf.extend_from_slice(&[0x00, 0x00, AMF0_OBJECT_TERM_CODE]);
}

fn expect_marker(cursor: &mut AMFDecodingCursor, expected: u8) -> Result<(), AmfDecodeError> {
    let found = cursor.look_byte()?;

    if found != expected {
        return Err(AmfDecodeError::UnexpectedMarker { expected, found });
    }

    cursor.skip(1)
}

fn decode_utf8(bytes: &[u8]) -> Result<String, AmfDecodeError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| AmfDecodeError::InvalidUtf8)
}

/// Decodes a string (short or long)
pub fn amf0_decode_string(cursor: &mut AMFDecodingCursor) -> Result<String, AmfDecodeError> {
    if cursor.look_byte()? == AMF0_TYPE_LONG_STRING {
        cursor.skip(1)?;
        let len = BigEndian::read_u32(cursor.read(4)?) as usize;
        return decode_utf8(cursor.read(len)?);
    }

    expect_marker(cursor, AMF0_TYPE_STRING)?;

    let len = BigEndian::read_u16(cursor.read(2)?) as usize;

    decode_utf8(cursor.read(len)?)
}

/// Decodes an object key (no marker)
///
/// Returns None on the zero-length key that ends the object.
/// The object end marker that follows it is consumed too.
pub fn amf0_decode_object_key(
    cursor: &mut AMFDecodingCursor,
) -> Result<Option<String>, AmfDecodeError> {
    let len = BigEndian::read_u16(cursor.read(2)?) as usize;

    if len == 0 {
        if cursor.look_byte().ok() == Some(AMF0_OBJECT_TERM_CODE) {
            cursor.skip(1)?;
        }

        return Ok(None);
    }

    Ok(Some(decode_utf8(cursor.read(len)?)?))
}

/// Decodes a number
pub fn amf0_decode_number(cursor: &mut AMFDecodingCursor) -> Result<f64, AmfDecodeError> {
    expect_marker(cursor, AMF0_TYPE_NUMBER)?;

    Ok(BigEndian::read_f64(cursor.read(8)?))
}

/// Decodes a boolean
pub fn amf0_decode_bool(cursor: &mut AMFDecodingCursor) -> Result<bool, AmfDecodeError> {
    expect_marker(cursor, AMF0_TYPE_BOOL)?;

    Ok(cursor.read_byte()? != 0)
}

/// Decodes a null or undefined placeholder
pub fn amf0_decode_null(cursor: &mut AMFDecodingCursor) -> Result<(), AmfDecodeError> {
    match cursor.look_byte()? {
        AMF0_TYPE_NULL | AMF0_TYPE_UNDEFINED => cursor.skip(1),
        found => Err(AmfDecodeError::UnexpectedMarker {
            expected: AMF0_TYPE_NULL,
            found,
        }),
    }
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_layout_and_round_trip() {
        let mut buf = Vec::new();
        amf0_encode_number(&mut buf, 1.0);

        assert_eq!(buf, vec![0x00, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);

        for n in [0.0, -0.0, 1.5, -123456.789, f64::MAX, f64::MIN_POSITIVE] {
            let mut buf = Vec::new();
            amf0_encode_number(&mut buf, n);

            let mut cursor = AMFDecodingCursor::new(&buf);
            let decoded = amf0_decode_number(&mut cursor).unwrap();

            assert_eq!(decoded.to_bits(), n.to_bits());
            assert!(cursor.ended());
        }
    }

    #[test]
    fn test_string_layout_and_round_trip() {
        let mut buf = Vec::new();
        amf0_encode_string(&mut buf, "live");

        assert_eq!(buf, vec![0x02, 0x00, 0x04, b'l', b'i', b'v', b'e']);

        let max = "x".repeat(u16::MAX as usize);

        for s in ["", "connect", "ñandú", max.as_str()] {
            let mut buf = Vec::new();
            amf0_encode_string(&mut buf, s);

            let mut cursor = AMFDecodingCursor::new(&buf);
            assert_eq!(amf0_decode_string(&mut cursor).unwrap(), s);
            assert!(cursor.ended());
        }
    }

    #[test]
    fn test_long_string() {
        let long = "y".repeat(u16::MAX as usize + 1);
        let mut buf = Vec::new();
        amf0_encode_string(&mut buf, &long);

        assert_eq!(buf[0], AMF0_TYPE_LONG_STRING);

        let mut cursor = AMFDecodingCursor::new(&buf);
        assert_eq!(amf0_decode_string(&mut cursor).unwrap(), long);
    }

    #[test]
    fn test_short_buffers_are_errors() {
        let mut buf = Vec::new();
        amf0_encode_number(&mut buf, 42.0);

        let mut cursor = AMFDecodingCursor::new(&buf[..5]);
        assert!(matches!(
            amf0_decode_number(&mut cursor),
            Err(AmfDecodeError::UnexpectedEnd { .. })
        ));

        let mut cursor = AMFDecodingCursor::new(&[0x02, 0x00, 0x05, b'a']);
        assert!(matches!(
            amf0_decode_string(&mut cursor),
            Err(AmfDecodeError::UnexpectedEnd { needed: 5, .. })
        ));

        let mut cursor = AMFDecodingCursor::new(&[0x01]);
        assert!(amf0_decode_bool(&mut cursor).is_err());

        let mut cursor = AMFDecodingCursor::new(&[0x00]);
        assert!(amf0_decode_object_key(&mut cursor).is_err());

        let mut cursor = AMFDecodingCursor::new(&[]);
        assert!(amf0_decode_number(&mut cursor).is_err());
    }

    #[test]
    fn test_marker_mismatch() {
        let mut buf = Vec::new();
        amf0_encode_string(&mut buf, "1");

        let mut cursor = AMFDecodingCursor::new(&buf);
        assert_eq!(
            amf0_decode_number(&mut cursor),
            Err(AmfDecodeError::UnexpectedMarker {
                expected: AMF0_TYPE_NUMBER,
                found: AMF0_TYPE_STRING
            })
        );
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_object_keys_and_end() {
        let mut buf = Vec::new();
        amf0_encode_object(
            &mut buf,
            &[
                ("code", AMF0Value::String("NetStream.Play.Start".to_string())),
                ("fpad", AMF0Value::Bool(false)),
            ],
        );

        let mut cursor = AMFDecodingCursor::new(&buf);
        assert_eq!(cursor.read_byte().unwrap(), AMF0_TYPE_OBJECT);

        assert_eq!(
            amf0_decode_object_key(&mut cursor).unwrap().as_deref(),
            Some("code")
        );
        assert_eq!(
            amf0_decode_string(&mut cursor).unwrap(),
            "NetStream.Play.Start"
        );
        assert_eq!(
            amf0_decode_object_key(&mut cursor).unwrap().as_deref(),
            Some("fpad")
        );
        assert!(!amf0_decode_bool(&mut cursor).unwrap());
        assert_eq!(amf0_decode_object_key(&mut cursor).unwrap(), None);
        assert!(cursor.ended());
    }

    #[test]
    fn test_skip_values() {
        let mut buf = Vec::new();
        amf0_encode_null(&mut buf);
        amf0_encode_bool(&mut buf, true);
        amf0_encode_number(&mut buf, 3.0);
        amf0_encode_string(&mut buf, "skip me");
        buf.push(0x08);

        let mut cursor = AMFDecodingCursor::new(&buf);

        for _ in 0..4 {
            AMF0Value::skip(&mut cursor).unwrap();
        }

        assert_eq!(
            AMF0Value::skip(&mut cursor),
            Err(AmfDecodeError::UnsupportedMarker(0x08))
        );
    }
}
