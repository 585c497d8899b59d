use crate::varint::{Reader, write_sleb, write_uleb};

fn uleb(value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    write_uleb(&mut out, value);
    out
}

fn sleb(value: i64) -> Vec<u8> {
    let mut out = Vec::new();
    write_sleb(&mut out, value);
    out
}

#[test]
fn uleb_known_encodings() {
    assert_eq!(uleb(0), [0x00]);
    assert_eq!(uleb(127), [0x7f]);
    assert_eq!(uleb(128), [0x80, 0x01]);
    assert_eq!(uleb(624485), [0xe5, 0x8e, 0x26]);
    assert_eq!(uleb(u64::MAX).len(), 10);
}

#[test]
fn sleb_known_encodings() {
    assert_eq!(sleb(0), [0x00]);
    assert_eq!(sleb(-1), [0x7f]);
    assert_eq!(sleb(63), [0x3f]);
    assert_eq!(sleb(64), [0xc0, 0x00]);
    assert_eq!(sleb(-64), [0x40]);
    assert_eq!(sleb(-123456), [0xc0, 0xbb, 0x78]);
}

#[test]
fn reader_decodes_extremes() {
    let mut bytes = uleb(u64::MAX);
    bytes.extend(sleb(i64::MIN));
    bytes.extend(sleb(i64::MAX));
    let mut reader = Reader::new(&bytes, 0);
    assert_eq!(reader.uleb(), Some(u64::MAX));
    assert_eq!(reader.sleb(), Some(i64::MIN));
    assert_eq!(reader.sleb(), Some(i64::MAX));
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn truncated_input_is_none() {
    let mut reader = Reader::new(&[0x80, 0x80], 0);
    assert_eq!(reader.uleb(), None);

    let mut reader = Reader::new(&[1, 2, 3], 0);
    assert_eq!(reader.u32_le(), None);
}

#[test]
fn overlong_uleb_is_rejected() {
    let bytes = [0xff; 11];
    assert_eq!(Reader::new(&bytes, 0).uleb(), None);

    // Tenth byte may only carry the top bit.
    let mut bytes = vec![0xff; 9];
    bytes.push(0x02);
    assert_eq!(Reader::new(&bytes, 0).uleb(), None);
}

#[test]
fn uleb_u32_rejects_wide_values() {
    let bytes = uleb(u32::MAX as u64 + 1);
    assert_eq!(Reader::new(&bytes, 0).uleb_u32(), None);
}
