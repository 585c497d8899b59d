use std::io::Write as _;

use gsym_core::{StringLookup, StringRef};

use crate::fixtures::{put_u32, r, reseal, sample, sample_bytes, sample_module};
use crate::{AddressSize, FormatError, Module, ModuleError, Sections};

// Layout of the sample store: index at 64, strings at 128, payload at 192.
const INDEX: usize = 64;
const STRINGS: usize = 128;
const PAYLOAD: usize = 192;

#[test]
fn sample_layout() {
    let module = sample_module();
    let header = module.header();
    assert_eq!(header.index_offset as usize, INDEX);
    assert_eq!(header.strings_offset as usize, STRINGS);
    assert_eq!(header.payload_offset as usize, PAYLOAD);
    assert_eq!(header.total_size, 232);
    assert_eq!(module.address_size(), AddressSize::Four);
    assert_eq!(module.len(), 2);
}

#[test]
fn functions_decode_to_original_records() {
    let (_, records) = sample();
    let module = sample_module();
    for (i, record) in records.iter().enumerate() {
        assert_eq!(module.range(i), record.range);
        assert_eq!(&module.decode_function(i).unwrap(), record);
    }
}

#[test]
fn strings_resolve_through_module() {
    let module = sample_module();
    assert_eq!(module.resolve(StringRef(1)), Ok("main"));
    assert_eq!(module.strings().get(StringRef(27)), Ok("leaf"));
    assert_eq!(module.resolve(StringRef::NONE), Ok(""));
}

#[test]
fn file_too_small() {
    assert_eq!(
        Module::from_bytes(vec![0; 12]).unwrap_err(),
        FormatError::FileTooSmall(12)
    );
}

#[test]
fn invalid_magic() {
    let mut bytes = sample_bytes();
    bytes[0] = b'X';
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::InvalidMagic
    );
}

#[test]
fn unsupported_version() {
    let mut bytes = sample_bytes();
    put_u32(&mut bytes, 4, 2);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::UnsupportedVersion(2)
    );
}

#[test]
fn swapped_byte_order() {
    let mut bytes = sample_bytes();
    bytes.swap(16, 17);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::UnsupportedByteOrder(0x0201)
    );
}

#[test]
fn size_mismatch() {
    let mut bytes = sample_bytes();
    bytes.push(0);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::SizeMismatch {
            header: 232,
            actual: 233,
        }
    );
}

#[test]
fn flipped_payload_byte_fails_checksum() {
    let mut bytes = sample_bytes();
    bytes[PAYLOAD + 1] ^= 0xff;
    assert!(matches!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::ChecksumMismatch { .. }
    ));
}

#[test]
fn section_out_of_bounds() {
    let mut bytes = sample_bytes();
    put_u32(&mut bytes, 44, 4096);
    reseal(&mut bytes);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::SectionOutOfBounds {
            section: Sections::Payload,
            offset: PAYLOAD as u32,
            size: 4096,
        }
    );
}

#[test]
fn index_size_must_match_count() {
    let mut bytes = sample_bytes();
    put_u32(&mut bytes, 20, 3);
    reseal(&mut bytes);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::IndexSizeMismatch {
            count: 3,
            actual: 24,
        }
    );
}

#[test]
fn unsorted_index_is_corrupt() {
    let mut bytes = sample_bytes();
    // Second entry start: 0x2000 -> 0x0800.
    put_u32(&mut bytes, INDEX + 12, 0x0800);
    put_u32(&mut bytes, INDEX + 16, 0x0800);
    reseal(&mut bytes);
    assert!(matches!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::CorruptIndex { index: 1, .. }
    ));
}

#[test]
fn payload_offset_out_of_bounds() {
    let mut bytes = sample_bytes();
    put_u32(&mut bytes, INDEX + 20, 999);
    reseal(&mut bytes);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::CorruptOffset {
            index: 1,
            offset: 999,
        }
    );
}

#[test]
fn malformed_string_region() {
    let mut bytes = sample_bytes();
    bytes[STRINGS] = b'x';
    reseal(&mut bytes);
    assert_eq!(
        Module::from_bytes(bytes).unwrap_err(),
        FormatError::MalformedStrings
    );
}

#[test]
fn bad_name_offset_surfaces_on_decode() {
    let mut bytes = sample_bytes();
    // F1 payload starts at 34; point its name into the middle of "main".
    put_u32(&mut bytes, PAYLOAD + 34, 2);
    reseal(&mut bytes);
    let module = Module::from_bytes(bytes).unwrap();
    assert!(module.decode_function(0).is_ok());
    assert_eq!(module.decode_function(1), Err(FormatError::InvalidOffset(2)));
}

#[test]
fn invalid_utf8_surfaces_on_decode() {
    let mut bytes = sample_bytes();
    // "leaf" at string offset 27.
    bytes[STRINGS + 27] = 0xff;
    reseal(&mut bytes);
    let module = Module::from_bytes(bytes).unwrap();
    assert_eq!(module.decode_function(1), Err(FormatError::InvalidUtf8(27)));
}

#[test]
fn empty_store() {
    let bytes = crate::write(&[], &[0], AddressSize::Four).unwrap();
    let module = Module::from_bytes(bytes).unwrap();
    assert!(module.is_empty());
    assert_eq!(module.index().len(), 0);
}

#[test]
fn load_from_disk_and_map() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&sample_bytes()).unwrap();

    let read = Module::from_path(file.path()).unwrap();
    let mapped = Module::map_path(file.path()).unwrap();
    assert_eq!(read.bytes(), mapped.bytes());
    assert_eq!(mapped.range(0), r(0x1000, 0x1040));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Module::from_path(dir.path().join("absent.gsym")).unwrap_err();
    assert!(matches!(err, ModuleError::Io(_)));
}
