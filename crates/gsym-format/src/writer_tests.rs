use gsym_core::{FileRef, FunctionRecord, LineEntry, LineTable, Range, StringPool};

use crate::fixtures::{r, sample, sample_bytes};
use crate::{AddressSize, Module, SECTION_ALIGN, WriteError, write};

#[test]
fn sections_are_aligned() {
    let module = Module::from_bytes(sample_bytes()).unwrap();
    let header = module.header();
    for offset in [
        header.index_offset,
        header.strings_offset,
        header.payload_offset,
    ] {
        assert_eq!(offset as usize % SECTION_ALIGN, 0);
    }
}

#[test]
fn output_is_deterministic() {
    assert_eq!(sample_bytes(), sample_bytes());
}

#[test]
fn wide_address_needs_eight_byte_index() {
    let mut pool = StringPool::new();
    let name = pool.intern("high").unwrap();
    let records = vec![FunctionRecord::new(r(0xffff_ff00, 0x1_0000_0000), name)];

    assert_eq!(
        write(&records, pool.as_bytes(), AddressSize::Four),
        Err(WriteError::AddressTooWide(0x1_0000_0000))
    );

    let bytes = write(&records, pool.as_bytes(), AddressSize::Eight).unwrap();
    let module = Module::from_bytes(bytes).unwrap();
    assert_eq!(module.address_size(), AddressSize::Eight);
    assert_eq!(module.range(0), records[0].range);
}

#[test]
fn forced_eight_byte_index_round_trips() {
    let (pool, records) = sample();
    let bytes = write(&records, pool.as_bytes(), AddressSize::Eight).unwrap();
    let module = Module::from_bytes(bytes).unwrap();
    assert_eq!(module.header().index_size, 40);
    assert_eq!(module.decode_function(1).unwrap().range, Range::empty_at(0x2000));
}

#[test]
fn unencodable_records_are_rejected() {
    let mut pool = StringPool::new();
    let name = pool.intern("f").unwrap();
    let file = FileRef(name);
    let lines = LineTable::new(vec![
        LineEntry::new(0x50, file, 1),
        LineEntry::new(0x110, file, 2),
    ])
    .unwrap();
    let records = vec![
        FunctionRecord::new(r(0x10, 0x20), name),
        FunctionRecord::new(r(0x100, 0x200), name).with_line_table(lines),
    ];
    assert_eq!(
        write(&records, pool.as_bytes(), AddressSize::Four),
        Err(WriteError::Malformed {
            index: 1,
            reason: "line address outside function",
        })
    );

    let unsorted = vec![
        FunctionRecord::new(r(0x100, 0x200), name),
        FunctionRecord::new(r(0x10, 0x20), name),
    ];
    assert_eq!(
        write(&unsorted, pool.as_bytes(), AddressSize::Four),
        Err(WriteError::Malformed {
            index: 1,
            reason: "start not above its predecessor",
        })
    );
}
