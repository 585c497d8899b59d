use gsym_core::{FunctionRecord, Range, StringLookup, StringPool, StringRef};
use gsym_format::{AddressSize, Module, WriteError};

use crate::{BuildError, EncodeOptions, compact, emit};

fn r(start: u64, end: u64) -> Range {
    Range::new(start, end).unwrap()
}

#[test]
fn compact_reinterns_in_output_order() {
    let mut pool = StringPool::new();
    let unused = pool.intern("discarded").unwrap();
    let b = pool.intern("b").unwrap();
    let a = pool.intern("a").unwrap();
    assert_ne!(unused, StringRef::NONE);

    let records = vec![FunctionRecord::new(r(0, 4), a), FunctionRecord::new(r(4, 8), b)];
    let (records, strings) = compact(records, &pool).unwrap();

    assert_eq!(strings.as_bytes(), b"\0a\0b\0");
    assert_eq!(records[0].name, StringRef(1));
    assert_eq!(strings.resolve(records[1].name), Ok("b"));
}

#[test]
fn compact_rejects_dangling_strings() {
    let pool = StringPool::new();
    let records = vec![FunctionRecord::new(r(0, 4), StringRef(9))];
    assert!(matches!(
        compact(records, &pool),
        Err(BuildError::Strings(_))
    ));
}

#[test]
fn address_size_is_chosen_from_max_end() {
    let narrow = [FunctionRecord::new(r(0, u32::MAX as u64), StringRef(1))];
    let wide = [FunctionRecord::new(r(0, u32::MAX as u64 + 1), StringRef(1))];
    let options = EncodeOptions::new();

    assert_eq!(options.resolve_address_size(&narrow), AddressSize::Four);
    assert_eq!(options.resolve_address_size(&wide), AddressSize::Eight);
    assert_eq!(
        options
            .address_size(AddressSize::Eight)
            .resolve_address_size(&narrow),
        AddressSize::Eight
    );
}

#[test]
fn emitted_bytes_load() {
    let mut pool = StringPool::new();
    let name = pool.intern("f").unwrap();
    let records = vec![FunctionRecord::new(r(16, 32), name)];

    let bytes = emit(&records, &pool, &EncodeOptions::new()).unwrap();
    let module = Module::from_bytes(bytes).unwrap();
    assert_eq!(module.len(), 1);
    assert_eq!(module.decode_function(0).unwrap(), records[0]);
}

#[test]
fn forcing_narrow_width_on_wide_addresses_fails() {
    let mut pool = StringPool::new();
    let name = pool.intern("high").unwrap();
    let records = vec![FunctionRecord::new(r(1 << 33, (1 << 33) + 4), name)];
    let options = EncodeOptions::new().address_size(AddressSize::Four);

    assert_eq!(
        emit(&records, &pool, &options),
        Err(BuildError::Write(WriteError::AddressTooWide((1 << 33) + 4)))
    );
}
