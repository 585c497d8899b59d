//! Shared test data.

use gsym_core::{
    FileRef, FunctionRecord, InlineNode, LineEntry, LineTable, Range, StringPool,
};

use crate::{AddressSize, HEADER_SIZE, Module, write};

pub fn r(start: u64, end: u64) -> Range {
    Range::new(start, end).unwrap()
}

/// Two functions: `main` with lines and a two-level inline tree, and a
/// zero-size `leaf` symbol.
pub fn sample() -> (StringPool, Vec<FunctionRecord>) {
    let mut pool = StringPool::new();
    let main = pool.intern("main").unwrap();
    let main_c = FileRef(pool.intern("main.c").unwrap());
    let helper = pool.intern("helper").unwrap();
    let util_h = FileRef(pool.intern("util.h").unwrap());
    let leaf = pool.intern("leaf").unwrap();

    let lines = LineTable::new(vec![
        LineEntry::new(0x1000, main_c, 10),
        LineEntry::new(0x1010, main_c, 12),
        LineEntry::new(0x1020, util_h, 3),
    ])
    .unwrap();
    let tree = InlineNode::root(r(0x1000, 0x1040), main).with_children(vec![
        InlineNode::new(r(0x1010, 0x1030), helper, main_c, 11).with_children(vec![
            InlineNode::new(r(0x1018, 0x1020), leaf, util_h, 5),
        ]),
    ]);

    let records = vec![
        FunctionRecord::new(r(0x1000, 0x1040), main)
            .with_line_table(lines)
            .with_inline_tree(tree),
        FunctionRecord::new(Range::empty_at(0x2000), leaf),
    ];
    (pool, records)
}

pub fn sample_bytes() -> Vec<u8> {
    let (pool, records) = sample();
    write(&records, pool.as_bytes(), AddressSize::Four).unwrap()
}

pub fn sample_module() -> Module {
    Module::from_bytes(sample_bytes()).unwrap()
}

/// Recompute the checksum after tampering with bytes past the header.
pub fn reseal(bytes: &mut [u8]) {
    let checksum = crc32fast::hash(&bytes[HEADER_SIZE..]);
    bytes[8..12].copy_from_slice(&checksum.to_le_bytes());
}

pub fn put_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
