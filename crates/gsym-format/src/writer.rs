//! Section layout for store files.

use gsym_core::FunctionRecord;

use crate::constants::{HEADER_SIZE, SECTION_ALIGN};
use crate::header::{Header, Sections, align_up};
use crate::index::{AddressSize, IndexEntry};
use crate::payload;

/// Layout failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("{0} section exceeds the 4 GiB format limit")]
    TooLarge(Sections),
    #[error("address {0:#x} does not fit a 4-byte index")]
    AddressTooWide(u64),
    #[error("record {index} cannot be encoded: {reason}")]
    Malformed { index: usize, reason: &'static str },
}

/// Lay out a store file.
///
/// `records` must reference only offsets in `strings`, which must be a
/// NUL-framed string region. Records out of start order or failing
/// [`payload::check`] are rejected.
pub fn write(
    records: &[FunctionRecord],
    strings: &[u8],
    addr_size: AddressSize,
) -> Result<Vec<u8>, WriteError> {
    for (index, record) in records.iter().enumerate() {
        if index > 0 && records[index - 1].start() >= record.start() {
            return Err(WriteError::Malformed {
                index,
                reason: "start not above its predecessor",
            });
        }
        payload::check(record).map_err(|reason| WriteError::Malformed { index, reason })?;
    }

    if addr_size == AddressSize::Four
        && let Some(wide) = records.iter().find(|r| r.end() > u32::MAX as u64)
    {
        return Err(WriteError::AddressTooWide(wide.end()));
    }

    let mut index = Vec::with_capacity(records.len() * addr_size.entry_size());
    let mut blocks = Vec::new();
    for record in records {
        let payload_offset = fit(blocks.len(), Sections::Payload)?;
        payload::encode(record, &mut blocks);
        IndexEntry {
            range: record.range,
            payload_offset,
        }
        .write(addr_size, &mut index);
    }

    let index_offset = HEADER_SIZE;
    let strings_offset = align_up(index_offset + index.len(), SECTION_ALIGN);
    let payload_offset = align_up(strings_offset + strings.len(), SECTION_ALIGN);
    let total_size = payload_offset + blocks.len();

    let mut header = Header {
        total_size: fit(total_size, Sections::Payload)?,
        addr_size: addr_size.width() as u8,
        function_count: fit(records.len(), Sections::Index)?,
        index_offset: index_offset as u32,
        index_size: fit(index.len(), Sections::Index)?,
        strings_offset: fit(strings_offset, Sections::Strings)?,
        strings_size: fit(strings.len(), Sections::Strings)?,
        payload_offset: fit(payload_offset, Sections::Payload)?,
        payload_size: fit(blocks.len(), Sections::Payload)?,
        ..Header::default()
    };

    let mut out = vec![0u8; total_size];
    out[index_offset..index_offset + index.len()].copy_from_slice(&index);
    out[strings_offset..strings_offset + strings.len()].copy_from_slice(strings);
    out[payload_offset..].copy_from_slice(&blocks);

    header.checksum = crc32fast::hash(&out[HEADER_SIZE..]);
    out[..HEADER_SIZE].copy_from_slice(&header.to_bytes());

    tracing::trace!(
        functions = records.len(),
        index = index.len(),
        strings = strings.len(),
        payload = blocks.len(),
        "laid out store sections"
    );

    Ok(out)
}

fn fit(value: usize, section: Sections) -> Result<u32, WriteError> {
    u32::try_from(value).map_err(|_| WriteError::TooLarge(section))
}
