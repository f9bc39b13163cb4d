//! Record framing: global header, record headers and body slicing.
//!
//! [`parse_records`] validates the global header and returns a lazy iterator over the
//! records of a blob. Iteration borrows the blob and never copies record bodies.
//!
//! # Alignment
//!
//! Record headers carry an alignment byte, but only the Edit and Continue map kinds use
//! it. For those, the padding is cut off the yielded body while the cursor still moves
//! over the complete declared body:
//!
//! ```text
//! | header (8) | payload (body - alignment) | padding (alignment) | next header ...
//!               ^-------- yielded ---------^
//!               ^------------- skipped (body) -----------------^
//! ```

use tracing::debug;

use crate::{
    file::io::read_le_at,
    metadata::customdebuginfo::types::{
        CustomDebugInfoKind, CustomDebugInfoRecord, GlobalHeader, RecordHeader, CDI_VERSION,
        GLOBAL_HEADER_SIZE, RECORD_HEADER_SIZE,
    },
    Result,
};

/// Reads the 4-byte global header at `*offset` and advances past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes remain.
pub fn read_global_header(data: &[u8], offset: &mut usize) -> Result<GlobalHeader> {
    if data.len().saturating_sub(*offset) < GLOBAL_HEADER_SIZE {
        return Err(out_of_bounds_error!());
    }

    let mut cursor = *offset;
    let version = read_le_at::<u8>(data, &mut cursor)?;
    let count = read_le_at::<u8>(data, &mut cursor)?;

    *offset += GLOBAL_HEADER_SIZE;
    Ok(GlobalHeader { version, count })
}

/// Reads the 8-byte record header at `*offset` and advances past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than 8 bytes remain.
pub fn read_record_header(data: &[u8], offset: &mut usize) -> Result<RecordHeader> {
    if data.len().saturating_sub(*offset) < RECORD_HEADER_SIZE {
        return Err(out_of_bounds_error!());
    }

    let mut cursor = *offset;
    let version = read_le_at::<u8>(data, &mut cursor)?;
    let kind = CustomDebugInfoKind::from_u8(read_le_at::<u8>(data, &mut cursor)?);
    let _reserved = read_le_at::<u8>(data, &mut cursor)?;
    let alignment_size = read_le_at::<u8>(data, &mut cursor)?;
    let size = read_le_at::<i32>(data, &mut cursor)?;

    *offset += RECORD_HEADER_SIZE;
    Ok(RecordHeader {
        version,
        kind,
        alignment_size,
        size,
    })
}

/// Validates the global header of `data` and returns a lazy iterator over its records.
///
/// A blob whose global version is not [`CDI_VERSION`] is not an error: the returned
/// iterator is simply empty. Calling this function again on the same blob restarts
/// iteration from the first record.
///
/// # Errors
/// Returns [`crate::Error::InvalidHeader`] if `data` is shorter than the global header.
/// Framing errors of individual records are reported by the iterator.
///
/// # Examples
///
/// ```rust
/// use cdiscope::{parse_records, CustomDebugInfoKind};
///
/// let blob = [
///     4, 1, 0, 0, // global header: version 4, one record
///     4, 1, 0, 0, 12, 0, 0, 0, // ForwardInfo, 12 bytes
///     0x01, 0x00, 0x00, 0x06,
/// ];
///
/// let records = parse_records(&blob)?.collect::<cdiscope::Result<Vec<_>>>()?;
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].kind, CustomDebugInfoKind::ForwardInfo);
/// assert_eq!(records[0].data, &[0x01, 0x00, 0x00, 0x06]);
/// # Ok::<(), cdiscope::Error>(())
/// ```
pub fn parse_records(data: &[u8]) -> Result<CustomDebugInfoRecords<'_>> {
    if data.len() < GLOBAL_HEADER_SIZE {
        return Err(invalid_header_error!(
            "Blob of {} bytes is shorter than the global header",
            data.len()
        ));
    }

    let mut offset = 0;
    let header = read_global_header(data, &mut offset)?;
    let finished = header.version != CDI_VERSION;
    if finished {
        debug!(
            version = header.version,
            "unsupported custom debug info version, ignoring blob"
        );
    }

    Ok(CustomDebugInfoRecords {
        data,
        offset,
        header,
        finished,
    })
}

/// Returns the first record of `kind` in `data`, if any.
///
/// # Errors
/// Propagates framing errors encountered before a matching record is found.
pub fn find_record(
    data: &[u8],
    kind: CustomDebugInfoKind,
) -> Result<Option<CustomDebugInfoRecord<'_>>> {
    for record in parse_records(data)? {
        let record = record?;
        if record.kind == kind {
            return Ok(Some(record));
        }
    }

    Ok(None)
}

/// Lazy iterator over the records of a custom debug info blob.
///
/// Yields `Ok(record)` for every well-formed record and stops after the first framing
/// error, which is yielded once as `Err`. Trailing bytes too short to hold a record
/// header are ignored.
pub struct CustomDebugInfoRecords<'a> {
    /// The complete blob
    data: &'a [u8],
    /// Offset of the next record header
    offset: usize,
    /// Global header of the blob
    header: GlobalHeader,
    /// Set once the iterator is exhausted or failed
    finished: bool,
}

impl<'a> CustomDebugInfoRecords<'a> {
    /// The global header read from the blob.
    #[must_use]
    pub fn header(&self) -> GlobalHeader {
        self.header
    }

    fn next_record(&mut self) -> Result<CustomDebugInfoRecord<'a>> {
        let header = read_record_header(self.data, &mut self.offset)?;

        let size = usize::try_from(header.size).unwrap_or(0);
        if size < RECORD_HEADER_SIZE {
            return Err(invalid_header_error!(
                "Record size {} is smaller than the record header",
                header.size
            ));
        }

        let alignment_size = if header.kind.supports_alignment() {
            usize::from(header.alignment_size)
        } else {
            0
        };

        let body_size = size - RECORD_HEADER_SIZE;
        if self.offset > self.data.len().saturating_sub(body_size)
            || body_size > self.data.len()
            || alignment_size > 3
            || alignment_size > body_size
        {
            return Err(invalid_header_error!(
                "Record {} at offset {} with body {} and alignment {} exceeds blob of {} bytes",
                header.kind,
                self.offset - RECORD_HEADER_SIZE,
                body_size,
                alignment_size,
                self.data.len()
            ));
        }

        let data = &self.data[self.offset..self.offset + body_size - alignment_size];
        self.offset += body_size;

        Ok(CustomDebugInfoRecord {
            kind: header.kind,
            version: header.version,
            data,
        })
    }
}

impl<'a> Iterator for CustomDebugInfoRecords<'a> {
    type Item = Result<CustomDebugInfoRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.data.len() < RECORD_HEADER_SIZE {
            return None;
        }
        if self.offset > self.data.len() - RECORD_HEADER_SIZE {
            self.finished = true;
            return None;
        }

        let result = self.next_record();
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for CustomDebugInfoRecords<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::CdiBuilder, Error};

    #[test]
    fn empty_count() {
        let blob = CdiBuilder::new().build();
        assert_eq!(blob.len(), GLOBAL_HEADER_SIZE);

        let records = parse_records(&blob).unwrap();
        assert_eq!(records.header().count, 0);
        assert_eq!(records.count(), 0);
    }

    #[test]
    fn too_short() {
        for len in 0..GLOBAL_HEADER_SIZE {
            let blob = vec![CDI_VERSION; len];
            assert!(matches!(
                parse_records(&blob),
                Err(Error::InvalidHeader { .. })
            ));
        }
    }

    #[test]
    fn unsupported_version() {
        let mut blob = CdiBuilder::new().forward(0x0600_0001).build();
        blob[0] = 5;

        let records = parse_records(&blob).unwrap();
        assert_eq!(records.header().version, 5);
        assert_eq!(records.count(), 0);
    }

    #[test]
    fn multiple_records() {
        let blob = CdiBuilder::new()
            .using(&[1])
            .forward(0x0600_0002)
            .forward_iterator("<M>d__0")
            .build();

        let kinds: Vec<_> = parse_records(&blob)
            .unwrap()
            .map(|r| r.unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                CustomDebugInfoKind::UsingInfo,
                CustomDebugInfoKind::ForwardInfo,
                CustomDebugInfoKind::ForwardIterator
            ]
        );

        // restartable
        assert_eq!(parse_records(&blob).unwrap().count(), 3);
    }

    #[test]
    fn alignment_slice_and_advance() {
        // EnC local slot map, size 12 (header 8 + body 4), alignment 2
        let blob = CdiBuilder::new()
            .raw_record(6, 2, 12, &[0x01, 0x02, 0xAA, 0xBB])
            .forward(0x0600_0003)
            .build();

        let records: Vec<_> = parse_records(&blob)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].kind,
            CustomDebugInfoKind::EditAndContinueLocalSlotMap
        );
        assert_eq!(records[0].data, &[0x01, 0x02]);
        assert_eq!(records[1].kind, CustomDebugInfoKind::ForwardInfo);
        assert_eq!(records[1].data, &[0x03, 0x00, 0x00, 0x06]);
    }

    #[test]
    fn alignment_ignored_for_other_kinds() {
        let blob = CdiBuilder::new()
            .raw_record(1, 3, 12, &[0x01, 0x00, 0x00, 0x06])
            .build();

        let record = parse_records(&blob).unwrap().next().unwrap().unwrap();
        assert_eq!(record.data.len(), 4);
    }

    #[test]
    fn invalid_alignment() {
        let blob = CdiBuilder::new().raw_record(7, 4, 12, &[0; 4]).build();
        let mut records = parse_records(&blob).unwrap();
        assert!(matches!(
            records.next(),
            Some(Err(Error::InvalidHeader { .. }))
        ));
        assert!(records.next().is_none());

        // alignment larger than the body
        let blob = CdiBuilder::new().raw_record(6, 3, 10, &[0; 2]).build();
        assert!(matches!(
            parse_records(&blob).unwrap().next(),
            Some(Err(Error::InvalidHeader { .. }))
        ));
    }

    #[test]
    fn size_smaller_than_header() {
        let blob = CdiBuilder::new().raw_record(0, 0, 7, &[]).build();
        assert!(matches!(
            parse_records(&blob).unwrap().next(),
            Some(Err(Error::InvalidHeader { .. }))
        ));

        let blob = CdiBuilder::new().raw_record(0, 0, -1, &[]).build();
        assert!(matches!(
            parse_records(&blob).unwrap().next(),
            Some(Err(Error::InvalidHeader { .. }))
        ));
    }

    #[test]
    fn body_exceeds_blob() {
        let blob = CdiBuilder::new().raw_record(1, 0, 16, &[0; 4]).build();
        assert!(matches!(
            parse_records(&blob).unwrap().next(),
            Some(Err(Error::InvalidHeader { .. }))
        ));
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut blob = CdiBuilder::new().forward(0x0600_0001).build();
        blob.extend_from_slice(&[0xFF; 7]);
        assert_eq!(parse_records(&blob).unwrap().count(), 1);
    }

    #[test]
    fn find_first_record() {
        let blob = CdiBuilder::new()
            .forward(0x0600_0001)
            .forward(0x0600_0002)
            .build();

        let record = find_record(&blob, CustomDebugInfoKind::ForwardInfo)
            .unwrap()
            .unwrap();
        assert_eq!(record.data, &[0x01, 0x00, 0x00, 0x06]);
        assert!(find_record(&blob, CustomDebugInfoKind::UsingInfo)
            .unwrap()
            .is_none());
    }
}
