//! Integration tests for record framing and payload decoding.
//!
//! Blobs are assembled byte by byte here, the way a compiler lays them out in a PDB.

use cdiscope::{
    metadata::customdebuginfo::{
        decode_dynamic_locals_record, decode_using_record, find_record, read_global_header,
        DynamicLocalBucket, HoistedLocalScope, LocalSlotKind, MethodDebugInfo,
    },
    prelude::*,
};
use std::borrow::Cow;

fn record(kind: u8, alignment: u8, body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![4, kind, 0, alignment];
    bytes.extend_from_slice(&(8 + body.len() as i32).to_le_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn blob(records: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = vec![4, records.len() as u8, 0, 0];
    for record in records {
        bytes.extend_from_slice(record);
    }
    bytes
}

fn utf16z(value: &str) -> Vec<u8> {
    value
        .encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

fn bucket(flags: &[u8], slot_id: i32, name: &str) -> Vec<u8> {
    let mut bytes = vec![0u8; 64];
    bytes[..flags.len()].copy_from_slice(flags);
    bytes.extend_from_slice(&(flags.len() as i32).to_le_bytes());
    bytes.extend_from_slice(&slot_id.to_le_bytes());
    let mut name_field = utf16z(name);
    name_field.resize(128, 0);
    bytes.extend(name_field);
    bytes
}

/// A valid global header with no records yields nothing.
#[test]
fn test_empty_blob() -> Result<()> {
    let data = blob(&[]);
    let mut offset = 0;
    let header = read_global_header(&data, &mut offset)?;
    assert_eq!(header.version, 4);
    assert_eq!(header.count, 0);
    assert_eq!(offset, 4);

    assert_eq!(parse_records(&data)?.count(), 0);
    Ok(())
}

/// Blobs shorter than the global header are rejected.
#[test]
fn test_short_blob() {
    for data in [&[][..], &[4], &[4, 0], &[4, 0, 0]] {
        assert!(matches!(
            parse_records(data),
            Err(Error::InvalidHeader { .. })
        ));
    }
}

/// Blobs of other versions decode to nothing instead of failing.
#[test]
fn test_unsupported_version() -> Result<()> {
    let mut data = blob(&[record(0, 0, &[1, 0, 1, 0])]);
    data[0] = 3;
    assert!(parse_records(&data)?.next().is_none());
    Ok(())
}

/// Using counts come back in the order they were written.
#[test]
fn test_using_counts_order() -> Result<()> {
    let data = blob(&[record(0, 0, &[3, 0, 2, 0, 1, 0, 3, 0])]);
    let using = find_record(&data, CustomDebugInfoKind::UsingInfo)?.unwrap();
    assert_eq!(decode_using_record(using.data)?, vec![2, 1, 3]);
    Ok(())
}

/// Alignment padding is cut from the body but still skipped by the framer.
#[test]
fn test_local_slot_map_alignment() -> Result<()> {
    let data = blob(&[
        record(6, 2, &[0x01, 0x05, 0x00, 0x00]),
        record(1, 0, &[0x02, 0x00, 0x00, 0x06]),
    ]);

    let records = parse_records(&data)?.collect::<Result<Vec<_>>>()?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].data.len(), 2);
    assert_eq!(records[1].kind, CustomDebugInfoKind::ForwardInfo);

    match decode_record(&records[0])? {
        CustomDebugInfo::EditAndContinueLocalSlotMap(slots) => {
            assert_eq!(slots.len(), 1);
            assert_eq!(slots[0].kind, LocalSlotKind::Local(0));
            assert_eq!(slots[0].syntax_offset, 5);
        }
        other => panic!("unexpected record {:?}", other),
    }
    match decode_record(&records[1])? {
        CustomDebugInfo::ForwardInfo(token) => assert_eq!(token, Token(0x0600_0002)),
        other => panic!("unexpected record {:?}", other),
    }
    Ok(())
}

/// A framing error ends iteration after being reported once.
#[test]
fn test_framing_error_is_terminal() -> Result<()> {
    let mut data = blob(&[record(1, 0, &[0x02, 0x00, 0x00, 0x06])]);
    // declared size runs past the end of the blob
    data.extend_from_slice(&[4, 1, 0, 0, 64, 0, 0, 0, 0, 0, 0, 0]);

    let mut records = parse_records(&data)?;
    assert!(records.next().unwrap().is_ok());
    assert!(matches!(
        records.next(),
        Some(Err(Error::InvalidHeader { .. }))
    ));
    assert!(records.next().is_none());
    Ok(())
}

/// A dynamic bucket keeps all of its fields and occupies exactly 200 bytes.
#[test]
fn test_dynamic_locals_bucket() -> Result<()> {
    let mut body = 2i32.to_le_bytes().to_vec();
    body.extend(bucket(&[0, 1], 5, "x"));
    body.extend(bucket(&[1], 6, "y"));
    assert_eq!(body.len(), 4 + 2 * 200);

    let buckets = decode_dynamic_locals_record(&body)?;
    assert_eq!(
        buckets[0],
        DynamicLocalBucket {
            flag_count: 2,
            flags: 0b10,
            slot_id: 5,
            name: "x".to_string(),
        }
    );
    assert_eq!(buckets[1].name, "y");
    assert_eq!(buckets[1].slot_id, 6);
    Ok(())
}

struct SingleMethod(Vec<u8>);

impl MethodDebugInfoProvider for SingleMethod {
    fn custom_debug_info(&self, _token: Token, _version: i32) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(&self.0))
    }

    fn import_strings(&self, _token: Token, _version: i32) -> Vec<String> {
        vec!["USystem".to_string()]
    }
}

/// A MoveNext method carrying hoisted scopes and its state machine name.
#[test]
fn test_method_debug_info() -> Result<()> {
    let mut scopes = 2i32.to_le_bytes().to_vec();
    for value in [0x10i32, 0x40, 0, 0] {
        scopes.extend_from_slice(&value.to_le_bytes());
    }

    let provider = SingleMethod(blob(&[
        record(0, 0, &[1, 0, 1, 0]),
        record(3, 0, &scopes),
        record(4, 0, &utf16z("<Run>d__3")),
    ]));

    let info = MethodDebugInfo::read(&provider, Token(0x0600_0010), 1, &ReaderConfig::default())?
        .unwrap();
    assert_eq!(
        info.hoisted_local_scopes,
        vec![
            HoistedLocalScope {
                start_offset: 0x10,
                end_offset: 0x40
            },
            HoistedLocalScope::default()
        ]
    );
    assert_eq!(info.state_machine_type_name.as_deref(), Some("<Run>d__3"));
    assert_eq!(
        info.imports.unwrap().groups[0][0],
        ImportRecord::new(ImportTargetKind::Namespace, "System")
    );
    Ok(())
}

/// The XML dump lists every record.
#[test]
fn test_xml_dump() -> Result<()> {
    let data = blob(&[
        record(0, 0, &[1, 0, 2, 0]),
        record(2, 0, &[0x04, 0x00, 0x00, 0x06]),
    ]);

    let xml = write_custom_debug_info_xml(&data)?;
    assert!(xml.contains(r#"<namespace usingCount="2"/>"#));
    assert!(xml.contains(r#"<forwardToModule token="0x06000004"/>"#));
    Ok(())
}
