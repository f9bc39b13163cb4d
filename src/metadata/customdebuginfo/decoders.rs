//! Payload decoders for the fixed-layout record kinds.
//!
//! Every decoder takes a record body as yielded by
//! [`crate::metadata::customdebuginfo::records::parse_records`] and reads it with a fresh
//! [`Parser`] positioned at offset 0. Bytes left over after the declared content are
//! ignored.

use crate::{
    file::parser::Parser,
    metadata::{
        customdebuginfo::{
            encmap::{decode_lambda_map, decode_local_slot_map, LambdaMap, LocalSlotDebugInfo},
            types::{
                CustomDebugInfoKind, CustomDebugInfoRecord, DynamicLocalBucket, HoistedLocalScope,
                TupleElementNamesInfo, DYNAMIC_FLAG_BYTES, DYNAMIC_NAME_UNITS,
            },
        },
        token::Token,
    },
    Result,
};

/// A fully decoded custom debug info record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomDebugInfo<'a> {
    /// Using counts per namespace scope, innermost first
    UsingInfo(Vec<i16>),
    /// Method whose using information applies
    ForwardInfo(Token),
    /// Method whose module-level extern aliases apply
    ForwardToModuleInfo(Token),
    /// Scopes of the hoisted state machine locals
    StateMachineHoistedLocalScopes(Vec<HoistedLocalScope>),
    /// Name of the state machine class
    ForwardIterator(String),
    /// `dynamic` flags of locals and constants
    DynamicLocals(Vec<DynamicLocalBucket>),
    /// Edit and Continue local slot map
    EditAndContinueLocalSlotMap(Vec<LocalSlotDebugInfo>),
    /// Edit and Continue lambda and closure map
    EditAndContinueLambdaMap(LambdaMap),
    /// Tuple element names of locals and constants
    TupleElementNames(Vec<TupleElementNamesInfo>),
    /// A record of unrecognised kind, kept undecoded
    Unknown {
        /// Kind byte
        kind: u8,
        /// Record version
        version: u8,
        /// Record body
        data: &'a [u8],
    },
}

/// Decodes the body of `record` according to its kind.
///
/// # Errors
/// Propagates the error of the kind specific decoder.
pub fn decode_record<'a>(record: &CustomDebugInfoRecord<'a>) -> Result<CustomDebugInfo<'a>> {
    let data = record.data;
    Ok(match record.kind {
        CustomDebugInfoKind::UsingInfo => CustomDebugInfo::UsingInfo(decode_using_record(data)?),
        CustomDebugInfoKind::ForwardInfo => {
            CustomDebugInfo::ForwardInfo(decode_forward_record(data)?)
        }
        CustomDebugInfoKind::ForwardToModuleInfo => {
            CustomDebugInfo::ForwardToModuleInfo(decode_forward_to_module_record(data)?)
        }
        CustomDebugInfoKind::StateMachineHoistedLocalScopes => {
            CustomDebugInfo::StateMachineHoistedLocalScopes(
                decode_state_machine_hoisted_local_scopes_record(data)?,
            )
        }
        CustomDebugInfoKind::ForwardIterator => {
            CustomDebugInfo::ForwardIterator(decode_forward_iterator_record(data)?)
        }
        CustomDebugInfoKind::DynamicLocals => {
            CustomDebugInfo::DynamicLocals(decode_dynamic_locals_record(data)?)
        }
        CustomDebugInfoKind::EditAndContinueLocalSlotMap => {
            CustomDebugInfo::EditAndContinueLocalSlotMap(decode_local_slot_map(data)?)
        }
        CustomDebugInfoKind::EditAndContinueLambdaMap => {
            CustomDebugInfo::EditAndContinueLambdaMap(decode_lambda_map(data)?)
        }
        CustomDebugInfoKind::TupleElementNames => {
            CustomDebugInfo::TupleElementNames(decode_tuple_element_names_record(data)?)
        }
        CustomDebugInfoKind::Unknown(kind) => CustomDebugInfo::Unknown {
            kind,
            version: record.version,
            data,
        },
    })
}

/// Decodes a `UsingInfo` body into the using counts per namespace scope, innermost
/// scope first.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the body is truncated.
pub fn decode_using_record(data: &[u8]) -> Result<Vec<i16>> {
    let mut parser = Parser::new(data);

    let count = parser.read_le::<i16>()?;
    let mut counts = Vec::with_capacity(usize::try_from(count).unwrap_or(0));
    for _ in 0..count {
        counts.push(parser.read_le::<i16>()?);
    }

    Ok(counts)
}

/// Decodes a `ForwardInfo` body into the token of the method to forward to.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the body is shorter than 4 bytes.
pub fn decode_forward_record(data: &[u8]) -> Result<Token> {
    let mut parser = Parser::new(data);
    Ok(Token::from_i32(parser.read_le::<i32>()?))
}

/// Decodes a `ForwardToModuleInfo` body. The layout matches `ForwardInfo`; the token
/// names the method that holds the module-level extern aliases.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the body is shorter than 4 bytes.
pub fn decode_forward_to_module_record(data: &[u8]) -> Result<Token> {
    decode_forward_record(data)
}

/// Decodes a `StateMachineHoistedLocalScopes` body.
///
/// The n-th entry belongs to the n-th hoisted field of the state machine class.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer scopes are present than declared.
pub fn decode_state_machine_hoisted_local_scopes_record(
    data: &[u8],
) -> Result<Vec<HoistedLocalScope>> {
    let mut parser = Parser::new(data);

    let count = parser.read_le::<i32>()?;
    let mut scopes = Vec::with_capacity(capacity_hint(count, parser.remaining(), 8));
    for _ in 0..count {
        let start_offset = parser.read_le::<i32>()?;
        let end_offset = parser.read_le::<i32>()?;
        scopes.push(HoistedLocalScope {
            start_offset,
            end_offset,
        });
    }

    Ok(scopes)
}

/// Decodes a `ForwardIterator` body: the name of the compiler generated state machine
/// class, e.g. `<Iterate>d__0`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the body has no terminating NUL.
pub fn decode_forward_iterator_record(data: &[u8]) -> Result<String> {
    Parser::new(data).read_utf16_nul_terminated()
}

/// Decodes a `DynamicLocals` body.
///
/// Each bucket is 200 bytes: 64 flag bytes, flag count, slot id, and a 128-byte UTF-16
/// name field. Names stop at the first NUL, the cursor always skips the whole field.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if a bucket is truncated.
pub fn decode_dynamic_locals_record(data: &[u8]) -> Result<Vec<DynamicLocalBucket>> {
    const BUCKET_SIZE: usize = DYNAMIC_FLAG_BYTES + 8 + DYNAMIC_NAME_UNITS * 2;

    let mut parser = Parser::new(data);

    let count = parser.read_le::<i32>()?;
    let mut buckets = Vec::with_capacity(capacity_hint(count, parser.remaining(), BUCKET_SIZE));
    for _ in 0..count {
        let mut flags = 0u64;
        for bit in 0..DYNAMIC_FLAG_BYTES {
            if parser.read_le::<u8>()? != 0 {
                flags |= 1u64 << bit;
            }
        }

        let flag_count = parser.read_le::<i32>()?;
        let slot_id = parser.read_le::<i32>()?;
        let name = parser.read_utf16_fixed(DYNAMIC_NAME_UNITS)?;

        buckets.push(DynamicLocalBucket {
            flag_count,
            flags,
            slot_id,
            name,
        });
    }

    Ok(buckets)
}

/// Decodes a `TupleElementNames` body.
///
/// Element names are NUL-terminated UTF-8; an empty name marks an unnamed element.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] on truncation, or [`crate::Error::Malformed`] for
/// negative element counts and invalid UTF-8.
pub fn decode_tuple_element_names_record(data: &[u8]) -> Result<Vec<TupleElementNamesInfo>> {
    let mut parser = Parser::new(data);

    let count = parser.read_le::<i32>()?;
    let mut infos = Vec::with_capacity(capacity_hint(count, parser.remaining(), 17));
    for _ in 0..count {
        let name_count = parser.read_le::<i32>()?;
        if name_count < 0 {
            return Err(malformed_error!(
                "Negative tuple element count {} at offset {}",
                name_count,
                parser.pos() - 4
            ));
        }

        let mut element_names = Vec::with_capacity(capacity_hint(name_count, parser.remaining(), 1));
        for _ in 0..name_count {
            let name = parser.read_utf8_nul_terminated()?;
            element_names.push(if name.is_empty() { None } else { Some(name) });
        }

        let slot_index = parser.read_le::<i32>()?;
        let scope_start = parser.read_le::<i32>()?;
        let scope_end = parser.read_le::<i32>()?;
        let local_name = parser.read_utf8_nul_terminated()?;

        infos.push(TupleElementNamesInfo {
            element_names,
            slot_index,
            scope_start,
            scope_end,
            local_name,
        });
    }

    Ok(infos)
}

/// Caps a declared element count by what the remaining bytes could possibly hold.
fn capacity_hint(count: i32, remaining: usize, min_entry_size: usize) -> usize {
    usize::try_from(count)
        .unwrap_or(0)
        .min(remaining / min_entry_size.max(1))
}
