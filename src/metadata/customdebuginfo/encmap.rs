//! Edit and Continue local slot and lambda map decoders.
//!
//! Both maps are streams of ECMA-335 compressed unsigned integers that run to the end of
//! the (alignment trimmed) record body. Syntax offsets are stored relative to a baseline
//! so that the usually negative offsets of the method's first statements stay small.
//!
//! # Local slot map
//!
//! ```text
//! 0xFF baseline?     -> syntax offset baseline = -compressed
//! 0x00               -> short-lived temporary slot
//! kind|0x80? offset ordinal?
//!                    -> long-lived local, kind = (byte & 0x3F) - 1
//! ```
//!
//! # Lambda map
//!
//! ```text
//! method_ordinal+1  baseline  closure_count  closure_offset*  (lambda_offset closure_ordinal+2)*
//! ```

use crate::{file::parser::Parser, Result};

/// Marks a syntax offset baseline entry in the local slot map.
const SYNTAX_OFFSET_BASELINE: u8 = 0xFF;

/// Marks a short-lived temporary in the local slot map.
const TEMP_SLOT: u8 = 0x00;

/// Closure ordinal of lambdas that capture only `this`.
pub const THIS_ONLY_CLOSURE_ORDINAL: i32 = -1;

/// Closure ordinal of lambdas that capture nothing.
pub const STATIC_CLOSURE_ORDINAL: i32 = -2;

/// Kind of a local slot in the Edit and Continue slot map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalSlotKind {
    /// Short-lived temporary with no syntax association
    Temp,
    /// Long-lived local of the given synthesized kind (0 is a user-defined local)
    Local(u8),
}

/// One slot of the Edit and Continue local slot map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalSlotDebugInfo {
    /// Slot kind
    pub kind: LocalSlotKind,
    /// Syntax offset of the declaring node (0 for temporaries)
    pub syntax_offset: i32,
    /// Ordinal among locals declared by the same syntax node
    pub ordinal: i32,
}

impl LocalSlotDebugInfo {
    /// Returns `true` for short-lived temporaries.
    #[must_use]
    pub fn is_temp(&self) -> bool {
        self.kind == LocalSlotKind::Temp
    }
}

/// A closure scope recorded in the lambda map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClosureDebugInfo {
    /// Syntax offset of the scope that owns the closure
    pub syntax_offset: i32,
}

/// A lambda recorded in the lambda map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LambdaDebugInfo {
    /// Syntax offset of the lambda expression
    pub syntax_offset: i32,
    /// Index into [`LambdaMap::closures`], or one of [`THIS_ONLY_CLOSURE_ORDINAL`] and
    /// [`STATIC_CLOSURE_ORDINAL`]
    pub closure_ordinal: i32,
}

/// Decoded `EditAndContinueLambdaMap` record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LambdaMap {
    /// Ordinal of the method among overloads sharing closure classes, -1 if unknown
    pub method_ordinal: i32,
    /// Closure scopes in ordinal order
    pub closures: Vec<ClosureDebugInfo>,
    /// Lambdas in emission order
    pub lambdas: Vec<LambdaDebugInfo>,
}

/// Decodes an `EditAndContinueLocalSlotMap` body.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if an entry is cut off, or
/// [`crate::Error::Malformed`] for invalid compressed integers and kind bytes.
///
/// # Examples
///
/// ```rust
/// use cdiscope::metadata::customdebuginfo::{decode_local_slot_map, LocalSlotKind};
///
/// // baseline -5, user local at offset 8, temp
/// let slots = decode_local_slot_map(&[0xFF, 0x05, 0x01, 0x0D, 0x00])?;
/// assert_eq!(slots.len(), 2);
/// assert_eq!(slots[0].kind, LocalSlotKind::Local(0));
/// assert_eq!(slots[0].syntax_offset, 8);
/// assert!(slots[1].is_temp());
/// # Ok::<(), cdiscope::Error>(())
/// ```
pub fn decode_local_slot_map(data: &[u8]) -> Result<Vec<LocalSlotDebugInfo>> {
    let mut parser = Parser::new(data);
    let mut slots = Vec::new();
    let mut baseline = 0;

    if parser.has_more_data() && parser.data()[0] == SYNTAX_OFFSET_BASELINE {
        parser.advance_by(1)?;
        baseline = -parser.read_compressed_i32()?;
    }

    while parser.has_more_data() {
        let byte = parser.read_le::<u8>()?;
        if byte == TEMP_SLOT {
            slots.push(LocalSlotDebugInfo {
                kind: LocalSlotKind::Temp,
                syntax_offset: 0,
                ordinal: 0,
            });
            continue;
        }

        let kind = (byte & 0x3F)
            .checked_sub(1)
            .ok_or_else(|| malformed_error!("Invalid local slot kind byte {:#04x}", byte))?;
        let has_ordinal = byte & 0x80 != 0;

        let syntax_offset = parser.read_compressed_i32()? + baseline;
        let ordinal = if has_ordinal {
            parser.read_compressed_i32()?
        } else {
            0
        };

        slots.push(LocalSlotDebugInfo {
            kind: LocalSlotKind::Local(kind),
            syntax_offset,
            ordinal,
        });
    }

    Ok(slots)
}

/// Decodes an `EditAndContinueLambdaMap` body.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the header or an entry is cut off, or
/// [`crate::Error::Malformed`] if a lambda refers to a closure that does not exist.
pub fn decode_lambda_map(data: &[u8]) -> Result<LambdaMap> {
    let mut parser = Parser::new(data);

    let method_ordinal = parser.read_compressed_i32()? - 1;
    let baseline = -parser.read_compressed_i32()?;
    let closure_count = parser.read_compressed_i32()?;

    let mut closures = Vec::new();
    for _ in 0..closure_count {
        closures.push(ClosureDebugInfo {
            syntax_offset: parser.read_compressed_i32()? + baseline,
        });
    }

    let mut lambdas = Vec::new();
    while parser.has_more_data() {
        let syntax_offset = parser.read_compressed_i32()? + baseline;
        let closure_ordinal = parser.read_compressed_i32()? - 2;
        if closure_ordinal >= closure_count {
            return Err(malformed_error!(
                "Lambda at syntax offset {} refers to closure {} of {}",
                syntax_offset,
                closure_ordinal,
                closure_count
            ));
        }

        lambdas.push(LambdaDebugInfo {
            syntax_offset,
            closure_ordinal,
        });
    }

    Ok(LambdaMap {
        method_ordinal,
        closures,
        lambdas,
    })
}
