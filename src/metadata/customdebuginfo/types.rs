//! Structural types of the native PDB custom debug info format.
//!
//! See the parent module [`crate::metadata::customdebuginfo`] for the binary layout.
//! All values are plain data: they are produced by the decoders and never mutated.

use strum::{Display, EnumCount, EnumIter};

/// The only global header version that is understood. Blobs with any other version
/// decode to an empty record sequence.
pub const CDI_VERSION: u8 = 4;

/// Size of the global header: `version:u8, count:u8, reserved:[u8; 2]`.
pub const GLOBAL_HEADER_SIZE: usize = 4;

/// Size of a record header: `version:u8, kind:u8, reserved:u8, alignment:u8, size:i32`.
pub const RECORD_HEADER_SIZE: usize = 8;

/// Number of flag bytes stored per dynamic local bucket.
pub const DYNAMIC_FLAG_BYTES: usize = 64;

/// Width of the dynamic local name field in UTF-16 code units (128 bytes).
pub const DYNAMIC_NAME_UNITS: usize = 64;

/// Slot id given to dynamic local buckets that were identified as constants.
pub const CONSTANT_SLOT_ID: i32 = -1;

/// The kind byte of a custom debug info record.
///
/// Unrecognised kind bytes are preserved in [`CustomDebugInfoKind::Unknown`] so that
/// callers can skip or dump them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum CustomDebugInfoKind {
    /// Number of using directives per enclosing namespace scope
    UsingInfo,
    /// Use the using information of another method
    ForwardInfo,
    /// Use the module-level (extern alias) information of another method
    ForwardToModuleInfo,
    /// IL ranges in which state machine hoisted locals are in scope
    StateMachineHoistedLocalScopes,
    /// Name of the state machine class an iterator/async method forwards to
    ForwardIterator,
    /// `dynamic` flags of locals and constants
    DynamicLocals,
    /// Edit and Continue local slot map
    EditAndContinueLocalSlotMap,
    /// Edit and Continue lambda and closure map
    EditAndContinueLambdaMap,
    /// Tuple element names of locals and constants
    TupleElementNames,
    /// Any other kind byte
    Unknown(u8),
}

impl CustomDebugInfoKind {
    /// Maps a record kind byte to its [`CustomDebugInfoKind`].
    #[must_use]
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => CustomDebugInfoKind::UsingInfo,
            1 => CustomDebugInfoKind::ForwardInfo,
            2 => CustomDebugInfoKind::ForwardToModuleInfo,
            3 => CustomDebugInfoKind::StateMachineHoistedLocalScopes,
            4 => CustomDebugInfoKind::ForwardIterator,
            5 => CustomDebugInfoKind::DynamicLocals,
            6 => CustomDebugInfoKind::EditAndContinueLocalSlotMap,
            7 => CustomDebugInfoKind::EditAndContinueLambdaMap,
            8 => CustomDebugInfoKind::TupleElementNames,
            other => CustomDebugInfoKind::Unknown(other),
        }
    }

    /// Returns the kind byte as stored in the record header.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        match self {
            CustomDebugInfoKind::UsingInfo => 0,
            CustomDebugInfoKind::ForwardInfo => 1,
            CustomDebugInfoKind::ForwardToModuleInfo => 2,
            CustomDebugInfoKind::StateMachineHoistedLocalScopes => 3,
            CustomDebugInfoKind::ForwardIterator => 4,
            CustomDebugInfoKind::DynamicLocals => 5,
            CustomDebugInfoKind::EditAndContinueLocalSlotMap => 6,
            CustomDebugInfoKind::EditAndContinueLambdaMap => 7,
            CustomDebugInfoKind::TupleElementNames => 8,
            CustomDebugInfoKind::Unknown(value) => *value,
        }
    }

    /// Returns `true` for the two kinds whose bodies may carry alignment padding.
    ///
    /// The declared alignment of every other kind is ignored.
    #[must_use]
    pub fn supports_alignment(&self) -> bool {
        matches!(
            self,
            CustomDebugInfoKind::EditAndContinueLocalSlotMap
                | CustomDebugInfoKind::EditAndContinueLambdaMap
        )
    }
}

impl From<u8> for CustomDebugInfoKind {
    fn from(value: u8) -> Self {
        CustomDebugInfoKind::from_u8(value)
    }
}

/// The 4-byte header at the start of every custom debug info blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalHeader {
    /// Format version, only [`CDI_VERSION`] is supported
    pub version: u8,
    /// Declared record count (informational, records are framed by size)
    pub count: u8,
}

/// The 8-byte header in front of every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Record format version
    pub version: u8,
    /// Record kind
    pub kind: CustomDebugInfoKind,
    /// Trailing padding bytes inside the body (0-3)
    pub alignment_size: u8,
    /// Total record size including this header
    pub size: i32,
}

/// One framed record: its kind, version and a borrowed view of the body.
///
/// The body excludes the record header and any alignment padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomDebugInfoRecord<'a> {
    /// Record kind
    pub kind: CustomDebugInfoKind,
    /// Record format version
    pub version: u8,
    /// Record body
    pub data: &'a [u8],
}

/// IL offset range in which a hoisted state machine field is in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HoistedLocalScope {
    /// First IL offset of the range
    pub start_offset: i32,
    /// Last IL offset of the range, as stored in the record
    pub end_offset: i32,
}

impl HoistedLocalScope {
    /// Returns `true` for the `(0, 0)` entry used for hoisted fields without a scope
    /// (e.g. variables captured by a lambda).
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.start_offset == 0 && self.end_offset == 0
    }

    /// Returns `true` if `offset` lies within the stored range (both ends inclusive).
    #[must_use]
    pub fn contains(&self, offset: i32) -> bool {
        !self.is_default() && self.start_offset <= offset && offset <= self.end_offset
    }
}

/// One entry of a `DynamicLocals` record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicLocalBucket {
    /// Number of meaningful bits in `flags`
    pub flag_count: i32,
    /// Bit `j` is set if the `j`-th type component of the local is `dynamic`
    pub flags: u64,
    /// Local slot; negative values mark constants
    pub slot_id: i32,
    /// Name of the local or constant (at most 64 UTF-16 code units)
    pub name: String,
}

impl DynamicLocalBucket {
    /// Returns `true` if this bucket describes a constant rather than a local slot.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.slot_id < 0
    }

    /// Returns the first `flag_count` flags (capped at 64) as booleans.
    #[must_use]
    pub fn flags_as_bools(&self) -> Vec<bool> {
        let count = usize::try_from(self.flag_count)
            .unwrap_or(0)
            .min(DYNAMIC_FLAG_BYTES);
        (0..count).map(|bit| self.flags & (1u64 << bit) != 0).collect()
    }

    /// Renders the meaningful flags as a `0`/`1` string, lowest bit first.
    #[must_use]
    pub fn flags_string(&self) -> String {
        self.flags_as_bools()
            .into_iter()
            .map(|flag| if flag { '1' } else { '0' })
            .collect()
    }
}

/// Tuple element names attached to a local or constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElementNamesInfo {
    /// Element names in declaration order; `None` for unnamed elements
    pub element_names: Vec<Option<String>>,
    /// Local slot, or -1 for constants
    pub slot_index: i32,
    /// Start of the IL scope of a constant (0 for locals)
    pub scope_start: i32,
    /// End of the IL scope of a constant (0 for locals)
    pub scope_end: i32,
    /// Name of the local or constant
    pub local_name: String,
}
