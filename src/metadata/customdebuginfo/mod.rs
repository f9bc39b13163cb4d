//! Custom debug info records of native (Windows) PDB files.
//!
//! Compilers attach a binary "custom debug info" blob to each method in a native PDB. The
//! blob carries the information the classic symbol format has no place for: the using
//! structure of C# methods, forwarding links between methods sharing that information,
//! state machine and `dynamic` details, and the Edit and Continue maps.
//!
//! # Binary Layout
//!
//! All values are little-endian.
//!
//! ```text
//! blob   := global_header record*
//! global_header := version:u8 (= 4) count:u8 reserved:u8[2]
//! record := version:u8 kind:u8 reserved:u8 alignment:u8 size:i32 body:u8[size - 8]
//! ```
//!
//! A blob with any other global version contains no records. Records are framed by their
//! declared size, the `count` byte is informational only.
//!
//! | kind | record | body |
//! |---|---|---|
//! | 0 | `UsingInfo` | `count:i16, count x i16` |
//! | 1 | `ForwardInfo` | `token:i32` |
//! | 2 | `ForwardToModuleInfo` | `token:i32` |
//! | 3 | `StateMachineHoistedLocalScopes` | `count:i32, count x (start:i32, end:i32)` |
//! | 4 | `ForwardIterator` | NUL-terminated UTF-16 |
//! | 5 | `DynamicLocals` | `count:i32, count x (flags:u8[64], flag_count:i32, slot:i32, name:u16[64])` |
//! | 6 | `EditAndContinueLocalSlotMap` | compressed integer stream, see [`encmap`] |
//! | 7 | `EditAndContinueLambdaMap` | compressed integer stream, see [`encmap`] |
//! | 8 | `TupleElementNames` | `count:i32, count x (n:i32, n x utf8z, slot:i32, start:i32, end:i32, name:utf8z)` |
//!
//! # Key Components
//!
//! - [`parse_records`] - Frames a blob into [`CustomDebugInfoRecord`]s
//! - [`decode_record`] - Decodes any record into a [`CustomDebugInfo`]
//! - `decode_*` - Per-kind payload decoders
//! - [`disambiguate_dynamic_locals`] - Resolves the slot 0 ambiguity of `DynamicLocals`
//! - [`MethodDebugInfo`] - Everything known about one method, forward links resolved
//! - [`write_custom_debug_info_xml`] - Human readable dump of a blob
//!
//! # Usage Examples
//!
//! ```rust
//! use cdiscope::metadata::customdebuginfo::{decode_record, parse_records, CustomDebugInfo};
//!
//! let blob = [
//!     4, 1, 0, 0, // global header
//!     4, 0, 0, 0, 12, 0, 0, 0, // UsingInfo, 12 bytes
//!     1, 0, 3, 0,
//! ];
//!
//! for record in parse_records(&blob)? {
//!     if let CustomDebugInfo::UsingInfo(counts) = decode_record(&record?)? {
//!         assert_eq!(counts, vec![3]);
//!     }
//! }
//! # Ok::<(), cdiscope::Error>(())
//! ```

pub mod decoders;
pub mod dynamic;
pub mod encmap;
mod methodinfo;
pub mod records;
pub mod types;
mod xml;

pub use decoders::{
    decode_dynamic_locals_record, decode_forward_iterator_record, decode_forward_record,
    decode_forward_to_module_record, decode_record,
    decode_state_machine_hoisted_local_scopes_record, decode_tuple_element_names_record,
    decode_using_record, CustomDebugInfo,
};
pub use dynamic::{disambiguate_dynamic_locals, DynamicLocalMap, LocalScope, ScopeLocal};
pub use encmap::{
    decode_lambda_map, decode_local_slot_map, ClosureDebugInfo, LambdaDebugInfo, LambdaMap,
    LocalSlotDebugInfo, LocalSlotKind, STATIC_CLOSURE_ORDINAL, THIS_ONLY_CLOSURE_ORDINAL,
};
pub use methodinfo::MethodDebugInfo;
pub use records::{
    find_record, parse_records, read_global_header, read_record_header, CustomDebugInfoRecords,
};
pub use types::{
    CustomDebugInfoKind, CustomDebugInfoRecord, DynamicLocalBucket, GlobalHeader,
    HoistedLocalScope, RecordHeader, TupleElementNamesInfo, CDI_VERSION, CONSTANT_SLOT_ID,
};
pub use xml::write_custom_debug_info_xml;
