//! # cdiscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cdiscope library. Import this module to get quick access to everything needed
//! to decode custom debug info and import strings.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cdiscope operations
pub use crate::Error;

/// The result type used throughout cdiscope
pub use crate::Result;

/// Configuration for the per-method readers
pub use crate::ReaderConfig;

/// Low-level byte cursor
pub use crate::Parser;

/// Metadata token type identifying methods
pub use crate::metadata::token::Token;

// ================================================================================================
// Custom Debug Info Records
// ================================================================================================

/// Record framing
pub use crate::metadata::customdebuginfo::{
    find_record, parse_records, CustomDebugInfoKind, CustomDebugInfoRecord,
    CustomDebugInfoRecords,
};

/// Record payloads
pub use crate::metadata::customdebuginfo::{
    decode_record, CustomDebugInfo, DynamicLocalBucket, HoistedLocalScope, LambdaMap,
    LocalSlotDebugInfo, LocalSlotKind, TupleElementNamesInfo,
};

/// Per-method aggregation and `dynamic` local disambiguation
pub use crate::metadata::customdebuginfo::{
    disambiguate_dynamic_locals, DynamicLocalMap, LocalScope, MethodDebugInfo, ScopeLocal,
};

/// XML dump
pub use crate::metadata::customdebuginfo::write_custom_debug_info_xml;

// ================================================================================================
// Import Strings
// ================================================================================================

/// Import string parsers and parsed records
pub use crate::metadata::importstrings::{
    try_parse_csharp_import_string, try_parse_visual_basic_import_string, ImportRecord,
    ImportScope, ImportTargetKind,
};

/// Import resolution
pub use crate::metadata::importstrings::{
    get_csharp_grouped_import_strings, get_visual_basic_import_strings,
    read_visual_basic_imports, CSharpImports, GroupedImportStrings, MethodDebugInfoProvider,
    VisualBasicImports,
};
