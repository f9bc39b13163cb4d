// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # cdiscope
//!
//! A decoder for the "custom debug info" blobs that compilers attach to methods in native
//! (Windows) PDB files, and for the C# and Visual Basic import strings that go with them.
//!
//! `cdiscope` does not read PDB files itself. A PDB reader hands it raw per-method blobs
//! and import string lists through the [`MethodDebugInfoProvider`] trait, keyed by method
//! token and method version; `cdiscope` turns them into structured data.
//!
//! ## Features
//!
//! - **Zero-copy framing** - Records are borrowed views into the caller's blob
//! - **All record kinds** - Using info, forwards, state machine scopes, `dynamic` locals,
//!   tuple element names and the Edit and Continue maps
//! - **Import resolution** - C# using groups and VB imports with forward links followed
//! - **Strict errors** - Corrupt data is always an [`Error`]; missing data is `None`
//!
//! ## Quick Start
//!
//! ```rust
//! use cdiscope::prelude::*;
//!
//! let blob = [
//!     4, 2, 0, 0, // global header: version 4, two records
//!     4, 0, 0, 0, 12, 0, 0, 0, 1, 0, 2, 0, // UsingInfo: one scope with two usings
//!     4, 1, 0, 0, 12, 0, 0, 0, 7, 0, 0, 6, // ForwardInfo: 0x06000007
//! ];
//!
//! for record in parse_records(&blob)? {
//!     match decode_record(&record?)? {
//!         CustomDebugInfo::UsingInfo(counts) => assert_eq!(counts, vec![2]),
//!         CustomDebugInfo::ForwardInfo(token) => assert_eq!(token, Token(0x0600_0007)),
//!         other => println!("{:?}", other),
//!     }
//! }
//! # Ok::<(), cdiscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata::customdebuginfo`] - Record framing, payload decoders, `dynamic` local
//!   disambiguation, per-method aggregation and the XML dump
//! - [`metadata::importstrings`] - Import string parsers and per-method import resolution
//! - [`Parser`] - The bounds-checked byte cursor all decoders are built on
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! Soft failures (unsupported blob versions, methods without debug info, skipped import
//! strings, dropped `dynamic` buckets) are reported as [`tracing`] events at `debug` and
//! `warn` level. No subscriber is installed by the library.

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// ```rust
/// use cdiscope::prelude::*;
///
/// let record = try_parse_csharp_import_string("USystem").unwrap();
/// assert_eq!(record.kind, ImportTargetKind::Namespace);
/// ```
pub mod prelude;

/// Custom debug info records and import strings.
pub mod metadata;

/// `cdiscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cdiscope` Error type
///
/// See [`Error`] for the individual variants.
pub use error::Error;

/// Bounds-checked cursor over a byte slice
pub use file::parser::Parser;

/// Little-endian primitive reads
pub use file::io::{read_le, read_le_at, LeRead};

/// Reader configuration
pub use metadata::config::ReaderConfig;

/// Metadata token
pub use metadata::token::Token;

/// Record framing and decoding
pub use metadata::customdebuginfo::{
    decode_record, disambiguate_dynamic_locals, find_record, parse_records,
    write_custom_debug_info_xml, CustomDebugInfo, CustomDebugInfoKind, CustomDebugInfoRecord,
    MethodDebugInfo,
};

/// Import strings and their resolution
pub use metadata::importstrings::{
    get_csharp_grouped_import_strings, get_visual_basic_import_strings,
    try_parse_csharp_import_string, try_parse_visual_basic_import_string, GroupedImportStrings,
    ImportRecord, MethodDebugInfoProvider,
};
