//! Per-method debug metadata of native PDB files.
//!
//! # Key Components
//!
//! - [`customdebuginfo`] - The binary custom debug info records attached to each method
//! - [`importstrings`] - The C# and Visual Basic import strings and their resolution
//! - [`token`] - Metadata tokens identifying methods
//! - [`config`] - Reader configuration presets
//!
//! # Examples
//!
//! ```rust
//! use std::borrow::Cow;
//! use cdiscope::{
//!     metadata::customdebuginfo::MethodDebugInfo, MethodDebugInfoProvider, ReaderConfig, Token,
//! };
//!
//! struct Pdb;
//!
//! impl MethodDebugInfoProvider for Pdb {
//!     fn custom_debug_info(&self, _: Token, _: i32) -> Option<Cow<'_, [u8]>> {
//!         // ForwardIterator "<M>d__0"
//!         let mut blob = vec![4, 1, 0, 0, 4, 4, 0, 0, 24, 0, 0, 0];
//!         blob.extend("<M>d__0\0".encode_utf16().flat_map(u16::to_le_bytes));
//!         Some(Cow::Owned(blob))
//!     }
//!
//!     fn import_strings(&self, _: Token, _: i32) -> Vec<String> {
//!         Vec::new()
//!     }
//! }
//!
//! let info = MethodDebugInfo::read(&Pdb, Token(0x0600_0001), 1, &ReaderConfig::default())?
//!     .unwrap();
//! assert_eq!(info.state_machine_type_name.as_deref(), Some("<M>d__0"));
//! assert!(info.imports.is_none());
//! # Ok::<(), cdiscope::Error>(())
//! ```

/// Reader configuration
pub mod config;
/// Custom debug info record framing and decoding
pub mod customdebuginfo;
/// Import string parsing and resolution
pub mod importstrings;
/// Commonly used metadata token type
pub mod token;
