//! Byte-level decoding primitives.
//!
//! Everything above this module works on borrowed byte slices handed in by the caller;
//! nothing here owns or maps data.
//!
//! # Key Components
//!
//! - [`crate::file::io`] - Free functions reading little-endian primitives at an external offset
//! - [`crate::file::parser::Parser`] - Cursor with an internal position, UTF-16/UTF-8 string
//!   readers and ECMA-335 compressed integers

pub mod io;
pub mod parser;
