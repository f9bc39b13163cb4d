//! Cursor-based byte stream parser for custom debug information payloads.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a bounds-checked cursor over
//! a borrowed byte slice. Each record payload decoder creates a fresh parser over the record
//! body, so offsets always start at 0 relative to the body.
//!
//! # Key Components
//!
//! ## Navigation Methods
//! - [`crate::file::parser::Parser::pos`] - Get current position
//! - [`crate::file::parser::Parser::advance_by`] - Move forward by a number of bytes
//! - [`crate::file::parser::Parser::remaining`] - Bytes left after the cursor
//!
//! ## Data Access Methods
//! - [`crate::file::parser::Parser::read_le`] - Read little-endian primitives
//! - [`crate::file::parser::Parser::read_compressed_uint`] - ECMA-335 compressed unsigned integers
//! - [`crate::file::parser::Parser::read_utf16_nul_terminated`] - UTF-16 code units up to a NUL
//! - [`crate::file::parser::Parser::read_utf16_fixed`] - Fixed-width UTF-16 field
//! - [`crate::file::parser::Parser::read_utf8_nul_terminated`] - UTF-8 bytes up to a NUL
//!
//! # Usage Examples
//!
//! ```rust
//! use cdiscope::Parser;
//!
//! // bucket count followed by "ab\0" as UTF-16
//! let data = [0x01, 0x00, 0x00, 0x00, 0x61, 0x00, 0x62, 0x00, 0x00, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_le::<i32>()?, 1);
//! assert_eq!(parser.read_utf16_nul_terminated()?, "ab");
//! assert!(!parser.has_more_data());
//! # Ok::<(), cdiscope::Error>(())
//! ```

use widestring::U16String;

use crate::{
    file::io::{read_le_at, LeRead},
    Result,
};

/// A bounds-checked binary cursor over a borrowed byte slice.
///
/// `Parser` never copies the underlying data and never reads past its end; every failed
/// read returns [`crate::Error::OutOfBounds`].
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cdiscope::Parser;
    /// let data = [0x01, 0x02, 0x03, 0x04];
    /// let parser = Parser::new(&data);
    /// assert_eq!(parser.len(), 4);
    /// ```
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of bytes between the cursor and the end of the data.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// Advancing exactly to the end of the data is allowed.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by `step` would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(out_of_bounds_error!());
        }

        self.position += step;
        Ok(())
    }

    /// Read a value of type `T` in little-endian format and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `T` would exceed the data length.
    pub fn read_le<T: LeRead>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a compressed unsigned integer as defined in ECMA-335 II.23.2.
    ///
    /// The encoding uses 1, 2 or 4 bytes depending on the high bits of the first byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncation, or [`crate::Error::Malformed`]
    /// if the first byte does not start a valid encoding.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok(value);
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok(value);
        }

        Err(malformed_error!(
            "Invalid compressed uint - {:#04x} at offset {}",
            first_byte,
            self.position - 1
        ))
    }

    /// Read a compressed unsigned integer and return it as `i32`.
    ///
    /// Compressed integers never exceed `0x1FFF_FFFF`, so the conversion is lossless.
    ///
    /// # Errors
    /// See [`Parser::read_compressed_uint`].
    pub fn read_compressed_i32(&mut self) -> Result<i32> {
        let value = self.read_compressed_uint()?;
        i32::try_from(value).map_err(|_| malformed_error!("Compressed value {} exceeds i32", value))
    }

    /// Read UTF-16 code units up to (and consuming) a zero code unit.
    ///
    /// The terminator is the only stop condition; a missing terminator runs into the end of
    /// the data and fails.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no zero code unit is found.
    pub fn read_utf16_nul_terminated(&mut self) -> Result<String> {
        let mut units = Vec::new();
        loop {
            let unit = self.read_le::<u16>()?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }

        Ok(U16String::from_vec(units).to_string_lossy())
    }

    /// Read a fixed-width UTF-16 field of `unit_count` code units.
    ///
    /// Decoding stops at the first zero code unit, but the cursor always moves past the
    /// whole field. Without a terminator all `unit_count` units are part of the string.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the field extends past the data.
    pub fn read_utf16_fixed(&mut self, unit_count: usize) -> Result<String> {
        let width = unit_count
            .checked_mul(2)
            .ok_or_else(|| out_of_bounds_error!())?;
        if width > self.remaining() {
            return Err(out_of_bounds_error!());
        }

        let field_end = self.position + width;
        let mut units = Vec::with_capacity(unit_count);
        while self.position < field_end {
            let unit = self.read_le::<u16>()?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        self.position = field_end;

        Ok(U16String::from_vec(units).to_string_lossy())
    }

    /// Read UTF-8 bytes up to (and consuming) a zero byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if there is no terminator, or
    /// [`crate::Error::Malformed`] if the bytes are not valid UTF-8.
    pub fn read_utf8_nul_terminated(&mut self) -> Result<String> {
        let start = self.position;
        let Some(length) = self.data[start..].iter().position(|&b| b == 0) else {
            return Err(out_of_bounds_error!());
        };

        let string_data = &self.data[start..start + length];
        self.position = start + length + 1;

        String::from_utf8(string_data.to_vec()).map_err(|e| {
            malformed_error!(
                "Invalid UTF-8 string at offset {}-{}: {}",
                start,
                start + length,
                e.utf8_error()
            )
        })
    }
}
