//! Low-level, bounds-checked little-endian reads over byte buffers.
//!
//! Custom debug information is stored in little-endian byte order regardless of the host,
//! so every multi-byte value is assembled explicitly from its bytes. The functions in this
//! module operate on an immutable buffer and an external, caller-owned offset which is
//! advanced by the width of the value that was read.
//!
//! # Key Components
//!
//! - [`crate::file::io::LeRead`] - Trait implemented by the primitive types that can be read
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at an offset and advance the offset
//!
//! # Examples
//!
//! ```rust
//! use cdiscope::read_le_at;
//!
//! let data = [0x03, 0x00, 0x01, 0x00, 0x00, 0x06];
//! let mut offset = 0;
//!
//! let count: i16 = read_le_at(&data, &mut offset)?;
//! let token: i32 = read_le_at(&data, &mut offset)?;
//! assert_eq!(count, 3);
//! assert_eq!(token, 0x0600_0001);
//! assert_eq!(offset, 6);
//! # Ok::<(), cdiscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All reads return [`crate::Error::OutOfBounds`] if `offset + width` exceeds the buffer
//! length. The offset is left untouched in that case.

use crate::Result;

/// Primitive values that can be decoded from little-endian bytes.
///
/// The `Bytes` associated type is the fixed-size array for the value (e.g. `[u8; 4]`
/// for `i32`), which keeps the width of every read known at compile time.
pub trait LeRead: Sized {
    /// Byte array holding the encoded value
    type Bytes: for<'a> TryFrom<&'a [u8]>;

    /// Encoded width in bytes
    const WIDTH: usize;

    /// Assemble the value from its little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_le_read {
    ($($ty:ty),* $(,)?) => {
        $(
            impl LeRead for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_le_read!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Reads a value of type `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T::WIDTH`.
pub fn read_le<T: LeRead>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a value of type `T` at `*offset` and advances the offset by `T::WIDTH`.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Position of the value; advanced past it on success
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit in the remaining data.
pub fn read_le_at<T: LeRead>(data: &[u8], offset: &mut usize) -> Result<T> {
    let Some(end) = offset.checked_add(T::WIDTH) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(bytes) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;
    Ok(T::from_le_bytes(bytes))
}
