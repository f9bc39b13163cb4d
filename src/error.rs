use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! invalid_header_error {
    ($msg:expr) => {
        crate::Error::InvalidHeader {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidHeader {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Absence of debug information is *not* an error: an unsupported blob version, a method
/// without a blob or a method without a `UsingInfo` record are reported as `None` by the
/// respective APIs. The variants below are reserved for data that is present but corrupt.
///
/// # Error Categories
///
/// - [`Error::OutOfBounds`] - A primitive read would run past the end of the buffer
/// - [`Error::InvalidHeader`] - The record framing (global header / record headers) is broken
/// - [`Error::Malformed`] - Decoded records contradict each other or the import strings
/// - [`Error::Xml`] - The XML dump could not be written
///
/// # Examples
///
/// ```rust
/// use cdiscope::{parse_records, Error};
///
/// match parse_records(&[4, 0]) {
///     Err(Error::InvalidHeader { message, .. }) => println!("bad blob: {}", message),
///     Err(e) => println!("other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An out of bound access was attempted while decoding.
    ///
    /// Every primitive read is bounds-checked; running past the end of a record body or
    /// blob indicates a truncated or corrupt input.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The record framing of a custom debug info blob is invalid.
    ///
    /// Raised for blobs shorter than the global header, record sizes smaller than the
    /// record header, bodies that extend past the blob, or invalid alignment padding.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the violated framing rule
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid header - {file}:{line}: {message}")]
    InvalidHeader {
        /// The message to be printed for the InvalidHeader error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The debug information is structurally readable but semantically inconsistent.
    ///
    /// Examples are duplicate `UsingInfo` records, conflicting forward records, group
    /// sizes that do not match the import strings, or invalid compressed integers.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Writing the XML representation of the records failed.
    #[error("XML output failed - {0}")]
    Xml(String),
}
