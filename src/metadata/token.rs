//! Metadata token type used to identify methods across custom debug info records.
//!
//! Forward records store the token of the method whose debug information should be used
//! instead, and the import resolver keys every lookup by token and method version.
//!
//! # Token Format
//!
//! ```text
//! Bits 31-24: Table ID (0x06 = MethodDef)
//! Bits 23-0:  Row Index (1-based)
//! ```

use std::fmt;

/// Table identifier of the `MethodDef` table.
pub const METHOD_DEF_TABLE: u8 = 0x06;

/// A metadata token: an 8-bit table id and a 24-bit row index.
///
/// # Examples
///
/// ```rust
/// use cdiscope::Token;
///
/// let token = Token::new(0x0600_0002);
/// assert_eq!(token.table(), 0x06);
/// assert_eq!(token.row(), 2);
/// assert!(token.is_method_def());
/// assert_eq!(token.to_string(), "0x06000002");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from its raw 32-bit value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from the signed representation stored in forward records.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn from_i32(value: i32) -> Self {
        Token(value as u32)
    }

    /// Returns the raw 32-bit token value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the table identifier (most significant byte).
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the 1-based row index (low 24 bits).
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns `true` for the nil token.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the token refers to a row of the `MethodDef` table.
    #[must_use]
    pub fn is_method_def(&self) -> bool {
        self.table() == METHOD_DEF_TABLE && self.row() != 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parts() {
        let token = Token::new(0x0600_0001);
        assert_eq!(token.value(), 0x0600_0001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
        assert!(token.is_method_def());

        let field = Token(0x0400_0003);
        assert!(!field.is_method_def());
        assert!(!Token(0x0600_0000).is_method_def());
    }

    #[test]
    fn test_token_from_i32() {
        assert_eq!(Token::from_i32(0x0600_0005).value(), 0x0600_0005);
        assert_eq!(Token::from_i32(-1).value(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token::default().is_null());
        assert!(!Token(0x0600_0001).is_null());
    }

    #[test]
    fn test_token_display_and_debug() {
        let token = Token(0x0600_0001);
        assert_eq!(format!("{}", token), "0x06000001");

        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn test_token_conversion() {
        let token: Token = 0x0600_0010u32.into();
        let back: u32 = token.into();
        assert_eq!(back, 0x0600_0010);
    }
}
