/// Configuration for reading per-method debug information.
///
/// Framing and record decoding are never configurable: corrupt blobs always fail. The
/// switches below only control how the higher-level readers treat unusual but decodable
/// content, such as import strings that do not match either syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Treat import strings that cannot be parsed as an error instead of skipping them
    pub strict_import_strings: bool,

    /// Drop defunct VB import entries (`&`, `$`, `#` prefixes) from parsed import groups
    pub skip_defunct_imports: bool,

    /// Follow the single `ForwardInfo` hop when resolving C# import groups
    /// (when disabled, a forwarding method yields its own using groups, if any)
    pub resolve_forward_links: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            strict_import_strings: false,
            skip_defunct_imports: true,
            resolve_forward_links: true,
        }
    }
}

impl ReaderConfig {
    /// Creates a strict configuration for validating PDBs produced by a known compiler
    ///
    /// Unparseable import strings are reported as [`crate::Error::Malformed`].
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_import_strings: true,
            skip_defunct_imports: true,
            resolve_forward_links: true,
        }
    }

    /// Creates a lenient configuration suitable for debugger-style consumers
    ///
    /// Matches the default: anything that can not be understood is skipped and logged.
    #[must_use]
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Creates a configuration that keeps every decodable entry, including defunct ones
    #[must_use]
    pub fn raw() -> Self {
        Self {
            strict_import_strings: false,
            skip_defunct_imports: false,
            resolve_forward_links: false,
        }
    }
}
