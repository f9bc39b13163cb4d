//! Type definitions for parsed import strings.
//!
//! See the parent module [`crate::metadata::importstrings`] for both surface syntaxes.
//!
//! # Thread Safety
//!
//! All types are [`Send`] and [`Sync`], containing only owned data.

use strum::{Display, EnumCount, EnumIter};

/// What an import string brings into scope.
///
/// # Examples
///
/// ```rust
/// use cdiscope::metadata::importstrings::ImportTargetKind;
///
/// assert_eq!(ImportTargetKind::Namespace.to_string(), "Namespace");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum ImportTargetKind {
    /// A namespace (`using System;`)
    Namespace,
    /// A type (`using static System.Math;`)
    Type,
    /// A namespace or type, not distinguished by the writer (VB aliases)
    NamespaceOrType,
    /// An extern alias, the target (if any) is the assembly name
    Assembly,
    /// An XML namespace prefix (VB `Imports <xmlns:p="...">`)
    XmlNamespace,
    /// A forward to the imports of another method, the target is its token
    MethodToken,
    /// The namespace containing the method
    CurrentNamespace,
    /// The project's default (root) namespace
    DefaultNamespace,
    /// An obsolete entry kept for compatibility, the target is the whole string
    Defunct,
}

/// Scope at which a VB import was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumCount)]
pub enum ImportScope {
    /// No scope given (every C# import, plain VB entries)
    #[default]
    Unspecified,
    /// Declared in the source file
    File,
    /// Declared in the project options
    Project,
}

/// One parsed import string.
///
/// Which fields are populated depends on [`ImportRecord::kind`]:
///
/// | kind | `alias` | `extern_alias` | `target` |
/// |---|---|---|---|
/// | `Namespace` | optional | optional | namespace |
/// | `Type` | optional | - | type |
/// | `Assembly` | alias name | - | assembly (module level only) |
/// | `NamespaceOrType`, `XmlNamespace` | alias | - | target |
/// | `CurrentNamespace`, `DefaultNamespace`, `Defunct`, `MethodToken` | - | - | string |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportRecord {
    /// Alias introduced by the import
    pub alias: Option<String>,
    /// Extern alias qualifying the target namespace
    pub extern_alias: Option<String>,
    /// Imported entity
    pub target: Option<String>,
    /// Kind of the imported entity
    pub kind: ImportTargetKind,
    /// Declaration scope
    pub scope: ImportScope,
}

impl ImportRecord {
    /// Creates an unscoped record with just a kind and target.
    pub fn new(kind: ImportTargetKind, target: impl Into<String>) -> Self {
        ImportRecord {
            alias: None,
            extern_alias: None,
            target: Some(target.into()),
            kind,
            scope: ImportScope::Unspecified,
        }
    }

    /// Sets the alias of this record.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the extern alias of this record.
    #[must_use]
    pub fn with_extern_alias(mut self, extern_alias: impl Into<String>) -> Self {
        self.extern_alias = Some(extern_alias.into());
        self
    }

    /// Sets the declaration scope of this record.
    #[must_use]
    pub fn with_scope(mut self, scope: ImportScope) -> Self {
        self.scope = scope;
        self
    }

    /// Returns `true` for extern alias declarations.
    #[must_use]
    pub fn is_extern_alias(&self) -> bool {
        self.kind == ImportTargetKind::Assembly
    }
}
