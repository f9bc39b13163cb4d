//! Import strings of native PDB methods.
//!
//! Native PDBs store the `using` / `Imports` declarations in scope of a method as a flat
//! list of short strings in two compiler-specific syntaxes:
//!
//! - **C#** ([`try_parse_csharp_import_string`]): one prefix letter per entry, grouped
//!   into namespace scopes by the method's `UsingInfo` record
//! - **Visual Basic** ([`try_parse_visual_basic_import_string`]): richer entries with
//!   file / project scope qualifiers, aliases and XML namespaces
//!
//! [`get_csharp_grouped_import_strings`] and [`get_visual_basic_import_strings`] resolve
//! the strings for a method through a [`MethodDebugInfoProvider`], following at most one
//! forward link.
//!
//! # Usage Examples
//!
//! ```rust
//! use cdiscope::metadata::importstrings::{
//!     try_parse_csharp_import_string, try_parse_visual_basic_import_string, ImportScope,
//!     ImportTargetKind,
//! };
//!
//! let using = try_parse_csharp_import_string("ESystem.IO Lib").unwrap();
//! assert_eq!(using.extern_alias.as_deref(), Some("Lib"));
//!
//! let imports = try_parse_visual_basic_import_string("@FT:System.Math").unwrap();
//! assert_eq!(imports.kind, ImportTargetKind::Type);
//! assert_eq!(imports.scope, ImportScope::File);
//! ```

pub mod csharp;
pub mod resolver;
pub mod types;
pub mod visualbasic;

pub use csharp::{is_csharp_extern_alias, try_parse_csharp_import_string, try_split};
pub use resolver::{
    get_csharp_grouped_import_strings, get_csharp_grouped_import_strings_with_config,
    get_visual_basic_import_strings, read_visual_basic_imports, CSharpImports,
    GroupedImportStrings, MethodDebugInfoProvider, VisualBasicImports,
};
pub use types::{ImportRecord, ImportScope, ImportTargetKind};
pub use visualbasic::try_parse_visual_basic_import_string;
