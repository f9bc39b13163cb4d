//! Parser for Visual Basic import strings.
//!
//! | string | kind | scope |
//! |---|---|---|
//! | `` (empty) | current namespace | - |
//! | `&...`, `$...`, `#...` | defunct | - |
//! | `*Root` | default namespace `Root` | - |
//! | `@F:System` / `@P:System` | namespace | file / project |
//! | `@FT:System.Math` | type | file |
//! | `@PA:IO=System.IO` | alias | project |
//! | `@FX:p=http://ns` | XML namespace | file |
//! | `@100663297` | forward to the imports of a method token | - |
//! | anything else | current namespace, the whole string | - |

use crate::metadata::importstrings::{
    csharp::try_split,
    types::{ImportRecord, ImportScope, ImportTargetKind},
};

/// Parses a Visual Basic import string.
///
/// Returns `None` if an `@` entry ends early or lacks the `:` after its `A`, `X` or `T`
/// marker, or if an alias entry has no `=`.
///
/// # Examples
///
/// ```rust
/// use cdiscope::metadata::importstrings::{
///     try_parse_visual_basic_import_string, ImportScope, ImportTargetKind,
/// };
///
/// let record = try_parse_visual_basic_import_string("@PA:IO=System.IO").unwrap();
/// assert_eq!(record.kind, ImportTargetKind::NamespaceOrType);
/// assert_eq!(record.scope, ImportScope::Project);
/// assert_eq!(record.alias.as_deref(), Some("IO"));
/// assert_eq!(record.target.as_deref(), Some("System.IO"));
/// ```
#[must_use]
pub fn try_parse_visual_basic_import_string(import: &str) -> Option<ImportRecord> {
    let bytes = import.as_bytes();

    let Some(&first) = bytes.first() else {
        return Some(ImportRecord::new(ImportTargetKind::CurrentNamespace, ""));
    };

    match first {
        b'&' | b'$' | b'#' => Some(ImportRecord::new(ImportTargetKind::Defunct, import)),
        b'*' => Some(ImportRecord::new(
            ImportTargetKind::DefaultNamespace,
            &import[1..],
        )),
        b'@' => parse_compound(import),
        _ => Some(ImportRecord::new(ImportTargetKind::CurrentNamespace, import)),
    }
}

/// Parses an `@` entry: optional scope letter, then a kind marker and the payload.
fn parse_compound(import: &str) -> Option<ImportRecord> {
    let bytes = import.as_bytes();
    let mut position = 1;

    let scope = match bytes.get(position)? {
        b'F' => {
            position += 1;
            ImportScope::File
        }
        b'P' => {
            position += 1;
            ImportScope::Project
        }
        _ => ImportScope::Unspecified,
    };

    let record = match bytes.get(position)? {
        b'A' => {
            position = expect_colon(bytes, position + 1)?;
            let (alias, target) = try_split(import, position, '=')?;
            ImportRecord::new(ImportTargetKind::NamespaceOrType, target).with_alias(alias)
        }
        b'X' => {
            position = expect_colon(bytes, position + 1)?;
            let (alias, target) = try_split(import, position, '=')?;
            ImportRecord::new(ImportTargetKind::XmlNamespace, target).with_alias(alias)
        }
        b'T' => {
            position = expect_colon(bytes, position + 1)?;
            ImportRecord::new(ImportTargetKind::Type, import.get(position..)?)
        }
        b':' => ImportRecord::new(ImportTargetKind::Namespace, import.get(position + 1..)?),
        _ => ImportRecord::new(ImportTargetKind::MethodToken, import.get(position..)?),
    };

    Some(record.with_scope(scope))
}

/// Checks for a `:` at `position` and returns the position after it.
fn expect_colon(bytes: &[u8], position: usize) -> Option<usize> {
    (*bytes.get(position)? == b':').then_some(position + 1)
}
