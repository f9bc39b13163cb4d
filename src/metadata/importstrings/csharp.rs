//! Parser for C# import strings.
//!
//! C# stores one import per string, tagged by a single leading character:
//!
//! | string | meaning |
//! |---|---|
//! | `USystem` | `using System;` |
//! | `ESystem.IO Lib` | `using Lib::System.IO;` |
//! | `TSystem.Math` | `using static System.Math;` |
//! | `AIO USystem.IO` | `using IO = System.IO;` (also `AT..`, `AE..`) |
//! | `XLib` | `extern alias Lib;` |
//! | `ZLib Lib, Version=1.0.0.0` | module-level `extern alias` with its assembly |

use crate::metadata::importstrings::types::{ImportRecord, ImportScope, ImportTargetKind};

/// Parses a C# import string.
///
/// Returns `None` for empty strings, unknown prefixes and entries whose separator is
/// missing.
///
/// # Examples
///
/// ```rust
/// use cdiscope::metadata::importstrings::{try_parse_csharp_import_string, ImportTargetKind};
///
/// let record = try_parse_csharp_import_string("AS USystem").unwrap();
/// assert_eq!(record.kind, ImportTargetKind::Namespace);
/// assert_eq!(record.alias.as_deref(), Some("S"));
/// assert_eq!(record.target.as_deref(), Some("System"));
///
/// assert!(try_parse_csharp_import_string("").is_none());
/// ```
#[must_use]
pub fn try_parse_csharp_import_string(import: &str) -> Option<ImportRecord> {
    let mut chars = import.chars();
    let prefix = chars.next()?;
    let rest = chars.as_str();

    match prefix {
        'U' => Some(ImportRecord::new(ImportTargetKind::Namespace, rest)),
        'E' => {
            let (target, extern_alias) = try_split(rest, 0, ' ')?;
            Some(
                ImportRecord::new(ImportTargetKind::Namespace, target)
                    .with_extern_alias(extern_alias),
            )
        }
        'T' => Some(ImportRecord::new(ImportTargetKind::Type, rest)),
        'A' => {
            let (alias, aliased) = try_split(rest, 0, ' ')?;
            let record = parse_alias_target(aliased)?;
            Some(record.with_alias(alias))
        }
        'X' => Some(ImportRecord {
            alias: Some(rest.to_string()),
            extern_alias: None,
            target: None,
            kind: ImportTargetKind::Assembly,
            scope: ImportScope::Unspecified,
        }),
        'Z' => {
            let (alias, assembly) = try_split(rest, 0, ' ')?;
            Some(ImportRecord::new(ImportTargetKind::Assembly, assembly).with_alias(alias))
        }
        _ => None,
    }
}

/// Parses the target of an `A` entry, which is itself a `U`, `T` or `E` import.
fn parse_alias_target(aliased: &str) -> Option<ImportRecord> {
    let mut chars = aliased.chars();
    let prefix = chars.next()?;
    let rest = chars.as_str();

    match prefix {
        'U' => Some(ImportRecord::new(ImportTargetKind::Namespace, rest)),
        'T' => Some(ImportRecord::new(ImportTargetKind::Type, rest)),
        'E' => {
            let (target, extern_alias) = try_split(rest, 0, ' ')?;
            Some(
                ImportRecord::new(ImportTargetKind::Namespace, target)
                    .with_extern_alias(extern_alias),
            )
        }
        _ => None,
    }
}

/// Splits `input` at the first `separator` found at or after byte offset `start`.
///
/// The first half runs from `start` to the separator, the second half from the separator
/// to the end of `input`. Both halves may be empty. Returns `None` if there is no
/// separator in range or `start` is not a character boundary.
///
/// # Examples
///
/// ```rust
/// use cdiscope::metadata::importstrings::try_split;
///
/// assert_eq!(try_split("a b c", 0, ' '), Some(("a", "b c")));
/// assert_eq!(try_split("@A:x=y", 3, '='), Some(("x", "y")));
/// assert_eq!(try_split(" b", 0, ' '), Some(("", "b")));
/// assert_eq!(try_split("abc", 0, ' '), None);
/// ```
#[must_use]
pub fn try_split(input: &str, start: usize, separator: char) -> Option<(&str, &str)> {
    let tail = input.get(start..)?;
    let position = tail.find(separator)?;
    Some((&tail[..position], &tail[position + separator.len_utf8()..]))
}

/// Returns `true` if `import` is a module-level extern alias entry (`Z` prefix).
#[must_use]
pub fn is_csharp_extern_alias(import: &str) -> bool {
    import.starts_with('Z')
}
