//! Per-method import resolution.
//!
//! Import strings are stored flat per method, while the namespace scope structure lives
//! in the method's `UsingInfo` record. C# methods frequently share this information: a
//! `ForwardInfo` record points at the method holding the using information, a
//! `ForwardToModuleInfo` record points at the method holding the module-level extern
//! aliases. Visual Basic methods forward through an `@<token>` import string instead.
//!
//! Only a single forward hop is followed in either language. A forward found on the
//! target of a forward is not followed again.

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::{
    metadata::{
        config::ReaderConfig,
        customdebuginfo::{
            decoders::{
                decode_forward_record, decode_forward_to_module_record, decode_using_record,
            },
            records::parse_records,
            types::CustomDebugInfoKind,
        },
        importstrings::{
            csharp::{is_csharp_extern_alias, try_parse_csharp_import_string},
            types::{ImportRecord, ImportScope, ImportTargetKind},
            visualbasic::try_parse_visual_basic_import_string,
        },
        token::Token,
    },
    Result,
};

/// Source of per-method debug information, usually backed by a PDB reader.
///
/// Both lookups are keyed by method token and method version (1 for methods that were
/// never edited). Implementations may cache freely; the resolver never holds on to
/// returned data beyond a single call.
pub trait MethodDebugInfoProvider {
    /// Returns the raw custom debug info blob of a method, or `None` if it has none.
    fn custom_debug_info(&self, token: Token, version: i32) -> Option<Cow<'_, [u8]>>;

    /// Returns the flat list of import strings of a method.
    fn import_strings(&self, token: Token, version: i32) -> Vec<String>;
}

impl<P: MethodDebugInfoProvider + ?Sized> MethodDebugInfoProvider for &P {
    fn custom_debug_info(&self, token: Token, version: i32) -> Option<Cow<'_, [u8]>> {
        (**self).custom_debug_info(token, version)
    }

    fn import_strings(&self, token: Token, version: i32) -> Vec<String> {
        (**self).import_strings(token, version)
    }
}

/// Import strings of a C# method grouped by namespace scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupedImportStrings {
    /// One group per enclosing namespace scope, innermost first
    pub groups: Vec<Vec<String>>,
    /// Module-level extern alias strings (`Z` entries)
    pub extern_aliases: Vec<String>,
}

impl GroupedImportStrings {
    /// Parses every string into an [`ImportRecord`].
    ///
    /// Unparseable strings are skipped, or reported when
    /// [`ReaderConfig::strict_import_strings`] is set.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for unparseable strings in strict mode.
    pub fn parse(&self, config: &ReaderConfig) -> Result<CSharpImports> {
        let groups = self
            .groups
            .iter()
            .map(|group| parse_all(group, try_parse_csharp_import_string, config))
            .collect::<Result<Vec<_>>>()?;
        let extern_aliases =
            parse_all(&self.extern_aliases, try_parse_csharp_import_string, config)?;

        Ok(CSharpImports {
            groups,
            extern_aliases,
        })
    }
}

/// Parsed C# imports of a method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CSharpImports {
    /// One group per enclosing namespace scope, innermost first
    pub groups: Vec<Vec<ImportRecord>>,
    /// Module-level extern aliases
    pub extern_aliases: Vec<ImportRecord>,
}

/// Parsed Visual Basic imports of a method.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisualBasicImports {
    /// Imports declared in the source file, including unscoped entries
    pub file_level: Vec<ImportRecord>,
    /// Imports declared in the project options
    pub project_level: Vec<ImportRecord>,
    /// The project's root namespace (`*` entry)
    pub default_namespace: Option<String>,
    /// The namespace containing the method
    pub current_namespace: Option<String>,
}

/// Resolves the grouped C# import strings of a method.
///
/// Returns `Ok(None)` if the method (or the method it forwards to) has no custom debug
/// info or no `UsingInfo` record.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the records or import strings contradict each
/// other, and propagates framing and decoding errors.
///
/// # Examples
///
/// ```rust
/// use std::borrow::Cow;
/// use cdiscope::{get_csharp_grouped_import_strings, MethodDebugInfoProvider, Token};
///
/// struct Single;
///
/// impl MethodDebugInfoProvider for Single {
///     fn custom_debug_info(&self, _: Token, _: i32) -> Option<Cow<'_, [u8]>> {
///         // UsingInfo: two scopes with one using each
///         Some(Cow::Owned(vec![4, 1, 0, 0, 4, 0, 0, 0, 16, 0, 0, 0, 2, 0, 1, 0, 1, 0, 0, 0]))
///     }
///
///     fn import_strings(&self, _: Token, _: i32) -> Vec<String> {
///         vec!["USystem.IO".into(), "USystem".into()]
///     }
/// }
///
/// let grouped = get_csharp_grouped_import_strings(&Single, Token(0x0600_0001), 1)?.unwrap();
/// assert_eq!(grouped.groups, vec![vec!["USystem.IO"], vec!["USystem"]]);
/// assert!(grouped.extern_aliases.is_empty());
/// # Ok::<(), cdiscope::Error>(())
/// ```
pub fn get_csharp_grouped_import_strings<P: MethodDebugInfoProvider + ?Sized>(
    provider: &P,
    token: Token,
    version: i32,
) -> Result<Option<GroupedImportStrings>> {
    get_csharp_grouped_import_strings_with_config(
        provider,
        token,
        version,
        &ReaderConfig::default(),
    )
}

/// [`get_csharp_grouped_import_strings`] with an explicit configuration.
///
/// With [`ReaderConfig::resolve_forward_links`] disabled, `ForwardInfo` records are
/// ignored and the method's own using information is used.
///
/// # Errors
/// See [`get_csharp_grouped_import_strings`].
pub fn get_csharp_grouped_import_strings_with_config<P: MethodDebugInfoProvider + ?Sized>(
    provider: &P,
    mut token: Token,
    version: i32,
    config: &ReaderConfig,
) -> Result<Option<GroupedImportStrings>> {
    let mut group_sizes: Option<Vec<i16>> = None;
    let mut module_aliases: Option<Vec<String>> = None;
    let mut seen_forward = false;

    'retry: loop {
        let Some(blob) = provider.custom_debug_info(token, version) else {
            debug!(%token, version, "method has no custom debug info");
            return Ok(None);
        };

        let mut forward_in_blob = false;
        let mut records = parse_records(&blob)?;
        while let Some(record) = records.next() {
            let record = record?;
            match record.kind {
                CustomDebugInfoKind::UsingInfo => {
                    if group_sizes.is_some() {
                        return Err(malformed_error!(
                            "Expected at most one UsingInfo record for method {}",
                            token
                        ));
                    }
                    group_sizes = Some(decode_using_record(record.data)?);
                }
                CustomDebugInfoKind::ForwardInfo => {
                    if module_aliases.is_some() {
                        return Err(malformed_error!(
                            "Method {} has both ForwardInfo and ForwardToModuleInfo records",
                            token
                        ));
                    }
                    forward_in_blob = true;
                    if !config.resolve_forward_links {
                        continue;
                    }

                    let target = decode_forward_record(record.data)?;
                    if seen_forward {
                        debug!(%token, %target, "not following a second forward link");
                        token = target;
                        continue;
                    }

                    for rest in records.by_ref() {
                        if rest?.kind == CustomDebugInfoKind::ForwardToModuleInfo {
                            return Err(malformed_error!(
                                "Method {} has both ForwardInfo and ForwardToModuleInfo records",
                                token
                            ));
                        }
                    }

                    seen_forward = true;
                    token = target;
                    continue 'retry;
                }
                CustomDebugInfoKind::ForwardToModuleInfo => {
                    if forward_in_blob {
                        return Err(malformed_error!(
                            "Method {} has both ForwardInfo and ForwardToModuleInfo records",
                            token
                        ));
                    }
                    if module_aliases.is_some() {
                        return Err(malformed_error!(
                            "Expected at most one ForwardToModuleInfo record for method {}",
                            token
                        ));
                    }

                    let module_token = decode_forward_to_module_record(record.data)?;
                    let aliases = provider
                        .import_strings(module_token, version)
                        .into_iter()
                        .filter(|import| is_csharp_extern_alias(import))
                        .collect();
                    module_aliases = Some(aliases);
                }
                _ => {}
            }
        }

        break;
    }

    let Some(group_sizes) = group_sizes else {
        debug!(%token, version, "method has no using information");
        return Ok(None);
    };

    let import_strings = provider.import_strings(token, version);
    let mut imports = import_strings.into_iter();

    let mut groups = Vec::with_capacity(group_sizes.len());
    for size in group_sizes {
        let mut group = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        for _ in 0..size {
            let Some(import) = imports.next() else {
                return Err(malformed_error!(
                    "Group sizes of method {} exceed its import strings",
                    token
                ));
            };
            if is_csharp_extern_alias(&import) {
                return Err(malformed_error!(
                    "Extern alias '{}' of method {} found inside a using group",
                    import,
                    token
                ));
            }
            group.push(import);
        }
        groups.push(group);
    }

    let extern_aliases = match module_aliases {
        Some(aliases) => {
            if let Some(extra) = imports.next() {
                return Err(malformed_error!(
                    "Unexpected import string '{}' after the using groups of method {}",
                    extra,
                    token
                ));
            }
            aliases
        }
        None => {
            let tail: Vec<String> = imports.collect();
            if let Some(bad) = tail.iter().find(|import| !is_csharp_extern_alias(import)) {
                return Err(malformed_error!(
                    "Expected only extern aliases after the using groups of method {}, found '{}'",
                    token,
                    bad
                ));
            }
            tail
        }
    };

    Ok(Some(GroupedImportStrings {
        groups,
        extern_aliases,
    }))
}

/// Returns the Visual Basic import strings of a method.
///
/// If the first string is `@` followed by a decimal method token, the import strings of
/// that method are returned instead. A forward found there is returned unresolved.
pub fn get_visual_basic_import_strings<P: MethodDebugInfoProvider + ?Sized>(
    provider: &P,
    token: Token,
    version: i32,
) -> Vec<String> {
    let import_strings = provider.import_strings(token, version);

    let forward = import_strings
        .first()
        .and_then(|first| first.strip_prefix('@'))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .and_then(|rest| rest.parse::<i32>().ok());

    match forward {
        Some(target) => {
            let target = Token::from_i32(target);
            debug!(%token, %target, "following Visual Basic import forward");
            provider.import_strings(target, version)
        }
        None => import_strings,
    }
}

/// Reads and parses the Visual Basic imports of a method.
///
/// Entries are sorted by their declaration scope. The `*` entry sets the default
/// namespace, the first plain entry the current namespace. Defunct entries are dropped
/// if [`ReaderConfig::skip_defunct_imports`] is set and kept as file-level records
/// otherwise.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for unparseable strings when
/// [`ReaderConfig::strict_import_strings`] is set.
pub fn read_visual_basic_imports<P: MethodDebugInfoProvider + ?Sized>(
    provider: &P,
    token: Token,
    version: i32,
    config: &ReaderConfig,
) -> Result<VisualBasicImports> {
    let import_strings = get_visual_basic_import_strings(provider, token, version);
    let records = parse_all(&import_strings, try_parse_visual_basic_import_string, config)?;

    let mut imports = VisualBasicImports::default();
    for record in records {
        match record.kind {
            ImportTargetKind::DefaultNamespace => {
                imports.default_namespace = record.target;
            }
            ImportTargetKind::CurrentNamespace => {
                if imports.current_namespace.is_none() {
                    imports.current_namespace = record.target;
                }
            }
            ImportTargetKind::Defunct if config.skip_defunct_imports => {}
            ImportTargetKind::MethodToken => {
                debug!(%token, target = ?record.target, "ignoring nested Visual Basic import forward");
            }
            _ => match record.scope {
                ImportScope::Project => imports.project_level.push(record),
                ImportScope::File | ImportScope::Unspecified => imports.file_level.push(record),
            },
        }
    }

    Ok(imports)
}

/// Parses `imports` with `parser`, skipping or rejecting failures according to `config`.
pub(crate) fn parse_all(
    imports: &[String],
    parser: fn(&str) -> Option<ImportRecord>,
    config: &ReaderConfig,
) -> Result<Vec<ImportRecord>> {
    let mut records = Vec::with_capacity(imports.len());
    for import in imports {
        match parser(import) {
            Some(record) => records.push(record),
            None if config.strict_import_strings => {
                return Err(malformed_error!("Unparseable import string '{}'", import));
            }
            None => warn!(import = %import, "skipping unparseable import string"),
        }
    }

    Ok(records)
}
