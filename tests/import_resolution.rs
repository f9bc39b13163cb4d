//! Integration tests for import string parsing and per-method import resolution.
//!
//! Methods are served from an in-memory map standing in for a PDB reader.

use cdiscope::{
    metadata::{
        customdebuginfo::{DynamicLocalBucket, CONSTANT_SLOT_ID},
        importstrings::get_csharp_grouped_import_strings_with_config,
    },
    prelude::*,
};
use std::{borrow::Cow, collections::HashMap};

const MAIN: Token = Token(0x0600_0001);
const FORWARDED: Token = Token(0x0600_0002);
const SECOND_HOP: Token = Token(0x0600_0003);
const MODULE: Token = Token(0x0600_0004);

#[derive(Default)]
struct Pdb {
    blobs: HashMap<Token, Vec<u8>>,
    imports: HashMap<Token, Vec<String>>,
}

impl Pdb {
    fn method(mut self, token: Token, records: &[Vec<u8>], imports: &[&str]) -> Self {
        let mut blob = vec![4, records.len() as u8, 0, 0];
        for record in records {
            blob.extend_from_slice(record);
        }
        self.blobs.insert(token, blob);
        self.imports(token, imports)
    }

    fn imports(mut self, token: Token, imports: &[&str]) -> Self {
        self.imports
            .insert(token, imports.iter().map(|s| s.to_string()).collect());
        self
    }
}

impl MethodDebugInfoProvider for Pdb {
    fn custom_debug_info(&self, token: Token, _version: i32) -> Option<Cow<'_, [u8]>> {
        self.blobs.get(&token).map(|blob| Cow::Borrowed(blob.as_slice()))
    }

    fn import_strings(&self, token: Token, _version: i32) -> Vec<String> {
        self.imports.get(&token).cloned().unwrap_or_default()
    }
}

fn using(counts: &[i16]) -> Vec<u8> {
    let mut body = (counts.len() as i16).to_le_bytes().to_vec();
    for count in counts {
        body.extend_from_slice(&count.to_le_bytes());
    }
    if body.len() % 4 != 0 {
        body.extend_from_slice(&[0, 0]);
    }
    record(0, &body)
}

fn forward(target: Token) -> Vec<u8> {
    record(1, &target.value().to_le_bytes())
}

fn forward_to_module(target: Token) -> Vec<u8> {
    record(2, &target.value().to_le_bytes())
}

fn record(kind: u8, body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![4, kind, 0, 0];
    bytes.extend_from_slice(&(8 + body.len() as i32).to_le_bytes());
    bytes.extend_from_slice(body);
    bytes
}

fn groups(grouped: &GroupedImportStrings) -> Vec<Vec<&str>> {
    grouped
        .groups
        .iter()
        .map(|group| group.iter().map(String::as_str).collect())
        .collect()
}

/// The C# import string forms a compiler emits.
#[test]
fn test_csharp_import_strings() {
    let namespace = try_parse_csharp_import_string("USystem").unwrap();
    assert_eq!(namespace.kind, ImportTargetKind::Namespace);
    assert_eq!(namespace.target.as_deref(), Some("System"));
    assert!(namespace.alias.is_none());

    let aliased = try_parse_csharp_import_string("AS USystem").unwrap();
    assert_eq!(aliased.kind, ImportTargetKind::Namespace);
    assert_eq!(aliased.alias.as_deref(), Some("S"));
    assert_eq!(aliased.target.as_deref(), Some("System"));

    let module_alias = try_parse_csharp_import_string("ZOldLib assembly").unwrap();
    assert_eq!(module_alias.kind, ImportTargetKind::Assembly);
    assert_eq!(module_alias.alias.as_deref(), Some("OldLib"));
    assert_eq!(module_alias.target.as_deref(), Some("assembly"));

    assert!(try_parse_csharp_import_string("").is_none());
    assert!(try_parse_csharp_import_string("QSystem").is_none());
    assert!(try_parse_csharp_import_string("ASystem").is_none());
}

/// The Visual Basic import string forms, including the bare current namespace.
#[test]
fn test_visual_basic_import_strings() {
    let current = try_parse_visual_basic_import_string("").unwrap();
    assert_eq!(current.kind, ImportTargetKind::CurrentNamespace);
    assert_eq!(current.target.as_deref(), Some(""));

    let default = try_parse_visual_basic_import_string("*MyApp").unwrap();
    assert_eq!(default.kind, ImportTargetKind::DefaultNamespace);
    assert_eq!(default.target.as_deref(), Some("MyApp"));

    let alias = try_parse_visual_basic_import_string("@PA:IO=System.IO").unwrap();
    assert_eq!(alias.kind, ImportTargetKind::NamespaceOrType);
    assert_eq!(alias.scope, ImportScope::Project);
    assert_eq!(alias.alias.as_deref(), Some("IO"));
    assert_eq!(alias.target.as_deref(), Some("System.IO"));

    let defunct = try_parse_visual_basic_import_string("&junk").unwrap();
    assert_eq!(defunct.kind, ImportTargetKind::Defunct);
    assert_eq!(defunct.target.as_deref(), Some("&junk"));

    assert!(try_parse_visual_basic_import_string("@F").is_none());
    assert!(try_parse_visual_basic_import_string("@FA").is_none());
}

/// Group sizes partition the import strings and the tail holds extern aliases.
#[test]
fn test_csharp_grouping() -> Result<()> {
    let pdb = Pdb::default().method(
        MAIN,
        &[using(&[2, 1])],
        &["USystem.IO", "ELib Lib", "USystem", "ZLib Lib, Version=1.0.0.0"],
    );

    let grouped = get_csharp_grouped_import_strings(&pdb, MAIN, 1)?.unwrap();
    assert_eq!(
        groups(&grouped),
        vec![vec!["USystem.IO", "ELib Lib"], vec!["USystem"]]
    );
    assert_eq!(grouped.extern_aliases, vec!["ZLib Lib, Version=1.0.0.0"]);

    let parsed = grouped.parse(&ReaderConfig::default())?;
    assert_eq!(parsed.groups[1][0].target.as_deref(), Some("System"));
    assert!(parsed.extern_aliases[0].is_extern_alias());
    Ok(())
}

/// Methods sharing a namespace forward to the first method's imports.
#[test]
fn test_forward_followed_once() -> Result<()> {
    let pdb = Pdb::default()
        .method(MAIN, &[forward(FORWARDED)], &[])
        .method(FORWARDED, &[using(&[1]), forward(SECOND_HOP)], &["UForwarded"])
        .method(SECOND_HOP, &[using(&[2, 2])], &["USecondHop"]);

    // group sizes come from the first hop, strings from the last token seen
    let grouped = get_csharp_grouped_import_strings(&pdb, MAIN, 1)?.unwrap();
    assert_eq!(groups(&grouped), vec![vec!["USecondHop"]]);
    assert!(grouped.extern_aliases.is_empty());
    Ok(())
}

/// Forwards are ignored when link resolution is disabled.
#[test]
fn test_forward_not_resolved() -> Result<()> {
    let pdb = Pdb::default()
        .method(MAIN, &[forward(FORWARDED), using(&[1])], &["UOwn"])
        .method(FORWARDED, &[using(&[1])], &["UForwarded"]);

    let grouped =
        get_csharp_grouped_import_strings_with_config(&pdb, MAIN, 1, &ReaderConfig::raw())?
            .unwrap();
    assert_eq!(groups(&grouped), vec![vec!["UOwn"]]);
    Ok(())
}

/// Module-level extern aliases come from the method named by ForwardToModuleInfo.
#[test]
fn test_forward_to_module() -> Result<()> {
    let pdb = Pdb::default()
        .method(MAIN, &[using(&[1]), forward_to_module(MODULE)], &["USystem"])
        .imports(MODULE, &["USystem", "ZA a.dll", "ZB b.dll"]);

    let grouped = get_csharp_grouped_import_strings(&pdb, MAIN, 1)?.unwrap();
    assert_eq!(groups(&grouped), vec![vec!["USystem"]]);
    assert_eq!(grouped.extern_aliases, vec!["ZA a.dll", "ZB b.dll"]);
    Ok(())
}

/// Inconsistent using information is rejected.
#[test]
fn test_malformed_grouping() {
    let cases = [
        Pdb::default().method(MAIN, &[using(&[1]), using(&[1])], &["USystem"]),
        Pdb::default().method(MAIN, &[using(&[2])], &["USystem"]),
        Pdb::default().method(MAIN, &[using(&[1])], &["ZLib Lib"]),
        Pdb::default().method(MAIN, &[using(&[1])], &["USystem", "UExtra"]),
        Pdb::default()
            .method(MAIN, &[using(&[1]), forward_to_module(MODULE)], &["USystem", "ZLib Lib"])
            .imports(MODULE, &[]),
        Pdb::default()
            .method(MAIN, &[forward(FORWARDED), forward_to_module(MODULE)], &[])
            .method(FORWARDED, &[using(&[0])], &[]),
        Pdb::default()
            .method(MAIN, &[forward(FORWARDED)], &[])
            .method(
                FORWARDED,
                &[using(&[1]), forward(SECOND_HOP), forward_to_module(MODULE)],
                &["USystem"],
            ),
    ];

    for pdb in &cases {
        assert!(matches!(
            get_csharp_grouped_import_strings(pdb, MAIN, 1),
            Err(Error::Malformed { .. })
        ));
    }
}

/// Methods without a blob or without using information have no imports.
#[test]
fn test_no_imports() -> Result<()> {
    let pdb = Pdb::default()
        .imports(MAIN, &["USystem"])
        .method(FORWARDED, &[], &["USystem"]);

    assert!(get_csharp_grouped_import_strings(&pdb, MAIN, 1)?.is_none());
    assert!(get_csharp_grouped_import_strings(&pdb, FORWARDED, 1)?.is_none());
    Ok(())
}

/// A leading `@<token>` entry redirects Visual Basic import strings once.
#[test]
fn test_visual_basic_forward() -> Result<()> {
    let forward = format!("@{}", FORWARDED.value());
    let pdb = Pdb::default()
        .imports(MAIN, &[forward.as_str()])
        .imports(FORWARDED, &["", "*MyApp", "@F:System", "@P:System.Linq", "&old"]);

    let strings = get_visual_basic_import_strings(&pdb, MAIN, 1);
    assert_eq!(strings.len(), 5);
    assert_eq!(strings[1], "*MyApp");

    let imports = read_visual_basic_imports(&pdb, MAIN, 1, &ReaderConfig::default())?;
    assert_eq!(imports.default_namespace.as_deref(), Some("MyApp"));
    assert_eq!(imports.current_namespace.as_deref(), Some(""));
    assert_eq!(imports.file_level.len(), 1);
    assert_eq!(imports.file_level[0].target.as_deref(), Some("System"));
    assert_eq!(imports.project_level.len(), 1);
    assert_eq!(imports.project_level[0].scope, ImportScope::Project);

    let raw = read_visual_basic_imports(&pdb, MAIN, 1, &ReaderConfig::raw())?;
    assert!(raw
        .file_level
        .iter()
        .any(|record| record.kind == ImportTargetKind::Defunct));
    Ok(())
}

/// Strings that are not a forward are returned as they are.
#[test]
fn test_visual_basic_no_forward() {
    let pdb = Pdb::default().imports(MAIN, &["@FT:System.Math", "@x"]);
    assert_eq!(
        get_visual_basic_import_strings(&pdb, MAIN, 1),
        vec!["@FT:System.Math", "@x"]
    );
}

/// Strict configurations reject unparseable strings, the default skips them.
#[test]
fn test_unparseable_import_strings() -> Result<()> {
    let pdb = Pdb::default().method(MAIN, &[using(&[2])], &["USystem", "?bogus"]);

    let grouped = get_csharp_grouped_import_strings(&pdb, MAIN, 1)?.unwrap();
    assert_eq!(grouped.parse(&ReaderConfig::default())?.groups[0].len(), 1);
    assert!(matches!(
        grouped.parse(&ReaderConfig::strict()),
        Err(Error::Malformed { .. })
    ));
    Ok(())
}

fn slot_zero(name: &str) -> DynamicLocalBucket {
    DynamicLocalBucket {
        flag_count: 1,
        flags: 1,
        slot_id: 0,
        name: name.to_string(),
    }
}

/// Slot 0 buckets are matched against the scope tree.
#[test]
fn test_dynamic_local_disambiguation() {
    let root = LocalScope {
        locals: vec![ScopeLocal::new("d", 0), ScopeLocal::new("other", 0)],
        constants: vec!["c".to_string()],
        children: vec![LocalScope {
            locals: vec![],
            constants: vec!["x".to_string(), "x".to_string()],
            children: vec![],
        }],
    };

    let mut numbered = slot_zero("n");
    numbered.slot_id = 3;

    let buckets = vec![
        slot_zero("d"),
        slot_zero("c"),
        slot_zero("x"),
        slot_zero("x"),
        slot_zero("other"),
        numbered.clone(),
    ];
    let kept = disambiguate_dynamic_locals(buckets, &root);

    assert_eq!(kept.len(), 3);
    assert_eq!(kept[0], slot_zero("d"));
    assert_eq!(kept[1].name, "c");
    assert_eq!(kept[1].slot_id, CONSTANT_SLOT_ID);
    assert_eq!(kept[2], numbered);
}
