//! Slot 0 disambiguation of `DynamicLocals` buckets.
//!
//! Compilers store constants in the `DynamicLocals` record with slot id 0, which is also
//! the slot of the method's first local. The bucket name is the only hint which one is
//! meant, so the scope tree of the method is consulted:
//!
//! - the first slot 0 local found (depth first) keeps its bucket as a local
//! - a constant of the same name keeps the bucket, re-tagged as a constant
//! - names claimed by both, or by neither, drop the bucket

use std::collections::{hash_map::Entry, HashMap};

use tracing::debug;

use crate::metadata::customdebuginfo::types::{DynamicLocalBucket, CONSTANT_SLOT_ID};

/// A local variable declared in a [`LocalScope`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeLocal {
    /// Local name
    pub name: String,
    /// Local slot index
    pub slot: i32,
}

impl ScopeLocal {
    /// Creates a new scope local.
    pub fn new(name: impl Into<String>, slot: i32) -> Self {
        ScopeLocal {
            name: name.into(),
            slot,
        }
    }
}

/// A lexical scope of a method as reported by the PDB reader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalScope {
    /// Locals declared directly in this scope
    pub locals: Vec<ScopeLocal>,
    /// Names of constants declared directly in this scope
    pub constants: Vec<String>,
    /// Nested scopes
    pub children: Vec<LocalScope>,
}

impl LocalScope {
    /// Returns the first local with slot 0, searching this scope before its children.
    #[must_use]
    pub fn first_slot_zero_local(&self) -> Option<&ScopeLocal> {
        self.locals
            .iter()
            .find(|local| local.slot == 0)
            .or_else(|| {
                self.children
                    .iter()
                    .find_map(LocalScope::first_slot_zero_local)
            })
    }

    /// Visits the constant names of this scope and all nested scopes, depth first.
    pub fn for_each_constant<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        for constant in &self.constants {
            f(constant);
        }
        for child in &self.children {
            child.for_each_constant(f);
        }
    }
}

/// What a slot 0 bucket name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotZeroEntity {
    Local,
    Constant,
    Ambiguous,
}

/// Resolves the slot 0 ambiguity of `buckets` against the scope tree rooted at `root`.
///
/// Buckets with a non-zero slot id are returned unchanged. Buckets at slot 0 either stay
/// as they are (the first slot 0 local), get their slot id replaced with
/// [`CONSTANT_SLOT_ID`] (a constant), or are dropped. The relative order of the kept
/// buckets is preserved.
#[must_use]
pub fn disambiguate_dynamic_locals(
    buckets: Vec<DynamicLocalBucket>,
    root: &LocalScope,
) -> Vec<DynamicLocalBucket> {
    let mut entities: HashMap<&str, SlotZeroEntity> = HashMap::new();

    if let Some(local) = root.first_slot_zero_local() {
        entities.insert(local.name.as_str(), SlotZeroEntity::Local);
    }

    root.for_each_constant(&mut |name| match entities.entry(name) {
        Entry::Vacant(entry) => {
            entry.insert(SlotZeroEntity::Constant);
        }
        Entry::Occupied(mut entry) => {
            entry.insert(SlotZeroEntity::Ambiguous);
        }
    });

    buckets
        .into_iter()
        .filter_map(|mut bucket| {
            if bucket.slot_id != 0 {
                return Some(bucket);
            }

            match entities.get(bucket.name.as_str()) {
                Some(SlotZeroEntity::Local) => Some(bucket),
                Some(SlotZeroEntity::Constant) => {
                    bucket.slot_id = CONSTANT_SLOT_ID;
                    Some(bucket)
                }
                Some(SlotZeroEntity::Ambiguous) | None => {
                    debug!(name = %bucket.name, "dropping ambiguous slot 0 dynamic bucket");
                    None
                }
            }
        })
        .collect()
}

/// Dynamic buckets split into locals (by slot) and constants (by name).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicLocalMap {
    /// Buckets describing locals, keyed by slot id
    pub locals: HashMap<i32, DynamicLocalBucket>,
    /// Buckets describing constants, keyed by name
    pub constants: HashMap<String, DynamicLocalBucket>,
}

impl DynamicLocalMap {
    /// Disambiguates `buckets` and groups the result.
    ///
    /// When several buckets share a slot or constant name the first one wins.
    #[must_use]
    pub fn new(buckets: Vec<DynamicLocalBucket>, root: &LocalScope) -> Self {
        let mut map = DynamicLocalMap::default();

        for bucket in disambiguate_dynamic_locals(buckets, root) {
            if bucket.is_constant() {
                map.constants.entry(bucket.name.clone()).or_insert(bucket);
            } else {
                map.locals.entry(bucket.slot_id).or_insert(bucket);
            }
        }

        map
    }

    /// Returns `true` if no bucket survived disambiguation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locals.is_empty() && self.constants.is_empty()
    }
}
