//! Per-method aggregation of custom debug info.
//!
//! [`MethodDebugInfo::read`] decodes every record of one method into a single struct and
//! resolves its grouped C# imports through the same provider.

use tracing::debug;

use crate::{
    metadata::{
        config::ReaderConfig,
        customdebuginfo::{
            decoders::{decode_record, CustomDebugInfo},
            dynamic::{DynamicLocalMap, LocalScope},
            encmap::{LambdaMap, LocalSlotDebugInfo},
            records::parse_records,
            types::{DynamicLocalBucket, HoistedLocalScope, TupleElementNamesInfo},
        },
        importstrings::{
            resolver::get_csharp_grouped_import_strings_with_config, CSharpImports,
            MethodDebugInfoProvider,
        },
        token::Token,
    },
    Result,
};

/// Decoded custom debug info of a single method.
///
/// When a blob contains several records of the same kind, the first one is used.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodDebugInfo {
    /// Token of the method
    pub token: Token,
    /// Using structure of the method after following forward links, `None` if the
    /// method has no using information
    pub imports: Option<CSharpImports>,
    /// Scopes of the hoisted locals of a state machine `MoveNext` method
    pub hoisted_local_scopes: Vec<HoistedLocalScope>,
    /// State machine class of an iterator or async kickoff method
    pub state_machine_type_name: Option<String>,
    /// Raw `dynamic` buckets, see [`MethodDebugInfo::dynamic_local_map`]
    pub dynamic_locals: Vec<DynamicLocalBucket>,
    /// Tuple element names of locals and constants
    pub tuple_element_names: Vec<TupleElementNamesInfo>,
    /// Edit and Continue local slot map
    pub local_slots: Vec<LocalSlotDebugInfo>,
    /// Edit and Continue lambda map
    pub lambda_map: Option<LambdaMap>,
}

impl MethodDebugInfo {
    /// Reads and decodes the custom debug info of `token`.
    ///
    /// Returns `Ok(None)` if the method has no custom debug info blob.
    ///
    /// # Errors
    /// Propagates framing, decoding and import resolution errors. Unparseable import
    /// strings are only an error with [`ReaderConfig::strict_import_strings`].
    pub fn read<P: MethodDebugInfoProvider + ?Sized>(
        provider: &P,
        token: Token,
        version: i32,
        config: &ReaderConfig,
    ) -> Result<Option<Self>> {
        let Some(blob) = provider.custom_debug_info(token, version) else {
            return Ok(None);
        };

        let mut info = MethodDebugInfo {
            token,
            ..MethodDebugInfo::default()
        };

        let mut seen_dynamic = false;
        let mut seen_tuples = false;
        let mut seen_slots = false;
        let mut seen_scopes = false;

        for record in parse_records(&blob)? {
            match decode_record(&record?)? {
                CustomDebugInfo::StateMachineHoistedLocalScopes(scopes) if !seen_scopes => {
                    seen_scopes = true;
                    info.hoisted_local_scopes = scopes;
                }
                CustomDebugInfo::ForwardIterator(name) => {
                    info.state_machine_type_name.get_or_insert(name);
                }
                CustomDebugInfo::DynamicLocals(buckets) if !seen_dynamic => {
                    seen_dynamic = true;
                    info.dynamic_locals = buckets;
                }
                CustomDebugInfo::TupleElementNames(names) if !seen_tuples => {
                    seen_tuples = true;
                    info.tuple_element_names = names;
                }
                CustomDebugInfo::EditAndContinueLocalSlotMap(slots) if !seen_slots => {
                    seen_slots = true;
                    info.local_slots = slots;
                }
                CustomDebugInfo::EditAndContinueLambdaMap(map) => {
                    info.lambda_map.get_or_insert(map);
                }
                CustomDebugInfo::Unknown {
                    kind,
                    version: record_version,
                    data,
                } => {
                    debug!(
                        %token,
                        kind,
                        version = record_version,
                        len = data.len(),
                        "skipping unknown record"
                    );
                }
                _ => {}
            }
        }

        info.imports =
            get_csharp_grouped_import_strings_with_config(provider, token, version, config)?
                .map(|grouped| grouped.parse(config))
                .transpose()?;

        Ok(Some(info))
    }

    /// Returns `true` if this is the `MoveNext` method of a state machine.
    #[must_use]
    pub fn is_state_machine_move_next(&self) -> bool {
        !self.hoisted_local_scopes.is_empty()
    }

    /// Disambiguates the `dynamic` buckets against the method's scope tree.
    #[must_use]
    pub fn dynamic_local_map(&self, root: &LocalScope) -> DynamicLocalMap {
        DynamicLocalMap::new(self.dynamic_locals.clone(), root)
    }
}
