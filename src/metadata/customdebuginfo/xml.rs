//! XML rendering of custom debug info blobs, in the layout used by PDB-to-XML tools.
//!
//! ```xml
//! <customDebugInfo>
//!   <using>
//!     <namespace usingCount="2"/>
//!   </using>
//!   <forward token="0x06000001"/>
//!   <dynamicLocals>
//!     <bucket flags="01" slotId="0" localName="d"/>
//!   </dynamicLocals>
//! </customDebugInfo>
//! ```

use quick_xml::{
    events::{BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::{
    metadata::customdebuginfo::{
        decoders::{decode_record, CustomDebugInfo},
        encmap::{LocalSlotKind, STATIC_CLOSURE_ORDINAL, THIS_ONLY_CLOSURE_ORDINAL},
        records::parse_records,
    },
    Error, Result,
};

type XmlWriter = Writer<Vec<u8>>;

/// Renders all records of `data` as an indented `<customDebugInfo>` element.
///
/// Blobs with an unsupported global version render as an empty element.
///
/// # Errors
/// Propagates framing and decoding errors, and returns [`Error::Xml`] if the writer
/// fails.
///
/// # Examples
///
/// ```rust
/// use cdiscope::write_custom_debug_info_xml;
///
/// let blob = [4, 1, 0, 0, 4, 1, 0, 0, 12, 0, 0, 0, 0x01, 0x00, 0x00, 0x06];
/// let xml = write_custom_debug_info_xml(&blob)?;
/// assert!(xml.contains(r#"<forward token="0x06000001"/>"#));
/// # Ok::<(), cdiscope::Error>(())
/// ```
pub fn write_custom_debug_info_xml(data: &[u8]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    start(&mut writer, "customDebugInfo", &[])?;
    for record in parse_records(data)? {
        write_record(&mut writer, decode_record(&record?)?)?;
    }
    end(&mut writer, "customDebugInfo")?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Xml(e.to_string()))
}

fn write_record(writer: &mut XmlWriter, record: CustomDebugInfo<'_>) -> Result<()> {
    match record {
        CustomDebugInfo::UsingInfo(counts) => {
            start(writer, "using", &[])?;
            for count in counts {
                empty(writer, "namespace", &[("usingCount", count.to_string())])?;
            }
            end(writer, "using")
        }
        CustomDebugInfo::ForwardInfo(token) => {
            empty(writer, "forward", &[("token", token.to_string())])
        }
        CustomDebugInfo::ForwardToModuleInfo(token) => {
            empty(writer, "forwardToModule", &[("token", token.to_string())])
        }
        CustomDebugInfo::StateMachineHoistedLocalScopes(scopes) => {
            start(writer, "hoistedLocalScopes", &[])?;
            for scope in scopes {
                if scope.is_default() {
                    empty(writer, "slot", &[])?;
                } else {
                    empty(
                        writer,
                        "slot",
                        &[
                            ("startOffset", format!("{:#x}", scope.start_offset)),
                            ("endOffset", format!("{:#x}", scope.end_offset)),
                        ],
                    )?;
                }
            }
            end(writer, "hoistedLocalScopes")
        }
        CustomDebugInfo::ForwardIterator(name) => empty(writer, "forwardIterator", &[("name", name)]),
        CustomDebugInfo::DynamicLocals(buckets) => {
            start(writer, "dynamicLocals", &[])?;
            for bucket in buckets {
                empty(
                    writer,
                    "bucket",
                    &[
                        ("flags", bucket.flags_string()),
                        ("slotId", bucket.slot_id.to_string()),
                        ("localName", bucket.name.clone()),
                    ],
                )?;
            }
            end(writer, "dynamicLocals")
        }
        CustomDebugInfo::EditAndContinueLocalSlotMap(slots) => {
            start(writer, "encLocalSlotMap", &[])?;
            for slot in slots {
                match slot.kind {
                    LocalSlotKind::Temp => empty(writer, "slot", &[("kind", "temp".to_string())])?,
                    LocalSlotKind::Local(kind) => {
                        let mut attributes = vec![
                            ("kind", kind.to_string()),
                            ("offset", slot.syntax_offset.to_string()),
                        ];
                        if slot.ordinal != 0 {
                            attributes.push(("ordinal", slot.ordinal.to_string()));
                        }
                        empty(writer, "slot", &attributes)?;
                    }
                }
            }
            end(writer, "encLocalSlotMap")
        }
        CustomDebugInfo::EditAndContinueLambdaMap(map) => {
            start(writer, "encLambdaMap", &[])?;
            if map.method_ordinal >= 0 {
                start(writer, "methodOrdinal", &[])?;
                emit(
                    writer,
                    Event::Text(BytesText::new(&map.method_ordinal.to_string())),
                )?;
                end(writer, "methodOrdinal")?;
            }
            for closure in &map.closures {
                empty(
                    writer,
                    "closure",
                    &[("offset", closure.syntax_offset.to_string())],
                )?;
            }
            for lambda in &map.lambdas {
                let closure = match lambda.closure_ordinal {
                    THIS_ONLY_CLOSURE_ORDINAL => "this".to_string(),
                    STATIC_CLOSURE_ORDINAL => "static".to_string(),
                    ordinal => ordinal.to_string(),
                };
                empty(
                    writer,
                    "lambda",
                    &[
                        ("offset", lambda.syntax_offset.to_string()),
                        ("closure", closure),
                    ],
                )?;
            }
            end(writer, "encLambdaMap")
        }
        CustomDebugInfo::TupleElementNames(infos) => {
            start(writer, "tupleElementNames", &[])?;
            for info in infos {
                let names = info
                    .element_names
                    .iter()
                    .map(|name| name.as_deref().unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("|");
                let mut attributes = vec![
                    ("elementNames", format!("|{names}")),
                    ("slotIndex", info.slot_index.to_string()),
                    ("localName", info.local_name),
                ];
                if info.slot_index < 0 {
                    attributes.push(("scopeStart", format!("{:#x}", info.scope_start)));
                    attributes.push(("scopeEnd", format!("{:#x}", info.scope_end)));
                }
                empty(writer, "local", &attributes)?;
            }
            end(writer, "tupleElementNames")
        }
        CustomDebugInfo::Unknown {
            kind,
            version,
            data,
        } => {
            let payload = data.iter().map(|byte| format!("{byte:02X}")).collect::<String>();
            empty(
                writer,
                "unknown",
                &[
                    ("kind", kind.to_string()),
                    ("version", version.to_string()),
                    ("payload", payload),
                ],
            )
        }
    }
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(e.to_string()))
}

fn element<'a>(name: &'a str, attributes: &[(&str, String)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for (key, value) in attributes {
        element.push_attribute((*key, value.as_str()));
    }
    element
}

fn start(writer: &mut XmlWriter, name: &str, attributes: &[(&str, String)]) -> Result<()> {
    emit(writer, Event::Start(element(name, attributes)))
}

fn empty(writer: &mut XmlWriter, name: &str, attributes: &[(&str, String)]) -> Result<()> {
    emit(writer, Event::Empty(element(name, attributes)))
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    emit(writer, Event::End(BytesEnd::new(name)))
}
