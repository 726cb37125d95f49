//! Extracts `{prefix: agency}` from the ISBN range-allocation XML,
//! following each `<Group>` element's `<Prefix>`/`<Agency>` pair. Range
//! allocation rules (`Rules/Rule/Range`) are intentionally not parsed —
//! this only needs the prefix-to-agency-name mapping.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{Error, Result};
use crate::isbn::normalize_isbn;

/// Parses the registration-agency ranges XML document into a
/// `{normalized prefix: agency name}` map.
pub fn extract_agencies(xml: &str) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut agencies = BTreeMap::new();
    let mut in_group = false;
    let mut current_tag = String::new();
    let mut prefix: Option<String> = None;
    let mut agency: Option<String> = None;

    loop {
        match reader.read_event().map_err(|e| Error::Xml(e.into()))? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "Group" {
                    in_group = true;
                    prefix = None;
                    agency = None;
                } else if in_group {
                    current_tag = name;
                }
            }
            Event::Text(t) => {
                if !in_group {
                    continue;
                }
                let decoded = t.decode().map_err(|e| Error::Xml(e.into()))?;
                let text = quick_xml::escape::unescape(&decoded)
                    .map_err(|e| Error::Xml(e.into()))?
                    .to_string();
                match current_tag.as_str() {
                    "Prefix" => prefix = Some(text),
                    "Agency" => agency = Some(text),
                    _ => {}
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "Group" {
                    in_group = false;
                    if let (Some(p), Some(a)) = (prefix.take(), agency.take()) {
                        agencies.insert(normalize_isbn(&p, true), a);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(agencies)
}
