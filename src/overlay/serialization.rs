//! Ledger XML format
//!
//! ```xml
//! <overlay-config>
//!   <plugin name="SkyUI">
//!     <entry fspath="/overlay/SkyUI/interface/skyui.swf" datapath="interface/skyui.swf"/>
//!   </plugin>
//! </overlay-config>
//! ```

use std::path::PathBuf;

use quick_xml::de::DeError;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};

use crate::overlay::{Binding, PluginEntry};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const ROOT: &str = "overlay-config";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "overlay-config", deny_unknown_fields)]
struct LedgerDocument {
    #[serde(rename = "plugin", default)]
    plugins: Vec<PluginElement>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginElement {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "entry", default)]
    entries: Vec<EntryElement>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryElement {
    #[serde(rename = "@fspath")]
    fspath: String,
    #[serde(rename = "@datapath")]
    datapath: String,
}

/// Serialize entries in ledger order
pub fn to_xml(entries: &[PluginEntry]) -> Result<String, quick_xml::se::SeError> {
    let document = LedgerDocument {
        plugins: entries
            .iter()
            .map(|entry| PluginElement {
                name: entry.name.clone(),
                entries: entry
                    .bindings
                    .iter()
                    .map(|b| EntryElement {
                        fspath: b.real_file.to_string_lossy().into_owned(),
                        datapath: b.virtual_path.clone(),
                    })
                    .collect(),
            })
            .collect(),
    };

    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    document.serialize(serializer)?;

    Ok(format!("{DECLARATION}\n{body}\n"))
}

/// The serde layer does not look at the root name
fn check_root(text: &str) -> Result<(), DeError> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                let name = e.name();
                return if name.as_ref() == ROOT.as_bytes() {
                    Ok(())
                } else {
                    Err(DeError::Custom(format!(
                        "root element is '{}', expected '{ROOT}'",
                        String::from_utf8_lossy(name.as_ref())
                    )))
                };
            }
            Ok(Event::Eof) => return Err(DeError::Custom("document has no root element".into())),
            Ok(_) => {}
            Err(e) => return Err(DeError::Custom(e.to_string())),
        }
    }
}

/// Parse ledger text back into entries
///
/// A foreign root element, or any element or attribute the ledger does not
/// define, is an error.
pub fn from_xml(text: &str) -> Result<Vec<PluginEntry>, DeError> {
    check_root(text)?;
    let document: LedgerDocument = quick_xml::de::from_str(text)?;
    Ok(document
        .plugins
        .into_iter()
        .map(|plugin| PluginEntry {
            name: plugin.name,
            bindings: plugin
                .entries
                .into_iter()
                .map(|e| Binding {
                    real_file: PathBuf::from(e.fspath),
                    virtual_path: e.datapath,
                })
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<PluginEntry> {
        vec![
            PluginEntry {
                name: "SkyUI".to_string(),
                bindings: vec![Binding {
                    real_file: PathBuf::from("/overlay/SkyUI/interface/skyui.swf"),
                    virtual_path: "interface/skyui.swf".to_string(),
                }],
            },
            PluginEntry {
                name: "Empty & <Odd>".to_string(),
                bindings: vec![],
            },
        ]
    }

    #[test]
    fn test_to_xml_shape() {
        let xml = to_xml(&sample()).unwrap();
        assert!(xml.starts_with(DECLARATION));
        assert!(xml.contains("<overlay-config>"));
        assert!(xml.contains(r#"<plugin name="SkyUI">"#));
        assert!(xml.contains(
            r#"<entry fspath="/overlay/SkyUI/interface/skyui.swf" datapath="interface/skyui.swf"/>"#
        ));
        assert!(xml.contains("&amp;"));
    }

    #[test]
    fn test_round_trip() {
        let entries = sample();
        let parsed = from_xml(&to_xml(&entries).unwrap()).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_empty_ledger() {
        let parsed = from_xml(&to_xml(&[]).unwrap()).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_attribute_order_is_irrelevant() {
        let xml = r#"<overlay-config><plugin name="A"><entry datapath="x.esp" fspath="/o/A/x.esp"/></plugin></overlay-config>"#;
        let parsed = from_xml(xml).unwrap();
        assert_eq!(parsed[0].bindings[0].virtual_path, "x.esp");
        assert_eq!(parsed[0].bindings[0].real_file, PathBuf::from("/o/A/x.esp"));
    }

    #[test]
    fn test_entry_without_datapath_is_rejected() {
        let xml = r#"<overlay-config><plugin name="A"><entry fspath="/o/A/x.esp"/></plugin></overlay-config>"#;
        assert!(from_xml(xml).is_err());
    }

    #[test]
    fn test_foreign_root_is_rejected() {
        let err = from_xml("<html><body><p>not a ledger</p></body></html>").unwrap_err();
        assert!(err.to_string().contains("html"));
        assert!(from_xml(r#"<?xml version="1.0"?><plugins/>"#).is_err());
    }

    #[test]
    fn test_unknown_elements_are_rejected() {
        let misspelled = r#"<overlay-config><plugin name="A"><entri fspath="/o/A/x.esp" datapath="x.esp"/></plugin></overlay-config>"#;
        assert!(from_xml(misspelled).is_err());
        let stray = r#"<overlay-config><mod name="A"/></overlay-config>"#;
        assert!(from_xml(stray).is_err());
    }

    #[test]
    fn test_empty_root_element() {
        let xml = format!("{DECLARATION}\n<!-- kept by hand -->\n<overlay-config/>");
        assert!(from_xml(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(from_xml("not xml at all <").is_err());
    }
}
