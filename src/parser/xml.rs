//! quick-xml event adapter
//!
//! Turns an `.ecore` document into builder [`Event`]s. Tags are reduced to
//! their local name (`ecore:EPackage` -> `EPackage`); namespace declarations
//! and `xmi:` bookkeeping attributes are dropped, and so are `xsi:` attributes
//! other than the type discriminator.

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use std::io::BufRead;

use super::events::{Attributes, Event};
use super::{Builder, ParserConfig};
use crate::error::{EcoreError, Result};
use crate::model::{ElementId, Model};

/// Streaming iterator of builder events over an XML source
pub struct XmlEvents<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    discriminator: String,
    pending_end: bool,
    done: bool,
}

impl<R: BufRead> XmlEvents<R> {
    pub fn new(input: R, config: &ParserConfig) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            discriminator: config.type_discriminator.clone(),
            pending_end: false,
            done: false,
        }
    }

    fn next_event(&mut self) -> Result<Option<Event>> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(Some(Event::End));
        }
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(XmlEvent::Start(e)) => Some(start_event(&e, &self.discriminator)?),
                Ok(XmlEvent::Empty(e)) => {
                    // self-closing element: start now, end on the next call
                    self.pending_end = true;
                    Some(start_event(&e, &self.discriminator)?)
                }
                Ok(XmlEvent::End(_)) => Some(Event::End),
                Ok(XmlEvent::Eof) => return Ok(None),
                Err(e) => {
                    return Err(EcoreError::xml(format!(
                        "XML parse error at position {}: {e}",
                        self.reader.error_position()
                    )))
                }
                _ => None,
            };
            if let Some(event) = event {
                return Ok(Some(event));
            }
        }
    }
}

fn keep_attribute(key: &str, discriminator: &str) -> bool {
    if key == discriminator {
        return true;
    }
    !(key == "xmlns"
        || key.starts_with("xmlns:")
        || key.starts_with("xmi:")
        || key.starts_with("xsi:"))
}

fn start_event(element: &BytesStart<'_>, discriminator: &str) -> Result<Event> {
    let local = element.local_name();
    let tag = std::str::from_utf8(local.as_ref())
        .map_err(|e| EcoreError::xml(format!("Invalid tag name: {e}")))?
        .to_string();

    let mut attributes = Attributes::new();
    for attr_result in element.attributes() {
        let attr = attr_result.map_err(|e| EcoreError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| EcoreError::xml(format!("Attribute key error: {e}")))?;
        if !keep_attribute(key, discriminator) {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| EcoreError::xml(format!("Attribute value error: {e}")))?
            .to_string();
        attributes.insert(key.to_string(), value);
    }
    Ok(Event::Start { tag, attributes })
}

impl<R: BufRead> Iterator for XmlEvents<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Parse one `.ecore` document into `model`, returning its root package
pub fn parse_str(model: &mut Model, input: &str, config: &ParserConfig) -> Result<ElementId> {
    parse_bytes(model, input.as_bytes(), config)
}

pub fn parse_bytes(model: &mut Model, input: &[u8], config: &ParserConfig) -> Result<ElementId> {
    Builder::build_from(model, config, XmlEvents::new(input, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ecore:EPackage xmi:version="2.0" xmlns:xmi="http://www.omg.org/XMI"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xmlns:ecore="http://www.eclipse.org/emf/2002/Ecore" name="shop" nsURI="http://example/shop" nsPrefix="shop">
  <eClassifiers xsi:type="ecore:EClass" name="Item">
    <eStructuralFeatures xsi:type="ecore:EAttribute" name="price" eType="ecore:EDataType http://www.eclipse.org/emf/2002/Ecore#//EDouble"/>
  </eClassifiers>
</ecore:EPackage>
"#;

    fn collect(input: &str) -> Vec<Event> {
        XmlEvents::new(input.as_bytes(), &ParserConfig::default())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_empty_element_yields_start_and_end() {
        let events = collect(DOC);
        assert_eq!(events.len(), 6);
        assert!(matches!(&events[2], Event::Start { tag, .. } if tag == "eStructuralFeatures"));
        assert_eq!(events[3], Event::End);
    }

    #[test]
    fn test_bookkeeping_attributes_dropped() {
        let events = collect(DOC);
        let Event::Start { tag, attributes } = &events[0] else {
            panic!("expected start event");
        };
        assert_eq!(tag, "EPackage");
        assert_eq!(
            attributes.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["name", "nsURI", "nsPrefix"]
        );

        let Event::Start { attributes, .. } = &events[1] else {
            panic!("expected start event");
        };
        assert_eq!(attributes.get("xsi:type").map(String::as_str), Some("ecore:EClass"));
    }

    #[test]
    fn test_parse_str_builds_model() {
        let mut model = Model::new();
        let root = parse_str(&mut model, DOC, &ParserConfig::default()).unwrap();
        let item = model.package(root).unwrap().classes["Item"];
        assert_eq!(model.class(item).unwrap().attributes.len(), 1);
    }

    #[test]
    fn test_malformed_xml_is_reported() {
        let mut model = Model::new();
        let err = parse_str(&mut model, "<ecore:EPackage name=\"x\"><eSubpackages name=\"y\"></ecore:EPackage>", &ParserConfig::default())
            .unwrap_err();
        assert!(matches!(err, EcoreError::Xml(_)));
    }
}
