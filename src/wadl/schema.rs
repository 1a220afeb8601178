//! # Schema Documents and Instance Generation
//!
//! The payload synthesis fallback asks a [`SchemaInstanceGenerator`] for an
//! XML instance of a named element. The bundled [`SkeletonGenerator`] only
//! reproduces structure (the element and the child elements its declaration
//! lists), never sample values.

use super::model::QName;
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Indentation width used for generated payloads
const INDENT: usize = 4;

/// A parsed XML Schema, reduced to what instance generation needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDocument {
    pub location: PathBuf,
    pub target_namespace: Option<String>,
    pub qualified_children: bool,
    /// Top-level element name -> names of elements declared inside it
    pub elements: HashMap<String, Vec<String>>,
}

impl SchemaDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read schema {}", path.display()))?;
        let mut doc = Self::parse(&text)?;
        doc.location = path.to_path_buf();
        Ok(doc)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut doc = SchemaDocument::default();
        let mut depth = 0usize;
        // open xs:element declarations, outermost first
        let mut open_elements = 0usize;
        let mut current: Option<String> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf)?;
            let (start, empty) = match &event {
                Event::Start(e) => (Some(e), false),
                Event::Empty(e) => (Some(e), true),
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if e.local_name().as_ref() == b"element" {
                        open_elements = open_elements.saturating_sub(1);
                        if open_elements == 0 {
                            current = None;
                        }
                    }
                    (None, false)
                }
                Event::Eof => break,
                _ => (None, false),
            };

            if let Some(e) = start {
                match (depth, e.local_name().as_ref()) {
                    (0, b"schema") => {
                        doc.target_namespace = attr(e, "targetNamespace")?;
                        doc.qualified_children =
                            attr(e, "elementFormDefault")?.as_deref() == Some("qualified");
                    }
                    (1, b"element") => {
                        if let Some(name) = attr(e, "name")? {
                            doc.elements.entry(name.clone()).or_default();
                            if !empty {
                                current = Some(name);
                            }
                        }
                    }
                    (d, b"element") if d > 1 && open_elements == 1 => {
                        let child = match attr(e, "name")? {
                            Some(name) => Some(name),
                            None => attr(e, "ref")?.map(|r| local_part(&r).to_string()),
                        };
                        if let (Some(parent), Some(child)) = (current.as_ref(), child) {
                            if let Some(children) = doc.elements.get_mut(parent) {
                                children.push(child);
                            }
                        }
                    }
                    _ => {}
                }
                if !empty {
                    depth += 1;
                    if e.local_name().as_ref() == b"element" {
                        open_elements += 1;
                    }
                }
            }
            buf.clear();
        }

        Ok(doc)
    }
}

fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match e.try_get_attribute(name)? {
        Some(a) => Ok(Some(a.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn local_part(name: &str) -> &str {
    name.split_once(':').map(|(_, local)| local).unwrap_or(name)
}

/// Produces an XML instance of an element
pub trait SchemaInstanceGenerator: Send + Sync {
    fn generate(&self, schema: Option<&SchemaDocument>, element: &QName) -> Result<Vec<u8>>;
}

/// Emits the element with empty children, indented by four spaces
#[derive(Debug, Default, Clone, Copy)]
pub struct SkeletonGenerator;

impl SchemaInstanceGenerator for SkeletonGenerator {
    fn generate(&self, schema: Option<&SchemaDocument>, element: &QName) -> Result<Vec<u8>> {
        let namespace = element
            .namespace
            .clone()
            .or_else(|| schema.and_then(|s| s.target_namespace.clone()));
        let prefix = match &namespace {
            Some(_) => Some(element.prefix.clone().unwrap_or_else(|| "ns".to_string())),
            None => None,
        };
        let qualify = |local: &str| match &prefix {
            Some(p) => format!("{p}:{local}"),
            None => local.to_string(),
        };

        let children = schema
            .and_then(|s| s.elements.get(&element.local))
            .cloned()
            .unwrap_or_default();
        let qualified_children = schema.map(|s| s.qualified_children).unwrap_or(false);

        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', INDENT);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let root_name = qualify(&element.local);
        let mut root = BytesStart::new(root_name.as_str());
        if let (Some(ns), Some(p)) = (&namespace, &prefix) {
            root.push_attribute((format!("xmlns:{p}").as_str(), ns.as_str()));
        }

        if children.is_empty() {
            writer.write_event(Event::Empty(root))?;
        } else {
            writer.write_event(Event::Start(root))?;
            for child in &children {
                let name = if qualified_children {
                    qualify(child)
                } else {
                    child.clone()
                };
                writer.write_event(Event::Empty(BytesStart::new(name.as_str())))?;
            }
            writer.write_event(Event::End(BytesEnd::new(root_name.as_str())))?;
        }

        let mut bytes = writer.into_inner().into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}
