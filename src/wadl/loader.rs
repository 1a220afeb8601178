//! # WADL Loader
//!
//! Reads a description document into the [`Application`] model. Only the
//! parts the REPL consumes are read: grammar includes, resource blocks,
//! resources, methods and request representations. Response descriptions,
//! parameters and `href` method references are skipped.

use super::model::{
    Application, Method, QName, Representation, Request, Resource, ResourceItem, Resources,
};
use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName as XmlName, ResolveResult};
use quick_xml::reader::NsReader;
use std::path::Path;
use std::sync::Arc;

/// Load a description file from disk
pub fn load_application(path: &Path) -> Result<Application> {
    tracing::debug!("Loading description from {}", path.display());
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_application(&xml, base_dir).with_context(|| format!("invalid WADL: {}", path.display()))
}

#[derive(Default)]
struct LoaderState {
    application: Application,
    resources: Option<Resources>,
    stack: Vec<Resource>,
    method: Option<Method>,
    in_grammars: bool,
    in_request: bool,
}

/// Parse a description from text, resolving grammar includes against `base_dir`
pub fn parse_application(xml: &str, base_dir: &Path) -> Result<Application> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = LoaderState::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => state.start(&reader, &e, base_dir)?,
            Event::Empty(e) => {
                state.start(&reader, &e, base_dir)?;
                state.end(e.local_name().as_ref());
            }
            Event::End(e) => state.end(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(
        "Parsed description: {} resource block(s), {} grammar(s)",
        state.application.resources.len(),
        state.application.grammars.len()
    );
    Ok(state.application)
}

impl LoaderState {
    fn start<R>(&mut self, reader: &NsReader<R>, e: &BytesStart<'_>, base_dir: &Path) -> Result<()> {
        match e.local_name().as_ref() {
            b"grammars" => self.in_grammars = true,
            b"include" if self.in_grammars => {
                if let Some(href) = attribute(e, "href")? {
                    self.application.grammars.push(base_dir.join(href));
                }
            }
            b"resources" => {
                self.resources = Some(Resources {
                    base: attribute(e, "base")?.unwrap_or_default(),
                    resources: Vec::new(),
                });
            }
            b"resource" => {
                let path = attribute(e, "path")?.unwrap_or_default();
                self.stack.push(Resource::new(path));
            }
            b"method" if !self.stack.is_empty() => {
                self.method = attribute(e, "name")?.map(Method::new);
            }
            b"request" => {
                if let Some(method) = self.method.as_mut() {
                    method.request = Some(Request::default());
                    self.in_request = true;
                }
            }
            b"representation" if self.in_request => {
                let media_type = attribute(e, "mediaType")?;
                let element = match attribute(e, "element")? {
                    Some(value) => Some(resolve_qname(reader, &value)),
                    None => None,
                };
                if let Some(request) = self.method.as_mut().and_then(|m| m.request.as_mut()) {
                    request.representations.push(Representation { media_type, element });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"grammars" => self.in_grammars = false,
            b"request" => self.in_request = false,
            b"method" => {
                if let (Some(method), Some(resource)) = (self.method.take(), self.stack.last_mut()) {
                    resource.items.push(ResourceItem::Method(method));
                }
            }
            b"resource" => {
                if let Some(resource) = self.stack.pop() {
                    let resource = Arc::new(resource);
                    match self.stack.last_mut() {
                        Some(parent) => parent.items.push(ResourceItem::Resource(resource)),
                        None => {
                            if let Some(block) = self.resources.as_mut() {
                                block.resources.push(resource);
                            }
                        }
                    }
                }
            }
            b"resources" => {
                if let Some(block) = self.resources.take() {
                    self.application.resources.push(block);
                }
            }
            _ => {}
        }
    }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Resolve a prefixed name found in an attribute value using the in-scope
/// namespace declarations. Unbound prefixes keep the prefix without a namespace.
fn resolve_qname<R>(reader: &NsReader<R>, value: &str) -> QName {
    let (resolved, local) = reader.resolve_element(XmlName(value.as_bytes()));
    let local = String::from_utf8_lossy(local.as_ref()).into_owned();
    let namespace = match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    };
    let qname = QName::new(namespace, local);
    match value.split_once(':') {
        Some((prefix, _)) => qname.with_prefix(prefix),
        None => qname,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = r#"<?xml version="1.0"?>
<application xmlns="http://wadl.dev.java.net/2009/02" xmlns:tns="urn:shop">
  <grammars>
    <include href="shop.xsd"/>
  </grammars>
  <resources base="http://shop.example.com/api/">
    <resource path="items">
      <method name="GET"/>
      <method name="POST">
        <request>
          <representation mediaType="application/xml" element="tns:item"/>
        </request>
        <response>
          <representation mediaType="application/xml" element="tns:receipt"/>
        </response>
      </method>
      <resource path="{id}">
        <method name="GET"/>
        <method name="DELETE"/>
      </resource>
    </resource>
  </resources>
</application>"#;

    #[test]
    fn parse_should_read_resources_and_methods() {
        let app = parse_application(SHOP, Path::new("/defs")).unwrap();

        assert_eq!(app.grammars, vec![Path::new("/defs/shop.xsd").to_path_buf()]);
        assert_eq!(app.resources.len(), 1);
        let block = &app.resources[0];
        assert_eq!(block.base, "http://shop.example.com/api/");
        assert_eq!(block.resources.len(), 1);

        let items = &block.resources[0];
        assert_eq!(items.path, "items");
        assert_eq!(items.methods().count(), 2);
        let nested: Vec<_> = items.resources().collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].path, "{id}");
        assert!(nested[0].find_method("delete").is_some());
    }

    #[test]
    fn parse_should_resolve_element_prefix() {
        let app = parse_application(SHOP, Path::new(".")).unwrap();
        let post = app.resources[0].resources[0].find_method("POST").unwrap();
        let request = post.request.as_ref().unwrap();

        assert_eq!(request.representations.len(), 1);
        let rep = &request.representations[0];
        assert_eq!(rep.media_type.as_deref(), Some("application/xml"));
        let element = rep.element.as_ref().unwrap();
        assert_eq!(element.namespace.as_deref(), Some("urn:shop"));
        assert_eq!(element.local, "item");
        assert_eq!(element.prefix.as_deref(), Some("tns"));
    }

    #[test]
    fn parse_should_ignore_response_representations() {
        let app = parse_application(SHOP, Path::new(".")).unwrap();
        let get = app.resources[0].resources[0].find_method("GET").unwrap();
        assert!(get.request.is_none());
    }

    #[test]
    fn parse_should_fail_on_malformed_document() {
        let result = parse_application("<application><resources></application>", Path::new("."));
        assert!(result.is_err());
    }
}
