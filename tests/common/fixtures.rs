//! Description fixtures and session builders shared by the test suites

use std::path::{Path, PathBuf};
use std::sync::Arc;
use wadline::repl::services::Transport;
use wadline::wadl::{load_application, SkeletonGenerator};
use wadline::{
    Interpreter, MockConsole, PayloadResolver, RequestEngine, ResourceTree, ResponseRenderer,
};

const BASE_PLACEHOLDER: &str = "BASE_URL";

pub const SHOP_WADL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<application xmlns="http://wadl.dev.java.net/2009/02" xmlns:tns="urn:shop">
  <grammars>
    <include href="shop.xsd"/>
  </grammars>
  <resources base="BASE_URL">
    <resource path="items">
      <method name="GET"/>
      <method name="POST">
        <request>
          <representation mediaType="application/xml" element="tns:item"/>
        </request>
      </method>
      <resource path="{id}">
        <method name="GET"/>
        <method name="PUT">
          <request>
            <representation mediaType="application/xml" element="tns:item"/>
          </request>
        </method>
        <method name="DELETE"/>
      </resource>
    </resource>
  </resources>
</application>
"#;

pub const SHOP_XSD: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           targetNamespace="urn:shop" elementFormDefault="qualified">
  <xs:element name="item">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="name" type="xs:string"/>
        <xs:element name="price" type="xs:decimal"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>
"#;

/// Write the shop description (pointing at `base`) and its schema into `dir`
pub fn write_shop_description(dir: &Path, base: &str) -> PathBuf {
    let wadl = dir.join("shop.wadl");
    std::fs::write(&wadl, SHOP_WADL.replace(BASE_PLACEHOLDER, base)).unwrap();
    std::fs::write(dir.join("shop.xsd"), SHOP_XSD).unwrap();
    wadl
}

/// A session over the shop description with its root labelled `api`
pub fn shop_session(
    dir: &Path,
    base: &str,
    transport: Arc<dyn Transport>,
    console: MockConsole,
    color: bool,
) -> Interpreter<MockConsole> {
    let wadl = write_shop_description(dir, base);
    let app = load_application(&wadl).unwrap();
    let mut tree = ResourceTree::new();
    tree.add_application(&app, Some("api"));

    let resolver = PayloadResolver::new(dir.join("temp.xml"), Box::new(SkeletonGenerator));
    let engine = RequestEngine::new(transport, resolver, ResponseRenderer::new(color));
    Interpreter::new(tree, console, engine)
}
