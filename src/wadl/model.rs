//! Resource descriptor model
//!
//! Read-only view of a parsed WADL document. The REPL never mutates these
//! values; they are shared by `Arc` between the description and the tree.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Namespace-qualified element name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
    pub prefix: Option<String>,
}

impl QName {
    pub fn new(namespace: Option<String>, local: impl Into<String>) -> Self {
        Self {
            namespace,
            local: local.into(),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// A body shape a request may carry
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    pub media_type: Option<String>,
    pub element: Option<QName>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub representations: Vec<Representation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub request: Option<Request>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            request: None,
        }
    }

    pub fn with_request(mut self, representations: Vec<Representation>) -> Self {
        self.request = Some(Request { representations });
        self
    }
}

/// One entry of a resource: either a method or a nested resource
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceItem {
    Method(Method),
    Resource(Arc<Resource>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub path: String,
    pub items: Vec<ResourceItem>,
}

impl Resource {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            items: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.items.push(ResourceItem::Method(method));
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.items.push(ResourceItem::Resource(Arc::new(resource)));
        self
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.items.iter().filter_map(|item| match item {
            ResourceItem::Method(m) => Some(m),
            ResourceItem::Resource(_) => None,
        })
    }

    pub fn resources(&self) -> impl Iterator<Item = &Arc<Resource>> {
        self.items.iter().filter_map(|item| match item {
            ResourceItem::Resource(r) => Some(r),
            ResourceItem::Method(_) => None,
        })
    }

    /// Find a method by case-insensitive name
    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.methods().find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

/// One `<resources>` block of a description
#[derive(Debug, Clone, PartialEq)]
pub struct Resources {
    pub base: String,
    pub resources: Vec<Arc<Resource>>,
}

/// A parsed description document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Application {
    /// Schema locations, already resolved against the document's directory
    pub grammars: Vec<PathBuf>,
    pub resources: Vec<Resources>,
}
