//! # Resource Path Tree
//!
//! An arena of nodes mirroring the resource hierarchy of every loaded
//! description. Nodes are addressed by [`NodeId`]; parent links are plain
//! indices and never own anything. Each `<resources>` block becomes a root,
//! and every path segment of a resource becomes one node.
//!
//! The only mutable state is the bound value of template-variable nodes and
//! the per-root slot (target override and authenticator).

use crate::repl::auth::Authenticator;
use crate::wadl::{Application, Resource, SchemaDocument};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Index of a node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Label used for roots whose base address has no host
pub const DEFAULT_ROOT_NAME: &str = "api";

fn template_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("valid template pattern"))
}

/// State owned by a root node only
#[derive(Debug)]
pub struct RootSlot {
    base: String,
    target: Option<String>,
    authenticator: Option<Box<dyn Authenticator>>,
    grammars: Vec<PathBuf>,
    schema: OnceLock<Option<Arc<SchemaDocument>>>,
}

impl RootSlot {
    fn new(base: String, grammars: Vec<PathBuf>) -> Self {
        Self {
            base,
            target: None,
            authenticator: None,
            grammars,
            schema: OnceLock::new(),
        }
    }
}

#[derive(Debug)]
pub struct ResourceNode {
    name: String,
    parent: Option<NodeId>,
    children: HashMap<String, NodeId>,
    variable: Option<String>,
    value: Option<String>,
    resource: Option<Arc<Resource>>,
}

impl ResourceNode {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        let variable = template_pattern()
            .captures(name)
            .filter(|c| c.get(0).map(|m| m.as_str()) == Some(name))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        Self {
            name: name.to_string(),
            parent,
            children: HashMap::new(),
            variable,
            value: None,
            resource: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Default)]
pub struct ResourceTree {
    nodes: Vec<ResourceNode>,
    roots: Vec<NodeId>,
    slots: HashMap<NodeId, RootSlot>,
}

impl ResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one root per `<resources>` block of `app`.
    ///
    /// Roots are labelled by the host of their base address unless `label`
    /// is given.
    pub fn add_application(&mut self, app: &Application, label: Option<&str>) -> Vec<NodeId> {
        app.resources
            .iter()
            .map(|block| {
                let name = label
                    .map(str::to_string)
                    .unwrap_or_else(|| root_label(&block.base));
                let root = self.add_root(&name, &block.base, app.grammars.clone());
                for resource in &block.resources {
                    self.add_resource(root, resource);
                }
                root
            })
            .collect()
    }

    pub fn add_root(&mut self, name: &str, base: &str, grammars: Vec<PathBuf>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = ResourceNode::new(name, None);
        node.variable = None;
        self.nodes.push(node);
        self.roots.push(id);
        self.slots.insert(id, RootSlot::new(base.to_string(), grammars));
        tracing::debug!("Added root '{}' with base {}", name, base);
        id
    }

    /// Attach `resource` below `parent`, creating one node per path segment.
    /// Nested resources are attached recursively. A resource landing on a
    /// node that already carries one is merged into it.
    pub fn add_resource(&mut self, parent: NodeId, resource: &Arc<Resource>) -> NodeId {
        let mut node = parent;
        for segment in resource.path.split('/').filter(|s| !s.is_empty()) {
            node = self.child_or_insert(node, segment);
        }

        let merged = match self.nodes[node.0].resource.take() {
            Some(existing) => {
                let mut combined = (*existing).clone();
                combined.items.extend(resource.items.iter().cloned());
                Arc::new(combined)
            }
            None => Arc::clone(resource),
        };
        self.nodes[node.0].resource = Some(merged);

        for nested in resource.resources() {
            self.add_resource(node, nested);
        }
        node
    }

    fn child_or_insert(&mut self, parent: NodeId, segment: &str) -> NodeId {
        if let Some(id) = self.nodes[parent.0].children.get(segment) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(ResourceNode::new(segment, Some(parent)));
        self.nodes[parent.0].children.insert(segment.to_string(), id);
        id
    }

    pub fn node(&self, id: NodeId) -> &ResourceNode {
        &self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Root whose label matches `name`, ignoring case
    pub fn find_root(&self, name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|id| self.nodes[id.0].name.eq_ignore_ascii_case(name))
    }

    /// Walk parent links up to the root
    pub fn root(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.nodes[id.0].parent {
            id = parent;
        }
        id
    }

    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[id.0].children.get(name).copied()
    }

    /// Resolve an absolute (`/a/b`) or relative (`../b`) path expression.
    /// `..` above a root and unknown segments yield `None`.
    pub fn resolve(&self, from: NodeId, path: &str) -> Option<NodeId> {
        let mut current = if path.starts_with('/') { self.root(from) } else { from };
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match segment {
                "." => current,
                ".." => self.nodes[current.0].parent?,
                name => self.child(current, name)?,
            };
        }
        Some(current)
    }

    /// Template variable this node stands for, if any
    pub fn variable_name(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].variable.as_deref()
    }

    pub fn bound_value(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].value.as_deref()
    }

    pub fn set_bound_value(&mut self, id: NodeId, value: Option<String>) {
        tracing::debug!(
            "Binding {:?} = {:?}",
            self.nodes[id.0].variable,
            value
        );
        self.nodes[id.0].value = value;
    }

    pub fn resource(&self, id: NodeId) -> Option<&Arc<Resource>> {
        self.nodes[id.0].resource.as_ref()
    }

    fn slot(&self, id: NodeId) -> &RootSlot {
        &self.slots[&self.root(id)]
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut RootSlot {
        let root = self.root(id);
        // every root is inserted together with its slot
        match self.slots.get_mut(&root) {
            Some(slot) => slot,
            None => unreachable!("root without slot"),
        }
    }

    /// User override of the base address for the root of `id`
    pub fn target(&self, id: NodeId) -> Option<&str> {
        self.slot(id).target.as_deref()
    }

    pub fn set_target(&mut self, id: NodeId, target: Option<String>) {
        tracing::debug!("Setting target to {:?}", target);
        self.slot_mut(id).target = target;
    }

    /// Target override when set, otherwise the declared base
    pub fn effective_base(&self, id: NodeId) -> &str {
        let slot = self.slot(id);
        slot.target.as_deref().unwrap_or(&slot.base)
    }

    pub fn authenticator(&self, id: NodeId) -> Option<&dyn Authenticator> {
        self.slot(id).authenticator.as_deref()
    }

    /// Replace (never merge) the authenticator bound to the root of `id`
    pub fn set_authenticator(&mut self, id: NodeId, authenticator: Option<Box<dyn Authenticator>>) {
        tracing::info!(
            "Authenticator for root '{}' set to {:?}",
            self.nodes[self.root(id).0].name,
            authenticator.as_ref().map(|a| a.scheme())
        );
        self.slot_mut(id).authenticator = authenticator;
    }

    /// Schema for payload synthesis below `id`, loaded on first use
    pub fn schema(&self, id: NodeId) -> Option<Arc<SchemaDocument>> {
        let slot = self.slot(id);
        slot.schema
            .get_or_init(|| load_schemas(&slot.grammars).map(Arc::new))
            .clone()
    }

    /// Absolute URI of `id`: the effective base followed by every segment
    /// from the root down, with `{var}` references substituted by the nearest
    /// bound value on the way up, percent-encoded. Unbound references are left
    /// as written.
    pub fn uri(&self, id: NodeId) -> String {
        let bindings = self.bindings(id);
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            segments.push(self.nodes[current.0].name.as_str());
            current = parent;
        }

        let mut uri = self.effective_base(id).trim_end_matches('/').to_string();
        for segment in segments.iter().rev() {
            let substituted = template_pattern().replace_all(segment, |caps: &regex::Captures<'_>| {
                bindings
                    .get(&caps[1])
                    .map(|v| urlencoding::encode(v).into_owned())
                    .unwrap_or_else(|| caps[0].to_string())
            });
            uri.push('/');
            uri.push_str(&substituted);
        }
        uri
    }

    /// Variable bindings visible from `id`; nearer bindings shadow farther ones
    pub fn bindings(&self, id: NodeId) -> HashMap<&str, &str> {
        let mut bindings = HashMap::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if let (Some(var), Some(value)) = (node.variable.as_deref(), node.value.as_deref()) {
                bindings.entry(var).or_insert(value);
            }
            current = node.parent;
        }
        bindings
    }

    /// Human-readable location used in the prompt, e.g. `api:/items/42`
    pub fn display_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            let node = &self.nodes[current.0];
            segments.push(node.value.clone().unwrap_or_else(|| node.name.clone()));
            current = parent;
        }
        segments.reverse();
        format!("{}:/{}", self.nodes[current.0].name, segments.join("/"))
    }
}

fn root_label(base: &str) -> String {
    reqwest::Url::parse(base)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string())
}

fn load_schemas(grammars: &[PathBuf]) -> Option<SchemaDocument> {
    let mut merged: Option<SchemaDocument> = None;
    for path in grammars {
        match SchemaDocument::load(path) {
            Ok(doc) => match merged.as_mut() {
                Some(m) => {
                    for (name, children) in doc.elements {
                        m.elements.entry(name).or_insert(children);
                    }
                }
                None => merged = Some(doc),
            },
            Err(e) => tracing::warn!("Skipping grammar {}: {:#}", path.display(), e),
        }
    }
    merged
}
