//! Arena-based XML document tree.
//!
//! All nodes live in a `Vec` owned by the [`Document`] and are referenced by
//! [`NodeId`], a newtype over `NonZeroU32`. Parent links are plain ids, so a
//! parent never owns its back-reference and a subtree can be moved or
//! destroyed without leaving dangling pointers behind. Destroyed nodes leave
//! a tombstone in the arena; their ids are never reused.
//!
//! Children and attributes are ordered `Vec`s. Every counting and indexed
//! accessor on this type is 1-based, and an index of 0 or past the end yields
//! `None`.
//!
//! Each node caches a materialized `path` (slash-joined ancestor names). The
//! path is computed when the node is created under a parent, attached with
//! [`Document::add_child`], or promoted with [`Document::add_root`]. Moving a
//! node only recomputes the moved node's own path; descendants keep their
//! cached paths until [`Document::refresh_paths`] is called.

mod node;
mod selector;

pub use node::NodeKind;
pub use selector::Selector;

use std::num::NonZeroU32;
use std::path::Path;

use crate::error::{ParseDiagnostic, Result, XmlError};
use crate::parser::ParseOptions;
use crate::serial::{DumpOptions, DumpOutput};

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero
/// and `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }

    /// Converts this `NodeId` to a raw `u32`.
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0.get()
    }

    /// Creates a `NodeId` from a raw `u32`, if non-zero.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }
}

/// Storage for a single node in the document arena.
///
/// Read it through [`Document::node`]; mutate it through the `Document`
/// methods so that parent links, child lists, and paths stay consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Element, comment, or CDATA.
    pub kind: NodeKind,
    /// Tag name, or the synthetic name for comments and CDATA sections.
    pub name: String,
    /// Text content. Empty when the node has none.
    pub value: String,
    /// Attributes in insertion order. Always empty for non-elements.
    pub attributes: Vec<Attribute>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// Parent node. `None` for roots and for nodes not yet attached.
    pub parent: Option<NodeId>,
    /// Slash-joined ancestor names, ending with this node's name.
    pub path: String,
}

impl NodeData {
    fn new(kind: NodeKind, name: String, value: String) -> Self {
        Self {
            kind,
            path: name.clone(),
            name,
            value,
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub name: String,
    /// The attribute value (unescaped). Empty when no value was given.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An XML document: a forest of root nodes plus header and charset settings.
///
/// # Examples
///
/// ```
/// use txml::Document;
///
/// let mut doc = Document::new();
/// let root = doc.create_node("config", None, None).unwrap();
/// doc.add_root(root).unwrap();
/// let port = doc.create_node("port", Some("8080"), Some(root)).unwrap();
///
/// assert_eq!(doc.path(port), "config/port");
/// assert_eq!(doc.get_node("/config/port"), Some(port));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`);
    /// `None` marks a destroyed node.
    nodes: Vec<Option<NodeData>>,
    /// Root nodes in document order.
    roots: Vec<NodeId>,
    /// Whether more than one root node may be added.
    pub allow_multiple_roots: bool,
    /// The text between `<?` and `?>` of the first processing instruction.
    pub header: Option<String>,
    /// Charset named by the header's `encoding` attribute (default UTF-8).
    pub source_encoding: String,
    /// Charset [`Document::dump`] produces (default UTF-8).
    pub output_encoding: String,
    /// Warnings and recovered errors collected while parsing.
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Document {
    /// Creates an empty document with UTF-8 source and output encodings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![None],
            roots: Vec::new(),
            allow_multiple_roots: false,
            header: None,
            source_encoding: crate::encoding::DEFAULT_ENCODING.to_string(),
            output_encoding: crate::encoding::DEFAULT_ENCODING.to_string(),
            diagnostics: Vec::new(),
        }
    }

    // --- Parsing ---

    /// Parses an XML string into a new `Document`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`XmlError`] hit while parsing.
    ///
    /// # Examples
    ///
    /// ```
    /// use txml::Document;
    ///
    /// let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
    /// let child = doc.get_node("/root/child").unwrap();
    /// assert_eq!(doc.value(child), "Hello");
    /// ```
    pub fn parse_str(input: &str) -> Result<Self> {
        Self::parse_str_with_options(input, &ParseOptions::default())
    }

    /// Parses an XML string into a new `Document` with the given options.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`XmlError`] hit while parsing.
    pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Self> {
        let mut doc = Self::new();
        doc.parse_buffer_with_options(input, options)?;
        Ok(doc)
    }

    /// Parses raw bytes into a new `Document`, detecting the encoding from a
    /// BOM or the header's `encoding` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Encoding`] if the bytes cannot be decoded, or the
    /// first fatal parse error.
    pub fn parse_bytes(input: &[u8]) -> Result<Self> {
        let mut doc = Self::new();
        doc.parse_buffer_bytes(input)?;
        Ok(doc)
    }

    /// Parses `input` into this document.
    ///
    /// New top-level nodes are appended to the existing roots. On error the
    /// nodes built so far are kept; the caller decides whether to discard the
    /// document.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`XmlError`] hit while parsing.
    pub fn parse_buffer(&mut self, input: &str) -> Result<()> {
        self.parse_buffer_with_options(input, &ParseOptions::default())
    }

    /// Like [`parse_buffer`](Self::parse_buffer), with explicit options.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`XmlError`] hit while parsing.
    pub fn parse_buffer_with_options(&mut self, input: &str, options: &ParseOptions) -> Result<()> {
        crate::parser::parse_into(self, input, options)
    }

    /// Decodes `input` to UTF-8 and parses it into this document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Encoding`] if the bytes cannot be decoded, or the
    /// first fatal parse error.
    pub fn parse_buffer_bytes(&mut self, input: &[u8]) -> Result<()> {
        let text = crate::encoding::decode_to_utf8(input)?;
        self.parse_buffer(&text)
    }

    /// Reads `path` under an advisory lock and parses it into this document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Io`] or [`XmlError::StuckLock`] when the file
    /// cannot be read, otherwise the first fatal parse error.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = crate::persist::read_locked(path.as_ref())?;
        self.parse_buffer_bytes(&bytes)
    }

    // --- Serialization ---

    /// Renders the document in its output encoding.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Encoding`] when the output charset is unknown or
    /// cannot represent the document text.
    pub fn dump(&self) -> Result<DumpOutput> {
        crate::serial::dump(self)
    }

    /// Like [`dump`](Self::dump), with explicit formatting options.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Encoding`] when transcoding fails.
    pub fn dump_with_options(&self, options: &DumpOptions) -> Result<DumpOutput> {
        crate::serial::dump_with_options(self, options)
    }

    /// Renders one node and its subtree as UTF-8 text at the given depth.
    #[must_use]
    pub fn dump_branch(&self, id: NodeId, depth: usize) -> String {
        crate::serial::dump_branch(self, id, depth)
    }

    /// Writes the dump to `path`, first copying an existing non-empty file to
    /// `<path>.bck`.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Encoding`] if dumping fails (nothing is written),
    /// or [`XmlError::Io`] / [`XmlError::StuckLock`] for file failures.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::persist::save(self, path.as_ref())
    }

    // --- Node access ---

    /// Returns the node data, or `None` if `id` was destroyed or never
    /// belonged to this document.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.as_index()).and_then(Option::as_ref)
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a live node.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn node(&self, id: NodeId) -> &NodeData {
        self.get(id).expect("NodeId does not refer to a live node")
    }

    #[allow(clippy::expect_used)]
    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.nodes
            .get_mut(id.as_index())
            .and_then(Option::as_mut)
            .expect("NodeId does not refer to a live node")
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the node's name.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// Returns the node's value (empty string when unset).
    #[must_use]
    pub fn value(&self, id: NodeId) -> &str {
        &self.node(id).value
    }

    /// Returns the node's kind.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Returns the node's materialized path.
    #[must_use]
    pub fn path(&self, id: NodeId) -> &str {
        &self.node(id).path
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of a node in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns the attributes of a node in insertion order.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        &self.node(id).attributes
    }

    /// Returns the value of the first attribute called `name`.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the root nodes in document order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the first root element, skipping top-level comments and CDATA.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|&r| self.kind(r) == NodeKind::Element)
    }

    /// Returns an iterator over a node and its ancestors (walking up to root).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    // --- Counting and indexed access (1-based) ---

    /// Number of children of a node.
    #[must_use]
    pub fn count_children(&self, id: NodeId) -> usize {
        self.node(id).children.len()
    }

    /// Number of attributes of a node.
    #[must_use]
    pub fn count_attributes(&self, id: NodeId) -> usize {
        self.node(id).attributes.len()
    }

    /// Number of root nodes.
    #[must_use]
    pub fn count_branches(&self) -> usize {
        self.roots.len()
    }

    /// The child at a 1-based index.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        let i = index.checked_sub(1)?;
        self.node(id).children.get(i).copied()
    }

    /// The attribute at a 1-based index.
    #[must_use]
    pub fn attribute_at(&self, id: NodeId, index: usize) -> Option<&Attribute> {
        let i = index.checked_sub(1)?;
        self.node(id).attributes.get(i)
    }

    /// The root node at a 1-based index.
    #[must_use]
    pub fn branch_at(&self, index: usize) -> Option<NodeId> {
        let i = index.checked_sub(1)?;
        self.roots.get(i).copied()
    }

    /// Finds a direct child by selector: `tag`, `tag[N]`, or
    /// `tag[@attr='value']`. See [`Selector`].
    ///
    /// # Examples
    ///
    /// ```
    /// use txml::Document;
    ///
    /// let doc = Document::parse_str(r#"<r><c id="a"/><c id="b"/></r>"#).unwrap();
    /// let r = doc.root().unwrap();
    /// let second = doc.child_at(r, 2);
    /// assert_eq!(doc.child_by_name(r, "c[2]"), second);
    /// assert_eq!(doc.child_by_name(r, "c[@id='b']"), second);
    /// assert_eq!(doc.child_by_name(r, "c[3]"), None);
    /// ```
    #[must_use]
    pub fn child_by_name(&self, id: NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        self.select_child(id, &selector)
    }

    /// Finds a direct child matching an already-parsed selector.
    #[must_use]
    pub fn select_child(&self, id: NodeId, selector: &Selector<'_>) -> Option<NodeId> {
        let mut named = self
            .node(id)
            .children
            .iter()
            .copied()
            .filter(|&child| self.name(child) == selector.name());
        match selector {
            Selector::Name(_) => named.next(),
            Selector::Index(_, n) => named.nth(n.checked_sub(1)?),
            Selector::Attribute { attr, value, .. } => {
                named.find(|&child| self.attribute(child, attr) == Some(value.as_str()))
            }
        }
    }

    /// Resolves a slash-separated path such as `/root/child[2]`.
    /// See [`crate::path::resolve`].
    #[must_use]
    pub fn get_node(&self, path: &str) -> Option<NodeId> {
        crate::path::resolve(self, path)
    }

    // --- Construction ---

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(Some(data));
        NodeId::from_index(index)
    }

    /// Creates an element. With a `parent` the node becomes its last child;
    /// without one it stays detached until passed to
    /// [`add_child`](Self::add_child) or [`add_root`](Self::add_root).
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::BadArguments`] if `name` is empty or `parent` is
    /// not an element.
    pub fn create_node(
        &mut self,
        name: &str,
        value: Option<&str>,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        if name.is_empty() {
            return Err(XmlError::BadArguments(
                "node name must not be empty".to_string(),
            ));
        }
        self.check_parent(parent)?;
        let id = self.alloc(NodeData::new(
            NodeKind::Element,
            name.to_string(),
            value.unwrap_or_default().to_string(),
        ));
        if let Some(parent) = parent {
            self.attach(parent, id);
        }
        Ok(id)
    }

    /// Creates a comment node holding `text` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::BadArguments`] if `parent` is not an element.
    pub fn create_comment(&mut self, text: &str, parent: Option<NodeId>) -> Result<NodeId> {
        self.create_special(NodeKind::Comment, text, parent)
    }

    /// Creates a CDATA node holding `text` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::BadArguments`] if `parent` is not an element.
    pub fn create_cdata(&mut self, text: &str, parent: Option<NodeId>) -> Result<NodeId> {
        self.create_special(NodeKind::CData, text, parent)
    }

    fn create_special(
        &mut self,
        kind: NodeKind,
        text: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        self.check_parent(parent)?;
        let name = kind.synthetic_name().unwrap_or_default().to_string();
        let id = self.alloc(NodeData::new(kind, name, text.to_string()));
        if let Some(parent) = parent {
            self.attach(parent, id);
        }
        Ok(id)
    }

    /// Only elements may hold children; comments and CDATA are leaves.
    fn check_parent(&self, parent: Option<NodeId>) -> Result<()> {
        match parent {
            Some(p) if self.kind(p) != NodeKind::Element => Err(XmlError::BadArguments(
                format!("a {} node cannot have children", self.kind(p)),
            )),
            _ => Ok(()),
        }
    }

    // --- Mutation ---

    /// Replaces a node's value.
    pub fn set_value(&mut self, id: NodeId, value: &str) {
        value.clone_into(&mut self.node_mut(id).value);
    }

    /// Moves `child` under `parent` as its last child, detaching it from any
    /// previous parent (or from the root list) first.
    ///
    /// Only the moved node's path is recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::BadArguments`] if `child == parent` or `parent`
    /// is not an element.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if parent == child {
            return Err(XmlError::BadArguments(
                "a node cannot be its own child".to_string(),
            ));
        }
        self.check_parent(Some(parent))?;
        debug_assert!(
            !self.ancestors(parent).any(|a| a == child),
            "attaching a node below itself would create a cycle"
        );
        self.detach(child);
        self.attach(parent, child);
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let path = self.child_path(parent, &self.node(child).name);
        self.node_mut(parent).children.push(child);
        let node = self.node_mut(child);
        node.parent = Some(parent);
        node.path = path;
    }

    fn child_path(&self, parent: NodeId, name: &str) -> String {
        let parent = self.node(parent);
        let base = if parent.path.is_empty() {
            &parent.name
        } else {
            &parent.path
        };
        format!("{base}/{name}")
    }

    /// Makes `id` a root node, detaching it from its parent first.
    ///
    /// Only element roots count towards the single-root limit; top-level
    /// comments and CDATA sections are always accepted.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::TooManyRoots`] if an element root already exists
    /// and [`allow_multiple_roots`](Self::allow_multiple_roots) is off. The
    /// document is left unchanged in that case.
    pub fn add_root(&mut self, id: NodeId) -> Result<()> {
        if self.roots.contains(&id) {
            return Ok(());
        }
        if !self.allow_multiple_roots
            && self.kind(id) == NodeKind::Element
            && self.roots.iter().any(|&r| self.kind(r) == NodeKind::Element)
        {
            return Err(XmlError::TooManyRoots);
        }
        self.detach(id);
        self.roots.push(id);
        let node = self.node_mut(id);
        node.path.clone_from(&node.name);
        Ok(())
    }

    /// Removes a node from its parent's children (or from the root list)
    /// without destroying it.
    pub fn detach(&mut self, id: NodeId) {
        match self.node(id).parent {
            Some(parent) => {
                self.node_mut(parent).children.retain(|&c| c != id);
                self.node_mut(id).parent = None;
            }
            None => self.roots.retain(|&r| r != id),
        }
    }

    /// Detaches a node and frees it together with its whole subtree.
    ///
    /// Ids of destroyed nodes are invalid afterwards.
    pub fn destroy_node(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(data) = self.nodes.get_mut(next.as_index()).and_then(Option::take) {
                stack.extend(data.children);
            }
        }
    }

    /// Replaces the root at a 1-based index with `new_root`, destroying the
    /// old branch.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::NotFound`] if there is no root at `index`, and
    /// [`XmlError::TooManyRoots`] if the substitution would leave two element
    /// roots while [`allow_multiple_roots`](Self::allow_multiple_roots) is
    /// off. The document is left unchanged on error.
    pub fn subst_branch(&mut self, index: usize, new_root: NodeId) -> Result<()> {
        let old = self.branch_at(index).ok_or(XmlError::NotFound)?;
        if old == new_root {
            return Ok(());
        }
        if !self.allow_multiple_roots
            && self.kind(new_root) == NodeKind::Element
            && self
                .roots
                .iter()
                .any(|&r| r != old && r != new_root && self.kind(r) == NodeKind::Element)
        {
            return Err(XmlError::TooManyRoots);
        }
        self.detach(new_root);
        let pos = self
            .roots
            .iter()
            .position(|&r| r == old)
            .ok_or(XmlError::NotFound)?;
        self.roots[pos] = new_root;
        let node = self.node_mut(new_root);
        node.path.clone_from(&node.name);
        self.destroy_node(old);
        Ok(())
    }

    /// Destroys the root at a 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::NotFound`] if there is no root at `index`.
    pub fn remove_branch(&mut self, index: usize) -> Result<()> {
        let old = self.branch_at(index).ok_or(XmlError::NotFound)?;
        self.destroy_node(old);
        Ok(())
    }

    /// Destroys the node a path resolves to.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::NotFound`] if the path does not resolve.
    pub fn remove_node_at(&mut self, path: &str) -> Result<()> {
        let id = self.get_node(path).ok_or(XmlError::NotFound)?;
        self.destroy_node(id);
        Ok(())
    }

    /// Recomputes the cached paths of `id` and all its descendants.
    pub fn refresh_paths(&mut self, id: NodeId) {
        let path = match self.node(id).parent {
            Some(parent) => self.child_path(parent, &self.node(id).name),
            None => self.node(id).name.clone(),
        };
        self.node_mut(id).path = path;
        let mut stack: Vec<NodeId> = self.node(id).children.clone();
        while let Some(child) = stack.pop() {
            if let Some(parent) = self.node(child).parent {
                let path = self.child_path(parent, &self.node(child).name);
                self.node_mut(child).path = path;
            }
            stack.extend_from_slice(&self.node(child).children);
        }
    }

    // --- Attributes ---

    /// Appends an attribute. A missing value is stored as an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::BadArguments`] if `name` is empty.
    pub fn add_attribute(&mut self, id: NodeId, name: &str, value: Option<&str>) -> Result<()> {
        if name.is_empty() {
            return Err(XmlError::BadArguments(
                "attribute name must not be empty".to_string(),
            ));
        }
        self.node_mut(id)
            .attributes
            .push(Attribute::new(name, value.unwrap_or_default()));
        Ok(())
    }

    /// Removes and returns the attribute at a 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::NotFound`] if the index is 0 or out of range.
    pub fn remove_attribute(&mut self, id: NodeId, index: usize) -> Result<Attribute> {
        let attributes = &mut self.node_mut(id).attributes;
        match index.checked_sub(1) {
            Some(i) if i < attributes.len() => Ok(attributes.remove(i)),
            _ => Err(XmlError::NotFound),
        }
    }

    /// Removes all attributes of a node.
    pub fn clear_attributes(&mut self, id: NodeId) {
        self.node_mut(id).attributes.clear();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get(current).and_then(|n| n.parent);
        Some(current)
    }
}
