//! In-memory element tree
//!
//! A small document model: elements with a tag, classes, ordered attributes,
//! inline styles and text. IDs are indexed for O(1) lookup while a node is
//! attached under the root. Styles written by a widget are also what it reads
//! back as "computed" styles; there is no cascade.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

use carousel_core::{Dom, Result};

use crate::selector::{CompoundSelector, MatchTree, Selector};

new_key_type! {
    pub struct NodeId;
}

impl NodeId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create from a raw u64 representation
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// A single element in the document
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attributes: IndexMap<String, String>,
    style: IndexMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute value; `class` reflects the class list
    pub fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            return (!self.classes.is_empty()).then(|| self.classes.join(" "));
        }
        self.attributes.get(name).cloned()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn matches_compound(&self, compound: &CompoundSelector) -> bool {
        if let Some(ref tag) = compound.element {
            if !self.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(ref id) = compound.id {
            if self.attributes.get("id") != Some(id) {
                return false;
            }
        }
        compound.classes.iter().all(|c| self.has_class(c))
            && compound
                .attributes
                .iter()
                .all(|a| a.matches(self.attribute(&a.name).as_deref()))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent element description, materialized by `Document::create`/`append`
///
/// ```
/// use carousel_dom::{el, Document};
///
/// let mut doc = Document::new();
/// let list = doc.append(
///     doc.root(),
///     el("ul")
///         .class("carousel-list")
///         .child(el("li").class("carousel-item").style("width", "300px").text("1")),
/// );
/// assert_eq!(doc.get(list).unwrap().children().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementBuilder {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attributes: IndexMap<String, String>,
    style: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<ElementBuilder>,
}

/// Start describing an element with the given tag
pub fn el(tag: impl Into<String>) -> ElementBuilder {
    ElementBuilder {
        tag: tag.into(),
        ..Default::default()
    }
}

impl ElementBuilder {
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children.extend(children);
        self
    }
}

// ============================================================================
// Document
// ============================================================================

/// An element tree rooted at a `#document` node
#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<NodeId, Element>,
    root: NodeId,
    /// String ID -> node, for attached nodes only
    ids: FxHashMap<String, NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Element {
            tag: "#document".to_string(),
            ..Default::default()
        });
        Self {
            nodes,
            root,
            ids: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node)
    }

    /// Number of nodes, attached or not, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Look up an attached element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Check whether `node` hangs under the root
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.ancestors_inclusive(node).last() == Some(&self.root)
    }

    /// `node` followed by each ancestor up to the root (or the detached top)
    pub fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.nodes.contains_key(node).then_some(node);
        while let Some(n) = current {
            path.push(n);
            current = self.nodes.get(n).and_then(|e| e.parent);
        }
        path
    }

    /// All descendants of `node` in document (pre-)order, excluding `node`
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(node) {
            Some(element) => element.children.iter().rev().copied().collect(),
            None => return result,
        };
        while let Some(n) = stack.pop() {
            result.push(n);
            if let Some(element) = self.nodes.get(n) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        result
    }

    /// Concatenated text of `node` and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        std::iter::once(node)
            .chain(self.descendants(node))
            .filter_map(|n| self.nodes.get(n).and_then(|e| e.text.as_deref()))
            .collect()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Materialize a builder as a detached subtree
    pub fn create(&mut self, builder: ElementBuilder) -> NodeId {
        let ElementBuilder {
            tag,
            classes,
            attributes,
            style,
            text,
            children,
        } = builder;

        let node = self.nodes.insert(Element {
            tag,
            classes,
            attributes,
            style,
            text,
            parent: None,
            children: Vec::with_capacity(children.len()),
        });
        for child in children {
            let child = self.create(child);
            self.link(node, child, None);
        }
        node
    }

    /// Materialize a builder and append it under `parent`
    pub fn append(&mut self, parent: NodeId, builder: ElementBuilder) -> NodeId {
        let node = self.create(builder);
        self.append_child(parent, node);
        node
    }

    /// Parse and evaluate a selector over the descendants of `scope`
    pub fn select(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let parsed = Selector::parse(selector).map_err(|e| e.into_carousel_error(selector))?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|n| parsed.matches(self, *n))
            .collect())
    }

    // =========================================================================
    // Tree surgery
    // =========================================================================

    /// Attach `child` under `parent` at `index` (end when None)
    fn link(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        if let Some(element) = self.nodes.get_mut(child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.nodes.get_mut(parent) {
            match index {
                Some(i) if i <= element.children.len() => element.children.insert(i, child),
                _ => element.children.push(child),
            }
        }
        if self.is_attached(parent) {
            self.register_subtree(child);
        }
    }

    /// Detach `node` from its parent, keeping the subtree alive
    fn unlink(&mut self, node: NodeId) {
        if self.is_attached(node) {
            self.unregister_subtree(node);
        }
        let parent = self.nodes.get_mut(node).and_then(|e| e.parent.take());
        if let Some(element) = parent.and_then(|p| self.nodes.get_mut(p)) {
            element.children.retain(|c| *c != node);
        }
    }

    /// Would attaching `child` under `parent` create a cycle?
    fn would_cycle(&self, parent: NodeId, child: NodeId) -> bool {
        self.ancestors_inclusive(parent).contains(&child)
    }

    fn register_subtree(&mut self, node: NodeId) {
        for n in std::iter::once(node).chain(self.descendants(node)) {
            if let Some(id) = self.nodes.get(n).and_then(|e| e.attributes.get("id")) {
                if self.ids.get(id).is_some_and(|existing| *existing != n) {
                    tracing::warn!("Duplicate element ID registered: {}", id);
                }
                self.ids.insert(id.clone(), n);
            }
        }
    }

    fn unregister_subtree(&mut self, node: NodeId) {
        for n in std::iter::once(node).chain(self.descendants(node)) {
            if let Some(id) = self.nodes.get(n).and_then(|e| e.attributes.get("id")) {
                if self.ids.get(id) == Some(&n) {
                    self.ids.remove(id);
                }
            }
        }
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Render `node` and its subtree as HTML (for debugging and dumps)
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.nodes.get(node) else {
            return;
        };
        if node == self.root {
            for child in &element.children {
                self.write_html(*child, out);
            }
            return;
        }

        out.push('<');
        out.push_str(&element.tag);
        if !element.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", element.classes.join(" ")));
        }
        for (name, value) in &element.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, value));
        }
        if !element.style.is_empty() {
            let style: Vec<String> = element
                .style
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect();
            out.push_str(&format!(" style=\"{}\"", style.join("; ")));
        }
        out.push('>');
        if let Some(ref text) = element.text {
            out.push_str(text);
        }
        for child in &element.children {
            self.write_html(*child, out);
        }
        out.push_str(&format!("</{}>", element.tag));
    }
}

impl MatchTree for Document {
    type Node = NodeId;

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|e| e.parent)
    }

    fn matches_compound(&self, node: NodeId, compound: &CompoundSelector) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|e| e.matches_compound(compound))
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn query_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        self.select(scope, selector)
    }

    fn matches(&self, node: NodeId, selector: &str) -> Result<bool> {
        let parsed = Selector::parse(selector).map_err(|e| e.into_carousel_error(selector))?;
        Ok(parsed.matches(self, node))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes.get(node).and_then(|e| e.attribute(name))
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "class" {
            if let Some(element) = self.nodes.get_mut(node) {
                element.classes = value.split_whitespace().map(str::to_string).collect();
            }
            return;
        }

        let attached = name == "id" && self.is_attached(node);
        if attached {
            self.unregister_subtree(node);
        }
        if let Some(element) = self.nodes.get_mut(node) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
        if attached {
            self.register_subtree(node);
        }
    }

    fn computed_style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(node)
            .and_then(|e| e.style(property))
            .map(str::to_string)
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            element.style.insert(property.to_string(), value.to_string());
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.get(node).is_some_and(|e| e.has_class(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.nodes.get_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let children: Vec<NodeId> = match self.nodes.get(node) {
            Some(element) => element.children.clone(),
            None => return,
        };
        for child in children {
            self.remove(child);
        }
        if let Some(element) = self.nodes.get_mut(node) {
            element.text = Some(text.to_string());
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        if self.would_cycle(parent, child) {
            tracing::warn!(?parent, ?child, "refusing to append an ancestor into its descendant");
            return;
        }
        self.unlink(child);
        self.link(parent, child, None);
    }

    fn clone_node(&mut self, node: NodeId) -> Option<NodeId> {
        let element = self.nodes.get(node)?.clone();
        let copy = self.nodes.insert(Element {
            parent: None,
            children: Vec::with_capacity(element.children.len()),
            ..element.clone()
        });
        for child in element.children {
            if let Some(child_copy) = self.clone_node(child) {
                self.link(copy, child_copy, None);
            }
        }
        Some(copy)
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if reference == node || !self.nodes.contains_key(node) {
            return;
        }
        let Some(parent) = self.parent_of(reference) else {
            tracing::warn!(?reference, "insert_after on a node without a parent");
            return;
        };
        if self.would_cycle(parent, node) {
            tracing::warn!(?parent, ?node, "refusing to insert an ancestor into its descendant");
            return;
        }
        self.unlink(node);
        let index = self
            .nodes
            .get(parent)
            .and_then(|p| p.children.iter().position(|c| *c == reference))
            .map(|i| i + 1);
        self.link(parent, node, index);
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root || !self.nodes.contains_key(node) {
            return;
        }
        self.unlink(node);
        let subtree: Vec<NodeId> = std::iter::once(node).chain(self.descendants(node)).collect();
        for n in subtree {
            self.nodes.remove(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let container = doc.append(
            doc.root(),
            el("div").id("gallery").class("carousel-container").child(
                el("ul")
                    .class("carousel-list")
                    .children((0..3).map(|i| {
                        el("li")
                            .class("carousel-item")
                            .attr("data-index", i.to_string())
                            .text(format!("slide {}", i + 1))
                    })),
            ),
        );
        (doc, container)
    }

    #[test]
    fn test_query_in_document_order() {
        let (doc, container) = sample();
        let items = doc.query_all(container, ".carousel-item").unwrap();
        assert_eq!(items.len(), 3);

        let labels: Vec<String> = items.iter().map(|n| doc.text_content(*n)).collect();
        assert_eq!(labels, vec!["slide 1", "slide 2", "slide 3"]);

        // Query excludes the scope itself
        assert!(doc.query_all(container, ".carousel-container").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let (doc, container) = sample();
        let err = doc.query_all(container, "li[").unwrap_err();
        assert!(matches!(err, carousel_core::CarouselError::InvalidSelector { .. }));
    }

    #[test]
    fn test_id_registry_follows_attachment() {
        let (mut doc, container) = sample();
        assert_eq!(doc.get_element_by_id("gallery"), Some(container));

        let detached = doc.create(el("section").id("spare"));
        assert_eq!(doc.get_element_by_id("spare"), None);

        doc.append_child(container, detached);
        assert_eq!(doc.get_element_by_id("spare"), Some(detached));

        doc.remove(container);
        assert_eq!(doc.get_element_by_id("gallery"), None);
        assert_eq!(doc.get_element_by_id("spare"), None);
        assert!(doc.get(detached).is_none());
    }

    #[test]
    fn test_clone_and_insert_after() {
        let (mut doc, container) = sample();
        let items = doc.query_all(container, ".carousel-item").unwrap();
        let last = *items.last().unwrap();

        let copy = doc.clone_node(last).unwrap();
        assert!(doc.parent(copy).is_none());
        doc.set_attr(copy, "data-index", "3");
        doc.insert_after(last, copy);

        let items = doc.query_all(container, ".carousel-item").unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[3], copy);
        assert_eq!(doc.attr(last, "data-index").as_deref(), Some("2"));
        assert_eq!(doc.text_content(copy), "slide 3");
    }

    #[test]
    fn test_insert_after_keeps_sibling_order() {
        let (mut doc, container) = sample();
        let items = doc.query_all(container, ".carousel-item").unwrap();
        let extra = doc.create(el("li").class("carousel-item").text("extra"));

        doc.insert_after(items[0], extra);

        let items = doc.query_all(container, ".carousel-item").unwrap();
        assert_eq!(doc.text_content(items[1]), "extra");
    }

    #[test]
    fn test_classes_and_styles() {
        let (mut doc, container) = sample();
        let list = doc.query(container, ".carousel-list").unwrap().unwrap();

        doc.add_class(list, "current");
        doc.add_class(list, "current");
        assert_eq!(doc.get(list).unwrap().classes().len(), 2);
        assert_eq!(doc.attr(list, "class").as_deref(), Some("carousel-list current"));

        doc.remove_class(list, "current");
        assert!(!doc.has_class(list, "current"));

        doc.set_style(list, "left", "-300px");
        assert_eq!(doc.computed_style(list, "left").as_deref(), Some("-300px"));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut doc, container) = sample();
        let list = doc.query(container, ".carousel-list").unwrap().unwrap();

        doc.append_child(list, container);
        assert_eq!(doc.parent(list), Some(container));
        assert!(doc.is_attached(container));
    }

    #[test]
    fn test_set_text_replaces_children() {
        let (mut doc, container) = sample();
        let list = doc.query(container, ".carousel-list").unwrap().unwrap();

        doc.set_text(list, "empty");
        assert!(doc.get(list).unwrap().children().is_empty());
        assert_eq!(doc.text_content(container), "empty");
    }

    #[test]
    fn test_outer_html() {
        let mut doc = Document::new();
        let a = doc.append(
            doc.root(),
            el("a").class("current").attr("data-gotoslide", "0").text("1"),
        );
        assert_eq!(
            doc.outer_html(a),
            r#"<a class="current" data-gotoslide="0">1</a>"#
        );
    }
}
