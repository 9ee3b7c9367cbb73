//! The DOM collaborator driven by the carousel
//!
//! The widget never owns a rendering tree. It asks a `Dom` implementation to
//! look elements up by selector, read measured styles, and mutate styles,
//! classes, attributes and structure. Browser bindings and test documents
//! plug in here.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

/// Element query, style and class operations the carousel relies on
///
/// Selector arguments use CSS selector syntax. Query methods search the
/// descendants of `scope` (not `scope` itself) and return matches in
/// document order.
pub trait Dom {
    /// Handle to an element in this document
    type Node: Copy + Eq + Hash + Debug;

    // =========================================================================
    // Queries
    // =========================================================================

    /// All descendants of `scope` matching `selector`, in document order
    fn query_all(&self, scope: Self::Node, selector: &str) -> Result<Vec<Self::Node>>;

    /// First descendant of `scope` matching `selector`
    fn query(&self, scope: Self::Node, selector: &str) -> Result<Option<Self::Node>> {
        Ok(self.query_all(scope, selector)?.into_iter().next())
    }

    /// Check whether `node` itself matches `selector`
    fn matches(&self, node: Self::Node, selector: &str) -> Result<bool>;

    /// Parent of `node`, or `None` for the root and detached nodes
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Check whether `node` is `ancestor` or lies beneath it
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    // =========================================================================
    // Attributes, styles, classes
    // =========================================================================

    /// Read an attribute value
    fn attr(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Set an attribute value
    fn set_attr(&mut self, node: Self::Node, name: &str, value: &str);

    /// Read the measured value of a style property (e.g. `"width"`)
    fn computed_style(&self, node: Self::Node, property: &str) -> Option<String>;

    /// Write an inline style property
    fn set_style(&mut self, node: Self::Node, property: &str, value: &str);

    /// Check whether `node` carries `class`
    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    /// Add `class` to `node` (no-op when present)
    fn add_class(&mut self, node: Self::Node, class: &str);

    /// Remove `class` from `node` (no-op when absent)
    fn remove_class(&mut self, node: Self::Node, class: &str);

    /// Replace the text content of `node`
    fn set_text(&mut self, node: Self::Node, text: &str);

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` as the last child of `parent`, detaching it first
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Deep-clone `node` into a detached subtree
    fn clone_node(&mut self, node: Self::Node) -> Option<Self::Node>;

    /// Insert `node` as the next sibling of `reference`
    fn insert_after(&mut self, reference: Self::Node, node: Self::Node);

    /// Remove `node` and its subtree from the document
    fn remove(&mut self, node: Self::Node);
}
