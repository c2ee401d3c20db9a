//! Rich-text document tree for annotation bodies.
//!
//! The annotation index returns bodies as a DOM-ish tree in which a node
//! is either a bare string or an object with an ordered `children` list
//! (plus markup fields this crate has no use for). [`DocNode`] models
//! that shape as a tagged two-case variant so extraction is a plain
//! recursive walk instead of field probing.

use serde::Deserialize;

/// One node of an annotation body: a text leaf or an element holding an
/// ordered list of child nodes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DocNode {
    Text(String),
    Element {
        #[serde(default)]
        children: Vec<DocNode>,
    },
}

/// Flatten a node into plain text: a leaf is itself, an element is the
/// in-order concatenation of its children, a childless element is empty.
#[must_use]
pub fn extract_text(node: &DocNode) -> String {
    match node {
        DocNode::Text(text) => text.clone(),
        DocNode::Element { children } => children.iter().map(extract_text).collect(),
    }
}

/// Text of the first top-level child of `root`, the block the annotator
/// presents. `None` when the root is a leaf or has no children.
#[must_use]
pub fn leading_block_text(root: &DocNode) -> Option<String> {
    match root {
        DocNode::Text(_) => None,
        DocNode::Element { children } => children.first().map(extract_text),
    }
}

/// Extracted text is only worth showing if it reads like prose: it must
/// contain at least one sentence-terminating mark.
#[must_use]
pub fn has_sentence_punctuation(text: &str) -> bool {
    text.contains(['.', '?', '!'])
}
