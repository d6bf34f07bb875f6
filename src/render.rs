//! Reply rendering
//!
//! [`component::render`] turns one reply item into markup; [`grouping::group`]
//! walks a whole answer and wraps adjacent cards into horizontal scroll
//! clusters.

pub mod component;
pub mod grouping;

#[cfg(test)]
mod proptests;

pub use component::render;
pub use grouping::{group, render_answer, segments, Segment};

use crate::markup::{self, Node};

/// Declarative description of an option button: what it shows and what
/// activating it submits. Both fields are raw (unescaped) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionControl {
    pub label: String,
    pub payload: String,
}

/// Rendered markup plus the interactive controls it contains, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
    pub controls: Vec<OptionControl>,
}

impl Fragment {
    pub fn node(node: impl Into<Node>) -> Self {
        Self {
            nodes: vec![node.into()],
            controls: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn extend(&mut self, other: Fragment) {
        self.nodes.extend(other.nodes);
        self.controls.extend(other.controls);
    }

    pub fn to_html(&self) -> String {
        markup::to_html(&self.nodes)
    }
}
