//! Validated sidebar tree.

use serde::Serialize;

/// A validated sidebar node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SidebarNode {
    /// Reference to a document resolved later by the rendering engine.
    #[serde(rename = "doc")]
    DocumentRef {
        /// Document id (e.g. `storage/wal`).
        id: String,
    },
    /// Labelled group of child nodes.
    Category {
        /// Display label.
        label: String,
        /// Whether the category is collapsed initially.
        collapsed: bool,
        /// Children in navigation order. Never empty.
        items: Vec<SidebarNode>,
    },
}

impl SidebarNode {
    /// Document reference node.
    pub fn doc(id: impl Into<String>) -> Self {
        Self::DocumentRef { id: id.into() }
    }

    /// Collapsed category node.
    pub fn category(label: impl Into<String>, items: Vec<SidebarNode>) -> Self {
        Self::Category {
            label: label.into(),
            collapsed: true,
            items,
        }
    }

    /// Depth of this subtree (a document counts as 1).
    pub fn depth(&self) -> usize {
        match self {
            Self::DocumentRef { .. } => 1,
            Self::Category { items, .. } => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    fn collect_doc_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::DocumentRef { id } => out.push(id),
            Self::Category { items, .. } => {
                for item in items {
                    item.collect_doc_ids(out);
                }
            }
        }
    }
}

/// Previous and next documents around a given document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors<'a> {
    pub previous: Option<&'a str>,
    pub next: Option<&'a str>,
}

/// Ordered forest of sidebar nodes, as produced by [`build`](crate::build).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sidebar {
    nodes: Vec<SidebarNode>,
}

impl Sidebar {
    pub(crate) fn new(nodes: Vec<SidebarNode>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes in navigation order.
    pub fn nodes(&self) -> &[SidebarNode] {
        &self.nodes
    }

    /// Consume the sidebar, returning its top-level nodes.
    pub fn into_nodes(self) -> Vec<SidebarNode> {
        self.nodes
    }

    /// Document ids in pre-order, i.e. navigation order.
    pub fn doc_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for node in &self.nodes {
            node.collect_doc_ids(&mut ids);
        }
        ids
    }

    /// Number of document references in the whole tree.
    pub fn doc_count(&self) -> usize {
        self.doc_ids().len()
    }

    /// Maximum nesting depth (0 for an empty sidebar).
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(SidebarNode::depth).max().unwrap_or(0)
    }

    /// First document in navigation order.
    pub fn first_doc(&self) -> Option<&str> {
        self.doc_ids().first().copied()
    }

    /// Previous/next documents for `id`, or `None` if `id` is not in the tree.
    pub fn neighbors(&self, id: &str) -> Option<Neighbors<'_>> {
        let ids = self.doc_ids();
        let pos = ids.iter().position(|candidate| *candidate == id)?;
        Some(Neighbors {
            previous: pos.checked_sub(1).map(|i| ids[i]),
            next: ids.get(pos + 1).copied(),
        })
    }
}
