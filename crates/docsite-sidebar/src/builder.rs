//! Validation of raw sidebar declarations.

use std::collections::HashSet;
use std::fmt::{self, Write};

use serde_json::Value;

use crate::node::{Sidebar, SidebarNode};
use crate::raw::{RawItems, RawObject, RawSidebarItem, describe};

/// Type discriminator recognized for category objects.
pub const CATEGORY_MARKER: &str = "category";

/// Nesting depth above which a warning is logged.
pub const RECOMMENDED_MAX_DEPTH: usize = 3;

/// Why a document id was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidIdReason {
    Empty,
    Whitespace,
    PathTraversal,
}

impl fmt::Display for InvalidIdReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id cannot be empty"),
            Self::Whitespace => f.write_str("id cannot be whitespace only"),
            Self::PathTraversal => f.write_str("id cannot contain '..' segments"),
        }
    }
}

/// Malformed sidebar declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// The sidebar declares no entries at all.
    #[error("Sidebar has no items")]
    EmptySidebar,
    /// Document id is not well formed.
    #[error("Invalid document id {id:?} at {location}: {reason}")]
    InvalidDocumentId {
        id: String,
        location: String,
        reason: InvalidIdReason,
    },
    /// Category label is missing or blank.
    #[error("Category at {location} has no label")]
    MissingCategoryLabel { location: String },
    /// Category has no children.
    #[error("Category \"{label}\" at {location} has no items")]
    EmptyCategory { label: String, location: String },
    /// Document id appears more than once.
    #[error("Duplicate document id \"{id}\" at {location}")]
    DuplicateId { id: String, location: String },
    /// Object with an unrecognized `type`.
    #[error("Unknown sidebar node type \"{kind}\" at {location}")]
    UnknownNodeType { kind: String, location: String },
    /// Entry that is neither a document id nor an object.
    #[error("Entry at {location} must be a document id or a category object, found {found}")]
    InvalidNodeShape {
        location: String,
        found: &'static str,
    },
    /// Object whose `type` is not a string.
    #[error("Node type at {location} must be a string, found {found}")]
    TypeNotAString {
        location: String,
        found: &'static str,
    },
    /// Category whose `label` is not a string.
    #[error("Category label at {location} must be a string, found {found}")]
    LabelNotAString {
        location: String,
        found: &'static str,
    },
    /// Category whose `items` is not a list.
    #[error("Items of category \"{label}\" at {location} must be a list, found {found}")]
    ItemsNotAList {
        label: String,
        location: String,
        found: &'static str,
    },
    /// Category whose `collapsed` flag is not a boolean.
    #[error("Collapsed flag of category \"{label}\" at {location} must be a boolean, found {found}")]
    CollapsedNotABool {
        label: String,
        location: String,
        found: &'static str,
    },
}

/// Validate a raw declaration and build the sidebar tree.
///
/// Nodes are checked in pre-order and the first violation is returned.
/// The resulting tree mirrors the declaration order exactly.
pub fn build(raw: &[RawSidebarItem]) -> Result<Sidebar, StructuralError> {
    if raw.is_empty() {
        return Err(StructuralError::EmptySidebar);
    }

    let mut builder = TreeBuilder::default();
    let nodes = builder.build_items(raw, &mut Vec::new())?;
    let sidebar = Sidebar::new(nodes);

    let depth = sidebar.depth();
    if depth > RECOMMENDED_MAX_DEPTH {
        tracing::warn!(
            depth,
            max = RECOMMENDED_MAX_DEPTH,
            "Sidebar is nested deeper than recommended"
        );
    }
    tracing::debug!(docs = builder.seen.len(), depth, "Built sidebar tree");

    Ok(sidebar)
}

#[derive(Default)]
struct TreeBuilder {
    seen: HashSet<String>,
}

impl TreeBuilder {
    fn build_items(
        &mut self,
        items: &[RawSidebarItem],
        path: &mut Vec<usize>,
    ) -> Result<Vec<SidebarNode>, StructuralError> {
        let mut nodes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            path.push(index);
            let node = match item {
                RawSidebarItem::Doc(id) => self.build_doc(id, path)?,
                RawSidebarItem::Object(object) => self.build_category(object, path)?,
                RawSidebarItem::Invalid(value) => {
                    return Err(StructuralError::InvalidNodeShape {
                        location: location(path),
                        found: describe(value),
                    });
                }
            };
            path.pop();
            nodes.push(node);
        }
        Ok(nodes)
    }

    fn build_doc(&mut self, id: &str, path: &[usize]) -> Result<SidebarNode, StructuralError> {
        if let Err(reason) = check_doc_id(id) {
            return Err(StructuralError::InvalidDocumentId {
                id: id.to_owned(),
                location: location(path),
                reason,
            });
        }
        if !self.seen.insert(id.to_owned()) {
            return Err(StructuralError::DuplicateId {
                id: id.to_owned(),
                location: location(path),
            });
        }
        Ok(SidebarNode::doc(id))
    }

    fn build_category(
        &mut self,
        object: &RawObject,
        path: &mut Vec<usize>,
    ) -> Result<SidebarNode, StructuralError> {
        match &object.kind {
            None => {}
            Some(Value::String(kind)) if kind == CATEGORY_MARKER => {}
            Some(Value::String(kind)) => {
                return Err(StructuralError::UnknownNodeType {
                    kind: kind.clone(),
                    location: location(path),
                });
            }
            Some(other) => {
                return Err(StructuralError::TypeNotAString {
                    location: location(path),
                    found: describe(other),
                });
            }
        }

        let label = match &object.label {
            Some(Value::String(label)) if !label.trim().is_empty() => label,
            None | Some(Value::String(_)) => {
                return Err(StructuralError::MissingCategoryLabel {
                    location: location(path),
                });
            }
            Some(other) => {
                return Err(StructuralError::LabelNotAString {
                    location: location(path),
                    found: describe(other),
                });
            }
        };

        let items: &[RawSidebarItem] = match &object.items {
            Some(RawItems::List(items)) => items,
            None => &[],
            Some(RawItems::Invalid(other)) => {
                return Err(StructuralError::ItemsNotAList {
                    label: label.clone(),
                    location: location(path),
                    found: describe(other),
                });
            }
        };
        if items.is_empty() {
            return Err(StructuralError::EmptyCategory {
                label: label.clone(),
                location: location(path),
            });
        }

        let collapsed = match &object.collapsed {
            None => true,
            Some(Value::Bool(collapsed)) => *collapsed,
            Some(other) => {
                return Err(StructuralError::CollapsedNotABool {
                    label: label.clone(),
                    location: location(path),
                    found: describe(other),
                });
            }
        };

        Ok(SidebarNode::Category {
            label: label.clone(),
            collapsed,
            items: self.build_items(items, path)?,
        })
    }
}

fn check_doc_id(id: &str) -> Result<(), InvalidIdReason> {
    if id.is_empty() {
        return Err(InvalidIdReason::Empty);
    }
    if id.trim().is_empty() {
        return Err(InvalidIdReason::Whitespace);
    }
    if id.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(InvalidIdReason::PathTraversal);
    }
    Ok(())
}

/// Human-readable position such as `sidebar[2].items[0]`.
fn location(path: &[usize]) -> String {
    let mut out = String::from("sidebar");
    for (depth, index) in path.iter().enumerate() {
        if depth == 0 {
            let _ = write!(out, "[{index}]");
        } else {
            let _ = write!(out, ".items[{index}]");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::raw::{parse_json, parse_yaml};
    use pretty_assertions::assert_eq;

    fn doc(id: &str) -> RawSidebarItem {
        RawSidebarItem::doc(id)
    }

    fn category(label: &str, items: Vec<RawSidebarItem>) -> RawSidebarItem {
        RawSidebarItem::category(label, items)
    }

    fn object(
        kind: Option<&str>,
        label: Option<&str>,
        items: Option<Vec<RawSidebarItem>>,
    ) -> RawSidebarItem {
        RawSidebarItem::Object(RawObject {
            kind: kind.map(Value::from),
            label: label.map(Value::from),
            items: items.map(RawItems::List),
            collapsed: None,
        })
    }

    #[test]
    fn test_build_flat_and_grouped() {
        let raw = vec![
            doc("getting-started"),
            category("Storage", vec![doc("storage/overview"), doc("storage/wal")]),
        ];

        let sidebar = build(&raw).unwrap();

        assert_eq!(
            sidebar.nodes(),
            &[
                SidebarNode::doc("getting-started"),
                SidebarNode::category(
                    "Storage",
                    vec![
                        SidebarNode::doc("storage/overview"),
                        SidebarNode::doc("storage/wal"),
                    ],
                ),
            ]
        );
    }

    #[test]
    fn test_build_preserves_declaration_order() {
        let raw = vec![
            doc("z"),
            category(
                "Middle",
                vec![doc("m/2"), category("Deep", vec![doc("m/deep/1")]), doc("m/1")],
            ),
            doc("a"),
        ];

        let sidebar = build(&raw).unwrap();

        assert_eq!(sidebar.doc_ids(), vec!["z", "m/2", "m/deep/1", "m/1", "a"]);
    }

    #[test]
    fn test_build_object_without_type_is_category() {
        let raw = vec![object(None, Some("Guides"), Some(vec![doc("guides/setup")]))];

        let sidebar = build(&raw).unwrap();

        assert_eq!(
            sidebar.nodes(),
            &[SidebarNode::category("Guides", vec![SidebarNode::doc("guides/setup")])]
        );
    }

    #[test]
    fn test_build_collapsed_passthrough() {
        let raw = parse_json(
            r#"[{"type": "category", "label": "Open", "items": ["a"], "collapsed": false}]"#,
        )
        .unwrap()
        .select("docsSidebar")
        .unwrap();

        let sidebar = build(&raw).unwrap();

        let SidebarNode::Category { collapsed, .. } = &sidebar.nodes()[0] else {
            panic!("expected category");
        };
        assert!(!collapsed);
    }

    #[test]
    fn test_build_empty_sidebar() {
        assert_eq!(build(&[]).unwrap_err(), StructuralError::EmptySidebar);
    }

    #[test]
    fn test_build_duplicate_top_level() {
        let err = build(&[doc("a"), doc("a")]).unwrap_err();

        assert_eq!(
            err,
            StructuralError::DuplicateId {
                id: "a".to_owned(),
                location: "sidebar[1]".to_owned(),
            }
        );
        assert!(err.to_string().contains("\"a\""));
    }

    #[test]
    fn test_build_duplicate_across_categories() {
        let raw = vec![
            category("One", vec![doc("shared")]),
            category("Two", vec![doc("other"), doc("shared")]),
        ];

        let err = build(&raw).unwrap_err();

        assert_eq!(
            err,
            StructuralError::DuplicateId {
                id: "shared".to_owned(),
                location: "sidebar[1].items[1]".to_owned(),
            }
        );
    }

    #[test]
    fn test_build_reports_first_duplicate_in_pre_order() {
        let raw = vec![
            doc("x"),
            category("Group", vec![doc("y"), doc("x")]),
            doc("y"),
        ];

        let err = build(&raw).unwrap_err();

        assert!(matches!(err, StructuralError::DuplicateId { ref id, .. } if id == "x"));
    }

    #[test]
    fn test_build_empty_category() {
        let err = build(&[doc("a"), category("Storage", vec![])]).unwrap_err();

        assert_eq!(
            err,
            StructuralError::EmptyCategory {
                label: "Storage".to_owned(),
                location: "sidebar[1]".to_owned(),
            }
        );
    }

    #[test]
    fn test_build_category_missing_items() {
        let err = build(&[object(Some("category"), Some("Storage"), None)]).unwrap_err();

        assert!(matches!(err, StructuralError::EmptyCategory { .. }));
    }

    #[test]
    fn test_build_category_missing_label() {
        let err = build(&[object(Some("category"), None, Some(vec![doc("a")]))]).unwrap_err();

        assert_eq!(
            err,
            StructuralError::MissingCategoryLabel {
                location: "sidebar[0]".to_owned(),
            }
        );
    }

    #[test]
    fn test_build_category_blank_label() {
        let err = build(&[object(Some("category"), Some("   "), Some(vec![doc("a")]))]).unwrap_err();

        assert!(matches!(err, StructuralError::MissingCategoryLabel { .. }));
    }

    #[test]
    fn test_build_unknown_node_type() {
        let raw = vec![category(
            "Outer",
            vec![object(Some("link"), Some("External"), Some(vec![doc("a")]))],
        )];

        let err = build(&raw).unwrap_err();

        assert_eq!(
            err,
            StructuralError::UnknownNodeType {
                kind: "link".to_owned(),
                location: "sidebar[0].items[0]".to_owned(),
            }
        );
    }

    #[test]
    fn test_build_type_marker_is_case_sensitive() {
        let err = build(&[object(Some("Category"), Some("A"), Some(vec![doc("a")]))]).unwrap_err();

        assert!(matches!(err, StructuralError::UnknownNodeType { ref kind, .. } if kind == "Category"));
    }

    #[test]
    fn test_build_empty_id() {
        let err = build(&[doc("")]).unwrap_err();

        assert!(matches!(
            err,
            StructuralError::InvalidDocumentId {
                reason: InvalidIdReason::Empty,
                ..
            }
        ));
    }

    #[test]
    fn test_build_whitespace_id() {
        let err = build(&[doc("  \t")]).unwrap_err();

        assert!(matches!(
            err,
            StructuralError::InvalidDocumentId {
                reason: InvalidIdReason::Whitespace,
                ..
            }
        ));
    }

    #[test]
    fn test_build_path_traversal_id() {
        for id in ["../secret", "docs/../../etc", "a\\..\\b", ".."] {
            let err = build(&[doc(id)]).unwrap_err();
            assert!(
                matches!(
                    err,
                    StructuralError::InvalidDocumentId {
                        reason: InvalidIdReason::PathTraversal,
                        ..
                    }
                ),
                "expected path traversal error for {id:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_build_dots_inside_segment_allowed() {
        let sidebar = build(&[doc("release..notes"), doc("v1.2/changes")]).unwrap();

        assert_eq!(sidebar.doc_ids(), vec!["release..notes", "v1.2/changes"]);
    }

    #[test]
    fn test_build_error_message_names_invariant() {
        let err = build(&[category("Storage", vec![])]).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Category \"Storage\" at sidebar[0] has no items"
        );
    }

    #[test]
    fn test_build_number_entry() {
        let raw = parse_json(r#"["a", 42]"#).unwrap().select("docsSidebar").unwrap();

        let err = build(&raw).unwrap_err();

        assert_eq!(
            err,
            StructuralError::InvalidNodeShape {
                location: "sidebar[1]".to_owned(),
                found: "a number",
            }
        );
        assert_eq!(
            err.to_string(),
            "Entry at sidebar[1] must be a document id or a category object, found a number"
        );
    }

    #[test]
    fn test_build_nested_list_entry() {
        let raw = parse_json(r#"[{"label": "Group", "items": ["a", ["b"]]}]"#)
            .unwrap()
            .select("docsSidebar")
            .unwrap();

        let err = build(&raw).unwrap_err();

        assert_eq!(
            err,
            StructuralError::InvalidNodeShape {
                location: "sidebar[0].items[1]".to_owned(),
                found: "a list",
            }
        );
    }

    #[test]
    fn test_build_items_not_a_list() {
        let raw = parse_json(
            r#"["a", {"type": "category", "label": "Storage", "items": "storage/wal"}]"#,
        )
        .unwrap()
        .select("docsSidebar")
        .unwrap();

        let err = build(&raw).unwrap_err();

        assert_eq!(
            err,
            StructuralError::ItemsNotAList {
                label: "Storage".to_owned(),
                location: "sidebar[1]".to_owned(),
                found: "a string",
            }
        );
        assert_eq!(
            err.to_string(),
            "Items of category \"Storage\" at sidebar[1] must be a list, found a string"
        );
    }

    #[test]
    fn test_build_label_not_a_string() {
        let raw = parse_json(r#"[{"type": "category", "label": 5, "items": ["a"]}]"#)
            .unwrap()
            .select("docsSidebar")
            .unwrap();

        let err = build(&raw).unwrap_err();

        assert_eq!(
            err,
            StructuralError::LabelNotAString {
                location: "sidebar[0]".to_owned(),
                found: "a number",
            }
        );
    }

    #[test]
    fn test_build_type_not_a_string() {
        let raw = parse_json(r#"["a", {"type": 7, "label": "Storage", "items": ["b"]}]"#)
            .unwrap()
            .select("docsSidebar")
            .unwrap();

        let err = build(&raw).unwrap_err();

        assert_eq!(
            err,
            StructuralError::TypeNotAString {
                location: "sidebar[1]".to_owned(),
                found: "a number",
            }
        );
    }

    #[test]
    fn test_build_collapsed_not_a_bool() {
        let raw = parse_json(
            r#"[{"type": "category", "label": "Open", "items": ["a"], "collapsed": "no"}]"#,
        )
        .unwrap()
        .select("docsSidebar")
        .unwrap();

        let err = build(&raw).unwrap_err();

        assert_eq!(
            err,
            StructuralError::CollapsedNotABool {
                label: "Open".to_owned(),
                location: "sidebar[0]".to_owned(),
                found: "a string",
            }
        );
    }

    #[test]
    fn test_build_yaml_items_not_a_list() {
        let yaml = r"
- intro
- type: category
  label: Storage
  items:
    - storage/overview
    - type: category
      label: Engine
      items: storage/engine
";
        let raw = parse_yaml(yaml).unwrap().select("docsSidebar").unwrap();

        let err = build(&raw).unwrap_err();

        assert!(
            matches!(
                err,
                StructuralError::ItemsNotAList { ref label, ref location, .. }
                    if label == "Engine" && location == "sidebar[1].items[1]"
            ),
            "{err:?}"
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_build_deep_sidebar_warns() {
        let raw = vec![
            doc("intro"),
            category(
                "One",
                vec![category("Two", vec![category("Three", vec![doc("deep/page")])])],
            ),
        ];
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let sidebar = tracing::subscriber::with_default(subscriber, || build(&raw)).unwrap();

        assert_eq!(sidebar.depth(), 4);
        assert_eq!(sidebar.doc_ids(), vec!["intro", "deep/page"]);
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Sidebar is nested deeper than recommended"), "{output}");
        assert!(output.contains("depth=4"), "{output}");
    }

    #[test]
    fn test_build_recommended_depth_does_not_warn() {
        let raw = vec![category("One", vec![category("Two", vec![doc("a")])])];
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let sidebar = tracing::subscriber::with_default(subscriber, || build(&raw)).unwrap();

        assert_eq!(sidebar.depth(), RECOMMENDED_MAX_DEPTH);
        assert!(logs.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_location_format() {
        assert_eq!(location(&[]), "sidebar");
        assert_eq!(location(&[3]), "sidebar[3]");
        assert_eq!(location(&[1, 0, 2]), "sidebar[1].items[0].items[2]");
    }
}
