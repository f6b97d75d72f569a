//! Sidebar navigation tree for docsite.
//!
//! A sidebar is declared as an ordered, nested list mixing bare document ids
//! and category objects:
//!
//! ```json
//! [
//!   "getting-started",
//!   { "type": "category", "label": "Storage", "items": ["storage/overview", "storage/wal"] }
//! ]
//! ```
//!
//! The declaration is first deserialized into [`RawSidebarItem`] values
//! (optionally grouped by sidebar id in a [`RawSidebarFile`]) and
//! then validated by [`build`] into a [`Sidebar`] of [`SidebarNode`]s.
//! Declaration order is navigation order: the pre-order walk of the built
//! tree drives the rendered menu and previous/next links.
//!
//! # Example
//!
//! ```
//! use docsite_sidebar::{build, parse_json};
//!
//! let file = parse_json(r#"["intro", {"type": "category", "label": "Guides", "items": ["guides/setup"]}]"#)?;
//! let raw = file.select("docsSidebar").unwrap_or_default();
//! let sidebar = build(&raw)?;
//!
//! assert_eq!(sidebar.doc_ids(), vec!["intro", "guides/setup"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod node;
mod raw;

pub use builder::{CATEGORY_MARKER, InvalidIdReason, RECOMMENDED_MAX_DEPTH, StructuralError, build};
pub use node::{Neighbors, Sidebar, SidebarNode};
pub use raw::{RawItems, RawObject, RawSidebarFile, RawSidebarItem, parse_json, parse_yaml};
