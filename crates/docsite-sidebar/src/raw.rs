//! Untyped sidebar declarations as read from disk.
//!
//! Entries are read permissively through [`serde_json::Value`] so that any
//! JSON or YAML shape makes it to [`build`](crate::build), which reports
//! malformed entries as [`StructuralError`](crate::StructuralError)s with
//! their location instead of an opaque deserialization failure.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// A single sidebar entry before validation.
///
/// Bare strings are document references and objects are categories.
/// Anything else is kept as [`RawSidebarItem::Invalid`] and rejected by
/// [`build`](crate::build).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum RawSidebarItem {
    /// Bare document id.
    Doc(String),
    /// Object entry, expected to be a category.
    Object(RawObject),
    /// Neither a string nor an object.
    Invalid(Value),
}

/// Object entry of a sidebar declaration.
///
/// Fields keep whatever value the author wrote; their types are checked
/// during [`build`](crate::build). Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawObject {
    /// Node type discriminator (`"category"` when present).
    pub kind: Option<Value>,
    /// Category label.
    pub label: Option<Value>,
    /// Child entries.
    pub items: Option<RawItems>,
    /// Whether the category starts collapsed.
    pub collapsed: Option<Value>,
}

/// Children of an object entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawItems {
    List(Vec<RawSidebarItem>),
    /// `items` was present but not a list.
    Invalid(Value),
}

impl RawSidebarItem {
    /// Shorthand for a bare document reference.
    pub fn doc(id: impl Into<String>) -> Self {
        Self::Doc(id.into())
    }

    /// Shorthand for a category object with the standard marker.
    pub fn category(label: impl Into<String>, items: Vec<RawSidebarItem>) -> Self {
        Self::Object(RawObject {
            kind: Some(Value::String(crate::CATEGORY_MARKER.to_owned())),
            label: Some(Value::String(label.into())),
            items: Some(RawItems::List(items)),
            collapsed: None,
        })
    }
}

impl From<Value> for RawSidebarItem {
    fn from(value: Value) -> Self {
        match value {
            Value::String(id) => Self::Doc(id),
            Value::Object(mut fields) => Self::Object(RawObject {
                kind: fields.remove("type"),
                label: fields.remove("label"),
                items: fields.remove("items").map(RawItems::from),
                collapsed: fields.remove("collapsed"),
            }),
            other => Self::Invalid(other),
        }
    }
}

impl From<Value> for RawItems {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(into_items(items)),
            other => Self::Invalid(other),
        }
    }
}

/// Contents of a sidebar file.
///
/// Either a single list of entries, or a map of named sidebars
/// (`{"docsSidebar": [...]}`) from which one is selected by id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum RawSidebarFile {
    Items(Vec<RawSidebarItem>),
    Named(BTreeMap<String, Vec<RawSidebarItem>>),
}

impl RawSidebarFile {
    /// Take the entries of sidebar `id`.
    ///
    /// A single-list file has no names and always yields its entries.
    pub fn select(self, id: &str) -> Option<Vec<RawSidebarItem>> {
        match self {
            Self::Items(items) => Some(items),
            Self::Named(mut sidebars) => sidebars.remove(id),
        }
    }
}

impl TryFrom<Value> for RawSidebarFile {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => Ok(Self::Items(into_items(items))),
            Value::Object(sidebars) => sidebars
                .into_iter()
                .map(|(id, items)| match items {
                    Value::Array(items) => Ok((id, into_items(items))),
                    other => Err(format!(
                        "sidebar \"{id}\" must be a list of entries, found {}",
                        describe(&other)
                    )),
                })
                .collect::<Result<_, _>>()
                .map(Self::Named),
            other => Err(format!(
                "expected a list of sidebar entries or a map of named sidebars, found {}",
                describe(&other)
            )),
        }
    }
}

fn into_items(values: Vec<Value>) -> Vec<RawSidebarItem> {
    values.into_iter().map(RawSidebarItem::from).collect()
}

/// Short description of a value's JSON type, for error messages.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Parse a JSON sidebar file.
pub fn parse_json(input: &str) -> Result<RawSidebarFile, serde_json::Error> {
    serde_json::from_str(input)
}

/// Parse a YAML sidebar file.
pub fn parse_yaml(input: &str) -> Result<RawSidebarFile, serde_yaml::Error> {
    serde_yaml::from_str(input)
}
