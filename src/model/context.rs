use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The base context handed to a parser alongside a fetched page.
///
/// It carries the identity of the page being parsed (`type`, `href`), a value
/// copy of the upstream record that led here (`parent`), and any seed fields
/// the upstream parser attached. Because `parent` is an owned [`Value`] the
/// lineage is always a tree and serializes without cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_parent(mut self, parent: Value) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a seed field by name.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// Flatten the context into a JSON object, seed fields first.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.fields.clone();
        if let Some(kind) = &self.kind {
            map.insert("type".to_string(), Value::String(kind.clone()));
        }
        if let Some(href) = &self.href {
            map.insert("href".to_string(), Value::String(href.clone()));
        }
        if let Some(parent) = &self.parent {
            map.insert("parent".to_string(), parent.clone());
        }
        map
    }

    /// The context as a parent value, with its own `parent` left out so that
    /// lineage stays one level deep per hop.
    pub fn identity(&self) -> Value {
        let mut map = self.to_map();
        map.remove("parent");
        Value::Object(map)
    }
}
