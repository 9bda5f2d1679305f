//! Merges an extracted entity with the base context it was parsed under.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::model::{Context, Lineage, Record};
use crate::scraper::fields::normalize_href;

/// Build the output record for `entity` parsed under `base`.
///
/// Base fields come first and the entity's own attributes overwrite them on
/// key collision. With [`Lineage::Strip`] the inherited `parent` is dropped.
/// Every string outside of `parent` is trimmed, and the top-level `href` is
/// reduced to a site-relative path.
pub fn assemble<T: Serialize>(base: &Context, entity: &T, lineage: Lineage) -> Result<Record> {
    let mut map = base.to_map();
    match serde_json::to_value(entity)? {
        Value::Object(own) => {
            for (key, value) in own {
                map.insert(key, value);
            }
        }
        other => {
            map.insert("value".to_string(), other);
        }
    }

    if lineage == Lineage::Strip {
        map.remove("parent");
    }

    for (key, value) in map.iter_mut() {
        if key != "parent" {
            trim_strings(value);
        }
    }
    if let Some(Value::String(href)) = map.get_mut("href") {
        *href = normalize_href(href);
    }

    Ok(Record::from_map(map))
}

fn trim_strings(value: &mut Value) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
        Value::Array(items) => items.iter_mut().for_each(trim_strings),
        Value::Object(map) => map.values_mut().for_each(trim_strings),
        _ => {}
    }
}
