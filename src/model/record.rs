use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A fully assembled output record, ready to be written as one JSON line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The record's `type` tag.
    pub fn kind(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn href(&self) -> Option<&str> {
        self.get_str("href")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Serialize the record as a single line of JSON (without the newline).
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

/// Write records as newline-delimited JSON.
pub fn write_json_lines<'a, W, I>(mut writer: W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_write_json_lines() {
        let records: Vec<Record> = vec![
            serde_json::from_value(json!({"type": "club", "href": "/a"})).unwrap(),
            serde_json::from_value(json!({"type": "club", "href": "/b"})).unwrap(),
        ];
        let mut out = Vec::new();
        write_json_lines(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"club","href":"/a"}"#);
    }
}
