use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::FormatError;

/// Read a JSON document whose top level must be an object.
pub(crate) fn read_json_object(path: &Path) -> Result<Map<String, Value>> {
    let file = File::open(path)
        .with_context(|| format!("[io::json] Failed to open JSON file: {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::json] Failed to parse JSON from {}", path.display()))?;
    into_object(value).with_context(|| format!("[io::json] Unexpected shape in {}", path.display()))
}

/// Parse JSON text whose top level must be an object.
pub(crate) fn parse_json_object(text: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text).context("[io::json] Failed to parse JSON text")?;
    Ok(into_object(value)?)
}

fn into_object(value: Value) -> Result<Map<String, Value>, FormatError> {
    match value {
        Value::Object(obj) => Ok(obj),
        _ => Err(FormatError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_required() {
        assert!(parse_json_object(r#"{"adoption_scenarios": {}}"#).is_ok());
        let err = parse_json_object("[1, 2, 3]").unwrap_err();
        assert!(err.downcast_ref::<FormatError>().is_some());
    }
}
