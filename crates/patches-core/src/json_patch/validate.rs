//! Validator for raw patch operations (as `serde_json::Value`).
//!
//! Grounded on `validateOperations`/`validateOperation` in the teacher's
//! `packages/json-joy/src/json-patch/validate.ts`, narrowed to the op kinds
//! this system recognizes and extended with the `soft` flag.

use patches_pointer::validate_json_pointer;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

fn err(msg: &str) -> ValidationError {
    ValidationError(msg.to_string())
}

/// Validate a JSON array of raw operations.
///
/// Errors are reported with the index of the failing operation.
pub fn validate_operations(ops: &Value) -> Result<(), ValidationError> {
    let arr = ops.as_array().ok_or_else(|| err("Not an array."))?;
    if arr.is_empty() {
        return Err(err("Empty operation patch."));
    }
    for (i, op) in arr.iter().enumerate() {
        validate_operation(op)
            .map_err(|e| ValidationError(format!("Error in operation [index = {}] ({}).", i, e.0)))?;
    }
    Ok(())
}

/// Validate a single raw operation object.
pub fn validate_operation(op: &Value) -> Result<(), ValidationError> {
    let map = op.as_object().ok_or_else(|| err("OP_INVALID"))?;

    let path = map.get("path").ok_or_else(|| err("OP_PATH_INVALID"))?;
    let path_str = path.as_str().ok_or_else(|| err("OP_PATH_INVALID"))?;
    validate_json_pointer_str(path_str)?;

    let op_name = map.get("op").and_then(|v| v.as_str()).unwrap_or("");
    match op_name {
        "add" => validate_has_value(map).and_then(|_| validate_soft(map)),
        "remove" => Ok(()),
        "replace" => validate_has_value(map),
        "copy" => validate_from(map),
        "move" => validate_move(map, path_str),
        "@inc" => validate_number_field(map, "inc"),
        "@bit" => validate_bit(map),
        "@min" | "@max" => validate_number_field(map, "value"),
        "@txt" => validate_delta(map),
        _ => Err(err("OP_UNKNOWN")),
    }
}

fn validate_has_value(map: &serde_json::Map<String, Value>) -> Result<(), ValidationError> {
    if !map.contains_key("value") {
        return Err(err("OP_VALUE_MISSING"));
    }
    Ok(())
}

fn validate_soft(map: &serde_json::Map<String, Value>) -> Result<(), ValidationError> {
    if let Some(soft) = map.get("soft") {
        if !soft.is_boolean() {
            return Err(err("Expected \"soft\" field to be boolean."));
        }
    }
    Ok(())
}

fn validate_from(map: &serde_json::Map<String, Value>) -> Result<(), ValidationError> {
    let from = map.get("from").ok_or_else(|| err("OP_FROM_INVALID"))?;
    let from_str = from.as_str().ok_or_else(|| err("OP_FROM_INVALID"))?;
    validate_json_pointer_str(from_str)
}

fn validate_move(map: &serde_json::Map<String, Value>, path_str: &str) -> Result<(), ValidationError> {
    validate_from(map)?;
    let from_str = map.get("from").and_then(|v| v.as_str()).unwrap_or("");
    let prefix = format!("{}/", from_str);
    if path_str.starts_with(&prefix) {
        return Err(err("Cannot move into own children."));
    }
    Ok(())
}

fn validate_number_field(map: &serde_json::Map<String, Value>, field: &str) -> Result<(), ValidationError> {
    let val = map.get(field).ok_or_else(|| err("OP_VALUE_MISSING"))?;
    if !val.is_number() {
        return Err(err("Value must be a number."));
    }
    Ok(())
}

fn validate_bit(map: &serde_json::Map<String, Value>) -> Result<(), ValidationError> {
    let bit = map.get("bit").ok_or_else(|| err("Invalid \"bit\" field."))?;
    if !bit.is_u64() {
        return Err(err("Invalid \"bit\" field."));
    }
    let value = map.get("value").ok_or_else(|| err("OP_VALUE_MISSING"))?;
    if !value.is_boolean() {
        return Err(err("Expected \"value\" field to be boolean."));
    }
    Ok(())
}

fn validate_delta(map: &serde_json::Map<String, Value>) -> Result<(), ValidationError> {
    let delta = map.get("delta").ok_or_else(|| err("Invalid \"delta\" field."))?;
    let comps = delta.as_array().ok_or_else(|| err("Invalid \"delta\" field."))?;
    for comp in comps {
        let obj = comp.as_object().ok_or_else(|| err("Invalid delta component."))?;
        let has_retain = obj.get("retain").map(|v| v.is_u64()).unwrap_or(false);
        let has_delete = obj.get("delete").map(|v| v.is_u64()).unwrap_or(false);
        let has_insert = obj.contains_key("insert");
        if !has_retain && !has_delete && !has_insert {
            return Err(err("Invalid delta component."));
        }
    }
    Ok(())
}

fn validate_json_pointer_str(s: &str) -> Result<(), ValidationError> {
    validate_json_pointer(s).map_err(|e| err(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ops_throws_not_array() {
        assert_eq!(validate_operations(&json!(123)), Err(ValidationError("Not an array.".into())));
    }

    #[test]
    fn ops_throws_empty_array() {
        assert_eq!(validate_operations(&json!([])), Err(ValidationError("Empty operation patch.".into())));
    }

    #[test]
    fn ops_succeeds_valid_add() {
        assert!(validate_operations(&json!([{"op": "add", "path": "/a", "value": 1}])).is_ok());
    }

    #[test]
    fn ops_throws_second_invalid_op() {
        let result = validate_operations(&json!([
            {"op": "add", "path": "/a", "value": 1},
            {"op": "replace", "path": "/a"}
        ]));
        assert_eq!(result, Err(ValidationError("Error in operation [index = 1] (OP_VALUE_MISSING).".into())));
    }

    #[test]
    fn move_cannot_move_into_own_children() {
        let result = validate_operation(&json!({"op": "move", "from": "/foo", "path": "/foo/bar"}));
        assert_eq!(result, Err(ValidationError("Cannot move into own children.".into())));
    }

    #[test]
    fn inc_requires_numeric_value() {
        assert!(validate_operation(&json!({"op": "@inc", "path": "/n", "inc": 1})).is_ok());
        assert!(validate_operation(&json!({"op": "@inc", "path": "/n", "inc": "x"})).is_err());
    }

    #[test]
    fn bit_requires_bit_index_and_bool_value() {
        assert!(validate_operation(&json!({"op": "@bit", "path": "/f", "bit": 2, "value": true})).is_ok());
        assert!(validate_operation(&json!({"op": "@bit", "path": "/f", "bit": 2})).is_err());
    }

    #[test]
    fn txt_requires_delta_array() {
        assert!(validate_operation(&json!({"op": "@txt", "path": "/s", "delta": [{"retain": 3}, {"insert": "hi"}]})).is_ok());
        assert!(validate_operation(&json!({"op": "@txt", "path": "/s"})).is_err());
    }

    #[test]
    fn unknown_op_is_rejected() {
        assert_eq!(
            validate_operation(&json!({"op": "flip", "path": "/b"})),
            Err(ValidationError("OP_UNKNOWN".into()))
        );
    }
}
