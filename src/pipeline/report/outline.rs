use serde_json::Value;

const INDENT: &str = "    ";

/// Serialize structured section content into an indented outline.
///
/// Mapping keys are sorted. Scalars print inline (`key: value`, `- item`),
/// nested containers open a new indentation level.
pub fn outline(value: &Value) -> String {
    let mut lines = Vec::new();
    write_value(value, 0, &mut lines);
    lines.join("\n")
}

fn write_value(value: &Value, depth: usize, out: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    match value {
        Value::Object(map) => {
            if map.is_empty() {
                out.push(format!("{indent}{{}}"));
                return;
            }
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                let child = &map[key.as_str()];
                match inline(child) {
                    Some(text) => out.push(format!("{indent}{key}: {text}")),
                    None => {
                        out.push(format!("{indent}{key}:"));
                        write_value(child, depth + 1, out);
                    }
                }
            }
        }
        Value::Array(items) => {
            if items.is_empty() {
                out.push(format!("{indent}[]"));
                return;
            }
            for item in items {
                match inline(item) {
                    Some(text) => out.push(format!("{indent}- {text}")),
                    None => {
                        out.push(format!("{indent}-"));
                        write_value(item, depth + 1, out);
                    }
                }
            }
        }
        scalar => out.push(format!("{indent}{}", inline(scalar).unwrap_or_default())),
    }
}

/// Single-line form of scalars and empty containers.
fn inline(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Object(map) if map.is_empty() => Some("{}".to_string()),
        Value::Array(items) if items.is_empty() => Some("[]".to_string()),
        _ => None,
    }
}
