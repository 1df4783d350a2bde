//! `$ref` inlining for consumers that cannot follow references.
//!
//! Only local pointers into `#/$defs/` or `#/definitions/` are resolved; a
//! pointer to the document root (`#`) is always self-referential.
//! References are expanded everywhere, including inside `items`, `prefixItems`
//! and the `anyOf`/`oneOf`/`allOf` arrays. A definition that reaches itself is
//! reported as [`SchemaError::SelfReference`] instead of expanding forever.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::SchemaError;

const DEF_SECTIONS: [&str; 2] = ["$defs", "definitions"];

/// Return a copy of `schema` with every `$ref` replaced by its target and the
/// definition sections removed.
pub fn inline_refs(schema: &Value) -> Result<Value, SchemaError> {
    let mut inliner = Inliner {
        defs: collect_definitions(schema),
        stack: Vec::new(),
        done: HashMap::new(),
    };

    match schema {
        Value::Object(root) => {
            let stripped: Map<String, Value> = root
                .iter()
                .filter(|(k, _)| !DEF_SECTIONS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            inliner.expand(&Value::Object(stripped))
        }
        other => inliner.expand(other),
    }
}

fn collect_definitions(schema: &Value) -> HashMap<String, &Value> {
    let mut defs = HashMap::new();
    for section in DEF_SECTIONS {
        if let Some(Value::Object(entries)) = schema.get(section) {
            for (name, def) in entries {
                defs.insert(format!("{}/{}", section, name), def);
            }
        }
    }
    defs
}

/// Split `#/$defs/Name` into its lookup key and decoded name.
fn parse_ref(reference: &str) -> Result<(String, String), SchemaError> {
    let unsupported = || SchemaError::UnsupportedReference(reference.to_string());
    let pointer = reference.strip_prefix("#/").ok_or_else(unsupported)?;
    let (section, name) = pointer.split_once('/').ok_or_else(unsupported)?;
    if !DEF_SECTIONS.contains(&section) || name.is_empty() || name.contains('/') {
        return Err(unsupported());
    }
    // JSON pointer escapes, `~1` before `~0`
    let name = name.replace("~1", "/").replace("~0", "~");
    Ok((format!("{}/{}", section, name), name))
}

struct Inliner<'a> {
    defs: HashMap<String, &'a Value>,
    /// Definitions currently being expanded, outermost first.
    stack: Vec<(String, String)>,
    done: HashMap<String, Value>,
}

impl<'a> Inliner<'a> {
    fn expand(&mut self, node: &Value) -> Result<Value, SchemaError> {
        match node {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref") {
                    let Value::String(reference) = reference else {
                        return Err(SchemaError::UnsupportedReference(reference.to_string()));
                    };
                    let resolved = self.resolve(reference)?;
                    // Keywords next to `$ref` refine the target.
                    let mut siblings = map.iter().filter(|(k, _)| k.as_str() != "$ref").peekable();
                    if siblings.peek().is_none() {
                        return Ok(resolved);
                    }
                    let mut target = match resolved {
                        Value::Object(target) => target,
                        // boolean schemas have nowhere to put keywords
                        other => Map::from_iter([("allOf".to_string(), Value::Array(vec![other]))]),
                    };
                    for (key, value) in siblings {
                        target.insert(key.clone(), self.expand(value)?);
                    }
                    return Ok(Value::Object(target));
                }
                let mut out = Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), self.expand(value)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.expand(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn resolve(&mut self, reference: &str) -> Result<Value, SchemaError> {
        if reference == "#" {
            // The document root always encloses the reference.
            let mut path = vec!["#".to_string()];
            path.extend(self.stack.iter().map(|(_, n)| n.clone()));
            path.push("#".to_string());
            return Err(SchemaError::SelfReference { path });
        }
        let (key, name) = parse_ref(reference)?;
        if let Some(expanded) = self.done.get(&key) {
            return Ok(expanded.clone());
        }
        if let Some(start) = self.stack.iter().position(|(k, _)| *k == key) {
            let mut path: Vec<String> = self.stack[start..].iter().map(|(_, n)| n.clone()).collect();
            path.push(name);
            return Err(SchemaError::SelfReference { path });
        }
        let def = *self
            .defs
            .get(&key)
            .ok_or_else(|| SchemaError::UnknownDefinition(name.clone()))?;

        self.stack.push((key.clone(), name));
        let expanded = self.expand(def);
        self.stack.pop();

        let expanded = expanded?;
        self.done.insert(key, expanded.clone());
        Ok(expanded)
    }
}
