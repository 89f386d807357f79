use serde_json::{json, Map, Value};

/// Collects the structured log of one action invocation
///
/// Entries are accumulated under `logs` (ordinary outcomes) and `errors`
/// (failures); the rendered JSON travels as the opaque `node_log` of the
/// action's outcome and is never parsed by the engine.
#[derive(Debug, Clone)]
pub struct ActionLog {
    alias: String,
    logs: Map<String, Value>,
    errors: Map<String, Value>,
}

impl ActionLog {
    /// Start a log for the action known under `alias`
    pub fn new(alias: &str) -> Self {
        Self {
            alias: alias.to_string(),
            logs: Map::new(),
            errors: Map::new(),
        }
    }

    /// Record an ordinary entry
    pub fn info(&mut self, key: &str, value: Value) -> &mut Self {
        self.logs.insert(key.to_string(), value);
        self
    }

    /// Record a failure entry
    pub fn error(&mut self, key: &str, value: Value) -> &mut Self {
        self.errors.insert(key.to_string(), value);
        self
    }

    /// Render the accumulated log as a JSON value
    ///
    /// The `errors` object is only present when something failed.
    pub fn to_value(&self) -> Value {
        let mut rendered = json!({
            "alias": self.alias,
            "logs": Value::Object(self.logs.clone()),
        });
        if !self.errors.is_empty() {
            rendered["errors"] = Value::Object(self.errors.clone());
        }
        rendered
    }
}
