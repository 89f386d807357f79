use crate::error::ConfigurationError;
use crate::log::ActionLog;
use async_trait::async_trait;
use serde_json::{json, Value};
use weft_core::{Action, ActionError, FragmentContext, FragmentResult};

/// Rewrites the fragment body with a value taken from the payload
///
/// The key may point into nested objects with dots (e.g. `product.details`).
/// String values are written verbatim, everything else as rendered JSON.
/// A missing key ends the invocation on the error transition.
pub struct PayloadToBodyAction {
    alias: String,
    key: String,
}

impl PayloadToBodyAction {
    /// Build the action reading from the given payload key
    pub fn new(alias: &str, key: &str) -> Result<Self, ConfigurationError> {
        if key.is_empty() {
            return Err(ConfigurationError::new(
                alias,
                "payload-to-body action requires a key value in configuration",
            ));
        }
        Ok(Self {
            alias: alias.to_string(),
            key: key.to_string(),
        })
    }

    fn find<'a>(&self, context: &'a FragmentContext) -> Option<&'a Value> {
        let mut segments = self.key.split('.');
        let mut current = context.fragment.payload().get(segments.next()?)?;
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }
}

#[async_trait]
impl Action for PayloadToBodyAction {
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, ActionError> {
        match self.find(&context).cloned() {
            Some(value) => {
                let body = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                let mut fragment = context.fragment;
                fragment.set_body(&body);
                Ok(FragmentResult::success(fragment))
            }
            None => {
                let mut log = ActionLog::new(&self.alias);
                log.error(
                    "error",
                    json!(format!("payload key '{}' not found", self.key)),
                );
                Ok(FragmentResult::fail(context.fragment, Some(log.to_value())))
            }
        }
    }
}
