use crate::error::ConfigurationError;
use async_trait::async_trait;
use serde_json::Value;
use weft_core::{Action, ActionError, FragmentContext, FragmentResult};

/// Injects a configured JSON value into the fragment payload
///
/// The body is never touched; an existing entry under the same alias is
/// overwritten.
pub struct InlinePayloadAction {
    alias: String,
    payload: Value,
}

impl InlinePayloadAction {
    /// Build the action; `alias` is the payload key written to
    pub fn new(alias: &str, payload: Value) -> Result<Self, ConfigurationError> {
        if alias.is_empty() {
            return Err(ConfigurationError::new(
                alias,
                "inline payload action requires a non-empty alias",
            ));
        }
        Ok(Self {
            alias: alias.to_string(),
            payload,
        })
    }
}

#[async_trait]
impl Action for InlinePayloadAction {
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, ActionError> {
        let mut fragment = context.fragment;
        fragment.append_payload(&self.alias, self.payload.clone());
        Ok(FragmentResult::success(fragment))
    }
}
