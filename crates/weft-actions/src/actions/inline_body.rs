use async_trait::async_trait;
use weft_core::{Action, ActionError, FragmentContext, FragmentResult};

/// Replaces the fragment body with configured content
///
/// An empty replacement is allowed (it clears the body); the payload is
/// never touched.
pub struct InlineBodyAction {
    body: String,
}

impl InlineBodyAction {
    /// Build the action with the replacement body
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl Action for InlineBodyAction {
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, ActionError> {
        let mut fragment = context.fragment;
        fragment.set_body(&self.body);
        Ok(FragmentResult::success(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use weft_core::{ClientRequest, Fragment};

    fn context(body: &str) -> FragmentContext {
        let mut fragment = Fragment::new("snippet", json!({}), body);
        fragment.append_payload("existing", json!(true));
        FragmentContext::new(fragment, Arc::new(ClientRequest::new()))
    }

    #[tokio::test]
    async fn replaces_body_and_keeps_payload() {
        let action = InlineBodyAction::new("<div>replacement</div>");

        let result = action.apply(context("<p>original</p>")).await.unwrap();

        assert!(result.is_success());
        assert_eq!(result.fragment.body(), "<div>replacement</div>");
        assert!(result.fragment.payload().contains_key("existing"));
    }

    #[tokio::test]
    async fn empty_replacement_clears_body() {
        let action = InlineBodyAction::new("");

        let result = action.apply(context("<p>original</p>")).await.unwrap();

        assert_eq!(result.fragment.body(), "");
    }
}
