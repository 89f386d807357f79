use weft_core::FragmentContext;

/// Resolve `{source.key}` placeholders in a template against the fragment
/// context
///
/// Supported sources: `param.*` and `header.*` from the client request
/// snapshot, `payload.*` from the fragment payload, plus `fragment.id` and
/// `fragment.type`. Unknown placeholders resolve to an empty string.
pub fn resolve(template: &str, context: &FragmentContext) -> String {
    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        resolved.push_str(&rest[..start]);
        match rest[start..].find('}') {
            Some(end) => {
                let placeholder = &rest[start + 1..start + end];
                resolved.push_str(&lookup(placeholder, context));
                rest = &rest[start + end + 1..];
            }
            None => {
                // Unterminated placeholder, keep the tail verbatim.
                resolved.push_str(&rest[start..]);
                return resolved;
            }
        }
    }

    resolved.push_str(rest);
    resolved
}

fn lookup(placeholder: &str, context: &FragmentContext) -> String {
    if let Some(name) = placeholder.strip_prefix("param.") {
        return context
            .client_request
            .params
            .get(name)
            .cloned()
            .unwrap_or_default();
    }
    if let Some(name) = placeholder.strip_prefix("header.") {
        return context
            .client_request
            .headers
            .get(name)
            .cloned()
            .unwrap_or_default();
    }
    if let Some(key) = placeholder.strip_prefix("payload.") {
        return match context.fragment.payload().get(key) {
            Some(serde_json::Value::String(text)) => text.clone(),
            Some(value) => value.to_string(),
            None => String::new(),
        };
    }
    match placeholder {
        "fragment.id" => context.fragment.id().to_string(),
        "fragment.type" => context.fragment.fragment_type().to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use weft_core::{ClientRequest, Fragment};

    fn context() -> FragmentContext {
        let mut fragment = Fragment::new("snippet", json!({}), "");
        fragment.append_payload("user", json!("alice"));
        fragment.append_payload("count", json!(3));
        FragmentContext::new(
            fragment,
            Arc::new(
                ClientRequest::new()
                    .with_param("id", "42")
                    .with_header("X-Tenant", "acme"),
            ),
        )
    }

    #[test]
    fn test_param_and_header_resolution() {
        let context = context();
        assert_eq!(resolve("product-{param.id}", &context), "product-42");
        assert_eq!(resolve("{header.X-Tenant}:{param.id}", &context), "acme:42");
    }

    #[test]
    fn test_payload_and_fragment_resolution() {
        let context = context();
        assert_eq!(resolve("user-{payload.user}", &context), "user-alice");
        assert_eq!(resolve("n-{payload.count}", &context), "n-3");
        assert_eq!(
            resolve("{fragment.type}", &context),
            context.fragment.fragment_type()
        );
        assert_eq!(
            resolve("{fragment.id}", &context),
            context.fragment.id()
        );
    }

    #[test]
    fn test_unknown_placeholder_resolves_empty() {
        let context = context();
        assert_eq!(resolve("x-{param.missing}-y", &context), "x--y");
        assert_eq!(resolve("x-{unknown.source}-y", &context), "x--y");
    }

    #[test]
    fn test_no_placeholders_and_unterminated() {
        let context = context();
        assert_eq!(resolve("plain-key", &context), "plain-key");
        assert_eq!(resolve("broken-{param.id", &context), "broken-{param.id");
    }
}
