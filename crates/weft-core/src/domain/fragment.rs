use crate::types::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A small piece of content that is processed independently of its siblings
///
/// The identifier and type never change during processing; the body and the
/// payload can be updated many times. Cloning a fragment produces the deep
/// copy used when forking into parallel branches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fragment {
    id: String,
    fragment_type: String,
    configuration: Value,
    body: String,
    payload: Payload,
}

impl Fragment {
    /// Create a new fragment with a generated identifier and an empty payload
    pub fn new(fragment_type: &str, configuration: Value, body: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fragment_type: fragment_type.to_string(),
            configuration,
            body: body.to_string(),
            payload: Payload::new(),
        }
    }

    /// Unique identifier of the fragment, fixed at creation
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Type of the fragment, fixed at creation
    #[inline]
    pub fn fragment_type(&self) -> &str {
        &self.fragment_type
    }

    /// Immutable configuration attached when the fragment was created
    #[inline]
    pub fn configuration(&self) -> &Value {
        &self.configuration
    }

    /// Current body of the fragment
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Replace the body of the fragment
    pub fn set_body(&mut self, body: &str) -> &mut Self {
        self.body = body.to_string();
        self
    }

    /// Data accumulated by actions during processing
    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Append an entry to the payload, overwriting an identical key
    pub fn append_payload(&mut self, key: &str, value: Value) -> &mut Self {
        self.payload.append(key, value);
        self
    }

    /// Merge another payload into this fragment's payload
    pub fn merge_in_payload(&mut self, other: &Payload) -> &mut Self {
        self.payload.merge_in(other);
        self
    }
}

/// Read-only snapshot of the client request that produced the fragment
///
/// Used by actions for placeholder resolution (e.g. building cache keys);
/// never mutated by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientRequest {
    /// Request path
    pub path: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request query parameters
    pub params: HashMap<String, String>,
}

impl ClientRequest {
    /// Create an empty request snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request path
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Add a query parameter
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

/// A fragment paired with the client request snapshot, handed to actions
#[derive(Debug, Clone)]
pub struct FragmentContext {
    /// The fragment being processed
    pub fragment: Fragment,
    /// Read-only request snapshot shared by all nodes of a task run
    pub client_request: Arc<ClientRequest>,
}

impl FragmentContext {
    /// Create a new context for one action invocation
    pub fn new(fragment: Fragment, client_request: Arc<ClientRequest>) -> Self {
        Self {
            fragment,
            client_request,
        }
    }
}

/// Outcome of one action invocation
///
/// The transition is an opaque string naming the graph edge to follow;
/// `_success` and `_error` are the only reserved names. The log is an opaque
/// JSON payload passed through to the event log, never parsed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentResult {
    /// The (possibly mutated) fragment
    pub fragment: Fragment,
    /// Name of the edge selected by this outcome
    pub transition: String,
    /// Opaque per-action log
    pub log: Option<Value>,
}

impl FragmentResult {
    /// Reserved transition for a successful outcome
    pub const SUCCESS_TRANSITION: &'static str = "_success";

    /// Reserved transition for a failed outcome
    pub const ERROR_TRANSITION: &'static str = "_error";

    /// Successful outcome without an action log
    pub fn success(fragment: Fragment) -> Self {
        Self {
            fragment,
            transition: Self::SUCCESS_TRANSITION.to_string(),
            log: None,
        }
    }

    /// Successful outcome carrying an action log
    pub fn success_with_log(fragment: Fragment, log: Value) -> Self {
        Self {
            fragment,
            transition: Self::SUCCESS_TRANSITION.to_string(),
            log: Some(log),
        }
    }

    /// Outcome selecting a custom transition
    pub fn with_transition(fragment: Fragment, transition: &str) -> Self {
        Self {
            fragment,
            transition: transition.to_string(),
            log: None,
        }
    }

    /// Failed outcome routed through the error edge
    pub fn fail(fragment: Fragment, log: Option<Value>) -> Self {
        Self {
            fragment,
            transition: Self::ERROR_TRANSITION.to_string(),
            log,
        }
    }

    /// Replace the action log, keeping fragment and transition
    pub fn with_log(mut self, log: Value) -> Self {
        self.log = Some(log);
        self
    }

    /// Check whether the outcome selected the reserved success transition
    #[inline]
    pub fn is_success(&self) -> bool {
        self.transition == Self::SUCCESS_TRANSITION
    }
}
