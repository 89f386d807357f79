//!
//! Weft Core - task engine for the Weft fragment-processing platform
//!
//! This crate defines the task graph model, the recursive graph-traversal
//! engine and the contracts (actions, cache stores) the engine is built
//! against. It is the foundation for all other crates in the platform.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;

/// Domain layer - fragments, graphs, tasks, event logs
pub mod domain;

/// Application services - engine and executors
pub mod application;

/// Core types
pub mod types;

/// Error types
pub mod error;

// Re-export key types
pub use error::{ActionError, CacheError, EngineError};
pub use types::Payload;

pub use domain::cache::Cache;
pub use domain::event_log::{EventLog, EventLogEntry, NodeStatus};
pub use domain::fragment::{ClientRequest, Fragment, FragmentContext, FragmentResult};
pub use domain::graph::{CompositeNode, Edges, Node, SingleNode};
pub use domain::task::{Task, TaskResult, TaskStatus};

// Application services
pub use application::fragments_engine::FragmentsEngine;
pub use application::node_executor::NodeResult;
pub use application::task_engine::TaskEngine;

/// A leaf capability applied to a fragment by a single graph node
///
/// Given a fragment and the client request snapshot, an action
/// asynchronously produces a transition name, a possibly mutated fragment
/// and an opaque log. Implementations (network calls, static payload
/// injection, body rewriting, decorators) all provide this single method.
#[async_trait]
pub trait Action: Send + Sync {
    /// Apply the action to the fragment in the given context
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, ActionError>;
}
