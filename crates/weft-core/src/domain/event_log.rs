use crate::domain::fragment::FragmentResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome recorded for one node execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    /// The node's action completed
    Success,
    /// The node's action failed or ended on the error transition
    Error,
    /// The node's action timed out
    Timeout,
    /// The node declared a transition with no configured edge
    UnsupportedTransition,
}

/// One record of the ordered per-task event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    /// Name of the task that produced the entry
    pub task: String,
    /// Id of the node the entry describes
    pub node: String,
    /// Outcome of the node execution
    pub status: NodeStatus,
    /// Transition declared by the node, when one was produced
    pub transition: Option<String>,
    /// Entry creation time, epoch milliseconds
    pub timestamp: i64,
    /// Opaque action log attached to the outcome
    pub node_log: Option<Value>,
}

impl EventLogEntry {
    fn new(
        task: &str,
        node: &str,
        status: NodeStatus,
        transition: Option<String>,
        node_log: Option<Value>,
    ) -> Self {
        Self {
            task: task.to_string(),
            node: node.to_string(),
            status,
            transition,
            timestamp: Utc::now().timestamp_millis(),
            node_log,
        }
    }
}

/// Append-only ordered record of node outcomes for one task run
///
/// Logs of parallel branches are concatenated at the join, never re-sorted;
/// entries within a branch stay causally ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    task: String,
    entries: Vec<EventLogEntry>,
}

impl EventLog {
    /// Create an empty log for a task run
    pub fn new(task: &str) -> Self {
        Self {
            task: task.to_string(),
            entries: Vec::new(),
        }
    }

    /// Record a successful node outcome
    pub fn success(&mut self, node: &str, result: &FragmentResult) {
        self.push(
            node,
            NodeStatus::Success,
            Some(result.transition.clone()),
            result.log.clone(),
        );
    }

    /// Record a failed node outcome
    pub fn error(&mut self, node: &str, transition: &str, node_log: Option<Value>) {
        self.push(node, NodeStatus::Error, Some(transition.to_string()), node_log);
    }

    /// Record an outcome that ended on the error transition without a call failure
    pub fn error_result(&mut self, node: &str, result: &FragmentResult) {
        self.push(
            node,
            NodeStatus::Error,
            Some(result.transition.clone()),
            result.log.clone(),
        );
    }

    /// Record a timed-out node
    pub fn timeout(&mut self, node: &str) {
        self.push(node, NodeStatus::Timeout, None, None);
    }

    /// Record a transition with no configured edge
    pub fn unsupported(&mut self, node: &str, transition: &str) {
        self.push(
            node,
            NodeStatus::UnsupportedTransition,
            Some(transition.to_string()),
            None,
        );
    }

    /// Record a successful composite join
    pub fn composite_success(&mut self, node: &str) {
        self.push(
            node,
            NodeStatus::Success,
            Some(FragmentResult::SUCCESS_TRANSITION.to_string()),
            None,
        );
    }

    /// Record a failed composite join
    pub fn composite_error(&mut self, node: &str) {
        self.push(
            node,
            NodeStatus::Error,
            Some(FragmentResult::ERROR_TRANSITION.to_string()),
            None,
        );
    }

    /// Append a prepared entry
    pub fn append(&mut self, entry: EventLogEntry) {
        self.entries.push(entry);
    }

    /// Concatenate another log onto this one, preserving its internal order
    pub fn append_all(&mut self, other: EventLog) {
        self.entries.extend(other.entries);
    }

    /// Name of the task that owns this log
    #[inline]
    pub fn task(&self) -> &str {
        &self.task
    }

    /// The recorded entries in execution order
    #[inline]
    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }

    /// Timestamp of the oldest entry, or zero for an empty log
    pub fn earliest_timestamp(&self) -> i64 {
        self.entries.iter().map(|e| e.timestamp).min().unwrap_or(0)
    }

    /// Timestamp of the newest entry, or zero for an empty log
    pub fn latest_timestamp(&self) -> i64 {
        self.entries.iter().map(|e| e.timestamp).max().unwrap_or(0)
    }

    fn push(
        &mut self,
        node: &str,
        status: NodeStatus,
        transition: Option<String>,
        node_log: Option<Value>,
    ) {
        let task = self.task.clone();
        self.entries
            .push(EventLogEntry::new(&task, node, status, transition, node_log));
    }
}
