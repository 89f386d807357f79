use crate::domain::event_log::EventLog;
use crate::domain::fragment::{Fragment, FragmentResult};
use crate::domain::graph::Node;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Terminal state of a task run or of one parallel branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// No node has produced an outcome
    Unprocessed,
    /// The last node outcome was successful
    Success,
    /// The run ended in failure
    Failure,
}

impl TaskStatus {
    /// Default transition a composite declares for this merged status
    pub fn default_transition(&self) -> &'static str {
        match self {
            TaskStatus::Failure => FragmentResult::ERROR_TRANSITION,
            _ => FragmentResult::SUCCESS_TRANSITION,
        }
    }
}

/// A named graph of nodes applied to one fragment per run
///
/// Graphs are built once by an external factory and are read-only for the
/// lifetime of all task runs that use them. A task without a root node is a
/// no-op: its fragment passes through unprocessed.
#[derive(Debug, Clone)]
pub struct Task {
    name: String,
    root: Option<Arc<Node>>,
}

impl Task {
    /// Create a task over the given root node
    pub fn new(name: &str, root: Arc<Node>) -> Self {
        Self {
            name: name.to_string(),
            root: Some(root),
        }
    }

    /// Create a task with no graph attached
    pub fn without_root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            root: None,
        }
    }

    /// Name of the task
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root node of the graph, if one is attached
    #[inline]
    pub fn root(&self) -> Option<&Arc<Node>> {
        self.root.as_ref()
    }
}

/// Outcome of running a graph (or one parallel branch of it) for a fragment
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    fragment: Fragment,
    status: TaskStatus,
    log: EventLog,
}

impl TaskResult {
    /// Create the initial result for a run that has not executed any node yet
    pub fn unprocessed(task_name: &str, fragment: Fragment) -> Self {
        Self {
            fragment,
            status: TaskStatus::Unprocessed,
            log: EventLog::new(task_name),
        }
    }

    /// The fragment in its current processing state
    #[inline]
    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    /// Replace the fragment with a node outcome
    pub fn set_fragment(&mut self, fragment: Fragment) {
        self.fragment = fragment;
    }

    /// Current status of the run
    #[inline]
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Update the status of the run
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// The event log accumulated so far
    #[inline]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Mutable access to the event log
    pub fn log_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    /// Decompose into fragment, status and log
    pub fn into_parts(self) -> (Fragment, TaskStatus, EventLog) {
        (self.fragment, self.status, self.log)
    }
}
