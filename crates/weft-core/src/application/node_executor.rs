use crate::application::task_engine::TaskEngine;
use crate::domain::fragment::{ClientRequest, Fragment, FragmentContext, FragmentResult};
use crate::domain::graph::{CompositeNode, Node, SingleNode};
use crate::domain::task::{TaskResult, TaskStatus};
use crate::error::{ActionError, EngineError};
use futures::future;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// Uniform result of executing one graph node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResult {
    /// Fragment after the node ran
    pub fragment: Fragment,
    /// Transition declared by the node
    pub transition: String,
    /// Status the node contributed to the task run
    pub status: TaskStatus,
}

/// Execute the current node and classify its outcome
///
/// All non-fatal failures are resolved into a transition here; only fatal
/// failures leave as errors.
pub(crate) async fn execute(
    engine: &TaskEngine,
    node: &Arc<Node>,
    result: &mut TaskResult,
    client_request: &Arc<ClientRequest>,
) -> Result<NodeResult, EngineError> {
    match node.as_ref() {
        Node::Single(single) => execute_single(single, result, client_request).await,
        Node::Composite(composite) => {
            map_reduce(engine, composite, result, client_request).await
        }
    }
}

async fn execute_single(
    node: &SingleNode,
    result: &mut TaskResult,
    client_request: &Arc<ClientRequest>,
) -> Result<NodeResult, EngineError> {
    let context = FragmentContext::new(result.fragment().clone(), client_request.clone());

    match node.action().apply(context).await {
        Ok(action_result) => {
            result.set_status(TaskStatus::Success);
            if action_result.transition == FragmentResult::ERROR_TRANSITION {
                result.log_mut().error_result(node.id(), &action_result);
            } else {
                result.log_mut().success(node.id(), &action_result);
            }
            Ok(NodeResult {
                fragment: action_result.fragment,
                transition: action_result.transition,
                status: TaskStatus::Success,
            })
        }
        Err(ActionError::Fatal(cause)) => {
            error!(node = %node.id(), %cause, "node processing failed with fatal error, aborting task");
            result.set_status(TaskStatus::Failure);
            result.log_mut().error(
                node.id(),
                FragmentResult::ERROR_TRANSITION,
                Some(json!({ "error": cause })),
            );
            Err(EngineError::FatalTask {
                task: result.log().task().to_string(),
                node: node.id().to_string(),
                cause,
            })
        }
        Err(err) => {
            warn!(node = %node.id(), error = %err, "node processing failed, trying the 'error' transition");
            result.set_status(TaskStatus::Failure);
            match err {
                ActionError::Timeout(_) => result.log_mut().timeout(node.id()),
                _ => result.log_mut().error(
                    node.id(),
                    FragmentResult::ERROR_TRANSITION,
                    Some(json!({ "error": err.to_string() })),
                ),
            }
            // The failed action's partial mutation is discarded: the node
            // result carries the pre-call fragment.
            Ok(NodeResult {
                fragment: result.fragment().clone(),
                transition: FragmentResult::ERROR_TRANSITION.to_string(),
                status: TaskStatus::Failure,
            })
        }
    }
}

/// Fork the fragment into one copy per child, run every child subgraph
/// concurrently, wait for all of them and fold the outcomes
async fn map_reduce(
    engine: &TaskEngine,
    node: &CompositeNode,
    result: &mut TaskResult,
    client_request: &Arc<ClientRequest>,
) -> Result<NodeResult, EngineError> {
    // An empty composite is a structural no-op, not an error.
    if node.nodes().is_empty() {
        return Ok(NodeResult {
            fragment: result.fragment().clone(),
            transition: FragmentResult::SUCCESS_TRANSITION.to_string(),
            status: TaskStatus::Unprocessed,
        });
    }

    let task_name = result.log().task().to_string();
    let pre_fork_body = result.fragment().body().to_string();
    let branch_runs: Vec<_> = node
        .nodes()
        .iter()
        .map(|child| {
            engine.run_graph(
                task_name.clone(),
                child.clone(),
                result.fragment().clone(),
                client_request.clone(),
            )
        })
        .collect();

    // The join waits for every branch; a slow or failing branch does not
    // cancel its siblings. A fatal branch aborts the join afterwards.
    let branches = future::join_all(branch_runs).await;
    let mut merged = result.fragment().clone();
    let mut merged_status = TaskStatus::Unprocessed;

    for branch in branches {
        let (fragment, status, log) = branch?.into_parts();
        if fragment.body() != pre_fork_body {
            merged.set_body(fragment.body());
        }
        merged.merge_in_payload(fragment.payload());
        merged_status = merge_status(merged_status, status);
        result.log_mut().append_all(log);
    }

    if merged_status == TaskStatus::Failure {
        result.set_status(TaskStatus::Failure);
        result.log_mut().composite_error(node.id());
    } else {
        // At least one branch ran, so the join is a success.
        merged_status = TaskStatus::Success;
        result.set_status(TaskStatus::Success);
        result.log_mut().composite_success(node.id());
    }

    Ok(NodeResult {
        fragment: merged,
        transition: merged_status.default_transition().to_string(),
        status: merged_status,
    })
}

fn merge_status(merged: TaskStatus, branch: TaskStatus) -> TaskStatus {
    match (merged, branch) {
        (TaskStatus::Failure, _) | (_, TaskStatus::Failure) => TaskStatus::Failure,
        (TaskStatus::Success, _) | (_, TaskStatus::Success) => TaskStatus::Success,
        _ => TaskStatus::Unprocessed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_status_failure_dominates() {
        assert_eq!(
            merge_status(TaskStatus::Success, TaskStatus::Failure),
            TaskStatus::Failure
        );
        assert_eq!(
            merge_status(TaskStatus::Failure, TaskStatus::Success),
            TaskStatus::Failure
        );
        assert_eq!(
            merge_status(TaskStatus::Unprocessed, TaskStatus::Failure),
            TaskStatus::Failure
        );
    }

    #[test]
    fn test_merge_status_success_over_unprocessed() {
        assert_eq!(
            merge_status(TaskStatus::Unprocessed, TaskStatus::Success),
            TaskStatus::Success
        );
        assert_eq!(
            merge_status(TaskStatus::Success, TaskStatus::Unprocessed),
            TaskStatus::Success
        );
        assert_eq!(
            merge_status(TaskStatus::Unprocessed, TaskStatus::Unprocessed),
            TaskStatus::Unprocessed
        );
    }
}
