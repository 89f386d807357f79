use crate::application::node_executor;
use crate::domain::fragment::{ClientRequest, Fragment, FragmentContext, FragmentResult};
use crate::domain::graph::Node;
use crate::domain::task::{TaskResult, TaskStatus};
use crate::error::EngineError;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::trace;

/// Walks a task graph for one fragment
///
/// The engine keeps a current-node cursor starting at the root: it executes
/// the node, appends its log, looks the declared transition up in the node's
/// edges and either advances or finishes. Exactly one [`TaskResult`] is
/// produced per invocation; only fatal failures surface as errors.
#[derive(Debug, Default)]
pub struct TaskEngine;

impl TaskEngine {
    /// Create a new task engine
    pub fn new() -> Self {
        Self
    }

    /// Run the graph rooted at `root` for the fragment in `context`
    pub async fn start(
        &self,
        task_name: &str,
        root: Arc<Node>,
        context: FragmentContext,
    ) -> Result<TaskResult, EngineError> {
        let FragmentContext {
            fragment,
            client_request,
        } = context;
        self.run_graph(task_name.to_string(), root, fragment, client_request)
            .await
    }

    /// Run a (sub)graph to completion, producing the branch-level result
    ///
    /// Also the recursion point for composite children: every parallel
    /// branch is a full sub-task over its own fragment copy.
    pub(crate) fn run_graph(
        &self,
        task_name: String,
        root: Arc<Node>,
        fragment: Fragment,
        client_request: Arc<ClientRequest>,
    ) -> BoxFuture<'_, Result<TaskResult, EngineError>> {
        async move {
            let mut result = TaskResult::unprocessed(&task_name, fragment);
            let mut current = Some(root);

            while let Some(node) = current {
                trace!(task = %task_name, node = %node.id(), "processing graph node");
                let node_result =
                    node_executor::execute(self, &node, &mut result, &client_request).await?;
                result.set_fragment(node_result.fragment);

                current = match node.next(&node_result.transition) {
                    Some(next) => Some(next),
                    None => {
                        // A terminal node ending on _success is a normal end;
                        // any other unmatched transition fails the task.
                        if node_result.transition != FragmentResult::SUCCESS_TRANSITION {
                            result.set_status(TaskStatus::Failure);
                            result
                                .log_mut()
                                .unsupported(node.id(), &node_result.transition);
                        }
                        None
                    }
                };
            }

            Ok(result)
        }
        .boxed()
    }
}
