use crate::application::task_engine::TaskEngine;
use crate::domain::fragment::FragmentContext;
use crate::domain::task::{Task, TaskResult, TaskStatus};
use crate::error::EngineError;
use futures::future;
use tracing::debug;

/// Runs a batch of (task, fragment) pairs through the task engine
///
/// All pairs are processed concurrently and independently; the returned
/// results keep the incoming order. A task without a root node yields an
/// unprocessed result carrying the unchanged fragment.
#[derive(Debug, Default)]
pub struct FragmentsEngine {
    engine: TaskEngine,
}

impl FragmentsEngine {
    /// Create a new fragments engine
    pub fn new() -> Self {
        Self {
            engine: TaskEngine::new(),
        }
    }

    /// Process every fragment against its task, concurrently
    pub async fn execute(
        &self,
        jobs: Vec<(Task, FragmentContext)>,
    ) -> Result<Vec<TaskResult>, EngineError> {
        let runs = jobs.into_iter().map(|(task, context)| async move {
            match task.root() {
                Some(root) => {
                    self.engine
                        .start(task.name(), root.clone(), context)
                        .await
                }
                None => Ok(TaskResult::unprocessed(task.name(), context.fragment)),
            }
        });

        let results: Result<Vec<TaskResult>, EngineError> =
            future::join_all(runs).await.into_iter().collect();
        let results = results?;

        let processed = results
            .iter()
            .filter(|r| r.status() != TaskStatus::Unprocessed)
            .count();
        debug!(total = results.len(), processed, "fragments engine finished batch");

        Ok(results)
    }
}
