//! Application services - the engines driving graph execution

/// Batch front-end over the task engine
pub mod fragments_engine;

/// Per-node execution and error classification
pub mod node_executor;

/// Recursive graph-traversal engine
pub mod task_engine;
