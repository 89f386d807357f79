//! Domain layer - fragments, graphs, tasks and their outcomes

/// Cache store contract
pub mod cache;

/// Event log records
pub mod event_log;

/// Fragment, request snapshot and action outcome types
pub mod fragment;

/// Task graph model
pub mod graph;

/// Tasks and task results
pub mod task;
