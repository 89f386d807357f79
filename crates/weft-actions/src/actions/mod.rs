//! Actions and action decorators shipped with the platform

/// Cache-aside decorator
pub mod cache;

/// Circuit-breaker decorator
pub mod circuit_breaker;

/// Body replacement action
pub mod inline_body;

/// Payload injection action
pub mod inline_payload;

/// Payload-to-body rewriting action
pub mod payload_to_body;
