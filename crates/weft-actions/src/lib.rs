//!
//! Weft Actions - standard library of actions for the Weft platform
//!
//! Provides the policy-carrying decorators (cache-aside, circuit breaker)
//! that sit between the task graph and the leaf actions, a set of basic
//! content actions, and the supporting pieces they share: placeholder
//! resolution and structured per-action logging.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Actions and decorators
pub mod actions;

/// Configuration error type
pub mod error;

/// Structured per-action log builder
pub mod log;

/// Template placeholder resolution
pub mod placeholders;

// Re-export key types
pub use actions::cache::{CacheAction, CacheActionOptions};
pub use actions::circuit_breaker::{
    CircuitBreakerAction, CircuitBreakerOptions, CircuitState, FALLBACK_TRANSITION,
};
pub use actions::inline_body::InlineBodyAction;
pub use actions::inline_payload::InlinePayloadAction;
pub use actions::payload_to_body::PayloadToBodyAction;
pub use error::ConfigurationError;
pub use log::ActionLog;
