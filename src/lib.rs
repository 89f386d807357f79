//!
//! Weft - fragment-processing task engine
//!
//! Executes directed graphs of asynchronous actions over content fragments:
//! sequential chains, parallel fan-out/join composites, per-node event
//! logging, and policy-carrying decorators (cache-aside, circuit breaker)
//! between the graph and the leaf actions.
//!
//! This crate is a facade over the platform members:
//! [`weft_core`] (engine and contracts), [`weft_actions`] (action library)
//! and [`weft_cache_inmemory`] (bounded in-process cache store).

#![forbid(unsafe_code)]

pub use weft_core::{
    Action, ActionError, Cache, CacheError, ClientRequest, CompositeNode, EngineError, EventLog,
    EventLogEntry, Fragment, FragmentContext, FragmentResult, FragmentsEngine, Node, NodeResult,
    NodeStatus, Payload, SingleNode, Task, TaskEngine, TaskResult, TaskStatus,
};

pub use weft_actions::{
    ActionLog, CacheAction, CacheActionOptions, CircuitBreakerAction, CircuitBreakerOptions,
    CircuitState, ConfigurationError, InlineBodyAction, InlinePayloadAction, PayloadToBodyAction,
    FALLBACK_TRANSITION,
};

pub use weft_cache_inmemory::{InMemoryCache, InMemoryCacheOptions};
