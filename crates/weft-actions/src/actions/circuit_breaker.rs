use crate::log::ActionLog;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use weft_core::{Action, ActionError, Fragment, FragmentContext, FragmentResult};

/// Transition declared when the breaker responds instead of the wrapped action
pub const FALLBACK_TRANSITION: &str = "_fallback";

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CircuitState {
    /// Circuit is closed (normal operation)
    #[default]
    Closed,
    /// Circuit is open (failing, calls are blocked)
    Open,
    /// Circuit is half-open (allowing a test call)
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "CLOSED"),
            CircuitState::Open => write!(f, "OPEN"),
            CircuitState::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Configuration of the circuit-breaker decorator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerOptions {
    /// Consecutive failures before the circuit opens
    pub failure_threshold: u32,
    /// Time to wait before allowing a test call, in milliseconds
    pub reset_timeout_ms: u64,
    /// Transitions of the wrapped action that count as circuit failures,
    /// in addition to a hard call failure
    pub error_transitions: HashSet<String>,
    /// Transition declared when the breaker short-circuits or absorbs a failure
    pub fallback_transition: String,
}

impl Default for CircuitBreakerOptions {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout_ms: 30_000,
            error_transitions: HashSet::from([FragmentResult::ERROR_TRANSITION.to_string()]),
            fallback_transition: FALLBACK_TRANSITION.to_string(),
        }
    }
}

/// Local circuit state
struct Circuit {
    /// Current state of the circuit
    state: CircuitState,

    /// Number of consecutive failures
    failures: u32,

    /// Moment of the last failure
    last_failure_time: Option<Instant>,
}

/// Circuit-breaker decorator around another action
///
/// While closed or half-open the wrapped action is invoked; failures (hard
/// call failures and erroneous transitions) are counted, and the caller
/// receives the fallback transition instead of an error. While open,
/// invocations short-circuit without calling the wrapped action. Counting is
/// maintained per decorator instance, one breaker per configured node.
pub struct CircuitBreakerAction {
    alias: String,
    options: CircuitBreakerOptions,
    do_action: Arc<dyn Action>,
    circuit: Mutex<Circuit>,
    invocations: AtomicU64,
}

impl CircuitBreakerAction {
    /// Build the decorator around the wrapped action
    pub fn new(alias: &str, options: CircuitBreakerOptions, do_action: Arc<dyn Action>) -> Self {
        Self {
            alias: alias.to_string(),
            options,
            do_action,
            circuit: Mutex::new(Circuit {
                state: CircuitState::Closed,
                failures: 0,
                last_failure_time: None,
            }),
            invocations: AtomicU64::new(0),
        }
    }

    /// Current state of the circuit
    pub async fn state(&self) -> CircuitState {
        self.circuit.lock().await.state
    }

    /// Check whether a call is allowed, moving an open circuit to half-open
    /// once the reset timeout has elapsed
    async fn allow(&self) -> CircuitState {
        let mut circuit = self.circuit.lock().await;
        match circuit.state {
            CircuitState::Closed => CircuitState::Closed,
            CircuitState::HalfOpen => CircuitState::HalfOpen,
            CircuitState::Open => {
                let reset_timeout = Duration::from_millis(self.options.reset_timeout_ms);
                let elapsed = circuit
                    .last_failure_time
                    .map(|at| at.elapsed() >= reset_timeout)
                    .unwrap_or(true);
                if elapsed {
                    info!(alias = %self.alias, "circuit half-open, allowing test call after timeout");
                    circuit.state = CircuitState::HalfOpen;
                    CircuitState::HalfOpen
                } else {
                    CircuitState::Open
                }
            }
        }
    }

    async fn report_success(&self) {
        let mut circuit = self.circuit.lock().await;
        circuit.failures = 0;
        if circuit.state == CircuitState::HalfOpen {
            info!(alias = %self.alias, "circuit closed after successful test call");
            circuit.state = CircuitState::Closed;
        }
    }

    async fn report_failure(&self) {
        let mut circuit = self.circuit.lock().await;
        circuit.failures += 1;
        circuit.last_failure_time = Some(Instant::now());
        if circuit.state == CircuitState::HalfOpen
            || (circuit.state == CircuitState::Closed
                && circuit.failures >= self.options.failure_threshold)
        {
            warn!(alias = %self.alias, failures = circuit.failures, "circuit opened");
            circuit.state = CircuitState::Open;
        }
    }

    fn fallback(&self, fragment: Fragment, log: &ActionLog) -> FragmentResult {
        FragmentResult::with_transition(fragment, &self.options.fallback_transition)
            .with_log(log.to_value())
    }
}

#[async_trait]
impl Action for CircuitBreakerAction {
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, ActionError> {
        let attempt = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        let mut log = ActionLog::new(&self.alias);

        if self.allow().await == CircuitState::Open {
            debug!(alias = %self.alias, "circuit is open, short-circuiting to fallback");
            log.error("invocation_count", json!(attempt));
            log.error("error", json!(format!("circuit '{}' is open", self.alias)));
            return Ok(self.fallback(context.fragment, &log));
        }

        let fallback_fragment = context.fragment.clone();
        match self.do_action.apply(context).await {
            Ok(result) if !self.options.error_transitions.contains(&result.transition) => {
                self.report_success().await;
                log.info("invocation_count", json!(attempt));
                if let Some(inner) = &result.log {
                    log.info("do_action_log", inner.clone());
                }
                Ok(result.with_log(log.to_value()))
            }
            Ok(result) => {
                self.report_failure().await;
                error!(alias = %self.alias, transition = %result.transition,
                    "action ended with erroneous transition, responding with fallback");
                log.error("invocation_count", json!(attempt));
                log.error(
                    "error",
                    json!(format!("action ended with '{}' transition", result.transition)),
                );
                if let Some(inner) = result.log {
                    log.error("do_action_log", inner);
                }
                Ok(self.fallback(fallback_fragment, &log))
            }
            Err(ActionError::Fatal(cause)) => {
                // Fatal failures are counted but never masked by the fallback.
                self.report_failure().await;
                Err(ActionError::Fatal(cause))
            }
            Err(err) => {
                self.report_failure().await;
                error!(alias = %self.alias, error = %err, "action call failed, responding with fallback");
                log.error("invocation_count", json!(attempt));
                log.error("error", json!(err.to_string()));
                Ok(self.fallback(fallback_fragment, &log))
            }
        }
    }
}
