use crate::error::ConfigurationError;
use crate::log::ActionLog;
use crate::placeholders;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use weft_core::{Action, ActionError, Cache, FragmentContext, FragmentResult};

const CACHE_HIT: &str = "cache_hit";
const CACHE_MISS: &str = "cache_miss";
const CACHE_PASS: &str = "cache_pass";
const CACHE_PUT_FAILURE: &str = "cache_put_failure";

/// Configuration of the cache-aside decorator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheActionOptions {
    /// Payload key the cached value is read from and written to
    pub payload_key: String,
    /// Cache key template, placeholder-resolved per invocation
    /// (e.g. `product-{param.id}`)
    pub cache_key: String,
    /// Fail the invocation when the cache lookup errors (fail-closed)
    pub fail_when_lookup_fails: bool,
    /// Fail the invocation when storing the computed value errors
    pub fail_when_store_fails: bool,
}

impl Default for CacheActionOptions {
    fn default() -> Self {
        Self {
            payload_key: String::new(),
            cache_key: String::new(),
            fail_when_lookup_fails: true,
            fail_when_store_fails: false,
        }
    }
}

/// Cache-aside decorator around another action
///
/// Looks the resolved key up first; a hit appends the cached value to the
/// fragment payload without invoking the wrapped action, a miss invokes it
/// and stores the payload value it produced. The cache is shared across
/// concurrent invocations with no cross-request locking, so concurrent
/// misses on the same key may both invoke the wrapped action.
pub struct CacheAction {
    alias: String,
    options: CacheActionOptions,
    cache: Arc<dyn Cache>,
    do_action: Arc<dyn Action>,
}

impl CacheAction {
    /// Build the decorator, validating its configuration
    pub fn new(
        alias: &str,
        options: CacheActionOptions,
        cache: Arc<dyn Cache>,
        do_action: Arc<dyn Action>,
    ) -> Result<Self, ConfigurationError> {
        if options.payload_key.is_empty() {
            return Err(ConfigurationError::new(
                alias,
                "cache action requires a payloadKey value in configuration",
            ));
        }
        if options.cache_key.is_empty() {
            return Err(ConfigurationError::new(
                alias,
                "cache action requires a cacheKey value in configuration",
            ));
        }
        Ok(Self {
            alias: alias.to_string(),
            options,
            cache,
            do_action,
        })
    }

    async fn retrieve_and_store(
        &self,
        cache_key: &str,
        context: FragmentContext,
        mut log: ActionLog,
    ) -> Result<FragmentResult, ActionError> {
        let fallback = context.fragment.clone();

        match self.do_action.apply(context).await {
            Ok(result) => {
                if let Some(inner) = &result.log {
                    log.info("do_action_log", inner.clone());
                }
                let computed = if result.is_success() {
                    result
                        .fragment
                        .payload()
                        .get(&self.options.payload_key)
                        .cloned()
                } else {
                    None
                };
                match computed {
                    Some(value) => match self.cache.put(cache_key, value.clone()).await {
                        Ok(()) => {
                            log.info(
                                CACHE_MISS,
                                json!({ "cache_key": cache_key, "computed_value": value }),
                            );
                        }
                        Err(err) => {
                            warn!(alias = %self.alias, cache_key, error = %err, "storing computed value failed");
                            log.error(
                                CACHE_PUT_FAILURE,
                                json!({ "cache_key": cache_key, "error": err.to_string() }),
                            );
                            if self.options.fail_when_store_fails {
                                return Ok(FragmentResult::fail(
                                    result.fragment,
                                    Some(log.to_value()),
                                ));
                            }
                        }
                    },
                    None => {
                        log.info(CACHE_PASS, json!({ "cache_key": cache_key }));
                    }
                }
                Ok(result.with_log(log.to_value()))
            }
            Err(ActionError::Fatal(cause)) => Err(ActionError::Fatal(cause)),
            Err(err) => {
                log.error("error", json!(err.to_string()));
                Ok(FragmentResult::fail(fallback, Some(log.to_value())))
            }
        }
    }
}

#[async_trait]
impl Action for CacheAction {
    async fn apply(&self, context: FragmentContext) -> Result<FragmentResult, ActionError> {
        let mut log = ActionLog::new(&self.alias);
        let cache_key = placeholders::resolve(&self.options.cache_key, &context);

        match self.cache.get(&cache_key).await {
            Ok(Some(value)) => {
                debug!(alias = %self.alias, cache_key, "cache hit");
                log.info(
                    CACHE_HIT,
                    json!({ "cache_key": cache_key, "cached_value": value }),
                );
                let mut fragment = context.fragment;
                fragment.append_payload(&self.options.payload_key, value);
                Ok(FragmentResult::success_with_log(fragment, log.to_value()))
            }
            Ok(None) => {
                debug!(alias = %self.alias, cache_key, "cache miss");
                self.retrieve_and_store(&cache_key, context, log).await
            }
            Err(err) => {
                warn!(alias = %self.alias, cache_key, error = %err, "cache lookup failed");
                log.error("error", json!(err.to_string()));
                if self.options.fail_when_lookup_fails {
                    Ok(FragmentResult::fail(context.fragment, Some(log.to_value())))
                } else {
                    self.retrieve_and_store(&cache_key, context, log).await
                }
            }
        }
    }
}
