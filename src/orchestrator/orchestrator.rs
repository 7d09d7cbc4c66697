// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use super::dispatch::{Dispatcher, EngineCall};
use super::registry::EngineRegistry;
use super::stats::ProcessingStats;
use crate::cache::{CacheManager, CacheStats, Fingerprint};
use crate::config::consts::DEFAULT_LANGUAGE;
use crate::config::{validate_config, OrchestratorConfig};
use crate::consolidation::ResultsConsolidator;
use crate::errors::{AnalysisError, ConfigError, FallbackStrategy, OrchestratorError};
use crate::model::{
    CheckOptions, CheckResult, EngineInfo, EngineMode, EngineState, HealthReport,
    PerformanceStats, Priority, SystemStatus,
};
use crate::observability::messages::engine::{
    EngineInitializationFailed, EngineInitialized, EngineShutdownFailed,
};
use crate::observability::messages::orchestrator::{
    ConfigurationReloaded, EngineExcluded, EngineRegistered, EngineUnregistered,
    InitializationCompleted, InitializationStarted, RequestCompleted,
};
use crate::observability::messages::StructuredLog;
use crate::resilience::{with_timeout, CircuitBreaker};
use crate::traits::AnalysisEngine;

/// Everything a request needs from the configuration, swapped as one unit on
/// reload. A request holds its snapshot for its whole lifetime.
struct ActiveConfig {
    config: OrchestratorConfig,
    semaphore: Arc<Semaphore>,
    consolidator: ResultsConsolidator,
}

impl ActiveConfig {
    fn new(config: OrchestratorConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.concurrency)),
            consolidator: ResultsConsolidator::new(config.consolidation.clone()),
            config,
        }
    }
}

#[derive(Default)]
struct Selection {
    calls: Vec<EngineCall>,
    /// Candidates dropped only because their circuit is open.
    breaker_excluded: usize,
}

/// Owns the registered engines and turns one request into one consolidated
/// result.
///
/// Engines move through `Registered -> Initializing -> Ready -> Shutdown`.
/// `Disabled` is never stored: it is reported for ready engines whose circuit
/// is open, and clears by itself when the circuit closes.
pub struct Orchestrator {
    registry: RwLock<EngineRegistry>,
    active: RwLock<Arc<ActiveConfig>>,
    breaker: Arc<CircuitBreaker>,
    cache: CacheManager,
    stats: Mutex<ProcessingStats>,
    initialized: AtomicBool,
    /// Bumped whenever the set of dispatchable engines changes outside a
    /// configuration reload. Results computed under an older generation are
    /// not cached.
    registry_generation: AtomicU64,
    /// Serializes initialize, configure, shutdown and engine (un)registration.
    lifecycle: tokio::sync::Mutex<()>,
}

fn validated(config: &OrchestratorConfig) -> Result<(), OrchestratorError> {
    validate_config(config).map_err(|errors| OrchestratorError::Configuration(ConfigError::Validation(errors)))
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> Result<Self, OrchestratorError> {
        let breaker = Arc::new(CircuitBreaker::new(config.circuit_breaker));
        Self::with_circuit_breaker(config, breaker)
    }

    /// Build around a caller-owned breaker. The breaker takes its thresholds
    /// from `config`.
    pub fn with_circuit_breaker(
        config: OrchestratorConfig,
        breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, OrchestratorError> {
        validated(&config)?;
        breaker.update_config(config.circuit_breaker);

        Ok(Self {
            registry: RwLock::new(EngineRegistry::default()),
            cache: CacheManager::from_config(&config.cache),
            active: RwLock::new(Arc::new(ActiveConfig::new(config))),
            breaker,
            stats: Mutex::new(ProcessingStats::default()),
            initialized: AtomicBool::new(false),
            registry_generation: AtomicU64::new(0),
            lifecycle: tokio::sync::Mutex::new(()),
        })
    }

    fn snapshot(&self) -> Arc<ActiveConfig> {
        self.active.read().clone()
    }

    /// Invalidate cached results after the engine set changed. The bump
    /// happens under the snapshot lock so it orders against the cache write
    /// in `process`.
    fn engine_set_changed(&self) {
        {
            let _active = self.active.write();
            self.registry_generation.fetch_add(1, Ordering::SeqCst);
        }
        self.cache.clear();
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Copy of the active configuration.
    pub fn config(&self) -> OrchestratorConfig {
        self.snapshot().config.clone()
    }

    pub fn circuit_breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Initialize every registered engine: the configured `init_sequence`
    /// first, then the rest in registration order. A no-op once initialized.
    ///
    /// Under [`FallbackStrategy::Fail`] the first failing engine aborts the
    /// whole call and the orchestrator stays uninitialized. Otherwise failures
    /// are logged and the engine stays `Registered`.
    pub async fn initialize(&self) -> Result<(), OrchestratorError> {
        let _guard = self.lifecycle.lock().await;
        if self.is_initialized() {
            return Ok(());
        }

        let snapshot = self.snapshot();
        let config = &snapshot.config;
        let started = Instant::now();
        let order = self.registry.read().initialization_order(&config.init_sequence);
        InitializationStarted {
            engine_count: order.len(),
            sequenced: order.iter().filter(|id| config.init_sequence.contains(*id)).count(),
        }
        .log();

        let mut ready = 0;
        let mut failed = 0;
        for engine_id in &order {
            match self.initialize_engine(engine_id, config).await {
                Ok(true) => ready += 1,
                Ok(false) => {}
                Err(source) => {
                    failed += 1;
                    if config.fallback_strategy == FallbackStrategy::Fail {
                        return Err(OrchestratorError::InitializationFailed {
                            engine_id: engine_id.clone(),
                            source,
                        });
                    }
                }
            }
        }

        self.initialized.store(true, Ordering::SeqCst);
        InitializationCompleted {
            ready,
            failed,
            duration: started.elapsed(),
        }
        .log();
        Ok(())
    }

    /// Returns `Ok(false)` when there is nothing to initialize (engine gone or
    /// shut down).
    async fn initialize_engine(
        &self,
        engine_id: &str,
        config: &OrchestratorConfig,
    ) -> Result<bool, AnalysisError> {
        let engine = {
            let mut registry = self.registry.write();
            let Some(slot) = registry.get_mut(engine_id) else {
                return Ok(false);
            };
            match slot.state {
                EngineState::Ready | EngineState::Disabled => return Ok(true),
                EngineState::Shutdown => return Ok(false),
                EngineState::Registered | EngineState::Initializing => {}
            }
            slot.state = EngineState::Initializing;
            Arc::clone(&slot.engine)
        };

        let started = Instant::now();
        let label = format!("initialization of engine '{}'", engine_id);
        let result = with_timeout(engine.initialize(), config.engine_timeout(engine_id), &label)
            .await
            .map_err(|e| e.with_engine(engine_id));

        if let Some(slot) = self.registry.write().get_mut(engine_id) {
            match &result {
                Ok(()) => {
                    slot.state = EngineState::Ready;
                    slot.init_error = None;
                }
                Err(error) => {
                    slot.state = EngineState::Registered;
                    slot.init_error = Some(error.to_string());
                }
            }
        }

        match &result {
            Ok(()) => EngineInitialized {
                engine_id,
                duration: started.elapsed(),
            }
            .log(),
            Err(error) => EngineInitializationFailed { engine_id, error }.log(),
        }
        result.map(|()| true)
    }

    /// Add an engine. If the orchestrator is already initialized the engine
    /// is initialized right away; a failure there is logged, not returned.
    /// Registration waits for a running `initialize` to finish.
    pub async fn register_engine(&self, engine: Arc<dyn AnalysisEngine>) -> Result<(), OrchestratorError> {
        let _guard = self.lifecycle.lock().await;
        let engine_id = engine.id().to_string();
        let inserted = self.registry.write().insert(engine);
        if !inserted {
            return Err(OrchestratorError::DuplicateEngine(engine_id));
        }

        let initialize_now = self.is_initialized();
        EngineRegistered {
            engine_id: &engine_id,
            initialize_now,
        }
        .log();
        if initialize_now {
            let snapshot = self.snapshot();
            let _ = self.initialize_engine(&engine_id, &snapshot.config).await;
        }
        self.engine_set_changed();
        Ok(())
    }

    /// Remove an engine, shut it down and forget its breaker history.
    /// Shutdown failures are logged only.
    pub async fn unregister_engine(&self, engine_id: &str) -> Result<(), OrchestratorError> {
        let _guard = self.lifecycle.lock().await;
        let removed = self.registry.write().remove(engine_id);
        let slot = removed.ok_or_else(|| OrchestratorError::EngineNotFound(engine_id.to_string()))?;

        if let Err(error) = slot.engine.shutdown().await {
            EngineShutdownFailed {
                engine_id,
                error: &error,
            }
            .log();
        }
        self.breaker.reset(engine_id);
        self.engine_set_changed();
        EngineUnregistered { engine_id }.log();
        Ok(())
    }

    /// Check `text` with every eligible engine in parallel and consolidate
    /// what the successful ones report.
    ///
    /// Engine failures never fail the call except under
    /// [`FallbackStrategy::Fail`], where an empty candidate set caused by open
    /// circuits yields [`OrchestratorError::NoEnginesAvailable`] and a request
    /// in which every dispatched engine failed yields
    /// [`OrchestratorError::AllEnginesFailed`].
    pub async fn process(&self, text: &str, options: &CheckOptions) -> Result<CheckResult, OrchestratorError> {
        if !self.is_initialized() {
            return Err(OrchestratorError::NotInitialized);
        }

        let started = Instant::now();
        let snapshot = self.snapshot();
        let generation = self.registry_generation.load(Ordering::SeqCst);
        let config = &snapshot.config;
        let language = options.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);

        if text.trim().is_empty() {
            let result = CheckResult::empty(text, language);
            self.complete(&result, 0, started);
            return Ok(result);
        }

        let fingerprint = config.cache.enabled.then(|| Fingerprint::new(text, options));
        if let Some(cached) = fingerprint.as_ref().and_then(|key| self.cache.get(key)) {
            self.complete(&cached, 0, started);
            return Ok(cached);
        }

        let selection = self.select_candidates(&snapshot, options);
        if selection.calls.is_empty() {
            if config.fallback_strategy == FallbackStrategy::Fail && selection.breaker_excluded > 0 {
                return Err(OrchestratorError::NoEnginesAvailable);
            }
            let mut result = CheckResult::empty(text, language);
            result.metadata.processing_time_ms = started.elapsed().as_millis() as u64;
            self.complete(&result, 0, started);
            return Ok(result);
        }

        let dispatcher = Dispatcher {
            semaphore: Arc::clone(&snapshot.semaphore),
            max_concurrency: config.concurrency,
            breaker: Arc::clone(&self.breaker),
            policy: config.retry,
            request_timeout: config.request_timeout(options),
        };
        let outcome = dispatcher.dispatch(text, selection.calls).await;

        if !outcome.failed.is_empty() {
            match config.fallback_strategy {
                FallbackStrategy::Fail if outcome.succeeded.is_empty() => {
                    return Err(OrchestratorError::AllEnginesFailed {
                        failures: outcome.failed,
                    });
                }
                FallbackStrategy::Degrade => {
                    let mut stats = self.stats.lock();
                    for error in &outcome.failed {
                        stats.record_degradation(error.to_string());
                    }
                }
                _ => {}
            }
        }

        let mut result = CheckResult::empty(text, language);
        result.issues = snapshot.consolidator.consolidate(text, &outcome.succeeded);
        result.metadata.engines_used = outcome.succeeded.iter().map(|r| r.engine_id.clone()).collect();
        result.metadata.processing_time_ms = started.elapsed().as_millis() as u64;

        if outcome.failed.is_empty() && selection.breaker_excluded == 0 {
            if let Some(key) = fingerprint {
                // A reload or engine (un)registration since this request
                // started makes its result stale.
                let active = self.active.read();
                if Arc::ptr_eq(&*active, &snapshot)
                    && self.registry_generation.load(Ordering::SeqCst) == generation
                {
                    self.cache.set(key, result.clone());
                }
            }
        }
        self.complete(&result, outcome.failed.len(), started);
        Ok(result)
    }

    fn complete(&self, result: &CheckResult, engines_failed: usize, started: Instant) {
        let duration = started.elapsed();
        self.stats.lock().record(duration);
        RequestCompleted {
            engines_used: result.metadata.engines_used.len(),
            engines_failed,
            issue_count: result.issues.len(),
            cache_hit: result.metadata.cache_hit,
            duration,
        }
        .log();
    }

    /// Requested engines (or every registered engine) that are ready, enabled,
    /// not behind an open circuit, and not online when speed is preferred.
    fn select_candidates(&self, snapshot: &ActiveConfig, options: &CheckOptions) -> Selection {
        let config = &snapshot.config;
        let registry = self.registry.read();
        let requested: Vec<String> = match &options.engines {
            Some(ids) => ids.clone(),
            None => registry.ids().to_vec(),
        };

        let mut selection = Selection::default();
        for engine_id in &requested {
            if selection.calls.iter().any(|c| &c.engine_id == engine_id) {
                continue;
            }
            let reason = match registry.get(engine_id) {
                None => Some("not registered"),
                Some(slot) if slot.state != EngineState::Ready => Some("not ready"),
                Some(_) if !config.is_engine_enabled(engine_id) => Some("disabled by configuration"),
                Some(_) if self.breaker.is_disabled(engine_id) => {
                    selection.breaker_excluded += 1;
                    Some("circuit open")
                }
                Some(slot)
                    if options.priority == Priority::Speed
                        && slot.engine.descriptor().mode == EngineMode::Online =>
                {
                    Some("online engine skipped for speed")
                }
                Some(slot) => {
                    selection.calls.push(EngineCall {
                        engine_id: engine_id.clone(),
                        engine: Arc::clone(&slot.engine),
                        options: config.engine_options(engine_id, options),
                        timeout: config.engine_timeout(engine_id),
                        max_retries: config.engine_max_retries(engine_id),
                    });
                    None
                }
            };
            if let Some(reason) = reason {
                EngineExcluded { engine_id, reason }.log();
            }
        }
        selection
    }

    /// Validate and atomically activate `config`.
    ///
    /// Requests already running keep the snapshot they started with and do not
    /// cache their results. The breaker takes the new thresholds, the cache is
    /// cleared and resized, and engines still waiting for initialization get
    /// another attempt.
    pub async fn configure(&self, config: OrchestratorConfig) -> Result<(), OrchestratorError> {
        validated(&config)?;
        let _guard = self.lifecycle.lock().await;

        let next = Arc::new(ActiveConfig::new(config));
        *self.active.write() = Arc::clone(&next);
        self.breaker.update_config(next.config.circuit_breaker);
        self.cache.clear();
        self.cache
            .reconfigure(next.config.cache.max_entries, next.config.cache.ttl());
        self.stats.lock().clear_degradations();

        ConfigurationReloaded {
            enabled_engines: next.config.engines.values().filter(|s| s.enabled).count(),
            concurrency: next.config.concurrency,
        }
        .log();

        if self.is_initialized() {
            let pending: Vec<String> = {
                let registry = self.registry.read();
                registry
                    .initialization_order(&next.config.init_sequence)
                    .into_iter()
                    .filter(|id| {
                        registry
                            .get(id)
                            .is_some_and(|slot| slot.state == EngineState::Registered)
                    })
                    .collect()
            };
            for engine_id in pending {
                let _ = self.initialize_engine(&engine_id, &next.config).await;
            }
        }
        Ok(())
    }

    /// Registered engines in registration order.
    pub fn engines(&self) -> Vec<EngineInfo> {
        let snapshot = self.snapshot();
        let registry = self.registry.read();
        registry
            .ids()
            .iter()
            .filter_map(|engine_id| {
                let slot = registry.get(engine_id)?;
                let state = match slot.state {
                    EngineState::Ready if self.breaker.is_disabled(engine_id) => EngineState::Disabled,
                    state => state,
                };
                Some(EngineInfo::new(
                    slot.engine.descriptor(),
                    state,
                    snapshot.config.is_engine_enabled(engine_id),
                    self.breaker.failure_count(engine_id),
                    slot.engine.status(),
                ))
            })
            .collect()
    }

    pub fn status(&self) -> SystemStatus {
        let initialized = self.is_initialized();
        let engines = self.engines();

        let mut issues = Vec::new();
        if !initialized {
            issues.push("orchestrator is not initialized".to_string());
        }
        for engine_id in self.breaker.open_circuits() {
            issues.push(format!("circuit open for engine '{}'", engine_id));
        }
        {
            let registry = self.registry.read();
            for engine_id in registry.ids() {
                if let Some(error) = registry.get(engine_id).and_then(|s| s.init_error.as_ref()) {
                    issues.push(format!("engine '{}' failed to initialize: {}", engine_id, error));
                }
            }
        }

        let stats = self.stats.lock();
        issues.extend(stats.degradations().cloned());

        SystemStatus {
            initialized,
            engines,
            performance: PerformanceStats {
                average_processing_time_ms: stats.average_ms(),
                cache_hit_rate: self.cache.stats().efficiency,
                total_processed: stats.total_processed(),
            },
            health: HealthReport {
                healthy: issues.is_empty(),
                issues,
            },
        }
    }

    /// Shut down every engine. Engines end in `Shutdown` and are never
    /// dispatched again; the orchestrator reports itself uninitialized.
    pub async fn shutdown(&self) {
        let _guard = self.lifecycle.lock().await;
        let engines: Vec<(String, Arc<dyn AnalysisEngine>)> = {
            let registry = self.registry.read();
            registry
                .ids()
                .iter()
                .filter_map(|id| registry.get(id).map(|slot| (id.clone(), Arc::clone(&slot.engine))))
                .collect()
        };

        for (engine_id, engine) in engines {
            if let Err(error) = engine.shutdown().await {
                EngineShutdownFailed {
                    engine_id: &engine_id,
                    error: &error,
                }
                .log();
            }
            self.registry.write().set_state(&engine_id, EngineState::Shutdown);
        }
        self.initialized.store(false, Ordering::SeqCst);
    }
}
