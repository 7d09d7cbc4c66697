// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::LocalEngineFactory;
use crate::config::OrchestratorConfig;
use crate::errors::{ConfigError, OrchestratorError};
use crate::orchestrator::Orchestrator;

/// Orchestrator runtime builder - creates an orchestrator and its local engines from configuration.
///
/// Every `engines` entry that names an `implementation` gets a local engine
/// registered under the entry's id, with the entry's timeout as the engine's
/// default deadline. Entries without an implementation only carry settings
/// for engines the host registers itself.
///
/// # Examples
///
/// ## Building runtime from configuration
/// ```
/// use the_proofreader::config::{EngineSettings, OrchestratorConfig, RuntimeBuilder};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut config = OrchestratorConfig::default();
/// config.engines.insert(
///     "spelling".to_string(),
///     EngineSettings {
///         implementation: Some("spelling".to_string()),
///         ..EngineSettings::default()
///     },
/// );
///
/// let orchestrator = RuntimeBuilder::from_config(&config).await.unwrap();
///
/// // Engines are registered; initialization is left to the caller
/// assert_eq!(orchestrator.engines().len(), 1);
/// assert!(!orchestrator.is_initialized());
/// # }
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build an orchestrator with every configured local engine registered.
    ///
    /// Engines are registered in configuration key order; `init_sequence`
    /// decides initialization order.
    pub async fn from_config(cfg: &OrchestratorConfig) -> Result<Orchestrator, OrchestratorError> {
        let orchestrator = Orchestrator::new(cfg.clone())?;

        for (engine_id, settings) in &cfg.engines {
            let Some(implementation) = &settings.implementation else {
                continue;
            };
            let engine = LocalEngineFactory::create_engine(engine_id, implementation, cfg.engine_timeout(engine_id))
                .map_err(|e| ConfigError::Validation(vec![e]))?;
            orchestrator.register_engine(engine).await?;
        }

        Ok(orchestrator)
    }
}
