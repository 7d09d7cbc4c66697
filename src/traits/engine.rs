// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The engine plug-in contract.
//!
//! [`AnalysisEngine`] is what the orchestrator talks to. Most engines don't
//! implement it directly: they implement the smaller [`EngineHooks`] trait and
//! are wrapped in [`ManagedEngine`](crate::backends::base::ManagedEngine), which
//! supplies lifecycle tracking, the per-call deadline and status bookkeeping.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::AnalysisError;
use crate::model::{EngineDescriptor, EngineOptions, EngineOutput, EngineStatus};

#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    fn descriptor(&self) -> &EngineDescriptor;

    /// Idempotent. May fail.
    async fn initialize(&self) -> Result<(), AnalysisError>;

    /// Analyze `text`. Fails with an initialization error before a successful
    /// `initialize`. Implementations must stop promptly once `cancel` fires.
    async fn process(
        &self,
        text: &str,
        options: &EngineOptions,
        cancel: CancellationToken,
    ) -> Result<EngineOutput, AnalysisError>;

    /// Idempotent. Releases resources.
    async fn shutdown(&self) -> Result<(), AnalysisError>;

    fn status(&self) -> EngineStatus;

    fn id(&self) -> &str {
        &self.descriptor().id
    }
}

/// Engine-specific behavior plugged into `ManagedEngine`.
#[async_trait]
pub trait EngineHooks: Send + Sync {
    fn descriptor(&self) -> &EngineDescriptor;

    async fn initialize_internal(&self) -> Result<(), AnalysisError> {
        Ok(())
    }

    /// Never called with empty or whitespace-only text.
    async fn process_internal(
        &self,
        text: &str,
        options: &EngineOptions,
        cancel: &CancellationToken,
    ) -> Result<EngineOutput, AnalysisError>;

    async fn shutdown_internal(&self) -> Result<(), AnalysisError> {
        Ok(())
    }
}
