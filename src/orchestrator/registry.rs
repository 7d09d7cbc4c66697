// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::EngineState;
use crate::traits::AnalysisEngine;

/// A registered engine and the orchestrator's view of its lifecycle.
pub(crate) struct EngineSlot {
    pub engine: Arc<dyn AnalysisEngine>,
    pub state: EngineState,
    /// Message of the most recent failed initialization, cleared on success.
    pub init_error: Option<String>,
}

/// Engines keyed by id, remembering registration order.
#[derive(Default)]
pub(crate) struct EngineRegistry {
    order: Vec<String>,
    slots: HashMap<String, EngineSlot>,
}

impl EngineRegistry {
    /// Returns `false` without touching the registry if the id is taken.
    pub fn insert(&mut self, engine: Arc<dyn AnalysisEngine>) -> bool {
        let engine_id = engine.id().to_string();
        if self.slots.contains_key(&engine_id) {
            return false;
        }
        self.order.push(engine_id.clone());
        self.slots.insert(
            engine_id,
            EngineSlot {
                engine,
                state: EngineState::Registered,
                init_error: None,
            },
        );
        true
    }

    pub fn remove(&mut self, engine_id: &str) -> Option<EngineSlot> {
        let slot = self.slots.remove(engine_id)?;
        self.order.retain(|id| id != engine_id);
        Some(slot)
    }

    pub fn get(&self, engine_id: &str) -> Option<&EngineSlot> {
        self.slots.get(engine_id)
    }

    pub fn get_mut(&mut self, engine_id: &str) -> Option<&mut EngineSlot> {
        self.slots.get_mut(engine_id)
    }

    /// Ids in registration order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn set_state(&mut self, engine_id: &str, state: EngineState) {
        if let Some(slot) = self.slots.get_mut(engine_id) {
            slot.state = state;
        }
    }

    /// Registered ids named by `sequence` (in that order), followed by every
    /// other registered id in registration order.
    pub fn initialization_order(&self, sequence: &[String]) -> Vec<String> {
        let mut ordered: Vec<String> = Vec::with_capacity(self.order.len());
        for engine_id in sequence {
            if self.slots.contains_key(engine_id) && !ordered.contains(engine_id) {
                ordered.push(engine_id.clone());
            }
        }
        for engine_id in &self.order {
            if !ordered.contains(engine_id) {
                ordered.push(engine_id.clone());
            }
        }
        ordered
    }
}
