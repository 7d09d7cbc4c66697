// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::VecDeque;
use std::time::Duration;

const MAX_HEALTH_ISSUES: usize = 32;

/// Aggregate processing statistics, updated once per completed request.
#[derive(Debug, Default)]
pub(crate) struct ProcessingStats {
    total_processed: u64,
    total_time: Duration,
    /// Failures seen under the `degrade` strategy, newest last.
    degraded: VecDeque<String>,
}

impl ProcessingStats {
    pub fn record(&mut self, elapsed: Duration) {
        self.total_processed += 1;
        self.total_time += elapsed;
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn average_ms(&self) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            self.total_time.as_secs_f64() * 1000.0 / self.total_processed as f64
        }
    }

    pub fn record_degradation(&mut self, issue: String) {
        if self.degraded.len() == MAX_HEALTH_ISSUES {
            self.degraded.pop_front();
        }
        self.degraded.push_back(issue);
    }

    pub fn degradations(&self) -> impl Iterator<Item = &String> {
        self.degraded.iter()
    }

    pub fn clear_degradations(&mut self) {
        self.degraded.clear();
    }
}
