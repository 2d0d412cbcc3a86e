//! Deterministic generation backend for tests.
//!
//! ## Usage
//!
//! ```rust
//! use mitra_inference::mock::MockGenerationBackend;
//! use mitra_core::GenerationBackend;
//!
//! # async fn demo() {
//! let backend = MockGenerationBackend::new()
//!     .with_fixed_response("A quiet, tender drama.")
//!     .with_response_containing("Alien", "Space horror done right.");
//!
//! let text = backend.generate("Title: Alien").await.unwrap();
//! assert_eq!(text, "Space horror done right.");
//! assert_eq!(backend.generate_call_count(), 1);
//! # }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use mitra_core::{Error, GenerationBackend, InferenceBackend, Result};

/// Mock generation backend.
///
/// Clones share the call log, so a test can hand one clone to the code under
/// test and assert on another.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
    failures_left: Arc<AtomicUsize>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model: String,
    default_response: String,
    mapped_responses: Vec<(String, String)>,
    latency: Duration,
    always_fail: bool,
    healthy: bool,
}

/// One recorded `generate` call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
    pub timestamp: Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model: "mock-gen".to_string(),
            default_response: "Mock response".to_string(),
            mapped_responses: Vec::new(),
            latency: Duration::ZERO,
            always_fail: false,
            healthy: true,
        }
    }
}

impl MockGenerationBackend {
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
            failures_left: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Response returned when no mapping matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Return `output` for any prompt containing `needle`.
    ///
    /// Mappings are checked in insertion order.
    pub fn with_response_containing(
        mut self,
        needle: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mapped_responses
            .push((needle.into(), output.into()));
        self
    }

    /// Delay every call by `latency` (honours paused tokio time).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = latency;
        self
    }

    /// Fail every call with `Error::Generation`.
    pub fn with_failure(mut self) -> Self {
        Arc::make_mut(&mut self.config).always_fail = true;
        Arc::make_mut(&mut self.config).healthy = false;
        self
    }

    /// Fail the next `count` calls, then succeed.
    pub fn failing_first(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model = model.into();
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.log().clone()
    }

    pub fn generate_call_count(&self) -> usize {
        self.log().len()
    }

    pub fn clear_calls(&self) {
        self.log().clear()
    }

    fn log(&self) -> MutexGuard<'_, Vec<MockCall>> {
        self.call_log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn should_fail(&self) -> bool {
        if self.config.always_fail {
            return true;
        }
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn response_for(&self, prompt: &str) -> String {
        self.config
            .mapped_responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| self.config.default_response.clone())
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.log().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            timestamp: Instant::now(),
        });

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if self.should_fail() {
            return Err(Error::Generation(
                "Simulated failure for testing".to_string(),
            ));
        }
        Ok(self.response_for(prompt))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl InferenceBackend for MockGenerationBackend {
    async fn health_check(&self) -> Result<bool> {
        Ok(self.config.healthy)
    }
}
