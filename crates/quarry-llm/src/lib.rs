//! Quarry LLM Provider Layer
//!
//! Pluggable LLM provider implementations behind a single async trait.
//!
//! # Architecture
//!
//! Both AI consumers in Quarry (the quick query-understanding call and the
//! position verifier) talk to an [`LlmProvider`]. Callers own timeouts and
//! fallback decisions; providers only report what happened.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: `generateContent` REST integration
//!
//! # Examples
//!
//! ```
//! use quarry_llm::{GenerationOptions, LlmProvider, MockProvider};
//!
//! # async fn example() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt", &GenerationOptions::default()).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod json;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use json::{extract_json_object, parse_json_object};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key or endpoint configured
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Sampling controls passed with every generation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,

    /// Sampling temperature; lower is more deterministic
    pub temperature: f32,
}

impl GenerationOptions {
    /// Create options with a token cap and temperature
    pub fn new(max_output_tokens: u32, temperature: f32) -> Self {
        Self {
            max_output_tokens,
            temperature,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::new(1024, 0.2)
    }
}

/// Trait for LLM provider operations
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Whether the provider is configured well enough to attempt a call
    fn is_available(&self) -> bool {
        true
    }

    /// Generate a text completion for a prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError>;
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Responses are selected by substring match against the prompt, falling back to
/// the default response.
///
/// # Examples
///
/// ```
/// use quarry_llm::{GenerationOptions, LlmProvider, MockProvider};
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("bubble", r#"{"intent": "skepticism"}"#);
/// let out = provider.generate("is ai a bubble", &GenerationOptions::default()).await.unwrap();
/// assert!(out.contains("skepticism"));
/// assert_eq!(provider.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    errors: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
    last_options: Arc<Mutex<Option<GenerationOptions>>>,
    last_prompt: Arc<Mutex<Option<String>>>,
    delay: Option<Duration>,
    available: bool,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            errors: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            last_options: Arc::new(Mutex::new(None)),
            last_prompt: Arc::new(Mutex::new(None)),
            delay: None,
            available: true,
        }
    }

    /// A provider that reports itself as not configured
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Delay every response, for exercising caller timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a response for prompts containing `pattern`
    pub fn add_response(&mut self, pattern: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(pattern.into(), response.into());
    }

    /// Configure to return an error for prompts containing `pattern`
    pub fn add_error(&mut self, pattern: impl Into<String>) {
        lock(&self.errors).push(pattern.into());
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Options passed with the most recent call
    pub fn last_options(&self) -> Option<GenerationOptions> {
        *lock(&self.last_options)
    }

    /// Prompt passed with the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.last_prompt).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_options) = Some(*options);
        *lock(&self.last_prompt) = Some(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if lock(&self.errors).iter().any(|p| prompt.contains(p.as_str())) {
            return Err(LlmError::Other("Mock error".to_string()));
        }

        let responses = lock(&self.responses);
        if let Some((_, response)) = responses.iter().find(|(p, _)| prompt.contains(p.as_str())) {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}

// A poisoned mock lock only means another test thread panicked; keep the data.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
