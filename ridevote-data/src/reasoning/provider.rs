//! HTTP-based [`ItineraryOptimiser`] backed by a Gemini-style model.
//!
//! # Architecture
//!
//! [`ItineraryOptimiser`] is synchronous so the planner stays usable from
//! plain threads. This optimiser bridges the async HTTP call to that
//! interface by blocking on a Tokio runtime it owns.
//!
//! The API key is sent in the `x-goog-api-key` header, never in the URL, so
//! error messages and logs can carry the endpoint safely.
//!
//! # Example
//!
//! ```no_run
//! use ridevote_core::{Catalog, ItineraryPlanner};
//! use ridevote_data::reasoning::{HttpItineraryOptimiser, HttpItineraryOptimiserConfig};
//!
//! let config = HttpItineraryOptimiserConfig::new("secret-key");
//! let planner = ItineraryPlanner::new(HttpItineraryOptimiser::with_config(config)?);
//! let path = planner.plan(Catalog::builtin().as_slice());
//! println!("{} stops", path.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use ridevote_core::{AttractionId, ItineraryOptimiser, ItineraryRequest, OptimiseError};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::gemini::{GenerateContentRequest, GenerateContentResponse, PathAnswer};

/// Error type for [`HttpItineraryOptimiser`] construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for reasoning requests.
pub const DEFAULT_USER_AGENT: &str = "ridevote/0.1";

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for [`HttpItineraryOptimiser`].
#[derive(Clone)]
pub struct HttpItineraryOptimiserConfig {
    /// Service root, e.g. `"https://generativelanguage.googleapis.com"`.
    pub base_url: String,
    /// Model to call.
    pub model: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for HttpItineraryOptimiserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpItineraryOptimiserConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpItineraryOptimiserConfig {
    /// Create a configuration for the default service and model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point at a different service root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a different model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Reasoning-service client that asks a language model for a walking order.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the optimiser blocks on its own
/// `current_thread` runtime. Inside a multi-threaded runtime it uses that
/// runtime's handle with [`tokio::task::block_in_place`]. Inside a
/// `current_thread` runtime it falls back to its own runtime, which can
/// deadlock if the caller's runtime drives IO this request depends on.
pub struct HttpItineraryOptimiser {
    client: Client,
    config: HttpItineraryOptimiserConfig,
    runtime: Runtime,
}

impl fmt::Debug for HttpItineraryOptimiser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpItineraryOptimiser")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpItineraryOptimiser {
    /// Create an optimiser for the default service with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpItineraryOptimiserConfig::new(api_key))
    }

    /// Create an optimiser with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpItineraryOptimiserConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpItineraryOptimiserConfig {
        &self.config
    }

    /// `{base_url}/v1beta/models/{model}:generateContent`.
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn optimise_async(
        &self,
        request: &ItineraryRequest,
    ) -> Result<Vec<AttractionId>, OptimiseError> {
        let url = self.endpoint();
        let body = GenerateContentRequest::path_request(request.prompt());
        log::debug!("requesting walking order for {} stops from {url}", request.len());

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let payload: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|err| OptimiseError::MalformedResponse {
                    message: err.to_string(),
                })?;

        convert_response(&payload)
    }

    /// Convert a reqwest error to an [`OptimiseError`].
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> OptimiseError {
        if error.is_timeout() {
            return OptimiseError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return OptimiseError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        OptimiseError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Extract the id list from a model response.
fn convert_response(
    response: &GenerateContentResponse,
) -> Result<Vec<AttractionId>, OptimiseError> {
    if let Some(reason) = response.block_reason() {
        return Err(OptimiseError::Service {
            message: format!("prompt blocked: {reason}"),
        });
    }
    let text = response.text().ok_or(OptimiseError::EmptyResponse)?;
    let answer: PathAnswer =
        serde_json::from_str(&text).map_err(|err| OptimiseError::MalformedResponse {
            message: err.to_string(),
        })?;
    answer
        .path
        .into_iter()
        .map(|raw| {
            AttractionId::new(raw).map_err(|err| OptimiseError::MalformedResponse {
                message: err.to_string(),
            })
        })
        .collect()
}

impl ItineraryOptimiser for HttpItineraryOptimiser {
    /// Ask the model for a walking order.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded. A `current_thread` caller runtime falls back to the
    /// optimiser's own runtime.
    fn optimise(&self, request: &ItineraryRequest) -> Result<Vec<AttractionId>, OptimiseError> {
        if request.is_empty() {
            return Err(OptimiseError::EmptyInput);
        }

        let future = self.optimise_async(request);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
