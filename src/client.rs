//! Main ScrapeGraph client implementation.

use crate::config::{BoxError, MockConfig, MockResponse};
use crate::error::{Error, Result};
use crate::mock;
use crate::types::*;
use crate::validate;
use crate::version::build_user_agent;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.scrapegraphai.com/v1";
const API_KEY_HEADER: HeaderName = HeaderName::from_static("sgai-apikey");

/// Builder for constructing a [`Client`].
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    user_agent_suffix: Option<String>,
    mock: Option<MockConfig>,
}

impl ClientBuilder {
    /// Create a new client builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent_suffix: None,
            mock: None,
        }
    }

    /// Set the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a request timeout. No timeout is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom User-Agent suffix.
    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Turn mock mode on or off, overriding `SGAI_MOCK`.
    pub fn mock(mut self, enabled: bool) -> Self {
        self.mock.get_or_insert_with(MockConfig::default).enabled = enabled;
        self
    }

    /// Register a mock response for a URL path such as `/v1/credits`.
    pub fn mock_response(
        mut self,
        path: impl Into<String>,
        response: impl Into<MockResponse>,
    ) -> Self {
        self.mock
            .get_or_insert_with(MockConfig::default)
            .custom_responses
            .insert(path.into(), response.into());
        self
    }

    /// Install a custom mock handler.
    pub fn mock_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Method, &str) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.mock
            .get_or_insert_with(MockConfig::default)
            .custom_handler = Some(Arc::new(handler));
        self
    }

    /// Replace the whole mock configuration.
    pub fn mock_config(mut self, config: MockConfig) -> Self {
        self.mock = Some(config);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::invalid("API key is required"));
        }

        // Warn about insecure connections
        if !self.base_url.starts_with("https://") {
            warn!(
                base_url = %self.base_url,
                "API base URL is not using HTTPS. This is insecure."
            );
        }

        let mut api_key = HeaderValue::from_str(api_key)
            .map_err(|_| Error::invalid("API key contains characters not allowed in a header"))?;
        api_key.set_sensitive(true);
        let user_agent = build_user_agent(self.user_agent_suffix.as_deref());
        let user_agent = HeaderValue::from_str(&user_agent)
            .map_err(|_| Error::invalid("User-Agent suffix contains invalid characters"))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(USER_AGENT, user_agent);

        let mut http = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http_client = http.build().map_err(Error::from_transport)?;

        Ok(Client {
            base_url: self.base_url,
            http_client,
            mock: Arc::new(RwLock::new(self.mock.unwrap_or_default())),
            mock_override: None,
        })
    }
}

/// The ScrapeGraph SDK client.
///
/// Cloning is cheap; clones share the connection pool and the mock
/// configuration.
///
/// # Example
///
/// ```rust,no_run
/// use scrapegraph::{Client, SmartScraperRequest};
///
/// #[tokio::main]
/// async fn main() -> Result<(), scrapegraph::Error> {
///     let client = Client::builder("your-api-key").build()?;
///
///     let result = client
///         .smartscraper(SmartScraperRequest::url(
///             "https://example.com",
///             "Extract the page title",
///         ))
///         .await?;
///
///     println!("{}", result["result"]);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    base_url: String,
    http_client: reqwest::Client,
    mock: Arc<RwLock<MockConfig>>,
    mock_override: Option<bool>,
}

impl Client {
    /// Create a new client builder.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    // === Mock mode ===

    /// Handle whose calls are mocked (or not) regardless of the shared
    /// configuration. The shared configuration is left untouched.
    pub fn with_mock(&self, enabled: bool) -> Client {
        Client {
            mock_override: Some(enabled),
            ..self.clone()
        }
    }

    /// Turn mock mode on for this client and its clones.
    pub fn enable_mock(&self) {
        self.mock_write(|config| config.enabled = true);
    }

    /// Turn mock mode off for this client and its clones.
    pub fn disable_mock(&self) {
        self.mock_write(|config| config.enabled = false);
    }

    /// Replace the mock configuration.
    pub fn initialize_mock(&self, config: MockConfig) {
        self.mock_write(|current| *current = config);
    }

    /// Snapshot of the mock configuration.
    pub fn mock_config(&self) -> MockConfig {
        self.mock
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether calls without a per-call override are mocked.
    pub fn is_mock_enabled(&self) -> bool {
        self.mock_override.unwrap_or_else(|| {
            self.mock
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .enabled
        })
    }

    fn mock_write(&self, f: impl FnOnce(&mut MockConfig)) {
        let mut guard = self.mock.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    // === Smart scraper ===

    /// Extract structured data from a page, raw HTML or raw Markdown.
    pub async fn smartscraper(&self, request: SmartScraperRequest) -> Result<Value> {
        request.validate()?;
        self.post(&["smartscraper"], &request, request.mock).await
    }

    /// Get the result of a smart scraper request.
    pub async fn get_smartscraper(&self, request_id: &str) -> Result<Value> {
        self.get_by_id("smartscraper", request_id).await
    }

    // === Search scraper ===

    /// Search the web and extract an answer.
    pub async fn searchscraper(&self, request: SearchScraperRequest) -> Result<Value> {
        request.validate()?;
        self.post(&["searchscraper"], &request, request.mock).await
    }

    /// Get the result of a search scraper request.
    pub async fn get_searchscraper(&self, request_id: &str) -> Result<Value> {
        self.get_by_id("searchscraper", request_id).await
    }

    // === Conversion ===

    /// Convert a page to Markdown.
    pub async fn markdownify(&self, request: MarkdownifyRequest) -> Result<Value> {
        request.validate()?;
        self.post(&["markdownify"], &request, request.mock).await
    }

    /// Get the result of a markdownify request.
    pub async fn get_markdownify(&self, request_id: &str) -> Result<Value> {
        self.get_by_id("markdownify", request_id).await
    }

    /// Fetch the rendered HTML of a page.
    pub async fn scrape(&self, request: ScrapeRequest) -> Result<Value> {
        request.validate()?;
        self.post(&["scrape"], &request, request.mock).await
    }

    /// Get the result of a scrape request.
    pub async fn get_scrape(&self, request_id: &str) -> Result<Value> {
        self.get_by_id("scrape", request_id).await
    }

    // === Crawl ===

    /// Start a crawl job.
    pub async fn crawl(&self, request: CrawlRequest) -> Result<Value> {
        request.validate()?;
        let body = request.payload()?;
        self.post(&["crawl"], &body, request.mock).await
    }

    /// Get the status and result of a crawl job.
    pub async fn get_crawl(&self, crawl_id: &str) -> Result<Value> {
        self.get_by_id("crawl", crawl_id).await
    }

    /// List the crawl sessions of the account.
    pub async fn list_crawl_sessions(&self) -> Result<Value> {
        self.get(&["smartcrawler", "sessions", "all"], None).await
    }

    // === Agentic scraper ===

    /// Drive a browser through `steps`, optionally extracting data at the end.
    pub async fn agentic_scraper(&self, request: AgenticScraperRequest) -> Result<Value> {
        request.validate()?;
        self.post(&["agentic-scrapper"], &request, request.mock).await
    }

    /// Get the result of an agentic scraper request.
    pub async fn get_agentic_scraper(&self, request_id: &str) -> Result<Value> {
        self.get_by_id("agentic-scrapper", request_id).await
    }

    // === Schema generation ===

    /// Generate a JSON Schema from a description.
    pub async fn generate_schema(&self, request: GenerateSchemaRequest) -> Result<Value> {
        request.validate()?;
        self.post(&["generate_schema"], &request, request.mock).await
    }

    /// Get the result of a schema generation request.
    pub async fn get_schema_status(&self, request_id: &str) -> Result<Value> {
        self.get_by_id("generate_schema", request_id).await
    }

    // === Account ===

    /// Get remaining and used credits.
    pub async fn get_credits(&self) -> Result<Value> {
        self.get(&["credits"], None).await
    }

    /// Check that the API key is accepted.
    pub async fn validate_api_key(&self) -> Result<Value> {
        self.get(&["validate"], None).await
    }

    /// Check that the API is up.
    pub async fn health_check(&self) -> Result<Value> {
        self.get(&["healthz"], None).await
    }

    /// Rate a finished request.
    pub async fn submit_feedback(&self, request: FeedbackRequest) -> Result<Value> {
        request.validate()?;
        self.post(&["feedback"], &request, request.mock).await
    }

    // === Scheduled jobs ===

    /// Create a scheduled job.
    pub async fn create_scheduled_job(&self, request: ScheduledJobRequest) -> Result<Value> {
        request.validate()?;
        self.post(&["scheduled-jobs"], &request, request.mock).await
    }

    /// List scheduled jobs.
    pub async fn list_scheduled_jobs(&self, filter: ListScheduledJobs) -> Result<Value> {
        filter.validate()?;
        let mut url = self.endpoint(&["scheduled-jobs"])?;
        append_query(&mut url, filter.query_pairs());
        self.request(Method::GET, url, None::<&()>, filter.mock)
            .await
    }

    /// Get a scheduled job.
    pub async fn get_scheduled_job(&self, job_id: &str) -> Result<Value> {
        let url = self.job_url(job_id, None)?;
        self.request(Method::GET, url, None::<&()>, None).await
    }

    /// Update some fields of a scheduled job.
    pub async fn update_scheduled_job(
        &self,
        job_id: &str,
        request: ScheduledJobUpdate,
    ) -> Result<Value> {
        let url = self.job_url(job_id, None)?;
        request.validate()?;
        self.request(Method::PATCH, url, Some(&request), request.mock)
            .await
    }

    /// Replace the definition of a scheduled job.
    pub async fn replace_scheduled_job(
        &self,
        job_id: &str,
        request: ScheduledJobRequest,
    ) -> Result<Value> {
        let url = self.job_url(job_id, None)?;
        request.validate()?;
        self.request(Method::PUT, url, Some(&request), request.mock)
            .await
    }

    /// Delete a scheduled job.
    pub async fn delete_scheduled_job(&self, job_id: &str) -> Result<Value> {
        let url = self.job_url(job_id, None)?;
        self.request(Method::DELETE, url, None::<&()>, None).await
    }

    /// Pause a scheduled job.
    pub async fn pause_scheduled_job(&self, job_id: &str) -> Result<Value> {
        let url = self.job_url(job_id, Some("pause"))?;
        self.request(Method::POST, url, Some(&json!({})), None)
            .await
    }

    /// Resume a paused scheduled job.
    pub async fn resume_scheduled_job(&self, job_id: &str) -> Result<Value> {
        let url = self.job_url(job_id, Some("resume"))?;
        self.request(Method::POST, url, Some(&json!({})), None)
            .await
    }

    /// Run a scheduled job now.
    pub async fn trigger_scheduled_job(&self, job_id: &str) -> Result<Value> {
        let url = self.job_url(job_id, Some("trigger"))?;
        self.request(Method::POST, url, Some(&json!({})), None)
            .await
    }

    /// List past executions of a scheduled job.
    pub async fn get_job_executions(
        &self,
        job_id: &str,
        filter: ListJobExecutions,
    ) -> Result<Value> {
        let mut url = self.job_url(job_id, Some("executions"))?;
        filter.validate()?;
        append_query(&mut url, filter.query_pairs());
        self.request(Method::GET, url, None::<&()>, filter.mock)
            .await
    }

    // === Internal methods ===

    /// Base URL extended with one escaped path segment per entry.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::invalid(format!("invalid base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::invalid(format!("base URL {} cannot have a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn job_url(&self, job_id: &str, action: Option<&str>) -> Result<Url> {
        validate::path_segment("job_id", job_id)?;
        let id = job_id.trim();
        match action {
            Some(action) => self.endpoint(&["scheduled-jobs", id, action]),
            None => self.endpoint(&["scheduled-jobs", id]),
        }
    }

    async fn get_by_id(&self, resource: &str, id: &str) -> Result<Value> {
        validate::path_segment("request_id", id)?;
        let url = self.endpoint(&[resource, id.trim()])?;
        self.request(Method::GET, url, None::<&()>, None).await
    }

    async fn get(&self, segments: &[&str], mock: Option<bool>) -> Result<Value> {
        let url = self.endpoint(segments)?;
        self.request(Method::GET, url, None::<&()>, mock).await
    }

    async fn post<B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
        mock: Option<bool>,
    ) -> Result<Value> {
        let url = self.endpoint(segments)?;
        self.request(Method::POST, url, Some(body), mock).await
    }

    async fn request<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        mock: Option<bool>,
    ) -> Result<Value> {
        if mock.unwrap_or_else(|| self.is_mock_enabled()) {
            debug!(method = %method, url = %url, "Serving mock response");
            let config = self.mock_config();
            let value = mock::route(&method, url.as_str(), &config);
            tokio::task::yield_now().await;
            return Ok(value);
        }

        debug!(method = %method, url = %url, "Sending request");
        let mut req = self.http_client.request(method, url);
        if let Some(b) = body {
            // Also sets Content-Type: application/json
            req = req.json(b);
        }

        let response = req.send().await.map_err(Error::from_transport)?;

        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }

        let text = response.text().await.map_err(Error::from_transport)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn append_query(url: &mut Url, pairs: Vec<(&'static str, String)>) {
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}
