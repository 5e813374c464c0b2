//! Request types for the ScrapeGraph SDK.
//!
//! Optional fields left as `None` are omitted from the payload so the API
//! applies its own defaults. Boolean switches are always sent.
//!
//! The `mock` field present on every request overrides the client's mock mode
//! for that single call and is never sent to the API.

use crate::error::{Error, Result};
use crate::schema::OutputSchema;
use crate::validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Request for AI-guided extraction from a single page.
///
/// Exactly one of `website_url`, `website_html` or `website_markdown` must be
/// set.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SmartScraperRequest {
    /// URL of the page to scrape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    /// Raw HTML to extract from, at most 2 MiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_html: Option<String>,
    /// Raw Markdown to extract from, at most 2 MiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_markdown: Option<String>,
    /// What to extract.
    pub user_prompt: String,
    /// Shape of the extracted data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
    /// Infinite scroll passes, 0 to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_scrolls: Option<u32>,
    /// Pages to follow through pagination, 1 to 10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    /// Cookies sent with the page request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<HashMap<String, String>>,
    /// Headers sent with the page request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Render JavaScript-heavy pages in a browser.
    pub render_heavy_js: bool,
    /// Reduce bot-detection likelihood.
    pub stealth: bool,
    /// Return plain text instead of JSON.
    pub plain_text: bool,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl SmartScraperRequest {
    /// Extract from a URL.
    pub fn url(url: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            website_url: Some(url.into()),
            user_prompt: user_prompt.into(),
            ..Default::default()
        }
    }

    /// Extract from raw HTML.
    pub fn html(html: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            website_html: Some(html.into()),
            user_prompt: user_prompt.into(),
            ..Default::default()
        }
    }

    /// Extract from raw Markdown.
    pub fn markdown(markdown: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            website_markdown: Some(markdown.into()),
            user_prompt: user_prompt.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate::single_source(
            self.website_url.as_deref(),
            self.website_html.as_deref(),
            self.website_markdown.as_deref(),
        )?;
        validate::non_empty("user_prompt", &self.user_prompt)?;
        if let Some(schema) = &self.output_schema {
            schema.validate("output_schema")?;
        }
        if let Some(n) = self.number_of_scrolls {
            validate::range("number_of_scrolls", n, 0..=100)?;
        }
        if let Some(n) = self.total_pages {
            validate::range("total_pages", n, 1..=10)?;
        }
        Ok(())
    }
}

/// Request for a web search followed by extraction.
#[derive(Debug, Clone, Serialize)]
pub struct SearchScraperRequest {
    /// Search query and extraction instructions.
    pub user_prompt: String,
    /// Number of websites to search, 3 to 20.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u32>,
    /// Shape of the extracted data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
    /// AI extraction when true, plain markdown results when false.
    pub extraction_mode: bool,
    /// Headers sent with page requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Reduce bot-detection likelihood.
    pub stealth: bool,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl Default for SearchScraperRequest {
    fn default() -> Self {
        Self {
            user_prompt: String::new(),
            num_results: None,
            output_schema: None,
            extraction_mode: true,
            headers: None,
            stealth: false,
            mock: None,
        }
    }
}

impl SearchScraperRequest {
    /// Search with the given prompt.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate::non_empty("user_prompt", &self.user_prompt)?;
        if let Some(n) = self.num_results {
            validate::range("num_results", n, 3..=20)?;
        }
        if let Some(schema) = &self.output_schema {
            schema.validate("output_schema")?;
        }
        Ok(())
    }
}

/// Request to convert a page to Markdown.
#[derive(Debug, Clone, Serialize, Default)]
pub struct MarkdownifyRequest {
    /// URL of the page to convert.
    pub website_url: String,
    /// Headers sent with the page request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Render JavaScript-heavy pages in a browser.
    pub render_heavy_js: bool,
    /// Reduce bot-detection likelihood.
    pub stealth: bool,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl MarkdownifyRequest {
    /// Convert the given URL.
    pub fn new(website_url: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate::url("website_url", &self.website_url)
    }
}

/// Request to fetch the rendered HTML of a page.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ScrapeRequest {
    /// URL of the page to fetch.
    pub website_url: String,
    /// Headers sent with the page request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Render JavaScript-heavy pages in a browser.
    pub render_heavy_js: bool,
    /// Also extract branding information.
    pub branding: bool,
    /// Reduce bot-detection likelihood.
    pub stealth: bool,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl ScrapeRequest {
    /// Fetch the given URL.
    pub fn new(website_url: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate::url("website_url", &self.website_url)
    }
}

/// Request for starting a crawl job.
///
/// With `extraction_mode` on, `prompt` is required and every page goes
/// through AI extraction. With it off, pages come back as Markdown and
/// `prompt`/`schema` are not sent.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlRequest {
    /// Seed URL.
    pub url: String,
    /// Extraction instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Shape of the extracted data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<OutputSchema>,
    /// AI extraction when true, markdown conversion when false.
    pub extraction_mode: bool,
    /// Reuse cached pages.
    pub cache_website: bool,
    /// Maximum link depth.
    pub depth: u32,
    /// Maximum pages to crawl.
    pub max_pages: u32,
    /// Only follow links on the seed domain.
    pub same_domain_only: bool,
    /// Pages processed per batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    /// Discover pages through the sitemap.
    pub sitemap: bool,
    /// Render JavaScript-heavy pages in a browser.
    pub render_heavy_js: bool,
    /// Reduce bot-detection likelihood.
    pub stealth: bool,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl Default for CrawlRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            prompt: None,
            schema: None,
            extraction_mode: true,
            cache_website: true,
            depth: 2,
            max_pages: 2,
            same_domain_only: true,
            batch_size: None,
            sitemap: false,
            render_heavy_js: false,
            stealth: false,
            mock: None,
        }
    }
}

impl CrawlRequest {
    /// AI extraction crawl.
    pub fn extract(url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    /// Markdown-only crawl.
    pub fn markdown(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extraction_mode: false,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate::url("url", &self.url)?;
        if self.extraction_mode {
            match &self.prompt {
                Some(p) => validate::non_empty("prompt", p)?,
                None => {
                    return Err(Error::invalid(
                        "prompt is required when extraction_mode is enabled",
                    ))
                }
            }
            if let Some(schema) = &self.schema {
                schema.validate("schema")?;
            }
        }
        validate::at_least("depth", self.depth, 1)?;
        validate::at_least("max_pages", self.max_pages, 1)?;
        if let Some(n) = self.batch_size {
            validate::at_least("batch_size", n, 1)?;
        }
        Ok(())
    }

    pub(crate) fn payload(&self) -> Result<Value> {
        let mut body = serde_json::to_value(self)?;
        if !self.extraction_mode {
            if let Some(obj) = body.as_object_mut() {
                obj.remove("prompt");
                obj.remove("schema");
            }
        }
        Ok(body)
    }
}

/// Request for browser automation followed by optional extraction.
#[derive(Debug, Clone, Serialize)]
pub struct AgenticScraperRequest {
    /// Starting URL.
    pub url: String,
    /// Natural language browser steps, run in order.
    pub steps: Vec<String>,
    /// Keep the browser session between steps.
    pub use_session: bool,
    /// Extraction instructions, required with `ai_extraction`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    /// Shape of the extracted data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
    /// Run AI extraction on the final page.
    pub ai_extraction: bool,
    /// Render JavaScript-heavy pages in a browser.
    pub render_heavy_js: bool,
    /// Reduce bot-detection likelihood.
    pub stealth: bool,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl Default for AgenticScraperRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            steps: Vec::new(),
            use_session: true,
            user_prompt: None,
            output_schema: None,
            ai_extraction: false,
            render_heavy_js: false,
            stealth: false,
            mock: None,
        }
    }
}

impl AgenticScraperRequest {
    /// Run the given steps starting at `url`.
    pub fn new<I, S>(url: impl Into<String>, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            steps: steps.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate::url("url", &self.url)?;
        validate::steps(&self.steps)?;
        if self.ai_extraction {
            match &self.user_prompt {
                Some(p) => validate::non_empty("user_prompt", p)?,
                None => {
                    return Err(Error::invalid(
                        "user_prompt is required when ai_extraction is enabled",
                    ))
                }
            }
            if let Some(schema) = &self.output_schema {
                schema.validate("output_schema")?;
            }
        }
        Ok(())
    }
}

/// Request to generate or refine a JSON Schema from a prompt.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerateSchemaRequest {
    /// Description of the data to model.
    pub user_prompt: String,
    /// Schema to refine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_schema: Option<Value>,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl GenerateSchemaRequest {
    /// Generate a schema from scratch.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate::non_empty("user_prompt", &self.user_prompt)?;
        if let Some(schema) = &self.existing_schema {
            validate::object("existing_schema", schema)?;
        }
        Ok(())
    }
}

/// Feedback about a finished request.
#[derive(Debug, Clone, Serialize, Default)]
pub struct FeedbackRequest {
    /// Request being rated.
    pub request_id: String,
    /// Rating from 0 to 5.
    pub rating: u8,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_text: Option<String>,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl FeedbackRequest {
    /// Rate a request.
    pub fn new(request_id: impl Into<String>, rating: u8) -> Self {
        Self {
            request_id: request_id.into(),
            rating,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate::non_empty("request_id", &self.request_id)?;
        validate::range("rating", self.rating, 0..=5)
    }
}

/// Service a scheduled job runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Single page extraction.
    SmartScraper,
    /// Search and extract.
    SearchScraper,
    /// Markdown conversion.
    Markdownify,
    /// Site crawl.
    SmartCrawler,
    /// Browser automation. The API spells it with a double "p".
    #[serde(rename = "agenticscrapper")]
    AgenticScraper,
}

impl ServiceType {
    /// Wire name of the service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::SmartScraper => "smartscraper",
            ServiceType::SearchScraper => "searchscraper",
            ServiceType::Markdownify => "markdownify",
            ServiceType::SmartCrawler => "smartcrawler",
            ServiceType::AgenticScraper => "agenticscrapper",
        }
    }
}

/// Full definition of a scheduled job.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledJobRequest {
    /// Display name, 1 to 255 characters.
    pub job_name: String,
    /// Service to run.
    pub service_type: ServiceType,
    /// Standard 5-field cron expression.
    pub cron_expression: String,
    /// Request body forwarded to the service on every run.
    pub job_config: Value,
    /// Whether the job is scheduled.
    pub is_active: bool,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl ScheduledJobRequest {
    /// Active job definition.
    pub fn new(
        job_name: impl Into<String>,
        service_type: ServiceType,
        cron_expression: impl Into<String>,
        job_config: Value,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            service_type,
            cron_expression: cron_expression.into(),
            job_config,
            is_active: true,
            mock: None,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_job_name(&self.job_name)?;
        validate::cron(&self.cron_expression)?;
        validate::object("job_config", &self.job_config)
    }
}

/// Partial update of a scheduled job.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ScheduledJobUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    /// New cron expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_expression: Option<String>,
    /// New service configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_config: Option<Value>,
    /// Activate or deactivate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Per-call mock override.
    #[serde(skip)]
    pub mock: Option<bool>,
}

impl ScheduledJobUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(name) = &self.job_name {
            validate_job_name(name)?;
        }
        if let Some(cron) = &self.cron_expression {
            validate::cron(cron)?;
        }
        if let Some(config) = &self.job_config {
            validate::object("job_config", config)?;
        }
        Ok(())
    }
}

fn validate_job_name(name: &str) -> Result<()> {
    validate::non_empty("job_name", name)?;
    validate::range("job_name length", name.chars().count(), 1..=255)
}

/// Filters for listing scheduled jobs.
#[derive(Debug, Clone, Default)]
pub struct ListScheduledJobs {
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Items per page, 1 to 100.
    pub page_size: Option<u32>,
    /// Only jobs running this service.
    pub service_type: Option<ServiceType>,
    /// Only active or inactive jobs.
    pub is_active: Option<bool>,
    /// Per-call mock override.
    pub mock: Option<bool>,
}

impl ListScheduledJobs {
    pub(crate) fn validate(&self) -> Result<()> {
        validate_page(self.page, self.page_size)
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = page_pairs(self.page, self.page_size);
        if let Some(t) = self.service_type {
            pairs.push(("service_type", t.as_str().to_string()));
        }
        if let Some(a) = self.is_active {
            pairs.push(("is_active", a.to_string()));
        }
        pairs
    }
}

/// Filters for listing the executions of a scheduled job.
#[derive(Debug, Clone, Default)]
pub struct ListJobExecutions {
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Items per page, 1 to 100.
    pub page_size: Option<u32>,
    /// Only executions in this status.
    pub status: Option<String>,
    /// Per-call mock override.
    pub mock: Option<bool>,
}

impl ListJobExecutions {
    pub(crate) fn validate(&self) -> Result<()> {
        validate_page(self.page, self.page_size)?;
        if let Some(status) = &self.status {
            validate::non_empty("status", status)?;
        }
        Ok(())
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = page_pairs(self.page, self.page_size);
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        pairs
    }
}

fn validate_page(page: Option<u32>, page_size: Option<u32>) -> Result<()> {
    if let Some(p) = page {
        validate::at_least("page", p, 1)?;
    }
    if let Some(s) = page_size {
        validate::range("page_size", s, 1..=100)?;
    }
    Ok(())
}

fn page_pairs(page: Option<u32>, page_size: Option<u32>) -> Vec<(&'static str, String)> {
    let mut pairs = vec![];
    if let Some(p) = page {
        pairs.push(("page", p.to_string()));
    }
    if let Some(s) = page_size {
        pairs.push(("page_size", s.to_string()));
    }
    pairs
}
