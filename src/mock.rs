//! Canned responses for mock mode.
//!
//! Resolution order, first match wins:
//!
//! 1. the custom handler, unless it fails
//! 2. a custom response registered for the URL path
//! 3. built-in rules keyed on the trailing path segments and the HTTP verb
//! 4. a generic fallback echoing the request

use crate::config::MockConfig;
use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use reqwest::{Method, Url};
use serde_json::{json, Value};
use tracing::warn;

/// Produce the mock response for a request.
pub fn route(method: &Method, url: &str, config: &MockConfig) -> Value {
    if let Some(handler) = &config.custom_handler {
        match handler(method, url) {
            Ok(value) => return value,
            Err(e) => {
                warn!(
                    error = %e,
                    method = %method,
                    url = url,
                    "Custom mock handler failed, falling back to built-in mocks"
                );
            }
        }
    }

    let path = url_path(url);
    if let Some(response) = config.custom_responses.get(&path) {
        return response.resolve();
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    builtin(method, &segments).unwrap_or_else(|| {
        json!({
            "message": "Mock response generated",
            "method": method.as_str(),
            "url": url,
        })
    })
}

/// Generate a mock identifier such as `mock-1718000000000-k3j9x0a2b`.
pub fn mock_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("mock-{}-{}", Utc::now().timestamp_millis(), suffix)
}

fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Not an absolute URL, treat it as a path
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    }
}

const ASYNC_SERVICES: [&str; 7] = [
    "smartscraper",
    "searchscraper",
    "markdownify",
    "scrape",
    "agentic-scrapper",
    "agentic-scraper",
    "generate_schema",
];

fn builtin(method: &Method, segments: &[&str]) -> Option<Value> {
    let is_get = *method == Method::GET;
    let is_post = *method == Method::POST;
    let is_update = *method == Method::PATCH || *method == Method::PUT;
    let is_delete = *method == Method::DELETE;

    match segments {
        [.., "credits"] if is_get => Some(json!({
            "remaining_credits": 1000,
            "total_credits_used": 0,
        })),
        [.., "healthz" | "health"] if is_get => Some(json!({
            "status": "healthy",
            "message": "Service is operational",
        })),
        [.., "feedback"] if is_post => Some(json!({
            "status": "success",
            "feedback_id": mock_id(),
            "message": "Feedback submitted successfully",
        })),

        // Scheduled jobs
        [.., "scheduled-jobs"] if is_get => Some(json!({
            "jobs": [scheduled_job(&mock_id())],
            "total": 1,
            "page": 1,
            "page_size": 20,
        })),
        [.., "scheduled-jobs"] if is_post => Some(scheduled_job(&mock_id())),
        [.., "scheduled-jobs", id, "pause"] if is_post => Some(job_action(id, "paused", false)),
        [.., "scheduled-jobs", id, "resume"] if is_post => Some(job_action(id, "resumed", true)),
        [.., "scheduled-jobs", id, "trigger"] if is_post => Some(json!({
            "execution_id": mock_id(),
            "scheduled_job_id": id,
            "triggered_at": now(),
            "message": "Job triggered successfully",
        })),
        [.., "scheduled-jobs", id, "executions"] if is_get => Some(json!({
            "executions": [{
                "id": mock_id(),
                "scheduled_job_id": id,
                "execution_id": mock_id(),
                "status": "completed",
                "started_at": now(),
                "completed_at": now(),
                "result": {"mock": true},
                "credits_used": 10,
            }],
            "total": 1,
            "page": 1,
            "page_size": 20,
        })),
        [.., "scheduled-jobs", id] if is_get || is_update => Some(scheduled_job(id)),
        [.., "scheduled-jobs", _] if is_delete => Some(json!({
            "message": "Job deleted successfully",
        })),

        // Crawl
        [.., "crawl"] if is_post => Some(json!({
            "crawl_id": mock_id(),
            "status": "processing",
            "message": "Crawl job started",
        })),
        [.., "crawl", id] if is_get => Some(json!({
            "crawl_id": id,
            "status": "completed",
            "result": {
                "llm_result": {"title": "Mock Page", "summary": "Mock crawl result"},
                "pages": [
                    {"url": "https://example.com", "markdown": "# Mock Page\n\nMock content."},
                    {"url": "https://example.com/about", "markdown": "# About\n\nMock about page."},
                ],
                "crawled_urls": ["https://example.com", "https://example.com/about"],
            },
        })),

        [.., "smartcrawler", "sessions", "all"] if is_get => Some(json!({
            "sessions": [{
                "session_id": mock_id(),
                "status": "completed",
                "url": "https://example.com",
                "pages_crawled": 2,
                "created_at": now(),
            }],
            "total": 1,
        })),

        // Single page services
        [.., service] if is_post && ASYNC_SERVICES.contains(service) => {
            Some(service_result(service, &mock_id()))
        }
        [.., service, id] if is_get && ASYNC_SERVICES.contains(service) => {
            Some(service_result(service, id))
        }

        // After the id routes so a resource id spelled "validate" still
        // reaches its own rule
        [.., "validate"] if is_get => Some(json!({
            "status": "valid",
            "email": "mock@example.com",
        })),

        _ => None,
    }
}

fn service_result(service: &str, request_id: &str) -> Value {
    let mut body = json!({
        "request_id": request_id,
        "status": "completed",
        "error": "",
    });
    let extra = match service {
        "smartscraper" => json!({
            "result": {
                "title": "Mock Title",
                "description": "Mock description extracted from the page",
            },
        }),
        "searchscraper" => json!({
            "result": {"answer": "Mock answer to the search query"},
            "reference_urls": ["https://example.com", "https://example.org"],
        }),
        "markdownify" => json!({
            "result": "# Mock Page\n\nThis is mock markdown content.",
        }),
        "scrape" => json!({
            "html": "<html><head><title>Mock Page</title></head><body><p>Mock content</p></body></html>",
        }),
        "generate_schema" => json!({
            "user_prompt": "Mock prompt",
            "refined_prompt": "Mock refined prompt",
            "generated_schema": {
                "type": "object",
                "properties": {"title": {"type": "string"}},
                "required": ["title"],
            },
        }),
        // agentic scraper
        _ => json!({
            "result": {"steps_completed": true, "data": {"mock": true}},
        }),
    };
    if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
        body.extend(extra);
    }
    body
}

fn scheduled_job(id: &str) -> Value {
    json!({
        "id": id,
        "user_id": "mock-user",
        "job_name": "Mock Scheduled Job",
        "service_type": "smartscraper",
        "cron_expression": "0 9 * * 1",
        "job_config": {"mock": "config"},
        "is_active": true,
        "created_at": now(),
        "updated_at": now(),
        "next_run_at": now(),
    })
}

fn job_action(id: &str, verb: &str, is_active: bool) -> Value {
    let next_run_at = is_active.then(now);
    json!({
        "message": format!("Job {} successfully", verb),
        "job_id": id,
        "is_active": is_active,
        "next_run_at": next_run_at,
    })
}

fn now() -> String {
    Utc::now().to_rfc3339()
}
