//! Client behaviour against a local HTTP server.

use scrapegraph::{
    AgenticScraperRequest, Client, CrawlRequest, Error, FeedbackRequest, GenerateSchemaRequest,
    ListJobExecutions, ListScheduledJobs, MarkdownifyRequest, MockConfig, ScheduledJobRequest,
    ScheduledJobUpdate, ScrapeRequest, SearchScraperRequest, ServiceType, SmartScraperRequest,
    NETWORK_ERROR_MESSAGE,
};
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "sgai-test-key";

fn client_for(server: &MockServer) -> Client {
    Client::builder(API_KEY)
        .base_url(server.uri())
        .mock(false)
        .build()
        .unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn smartscraper_sends_headers_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/smartscraper"))
        .and(header("sgai-apikey", API_KEY))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "website_url": "https://example.com",
            "user_prompt": "Describe this page.",
            "number_of_scrolls": 5,
            "render_heavy_js": true,
            "stealth": false,
            "plain_text": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-1",
            "status": "completed",
            "result": {"description": "Example domain."},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = SmartScraperRequest::url("https://example.com", "Describe this page.");
    request.number_of_scrolls = Some(5);
    request.render_heavy_js = true;

    let response = client_for(&server).smartscraper(request).await.unwrap();
    assert_eq!(response["status"], "completed");
    assert_eq!(response["result"]["description"], "Example domain.");
}

#[tokio::test]
async fn status_poll_is_a_plain_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/smartscraper/req-42"))
        .and(header("sgai-apikey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-42",
            "status": "pending",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).get_smartscraper("req-42").await.unwrap();
    assert_eq!(response["request_id"], "req-42");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn empty_request_id_is_rejected_locally() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    assert!(matches!(
        client.get_markdownify("").await,
        Err(Error::Unexpected { .. })
    ));
    assert!(client.get_crawl("   ").await.is_err());
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn not_found_becomes_http_error() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_smartscraper("missing")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Error::Http {
            status: 404,
            title: "Not Found".into(),
            detail: "not found".into(),
        }
    );
}

#[tokio::test]
async fn validation_detail_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/markdownify"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "website_url"], "msg": "invalid url"}],
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .markdownify(MarkdownifyRequest::new("https://example.com"))
        .await
        .unwrap_err();
    match err {
        Error::Http { status, detail, .. } => {
            assert_eq!(status, 422);
            assert_eq!(detail, "body.website_url: invalid url");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_gives_unknown_detail() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_credits().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Http { status: 500, ref detail, .. } if detail == "unknown"
    ));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = Client::builder(API_KEY)
        .base_url(format!("http://127.0.0.1:{}", port))
        .mock(false)
        .build()
        .unwrap();

    let err = client.get_credits().await.unwrap_err();
    assert_eq!(
        err,
        Error::Network {
            message: NETWORK_ERROR_MESSAGE.into()
        }
    );
}

#[tokio::test]
async fn unbuildable_request_is_unexpected_error() {
    let client = Client::builder(API_KEY)
        .base_url("not a valid base url")
        .mock(false)
        .build()
        .unwrap();

    let err = client.health_check().await.unwrap_err();
    assert!(matches!(err, Error::Unexpected { .. }));
}

#[tokio::test]
async fn invalid_input_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);

    for url in ["example.com", "ftp://example.com", ""] {
        let err = client
            .smartscraper(SmartScraperRequest::url(url, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unexpected { .. }), "{url}");
        assert!(client.markdownify(MarkdownifyRequest::new(url)).await.is_err());
        assert!(client.scrape(ScrapeRequest::new(url)).await.is_err());
        assert!(client.crawl(CrawlRequest::extract(url, "x")).await.is_err());
    }

    let oversized = "a".repeat(scrapegraph::MAX_CONTENT_BYTES + 1);
    let mut too_big = SmartScraperRequest::html(oversized, "x");
    assert!(client.smartscraper(too_big.clone()).await.is_err());
    too_big.website_html = Some("a".repeat(scrapegraph::MAX_CONTENT_BYTES));
    too_big.mock = Some(true);
    assert!(client.smartscraper(too_big).await.is_ok());

    assert!(client
        .submit_feedback(FeedbackRequest::new("req-1", 9))
        .await
        .is_err());
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn per_call_mock_override_skips_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut request = SmartScraperRequest::url("https://example.com", "Extract the title");
    request.mock = Some(true);
    let response = client.smartscraper(request).await.unwrap();
    assert!(response["request_id"].as_str().unwrap().starts_with("mock-"));
    assert_eq!(response["status"], "completed");

    let status = client.with_mock(true).get_smartscraper("req-7").await.unwrap();
    assert_eq!(status["request_id"], "req-7");

    // Override did not leak into the shared configuration
    assert!(!client.is_mock_enabled());
}

#[tokio::test]
async fn markdown_crawl_omits_ai_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "crawl-1",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut request = CrawlRequest::markdown("https://example.com");
    request.max_pages = 5;
    request.sitemap = true;
    let response = client.crawl(request.clone()).await.unwrap();
    assert_eq!(response["task_id"], "crawl-1");

    let sent: Value = server.received_requests().await.unwrap()[0]
        .body_json()
        .unwrap();
    assert_eq!(sent["extraction_mode"], false);
    assert_eq!(sent["max_pages"], 5);
    assert_eq!(sent["sitemap"], true);
    assert!(sent.get("prompt").is_none());
    assert!(sent.get("schema").is_none());

    // Same flow answered by the mock router
    let mocked = client.with_mock(true);
    let submitted = mocked.crawl(request).await.unwrap();
    let crawl_id = submitted["crawl_id"].as_str().unwrap().to_string();
    let result = mocked.get_crawl(&crawl_id).await.unwrap();
    assert_eq!(result["crawl_id"], crawl_id.as_str());
    let pages = result["result"]["pages"].as_array().unwrap();
    assert!(!pages.is_empty());
    assert!(pages[0]["markdown"].as_str().unwrap().starts_with('#'));
}

#[tokio::test]
async fn toggling_mock_mode_switches_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "remaining_credits": 42,
            "total_credits_used": 8,
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    client.enable_mock();
    let credits = client.get_credits().await.unwrap();
    assert!(credits.get("remaining_credits").is_some());
    assert!(credits.get("total_credits_used").is_some());
    assert_eq!(request_count(&server).await, 0);

    client.disable_mock();
    let credits = client.get_credits().await.unwrap();
    assert_eq!(credits["remaining_credits"], 42);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn custom_mock_overrides() {
    let client = Client::builder(API_KEY)
        .mock(true)
        .mock_response("/v1/credits", json!({"remaining_credits": 3}))
        .build()
        .unwrap();
    assert_eq!(client.get_credits().await.unwrap()["remaining_credits"], 3);

    client.initialize_mock(
        MockConfig::enabled()
            .with_response("/v1/credits", json!({"from": "path"}))
            .with_handler(|method, url| {
                if url.ends_with("/credits") {
                    Ok(json!({"from": "handler", "method": method.as_str()}))
                } else {
                    Err("not handled".into())
                }
            }),
    );
    let credits = client.get_credits().await.unwrap();
    assert_eq!(credits["from"], "handler");
    assert_eq!(credits["method"], "GET");

    // Failing handler falls back to the built-in rules
    let health = client.health_check().await.unwrap();
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn scheduled_job_lifecycle() {
    let server = MockServer::start().await;
    let job = json!({"id": "job-1", "job_name": "Daily", "is_active": true});

    Mock::given(method("POST"))
        .and(path("/scheduled-jobs"))
        .and(body_json(json!({
            "job_name": "Daily",
            "service_type": "markdownify",
            "cron_expression": "0 9 * * *",
            "job_config": {"website_url": "https://example.com"},
            "is_active": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(job.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheduled-jobs"))
        .and(query_param("page", "2"))
        .and(query_param("service_type", "markdownify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": [], "total": 0})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/scheduled-jobs/job-1"))
        .and(body_json(json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(job.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/scheduled-jobs/job-1/pause"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"is_active": false})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheduled-jobs/job-1/executions"))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"executions": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/scheduled-jobs/job-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);

    let created = client
        .create_scheduled_job(ScheduledJobRequest::new(
            "Daily",
            ServiceType::Markdownify,
            "0 9 * * *",
            json!({"website_url": "https://example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(created["id"], "job-1");

    let listed = client
        .list_scheduled_jobs(ListScheduledJobs {
            page: Some(2),
            service_type: Some(ServiceType::Markdownify),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed["total"], 0);

    client
        .update_scheduled_job(
            "job-1",
            ScheduledJobUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let paused = client.pause_scheduled_job("job-1").await.unwrap();
    assert_eq!(paused["is_active"], false);

    client
        .get_job_executions(
            "job-1",
            ListJobExecutions {
                page_size: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let deleted = client.delete_scheduled_job("job-1").await.unwrap();
    assert_eq!(deleted, Value::Null);
}

#[tokio::test]
async fn mocked_scheduled_jobs_cover_every_action() {
    let client = Client::builder(API_KEY).mock(true).build().unwrap();

    let job = client
        .create_scheduled_job(ScheduledJobRequest::new(
            "Weekly",
            ServiceType::SmartScraper,
            "0 9 * * 1",
            json!({}),
        ))
        .await
        .unwrap();
    let id = job["id"].as_str().unwrap().to_string();

    assert_eq!(client.get_scheduled_job(&id).await.unwrap()["id"], id.as_str());
    assert_eq!(client.resume_scheduled_job(&id).await.unwrap()["is_active"], true);
    assert_eq!(
        client.trigger_scheduled_job(&id).await.unwrap()["scheduled_job_id"],
        id.as_str()
    );
    assert!(client
        .list_scheduled_jobs(ListScheduledJobs::default())
        .await
        .unwrap()["jobs"]
        .is_array());
    assert!(client
        .delete_scheduled_job(&id)
        .await
        .unwrap()["message"]
        .is_string());
}

#[tokio::test]
async fn api_key_is_sent_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/credits"))
        .and(header("sgai-apikey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"remaining_credits": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder(format!("  {}\n", API_KEY))
        .base_url(server.uri())
        .mock(false)
        .build()
        .unwrap();
    client.get_credits().await.unwrap();
}

#[tokio::test]
async fn ids_are_sent_as_a_single_path_segment() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    client.delete_scheduled_job("job-1/pause").await.unwrap();
    client.get_smartscraper("abc?status=x").await.unwrap();
    client.get_crawl("../credits").await.unwrap();
    client.pause_scheduled_job("a#b").await.unwrap();

    let sent: Vec<(String, String, Option<String>)> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            (
                r.method.to_string(),
                r.url.path().to_string(),
                r.url.query().map(str::to_string),
            )
        })
        .collect();
    assert_eq!(
        sent,
        vec![
            ("DELETE".into(), "/scheduled-jobs/job-1%2Fpause".into(), None),
            ("GET".into(), "/smartscraper/abc%3Fstatus=x".into(), None),
            ("GET".into(), "/crawl/..%2Fcredits".into(), None),
            ("POST".into(), "/scheduled-jobs/a%23b/pause".into(), None),
        ]
    );

    // Bare relative segments would escape the resource
    assert!(client.get_crawl("..").await.is_err());
    assert!(client.get_scheduled_job(".").await.is_err());
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn searchscraper_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/searchscraper"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "user_prompt": "Latest Rust release",
            "num_results": 5,
            "extraction_mode": true,
            "stealth": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"request_id": "s-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/searchscraper/s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut request = SearchScraperRequest::new("Latest Rust release");
    request.num_results = Some(5);
    assert_eq!(client.searchscraper(request).await.unwrap()["request_id"], "s-1");
    assert_eq!(
        client.get_searchscraper("s-1").await.unwrap()["status"],
        "completed"
    );
}

#[tokio::test]
async fn agentic_scraper_uses_api_spelling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/agentic-scrapper"))
        .and(body_json(json!({
            "url": "https://dashboard.example.com",
            "steps": ["Type email", "Click login"],
            "use_session": true,
            "user_prompt": "Extract the balance",
            "ai_extraction": true,
            "render_heavy_js": false,
            "stealth": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"request_id": "a-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/agentic-scrapper/a-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut request = AgenticScraperRequest::new(
        "https://dashboard.example.com",
        ["Type email", "Click login"],
    );
    request.ai_extraction = true;
    request.user_prompt = Some("Extract the balance".into());
    client.agentic_scraper(request).await.unwrap();
    client.get_agentic_scraper("a-1").await.unwrap();
}

#[tokio::test]
async fn generate_schema_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate_schema"))
        .and(body_json(json!({
            "user_prompt": "Add a price field",
            "existing_schema": {"type": "object"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"request_id": "g-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/generate_schema/g-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut request = GenerateSchemaRequest::new("Add a price field");
    request.existing_schema = Some(json!({"type": "object"}));
    client.generate_schema(request).await.unwrap();
    client.get_schema_status("g-1").await.unwrap();
}

#[tokio::test]
async fn account_and_session_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validate"))
        .and(header("sgai-apikey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.c"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/smartcrawler/sessions/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessions": []})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    assert_eq!(client.validate_api_key().await.unwrap()["email"], "a@b.c");
    assert!(client.list_crawl_sessions().await.unwrap()["sessions"].is_array());

    let mocked = client.with_mock(true);
    assert_eq!(mocked.validate_api_key().await.unwrap()["status"], "valid");
    assert_eq!(mocked.list_crawl_sessions().await.unwrap()["total"], 1);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn scheduled_job_replace_and_actions() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/scheduled-jobs/job-1"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "job_name": "Nightly crawl",
            "service_type": "smartcrawler",
            "cron_expression": "0 2 * * *",
            "job_config": {"url": "https://example.com"},
            "is_active": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "job-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheduled-jobs/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "job-1"})))
        .expect(1)
        .mount(&server)
        .await;
    for action in ["resume", "trigger"] {
        Mock::given(method("POST"))
            .and(path(format!("/scheduled-jobs/job-1/{}", action)))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"action": action})))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/scheduled-jobs/job-1/executions"))
        .and(query_param("status", "in progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"executions": []})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let mut job = ScheduledJobRequest::new(
        "Nightly crawl",
        ServiceType::SmartCrawler,
        "0 2 * * *",
        json!({"url": "https://example.com"}),
    );
    job.is_active = false;
    client.replace_scheduled_job("job-1", job).await.unwrap();

    assert_eq!(client.get_scheduled_job("job-1").await.unwrap()["id"], "job-1");
    assert_eq!(
        client.resume_scheduled_job("job-1").await.unwrap()["action"],
        "resume"
    );
    assert_eq!(
        client.trigger_scheduled_job("job-1").await.unwrap()["action"],
        "trigger"
    );
    client
        .get_job_executions(
            "job-1",
            ListJobExecutions {
                status: Some("in progress".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}
