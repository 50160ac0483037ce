//! Integration tests for the harvester
//!
//! These tests use wiremock to serve synthetic listing pages and exercise
//! the full fetch → extract → paginate → write cycle.

use quote_harvest::config::{Config, HttpConfig, OutputConfig, SiteConfig};
use quote_harvest::crawler::{harvest, Coordinator};
use quote_harvest::output::read_records;
use quote_harvest::{ConfigError, CrawlState, HarvestError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output_path: &str) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            page_path: "page/{page}/".to_string(),
        },
        http: HttpConfig {
            user_agent: "TestHarvester/1.0".to_string(),
            request_timeout_secs: Some(10),
        },
        output: OutputConfig {
            path: output_path.to_string(),
        },
    }
}

fn quote_html(text: &str, author: &str, tags: &[&str]) -> String {
    let tags: String = tags
        .iter()
        .map(|t| format!(r#"<a class="tag" href="/tag/{t}/page/1/">{t}</a>"#))
        .collect();
    format!(
        r#"<div class="quote" itemscope>
            <span class="text" itemprop="text">{text}</span>
            <span>by <small class="author" itemprop="author">{author}</small>
            <a href="/author/x">(about)</a></span>
            <div class="tags">Tags: {tags}</div>
        </div>"#
    )
}

fn page_html(quotes: &[String], has_next: bool) -> String {
    let pager = if has_next {
        r#"<nav><ul class="pager"><li class="next"><a href="/page/x/">Next <span aria-hidden="true">&rarr;</span></a></li></ul></nav>"#
    } else {
        r#"<nav><ul class="pager"><li class="previous"><a href="/page/x/">Previous</a></li></ul></nav>"#
    };
    format!(
        r#"<html><head><title>Quotes to Scrape</title></head>
        <body><div class="container"><div class="row"><div class="col-md-8">{}{}</div></div></div></body></html>"#,
        quotes.concat(),
        pager
    )
}

async fn mount_page(server: &MockServer, number: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/page/{}/", number)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_chain(server: &MockServer, pages: u32) {
    for n in 1..=pages {
        let quotes = vec![quote_html(&format!("quote {}", n), "Author", &[])];
        mount_page(server, n, page_html(&quotes, n < pages)).await;
    }
}

#[tokio::test]
async fn test_two_page_scenario() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        page_html(
            &[
                quote_html("“The world as we have created it”", "Albert Einstein", &["love"]),
                quote_html("It is our choices, Harry", "J.K. Rowling", &[]),
            ],
            true,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        2,
        page_html(
            &[quote_html("Try not to become a man of success", "Albert Einstein", &["life", "inspirational"])],
            false,
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), output.to_str().unwrap());

    let quotes = harvest(&config, &output).await.unwrap();

    assert_eq!(quotes.len(), 3);
    assert_eq!(quotes[0].author, "Albert Einstein");
    assert_eq!(quotes[0].tags, vec!["love"]);
    assert_eq!(quotes[1].text, "It is our choices, Harry");
    assert!(quotes[1].tags.is_empty());
    assert_eq!(quotes[2].tags, vec!["life", "inspirational"]);

    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "text,author,tags");

    // Only pages 1 and 2 were requested
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_first_page_failure_writes_header_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), output.to_str().unwrap());

    let quotes = harvest(&config, &output).await.unwrap();
    assert!(quotes.is_empty());

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().collect::<Vec<_>>(), vec!["text,author,tags"]);
}

#[tokio::test]
async fn test_failure_on_page_k_keeps_earlier_pages() {
    let mock_server = MockServer::start().await;

    // Pages 1 and 2 both advertise a next page; page 3 is missing (404)
    mount_page(&mock_server, 1, page_html(&[quote_html("one", "A", &[])], true)).await;
    mount_page(
        &mock_server,
        2,
        page_html(&[quote_html("two", "B", &[]), quote_html("three", "C", &[])], true),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), output.to_str().unwrap());

    let mut coordinator = Coordinator::new(&config).unwrap();
    let quotes = coordinator.run().await.unwrap();

    let texts: Vec<_> = quotes.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert_eq!(coordinator.pages_processed(), 2);
    assert_eq!(coordinator.state(), CrawlState::Stopped);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].url.path(), "/page/3/");
}

#[tokio::test]
async fn test_pagination_visits_exact_chain_length() {
    let mock_server = MockServer::start().await;
    mount_chain(&mock_server, 5).await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let mut coordinator = Coordinator::new(&config).unwrap();
    let quotes = coordinator.run().await.unwrap();

    assert_eq!(quotes.len(), 5);
    assert_eq!(coordinator.pages_processed(), 5);
    assert_eq!(coordinator.state(), CrawlState::Stopped);

    // Nothing past the last page was requested
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
}

#[tokio::test]
async fn test_next_page_is_lazy_and_restartable() {
    let mock_server = MockServer::start().await;

    for n in 1..=2 {
        let quotes = vec![quote_html(&format!("quote {}", n), "Author", &[])];
        Mock::given(method("GET"))
            .and(path(format!("/page/{}/", n)))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_html(&quotes, n < 2)))
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let mut coordinator = Coordinator::new(&config).unwrap();
    assert_eq!(coordinator.state(), CrawlState::Fetching(1));

    let first = coordinator.next_page().await.unwrap().unwrap();
    assert_eq!(first.number, 1);
    assert!(first.has_next);
    assert_eq!(first.url.path(), "/page/1/");
    assert_eq!(coordinator.state(), CrawlState::Fetching(2));

    // Only one request so far
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);

    let second = coordinator.next_page().await.unwrap().unwrap();
    assert_eq!(second.number, 2);
    assert!(!second.has_next);
    assert_eq!(coordinator.state(), CrawlState::Stopped);

    assert!(coordinator.next_page().await.unwrap().is_none());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);

    coordinator.reset();
    assert_eq!(coordinator.state(), CrawlState::Fetching(1));
    assert_eq!(coordinator.pages_processed(), 0);

    let again = coordinator.next_page().await.unwrap().unwrap();
    assert_eq!(again.number, 1);
    assert_eq!(again.quotes[0].text, "quote 1");
}

#[tokio::test]
async fn test_empty_page_with_next_marker_continues() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, page_html(&[], true)).await;
    mount_page(&mock_server, 2, page_html(&[quote_html("late", "Z", &[])], false)).await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let mut coordinator = Coordinator::new(&config).unwrap();
    let quotes = coordinator.run().await.unwrap();

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].text, "late");
    assert_eq!(coordinator.pages_processed(), 2);
}

#[tokio::test]
async fn test_malformed_entry_aborts_without_output() {
    let mock_server = MockServer::start().await;

    let broken = r#"<div class="quote"><span class="text">no author here</span></div>"#.to_string();
    mount_page(&mock_server, 1, page_html(&[broken], true)).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), output.to_str().unwrap());

    let err = harvest(&config, &output).await.unwrap_err();

    assert!(matches!(
        err,
        HarvestError::MalformedEntry {
            index: 0,
            field: "author",
            found: 0
        }
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_custom_page_path_template() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive/1.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page_html(&[quote_html("archived", "Old", &["history"])], false)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("archive.csv");
    let mut config = create_test_config(&mock_server.uri(), output.to_str().unwrap());
    config.site.page_path = "/archive/{page}.html".to_string();

    let quotes = harvest(&config, &output).await.unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].tags, vec!["history"]);
}

#[tokio::test]
async fn test_written_file_reads_back() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        page_html(
            &[
                quote_html("“A, B and \"C\"”", "Someone, Jr.", &["a", "b"]),
                quote_html("plain", "Nobody", &[]),
            ],
            false,
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("quotes.csv");
    let config = create_test_config(&mock_server.uri(), output.to_str().unwrap());

    let quotes = harvest(&config, &output).await.unwrap();
    let read_back = read_records(&output).unwrap();

    assert_eq!(read_back, quotes);
    assert_eq!(read_back[0].author, "Someone, Jr.");
}

#[tokio::test]
async fn test_page_path_without_placeholder_is_rejected() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(&[], true)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("quotes.csv");
    let mut config = create_test_config(&mock_server.uri(), output.to_str().unwrap());
    config.site.page_path = "page/1/".to_string();

    let err = harvest(&config, &output).await.unwrap_err();

    assert!(matches!(err, HarvestError::Config(ConfigError::Validation(_))));
    assert!(!output.exists());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[test]
fn test_coordinator_rejects_invalid_config() {
    let mut config = create_test_config("not a url", "unused.csv");
    assert!(matches!(
        Coordinator::new(&config),
        Err(HarvestError::Config(ConfigError::InvalidUrl(_)))
    ));

    config.site.base_url = "http://127.0.0.1:1".to_string();
    config.http.request_timeout_secs = Some(0);
    assert!(matches!(
        Coordinator::new(&config),
        Err(HarvestError::Config(ConfigError::Validation(_)))
    ));
}

#[tokio::test]
async fn test_aborted_crawl_does_not_resume() {
    let mock_server = MockServer::start().await;

    let broken = r#"<div class="quote"><small class="author">no text here</small></div>"#.to_string();
    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_html(&[broken], true)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let mut coordinator = Coordinator::new(&config).unwrap();

    assert!(matches!(
        coordinator.next_page().await,
        Err(HarvestError::MalformedEntry { field: "text", .. })
    ));
    assert_eq!(coordinator.state(), CrawlState::Extracting(1));

    assert!(matches!(
        coordinator.next_page().await,
        Err(HarvestError::InvalidTransition {
            from: CrawlState::Extracting(1),
            ..
        })
    ));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);

    coordinator.reset();
    assert_eq!(coordinator.state(), CrawlState::Fetching(1));
}

#[tokio::test]
async fn test_body_decoded_with_header_charset() {
    let mock_server = MockServer::start().await;

    let body = b"<div class=\"quote\"><span class=\"text\">caf\xe9</span><small class=\"author\">Z\xfcrich</small></div>".to_vec();
    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=iso-8859-1"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let quotes = Coordinator::new(&config).unwrap().run().await.unwrap();

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].text, "café");
    assert_eq!(quotes[0].author, "Zürich");
}
