//! Integration tests for the census
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! bootstrap, crawl, tally and CSV cycle end-to-end. A larger synthetic
//! category is served from memory through the `PageSource` trait.

use async_trait::async_trait;
use category_census::config::Config;
use category_census::crawler::{fetch_page, run_census, Coordinator, FetchError, PageSource};
use category_census::output::{tally, CsvTallySink, TallySink};
use category_census::CensusError;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing at the mock server
fn create_test_config(base_url: &str, tally_path: &str) -> Config {
    let mut config = Config::default();
    config.source.base_url = base_url.to_string();
    config.source.root_url = format!("{}/root", base_url);
    config.crawler.request_timeout_secs = 5;
    config.crawler.max_concurrent_pages_open = 4;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.tally_path = tally_path.to_string();
    config
}

fn index_html(links: &[(&str, &str)]) -> String {
    let items: String = links
        .iter()
        .map(|(href, label)| format!(r#"<li><a href="{}">{}</a></li>"#, href, label))
        .collect();
    format!(
        r#"<html><body><div class="ts-module-Индекс_категории-container"><ul>{}</ul></div></body></html>"#,
        items
    )
}

fn listing_html(names: &[&str], next: Option<&str>) -> String {
    let anchors: String = names
        .iter()
        .map(|name| format!(r#"<li><a href="/wiki/{0}" title="{0}">{0}</a></li>"#, name))
        .collect();
    let next = next
        .map(|href| format!(r#"<a href="{}" title="Категория">Следующая страница</a>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body><div class="mw-category mw-category-columns"><div class="mw-category-group"><h3>?</h3><ul>{}</ul></div></div>{}</body></html>"#,
        anchors, next
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_census_writes_tally() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/root",
        index_html(&[("/a1", "Аи"), ("/b1", "Ба"), ("/v1", "Во")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/a1",
        listing_html(&["Аист", "Акула", "Ара"], Some("/a2")),
    )
    .await;
    // Reaches the start of the "Ба" bucket, so the first lane stops here
    mount_page(
        &mock_server,
        "/a2",
        listing_html(&["Аргали", "Бабуин"], Some("/a3")),
    )
    .await;
    mount_page(
        &mock_server,
        "/b1",
        listing_html(&["Бабуин", "Барсук", "Бобр"], None),
    )
    .await;
    mount_page(
        &mock_server,
        "/v1",
        listing_html(&["Волк", "Выдра", "Lion"], None),
    )
    .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tally_path = temp_dir.path().join("beasts.csv");
    let config = create_test_config(&base_url, &tally_path.display().to_string());

    let report = run_census(&config).await.expect("Census failed");

    assert_eq!(report.items.len(), 9);
    assert!(!report.items.contains("Lion"));
    assert_eq!(report.stats.lanes, 3);
    assert_eq!(report.stats.rounds, 2);
    assert_eq!(report.stats.pages_fetched, 4);
    assert_eq!(report.stats.lanes_converged, 1);
    assert_eq!(report.stats.pages_failed(), 0);

    let result = tally(&report.items);
    let sink = CsvTallySink::new(&tally_path);
    sink.write_tally(&result).expect("Failed to write tally");

    let written = std::fs::read_to_string(&tally_path).expect("Failed to read tally");
    assert_eq!(written, "\u{FEFF}А,4\r\nБ,3\r\nВ,2\r\n");

    // /a3 sits behind a converged page and must never be requested
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.iter().all(|r| r.url.path() != "/a3"));
}

#[tokio::test]
async fn test_census_survives_failing_lane() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/root",
        index_html(&[("/a1", "Аи"), ("/b1", "Ба")]),
    )
    .await;
    mount_page(&mock_server, "/a1", listing_html(&["Аист", "Акула"], None)).await;
    Mock::given(method("GET"))
        .and(path("/b1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "unused.csv");
    let report = run_census(&config).await.expect("Census failed");

    assert_eq!(report.items.len(), 2);
    assert_eq!(report.stats.http_errors, 1);
    assert_eq!(report.stats.pages_fetched, 1);
}

#[tokio::test]
async fn test_census_fails_when_root_is_missing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/root"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "unused.csv");
    let result = run_census(&config).await;

    assert!(matches!(result, Err(CensusError::Bootstrap { .. })));
}

#[tokio::test]
async fn test_census_fails_on_empty_index() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/root", index_html(&[])).await;

    let config = create_test_config(&base_url, "unused.csv");
    let result = run_census(&config).await;

    assert!(matches!(result, Err(CensusError::EmptyIndex { .. })));
}

#[tokio::test]
async fn test_fetch_classifies_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let url = format!("{}/broken", mock_server.uri());
    let error = fetch_page(&client, &url, Duration::from_secs(5))
        .await
        .expect_err("500 must fail");

    match error {
        FetchError::Http { status, .. } => assert_eq!(status, Some(500)),
        other => panic!("Expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_classifies_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let url = format!("{}/slow", mock_server.uri());
    let error = fetch_page(&client, &url, Duration::from_millis(200))
        .await
        .expect_err("slow page must time out");

    assert!(matches!(error, FetchError::Timeout { .. }));
    assert_eq!(error.url(), url);
}

/// In-memory category over a synthetic alphabet
///
/// Names are `<capital><lowercase>ка` for every capital in `CAPITALS` and
/// every lowercase letter а..я, sorted by code point. `/list?from=N` serves
/// `PAGE_SIZE` names starting at index N, with a "next page" link to the
/// following chunk.
struct AlphabetSite {
    names: Vec<String>,
}

const CAPITALS: [char; 5] = ['А', 'Б', 'В', 'Г', 'Д'];
const PAGE_SIZE: usize = 7;
const ALPHA_BASE: &str = "https://alpha.test";

impl AlphabetSite {
    fn new() -> Self {
        let names = CAPITALS
            .iter()
            .flat_map(|capital| ('а'..='я').map(move |lower| format!("{}{}ка", capital, lower)))
            .collect();
        Self { names }
    }

    fn index_of(&self, prefix: &str) -> usize {
        self.names
            .iter()
            .position(|name| name.starts_with(prefix))
            .expect("prefix not in alphabet")
    }

    fn page(&self, from: usize) -> String {
        let end = (from + PAGE_SIZE).min(self.names.len());
        let names: Vec<&str> = self.names[from..end].iter().map(String::as_str).collect();
        let next = (end < self.names.len()).then(|| format!("/list?from={}", end));
        listing_html(&names, next.as_deref())
    }

    fn root(&self, labels: &[&str]) -> String {
        let links: Vec<(String, &str)> = labels
            .iter()
            .map(|label| (format!("/list?from={}", self.index_of(label)), *label))
            .collect();
        let links: Vec<(&str, &str)> = links.iter().map(|(h, l)| (h.as_str(), *l)).collect();
        index_html(&links)
    }
}

#[async_trait]
impl PageSource for AlphabetSite {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::Unknown {
            url: url.to_string(),
            kind: e.to_string(),
        })?;

        if parsed.path() == "/root" {
            return Ok(self.root(&["Аа", "Ап", "Ба", "Ва", "Га", "Да"]));
        }

        let from = parsed
            .query_pairs()
            .find(|(key, _)| key == "from")
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .filter(|from| *from < self.names.len())
            .ok_or_else(|| FetchError::Http {
                url: url.to_string(),
                status: Some(404),
                cause: "404 Not Found".to_string(),
            })?;

        Ok(self.page(from))
    }
}

#[tokio::test]
async fn test_synthetic_alphabet_terminates_with_full_coverage() {
    let mut config = Config::default();
    config.source.base_url = ALPHA_BASE.to_string();
    config.source.root_url = format!("{}/root", ALPHA_BASE);

    let site = Arc::new(AlphabetSite::new());
    let expected = site.names.len();
    let coordinator =
        Coordinator::with_source(&config, site.clone()).expect("Failed to build coordinator");

    let report = tokio::time::timeout(Duration::from_secs(30), coordinator.run())
        .await
        .expect("Census did not terminate")
        .expect("Census failed");

    assert_eq!(report.items.len(), expected);
    assert!(site.names.iter().all(|name| report.items.contains(name)));

    let result = tally(&report.items);
    assert_eq!(result.len(), CAPITALS.len());
    for capital in CAPITALS {
        assert_eq!(result.get(capital), Some(32));
    }

    // Every lane but the last one stops at the next bucket
    assert_eq!(report.stats.lanes, 6);
    assert_eq!(report.stats.lanes_converged, 5);
    assert_eq!(report.stats.lanes_exhausted, 1);
    assert_eq!(report.stats.pages_failed(), 0);

    let counts = &report.stats.items_per_round;
    assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(counts.last().copied(), Some(expected));
}
