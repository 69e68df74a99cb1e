//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract and collect cycle end-to-end.

use catalog_harvester::config::{
    Config, HarvesterConfig, LoggerConfig, NameValue, OutputConfig, RequestProfileConfig,
    SelectorConfig,
};
use catalog_harvester::harvester::{run_harvest, Harvester};
use catalog_harvester::model::Availability;
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE_BASE: &str = "https://static.example.com/books";

/// Creates a test configuration pointing at the mock server
fn create_test_config(server_uri: &str, output_dir: &Path) -> Config {
    Config {
        harvester: HarvesterConfig {
            base_url: format!("{}/books", server_uri),
            image_base_url: IMAGE_BASE.to_string(),
            concurrency: 3,
            politeness_delay_ms: 0,
            collect_images: true,
            identifiers_file: "ids.json".to_string(),
            request_timeout_secs: 5,
        },
        request_profile: RequestProfileConfig {
            user_agent: "Mozilla/5.0 TestBrowser/1.0".to_string(),
            headers: vec![
                NameValue::new("Accept-Language", "ru-RU"),
                NameValue::new("Sec-Fetch-Mode", "navigate"),
            ],
            cookie_domain: None,
            cookies: vec![NameValue::new("PHPSESSID", "abc123")],
        },
        selectors: SelectorConfig::default(),
        output: OutputConfig {
            records_path: output_dir.join("books.json").to_string_lossy().into_owned(),
            workbook_path: output_dir.join("books.xlsx").to_string_lossy().into_owned(),
            table_path: output_dir.join("books.csv").to_string_lossy().into_owned(),
            summary_path: output_dir.join("summary.md").to_string_lossy().into_owned(),
            date_suffix: false,
        },
        logger: LoggerConfig::default(),
    }
}

/// Renders a catalogue page in the markup the default selectors expect
fn book_page(title: &str, price: &str, status: &str, slides: usize) -> String {
    let slides: String = (0..slides)
        .map(|i| format!("<div class=\"_slide_x1\"><img src=\"{}.jpg\"></div>", i))
        .collect();
    format!(
        r#"<html><body>
            <h1 itemprop="name"> {title} </h1>
            <div class="_prices_a1"><div class="rubl">{price}</div></div>
            <div class="_block_b2"><span>{status}</span></div>
            <div class="_gallery_c3">{slides}</div>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, id: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/books/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_full_harvest_mixed_outcomes() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&mock_server, "101", book_page("Первая книга", "500", "В наличии", 2)).await;
    mount_page(
        &mock_server,
        "102",
        book_page("Вторая книга", "750", "Осталось: Ограниченное количество", 0),
    )
    .await;
    mount_page(&mock_server, "103", book_page("Третья книга", "", "Ожидается в мае", 1)).await;

    Mock::given(method("GET"))
        .and(path("/books/104"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    // 105 is not mounted at all and gets wiremock's 404

    let config = create_test_config(&mock_server.uri(), dir.path());
    let harvester = Harvester::new(config).unwrap();

    let result = harvester.run(&ids(&["101", "102", "103", "104", "105"])).await;

    assert_eq!(result.submitted, 5);
    assert_eq!(result.succeeded(), 3);
    assert_eq!(result.failed(), 2);
    assert!(result.is_complete());

    let first = result
        .records
        .iter()
        .find(|r| r.identifier == "101")
        .expect("101 should be parsed");
    assert_eq!(first.title, "Первая книга");
    assert_eq!(first.price, "500");
    assert_eq!(first.availability, Availability::InStock);
    assert_eq!(first.url, format!("{}/books/101", mock_server.uri()));
    assert_eq!(
        first.image_links,
        vec![
            format!("{}/101/cover.jpg", IMAGE_BASE),
            format!("{}/101/ph_01.jpg", IMAGE_BASE),
            format!("{}/101/ph_02.jpg", IMAGE_BASE),
        ]
    );

    let second = result.records.iter().find(|r| r.identifier == "102").unwrap();
    assert_eq!(second.availability, Availability::LimitedStock);
    assert!(second.image_links.is_empty());

    let third = result.records.iter().find(|r| r.identifier == "103").unwrap();
    assert_eq!(third.availability, Availability::Expected);
    assert_eq!(third.image_links.len(), 2);

    let mut failed: Vec<&str> = result
        .failures
        .iter()
        .map(|f| f.identifier.as_str())
        .collect();
    failed.sort_unstable();
    assert_eq!(failed, vec!["104", "105"]);
    assert!(result
        .failures
        .iter()
        .any(|f| f.message.contains("500")));
}

#[tokio::test]
async fn test_request_profile_is_sent() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    // Only a request carrying the full profile gets the page
    Mock::given(method("GET"))
        .and(path("/books/201"))
        .and(header("user-agent", "Mozilla/5.0 TestBrowser/1.0"))
        .and(header("accept-language", "ru-RU"))
        .and(header("sec-fetch-mode", "navigate"))
        .and(header("cookie", "PHPSESSID=abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(book_page("Профиль", "1", "", 0)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let result = Harvester::new(config)
        .unwrap()
        .run(&ids(&["201"]))
        .await;

    assert_eq!(result.succeeded(), 1);
    assert_eq!(result.records[0].title, "Профиль");
}

#[tokio::test]
async fn test_missing_cookie_is_a_failure() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/books/301"))
        .and(header("cookie", "PHPSESSID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(book_page("X", "1", "", 0)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.request_profile.cookies.clear();

    let result = Harvester::new(config)
        .unwrap()
        .run(&ids(&["301"]))
        .await;

    assert_eq!(result.succeeded(), 0);
    assert_eq!(result.failed(), 1);
    assert_eq!(result.failures[0].identifier, "301");
}

#[tokio::test]
async fn test_images_disabled() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&mock_server, "401", book_page("Без картинок", "10", "", 4)).await;

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.harvester.collect_images = false;

    let result = Harvester::new(config)
        .unwrap()
        .run(&ids(&["401"]))
        .await;

    assert_eq!(result.succeeded(), 1);
    assert!(result.records[0].image_links.is_empty());
}

#[tokio::test]
async fn test_missing_status_block_is_out_of_stock() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let body = r#"<html><body><h1 itemprop="name">Только название</h1></body></html>"#;
    mount_page(&mock_server, "501", body.to_string()).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let result = Harvester::new(config)
        .unwrap()
        .run(&ids(&["501"]))
        .await;

    let record = &result.records[0];
    assert_eq!(record.title, "Только название");
    assert_eq!(record.price, "");
    assert_eq!(record.availability, Availability::OutOfStock);
}

#[tokio::test]
async fn test_duplicate_identifiers_fetched_each_time() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/books/601"))
        .respond_with(ResponseTemplate::new(200).set_body_string(book_page("Дубль", "1", "", 0)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let result = Harvester::new(config)
        .unwrap()
        .run(&ids(&["601", "601", "601"]))
        .await;

    assert_eq!(result.submitted, 3);
    assert_eq!(result.succeeded(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_documents_all_accounted_for() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let all: Vec<String> = (1..=40).map(|i| (1000 + i).to_string()).collect();
    for id in all.iter().filter(|id| !id.ends_with('0')) {
        mount_page(&mock_server, id, book_page(id, "1", "", 1)).await;
    }

    let config = create_test_config(&mock_server.uri(), dir.path());
    let result = Harvester::new(config).unwrap().run(&all).await;

    assert_eq!(result.submitted, 40);
    assert_eq!(result.failed(), 4);
    assert_eq!(result.succeeded(), 36);
    assert!(result.is_complete());
}

#[tokio::test]
async fn test_run_harvest_writes_outputs() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    mount_page(&mock_server, "701", book_page("Экспорт", "99", "Нет в продаже", 1)).await;

    let config = create_test_config(&mock_server.uri(), dir.path());
    let result = run_harvest(config, &ids(&["701", "702"])).await.unwrap();

    assert_eq!(result.succeeded(), 1);
    assert_eq!(result.failed(), 1);

    let json = std::fs::read_to_string(dir.path().join("books.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["id"], "701");
    assert_eq!(parsed[0]["availability"], "Нет в продаже");

    let workbook = std::fs::read(dir.path().join("books.xlsx")).unwrap();
    assert_eq!(&workbook[..2], b"PK");

    let csv = std::fs::read_to_string(dir.path().join("books.csv")).unwrap();
    assert!(csv.starts_with("Ссылка,Название,ID,Наличие,Цена,Картинка_1,Картинка_2"));

    let summary = std::fs::read_to_string(dir.path().join("summary.md")).unwrap();
    assert!(summary.contains("- **Failed**: 1"));
    assert!(summary.contains("| 702 |"));
}

#[tokio::test]
async fn test_no_records_skips_record_sinks() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let config = create_test_config(&mock_server.uri(), dir.path());
    let result = run_harvest(config, &ids(&["801"])).await.unwrap();

    assert_eq!(result.failed(), 1);
    assert!(!dir.path().join("books.json").exists());
    assert!(!dir.path().join("books.csv").exists());
    assert!(!dir.path().join("books.xlsx").exists());
    assert!(dir.path().join("summary.md").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_politeness_delay_still_delivers_every_outcome() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();

    let all: Vec<String> = (1..=12).map(|i| (900 + i).to_string()).collect();
    for id in all.iter().take(10) {
        mount_page(&mock_server, id, book_page(id, "1", "", 0)).await;
    }

    let mut config = create_test_config(&mock_server.uri(), dir.path());
    config.harvester.politeness_delay_ms = 40;
    config.harvester.concurrency = 2;

    let started = std::time::Instant::now();
    let result = Harvester::new(config).unwrap().run(&all).await;

    assert_eq!(result.submitted, 12);
    assert_eq!(result.succeeded(), 10);
    assert_eq!(result.failed(), 2);
    assert!(result.is_complete());
    // 12 pauses drawn from [0, 40ms), at most two at a time, finish well inside this
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 12);
}
