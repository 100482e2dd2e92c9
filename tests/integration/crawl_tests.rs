//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and run full passes
//! through the reqwest fetcher into a SQLite store.

use lecture_crawler::config::{Config, CrawlerConfig, SiteConfig, StorageConfig, UserAgentConfig};
use lecture_crawler::crawler::{CrawlCursor, HttpFetcher, Orchestrator, PaginationCrawler, PassOutcome};
use lecture_crawler::storage::{Recording, RecordStore, SqliteStore};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const START_PATH: &str = "/publish/index.php";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, db_path: &str, schedule: bool) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            start_path: START_PATH.to_string(),
        },
        crawler: CrawlerConfig {
            max_pages: None,
            request_timeout: 5,
            schedule,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        storage: StorageConfig {
            database_path: db_path.to_string(),
        },
    }
}

fn lecture_row(title: &str, course: &str, audio_href: &str) -> String {
    format!(
        r#"<tr class="lecture">
            <td class="date">14.12.2018 10:15</td>
            <td class="course">{}</td>
            <td class="title">{}</td>
            <td class="lecturer">Kari Nordmann</td>
            <td class="room">K105</td>
            <td class="audio"><a href="{}">mp3</a></td>
        </tr>"#,
        course, title, audio_href
    )
}

fn listing_page(rows: &[String], next_page: Option<u32>) -> String {
    let paginator = match next_page {
        Some(page) => format!(
            r#"<a href="{}?page=0">Første</a> <a href="{}?page={}">Neste</a>"#,
            START_PATH, START_PATH, page
        ),
        None => format!(r#"<a href="{}?page=0">Første</a>"#, START_PATH),
    };
    format!(
        r#"<!DOCTYPE html><html><head><title>Forelesninger</title></head><body>
        <table>{}</table>
        <div class="paginator">{}</div>
        </body></html>"#,
        rows.join("\n"),
        paginator
    )
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(START_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn crawler_for(server: &MockServer, store: Arc<SqliteStore>) -> PaginationCrawler {
    let config = create_test_config(&server.uri(), ":memory:", false);
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler).expect("Failed to build fetcher");
    PaginationCrawler::new(Arc::new(fetcher), store, None)
}

fn start_cursor(server: &MockServer, page: u32) -> CrawlCursor {
    CrawlCursor::listing_page(server.uri(), START_PATH, page)
}

#[tokio::test]
async fn test_three_page_crawl_stops_at_last_page() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        listing_page(
            &[
                lecture_row("Algoritmer", "IMT2021", "/publish/audio/imt2021-1.mp3"),
                lecture_row("Databaser", "IMT2571", "/publish/audio/imt2571-1.mp3"),
            ],
            Some(2),
        ),
    )
    .await;
    mount_page(
        &server,
        2,
        listing_page(&[lecture_row("Algoritmer", "IMT2021", "/publish/audio/imt2021-2.mp3")], Some(3)),
    )
    .await;
    mount_page(
        &server,
        3,
        listing_page(&[lecture_row("Databaser", "IMT2571", "/publish/audio/imt2571-2.mp3")], None),
    )
    .await;

    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let crawler = crawler_for(&server, store.clone());

    let summary = crawler
        .crawl(start_cursor(&server, 1))
        .await
        .expect("Crawl failed");

    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.inserted, 4);
    assert_eq!(store.count_recordings().unwrap(), 4);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3, "No fourth page should be fetched");

    let stored = store
        .find_by_audio_url(&format!("{}/publish/audio/imt2021-2.mp3", server.uri()))
        .unwrap()
        .expect("Recording from page 2 should be stored");
    assert_eq!(stored.recording.title, "Algoritmer");
    assert_eq!(stored.recording.course_code.as_deref(), Some("IMT2021"));
    assert_eq!(stored.recording.room.as_deref(), Some("K105"));
}

#[tokio::test]
async fn test_known_recording_is_not_inserted_again() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        0,
        listing_page(
            &[
                lecture_row("Kjent", "IMT1031", "https://x/a.mp3"),
                lecture_row("Ny", "IMT1031", "/publish/audio/ny.mp3"),
            ],
            None,
        ),
    )
    .await;

    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    store
        .insert(&Recording {
            title: "Kjent".to_string(),
            audio_url: "https://x/a.mp3".to_string(),
            course_code: Some("IMT1031".to_string()),
            lecturer: None,
            room: None,
            published: None,
        })
        .unwrap();

    let crawler = crawler_for(&server, store.clone());
    let summary = crawler.crawl(start_cursor(&server, 0)).await.expect("Crawl failed");

    assert_eq!(summary.duplicates, 1);
    assert_eq!(summary.inserted, 1);
    assert_eq!(store.count_recordings().unwrap(), 2);

    // The existing row is untouched
    let known = store.find_by_audio_url("https://x/a.mp3").unwrap().unwrap();
    assert_eq!(known.recording.lecturer, None);
}

#[tokio::test]
async fn test_fetch_failure_halts_pass_after_first_page() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        listing_page(
            &[
                lecture_row("Fysikk", "REA1121", "/publish/audio/rea1121-1.mp3"),
                lecture_row("Fysikk", "REA1121", "/publish/audio/rea1121-2.mp3"),
            ],
            Some(2),
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(START_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(START_PATH))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], None)))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let crawler = crawler_for(&server, store.clone());

    let err = crawler
        .crawl(start_cursor(&server, 1))
        .await
        .expect_err("Pass should fail on page 2");

    assert!(err.is_fetch_failure());
    assert_eq!(store.count_recordings().unwrap(), 2);
}

#[tokio::test]
async fn test_malformed_rows_do_not_abort_page() {
    let server = MockServer::start().await;

    let rows = vec![
        r#"<tr class="lecture"><td class="title">Uten lydfil</td><td class="audio">ingen</td></tr>"#.to_string(),
        lecture_row("Med lydfil", "IMT3601", "/publish/audio/imt3601.mp3"),
        r#"<tr class="lecture"><td class="audio"><a href="/publish/audio/uten-tittel.mp3">mp3</a></td></tr>"#.to_string(),
    ];
    mount_page(&server, 0, listing_page(&rows, None)).await;

    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let crawler = crawler_for(&server, store.clone());
    let summary = crawler.crawl(start_cursor(&server, 0)).await.expect("Crawl failed");

    assert_eq!(summary.recordings_seen, 1);
    assert_eq!(summary.inserted, 1);
    assert_eq!(store.count_recordings().unwrap(), 1);
}

#[tokio::test]
async fn test_orchestrator_run_once_from_config() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        4,
        listing_page(&[lecture_row("Statistikk", "IMT2681", "/publish/audio/imt2681.mp3")], None),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("recordings.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap(), false);

    let orchestrator =
        lecture_crawler::crawler::build_orchestrator(&config).expect("Failed to build orchestrator");
    let outcome = orchestrator.clone().run(4).await;

    assert_eq!(outcome.summary().map(|s| s.inserted), Some(1));
    assert!(!orchestrator.scheduler().is_armed());

    let reopened = SqliteStore::new(&db_path).unwrap();
    assert_eq!(reopened.count_recordings().unwrap(), 1);
}

#[tokio::test]
async fn test_orchestrator_arms_next_pass_after_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), ":memory:", true);
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler).unwrap();
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let orchestrator = Arc::new(Orchestrator::from_config(&config, Arc::new(fetcher), store));

    let outcome = orchestrator.clone().run(0).await;

    assert!(matches!(outcome, PassOutcome::Failed(_)));
    assert!(orchestrator.scheduler().is_armed());
    assert!(orchestrator.scheduler().state().armed_until().unwrap() > chrono::Local::now());
}
