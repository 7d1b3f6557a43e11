//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog and run the full
//! pipeline end-to-end: listing pages, detail pages, payloads and export.

use crate::support::*;
use bookshelf_mirror::config::JSON_FILE_NAME;
use bookshelf_mirror::crawler::{run_crawl, Coordinator};
use bookshelf_mirror::{BookRecord, CrawlPhase, MirrorError, NetworkError};
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn read_json(path: &std::path::Path) -> Vec<BookRecord> {
    let content = std::fs::read_to_string(path).expect("Failed to read JSON");
    serde_json::from_str(&content).expect("Failed to parse JSON")
}

#[tokio::test]
async fn test_single_page_with_missing_text() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    // Listing page is fetched once: discovery and collection share it
    Mock::given(method("GET"))
        .and(path("/l55/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[1, 2], &[])))
        .expect(1)
        .mount(&server)
        .await;

    mount_item(&server, 1, "Солярис").await;

    mount_detail(
        &server,
        2,
        detail_html(2, "Пикник на обочине\u{a0}::\u{a0}Стругацкие", &[]),
    )
    .await;
    mount_image(&server, 2).await;
    mount_text_missing(&server, 2).await;

    let config = test_config(&server, dest.path());
    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages, 1..=1);
    assert_eq!(report.records.len(), 2);

    let first = &report.records[0];
    assert_eq!(first.title, "Солярис");
    assert_eq!(first.author, "Автор 1");
    assert_eq!(
        first.text_path.as_deref(),
        Some(dest.path().join("books").join("1_Солярис.txt").as_path())
    );
    assert_eq!(
        first.image_path.as_deref(),
        Some(dest.path().join("images").join("1.jpg").as_path())
    );
    assert_eq!(first.comments, vec!["Хорошая книга"]);
    assert_eq!(first.genres, vec!["Научная фантастика"]);

    let second = &report.records[1];
    assert_eq!(second.title, "Пикник на обочине");
    assert_eq!(second.author, "Стругацкие");
    assert_eq!(second.text_path, None);
    assert!(second.image_path.is_some());
    assert!(second.comments.is_empty());

    // The exported document matches the report
    assert_eq!(report.json_file, dest.path().join(JSON_FILE_NAME));
    assert_eq!(read_json(&report.json_file), report.records);

    let raw = std::fs::read_to_string(&report.json_file).unwrap();
    assert!(raw.contains("Солярис"));
    assert!(raw.contains(r#""book_path": null"#));

    assert_eq!(
        std::fs::read_to_string(dest.path().join("books").join("1_Солярис.txt")).unwrap(),
        "Текст Солярис"
    );

    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(report.stats.items_processed, 2);
    assert_eq!(report.stats.texts_stored, 1);
    assert_eq!(report.stats.texts_absent, 1);
    assert_eq!(report.stats.images_stored, 2);
}

#[tokio::test]
async fn test_malformed_item_is_skipped() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    mount_listing(&server, 1, listing_html(&[1, 2, 3], &[])).await;
    mount_item(&server, 1, "Первая").await;
    mount_item(&server, 3, "Третья").await;

    // Heading without a title/author separator
    mount_detail(&server, 2, detail_html(2, "Вторая без автора", &[])).await;
    Mock::given(method("GET"))
        .and(path("/shots/2.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = run_crawl(test_config(&server, dest.path()))
        .await
        .expect("Crawl failed");

    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Первая", "Третья"]);

    assert_eq!(report.stats.items_discovered, 3);
    assert_eq!(report.stats.items_failed, 1);
    assert_eq!(
        report.stats.failed_items,
        vec![format!("{}/b2/", server.uri())]
    );
    assert_eq!(read_json(&report.json_file).len(), 2);
}

#[tokio::test]
async fn test_network_failures_are_isolated_per_item() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    mount_listing(&server, 1, listing_html(&[1, 2, 3, 4], &[])).await;
    mount_item(&server, 1, "Один").await;
    mount_item(&server, 4, "Четыре").await;

    // Item 2: detail page errors out
    Mock::given(method("GET"))
        .and(path("/b2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // Item 3: cover image is referenced but missing
    mount_detail(&server, 3, detail_html(3, "Три :: Автор", &[])).await;
    Mock::given(method("GET"))
        .and(path("/shots/3.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let report = run_crawl(test_config(&server, dest.path()))
        .await
        .expect("Crawl failed");

    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Один", "Четыре"]);
    assert_eq!(report.stats.items_failed, 2);
}

#[tokio::test]
async fn test_unusable_cover_link_only_matters_with_images() {
    let server = MockServer::start().await;
    let cover_html = r#"<html><body><h1>Без обложки :: Автор</h1>
        <div class="bookimage"><img src="data:image/gif;base64,R0lGOD"></div>
        </body></html>"#;

    mount_listing(&server, 1, listing_html(&[8], &[])).await;
    mount_detail(&server, 8, cover_html.to_string()).await;
    mount_text(&server, 8, "текст").await;

    // Covers requested: the item fails
    let dest = tempdir().unwrap();
    let report = run_crawl(test_config(&server, dest.path()))
        .await
        .expect("Crawl failed");
    assert!(report.records.is_empty());
    assert_eq!(report.stats.items_failed, 1);

    // Covers skipped: the item is kept
    let dest = tempdir().unwrap();
    let mut config = test_config(&server, dest.path());
    config.skip_images = true;
    let report = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].title, "Без обложки");
    assert!(report.records[0].text_path.is_some());
}

#[tokio::test]
async fn test_end_page_discovered_from_pagination() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    mount_listing(&server, 1, listing_html(&[1], &[2, 3])).await;
    mount_listing(&server, 2, listing_html(&[2], &[1, 3])).await;
    mount_listing(&server, 3, listing_html(&[3], &[1, 2])).await;
    Mock::given(method("GET"))
        .and(path("/l55/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for id in 1..=3 {
        mount_detail(&server, id, detail_html(id, &format!("Книга {} :: Автор", id), &[])).await;
    }

    let mut config = test_config(&server, dest.path());
    config.skip_images = true;
    config.skip_text = true;

    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages, 1..=3);
    assert_eq!(report.stats.pages_fetched, 3);

    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Книга 1", "Книга 2", "Книга 3"]);
}

#[tokio::test]
async fn test_discovered_end_before_start_is_clamped() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    // Page 4 only links back to pages 2 and 3
    mount_listing(&server, 4, listing_html(&[7], &[2, 3])).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/l55/[1-35-9]$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_detail(&server, 7, detail_html(7, "Семь :: Автор", &[])).await;

    let mut config = test_config(&server, dest.path());
    config.start_page = 4;
    config.skip_images = true;
    config.skip_text = true;

    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages, 4..=4);
    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn test_explicit_page_range() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/l55/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_listing(&server, 2, listing_html(&[20], &[1, 2, 3, 4, 5])).await;
    mount_listing(&server, 3, listing_html(&[30], &[1, 2, 3, 4, 5])).await;
    mount_detail(&server, 20, detail_html(20, "Двадцать :: Автор", &[])).await;
    mount_detail(&server, 30, detail_html(30, "Тридцать :: Автор", &[])).await;

    let mut config = test_config(&server, dest.path());
    config.start_page = 2;
    config.end_page = Some(3);
    config.skip_images = true;
    config.skip_text = true;

    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages, 2..=3);
    assert_eq!(report.records.len(), 2);
}

#[tokio::test]
async fn test_skip_flags_create_no_payload_folders() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    mount_listing(&server, 1, listing_html(&[1], &[])).await;
    mount_detail(&server, 1, detail_html(1, "Книга :: Автор", &["Комментарий"])).await;
    Mock::given(method("GET"))
        .and(path("/shots/1.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server, dest.path());
    config.skip_images = true;
    config.skip_text = true;

    let report = run_crawl(config).await.expect("Crawl failed");

    assert!(!dest.path().join("images").exists());
    assert!(!dest.path().join("books").exists());

    let record = &report.records[0];
    assert_eq!(record.image_path, None);
    assert_eq!(record.text_path, None);
    assert_eq!(record.comments, vec!["Комментарий"]);
}

#[tokio::test]
async fn test_listing_failure_aborts_run() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    mount_listing(&server, 1, listing_html(&[1], &[])).await;
    Mock::given(method("GET"))
        .and(path("/l55/2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b1/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server, dest.path());
    config.end_page = Some(2);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let err = coordinator.run().await.unwrap_err();

    assert!(matches!(
        err,
        MirrorError::Network(NetworkError::BadStatus { status: 503, .. })
    ));
    assert_eq!(coordinator.phase(), CrawlPhase::CollectItemUrls);
    assert!(!dest.path().join(JSON_FILE_NAME).exists());
}

#[tokio::test]
async fn test_discovery_fetch_failure_aborts_run() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/l55/1"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/"))
        .mount(&server)
        .await;

    let err = run_crawl(test_config(&server, dest.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MirrorError::Network(NetworkError::BadStatus { status: 301, .. })
    ));
    assert!(!dest.path().join(JSON_FILE_NAME).exists());
}

#[tokio::test]
async fn test_json_path_override() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();
    let json_dir = tempdir().unwrap();
    let json_path = json_dir.path().join("export");

    mount_listing(&server, 1, listing_html(&[], &[])).await;

    let mut config = test_config(&server, dest.path());
    config.json_path = Some(json_path.clone());

    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.json_file, json_path.join(JSON_FILE_NAME));
    assert!(read_json(&report.json_file).is_empty());
    assert!(!dest.path().join(JSON_FILE_NAME).exists());
}

#[tokio::test]
async fn test_unsafe_title_stays_inside_destination() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    mount_listing(&server, 1, listing_html(&[5], &[])).await;
    mount_detail(
        &server,
        5,
        detail_html(5, "../../Война/мир: том?* :: Толстой", &[]),
    )
    .await;
    mount_image(&server, 5).await;
    mount_text(&server, 5, "текст").await;

    let report = run_crawl(test_config(&server, dest.path()))
        .await
        .expect("Crawl failed");

    let text_path = report.records[0].text_path.clone().unwrap();
    assert_eq!(
        text_path,
        dest.path().join("books").join("5_....Войнамир том.txt")
    );
    assert!(text_path.starts_with(dest.path()));
    assert!(text_path.exists());
}

#[tokio::test]
async fn test_concurrent_processing_keeps_discovery_order() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    let ids = [1u64, 2, 3, 4, 5, 6];
    mount_listing(&server, 1, listing_html(&ids, &[])).await;
    for id in ids {
        // Earlier items answer slower, so completion order is reversed
        let delay = Duration::from_millis(60 * (ids.len() as u64 - id));
        mount_detail_delayed(
            &server,
            id,
            detail_html(id, &format!("Книга {} :: Автор", id), &[]),
            delay,
        )
        .await;
    }

    let mut config = test_config(&server, dest.path());
    config.skip_images = true;
    config.skip_text = true;
    config.settings.crawl.concurrency = 3;

    let report = run_crawl(config).await.expect("Crawl failed");

    let titles: Vec<String> = report.records.iter().map(|r| r.title.clone()).collect();
    let expected: Vec<String> = ids.iter().map(|id| format!("Книга {}", id)).collect();
    assert_eq!(titles, expected);
}

#[tokio::test]
async fn test_invalid_config_rejected_before_network() {
    let server = MockServer::start().await;
    let dest = tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server, dest.path());
    config.start_page = 3;
    config.end_page = Some(1);

    let err = run_crawl(config).await.unwrap_err();
    assert!(matches!(err, MirrorError::Config(_)));
}
