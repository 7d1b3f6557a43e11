//! Mock catalog helpers shared by the integration tests

use bookshelf_mirror::config::CrawlConfig;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CATEGORY: u32 = 55;

/// Creates a test configuration pointing at the mock server
pub fn test_config(server: &MockServer, dest: &Path) -> CrawlConfig {
    let mut config = CrawlConfig::new(CATEGORY, dest);
    config.settings.site.base_url = server.uri();
    config.settings.http.timeout_secs = 5;
    config.settings.crawl.failure_backoff_ms = 0;
    config
}

/// Listing page markup with one row per item id and the given pagination labels
pub fn listing_html(item_ids: &[u64], pagination: &[u32]) -> String {
    let rows: String = item_ids
        .iter()
        .map(|id| {
            format!(
                r#"<table class="d_book"><tr><td>
                <div class="bookimage"><a href="/b{id}/" title="Книга {id}"><img src="/shots/{id}.jpg"></a></div>
                </td></tr></table>"#
            )
        })
        .collect();

    let labels: String = pagination
        .iter()
        .map(|page| format!(r#"<a class="npage" href="/l{CATEGORY}/{page}/">{page}</a>"#))
        .collect();

    format!(
        r#"<html><body><div id="content">{rows}</div><p class="center">{labels}</p></body></html>"#
    )
}

/// Detail page markup for an item
pub fn detail_html(id: u64, heading: &str, comments: &[&str]) -> String {
    let comments: String = comments
        .iter()
        .map(|c| format!(r#"<div class="texts"><b>Читатель</b><br><span class="black">{c}</span></div>"#))
        .collect();

    format!(
        r#"<html><body>
        <h1>{heading}</h1>
        <div class="bookimage"><a href="/b{id}/"><img src="/shots/{id}.jpg"></a></div>
        <span class="d_book"><b>Жанр книги:</b> <a href="/l{CATEGORY}/">Научная фантастика</a></span>
        {comments}
        </body></html>"#
    )
}

pub async fn mount_listing(server: &MockServer, page: u32, html: String) {
    Mock::given(method("GET"))
        .and(path(format!("/l{}/{}", CATEGORY, page)))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

pub async fn mount_detail(server: &MockServer, id: u64, html: String) {
    mount_detail_delayed(server, id, html, Duration::ZERO).await;
}

pub async fn mount_detail_delayed(server: &MockServer, id: u64, html: String, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(format!("/b{}/", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

pub async fn mount_image(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/shots/{}.jpg", id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xd8, id as u8]))
        .mount(server)
        .await;
}

pub async fn mount_text(server: &MockServer, id: u64, body: &str) {
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// The catalog redirects text requests for books without a file
pub async fn mount_text_missing(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", id.to_string()))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
        .mount(server)
        .await;
}

/// Mounts a complete, well-formed item (detail page, cover and text)
pub async fn mount_item(server: &MockServer, id: u64, title: &str) {
    let heading = format!("{} :: Автор {}", title, id);
    mount_detail(server, id, detail_html(id, &heading, &["Хорошая книга"])).await;
    mount_image(server, id).await;
    mount_text(server, id, &format!("Текст {}", title)).await;
}
