//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small book catalog and run the full
//! crawl cycle against it end-to-end.

use std::time::{Duration, Instant};
use sumi_shelf::config::Config;
use sumi_shelf::crawler::{Coordinator, CrawlFatal};
use sumi_shelf::state::TraversalState;
use sumi_shelf::{crawl, ShelfError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POETRY: &str = "/catalogue/category/books/poetry_23/index.html";
const POETRY_2: &str = "/catalogue/category/books/poetry_23/page-2.html";
const TRAVEL: &str = "/catalogue/category/books/travel_2/index.html";

/// Creates a test configuration pointing at the mock catalog
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.crawler.root_url = format!("{}/", server.uri());
    config.crawler.request_timeout_secs = 5;
    config.crawler.detail_delay_ms = 0;
    config
}

fn root_page(categories: &[(&str, &str)]) -> String {
    let mut entries = String::new();
    for (name, href) in categories {
        entries.push_str(&format!(
            "<li><a href=\"{}\">\n    {}\n</a></li>\n",
            href.trim_start_matches('/'),
            name
        ));
    }
    format!(
        r#"<html><body>
        <ul class="nav nav-list">
          <li><a href="catalogue/category/books_1/index.html">Books</a>
            <ul>{entries}</ul>
          </li>
        </ul>
        </body></html>"#
    )
}

/// A listing item as (title, detail href, displayed price)
struct Item {
    title: String,
    href: String,
    price: String,
}

fn listing_page(items: &[Item], next: Option<&str>) -> String {
    let mut body = String::from("<html><body><ol class=\"row\">");
    for item in items {
        body.push_str(&format!(
            r#"<li><article class="product_pod">
                 <h3><a href="{}" title="{}">{}...</a></h3>
                 <div class="product_price"><p class="price_color">{}</p></div>
               </article></li>"#,
            item.href, item.title, item.title, item.price
        ));
    }
    body.push_str("</ol>");
    if let Some(next) = next {
        body.push_str(&format!(
            r#"<ul class="pager"><li class="next"><a href="{}">next</a></li></ul>"#,
            next
        ));
    }
    body.push_str("</body></html>");
    body
}

fn detail_page(description: &str) -> String {
    format!(
        r#"<html><head><meta name="description" content="{}" /></head><body></body></html>"#,
        description
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts detail pages for `count` books and returns their listing items
async fn mount_books(server: &MockServer, slug: &str, count: usize, with_isbn: bool) -> Vec<Item> {
    let mut items = Vec::with_capacity(count);
    for i in 1..=count {
        let book = format!("{}-{}_{}", slug, i, i);
        let description = if with_isbn {
            format!("Book {} of {}. ISBN: 978-0-00-{:06}-1", i, slug, i)
        } else {
            format!("Book {} of {}.", i, slug)
        };
        mount_page(
            server,
            &format!("/catalogue/{}/index.html", book),
            detail_page(&description),
        )
        .await;

        items.push(Item {
            title: format!("{} {}", slug, i),
            href: format!("../../../{}/index.html", book),
            price: format!("£{}.{:02}", 10 + i, i),
        });
    }
    items
}

#[tokio::test]
async fn test_pagination_and_genre_consistency() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        root_page(&[("Poetry", POETRY), ("Travel", TRAVEL)]),
    )
    .await;

    let mut poetry = mount_books(&server, "poem", 25, true).await;
    let poetry_page_2 = poetry.split_off(20);
    mount_page(&server, POETRY, listing_page(&poetry, Some("page-2.html"))).await;
    mount_page(&server, POETRY_2, listing_page(&poetry_page_2, None)).await;

    let travel = mount_books(&server, "trip", 3, true).await;
    mount_page(&server, TRAVEL, listing_page(&travel, None)).await;

    let result = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(result.len(), 28);
    assert_eq!(result.by_genre("Poetry").count(), 25);
    assert_eq!(result.by_genre("Travel").count(), 3);

    // Category order, then page order, then in-page order
    let titles: Vec<_> = result.records().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles[0], "poem 1");
    assert_eq!(titles[20], "poem 21");
    assert_eq!(titles[24], "poem 25");
    assert_eq!(titles[25], "trip 1");

    let first = &result.records()[0];
    assert_eq!(first.price, 11.01);
    assert_eq!(first.description, "Book 1 of poem. ISBN: 978-0-00-000001-1");
    assert_eq!(first.isbn.as_deref(), Some("978-0-00-000001-1"));
}

#[tokio::test]
async fn test_catch_all_category_is_not_crawled() {
    let server = MockServer::start().await;

    mount_page(&server, "/", root_page(&[("Travel", TRAVEL)])).await;
    let travel = mount_books(&server, "trip", 2, true).await;
    mount_page(&server, TRAVEL, listing_page(&travel, None)).await;

    let coordinator = Coordinator::new(&create_test_config(&server)).unwrap();
    let (result, report) = coordinator.crawl_with_report().await.unwrap();

    let names: Vec<_> = report.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Travel"]);
    assert_eq!(result.len(), 2);
    assert!(result.records().iter().all(|r| r.genre == "Travel"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| r.url.path() != "/catalogue/category/books_1/index.html"));
}

#[tokio::test]
async fn test_bad_item_is_skipped_alone() {
    let server = MockServer::start().await;

    mount_page(&server, "/", root_page(&[("Poetry", POETRY)])).await;

    let mut items = mount_books(&server, "poem", 4, true).await;
    items[1].price = "call for price".to_string();
    // Detail page that is never mounted, so it answers 404
    items[2].href = "../../../missing_99/index.html".to_string();
    mount_page(&server, POETRY, listing_page(&items, None)).await;

    let coordinator = Coordinator::new(&create_test_config(&server)).unwrap();
    let (result, report) = coordinator.crawl_with_report().await.unwrap();

    let titles: Vec<_> = result.records().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["poem 1", "poem 4"]);

    let poetry = &report.categories[0];
    assert_eq!(poetry.extracted, 2);
    assert_eq!(poetry.skipped, 2);
    assert_eq!(poetry.end, TraversalState::Exhausted);
}

#[tokio::test]
async fn test_failed_page_abandons_only_its_category() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        root_page(&[("Poetry", POETRY), ("Travel", TRAVEL)]),
    )
    .await;

    let poetry = mount_books(&server, "poem", 20, true).await;
    mount_page(&server, POETRY, listing_page(&poetry, Some("page-2.html"))).await;
    Mock::given(method("GET"))
        .and(path(POETRY_2))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let travel = mount_books(&server, "trip", 3, true).await;
    mount_page(&server, TRAVEL, listing_page(&travel, None)).await;

    let coordinator = Coordinator::new(&create_test_config(&server)).unwrap();
    let (result, report) = coordinator.crawl_with_report().await.unwrap();

    assert_eq!(result.by_genre("Poetry").count(), 20);
    assert_eq!(result.by_genre("Travel").count(), 3);

    assert_eq!(report.categories[0].end, TraversalState::Failed);
    assert_eq!(report.categories[0].pages, 1);
    assert!(report.categories[0].failure.is_some());
    assert_eq!(report.categories[1].end, TraversalState::Exhausted);
    assert_eq!(report.failed_categories(), 1);
}

#[tokio::test]
async fn test_unreachable_root_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server);

    let coordinator = Coordinator::new(&config).unwrap();
    assert!(matches!(
        coordinator.crawl().await,
        Err(CrawlFatal::RootUnreachable(_))
    ));

    assert!(matches!(crawl(&config).await, Err(ShelfError::Crawl(_))));

    // Nothing beyond the root was requested
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() == "/"));
}

#[tokio::test]
async fn test_root_without_navigation_is_fatal() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<html><body>Under maintenance</body></html>".to_string()).await;

    let coordinator = Coordinator::new(&create_test_config(&server)).unwrap();
    assert!(matches!(
        coordinator.crawl().await,
        Err(CrawlFatal::RootUnparsable { .. })
    ));
}

#[tokio::test]
async fn test_missing_isbn_is_not_an_error() {
    let server = MockServer::start().await;

    mount_page(&server, "/", root_page(&[("Poetry", POETRY)])).await;
    let mut items = mount_books(&server, "poem", 2, true).await;
    items.extend(mount_books(&server, "verse", 2, false).await);
    mount_page(&server, POETRY, listing_page(&items, None)).await;

    let result = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(result.len(), 4);
    let isbns: Vec<_> = result.records().iter().map(|r| r.isbn.is_some()).collect();
    assert_eq!(isbns, vec![true, true, false, false]);
    assert_eq!(result.records()[2].description, "Book 1 of verse.");
}

#[tokio::test]
async fn test_timed_out_category_keeps_other_records() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        root_page(&[("Poetry", POETRY), ("Travel", TRAVEL)]),
    )
    .await;

    let poetry = mount_books(&server, "poem", 2, true).await;
    mount_page(&server, POETRY, listing_page(&poetry, None)).await;

    let travel = mount_books(&server, "trip", 3, true).await;
    Mock::given(method("GET"))
        .and(path(TRAVEL))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&travel, None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.crawler.request_timeout_secs = 1;

    let coordinator = Coordinator::new(&config).unwrap();
    let (result, report) = coordinator.crawl_with_report().await.unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.records().iter().all(|r| r.genre == "Poetry"));
    assert_eq!(report.categories[1].name, "Travel");
    assert_eq!(report.categories[1].end, TraversalState::Failed);
    assert_eq!(report.categories[1].pages, 0);
}

#[tokio::test]
async fn test_next_link_cycle_ends_category() {
    let server = MockServer::start().await;

    mount_page(&server, "/", root_page(&[("Poetry", POETRY)])).await;

    let mut poetry = mount_books(&server, "poem", 4, true).await;
    let page_2 = poetry.split_off(2);
    mount_page(&server, POETRY, listing_page(&poetry, Some("page-2.html"))).await;
    mount_page(&server, POETRY_2, listing_page(&page_2, Some("index.html"))).await;

    let coordinator = Coordinator::new(&create_test_config(&server)).unwrap();
    let (result, report) = coordinator.crawl_with_report().await.unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(report.categories[0].pages, 2);
    assert_eq!(report.categories[0].end, TraversalState::Failed);
}

#[tokio::test]
async fn test_crawl_is_repeatable() {
    let server = MockServer::start().await;

    mount_page(&server, "/", root_page(&[("Travel", TRAVEL)])).await;
    let travel = mount_books(&server, "trip", 3, false).await;
    mount_page(&server, TRAVEL, listing_page(&travel, None)).await;

    let coordinator = Coordinator::new(&create_test_config(&server)).unwrap();
    let first = coordinator.crawl().await.unwrap();
    let second = coordinator.crawl().await.unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_listing_page_is_valid() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        root_page(&[("Poetry", POETRY), ("Travel", TRAVEL)]),
    )
    .await;
    mount_page(&server, POETRY, listing_page(&[], None)).await;
    let travel = mount_books(&server, "trip", 1, true).await;
    mount_page(&server, TRAVEL, listing_page(&travel, None)).await;

    let coordinator = Coordinator::new(&create_test_config(&server)).unwrap();
    let (result, report) = coordinator.crawl_with_report().await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(report.categories[0].end, TraversalState::Exhausted);
    assert_eq!(report.categories[0].extracted, 0);
}

#[tokio::test]
async fn test_pause_follows_each_extracted_item_only() {
    let server = MockServer::start().await;

    mount_page(&server, "/", root_page(&[("Poetry", POETRY)])).await;

    let mut items = mount_books(&server, "poem", 2, true).await;
    // Listed, but its detail page answers 404
    items.push(Item {
        title: "lost poem".to_string(),
        href: "../../../lost_9/index.html".to_string(),
        price: "£9.99".to_string(),
    });
    mount_page(&server, POETRY, listing_page(&items, None)).await;

    let mut config = create_test_config(&server);
    config.crawler.detail_delay_ms = 300;

    let coordinator = Coordinator::new(&config).unwrap();
    let start = Instant::now();
    let result = coordinator.crawl().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result.len(), 2);
    // Two pauses; none for the root, the listing page or the skipped item
    assert!(elapsed >= Duration::from_millis(600), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(900), "{:?}", elapsed);
}

#[tokio::test]
async fn test_genre_ignores_genre_text_on_pages() {
    let server = MockServer::start().await;

    mount_page(&server, "/", root_page(&[("Poetry", POETRY)])).await;

    let book = "misfiled-1_1";
    mount_page(
        &server,
        &format!("/catalogue/{}/index.html", book),
        r#"<html><head>
             <meta name="description" content="Shelved with the thrillers." />
             <meta name="genre" content="Mystery" />
           </head><body>
             <ul class="breadcrumb"><li><a href="../index.html">Home</a></li>
               <li><a href="../category/books/mystery_3/index.html">Mystery</a></li></ul>
           </body></html>"#
            .to_string(),
    )
    .await;

    let items = vec![Item {
        title: "Misfiled".to_string(),
        href: format!("../../../{}/index.html", book),
        price: "£12.50".to_string(),
    }];
    let listing = listing_page(&items, None).replace(
        "<body>",
        r#"<body><ul class="breadcrumb"><li>Home</li><li class="active">Mystery</li></ul>
           <div class="page-header"><h1>Mystery</h1></div>"#,
    );
    mount_page(&server, POETRY, listing).await;

    let result = crawl(&create_test_config(&server)).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.records()[0].genre, "Poetry");
    assert_eq!(result.records()[0].description, "Shelved with the thrillers.");
}
