//! End-to-end flows against a mocked backend.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::cart::CartCommand;
use crate::checkout::SubmissionState;
use crate::config::Config;
use crate::domain::{MenuItem, PaymentMethod};
use crate::error::{CheckoutError, HistoryError};
use crate::kot::MemoryPrinter;
use crate::session::PosSession;

fn test_config(server: &MockServer) -> Config {
    let mut config = Config::new(server.uri());
    config.search_debounce = Duration::from_millis(1);
    config.message_delay = Duration::from_millis(1);
    config.print_pause = Duration::from_millis(1);
    config
}

fn session(server: &MockServer) -> PosSession<MemoryPrinter> {
    PosSession::new(test_config(server), MemoryPrinter::default()).unwrap()
}

fn margherita() -> MenuItem {
    MenuItem {
        id: "item-1".to_string(),
        name: "Margherita Pizza".to_string(),
        category: "Pizza".to_string(),
        price: 299.0,
        available: true,
    }
}

#[tokio::test]
async fn placing_an_order_posts_once_clears_the_cart_and_prints_two_tickets() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_json(json!({
            "customerName": "Guest",
            "customerMobile": "N/A",
            "items": [{"itemName": "Margherita Pizza", "qty": 2, "price": 299.0}],
            "totalAmount": 598.0,
            "totalPrice": 598.0,
            "status": "Completed",
            "paymentMethod": "Cash"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "64f1c2a9e8b4d7039a5f12cd",
            "status": "Completed",
            "totalAmount": 598.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.dispatch(CartCommand::Add { item: margherita() });
    session.dispatch(CartCommand::Add { item: margherita() });

    let receipt = session.place_order(PaymentMethod::Cash).await.unwrap();

    assert_eq!(receipt.order_id, "64f1c2a9e8b4d7039a5f12cd");
    assert_eq!(receipt.total_amount, 598.0);
    assert_eq!(receipt.message, "Order placed successfully!");
    assert_eq!(session.submission_state(), SubmissionState::Succeeded);
    assert!(session.cart().is_empty());
    assert!(session.cart().customer.name.is_empty());

    let printed = &session.printer().printed;
    assert_eq!(printed.len(), 2);
    assert!(printed[0].contains("Order: #9a5f12cd"));
    assert!(printed[0].contains("2 x Margherita Pizza"));

    session.settle().await;
    assert_eq!(session.submission_state(), SubmissionState::Idle);
}

#[tokio::test]
async fn an_empty_cart_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session(&server);
    let err = session.place_order(PaymentMethod::Cash).await.unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(session.submission_state(), SubmissionState::Idle);
    assert!(session.printer().printed.is_empty());
}

#[tokio::test]
async fn a_failed_submission_keeps_the_cart_for_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.dispatch(CartCommand::Add { item: margherita() });
    session.dispatch(CartCommand::UpdateCustomer {
        name: Some("Asha".to_string()),
        mobile: None,
    });

    let err = session.place_order(PaymentMethod::Online).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Api(_)));
    assert_eq!(session.submission_state(), SubmissionState::Failed);
    assert_eq!(session.cart().lines().len(), 1);
    assert_eq!(session.cart().customer.name, "Asha");
    assert!(session.printer().printed.is_empty());

    session.settle().await;
    assert_eq!(session.submission_state(), SubmissionState::Idle);
}

#[tokio::test]
async fn catalog_refresh_joins_items_with_category_labels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "c1", "categoryName": "Pizza"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
            {"_id": "i1", "itemName": "Margherita Pizza", "price": 299.0, "categoryId": "c1"},
            {"_id": "i2", "itemName": "Masala Chai", "price": 30.0}
        ]})))
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.refresh_catalog().await.unwrap();

    let catalog = session.catalog();
    assert_eq!(catalog.categories, vec!["Pizza".to_string()]);
    assert_eq!(catalog.items.len(), 2);
    assert_eq!(catalog.find_item("i1").unwrap().category, "Pizza");
    assert_eq!(catalog.find_item("i2").unwrap().category, "Uncategorized");
    // isAvailable was absent on both rows.
    assert!(catalog.items.iter().all(|item| item.available));
}

#[tokio::test]
async fn adding_a_menu_item_posts_it_and_refreshes_the_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_json(json!({
            "itemName": "Paneer Tikka",
            "categoryId": "c1",
            "price": 240.0,
            "isAvailable": true
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "c1", "categoryName": "Starters"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "i9", "itemName": "Paneer Tikka", "price": 240.0, "categoryId": "c1"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session
        .catalog_mut()
        .add_item(&crate::api::ItemPayload {
            item_name: "Paneer Tikka".to_string(),
            category_id: "c1".to_string(),
            price: 240.0,
            is_available: true,
        })
        .await
        .unwrap();

    assert_eq!(session.catalog().find_item("i9").unwrap().category, "Starters");
}

#[tokio::test]
async fn a_bare_order_array_falls_back_to_local_page_math() {
    let server = MockServer::start().await;
    let orders: Vec<_> = (0..25)
        .map(|i| json!({"_id": format!("order-{i}"), "status": "Pending", "totalAmount": 100.0}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(orders)))
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.history_mut().refresh().await.unwrap();

    assert_eq!(session.history().total_pages(), 3);
    assert_eq!(session.history().stats().total_orders, 25);
    assert_eq!(session.history().stats().pending, 25);
    assert_eq!(session.history().stats().total_revenue, 0.0);
}

#[tokio::test]
async fn changing_the_search_term_fetches_page_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [],
            "totalPages": 5
        })))
        .mount(&server)
        .await;

    let mut session = session(&server);
    let history = session.history_mut();
    history.refresh().await.unwrap();
    history.set_page(3);
    assert_eq!(history.page(), 3);

    assert!(history.set_search("pizza"));
    history.refresh_debounced().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    // Paginated fetches carry the search parameter even when it is blank.
    for req in requests
        .iter()
        .filter(|req| req.url.query_pairs().any(|(key, _)| key == "page"))
    {
        assert!(req.url.query_pairs().any(|(key, _)| key == "search"));
    }

    let paginated: Vec<_> = requests
        .into_iter()
        .filter(|req| {
            req.url
                .query_pairs()
                .any(|(key, value)| key == "search" && value == "pizza")
        })
        .collect();
    assert!(!paginated.is_empty());
    for req in paginated {
        let page = req
            .url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.to_string());
        assert_eq!(page.as_deref(), Some("1"));
    }
}

#[tokio::test]
async fn completing_an_order_puts_the_status_then_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [
                {"_id": "open-1", "status": "Pending", "totalAmount": 100.0},
                {"_id": "done-1", "status": "Completed", "totalAmount": 200.0}
            ],
            "totalPages": 1
        })))
        .mount(&server)
        .await;
    // Status patches go out lowercase; only the initial POST capitalizes.
    Mock::given(method("PUT"))
        .and(path("/orders/open-1"))
        .and(body_json(json!({"status": "completed"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.history_mut().refresh().await.unwrap();

    // Already-final orders are refused before any network call.
    let err = session.complete_order("done-1").await.unwrap_err();
    assert!(matches!(err, HistoryError::OrderFinal { .. }));

    session.complete_order("open-1").await.unwrap();
}

#[tokio::test]
async fn reprinting_a_history_order_shows_its_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "_id": "64f1c2a9e8b4d7039a5f12cd",
                "customerName": "Asha",
                "status": "Completed",
                "totalAmount": 598.0,
                "paymentMethod": "Online",
                "items": [{"itemName": "Margherita Pizza", "qty": 2, "price": 299.0}]
            }
        ])))
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.history_mut().refresh().await.unwrap();
    session.reprint("64f1c2a9e8b4d7039a5f12cd").await.unwrap();

    let printed = &session.printer().printed;
    assert_eq!(printed.len(), 2);
    // Reprints show the normalized status, whatever casing was stored.
    assert!(printed[0].contains("Status: completed"));
    assert!(printed[0].contains("Name:  Asha"));
    assert!(printed[0].contains("₹598.00"));
}
