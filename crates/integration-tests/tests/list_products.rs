//! List/filter contract: typed predicate construction, sort, and the
//! lightweight price-parse error path.

use axum::Router;
use axum::http::StatusCode;

use kirana_integration_tests::{ProductPayload, bare_request, create_product, send, test_app};

/// Three products with distinct prices and size sequences.
async fn seed(app: &Router) -> Vec<String> {
    let mut ids = Vec::new();
    for (title, price, sizes) in [
        ("Red Shirt", "5", "S"),
        ("Blue Kurta", "20", "S, M"),
        ("Silk Saree", "60", "M"),
    ] {
        let payload = ProductPayload::valid(title).price(price).sizes(sizes);
        ids.push(create_product(app, payload).await);
    }
    ids
}

fn titles(body: &serde_json::Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .expect("data is a list")
        .iter()
        .map(|record| record["title"].as_str().expect("title"))
        .collect()
}

#[tokio::test]
async fn no_parameters_returns_all_active_records() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    let (status, body) = send(&app, bare_request("GET", "/products")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(
        titles(&body),
        vec!["Red Shirt", "Blue Kurta", "Silk Saree"]
    );
}

#[tokio::test]
async fn soft_deleted_records_never_appear() {
    let (app, _store, _uploader) = test_app();
    let ids = seed(&app).await;

    let (status, _body) = send(
        &app,
        bare_request("DELETE", &format!("/products/{}", ids[0])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, bare_request("GET", "/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Blue Kurta", "Silk Saree"]);
}

#[tokio::test]
async fn size_filter_matches_the_whole_sequence() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    // "Blue Kurta" offers S among others but its sequence is [S, M]; the
    // filter is whole-sequence equality, so only [S] matches.
    let (status, body) = send(&app, bare_request("GET", "/products?size=S")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Red Shirt"]);
}

#[tokio::test]
async fn size_filter_is_case_normalized() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    let (status, body) = send(&app, bare_request("GET", "/products?size=s")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Red Shirt"]);
}

#[tokio::test]
async fn size_filter_rejects_unknown_codes() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    let (status, body) = send(&app, bare_request("GET", "/products?size=XXS")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn name_filter_is_a_case_sensitive_substring() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    let (status, body) = send(&app, bare_request("GET", "/products?name=Shirt")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Red Shirt"]);

    // Lowercase fragment matches nothing
    let (status, _body) = send(&app, bare_request("GET", "/products?name=shirt")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn price_range_bounds_are_exclusive() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        bare_request("GET", "/products?priceGreaterThan=10&priceLessThan=50"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Blue Kurta"]);

    let (status, body) = send(&app, bare_request("GET", "/products?priceGreaterThan=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Blue Kurta", "Silk Saree"]);

    let (status, body) = send(&app, bare_request("GET", "/products?priceLessThan=20")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Red Shirt"]);
}

#[tokio::test]
async fn bad_price_bounds_answer_a_bare_message() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    for uri in [
        "/products?priceGreaterThan=ten",
        "/products?priceLessThan=1.2.3",
        "/products?priceGreaterThan=10&priceLessThan=abc",
    ] {
        let (status, body) = send(&app, bare_request("GET", uri)).await;

        // Distinct lightweight path: 200 with {"message"} and no status field
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body["message"].as_str().is_some_and(|m| m.contains("numbers")));
        assert!(body.get("status").is_none(), "{uri}: {body}");
        assert!(body.get("data").is_none());
    }
}

#[tokio::test]
async fn price_sort_orders_results() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    let (status, body) = send(&app, bare_request("GET", "/products?priceSort=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        vec!["Red Shirt", "Blue Kurta", "Silk Saree"]
    );

    let (status, body) = send(&app, bare_request("GET", "/products?priceSort=-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        vec!["Silk Saree", "Blue Kurta", "Red Shirt"]
    );
}

#[tokio::test]
async fn price_sort_rejects_other_flags() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    let (status, body) = send(&app, bare_request("GET", "/products?priceSort=2")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some_and(|m| m.contains("1 or -1")));
}

#[tokio::test]
async fn an_empty_result_set_is_not_found() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;

    let (status, body) = send(&app, bare_request("GET", "/products?name=Pajama")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "product not found");

    // Same when the store is empty altogether
    let (app, _store, _uploader) = test_app();
    let (status, _body) = send(&app, bare_request("GET", "/products")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn filters_compose() {
    let (app, _store, _uploader) = test_app();
    seed(&app).await;
    create_product(
        &app,
        ProductPayload::valid("Wool Kurta").price("30").sizes("M"),
    )
    .await;

    let (status, body) = send(
        &app,
        bare_request(
            "GET",
            "/products?size=M&priceGreaterThan=10&priceSort=-1",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Silk Saree", "Wool Kurta"]);
    assert_eq!(
        body["data"]
            .as_array()
            .expect("list")
            .iter()
            .map(|r| r["price"].as_str().expect("price"))
            .collect::<Vec<_>>(),
        vec!["60.00", "30.00"]
    );
}
