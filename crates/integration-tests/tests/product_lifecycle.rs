//! Get/update/delete contract: id validation, per-field update rules, and
//! the soft-delete life cycle.

use axum::http::StatusCode;
use serde_json::json;

use kirana_integration_tests::{
    MultipartForm, ProductPayload, bare_request, create_product, multipart_request, send, test_app,
};

const UNKNOWN_ID: &str = "64f0aa11bb22cc33dd44ee55";

#[tokio::test]
async fn fetches_an_active_record_by_id() {
    let (app, _store, _uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    let (status, body) = send(&app, bare_request("GET", &format!("/products/{id}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["_id"], json!(id));
    assert_eq!(body["data"]["title"], "Red Shirt");
}

#[tokio::test]
async fn rejects_malformed_ids_on_every_endpoint() {
    let (app, _store, _uploader) = test_app();

    for request in [
        bare_request("GET", "/products/not-an-id"),
        multipart_request("PUT", "/products/not-an-id", MultipartForm::new()),
        bare_request("DELETE", "/products/not-an-id"),
    ] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "productId is invalid");
    }
}

#[tokio::test]
async fn a_well_formed_unknown_id_is_not_found() {
    let (app, _store, _uploader) = test_app();

    let (status, body) = send(
        &app,
        bare_request("GET", &format!("/products/{UNKNOWN_ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn updates_price_with_normalization() {
    let (app, _store, _uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    let form = MultipartForm::new().text("price", "25.5");
    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], "25.50");

    let form = MultipartForm::new().text("price", "twenty");
    let (status, _body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_title_checks_uniqueness_and_validity() {
    let (app, _store, _uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;
    create_product(&app, ProductPayload::valid("Blue Kurta")).await;

    let form = MultipartForm::new().text("title", "Blue Kurta");
    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "title already present");

    let form = MultipartForm::new().text("title", "Shirt 2");
    let (status, _body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let form = MultipartForm::new().text("title", "Crimson Shirt");
    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Crimson Shirt");
}

#[tokio::test]
async fn update_free_shipping_only_accepts_true() {
    let (app, _store, _uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    let form = MultipartForm::new().text("isFreeShipping", "false");
    let (status, _body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let form = MultipartForm::new().text("isFreeShipping", "true");
    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isFreeShipping"], "true");
}

#[tokio::test]
async fn update_appends_one_new_size() {
    let (app, _store, _uploader) = test_app();
    // Reference payload carries [S, M]
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    let form = MultipartForm::new().text("availableSizes", "XL");
    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["availableSizes"], json!(["S", "M", "XL"]));

    // Already-present sizes are rejected
    let form = MultipartForm::new().text("availableSizes", "M");
    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "size already exists");

    // Unknown codes are rejected
    let form = MultipartForm::new().text("availableSizes", "XXS");
    let (status, _body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_replaces_the_product_image() {
    let (app, _store, uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    let form = MultipartForm::new().file("productImage", "new.png", "image/png", b"new bytes");
    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["productImage"],
        "https://cdn.test/products/new.png"
    );
    assert_eq!(
        uploader.uploads(),
        vec!["shirt.png".to_string(), "new.png".to_string()]
    );
}

#[tokio::test]
async fn update_with_no_recognized_change_is_rejected() {
    let (app, _store, _uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), MultipartForm::new()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some_and(|m| m.contains("data")));
}

#[tokio::test]
async fn update_soft_delete_stamps_deleted_at_and_hides_the_record() {
    let (app, _store, _uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    let form = MultipartForm::new().text("isDeleted", "true");
    let (status, body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isDeleted"], true);
    assert!(body["data"]["deletedAt"].as_str().is_some());

    // The record is no longer reachable
    let (status, _body) = send(&app, bare_request("GET", &format!("/products/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nor updatable
    let form = MultipartForm::new().text("price", "30");
    let (status, _body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_ignores_non_true_is_deleted_values() {
    let (app, _store, _uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    // "false" is not a recognized change on its own
    let form = MultipartForm::new().text("isDeleted", "false");
    let (status, _body) = send(
        &app,
        multipart_request("PUT", &format!("/products/{id}"), form),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_succeeds_once_then_reports_already_deleted() {
    let (app, store, _uploader) = test_app();
    let id = create_product(&app, ProductPayload::valid("Red Shirt")).await;

    let (status, body) = send(&app, bare_request("DELETE", &format!("/products/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);

    // The record still exists, flagged and stamped
    let records = store.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_deleted);
    assert!(records[0].deleted_at.is_some());

    let (status, body) = send(&app, bare_request("DELETE", &format!("/products/{id}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "product already deleted");
}

#[tokio::test]
async fn delete_of_an_unknown_id_reports_already_deleted() {
    let (app, _store, _uploader) = test_app();

    let (status, body) = send(
        &app,
        bare_request("DELETE", &format!("/products/{UNKNOWN_ID}")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "product already deleted");
}
