//! HTTP surface tests: routing, identity headers, status codes and payloads.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use storefront::{configure_routes, MemoryStore, Storefront};
use uuid::Uuid;

const USER: &str = "X-User-Id";
const ROLE: &str = "X-User-Role";

struct Fixture {
    store: MemoryStore,
    state: web::Data<Storefront>,
    merchant: Uuid,
    subcategory: Uuid,
}

fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let subcategory = store.add_subcategory("Mugs");
    let state = web::Data::new(Storefront::new(store.clone()));
    Fixture {
        store,
        state,
        merchant: Uuid::new_v4(),
        subcategory,
    }
}

macro_rules! app {
    ($fx:expr) => {
        test::init_service(
            App::new()
                .app_data($fx.state.clone())
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn merchant_can_create_and_shoppers_can_browse() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/merchant/products")
        .insert_header((USER, fx.merchant.to_string()))
        .insert_header((ROLE, "merchant"))
        .set_json(json!({
            "subcategory_id": fx.subcategory,
            "name": "Blue mug",
            "description": "Holds coffee",
            "price": "9.99",
            "stock": 5
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["price"], "9.99");
    assert_eq!(created["subcategory_name"], "Mugs");

    // Browsing needs no identity.
    let req = test::TestRequest::get().uri("/products?q=coffee").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::get()
        .uri(&format!("/products/{}", created["id"].as_str().expect("product id")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn shoppers_cannot_use_merchant_routes() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/merchant/orders")
        .insert_header((USER, Uuid::new_v4().to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn cart_requires_identity() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/cart").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unknown_product_is_404() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri(&format!("/products/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not found");
}

#[actix_web::test]
async fn checkout_flow_over_http() {
    let fx = fixture();
    let app = app!(fx);
    let shopper = Uuid::new_v4().to_string();

    let req = test::TestRequest::post()
        .uri("/merchant/products")
        .insert_header((USER, fx.merchant.to_string()))
        .insert_header((ROLE, "admin"))
        .set_json(json!({
            "subcategory_id": fx.subcategory,
            "name": "Blue mug",
            "price": "10.00",
            "stock": 5
        }))
        .to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;
    let product_id: Uuid = product["id"].as_str().expect("product id").parse().expect("uuid");

    // More than is on the shelf.
    let req = test::TestRequest::post()
        .uri("/cart/items")
        .insert_header((USER, shopper.clone()))
        .set_json(json!({ "product_id": product_id, "quantity": 6 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/cart/items")
        .insert_header((USER, shopper.clone()))
        .set_json(json!({ "product_id": product_id, "quantity": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/cart/count")
        .insert_header((USER, shopper.clone()))
        .to_request();
    let count: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(count["count"], 3);

    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header((USER, shopper.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["payment_status"], "UNPAID");
    assert_eq!(order["total_amount"], "30.00");
    assert_eq!(fx.store.stock_of(product_id), Some(2));

    // The cart is gone, so a second checkout has nothing to place.
    let req = test::TestRequest::post()
        .uri("/orders")
        .insert_header((USER, shopper.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let order_id = order["id"].as_str().expect("order id").to_string();
    let req = test::TestRequest::post()
        .uri(&format!("/merchant/orders/{order_id}/ship"))
        .insert_header((USER, fx.merchant.to_string()))
        .insert_header((ROLE, "merchant"))
        .set_json(json!({ "tracking_number": "TRK-9" }))
        .to_request();
    let shipped: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(shipped["status"], "SHIPPED");
    assert_eq!(shipped["tracking_number"], "TRK-9");

    let req = test::TestRequest::post()
        .uri(&format!("/orders/{order_id}/cancel"))
        .insert_header((USER, shopper.clone()))
        .to_request();
    let cancelled: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["payment_status"], "REFUNDED");
    assert_eq!(fx.store.stock_of(product_id), Some(5));

    let req = test::TestRequest::post()
        .uri(&format!("/orders/{order_id}/cancel"))
        .insert_header((USER, shopper))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn unknown_status_is_a_bad_request() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::put()
        .uri(&format!("/merchant/orders/{}/status", Uuid::new_v4()))
        .insert_header((USER, fx.merchant.to_string()))
        .insert_header((ROLE, "merchant"))
        .set_json(json!({ "status": "LOST" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn bad_price_is_a_bad_request() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/merchant/products")
        .insert_header((USER, fx.merchant.to_string()))
        .insert_header((ROLE, "merchant"))
        .set_json(json!({
            "subcategory_id": fx.subcategory,
            "name": "Blue mug",
            "price": "ten",
            "stock": 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn wishlist_round_trip() {
    let fx = fixture();
    let app = app!(fx);
    let shopper = Uuid::new_v4().to_string();

    let req = test::TestRequest::post()
        .uri("/merchant/products")
        .insert_header((USER, fx.merchant.to_string()))
        .insert_header((ROLE, "merchant"))
        .set_json(json!({
            "subcategory_id": fx.subcategory,
            "name": "Teapot",
            "price": "25.00",
            "stock": 2
        }))
        .to_request();
    let product: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/wishlist")
        .insert_header((USER, shopper.clone()))
        .set_json(json!({ "product_id": product["id"] }))
        .to_request();
    let item: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(item["product_name"], "Teapot");

    let req = test::TestRequest::delete()
        .uri(&format!("/wishlist/{}", item["id"].as_str().expect("wishlist item id")))
        .insert_header((USER, shopper.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/wishlist")
        .insert_header((USER, shopper))
        .to_request();
    let items: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(items.as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn huge_page_number_returns_an_empty_page() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri(&format!("/merchant/orders?page={}&limit=100", i64::MAX))
        .insert_header((USER, fx.merchant.to_string()))
        .insert_header((ROLE, "merchant"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["page"], i64::MAX);
}
