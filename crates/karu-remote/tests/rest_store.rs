//! RestStore against an in-process mock of the PostgREST endpoints.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use karu_core::dashboard::DateRange;
use karu_core::{Money, NewTransaction, NewTransactionItem, PaymentMethod, PosStore, TransactionStatus};
use karu_remote::{RemoteError, RestConfig, RestStore};

const API_KEY: &str = "test-anon-key";

/// One recorded request: method, path, raw query, JSON body.
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: &'static str,
    query: String,
    body: Value,
}

#[derive(Clone, Default)]
struct Mock {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Mock {
    fn record(&self, method: Method, path: &'static str, query: Option<String>, body: Value) {
        self.seen.lock().unwrap().push(Seen {
            method,
            path,
            query: query.unwrap_or_default(),
            body,
        });
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(API_KEY)
        && headers.get("authorization").and_then(|v| v.to_str().ok())
            == Some(&format!("Bearer {}", API_KEY)[..])
}

async fn products(State(mock): State<Mock>, headers: HeaderMap, RawQuery(q): RawQuery) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let query = q.clone().unwrap_or_default();
    mock.record(Method::GET, "products", q, Value::Null);

    if query.contains("min_stock_level") {
        return Json(json!([
            {"id": "p-2", "name": "Milk", "stock_quantity": 3, "min_stock_level": 10},
            {"id": "p-1", "name": "Bread", "stock_quantity": 40, "min_stock_level": 10},
            {"id": "p-3", "name": "Flour", "stock_quantity": 4, "min_stock_level": 5}
        ]))
        .into_response();
    }

    Json(json!([
        {"id": "p-1", "name": "Bread", "price": 65, "stock_quantity": 40,
         "min_stock_level": 10, "barcode": "6161100110011", "is_active": true},
        {"id": "p-2", "name": "Milk", "price": 60.5, "stock_quantity": 3,
         "min_stock_level": 10, "barcode": null, "is_active": true}
    ]))
    .into_response()
}

async fn patch_products(
    State(mock): State<Mock>,
    RawQuery(q): RawQuery,
    Json(body): Json<Value>,
) -> StatusCode {
    mock.record(Method::PATCH, "products", q, body);
    StatusCode::NO_CONTENT
}

async fn customers(State(mock): State<Mock>, method: Method, RawQuery(q): RawQuery) -> Response {
    mock.record(method.clone(), "customers", q, Value::Null);

    if method == Method::HEAD {
        return (StatusCode::OK, [("content-range", "*/42")]).into_response();
    }

    Json(json!([
        {"id": "c-1", "name": "Amina", "phone": "0712000001", "loyalty_points": 5,
         "is_student": true, "total_spent": 120.5}
    ]))
    .into_response()
}

async fn patch_customers(
    State(mock): State<Mock>,
    RawQuery(q): RawQuery,
    Json(body): Json<Value>,
) -> StatusCode {
    mock.record(Method::PATCH, "customers", q, body);
    StatusCode::NO_CONTENT
}

async fn rpc_number(State(mock): State<Mock>, Json(body): Json<Value>) -> Json<Value> {
    mock.record(Method::POST, "rpc/generate_transaction_number", None, body);
    Json(json!("TXN-20261019-0001"))
}

async fn list_transactions(State(mock): State<Mock>, RawQuery(q): RawQuery) -> Json<Value> {
    mock.record(Method::GET, "transactions", q, Value::Null);
    Json(json!([{"total_amount": 116.0}, {"total_amount": 10.5}]))
}

async fn insert_transaction(
    State(mock): State<Mock>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.record(Method::POST, "transactions", None, body.clone());

    if headers.get("prefer").and_then(|v| v.to_str().ok()) != Some("return=representation") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let mut row = body;
    row["id"] = json!("t-1");
    row["created_at"] = json!("2026-10-19T10:15:00.123456+00:00");
    (StatusCode::CREATED, Json(json!([row]))).into_response()
}

async fn transaction_items(
    State(mock): State<Mock>,
    method: Method,
    RawQuery(q): RawQuery,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    mock.record(method.clone(), "transaction_items", q, body);

    if method == Method::POST {
        return StatusCode::CREATED.into_response();
    }

    Json(json!([
        {"product_id": "p-2", "quantity": 2, "products": {"name": "Milk"}},
        {"product_id": "p-1", "quantity": 3, "products": {"name": "Bread"}},
        {"product_id": "p-2", "quantity": 2, "products": {"name": "Milk"}}
    ]))
    .into_response()
}

async fn spawn(mock: Mock) -> String {
    let app = Router::new()
        .route("/rest/v1/products", get(products).patch(patch_products))
        .route("/rest/v1/customers", get(customers).head(customers).patch(patch_customers))
        .route("/rest/v1/rpc/generate_transaction_number", post(rpc_number))
        .route("/rest/v1/transactions", get(list_transactions).post(insert_transaction))
        .route(
            "/rest/v1/transaction_items",
            get(transaction_items).post(transaction_items),
        )
        .route("/rest/v1/broken", patch(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn store() -> (RestStore, Mock) {
    let mock = Mock::default();
    let base = spawn(mock.clone()).await;
    let store = RestStore::new(&RestConfig::new(base, API_KEY)).unwrap();
    (store, mock)
}

#[tokio::test]
async fn test_sellable_products_filters_and_converts_prices() {
    let (store, mock) = store().await;

    let products = store.sellable_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price_cents, 6_500);
    assert_eq!(products[1].price_cents, 6_050);
    assert_eq!(products[0].barcode.as_deref(), Some("6161100110011"));

    let seen = mock.seen();
    assert!(seen[0].query.contains("is_active=eq.true"));
    assert!(seen[0].query.contains("stock_quantity=gt.0"));
}

#[tokio::test]
async fn test_customers_limit_and_exact_count() {
    let (store, mock) = store().await;

    let customers = store.list_customers(50).await.unwrap();
    assert_eq!(customers[0].total_spent_cents, 12_050);
    assert!(customers[0].is_student);

    assert_eq!(store.customer_count().await.unwrap(), 42);

    let seen = mock.seen();
    assert!(seen[0].query.contains("limit=50"));
    assert_eq!(seen[1].method, Method::HEAD);
}

#[tokio::test]
async fn test_checkout_writes() {
    let (store, mock) = store().await;

    let number = store.generate_transaction_number().await.unwrap();
    assert_eq!(number, "TXN-20261019-0001");

    let txn = store
        .insert_transaction(&NewTransaction {
            transaction_number: number,
            cashier_id: "cashier-1".to_string(),
            customer_id: Some("c-1".to_string()),
            subtotal_cents: 10_000,
            tax_cents: 1_600,
            discount_cents: 1_000,
            total_cents: 10_600,
            payment_method: PaymentMethod::Card,
            points_earned: 10,
            status: TransactionStatus::Completed,
        })
        .await
        .unwrap();
    assert_eq!(txn.id, "t-1");
    assert_eq!(txn.total_cents, 10_600);
    assert_eq!(txn.payment_method, PaymentMethod::Card);

    store
        .insert_transaction_items(&[NewTransactionItem {
            transaction_id: txn.id.clone(),
            product_id: "p-1".to_string(),
            quantity: 2,
            unit_price_cents: 5_000,
            total_price_cents: 10_000,
        }])
        .await
        .unwrap();
    store.set_product_stock("p-1", 38).await.unwrap();
    store
        .update_customer_loyalty("c-1", 15, Money::from_cents(23_100))
        .await
        .unwrap();

    let seen = mock.seen();
    let order: Vec<_> = seen.iter().map(|s| (s.method.as_str(), s.path)).collect();
    assert_eq!(
        order,
        vec![
            ("POST", "rpc/generate_transaction_number"),
            ("POST", "transactions"),
            ("POST", "transaction_items"),
            ("PATCH", "products"),
            ("PATCH", "customers"),
        ]
    );

    assert_eq!(seen[1].body["total_amount"], json!(106.0));
    assert_eq!(seen[2].body[0]["unit_price"], json!(50.0));
    assert_eq!(seen[3].query, "id=eq.p-1");
    assert_eq!(seen[3].body, json!({"stock_quantity": 38}));
    assert_eq!(seen[4].body, json!({"loyalty_points": 15, "total_spent": 231.0}));
}

#[tokio::test]
async fn test_completed_totals_with_day_range() {
    let (store, mock) = store().await;
    let day = DateRange::day_of("2026-10-19T15:00:00Z".parse().unwrap());

    let totals = store.completed_totals(Some(day)).await.unwrap();

    assert_eq!(totals, vec![Money::from_cents(11_600), Money::from_cents(1_050)]);
    let query = &mock.seen()[0].query;
    assert!(query.contains("status=eq.completed"));
    assert!(query.contains("created_at=gte.2026-10-19T00%3A00%3A00Z"));
    assert!(query.contains("created_at=lt.2026-10-20T00%3A00%3A00Z"));
}

#[tokio::test]
async fn test_low_stock_filtered_client_side() {
    let (store, _) = store().await;

    let low = store.low_stock_products().await.unwrap();
    let ids: Vec<_> = low.iter().map(|p| p.id.as_str()).collect();

    assert_eq!(ids, vec!["p-2", "p-3"]);
}

#[tokio::test]
async fn test_top_selling_product_sums_quantities() {
    let (store, mock) = store().await;

    assert_eq!(store.top_selling_product().await.unwrap().as_deref(), Some("Milk"));
    assert!(mock.seen()[0].query.contains("transactions.status=eq.completed"));
}

#[tokio::test]
async fn test_wrong_key_is_unauthorized() {
    let mock = Mock::default();
    let base = spawn(mock).await;
    let store = RestStore::new(&RestConfig::new(base, "wrong-key")).unwrap();

    assert!(matches!(
        store.sellable_products().await,
        Err(RemoteError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let (store, _) = store().await;

    let err = store
        .client()
        .update_by_id("broken", "x", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Status { status: 500, .. }));
}
