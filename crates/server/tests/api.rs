use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::CORRELATION_ID_HEADER;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn app() -> Router {
    server::router(engine().await)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(res: Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create(app: &Router, body: Value) -> Value {
    let res = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/expenses", &body))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    body_json(res).await
}

#[tokio::test]
async fn health_reports_ok() {
    let res = app().await.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "ok");
}

#[tokio::test]
async fn create_returns_201_and_echoes_correlation_id() {
    let app = app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/expenses")
        .header(header::CONTENT_TYPE, "application/json")
        .header(&CORRELATION_ID_HEADER, "req-123")
        .body(Body::from(
            json!({
                "description": "Groceries",
                "amount": 42.129,
                "currency": "EUR",
                "category": "food",
                "expenseDate": "2025-11-20T10:00:00Z"
            })
            .to_string(),
        ))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers().get(&CORRELATION_ID_HEADER).unwrap(), "req-123");

    let body = body_json(res).await;
    assert_eq!(body["description"], "Groceries");
    assert_eq!(body["amount"], 42.13);
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["category"], "food");
    assert_eq!(body["expenseDate"], "2025-11-20T10:00:00.000Z");
    assert!(body["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn missing_correlation_id_is_generated() {
    let res = app().await.oneshot(empty_request("GET", "/health")).await.unwrap();
    let id = res.headers().get(&CORRELATION_ID_HEADER).unwrap();
    assert_eq!(id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn invalid_body_returns_field_details() {
    let res = app()
        .await
        .oneshot(json_request(
            "POST",
            "/api/v1/expenses",
            &json!({ "description": "", "amount": -3, "currency": "CHF" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await;
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<_> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["description", "amount", "currency"]);
}

#[tokio::test]
async fn sub_cent_amount_is_not_positive() {
    let res = app()
        .await
        .oneshot(json_request(
            "POST",
            "/api/v1/expenses",
            &json!({ "description": "Gum", "amount": 0.001, "currency": "USD" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = body_json(res).await;
    assert_eq!(body["details"].as_array().unwrap().len(), 1);
    assert_eq!(body["details"][0]["field"], "amount");
    assert_eq!(body["details"][0]["message"], "Amount must be positive");
}

#[tokio::test]
async fn lower_case_currency_is_rejected() {
    let res = app()
        .await
        .oneshot(json_request(
            "POST",
            "/api/v1/expenses",
            &json!({ "description": "Bread", "amount": 2, "currency": "eur" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["details"][0]["field"], "currency");
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/expenses")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"description\": "))
        .unwrap();

    let res = app().await.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["details"][0]["field"], "body");
}

#[tokio::test]
async fn future_expense_date_is_rejected_by_the_domain() {
    let res = app()
        .await
        .oneshot(json_request(
            "POST",
            "/api/v1/expenses",
            &json!({
                "description": "Concert",
                "amount": 60,
                "currency": "GBP",
                "expenseDate": "2999-01-01T00:00:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["details"][0]["field"], "expenseDate");
}

#[tokio::test]
async fn get_update_delete_lifecycle() {
    let app = app().await;
    let created = create(
        &app,
        json!({ "description": "Taxi", "amount": 18.5, "currency": "USD", "category": "transport" }),
    )
    .await;
    let uri = format!("/api/v1/expenses/{}", created["id"].as_str().unwrap());

    let res = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, created);

    let res = app
        .clone()
        .oneshot(json_request("PUT", &uri, &json!({ "amount": 20, "currency": "JPY" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await;
    assert_eq!(updated["amount"], 20.0);
    assert_eq!(updated["currency"], "JPY");
    assert_eq!(updated["description"], "Taxi");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let res = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Resource not found");
    assert_eq!(body["details"]["resourceType"], "Expense");

    let res = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_returns_400() {
    let res = app()
        .await
        .oneshot(empty_request("GET", "/api/v1/expenses/not-a-uuid"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["details"][0]["field"], "id");
}

#[tokio::test]
async fn list_paginates_and_filters() {
    let app = app().await;
    for (day, category) in [(1, "food"), (2, "transport"), (3, "food")] {
        create(
            &app,
            json!({
                "description": format!("Day {day}"),
                "amount": 10,
                "currency": "USD",
                "category": category,
                "expenseDate": format!("2025-10-0{day}T08:00:00Z")
            }),
        )
        .await;
    }

    let res = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/expenses?page=1&limit=2"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 2, "total": 3, "totalPages": 2 })
    );
    assert_eq!(body["data"][0]["description"], "Day 3");

    let res = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/expenses?category=food&startDate=2025-10-02&endDate=2025-10-03",
        ))
        .await
        .unwrap();
    let body = body_json(res).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["description"], "Day 3");
}

#[tokio::test]
async fn list_rejects_out_of_range_query() {
    let app = app().await;

    let res = app
        .clone()
        .oneshot(empty_request("GET", "/api/v1/expenses?page=0&limit=101"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["details"].as_array().unwrap().len(), 2);

    let res = app
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/expenses?page=18446744073709551615",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["details"][0]["field"], "page");
    assert_eq!(body["details"][0]["message"], "Page is out of range");

    let res = app
        .oneshot(empty_request("GET", "/api/v1/expenses?page=abc"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["details"][0]["field"], "query");
}

#[tokio::test]
async fn spawned_server_answers_health_checks() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine().await, listener).unwrap();

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("\"status\":\"ok\""));
}
