use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use ogs_server::Server;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    // The default config connects to a fresh `mem://` database.
    Server::builder().build().await.expect("build server").router()
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

async fn staff(app: &Router, first: &str) -> String {
    let (status, person) = call(
        app,
        Method::POST,
        "/api/persons",
        Some(json!({ "firstName": first, "lastName": "Team" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, staff) =
        call(app, Method::POST, "/api/staff", Some(json!({ "personId": person["id"] }))).await;
    assert_eq!(status, StatusCode::CREATED);
    staff["id"].as_str().unwrap().to_owned()
}

async fn student(app: &Router, first: &str) -> String {
    let (_, person) = call(
        app,
        Method::POST,
        "/api/persons",
        Some(json!({ "firstName": first, "lastName": "Kind" })),
    )
    .await;
    let (status, student) = call(
        app,
        Method::POST,
        "/api/students",
        Some(json!({ "personId": person["id"], "schoolClass": "1b" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    student["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn health_is_served() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"]["status"], "up");
    assert_eq!(body["database"]["namespace"], "ogs");

    let slices = body["slices"].as_array().unwrap();
    assert_eq!(slices.len(), ogs::features::ENABLED.len());
    assert!(slices.iter().any(|name| name.as_str().unwrap().ends_with("Schulhof")));
}

#[tokio::test]
async fn duplicate_room_name_conflicts() {
    let app = app().await;
    let room = json!({ "name": "Turnhalle", "capacity": 30, "category": "Sport" });

    let (status, created) = call(&app, Method::POST, "/api/rooms", Some(room.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Turnhalle");

    let (status, body) = call(&app, Method::POST, "/api/rooms", Some(room)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn malformed_feedback_day_is_rejected() {
    let app = app().await;
    let mia = student(&app, "Mia").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/feedback",
        Some(json!({ "studentId": mia, "value": "positive", "day": "14.03.2025", "time": "12:30" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = call(&app, Method::GET, "/api/feedback?day=2025-02-30", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_feedback_is_gone() {
    let app = app().await;
    let mia = student(&app, "Mia").await;

    let (status, entry) = call(
        &app,
        Method::POST,
        "/api/feedback",
        Some(json!({ "studentId": mia, "value": "neutral", "day": "2025-03-14", "time": "12:30" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/feedback/{}", entry["id"].as_str().unwrap());

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schulhof_supervision_round_trip() {
    let app = app().await;
    let anna = staff(&app, "Anna").await;
    let status_uri = format!("/api/schulhof/status?staffId={anna}");

    let (status, body) = call(&app, Method::GET, &status_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);
    assert_eq!(body["isUserSupervising"], false);

    let start = json!({ "staffId": anna, "action": "start" });
    let (status, outcome) =
        call(&app, Method::POST, "/api/schulhof/supervision", Some(start.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["supervisorCount"], 1);
    let (_, again) = call(&app, Method::POST, "/api/schulhof/supervision", Some(start)).await;
    assert_eq!(again["activeGroupId"], outcome["activeGroupId"]);
    assert_eq!(again["supervisorCount"], 1);

    let (_, body) = call(&app, Method::GET, &status_uri, None).await;
    assert_eq!(body["exists"], true);
    assert_eq!(body["isUserSupervising"], true);
    assert_eq!(body["activeGroupId"], outcome["activeGroupId"]);

    let stop = json!({ "staffId": anna, "action": "stop" });
    let (status, body) =
        call(&app, Method::POST, "/api/schulhof/supervision", Some(stop.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isUserSupervising"], false);

    let (status, _) = call(&app, Method::POST, "/api/schulhof/supervision", Some(stop)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreadable_bodies_use_the_error_envelope() {
    let app = app().await;
    let anna = staff(&app, "Anna").await;

    let pause = json!({ "staffId": anna, "action": "pause" });
    let (status, body) = call(&app, Method::POST, "/api/schulhof/supervision", Some(pause)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("pause"));

    let missing = json!({ "name": "Turnhalle" });
    let (status, body) = call(&app, Method::POST, "/api/rooms", Some(missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = call(&app, Method::GET, "/api/active-groups?openOnly=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}
