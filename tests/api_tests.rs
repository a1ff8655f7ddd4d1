//! CRUD endpoints driven through the router in-process

mod common;

use axum::http::StatusCode;
use common::{ScriptedGenerator, TestApp};
use serde_json::json;

async fn app() -> TestApp {
    TestApp::new(ScriptedGenerator::replying("{}")).await
}

#[tokio::test]
async fn test_health() {
    let app = app().await;

    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["llm_configured"], true);
}

#[tokio::test]
async fn test_task_create_and_fetch_with_category() {
    let app = app().await;
    let category_id = app
        .create(
            "/api/categories/",
            json!({"name": "Work", "description": "Work related tasks"}),
        )
        .await;

    let (status, created) = app
        .post(
            "/api/tasks/",
            json!({
                "title": "Finish assignment",
                "description": "Complete the Smart Todo List assignment",
                "deadline": "2025-08-15",
                "category_id": category_id
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Finish assignment");
    assert_eq!(created["status"], "pending");
    assert_eq!(created["completed"], false);
    assert_eq!(created["deadline"], "2025-08-15");
    assert!(created["priority_score"].is_null());
    assert_eq!(created["category"]["name"], "Work");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = app.get(&format!("/api/tasks/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["category_id"], category_id);
    assert_eq!(fetched["description"], "Complete the Smart Todo List assignment");
}

#[tokio::test]
async fn test_trailing_slash_is_optional() {
    let app = app().await;
    app.create("/api/tasks", json!({"title": "A"})).await;

    let (with_slash, a) = app.get("/api/tasks/").await;
    let (without_slash, b) = app.get("/api/tasks").await;

    assert_eq!(with_slash, StatusCode::OK);
    assert_eq!(without_slash, StatusCode::OK);
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_task_list_newest_first() {
    let app = app().await;
    app.create("/api/tasks/", json!({"title": "First"})).await;
    app.create("/api/tasks/", json!({"title": "Second"})).await;

    let (_, body) = app.get("/api/tasks/").await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();

    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn test_task_patch_and_put() {
    let app = app().await;
    let id = app
        .create(
            "/api/tasks/",
            json!({"title": "Buy groceries", "description": "Milk", "priority_score": 0.3}),
        )
        .await;
    let uri = format!("/api/tasks/{}/", id);

    let (status, patched) = app
        .request(
            "PATCH",
            &uri,
            Some(json!({"status": "in_progress", "priority_score": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["status"], "in_progress");
    assert!(patched["priority_score"].is_null());
    assert_eq!(patched["description"], "Milk");

    let (status, replaced) = app
        .request("PUT", &uri, Some(json!({"title": "Buy milk"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["title"], "Buy milk");
    assert_eq!(replaced["description"], "");
    assert_eq!(replaced["status"], "pending");
}

#[tokio::test]
async fn test_task_delete_then_404() {
    let app = app().await;
    let id = app.create("/api/tasks/", json!({"title": "Temp"})).await;
    let uri = format!("/api/tasks/{}/", id);

    let (status, body) = app.request("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TASK_NOT_FOUND");

    let (status, _) = app.request("DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_validation_errors() {
    let app = app().await;

    let (status, body) = app.post("/api/tasks/", json!({"title": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, _) = app
        .post("/api/tasks/", json!({"title": "X", "priority_score": 1.5}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/tasks/", json!({"title": "X", "category_id": 999}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/tasks/", json!({"title": "X", "status": "someday"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_malformed_json_body_is_bad_request() {
    let app = app().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/tasks/")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_id_is_json_bad_request() {
    let app = app().await;

    for (method, uri) in [
        ("GET", "/api/tasks/abc/"),
        ("DELETE", "/api/categories/abc"),
        ("GET", "/api/contexts/99999999999999999999/"),
    ] {
        let (status, body) = app.request(method, uri, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert!(body["error"].as_str().unwrap().starts_with("Invalid input: "));
    }

    let (status, body) = app
        .request("PATCH", "/api/tasks/abc/", Some(json!({"title": "X"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_category_crud_and_duplicate_name() {
    let app = app().await;
    let id = app
        .create("/api/categories/", json!({"name": "Personal"}))
        .await;
    app.create("/api/categories/", json!({"name": "Errands"})).await;

    let (status, _) = app.post("/api/categories/", json!({"name": "Personal"})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, list) = app.get("/api/categories/").await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Errands", "Personal"]);

    let (status, patched) = app
        .request(
            "PATCH",
            &format!("/api/categories/{}/", id),
            Some(json!({"usage_count": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["usage_count"], 3);
    assert_eq!(patched["name"], "Personal");

    let (status, _) = app.get("/api/categories/999/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_category_detaches_tasks() {
    let app = app().await;
    let category_id = app.create("/api/categories/", json!({"name": "Work"})).await;
    let task_id = app
        .create(
            "/api/tasks/",
            json!({"title": "Report", "category_id": category_id}),
        )
        .await;

    let (status, _) = app
        .request("DELETE", &format!("/api/categories/{}/", category_id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, task) = app.get(&format!("/api/tasks/{}/", task_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(task["category_id"].is_null());
    assert!(task["category"].is_null());
}

#[tokio::test]
async fn test_context_crud() {
    let app = app().await;
    app.create(
        "/api/contexts/",
        json!({"content": "Project deadline is Friday", "source_type": "email"}),
    )
    .await;
    let id = app
        .create(
            "/api/contexts/",
            json!({"content": "Remember to call mom", "source_type": "note"}),
        )
        .await;

    let (_, list) = app.get("/api/contexts/").await;
    assert_eq!(list[0]["content"], "Remember to call mom");
    assert_eq!(list[1]["source_type"], "email");

    let (status, updated) = app
        .request(
            "PATCH",
            &format!("/api/contexts/{}/", id),
            Some(json!({"processed_insights": "family"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["processed_insights"], "family");

    let (status, _) = app
        .post(
            "/api/contexts/",
            json!({"content": "x", "source_type": "carrier-pigeon"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request("DELETE", &format!("/api/contexts/{}/", id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = app().await;

    let (status, body) = app.get("/api/nothing-here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
