use axum::body::Body;
use axum::http::{Request, StatusCode};
use insta::assert_yaml_snapshot;
use serde_json::{Value, json};
use std::sync::Arc;
use tasktide_core::RepositoryError;

mod common;

use common::{
    ApiResponseSnapshot, MockRepository, create_task, create_test_app,
    create_test_app_with_repository, send, send_request,
};

fn titles(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn can_create_task_with_defaults_and_score() {
    let app = create_test_app();

    let response = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "Write report", "category": "work", "priority": "high"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(response.body["message"], json!("Task created successfully"));

    let task = &response.body["data"];
    assert!(!task["id"].as_str().unwrap().is_empty());
    assert_eq!(task["title"], json!("Write report"));
    assert_eq!(task["estimate"], json!(1.0));
    assert_eq!(task["completed"], json!(false));
    assert_eq!(task["dueDate"], Value::Null);
    assert_eq!(task["aiScore"], json!(30));
    assert_eq!(task["createdAt"], json!("2025-03-14T09:30:00.000Z"));
    assert_eq!(task["updatedAt"], task["createdAt"]);
    assert!(task.get("completedAt").is_none());
}

#[tokio::test]
async fn can_score_due_date_and_urgent_keyword_on_create() {
    let app = create_test_app();

    let task = create_task(
        &app,
        json!({
            "title": "URGENT: renew passport",
            "category": "personal",
            "priority": "medium",
            "dueDate": "2025-03-15"
        }),
    )
    .await;

    assert_eq!(task["dueDate"], json!("2025-03-15T00:00:00.000Z"));
    assert_eq!(task["aiScore"], json!(55));
}

#[tokio::test]
async fn can_get_task_by_id() {
    let app = create_test_app();
    let created = create_task(
        &app,
        json!({"title": "Stretch", "category": "health", "priority": "low"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = send(&app, "GET", &format!("/api/tasks/{id}"), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], created);
    assert!(response.body.get("message").is_none());
}

#[tokio::test]
async fn cannot_get_missing_task() {
    let app = create_test_app();

    let response = send(&app, "GET", "/api/tasks/does-not-exist", None).await;

    insta::with_settings!({sort_maps => true}, {
        assert_yaml_snapshot!(ApiResponseSnapshot::new(&response, "get_missing_task"), @r#"
        test_context: get_missing_task
        status: 404
        body:
          error: Task not found
          success: false
        "#);
    });
}

#[tokio::test]
async fn can_list_tasks_in_listing_order() {
    let app = create_test_app();
    let done = create_task(
        &app,
        json!({"title": "Laundry", "category": "personal", "priority": "low"}),
    )
    .await;
    create_task(
        &app,
        json!({"title": "Report", "category": "work", "priority": "high"}),
    )
    .await;
    create_task(
        &app,
        json!({"title": "Dentist", "category": "health", "priority": "medium", "dueDate": "2025-03-15"}),
    )
    .await;
    let id = done["id"].as_str().unwrap();
    send(&app, "PATCH", &format!("/api/tasks/{id}/toggle"), None).await;

    let response = send(&app, "GET", "/api/tasks", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], json!(3));
    assert_eq!(titles(&response.body), vec!["Dentist", "Report", "Laundry"]);
}

#[tokio::test]
async fn can_filter_tasks_by_query() {
    let app = create_test_app();
    let done = create_task(
        &app,
        json!({"title": "Laundry", "category": "personal", "priority": "low"}),
    )
    .await;
    create_task(
        &app,
        json!({"title": "Report", "category": "work", "priority": "high"}),
    )
    .await;
    create_task(
        &app,
        json!({"title": "Dentist", "category": "health", "priority": "medium", "dueDate": "2025-03-15"}),
    )
    .await;
    let id = done["id"].as_str().unwrap();
    send(&app, "PATCH", &format!("/api/tasks/{id}/toggle"), None).await;

    let by_category = send(&app, "GET", "/api/tasks?category=work", None).await;
    let all_categories = send(&app, "GET", "/api/tasks?category=all&priority=all", None).await;
    let completed = send(&app, "GET", "/api/tasks?completed=true", None).await;
    let incomplete = send(&app, "GET", "/api/tasks?completed=false", None).await;
    let unknown_priority = send(&app, "GET", "/api/tasks?priority=urgent", None).await;

    assert_eq!(titles(&by_category.body), vec!["Report"]);
    assert_eq!(all_categories.body["count"], json!(3));
    assert_eq!(titles(&completed.body), vec!["Laundry"]);
    assert_eq!(titles(&incomplete.body), vec!["Dentist", "Report"]);
    assert_eq!(unknown_priority.body["count"], json!(0));
}

#[tokio::test]
async fn can_update_task_and_rescore() {
    let app = create_test_app();
    let created = create_task(
        &app,
        json!({"title": "Essay", "category": "learning", "priority": "low"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({"priority": "high", "dueDate": "2025-03-16"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], json!("Task updated successfully"));
    let updated = &response.body["data"];
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], json!("Essay"));
    assert_eq!(updated["priority"], json!("high"));
    assert_eq!(updated["aiScore"], json!(45));
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(updated["updatedAt"].as_str().unwrap() > created["updatedAt"].as_str().unwrap());
}

#[tokio::test]
async fn can_clear_due_date_with_null() {
    let app = create_test_app();
    let created = create_task(
        &app,
        json!({"title": "Call bank", "category": "personal", "priority": "low", "dueDate": "2025-03-15"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({"dueDate": null})),
    )
    .await;

    assert_eq!(response.body["data"]["dueDate"], Value::Null);
    assert_eq!(response.body["data"]["aiScore"], json!(10));
}

#[tokio::test]
async fn cannot_update_missing_task_even_with_invalid_body() {
    let app = create_test_app();

    let response = send(
        &app,
        "PUT",
        "/api/tasks/does-not-exist",
        Some(json!({"title": ""})),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], json!("Task not found"));
}

#[tokio::test]
async fn cannot_update_computed_fields() {
    let app = create_test_app();
    let created = create_task(
        &app,
        json!({"title": "Plan", "category": "work", "priority": "low"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = send(
        &app,
        "PUT",
        &format!("/api/tasks/{id}"),
        Some(json!({"aiScore": 99})),
    )
    .await;
    let unchanged = send(&app, "GET", &format!("/api/tasks/{id}"), None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], json!("Validation error"));
    assert_eq!(response.body["details"], json!(["\"aiScore\" is not allowed"]));
    assert_eq!(unchanged.body["data"], created);
}

#[tokio::test]
async fn can_toggle_task_twice() {
    let app = create_test_app();
    let created = create_task(
        &app,
        json!({"title": "Floss", "category": "health", "priority": "low"}),
    )
    .await;
    let uri = format!("/api/tasks/{}/toggle", created["id"].as_str().unwrap());

    let first = send(&app, "PATCH", &uri, None).await;
    let second = send(&app, "PATCH", &uri, None).await;

    assert_eq!(first.body["message"], json!("Task marked as completed"));
    assert_eq!(first.body["data"]["completed"], json!(true));
    assert!(first.body["data"]["completedAt"].is_string());
    assert_eq!(second.body["message"], json!("Task marked as incomplete"));
    assert_eq!(second.body["data"]["completed"], json!(false));
    assert!(second.body["data"].get("completedAt").is_none());

    let created_at = created["updatedAt"].as_str().unwrap();
    let first_at = first.body["data"]["updatedAt"].as_str().unwrap();
    let second_at = second.body["data"]["updatedAt"].as_str().unwrap();
    assert!(first_at > created_at);
    assert!(second_at > first_at);
}

#[tokio::test]
async fn cannot_toggle_missing_task() {
    let app = create_test_app();

    let response = send(&app, "PATCH", "/api/tasks/does-not-exist/toggle", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_delete_task() {
    let app = create_test_app();
    let created = create_task(
        &app,
        json!({"title": "Bin day", "category": "personal", "priority": "low"}),
    )
    .await;
    let uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

    let response = send(&app, "DELETE", &uri, None).await;
    let after = send(&app, "GET", &uri, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], json!("Task deleted successfully"));
    assert_eq!(response.body["data"], created);
    assert_eq!(after.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cannot_delete_missing_task_and_leaves_collection_unchanged() {
    let app = create_test_app();
    create_task(
        &app,
        json!({"title": "Keep me", "category": "work", "priority": "low"}),
    )
    .await;

    let response = send(&app, "DELETE", "/api/tasks/does-not-exist", None).await;
    let listing = send(&app, "GET", "/api/tasks", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(titles(&listing.body), vec!["Keep me"]);
}

#[tokio::test]
async fn cannot_create_task_with_invalid_fields() {
    let app = create_test_app();

    let response = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({
            "title": "",
            "category": "chores",
            "estimate": 30,
            "aiScore": 99
        })),
    )
    .await;
    let listing = send(&app, "GET", "/api/tasks", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], json!(false));
    assert_eq!(response.body["error"], json!("Validation error"));
    assert_eq!(
        response.body["details"],
        json!([
            "\"title\" is not allowed to be empty",
            "\"category\" must be one of [work, personal, health, learning]",
            "\"priority\" is required",
            "\"estimate\" must be less than or equal to 24",
            "\"aiScore\" is not allowed"
        ])
    );
    assert_eq!(listing.body["count"], json!(0));
}

#[tokio::test]
async fn cannot_create_task_from_malformed_json() {
    let app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/tasks")
        .header("content-type", "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let response = send_request(&app, request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], json!("Validation error"));
    assert_eq!(response.body["details"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn can_report_storage_failure_without_leaking_cause() {
    let mut repository = MockRepository::new();
    repository
        .expect_find_all()
        .times(1)
        .returning(|| Err(RepositoryError::Unavailable("connection refused".to_string())));
    let app = create_test_app_with_repository(Arc::new(repository));

    let response = send(&app, "GET", "/api/tasks", None).await;

    insta::with_settings!({sort_maps => true}, {
        assert_yaml_snapshot!(ApiResponseSnapshot::new(&response, "storage_failure"), @r#"
        test_context: storage_failure
        status: 500
        body:
          error: Failed to fetch tasks
          message: Something went wrong
          success: false
        "#);
    });
}
