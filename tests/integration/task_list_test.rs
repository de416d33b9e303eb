// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{task_json, tasks_page, TestBackend};
use serde_json::json;
use watchdogs::application::dto::{Outcome, TaskListState};
use watchdogs::domain::models::task::TaskForm;
use watchdogs::utils::errors::{ApiError, ControllerError};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn ids(tasks: &[watchdogs::domain::models::task::Task]) -> Vec<i64> {
    tasks.iter().map(|task| task.task_id).collect()
}

#[tokio::test]
async fn test_pagination_survives_failed_page() {
    let backend = TestBackend::start().await;
    for (page, ids) in [("1", vec![1, 2]), ("2", vec![3, 4, 5])] {
        Mock::given(method("GET"))
            .and(path("/load_tasks"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(tasks_page(&ids, true)))
            .expect(1)
            .mount(&backend.server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks_page(&[6], false)))
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut controller = backend.task_list();
    controller.load_tasks().await.unwrap();
    controller.load_tasks().await.unwrap();
    assert_eq!(controller.tasks().len(), 5);

    let err = controller.load_tasks().await.unwrap_err();
    assert!(matches!(err, ControllerError::Api(ApiError::Status { status: 502, .. })));
    assert_eq!(controller.tasks().len(), 5);
    assert!(controller.has_more());
    assert_eq!(controller.current_page(), 2);

    controller.load_tasks().await.unwrap();
    assert_eq!(ids(controller.tasks()), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(controller.state(), TaskListState::LoadedEnd);

    // terminal for this configuration
    assert_eq!(controller.load_tasks().await.unwrap(), 0);
}

#[tokio::test]
async fn test_backend_error_message_keeps_list() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks_page(&[1], true)))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "msg": "no such column: bogus",
            "tasks": [],
            "has_more": false
        })))
        .mount(&backend.server)
        .await;

    let mut controller = backend.task_list();
    controller.load_tasks().await.unwrap();
    let err = controller.load_tasks().await.unwrap_err();

    assert_eq!(err.to_string(), "Backend rejected request: no such column: bogus");
    assert!(controller.has_more());
    assert_eq!(controller.state(), TaskListState::Error);
}

#[tokio::test]
async fn test_reload_requests_only_first_page() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks_page(&[1, 2], true)))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks_page(&[3], false)))
        .mount(&backend.server)
        .await;

    let mut controller = backend.task_list();
    controller.load_tasks().await.unwrap();
    controller.load_tasks().await.unwrap();
    assert_eq!(controller.state(), TaskListState::LoadedEnd);

    backend.server.reset().await;
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .and(query_param("page", "1"))
        .and(query_param("tag", "news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks_page(&[7], true)))
        .expect(1)
        .mount(&backend.server)
        .await;

    controller.set_tag("news").await.unwrap();

    assert_eq!(ids(controller.tasks()), vec![7]);
    assert_eq!(controller.current_page(), 1);
}

#[tokio::test]
async fn test_invalid_json_form_sends_nothing() {
    let backend = TestBackend::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok"})))
        .expect(0)
        .mount(&backend.server)
        .await;

    let mut controller = backend.task_list();
    let form = TaskForm {
        name: "demo".to_string(),
        request_args: "{\"url\": \"https://example.com\"}".to_string(),
        result_list: "not-json".to_string(),
        ..TaskForm::default()
    };

    let err = controller.create_or_update(&form).await.unwrap_err();
    assert!(matches!(err, ControllerError::Validation(_)));
}

#[tokio::test]
async fn test_save_then_reload() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/add_new_task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok"})))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks_page(&[1], false)))
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut controller = backend.task_list();
    let form = TaskForm {
        name: "task-1".to_string(),
        request_args: "{\"url\": \"https://example.com\"}".to_string(),
        ..TaskForm::default()
    };
    controller.create_or_update(&form).await.unwrap();

    assert_eq!(ids(controller.tasks()), vec![1]);
}

#[tokio::test]
async fn test_force_crawl_and_delete_by_id() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/load_tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks_page(&[1, 2, 3], false)))
        .mount(&backend.server)
        .await;
    let mut crawled = task_json(2);
    crawled["latest_result"] = json!("{\"text\": \"fresh\"}");
    Mock::given(method("GET"))
        .and(path("/force_crawl"))
        .and(query_param("task_name", "task-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok", "task": crawled})))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/delete_task"))
        .and(query_param("task_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok"})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut controller = backend.task_list();
    controller.load_tasks().await.unwrap();

    let outcome = controller.delete(1, &|_: &str| true).await.unwrap();
    assert_eq!(outcome, Outcome::Done);

    controller.force_crawl("task-2").await.unwrap();

    assert_eq!(ids(controller.tasks()), vec![2, 3]);
    assert_eq!(controller.task(2).unwrap().latest_result, "{\"text\": \"fresh\"}");
}
