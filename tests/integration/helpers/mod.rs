// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Value};
use std::sync::Arc;
use watchdogs::application::controllers::{HostRuleController, TaskListController};
use watchdogs::domain::repositories::task_repository::TaskQuery;
use watchdogs::infrastructure::api::ApiClient;
use watchdogs::infrastructure::repositories::rule_repo_impl::RuleRepositoryImpl;
use watchdogs::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use wiremock::MockServer;

/// 模拟后端及指向它的客户端
pub struct TestBackend {
    pub server: MockServer,
    pub client: ApiClient,
}

impl TestBackend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let client = ApiClient::with_base_url(&server.uri()).unwrap();
        Self { server, client }
    }

    pub fn task_list(&self) -> TaskListController {
        TaskListController::new(
            Arc::new(TaskRepositoryImpl::new(self.client.clone())),
            TaskQuery::default(),
        )
    }

    pub fn host_rules(&self) -> HostRuleController {
        HostRuleController::new(Arc::new(RuleRepositoryImpl::new(self.client.clone())))
    }
}

pub fn task_json(task_id: i64) -> Value {
    json!({
        "task_id": task_id,
        "name": format!("task-{}", task_id),
        "enable": 1,
        "tag": "default",
        "request_args": "{\"url\": \"https://example.com\"}",
        "origin_url": "https://example.com",
        "interval": 300,
        "work_hours": "0, 24",
        "max_result_count": 10,
        "latest_result": "",
        "result_list": "[]",
        "custom_info": "",
        "error": "",
        "last_check_time": "2020-03-14T11:47:32.123456",
        "next_check_time": "2020-03-14T11:52:32",
        "last_change_time": "2020-03-14T11:47:32",
        "timeago": "1m"
    })
}

pub fn tasks_page(ids: &[i64], has_more: bool) -> Value {
    json!({
        "msg": "ok",
        "tasks": ids.iter().map(|id| task_json(*id)).collect::<Vec<_>>(),
        "has_more": has_more
    })
}
