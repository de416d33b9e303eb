// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::task::{Task, TaskForm};
use crate::domain::repositories::task_repository::{TaskPage, TaskQuery, TaskRepository};
use crate::infrastructure::api::{Ack, ApiClient};
use crate::utils::errors::ApiError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
struct ForceCrawlPayload {
    task: Task,
}

/// 任务仓库实现
///
/// 基于后端HTTP接口实现的任务访问层
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 接口客户端
    client: ApiClient,
}

impl TaskRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `client` - 接口客户端
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn load_tasks(&self, query: &TaskQuery, page: u32) -> Result<TaskPage, ApiError> {
        let page_result: TaskPage = self.client.get("load_tasks", &query.to_params(page)).await?;
        info!(
            page,
            count = page_result.tasks.len(),
            has_more = page_result.has_more,
            "[Query] tasks loaded"
        );
        Ok(page_result)
    }

    async fn save_task(&self, form: &TaskForm) -> Result<(), ApiError> {
        let _: Ack = self.client.post("add_new_task", &[], form).await?;
        info!(
            task_id = ?form.task_id,
            name = %form.name,
            "{} task",
            if form.task_id.is_none() { "[Add]" } else { "[Update]" }
        );
        Ok(())
    }

    async fn enable_task(&self, task_id: i64, enable: bool) -> Result<(), ApiError> {
        let params = [
            ("task_id", task_id.to_string()),
            ("enable", u8::from(enable).to_string()),
        ];
        let _: Ack = self.client.get("enable_task", &params).await?;
        info!(task_id, enable, "[Enable] task updated");
        Ok(())
    }

    async fn force_crawl(&self, task_name: &str) -> Result<Task, ApiError> {
        let payload: ForceCrawlPayload = self
            .client
            .get("force_crawl", &[("task_name", task_name.to_string())])
            .await?;
        info!(task_name, "[Force] crawl finished");
        Ok(payload.task)
    }

    async fn delete_task(&self, task_id: i64) -> Result<(), ApiError> {
        let _: Ack = self
            .client
            .get("delete_task", &[("task_id", task_id.to_string())])
            .await?;
        info!(task_id, "[Delete] task removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "task_repo_impl_test.rs"]
mod tests;
