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

use crate::application::controllers::confirmation::{Confirmation, DELETE_PROMPT};
use crate::application::dto::{Outcome, PageRequest, TaskListState};
use crate::domain::models::task::{Task, TaskForm};
use crate::domain::repositories::task_repository::{
    SortOrder, TaskPage, TaskQuery, TaskRepository,
};
use crate::utils::errors::{ApiError, ControllerError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 任务列表控制器
///
/// 持有分页加载的任务列表及其排序、过滤条件。
/// 任务按 `task_id` 对齐，不依赖列表下标；每次重新加载递增代数，
/// 旧代数的分页响应被丢弃。
pub struct TaskListController {
    repository: Arc<dyn TaskRepository>,
    query: TaskQuery,
    tasks: Vec<Task>,
    current_page: u32,
    has_more: bool,
    state: TaskListState,
    generation: u64,
}

impl TaskListController {
    /// 创建控制器，列表为空
    ///
    /// # 参数
    ///
    /// * `repository` - 任务仓库
    /// * `query` - 初始查询条件
    pub fn new(repository: Arc<dyn TaskRepository>, query: TaskQuery) -> Self {
        Self {
            repository,
            query,
            tasks: Vec::new(),
            current_page: 0,
            has_more: true,
            state: TaskListState::Empty,
            generation: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.task_id == task_id)
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// 已成功加载的页数
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn state(&self) -> TaskListState {
        self.state
    }

    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 准备下一页请求
    ///
    /// 没有更多数据时返回 `None`
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if !self.has_more {
            return None;
        }
        self.state = TaskListState::Loading;
        Some(PageRequest {
            generation: self.generation,
            page: self.current_page + 1,
            query: self.query.clone(),
        })
    }

    /// 提交分页响应
    ///
    /// # 返回值
    ///
    /// * `Ok(n)` - 新追加的任务数，过期响应为0
    /// * `Err(ControllerError)` - 加载失败，列表、`has_more` 与页码保持不变
    pub fn apply_page(
        &mut self,
        request: &PageRequest,
        result: Result<TaskPage, ApiError>,
    ) -> Result<usize, ControllerError> {
        if request.generation != self.generation || request.page != self.current_page + 1 {
            debug!(
                generation = request.generation,
                current_generation = self.generation,
                page = request.page,
                "Discarding stale task page"
            );
            return Ok(0);
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                self.state = TaskListState::Error;
                warn!(page = request.page, error = %err, "Loading tasks failed");
                return Err(err.into());
            }
        };

        let before = self.tasks.len();
        for task in page.tasks {
            if self.task(task.task_id).is_none() {
                self.tasks.push(task);
            }
        }
        let appended = self.tasks.len() - before;

        self.has_more = page.has_more;
        self.current_page = request.page;
        self.state = if page.has_more {
            TaskListState::LoadedMore
        } else {
            TaskListState::LoadedEnd
        };
        debug!(
            page = self.current_page,
            appended,
            has_more = self.has_more,
            "Task page applied"
        );
        Ok(appended)
    }

    /// 加载下一页并追加到列表
    pub async fn load_tasks(&mut self) -> Result<usize, ControllerError> {
        let Some(request) = self.begin_load() else {
            return Ok(0);
        };
        let result = self
            .repository
            .load_tasks(&request.query, request.page)
            .await;
        self.apply_page(&request, result)
    }

    /// 清空列表并重新加载第一页
    pub async fn reload(&mut self) -> Result<usize, ControllerError> {
        self.generation = self.generation.wrapping_add(1);
        self.tasks.clear();
        self.current_page = 0;
        self.has_more = true;
        self.state = TaskListState::Empty;
        debug!(generation = self.generation, "Task list reset");
        self.load_tasks().await
    }

    /// 修改排序条件并重新加载
    pub async fn set_sort(
        &mut self,
        order_by: &str,
        sort: Option<SortOrder>,
    ) -> Result<usize, ControllerError> {
        self.query.order_by = order_by.to_string();
        self.query.sort = sort;
        self.reload().await
    }

    /// 修改标签过滤并重新加载
    pub async fn set_tag(&mut self, tag: &str) -> Result<usize, ControllerError> {
        self.query.tag = tag.to_string();
        self.reload().await
    }

    /// 启用或停用任务
    ///
    /// 失败时本地任务保持不变，真实状态需要重新加载才能得知
    pub async fn set_enabled(&mut self, task_id: i64, enable: bool) -> Result<(), ControllerError> {
        self.repository.enable_task(task_id, enable).await?;
        if let Some(task) = self.tasks.iter_mut().find(|task| task.task_id == task_id) {
            task.enable = enable;
        }
        Ok(())
    }

    /// 立即抓取一次，按 `task_id` 替换本地任务
    pub async fn force_crawl(&mut self, task_name: &str) -> Result<Task, ControllerError> {
        let task = self.repository.force_crawl(task_name).await?;
        if task.has_error() {
            warn!(task_id = task.task_id, error = %task.error, "Crawl task {} finished with error", task_name);
        } else {
            info!(task_id = task.task_id, "Crawl task {} success", task_name);
        }

        match self.tasks.iter_mut().find(|held| held.task_id == task.task_id) {
            Some(held) => *held = task.clone(),
            None => self.tasks.push(task.clone()),
        }
        Ok(task)
    }

    /// 新建或更新任务
    ///
    /// 本地校验不通过时直接返回 `ControllerError::Validation`，不发出请求。
    /// 保存成功后重新加载列表。
    pub async fn create_or_update(&mut self, form: &TaskForm) -> Result<(), ControllerError> {
        form.check().map_err(ControllerError::Validation)?;
        self.repository.save_task(form).await?;
        info!(name = %form.name, "Update task success");

        if let Err(err) = self.reload().await {
            warn!(error = %err, "Reloading tasks after save failed");
        }
        Ok(())
    }

    /// 删除任务，需要先确认
    pub async fn delete(
        &mut self,
        task_id: i64,
        confirmation: &dyn Confirmation,
    ) -> Result<Outcome, ControllerError> {
        if !confirmation.confirm(DELETE_PROMPT) {
            info!(task_id, "Delete task canceled");
            return Ok(Outcome::Cancelled);
        }
        self.repository.delete_task(task_id).await?;
        self.tasks.retain(|task| task.task_id != task_id);
        Ok(Outcome::Done)
    }
}

#[cfg(test)]
#[path = "task_list_test.rs"]
mod tests;
