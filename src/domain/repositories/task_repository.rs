// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::{Task, TaskForm};
use crate::utils::errors::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    /// 兼容表格组件给出的 `ascending`/`descending`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("bad sort arg {} not in (asc, desc)", other)),
        }
    }
}

/// 任务列表查询参数
///
/// `sort` 为空时后端不排序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub order_by: String,
    pub sort: Option<SortOrder>,
    pub tag: String,
    pub page_size: Option<u32>,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            order_by: "last_change_time".to_string(),
            sort: Some(SortOrder::Desc),
            tag: String::new(),
            page_size: None,
        }
    }
}

impl TaskQuery {
    /// 生成 `load_tasks` 的查询参数
    pub fn to_params(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("order_by", self.order_by.clone()),
            (
                "sort",
                self.sort.map(|sort| sort.to_string()).unwrap_or_default(),
            ),
            ("tag", self.tag.clone()),
            ("page", page.to_string()),
        ];
        if let Some(page_size) = self.page_size {
            params.push(("page_size", page_size.to_string()));
        }
        params
    }
}

/// 一页任务
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TaskPage {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub has_more: bool,
}

/// 任务仓库特质
///
/// 定义任务服务的访问接口，每个方法对应后端一个接口
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 加载一页任务，`page` 从1开始
    async fn load_tasks(&self, query: &TaskQuery, page: u32) -> Result<TaskPage, ApiError>;
    /// 新建或更新任务
    async fn save_task(&self, form: &TaskForm) -> Result<(), ApiError>;
    /// 启用或停用任务
    async fn enable_task(&self, task_id: i64, enable: bool) -> Result<(), ApiError>;
    /// 立即抓取一次，返回抓取后的任务
    async fn force_crawl(&self, task_name: &str) -> Result<Task, ApiError>;
    /// 删除任务
    async fn delete_task(&self, task_id: i64) -> Result<(), ApiError>;
}
