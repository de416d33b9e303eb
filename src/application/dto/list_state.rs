// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::task_repository::TaskQuery;
use serde::Serialize;
use std::fmt;

/// 任务列表状态
///
/// `Empty → Loading → (LoadedMore | LoadedEnd | Error)`。
/// `LoadedEnd` 对当前排序与过滤条件是终态，修改条件或重新加载回到 `Empty`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskListState {
    #[default]
    Empty,
    Loading,
    LoadedMore,
    LoadedEnd,
    Error,
}

impl fmt::Display for TaskListState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TaskListState::Empty => "empty",
            TaskListState::Loading => "loading",
            TaskListState::LoadedMore => "loaded_more",
            TaskListState::LoadedEnd => "loaded_end",
            TaskListState::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// 一次分页请求
///
/// `generation` 与控制器当前代数不一致时，响应会被丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 发起请求时控制器的代数
    pub generation: u64,
    /// 请求的页码，从1开始
    pub page: u32,
    /// 发起请求时的查询条件
    pub query: TaskQuery,
}
