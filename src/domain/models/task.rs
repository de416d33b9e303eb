// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::host_rule::CrawlerRule;
use super::serde_ext::{flag, null_as_default};
use crate::domain::work_hours::{find_next_check_time, CheckPlan, WorkHours, WorkHoursError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// 新任务的默认检查间隔（秒）
pub const DEFAULT_INTERVAL: u64 = 300;
/// 新任务的默认工作时间
pub const DEFAULT_WORK_HOURS: &str = "0, 24";
/// 新任务默认保留的结果条数
pub const DEFAULT_MAX_RESULT_COUNT: u32 = 10;
/// 新任务的默认标签
pub const DEFAULT_TAG: &str = "default";

/// 监控任务实体
///
/// 一个定时抓取任务的定义，附带最近的抓取结果和时间信息。
/// 以 `task_id` 作为唯一标识。`result_list` 的长度由后端保证不超过
/// `max_result_count`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// 任务唯一标识符
    pub task_id: i64,
    /// 任务名称，全局唯一
    pub name: String,
    /// 是否参与调度
    #[serde(with = "flag")]
    pub enable: bool,
    /// 标签，用于列表过滤
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag: String,
    /// 请求参数（JSON文本）
    pub request_args: String,
    /// 原始页面地址
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_url: String,
    /// 检查间隔（秒）
    pub interval: u64,
    /// 工作时间规则
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_hours: String,
    /// 最多保留的结果条数
    pub max_result_count: u32,
    /// 最新结果（JSON文本）
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_result: String,
    /// 历史结果（JSON数组文本）
    #[serde(default, deserialize_with = "null_as_default")]
    pub result_list: String,
    /// 回调配置，格式为 `name:arg`
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_info: String,
    /// 最近一次抓取的错误信息
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
    /// 上次检查时间
    pub last_check_time: NaiveDateTime,
    /// 下次检查时间
    pub next_check_time: NaiveDateTime,
    /// 上次内容变更时间
    pub last_change_time: NaiveDateTime,
    /// 后端附带的 “多久之前变更” 描述
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeago: Option<String>,
}

/// 历史结果条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// 抓取时间
    #[serde(default)]
    pub time: String,
    /// 抓取结果，通常为 `{"text": ..., "url": ...}`
    #[serde(default)]
    pub result: serde_json::Value,
}

impl ResultEntry {
    pub fn text(&self) -> Option<&str> {
        self.result.get("text").and_then(|v| v.as_str())
    }

    pub fn url(&self) -> Option<&str> {
        self.result
            .get("url")
            .and_then(|v| v.as_str())
            .filter(|url| !url.is_empty())
    }
}

impl Task {
    /// 解析历史结果
    pub fn result_entries(&self) -> Result<Vec<ResultEntry>, serde_json::Error> {
        if self.result_list.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&self.result_list)
    }

    /// 解析工作时间规则，空规则视为全天
    pub fn work_hours(&self) -> Result<WorkHours, WorkHoursError> {
        if self.work_hours.trim().is_empty() {
            WorkHours::parse(DEFAULT_WORK_HOURS)
        } else {
            WorkHours::parse(&self.work_hours)
        }
    }

    /// 计算该任务在 `now` 时的调度计划
    pub fn plan_next_check(&self, now: NaiveDateTime) -> Result<CheckPlan, WorkHoursError> {
        find_next_check_time(&self.work_hours()?, self.interval, self.last_change_time, now)
    }

    /// 最近一次抓取是否出错
    pub fn has_error(&self) -> bool {
        !self.error.trim().is_empty()
    }
}

/// 任务表单
///
/// 新建或编辑任务时提交给 `add_new_task` 的字段，`task_id` 为空表示新建。
/// 提交前必须通过 [`TaskForm::check`]：`result_list` 与 `request_args`
/// 必须是合法的JSON文本。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TaskForm {
    /// 任务ID，为空表示新建
    pub task_id: Option<i64>,
    /// 任务名称
    pub name: String,
    /// 是否启用
    #[serde(with = "flag")]
    pub enable: bool,
    /// 标签
    pub tag: String,
    /// 请求参数（JSON文本）
    #[validate(custom(function = "validate_request_args"))]
    pub request_args: String,
    /// 原始页面地址
    pub origin_url: String,
    /// 检查间隔（秒）
    pub interval: u64,
    /// 工作时间规则
    pub work_hours: String,
    /// 最多保留的结果条数
    pub max_result_count: u32,
    /// 历史结果（JSON数组文本）
    #[validate(custom(function = "validate_result_list"))]
    pub result_list: String,
    /// 回调配置
    pub custom_info: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            task_id: None,
            name: String::new(),
            enable: true,
            tag: DEFAULT_TAG.to_string(),
            request_args: String::new(),
            origin_url: String::new(),
            interval: DEFAULT_INTERVAL,
            work_hours: DEFAULT_WORK_HOURS.to_string(),
            max_result_count: DEFAULT_MAX_RESULT_COUNT,
            result_list: "[]".to_string(),
            custom_info: String::new(),
        }
    }
}

impl TaskForm {
    /// 用已有任务填充表单（编辑）
    pub fn from_task(task: &Task) -> Self {
        Self {
            task_id: Some(task.task_id),
            name: task.name.clone(),
            enable: task.enable,
            tag: task.tag.clone(),
            request_args: task.request_args.clone(),
            origin_url: task.origin_url.clone(),
            interval: task.interval,
            work_hours: task.work_hours.clone(),
            max_result_count: task.max_result_count,
            result_list: if task.result_list.trim().is_empty() {
                "[]".to_string()
            } else {
                task.result_list.clone()
            },
            custom_info: task.custom_info.clone(),
        }
    }

    /// 用爬虫规则填充新任务表单
    pub fn from_crawler_rule(rule: &CrawlerRule) -> Result<Self, serde_json::Error> {
        Ok(Self {
            name: rule.name.clone(),
            request_args: serde_json::to_string(&rule.request_args)?,
            origin_url: rule.url().unwrap_or_default().to_string(),
            ..Self::default()
        })
    }

    /// 设置回调名称，`custom_info` 变为 `name:`，参数由操作者补全
    pub fn with_callback(mut self, name: &str) -> Self {
        self.custom_info = format!("{}:", name);
        self
    }

    /// 提交前的本地校验
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 校验通过
    /// * `Err(String)` - 面向操作者的错误信息，`result_list` 优先报告
    pub fn check(&self) -> Result<(), String> {
        let errors = match self.validate() {
            Ok(()) => return Ok(()),
            Err(errors) => errors,
        };
        let field_errors = errors.field_errors();
        for field in ["result_list", "request_args"] {
            let message = field_errors
                .get(field)
                .and_then(|errs| errs.first())
                .and_then(|err| err.message.as_ref());
            if let Some(message) = message {
                return Err(message.to_string());
            }
        }
        Err(errors.to_string())
    }
}

fn validate_json_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    match serde_json::from_str::<serde_json::Value>(value) {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut error = ValidationError::new("invalid_json");
            error.message = Some(Cow::Owned(format!("Invalid JSON for {}.", field)));
            Err(error)
        }
    }
}

fn validate_result_list(value: &str) -> Result<(), ValidationError> {
    validate_json_text(value, "result_list")
}

fn validate_request_args(value: &str) -> Result<(), ValidationError> {
    validate_json_text(value, "request_args")
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
