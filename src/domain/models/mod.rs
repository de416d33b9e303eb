// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 任务（task）：定时抓取任务及其表单
/// - 主机规则（host_rule）：主机频率限制与爬虫规则
pub mod host_rule;
pub(crate) mod serde_ext;
pub mod task;

pub use host_rule::{host_of_url, CrawlerRule, HostRule, HostSummary};
pub use task::{ResultEntry, Task, TaskForm};
