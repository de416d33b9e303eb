// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 控制器模块
///
/// - 任务列表（task_list）：分页加载与任务变更
/// - 主机规则（host_rules）：主机频率限制与爬虫规则管理
/// - 确认（confirmation）：破坏性操作前的确认能力
pub mod confirmation;
pub mod host_rules;
pub mod task_list;

pub use confirmation::Confirmation;
pub use host_rules::HostRuleController;
pub use task_list::TaskListController;
