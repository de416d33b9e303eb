// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作时间规则模块
///
/// - 规则（rule）：工作时间规则的解析与求值
/// - 调度（schedule）：根据规则计算下次检查时间
pub mod rule;
pub mod schedule;

pub use rule::{evaluate, WorkHours, WorkHoursError};
pub use schedule::{find_next_check_time, CheckPlan};
