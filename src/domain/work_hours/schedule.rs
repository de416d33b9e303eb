// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::rule::{WorkHours, WorkHoursError};
use chrono::{NaiveDateTime, TimeDelta};

/// 向后查找工作时间的最大步数
const LOOKAHEAD_STEPS: u32 = 60;

/// 调度计划
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPlan {
    /// 当前是否需要抓取
    pub need_crawl: bool,
    /// 下次检查时间
    pub next_check_time: NaiveDateTime,
}

/// 计算任务的下次检查时间
///
/// 1. 设置了 `#秒数` 且距离上次变更不足该间隔时，等到 `last_change_time + 间隔`
/// 2. 当前处于工作时间：立即抓取，下次检查为 `now + interval`
/// 3. 否则以 `interval` 为步长向后查找第一个工作时间点，最多查找60步
///
/// # 参数
///
/// * `work_hours` - 工作时间规则
/// * `interval_secs` - 检查间隔（秒），必须大于0
/// * `last_change_time` - 上次内容变更时间
/// * `now` - 当前本地时间
pub fn find_next_check_time(
    work_hours: &WorkHours,
    interval_secs: u64,
    last_change_time: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<CheckPlan, WorkHoursError> {
    if interval_secs == 0 {
        return Err(WorkHoursError::InvalidInterval);
    }
    let interval = seconds(interval_secs).ok_or(WorkHoursError::InvalidInterval)?;

    if let Some(change_interval) = work_hours.change_interval() {
        let next_change_time = seconds(change_interval)
            .and_then(|delta| last_change_time.checked_add_signed(delta))
            .ok_or_else(|| WorkHoursError::InvalidChangeInterval(change_interval.to_string()))?;
        if now < next_change_time {
            return Ok(CheckPlan {
                need_crawl: false,
                next_check_time: next_change_time,
            });
        }
    }

    if work_hours.is_work_time(now) {
        return Ok(CheckPlan {
            need_crawl: true,
            next_check_time: advance(now, interval)?,
        });
    }

    let mut next_check_time = now;
    for _ in 0..LOOKAHEAD_STEPS {
        next_check_time = advance(next_check_time, interval)?;
        if work_hours.is_work_time(next_check_time) {
            break;
        }
    }
    Ok(CheckPlan {
        need_crawl: false,
        next_check_time,
    })
}

fn seconds(value: u64) -> Option<TimeDelta> {
    i64::try_from(value).ok().and_then(TimeDelta::try_seconds)
}

fn advance(time: NaiveDateTime, interval: TimeDelta) -> Result<NaiveDateTime, WorkHoursError> {
    time.checked_add_signed(interval)
        .ok_or(WorkHoursError::InvalidInterval)
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
