// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::host_rule::{HostRule, HostSummary};
use crate::domain::models::task::Task;
use chrono::NaiveDateTime;
use std::fmt::Write;

/// 最新结果预览的默认长度（字符）
pub const PREVIEW_CHARS: usize = 80;

/// 时间显示格式，不带小数秒
pub fn format_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 最新结果预览
///
/// 取JSON中 `text` 字段的前 `max_chars` 个字符；不是JSON或没有 `text` 时原样返回
pub fn latest_preview(latest_result: &str, max_chars: usize) -> String {
    serde_json::from_str::<serde_json::Value>(latest_result)
        .ok()
        .and_then(|value| value.get("text").and_then(|text| text.as_str()).map(str::to_string))
        .map(|text| text.chars().take(max_chars).collect())
        .unwrap_or_else(|| latest_result.to_string())
}

/// 任务列表中的一行
pub fn task_row(task: &Task) -> String {
    let mut row = format!(
        "{:>5}  {}  {:<24} [{}]",
        task.task_id,
        if task.enable { "on " } else { "off" },
        task.name,
        task.tag
    );
    if let Some(timeago) = task.timeago.as_deref().filter(|t| !t.is_empty()) {
        let _ = write!(row, " {}", timeago);
    }
    let _ = write!(row, "  {}", latest_preview(&task.latest_result, PREVIEW_CHARS));
    if task.has_error() {
        row.push_str("  (!)");
    }
    row
}

/// 任务的时间信息
pub fn task_times(task: &Task) -> String {
    format!(
        "last_check_time   {}\nnext_check_time   {}\nlast_change_time  {}",
        format_time(&task.last_check_time),
        format_time(&task.next_check_time),
        format_time(&task.last_change_time)
    )
}

/// 任务的历史结果，每行为 `时间  文本  地址`
pub fn result_list(task: &Task) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for entry in task.result_entries()? {
        let _ = write!(out, "{}  {}", entry.time, entry.text().unwrap_or_default());
        if let Some(url) = entry.url() {
            let _ = write!(out, "  {}", url);
        }
        out.push('\n');
    }
    Ok(out)
}

/// 任务详情
pub fn task_detail(task: &Task) -> String {
    let mut out = format!(
        "{}\n\nrequest_args      {}\norigin_url        {}\ninterval          {}\nwork_hours        {}\nmax_result_count  {}\ncustom_info       {}\n{}",
        task_row(task),
        task.request_args,
        task.origin_url,
        task.interval,
        task.work_hours,
        task.max_result_count,
        task.custom_info,
        task_times(task)
    );
    if task.has_error() {
        let _ = write!(out, "\nerror             {}", task.error);
    }
    out
}

pub fn host_row(host: &HostSummary) -> String {
    if host.freq {
        format!("{}  (frequency limited)", host.name)
    } else {
        host.name.clone()
    }
}

/// 主机规则详情
pub fn host_rule_detail(host_rule: &HostRule) -> String {
    let mut out = format!(
        "host      {}\nfrequency {} per {}s\n",
        host_rule.host, host_rule.n, host_rule.interval
    );
    if host_rule.crawler_rules.is_empty() {
        out.push_str("no crawler rules\n");
    }
    for (name, rule) in &host_rule.crawler_rules {
        let _ = writeln!(out, "- {}  {}", name, rule.regex);
    }
    out
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
