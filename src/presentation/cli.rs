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

use crate::application::controllers::host_rules::host_of_request_args;
use crate::application::controllers::{HostRuleController, TaskListController};
use crate::application::dto::Outcome;
use crate::config::settings::{ListSettings, Settings};
use crate::domain::models::host_rule::CrawlerRule;
use crate::domain::models::task::{TaskForm, DEFAULT_MAX_RESULT_COUNT};
use crate::domain::repositories::task_repository::{SortOrder, TaskQuery};
use crate::domain::work_hours::{find_next_check_time, CheckPlan, WorkHours};
use crate::infrastructure::api::ApiClient;
use crate::infrastructure::repositories::rule_repo_impl::RuleRepositoryImpl;
use crate::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use crate::presentation::prompt::StdinConfirm;
use crate::presentation::views;
use anyhow::Context;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const WORK_HOURS_DOC: &str = "\
Rule forms:

1. Hour range, two numbers separated by ', ':
   0, 24              00:00 ~ 23:59 every day
2. JSON list of hours:
   [1, 19]            01:00~01:59 and 19:00~19:59 every day
3. strftime pattern, '==' for equal and '!=' for unequal:
   %A==Friday         every Friday
   %m-%d==03-13       every year on 03-13
   %H==05             every day 05:00 ~ 05:59
4. Combined rules, ';' or '&' => and, '|' => or, folded left to right:
   %w==5;20, 24       every Friday 20:00 ~ 23:59
   [1, 2, 15];%w==5   every Friday at 1 a.m., 2 a.m. and 3 p.m.
   %w==5|20, 24       every Friday, or every day 20:00 ~ 23:59
   %w==5|%w==2        every Friday or Tuesday
   %w!=6&%w!=0        every day except Saturday and Sunday

Append '#SECONDS' to skip crawling until SECONDS after the last change:
   0, 24#3600         at most one change per hour";

/// 监控任务管理端命令行
#[derive(Parser, Debug)]
#[command(name = "watchdogs")]
#[command(about = "Manage watchdog crawl tasks and host rules")]
#[command(version)]
pub struct Cli {
    /// 后端根地址，覆盖配置
    #[arg(long, global = true, help = "Backend base url, overrides configuration")]
    pub base_url: Option<String>,

    /// 配置文件
    #[arg(long, global = true, help = "Configuration file to load instead of config/")]
    pub config: Option<PathBuf>,

    /// 跳过确认
    #[arg(short = 'y', long, global = true, help = "Answer yes to confirmation prompts")]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks page by page.
    Tasks {
        #[arg(long, help = "Column to sort by")]
        order_by: Option<String>,

        #[arg(long, help = "Sort direction: asc, desc or empty for unsorted")]
        sort: Option<String>,

        #[arg(long, help = "Only show tasks with this tag")]
        tag: Option<String>,

        #[arg(long, default_value_t = 1, help = "Number of pages to load")]
        pages: u32,

        #[arg(long, help = "Load pages until there are no more")]
        all: bool,

        #[arg(long, help = "Show full details of each task")]
        detail: bool,

        #[arg(long, help = "Show the result list of each task")]
        results: bool,
    },

    /// Enable or disable a task.
    Enable {
        task_id: i64,

        #[arg(long, help = "Disable instead of enable")]
        disable: bool,
    },

    /// Crawl a task once, out of schedule.
    Crawl { task_name: String },

    /// Create a new task, or update one when --task-id is given.
    Save(SaveArgs),

    /// Delete a task.
    Delete { task_id: i64 },

    /// List hosts that have rules.
    Hosts {
        #[arg(help = "Host name fragment or url")]
        filter: Option<String>,
    },

    /// Show the rule of a host.
    HostRule { host: String },

    /// Delete the rule of a host.
    DeleteHost { host: String },

    /// Limit crawling of a host to N requests per INTERVAL seconds.
    HostFreq {
        host: String,
        n: u32,
        interval: u32,
    },

    /// Find the crawler rule matching request args JSON.
    FindRule {
        request_args: String,

        #[arg(long, help = "Print a new task form filled from the rule")]
        as_task: bool,

        #[arg(long, requires = "as_task", help = "Callback name for the new task form")]
        callback: Option<String>,
    },

    /// Add a crawler rule from JSON text.
    AddRule { rule: String },

    /// Remove a crawler rule given as JSON text.
    PopRule { rule: String },

    /// Check a work-hours rule.
    #[command(after_long_help = WORK_HOURS_DOC)]
    WorkHours {
        rule: String,

        #[arg(long, value_parser = parse_local_time, help = "Check at this time (YYYY-MM-DD HH:MM:SS) instead of now")]
        at: Option<NaiveDateTime>,

        #[arg(long, help = "Task interval in seconds, prints the next check time")]
        interval: Option<u64>,

        #[arg(long, value_parser = parse_local_time, help = "Last change time used with '#SECONDS' rules")]
        last_change: Option<NaiveDateTime>,
    },
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    #[arg(long, help = "Task to update; omit to create a new task")]
    pub task_id: Option<i64>,

    #[arg(long)]
    pub name: String,

    #[arg(long, help = "Request args JSON")]
    pub request_args: String,

    #[arg(long, default_value = "")]
    pub origin_url: String,

    #[arg(long, default_value = "default")]
    pub tag: String,

    #[arg(long, default_value_t = 300, help = "Check interval in seconds")]
    pub interval: u64,

    #[arg(long, default_value = "0, 24", help = "Work-hours rule, see `work-hours --help`")]
    pub work_hours: String,

    #[arg(long, default_value_t = DEFAULT_MAX_RESULT_COUNT)]
    pub max_result_count: u32,

    #[arg(long, default_value = "[]", help = "Result list JSON")]
    pub result_list: String,

    #[arg(long, default_value = "", help = "Callback as name:arg")]
    pub custom_info: String,

    #[arg(long, help = "Save the task disabled")]
    pub disable: bool,
}

impl From<SaveArgs> for TaskForm {
    fn from(args: SaveArgs) -> Self {
        Self {
            task_id: args.task_id,
            name: args.name,
            enable: !args.disable,
            tag: args.tag,
            request_args: args.request_args,
            origin_url: args.origin_url,
            interval: args.interval,
            work_hours: args.work_hours,
            max_result_count: args.max_result_count,
            result_list: args.result_list,
            custom_info: args.custom_info,
        }
    }
}

fn parse_local_time(text: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("expected YYYY-MM-DD HH:MM:SS: {}", e))
}

fn parse_sort(text: &str) -> anyhow::Result<Option<SortOrder>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    text.parse().map(Some).map_err(anyhow::Error::msg)
}

/// 由配置生成默认查询条件
pub fn default_query(list: &ListSettings) -> anyhow::Result<TaskQuery> {
    Ok(TaskQuery {
        order_by: list.order_by.clone(),
        sort: parse_sort(&list.sort)?,
        tag: list.tag.clone(),
        page_size: list.page_size,
    })
}

/// 执行命令
pub async fn run(cli: Cli, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }
    let confirm = StdinConfirm::new(cli.yes);

    // work-hours runs locally
    if let Commands::WorkHours {
        rule,
        at,
        interval,
        last_change,
    } = &cli.command
    {
        return check_work_hours(rule, *at, *interval, *last_change);
    }

    let client = ApiClient::new(&settings.api)
        .with_context(|| format!("invalid api.base_url {}", settings.api.base_url))?;
    info!(base_url = %client.base_url(), "Using backend");
    let tasks = Arc::new(TaskRepositoryImpl::new(client.clone()));
    let rules = Arc::new(RuleRepositoryImpl::new(client));
    let mut query = default_query(&settings.list)?;
    if let Commands::Tasks {
        order_by, sort, tag, ..
    } = &cli.command
    {
        if let Some(order_by) = order_by {
            query.order_by = order_by.clone();
        }
        if let Some(sort) = sort {
            query.sort = parse_sort(sort)?;
        }
        if let Some(tag) = tag {
            query.tag = tag.clone();
        }
    }
    let mut task_list = TaskListController::new(tasks, query);
    let mut host_rules = HostRuleController::new(rules);

    match cli.command {
        Commands::Tasks {
            pages,
            all,
            detail,
            results,
            ..
        } => {
            task_list.reload().await?;
            while task_list.has_more() && (all || task_list.current_page() < pages) {
                task_list.load_tasks().await?;
            }

            for task in task_list.tasks() {
                if detail {
                    println!("{}\n", views::task_detail(task));
                } else {
                    println!("{}", views::task_row(task));
                }
                if results {
                    print!("{}", views::result_list(task)?);
                }
            }
            println!(
                "-- {} tasks, {} pages, {}",
                task_list.tasks().len(),
                task_list.current_page(),
                if task_list.has_more() { "more available" } else { "end" }
            );
        }
        Commands::Enable { task_id, disable } => {
            task_list.set_enabled(task_id, !disable).await?;
            println!("task {} {}", task_id, if disable { "disabled" } else { "enabled" });
        }
        Commands::Crawl { task_name } => {
            let task = task_list.force_crawl(&task_name).await?;
            if task.has_error() {
                println!("Crawl task {} {}", task_name, task.error);
            } else {
                println!("Crawl task {} success", task_name);
            }
            println!("{}", views::task_detail(&task));
        }
        Commands::Save(args) => {
            let form = TaskForm::from(args);
            task_list.create_or_update(&form).await?;
            println!("Update task {} success", form.name);
        }
        Commands::Delete { task_id } => match task_list.delete(task_id, &confirm).await? {
            Outcome::Done => println!("Delete task {} success", task_id),
            Outcome::Cancelled => println!("Canceled"),
        },
        Commands::Hosts { filter } => {
            if let Some(filter) = filter.as_deref() {
                host_rules.set_filter(filter);
            }
            host_rules.load_hosts().await?;
            for host in host_rules.visible_hosts() {
                println!("{}", views::host_row(host));
            }
        }
        Commands::HostRule { host } => {
            let host_rule = host_rules.show_host_rule(&host).await?;
            print!("{}", views::host_rule_detail(host_rule));
        }
        Commands::DeleteHost { host } => match host_rules.delete_host_rule(&host, &confirm).await? {
            Outcome::Done => println!("Delete host {} rule success", host),
            Outcome::Cancelled => println!("Canceled"),
        },
        Commands::HostFreq { host, n, interval } => {
            host_rules.update_frequency(&host, n, interval).await?;
            println!("Update frequency {}: {} per {}s", host, n, interval);
        }
        Commands::FindRule {
            request_args,
            as_task,
            callback,
        } => {
            let rule = host_rules.find_crawler_rule(&request_args).await?;
            if as_task {
                let mut form = TaskForm::from_crawler_rule(&rule)?;
                if let Some(callback) = callback.as_deref() {
                    form = form.with_callback(callback);
                }
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&rule)?);
                if let Ok(host) = host_of_request_args(&request_args) {
                    println!("host: {}", host);
                }
            }
        }
        Commands::AddRule { rule } => {
            let rule: CrawlerRule = serde_json::from_str(&rule).context("Invalid JSON for crawler rule")?;
            match host_rules.add_crawler_rule(&rule, &confirm).await? {
                Outcome::Done => println!("add rule success"),
                Outcome::Cancelled => println!("Adding rule canceled."),
            }
        }
        Commands::PopRule { rule } => {
            let rule: CrawlerRule = serde_json::from_str(&rule).context("Invalid JSON for crawler rule")?;
            if let Some(host) = rule.host() {
                host_rules.show_host_rule(&host).await?;
            }
            let removed = host_rules.pop_crawler_rule(&rule).await?;
            println!("pop rule success, removed: {}", removed);
        }
        Commands::WorkHours { .. } => {}
    }
    Ok(())
}

fn check_work_hours(
    rule: &str,
    at: Option<NaiveDateTime>,
    interval: Option<u64>,
    last_change: Option<NaiveDateTime>,
) -> anyhow::Result<()> {
    let work_hours: WorkHours = rule.parse()?;
    let now = at.unwrap_or_else(|| Local::now().naive_local());
    println!("rule      {}", work_hours);
    println!("time      {}", views::format_time(&now));
    println!("work time {}", work_hours.is_work_time(now));

    if let Some(interval) = interval {
        let plan = plan_work_hours(&work_hours, interval, last_change, now)?;
        println!("crawl now {}", plan.need_crawl);
        println!("next      {}", views::format_time(&plan.next_check_time));
    }
    Ok(())
}

/// 未指定上次变更时间时按从未变更（Unix纪元）处理
fn plan_work_hours(
    work_hours: &WorkHours,
    interval: u64,
    last_change: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> anyhow::Result<CheckPlan> {
    let last_change = last_change.unwrap_or(DateTime::<Utc>::UNIX_EPOCH.naive_utc());
    Ok(find_next_check_time(work_hours, interval, last_change, now)?)
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
