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

use crate::application::controllers::confirmation::{
    Confirmation, DELETE_PROMPT, OVERWRITE_RULE_PROMPT,
};
use crate::application::dto::Outcome;
use crate::domain::models::host_rule::{host_of_url, CrawlerRule, HostRule, HostSummary};
use crate::domain::repositories::rule_repository::RuleRepository;
use crate::utils::errors::{ApiError, ControllerError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

static URL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").unwrap());

/// 后端在规则匹配冲突时返回的信息片段
const CONFLICT_MARKER: &str = "matched more than 1 rule";

/// 主机规则控制器
///
/// 持有主机列表、过滤条件和当前查看的主机规则
pub struct HostRuleController {
    repository: Arc<dyn RuleRepository>,
    hosts: Vec<HostSummary>,
    filter: String,
    current_host_rule: Option<HostRule>,
}

impl HostRuleController {
    pub fn new(repository: Arc<dyn RuleRepository>) -> Self {
        Self {
            repository,
            hosts: Vec::new(),
            filter: String::new(),
            current_host_rule: None,
        }
    }

    pub fn hosts(&self) -> &[HostSummary] {
        &self.hosts
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn current_host_rule(&self) -> Option<&HostRule> {
        self.current_host_rule.as_ref()
    }

    /// 设置过滤条件，完整地址会被缩减为主机名
    pub fn set_filter(&mut self, text: &str) {
        let text = text.trim();
        self.filter = if URL_PREFIX.is_match(text) {
            host_of_url(text).unwrap_or_else(|| text.to_string())
        } else {
            text.to_string()
        };
    }

    /// 名称包含过滤条件的主机
    pub fn visible_hosts(&self) -> Vec<&HostSummary> {
        self.hosts
            .iter()
            .filter(|host| host.name.contains(self.filter.as_str()))
            .collect()
    }

    /// 按过滤条件加载主机列表
    ///
    /// 后端返回规范化后的主机名，替换当前过滤条件
    pub async fn load_hosts(&mut self) -> Result<usize, ControllerError> {
        let list = self.repository.load_hosts(&self.filter).await?;
        self.filter = list.host;
        self.hosts = list.hosts;
        debug!(filter = %self.filter, count = self.hosts.len(), "Hosts loaded");
        Ok(self.hosts.len())
    }

    /// 查看主机规则
    pub async fn show_host_rule(&mut self, host: &str) -> Result<&HostRule, ControllerError> {
        let host_rule = self.repository.get_host_rule(host).await?;
        let host_rule = self.current_host_rule.insert(host_rule);
        Ok(&*host_rule)
    }

    /// 删除主机规则，需要先确认；成功后重新加载主机列表
    pub async fn delete_host_rule(
        &mut self,
        host: &str,
        confirmation: &dyn Confirmation,
    ) -> Result<Outcome, ControllerError> {
        if !confirmation.confirm(DELETE_PROMPT) {
            info!(host, "Delete host rule canceled");
            return Ok(Outcome::Cancelled);
        }
        self.repository.delete_host_rule(host).await?;
        self.current_host_rule = None;
        self.load_hosts().await?;
        Ok(Outcome::Done)
    }

    /// 更新主机抓取频率，`interval` 秒内最多 `n` 次
    pub async fn update_frequency(
        &mut self,
        host: &str,
        n: u32,
        interval: u32,
    ) -> Result<(), ControllerError> {
        self.repository.update_host_freq(host, n, interval).await?;
        if let Some(current) = self
            .current_host_rule
            .as_mut()
            .filter(|current| current.host == host)
        {
            current.n = n;
            current.interval = interval;
        }
        Ok(())
    }

    /// 查找匹配请求参数的爬虫规则
    ///
    /// `request_args` 为请求参数的JSON文本，不能为空
    pub async fn find_crawler_rule(&self, request_args: &str) -> Result<CrawlerRule, ControllerError> {
        if request_args.trim().is_empty() {
            return Err(ControllerError::InvalidInput(
                "request_args should not be null".to_string(),
            ));
        }
        let request_args: Value = serde_json::from_str(request_args)
            .map_err(|_| ControllerError::InvalidInput("Invalid JSON for request_args.".to_string()))?;
        Ok(self.repository.find_crawler_rule(&request_args).await?)
    }

    /// 添加爬虫规则
    ///
    /// 请求地址匹配到多条已有规则时询问是否覆盖，同意后以 `force=1` 重试一次
    pub async fn add_crawler_rule(
        &self,
        rule: &CrawlerRule,
        confirmation: &dyn Confirmation,
    ) -> Result<Outcome, ControllerError> {
        match self.repository.add_crawler_rule(rule, false).await {
            Ok(_) => {
                info!(name = %rule.name, "add rule success");
                Ok(Outcome::Done)
            }
            Err(ApiError::Rejected(msg)) if msg.contains(CONFLICT_MARKER) => {
                if !confirmation.confirm(OVERWRITE_RULE_PROMPT) {
                    info!(name = %rule.name, "Adding rule canceled.");
                    return Ok(Outcome::Cancelled);
                }
                match self.repository.add_crawler_rule(rule, true).await {
                    Ok(_) => {
                        info!(name = %rule.name, "add rule success (forced)");
                        Ok(Outcome::Done)
                    }
                    Err(ApiError::Rejected(msg)) if msg.contains(CONFLICT_MARKER) => {
                        Err(ControllerError::Conflict(msg))
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// 移除爬虫规则
    ///
    /// 有规则被移除时刷新当前主机规则，返回是否移除
    pub async fn pop_crawler_rule(&mut self, rule: &CrawlerRule) -> Result<bool, ControllerError> {
        let result = self.repository.pop_crawler_rule(rule).await?;
        let removed = is_truthy(&result);
        info!(name = %rule.name, removed, "pop rule success");

        if removed {
            if let Some(host) = self.current_host_rule.as_ref().map(|rule| rule.host.clone()) {
                self.show_host_rule(&host).await?;
            }
        }
        Ok(removed)
    }
}

/// 从请求参数JSON文本中提取 `url` 的主机名
pub fn host_of_request_args(request_args: &str) -> Result<String, ControllerError> {
    let request_args: Value = serde_json::from_str(request_args)
        .map_err(|_| ControllerError::InvalidInput("Invalid JSON for request_args.".to_string()))?;
    let url = request_args
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            ControllerError::InvalidInput("request_args.url should not be null".to_string())
        })?;
    host_of_url(url)
        .ok_or_else(|| ControllerError::InvalidInput(format!("no host name in url: {}", url)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[path = "host_rules_test.rs"]
mod tests;
