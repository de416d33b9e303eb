// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::host_rule::{CrawlerRule, HostRule, HostSummary};
use crate::utils::errors::ApiError;
use async_trait::async_trait;
use serde::Deserialize;

/// 主机列表查询结果
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HostList {
    /// 后端规范化后的过滤条件
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub hosts: Vec<HostSummary>,
}

/// 规则仓库特质
///
/// 定义主机规则与爬虫规则的访问接口
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// 按主机名模糊过滤主机列表
    async fn load_hosts(&self, filter: &str) -> Result<HostList, ApiError>;
    /// 获取主机规则
    async fn get_host_rule(&self, host: &str) -> Result<HostRule, ApiError>;
    /// 删除主机规则
    async fn delete_host_rule(&self, host: &str) -> Result<(), ApiError>;
    /// 更新主机抓取频率
    async fn update_host_freq(&self, host: &str, n: u32, interval: u32) -> Result<(), ApiError>;
    /// 查找匹配请求参数的爬虫规则
    async fn find_crawler_rule(
        &self,
        request_args: &serde_json::Value,
    ) -> Result<CrawlerRule, ApiError>;
    /// 添加爬虫规则，`force` 为真时覆盖已匹配的旧规则
    async fn add_crawler_rule(
        &self,
        rule: &CrawlerRule,
        force: bool,
    ) -> Result<serde_json::Value, ApiError>;
    /// 移除爬虫规则，返回被移除的规则（不存在时为 null）
    async fn pop_crawler_rule(&self, rule: &CrawlerRule) -> Result<serde_json::Value, ApiError>;
}
