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

use crate::domain::models::host_rule::{CrawlerRule, HostRule};
use crate::domain::repositories::rule_repository::{HostList, RuleRepository};
use crate::infrastructure::api::{Ack, ApiClient};
use crate::utils::errors::ApiError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

#[derive(Deserialize)]
struct HostRulePayload {
    host_rule: HostRule,
}

#[derive(Deserialize)]
struct RuleTextPayload {
    result: String,
}

#[derive(Deserialize)]
struct ResultPayload {
    #[serde(default)]
    result: Value,
}

/// 规则仓库实现
///
/// 基于后端HTTP接口实现主机规则与爬虫规则的访问
#[derive(Clone)]
pub struct RuleRepositoryImpl {
    client: ApiClient,
}

impl RuleRepositoryImpl {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RuleRepository for RuleRepositoryImpl {
    async fn load_hosts(&self, filter: &str) -> Result<HostList, ApiError> {
        self.client
            .get("load_hosts", &[("host", filter.to_string())])
            .await
    }

    async fn get_host_rule(&self, host: &str) -> Result<HostRule, ApiError> {
        let payload: HostRulePayload = self
            .client
            .get("get_host_rule", &[("host", host.to_string())])
            .await?;
        Ok(payload.host_rule)
    }

    async fn delete_host_rule(&self, host: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .client
            .get("delete_host_rule", &[("host", host.to_string())])
            .await?;
        info!(host, "[Delete] host rule removed");
        Ok(())
    }

    async fn update_host_freq(&self, host: &str, n: u32, interval: u32) -> Result<(), ApiError> {
        let params = [
            ("host", host.to_string()),
            ("n", n.to_string()),
            ("interval", interval.to_string()),
        ];
        let _: Ack = self.client.get("update_host_freq", &params).await?;
        info!(host, n, interval, "[Update] host frequency");
        Ok(())
    }

    async fn find_crawler_rule(&self, request_args: &Value) -> Result<CrawlerRule, ApiError> {
        // the matched rule comes back as serialized JSON text
        let payload: RuleTextPayload =
            self.client.post("find_crawler_rule", &[], request_args).await?;
        Ok(serde_json::from_str(&payload.result)?)
    }

    async fn add_crawler_rule(&self, rule: &CrawlerRule, force: bool) -> Result<Value, ApiError> {
        let mut query = Vec::new();
        if force {
            query.push(("force", "1".to_string()));
        }
        let payload: ResultPayload = self.client.post("crawler_rule.add", &query, rule).await?;
        info!(name = %rule.name, force, "[Add] crawler rule");
        Ok(payload.result)
    }

    async fn pop_crawler_rule(&self, rule: &CrawlerRule) -> Result<Value, ApiError> {
        let payload: ResultPayload = self.client.post("crawler_rule.pop", &[], rule).await?;
        info!(name = %rule.name, removed = !payload.result.is_null(), "[Pop] crawler rule");
        Ok(payload.result)
    }
}

#[cfg(test)]
#[path = "rule_repo_impl_test.rs"]
mod tests;
