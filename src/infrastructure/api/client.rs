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

use crate::config::settings::ApiSettings;
use crate::utils::errors::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// 没有负载的成功响应
#[derive(Debug, Default, Deserialize)]
pub struct Ack {}

/// 后端接口客户端
///
/// 所有接口返回 `{"msg": "ok", ...}` 形式的JSON，`msg != "ok"` 视为失败。
/// 缺少 `msg` 字段的响应（如 `load_hosts`）视为成功。
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP 客户端
    client: reqwest::Client,
    /// 后端根地址，以 `/` 结尾
    base_url: Url,
}

impl ApiClient {
    /// 根据配置创建客户端
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::build(&settings.base_url, settings.timeout(), &settings.user_agent)
    }

    /// 使用默认超时创建指向 `base_url` 的客户端
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::build(
            base_url,
            Duration::from_secs(60),
            concat!("watchdogs-cli/", env!("CARGO_PKG_VERSION")),
        )
    }

    fn build(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// 后端根地址
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// 发送GET请求
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, ?query, "GET");
        let start = Instant::now();
        let response = self.client.get(url).query(query).send().await?;
        Self::decode(path, response, start).await
    }

    /// 发送JSON请求体的POST请求
    pub async fn post<B, T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(%url, ?query, "POST");
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .query(query)
            .json(body)
            .send()
            .await?;
        Self::decode(path, response, start).await
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
        start: Instant,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        debug!(
            path,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "response received"
        );

        if !status.is_success() {
            warn!(path, status = status.as_u16(), "backend returned error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        let msg = match value.get("msg") {
            None => "ok".to_string(),
            Some(serde_json::Value::String(msg)) => msg.clone(),
            Some(other) => other.to_string(),
        };
        if msg != "ok" {
            warn!(path, %msg, "backend rejected request");
            return Err(ApiError::Rejected(msg));
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
