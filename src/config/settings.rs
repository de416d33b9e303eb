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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 后端接口配置
    pub api: ApiSettings,
    /// 任务列表默认查询参数
    pub list: ListSettings,
}

/// 后端接口配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// 后端根地址，各接口路径相对于它拼接
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 请求使用的User-Agent
    pub user_agent: String,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 任务列表配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ListSettings {
    /// 排序字段
    pub order_by: String,
    /// 排序方向 (asc, desc)
    pub sort: String,
    /// 标签过滤，空字符串表示不过滤
    pub tag: String,
    /// 每页条数，未设置时使用后端默认值
    pub page_size: Option<u32>,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{WATCHDOGS_ENVIRONMENT}`
    /// 以及 `WATCHDOGS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("WATCHDOGS_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("WATCHDOGS").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 从指定文件加载配置（文件缺失时报错）
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("WATCHDOGS").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.base_url", "http://127.0.0.1:9901/")?
            .set_default("api.timeout_secs", 60)?
            .set_default(
                "api.user_agent",
                concat!("watchdogs-cli/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("list.order_by", "last_change_time")?
            .set_default("list.sort", "desc")?
            .set_default("list.tag", "")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
