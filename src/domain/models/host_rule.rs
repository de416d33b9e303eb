// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::serde_ext::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// 主机列表条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSummary {
    /// 主机名
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// 是否设置了抓取频率限制
    #[serde(default)]
    pub freq: bool,
}

/// 主机规则
///
/// 按主机保存的抓取频率限制（`interval` 秒内最多 `n` 次）以及
/// 该主机下的爬虫规则，以 `host` 作为唯一标识。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRule {
    /// 主机名
    pub host: String,
    /// 时间窗口内允许的请求次数
    #[serde(default, deserialize_with = "null_as_default")]
    pub n: u32,
    /// 时间窗口（秒）
    #[serde(default, deserialize_with = "null_as_default")]
    pub interval: u32,
    /// 按名称索引的爬虫规则
    #[serde(default, deserialize_with = "null_as_default")]
    pub crawler_rules: BTreeMap<String, CrawlerRule>,
}

impl HostRule {
    /// 是否设置了频率限制
    pub fn is_throttled(&self) -> bool {
        self.n > 0 && self.interval > 0
    }
}

/// 爬虫规则
///
/// 描述如何请求并解析一个页面，通过 `regex` 匹配请求地址。
/// 解析链的具体结构由后端定义，这里原样保留。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrawlerRule {
    /// 规则名称
    #[serde(default)]
    pub name: String,
    /// 请求参数，`url` 字段决定规则所属主机
    #[serde(default)]
    pub request_args: serde_json::Value,
    /// 解析规则链
    #[serde(default)]
    pub parse_rules: Vec<serde_json::Value>,
    /// 匹配请求地址的正则
    #[serde(default)]
    pub regex: String,
    /// 页面编码
    #[serde(default)]
    pub encoding: String,
    /// 其他字段
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CrawlerRule {
    /// 请求地址
    pub fn url(&self) -> Option<&str> {
        self.request_args.get("url").and_then(|v| v.as_str())
    }

    /// 请求地址的主机名
    pub fn host(&self) -> Option<String> {
        self.url().and_then(host_of_url)
    }
}

/// 提取地址中的主机名
pub fn host_of_url(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}
