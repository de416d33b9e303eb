// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 后端接口错误类型
///
/// 覆盖传输层失败（连接错误、非2xx状态码）和应用层失败（`msg != "ok"`）
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求失败
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 非2xx响应
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// 后端拒绝请求，携带后端返回的msg
    #[error("Backend rejected request: {0}")]
    Rejected(String),

    /// 响应体无法解析
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// 无效的接口地址
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// 后端返回的msg（仅应用层失败时存在）
    pub fn backend_msg(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// 判断是否为传输层失败
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Status { .. })
    }
}

/// 控制器错误类型
#[derive(Error, Debug)]
pub enum ControllerError {
    /// 本地校验失败，请求不会发往后端
    #[error("{0}")]
    Validation(String),

    /// 后端调用失败
    #[error(transparent)]
    Api(#[from] ApiError),

    /// 爬虫规则匹配冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 无效输入
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
