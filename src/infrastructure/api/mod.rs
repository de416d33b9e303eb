// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 后端接口模块
///
/// 封装HTTP客户端与统一的响应信封解析
pub mod client;

pub use client::{Ack, ApiClient};
