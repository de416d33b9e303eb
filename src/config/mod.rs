// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理后端地址、超时以及任务列表默认查询参数等配置
pub mod settings;
