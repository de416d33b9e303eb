// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表示层模块
///
/// - 命令行（cli）：子命令定义与执行
/// - 视图（views）：任务、主机规则的文本展示
/// - 确认（prompt）：终端确认提示
pub mod cli;
pub mod prompt;
pub mod views;
