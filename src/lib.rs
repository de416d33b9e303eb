// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含任务列表与主机规则控制器
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、工作时间规则和仓库接口
pub mod domain;

/// 基础设施模块
///
/// 提供后端HTTP接口的访问实现
pub mod infrastructure;

/// 表示层模块
///
/// 命令行、文本视图和确认提示
pub mod presentation;

/// 工具模块
///
/// 错误类型与日志初始化
pub mod utils;
