// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义访问外部任务服务与规则服务的抽象接口，具体实现通过HTTP调用后端，
/// 由调用方注入控制器
pub mod rule_repository;
pub mod task_repository;
