// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：任务、主机规则和爬虫规则
/// - 仓库接口（repositories）：外部任务服务与规则服务的抽象接口
/// - 工作时间（work_hours）：工作时间规则的解析、求值与调度
///
/// 领域层不依赖任何具体的HTTP实现。
pub mod models;
pub mod repositories;
pub mod work_hours;
