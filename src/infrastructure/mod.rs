// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与后端服务的交互。
///
/// 包含的子模块：
/// - 接口（api）：HTTP客户端与响应信封解析
/// - 仓库实现（repositories）：提供领域仓库接口的具体实现
///
/// 基础设施层依赖于领域层的抽象接口，领域层不感知HTTP细节。
pub mod api;
pub mod repositories;
