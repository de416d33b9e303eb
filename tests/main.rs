// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 测试主模块
///
/// 集成测试通过模拟后端覆盖控制器到HTTP的完整链路，
/// 单元测试覆盖公开接口
mod integration;

// === Unit Tests ===
mod unit;
