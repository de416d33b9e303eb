// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含管理端的控制器与数据传输对象。
/// 控制器持有视图状态，通过注入的仓库接口与后端交互。
pub mod controllers;
pub mod dto;
