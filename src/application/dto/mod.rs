// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
pub mod list_state;
pub mod outcome;

pub use list_state::{PageRequest, TaskListState};
pub use outcome::Outcome;
