// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 需要确认的操作结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 操作已执行
    Done,
    /// 操作者取消，没有发出请求
    Cancelled,
}
