// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 删除任务、删除主机规则时的确认提示
pub const DELETE_PROMPT: &str = "Are you sure?";
/// 爬虫规则匹配冲突时的覆盖提示
pub const OVERWRITE_RULE_PROMPT: &str = "Failed for url matched more than 1 rule, overwrite it?";

/// 确认能力
///
/// 破坏性或覆盖性操作发出请求前由操作者确认，返回 `false` 表示取消
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
