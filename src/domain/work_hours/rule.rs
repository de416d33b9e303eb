// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use thiserror::Error;

static HOUR_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s*,\s*(\d+)$").unwrap());

/// 工作时间规则错误
///
/// 规则文本格式错误属于配置错误，需要反馈给操作者，不会被静默忽略
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkHoursError {
    /// 规则为空
    #[error("work_hours rule is empty")]
    Empty,

    /// 连接符两侧存在空规则项
    #[error("empty term at position {0}")]
    EmptyTerm(usize),

    /// 小时区间格式错误
    #[error("invalid hour range `{0}`, expected `H1, H2` with 0 <= H1 <= H2 <= 24")]
    InvalidHourRange(String),

    /// 小时列表格式错误
    #[error("invalid hour list `{0}`, expected a JSON array of hours")]
    InvalidHourList(String),

    /// 小时超出 0-23
    #[error("hour {0} is out of range 0-23")]
    HourOutOfRange(u32),

    /// strftime 格式错误
    #[error("invalid strftime pattern `{0}`")]
    InvalidPattern(String),

    /// `#` 之后的变更间隔不是秒数
    #[error("invalid change interval `{0}`")]
    InvalidChangeInterval(String),

    /// 检查间隔必须为正数秒
    #[error("interval must be a positive number of seconds")]
    InvalidInterval,
}

/// 格式匹配的比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
}

impl Comparator {
    fn as_str(self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
        }
    }
}

/// 规则项之间的连接符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// `;` 或 `&`
    And,
    /// `|`
    Or,
}

impl Connective {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            ';' | '&' => Some(Connective::And),
            '|' => Some(Connective::Or),
            _ => None,
        }
    }

    fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Connective::And => left && right,
            Connective::Or => left || right,
        }
    }
}

/// 单个规则项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// 每天 `[start:00, end:00)`
    HourRange { start: u32, end: u32 },
    /// 每天允许的小时
    HourList(Vec<u32>),
    /// 用 strftime 格式化当前时间后与期望值比较
    Pattern {
        format: String,
        comparator: Comparator,
        expected: String,
    },
}

impl Term {
    fn parse(text: &str) -> Result<Self, WorkHoursError> {
        if let Some((format, expected)) = text.split_once("==") {
            return Self::pattern(format, Comparator::Equal, expected);
        }
        if let Some((format, expected)) = text.split_once("!=") {
            return Self::pattern(format, Comparator::NotEqual, expected);
        }
        if text.starts_with('[') {
            let hours: Vec<u32> = serde_json::from_str(text)
                .map_err(|_| WorkHoursError::InvalidHourList(text.to_string()))?;
            if let Some(hour) = hours.iter().find(|hour| **hour > 23) {
                return Err(WorkHoursError::HourOutOfRange(*hour));
            }
            return Ok(Term::HourList(hours));
        }

        let invalid = || WorkHoursError::InvalidHourRange(text.to_string());
        let captures = HOUR_RANGE.captures(text).ok_or_else(invalid)?;
        let start: u32 = captures[1].parse().map_err(|_| invalid())?;
        let end: u32 = captures[2].parse().map_err(|_| invalid())?;
        if start > end || end > 24 {
            return Err(invalid());
        }
        Ok(Term::HourRange { start, end })
    }

    fn pattern(format: &str, comparator: Comparator, expected: &str) -> Result<Self, WorkHoursError> {
        if format.is_empty() || !is_supported_format(format) {
            return Err(WorkHoursError::InvalidPattern(format.to_string()));
        }
        Ok(Term::Pattern {
            format: format.to_string(),
            comparator,
            expected: expected.to_string(),
        })
    }

    /// 判断给定时间是否满足该规则项
    pub fn matches(&self, now: NaiveDateTime) -> bool {
        match self {
            Term::HourRange { start, end } => (*start..*end).contains(&now.hour()),
            Term::HourList(hours) => hours.contains(&now.hour()),
            Term::Pattern {
                format,
                comparator,
                expected,
            } => {
                let Some(current) = format_time(now, format) else {
                    return false;
                };
                match comparator {
                    Comparator::Equal => current == *expected,
                    Comparator::NotEqual => current != *expected,
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::HourRange { start, end } => write!(f, "{}, {}", start, end),
            Term::HourList(hours) => {
                let hours: Vec<String> = hours.iter().map(u32::to_string).collect();
                write!(f, "[{}]", hours.join(", "))
            }
            Term::Pattern {
                format,
                comparator,
                expected,
            } => write!(f, "{}{}{}", format, comparator.as_str(), expected),
        }
    }
}

fn format_time(now: NaiveDateTime, format: &str) -> Option<String> {
    let format = microsecond_fraction(format);
    let mut out = String::new();
    write!(out, "{}", now.format_with_items(StrftimeItems::new(&format))).ok()?;
    Some(out)
}

/// 单独的 `%f` 按微秒输出6位，与常见 strftime 一致；`%%f` 和 `%3f` 等保持不变
fn microsecond_fraction(format: &str) -> String {
    let mut out = String::with_capacity(format.len() + 2);
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch != '%' {
            continue;
        }
        match chars.next() {
            Some('f') => out.push_str("6f"),
            Some(next) => out.push(next),
            None => {}
        }
    }
    out
}

/// 拒绝未知指令以及需要时区信息的指令（如 `%z`），保证求值阶段不会失败
fn is_supported_format(format: &str) -> bool {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let probe = NaiveDate::from_ymd_opt(2020, 3, 14)
        .and_then(|date| date.and_hms_opt(11, 47, 32));
    probe.is_some_and(|probe| format_time(probe, format).is_some())
}

/// 工作时间规则
///
/// 规则由若干规则项通过 `;`/`&`（与）和 `|`（或）连接，按从左到右的顺序求值，
/// 不区分优先级。三种规则项：
///
/// ```text
/// 0, 24             每天 00:00 ~ 23:59
/// [1, 19]           每天 01:00~01:59 和 19:00~19:59
/// %A==Friday        每周五（strftime 格式化后比较，支持 == 和 !=）
/// %w==5;20, 24      每周五 20:00 ~ 23:59
/// %w==5|%w==2       每周五或每周二
/// %w!=6&%w!=0       除周六周日外的每天
/// ```
///
/// 可选的 `#秒数` 后缀表示两次内容变更之间至少间隔的秒数，只影响调度，
/// 不影响 [`WorkHours::is_work_time`]。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkHours {
    first: Term,
    rest: Vec<(Connective, Term)>,
    change_interval: Option<u64>,
}

impl WorkHours {
    /// 解析规则文本
    ///
    /// # 参数
    ///
    /// * `rule` - 规则文本
    ///
    /// # 返回值
    ///
    /// * `Ok(WorkHours)` - 解析成功
    /// * `Err(WorkHoursError)` - 规则格式错误
    pub fn parse(rule: &str) -> Result<Self, WorkHoursError> {
        let (expr, change_interval) = match rule.split_once('#') {
            Some((expr, seconds)) => {
                let seconds = seconds
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| WorkHoursError::InvalidChangeInterval(seconds.to_string()))?;
                (expr, Some(seconds))
            }
            None => (rule, None),
        };
        if expr.trim().is_empty() {
            return Err(WorkHoursError::Empty);
        }

        let mut terms = Vec::new();
        let mut connectives = Vec::new();
        let mut start = 0;
        for (idx, ch) in expr.char_indices() {
            if let Some(connective) = Connective::from_char(ch) {
                terms.push(parse_term(&expr[start..idx], terms.len())?);
                connectives.push(connective);
                start = idx + ch.len_utf8();
            }
        }
        terms.push(parse_term(&expr[start..], terms.len())?);

        let mut terms = terms.into_iter();
        let first = terms.next().ok_or(WorkHoursError::Empty)?;
        Ok(Self {
            first,
            rest: connectives.into_iter().zip(terms).collect(),
            change_interval,
        })
    }

    /// 判断给定的本地时间是否处于允许抓取的时间窗口内
    pub fn is_work_time(&self, now: NaiveDateTime) -> bool {
        self.rest
            .iter()
            .fold(self.first.matches(now), |allowed, (connective, term)| {
                connective.apply(allowed, term.matches(now))
            })
    }

    /// 以当前本地时间求值
    pub fn is_work_time_now(&self) -> bool {
        self.is_work_time(Local::now().naive_local())
    }

    /// `#` 后缀指定的变更间隔（秒）
    pub fn change_interval(&self) -> Option<u64> {
        self.change_interval
    }

    /// 按出现顺序返回所有规则项
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, term)| term))
    }
}

fn parse_term(text: &str, position: usize) -> Result<Term, WorkHoursError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WorkHoursError::EmptyTerm(position));
    }
    Term::parse(text)
}

impl FromStr for WorkHours {
    type Err = WorkHoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WorkHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        for (connective, term) in &self.rest {
            let sep = match connective {
                Connective::And => ';',
                Connective::Or => '|',
            };
            write!(f, "{}{}", sep, term)?;
        }
        if let Some(seconds) = self.change_interval {
            write!(f, "#{}", seconds)?;
        }
        Ok(())
    }
}

/// 解析并求值工作时间规则
///
/// 无状态的纯函数：结果只取决于 `(rule, now)`
pub fn evaluate(rule: &str, now: NaiveDateTime) -> Result<bool, WorkHoursError> {
    Ok(WorkHours::parse(rule)?.is_work_time(now))
}

#[cfg(test)]
#[path = "rule_test.rs"]
mod tests;
