//! 运行上下文
//!
//! 封装"这次运行用哪个会话、用户原始输入是什么"

use std::fmt::Display;

use crate::models::SessionKey;

#[derive(Debug, Clone)]
pub struct RunCtx {
    /// 会话键
    pub key: SessionKey,

    /// 用户原始输入，会话里没有题目时使用
    pub raw_input: Option<String>,
}

impl RunCtx {
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            raw_input: None,
        }
    }

    pub fn with_raw_input(mut self, raw_input: impl Into<String>) -> Self {
        self.raw_input = Some(raw_input.into());
        self
    }

    /// 去掉空白后的原始输入，空串视为没有
    pub fn usable_raw_input(&self) -> Option<&str> {
        self.raw_input
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Display for RunCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[会话 {}]", self.key)
    }
}
