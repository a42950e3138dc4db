//! 会话记录
//!
//! 一次运行中唯一的有状态实体。五个字段都是纯文本，各由一个阶段负责写入。

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// 会话键：(应用, 用户, 会话)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}

impl Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.app_name, self.user_id, self.session_id)
    }
}

/// 会话字段名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionField {
    Topic,
    MathDomain,
    Solution,
    AnimationStory,
    BlenderCode,
}

impl SessionField {
    pub const ALL: [SessionField; 5] = [
        SessionField::Topic,
        SessionField::MathDomain,
        SessionField::Solution,
        SessionField::AnimationStory,
        SessionField::BlenderCode,
    ];

    /// 持久化时使用的键名
    pub fn as_str(self) -> &'static str {
        match self {
            SessionField::Topic => "topic",
            SessionField::MathDomain => "math_domain",
            SessionField::Solution => "solution",
            SessionField::AnimationStory => "animation_story",
            SessionField::BlenderCode => "blender_code",
        }
    }
}

impl Display for SessionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 会话状态
///
/// 序列化为扁平的键值表，缺失字段不输出。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blender_code: Option<String>,
}

impl Session {
    /// 只带题目的初始会话
    pub fn with_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, field: SessionField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: SessionField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// 字段存在且不是空白
    pub fn has_text(&self, field: SessionField) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }

    fn slot(&self, field: SessionField) -> &Option<String> {
        match field {
            SessionField::Topic => &self.topic,
            SessionField::MathDomain => &self.math_domain,
            SessionField::Solution => &self.solution,
            SessionField::AnimationStory => &self.animation_story,
            SessionField::BlenderCode => &self.blender_code,
        }
    }

    fn slot_mut(&mut self, field: SessionField) -> &mut Option<String> {
        match field {
            SessionField::Topic => &mut self.topic,
            SessionField::MathDomain => &mut self.math_domain,
            SessionField::Solution => &mut self.solution,
            SessionField::AnimationStory => &mut self.animation_story,
            SessionField::BlenderCode => &mut self.blender_code,
        }
    }

    /// 与 `other` 不同的字段
    pub fn changed_fields(&self, other: &Session) -> Vec<SessionField> {
        SessionField::ALL
            .into_iter()
            .filter(|f| self.get(*f) != other.get(*f))
            .collect()
    }

    /// 诊断输出用的 JSON
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
