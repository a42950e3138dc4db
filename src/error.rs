//! 错误类型
//!
//! 按层划分：
//! - `LlmError` - 模型调用失败（基础设施层）
//! - `StoreError` - 会话存储失败（基础设施层）
//! - `WorkflowError` - 流程中止原因（流程层）
//! - `ConfigError` - 配置加载失败
//! - `AppError` - 汇总以上错误，供入口层使用

use async_openai::error::OpenAIError;
use thiserror::Error;

use crate::models::SessionField;
use crate::workflow::Stage;

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: OpenAIError,
    },
    /// 请求构建失败
    #[error("LLM 请求构建失败: {source}")]
    RequestBuild {
        #[source]
        source: OpenAIError,
    },
    /// 返回结果为空
    #[error("LLM返回结果为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 会话存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 会话不存在
    #[error("会话不存在: {0}")]
    NotFound(String),
    /// 存储内部错误（锁中毒等）
    #[error("存储内部错误: {0}")]
    Internal(String),
}

/// 流程错误
///
/// 每一种都会让本次运行中止，没有"警告"级别。
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// 会话和原始输入里都没有题目
    #[error("没有可用的题目，流程中止")]
    InputMissing,

    /// 分类结果为空或不在六个领域之内
    #[error("数学领域分类失败: {label:?}")]
    ClassificationInvalid { label: String },

    /// 能力调用失败
    #[error("阶段 {stage} 调用失败: {source}")]
    StageFailure {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    /// 能力返回了空内容
    #[error("阶段 {stage} 没有产出可用内容")]
    EmptyOutput { stage: Stage },

    /// 会话句柄无效
    #[error("会话不存在: {key}")]
    StoreNotFound { key: String },

    /// 阶段访问了未声明的字段
    #[error("阶段 {stage} 访问了未声明的字段 {field}")]
    UndeclaredAccess { stage: Stage, field: SessionField },

    /// 其他存储错误
    #[error("会话存储错误: {0}")]
    Store(StoreError),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => WorkflowError::StoreNotFound { key },
            other => WorkflowError::Store(other),
        }
    }
}

impl WorkflowError {
    /// 是否是必须立即上抛的错误（没有会话可以报告）
    pub fn is_store_not_found(&self) -> bool {
        matches!(self, WorkflowError::StoreNotFound { .. })
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    #[error("流程错误: {0}")]
    Workflow(#[from] WorkflowError),
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

// ========== 便捷构造函数 ==========

impl LlmError {
    /// 创建 LLM API 调用错误
    pub fn api_failed(model: impl Into<String>, source: OpenAIError) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            source,
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
