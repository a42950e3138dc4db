use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置
///
/// 加载顺序：默认值 → TOML 文件（可选）→ 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 应用名（会话键的一部分）
    pub app_name: String,
    /// 用户ID（会话键的一部分）
    pub user_id: String,
    /// 会话ID（会话键的一部分）
    pub session_id: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_max_output_tokens: u32,
    pub llm_temperature: f32,
    pub llm_top_p: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "math_animation_app".to_string(),
            user_id: "12345".to_string(),
            session_id: "123344".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            llm_max_output_tokens: 10000,
            llm_temperature: 0.2,
            llm_top_p: 0.8,
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 默认值 + TOML 文件 + 环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// 用 `lookup` 提供的值覆盖当前配置
    fn apply_overrides(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = lookup("LLM_API_KEY").or_else(|| lookup("GOOGLE_API_KEY"));
        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or(self.app_name),
            user_id: lookup("USER_ID").unwrap_or(self.user_id),
            session_id: lookup("SESSION_ID").unwrap_or(self.session_id),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            llm_api_key: api_key.unwrap_or(self.llm_api_key),
            llm_api_base_url: lookup("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_max_output_tokens: parse_var(&lookup, "LLM_MAX_OUTPUT_TOKENS", "u32")?
                .unwrap_or(self.llm_max_output_tokens),
            llm_temperature: parse_var(&lookup, "LLM_TEMPERATURE", "f32")?
                .unwrap_or(self.llm_temperature),
            llm_top_p: parse_var(&lookup, "LLM_TOP_P", "f32")?.unwrap_or(self.llm_top_p),
        })
    }

    /// 连接真实模型前的检查
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
