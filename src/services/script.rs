//! 动画脚本生成 - 业务能力层
//!
//! 生成的脚本是否能在渲染器里运行不在这里的职责范围内。

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::clients::{GenerationOptions, LanguageModel};
use crate::error::LlmError;
use crate::services::prompts;

#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// 根据解答和故事生成渲染脚本
    async fn render_script(&self, solution: &str, story: &str) -> Result<String, LlmError>;
}

pub struct LlmScriptGenerator {
    model: Arc<dyn LanguageModel>,
    options: GenerationOptions,
}

impl LlmScriptGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, options: GenerationOptions) -> Self {
        Self { model, options }
    }
}

#[async_trait]
impl ScriptGenerator for LlmScriptGenerator {
    async fn render_script(&self, solution: &str, story: &str) -> Result<String, LlmError> {
        let prompt = prompts::render(
            prompts::SCRIPT,
            &[("solution", solution), ("animation_story", story)],
        );
        let script = self.model.invoke(&prompt, &self.options).await?;
        debug!("脚本长度: {} 字符", script.len());
        Ok(script)
    }
}

fn code_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n(.*?)```").expect("valid regex")
    })
}

/// 取出第一个围栏代码块的内容，没有代码块时原样返回
pub fn extract_code_block(text: &str) -> &str {
    code_fence()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
}
