//! 领域分类 - 业务能力层
//!
//! 只负责"题目属于哪个数学领域"这一个判断，不校验结果，校验由流程层做。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::clients::{GenerationOptions, LanguageModel};
use crate::error::LlmError;
use crate::services::prompts;

#[async_trait]
pub trait Classifier: Send + Sync {
    /// 返回原始标签文本
    async fn classify(&self, topic: &str) -> Result<String, LlmError>;
}

/// 基于 LLM 的分类器
pub struct LlmClassifier {
    model: Arc<dyn LanguageModel>,
    options: GenerationOptions,
}

impl LlmClassifier {
    pub fn new(model: Arc<dyn LanguageModel>, options: GenerationOptions) -> Self {
        Self { model, options }
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, topic: &str) -> Result<String, LlmError> {
        let prompt = prompts::render(prompts::CLASSIFY, &[("topic", topic)]);
        let label = self.model.invoke(&prompt, &self.options).await?;
        debug!("分类器返回: {:?}", label);
        Ok(label)
    }
}
