//! 动画故事生成 - 业务能力层

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::clients::{GenerationOptions, LanguageModel};
use crate::error::LlmError;
use crate::models::StoryOutline;
use crate::services::prompts;

#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// 根据解答生成故事大纲（叙述 + 场景描述）
    async fn narrate(&self, solution: &str) -> Result<String, LlmError>;
}

pub struct LlmStoryGenerator {
    model: Arc<dyn LanguageModel>,
    options: GenerationOptions,
}

impl LlmStoryGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, options: GenerationOptions) -> Self {
        Self { model, options }
    }
}

#[async_trait]
impl StoryGenerator for LlmStoryGenerator {
    async fn narrate(&self, solution: &str) -> Result<String, LlmError> {
        let prompt = prompts::render(prompts::STORY, &[("solution", solution)]);
        let story = self.model.invoke(&prompt, &self.options).await?;

        let outline = StoryOutline::parse(&story);
        match &outline.scene {
            Some(scene) => debug!(
                "故事大纲: {} 个角色, {} 个关键画面",
                scene.characters.len(),
                scene.key_visuals.len()
            ),
            None => debug!("故事大纲没有结构化场景描述"),
        }

        Ok(story)
    }
}
