//! 应用入口层
//!
//! 进程启动时构建一次模型连接和各项能力，注入流程；阶段逻辑里不读环境变量。

use std::sync::Arc;

use tracing::info;

use crate::clients::{GenerationOptions, LanguageModel, LlmClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Session, SessionKey};
use crate::services::{LlmClassifier, LlmScriptGenerator, LlmStoryGenerator, SolverRegistry};
use crate::store::{InMemorySessionStore, SessionStore};
use crate::utils::logging::{init_log_file, log_run_summary, log_startup};
use crate::workflow::{MathFlow, RunCtx, RunReport};

/// 应用主结构
pub struct App {
    config: Config,
    flow: MathFlow,
}

impl App {
    /// 初始化应用：校验配置、写日志头、构建能力
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        let model: Arc<dyn LanguageModel> = Arc::new(LlmClient::new(&config));
        let flow = build_flow(model, GenerationOptions::from_config(&config));

        Ok(Self { config, flow })
    }

    /// 使用外部构建好的流程（测试或自定义能力）
    pub fn with_flow(config: Config, flow: MathFlow) -> Self {
        Self { config, flow }
    }

    pub fn session_key(&self) -> SessionKey {
        SessionKey::new(
            &self.config.app_name,
            &self.config.user_id,
            &self.config.session_id,
        )
    }

    /// 为一道题创建会话并执行流程
    pub async fn run(&self, problem: &str) -> AppResult<RunReport> {
        let problem = problem.trim();
        info!("用户输入: {}", problem);

        let key = self
            .flow
            .store()
            .create(self.session_key(), Session::with_topic(problem))
            .await?;

        let ctx = RunCtx::new(key).with_raw_input(problem);
        let report = self.flow.run(&ctx).await?;

        log_run_summary(&report);
        Ok(report)
    }
}

/// 用同一个模型构建全部能力，会话存储为进程内存储
pub fn build_flow(model: Arc<dyn LanguageModel>, options: GenerationOptions) -> MathFlow {
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    MathFlow::new(
        store,
        Arc::new(LlmClassifier::new(model.clone(), options)),
        SolverRegistry::with_llm(model.clone(), options),
        Arc::new(LlmStoryGenerator::new(model.clone(), options)),
        Arc::new(LlmScriptGenerator::new(model, options)),
    )
}
