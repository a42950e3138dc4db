//! 分领域解题 - 业务能力层
//!
//! 六个领域共用同一个签名，流程层通过 [`SolverRegistry`] 按标签查一次表完成分派。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::clients::{GenerationOptions, LanguageModel};
use crate::error::LlmError;
use crate::models::MathDomain;
use crate::services::prompts;

#[async_trait]
pub trait Solver: Send + Sync {
    fn domain(&self) -> MathDomain;

    /// 给出分步解答
    async fn solve(&self, topic: &str) -> Result<String, LlmError>;
}

/// 基于 LLM 的解题器，按领域参数化
pub struct LlmSolver {
    domain: MathDomain,
    model: Arc<dyn LanguageModel>,
    options: GenerationOptions,
}

impl LlmSolver {
    pub fn new(
        domain: MathDomain,
        model: Arc<dyn LanguageModel>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            domain,
            model,
            options,
        }
    }
}

#[async_trait]
impl Solver for LlmSolver {
    fn domain(&self) -> MathDomain {
        self.domain
    }

    async fn solve(&self, topic: &str) -> Result<String, LlmError> {
        let prompt = prompts::render(
            prompts::SOLVE,
            &[("domain", self.domain.as_str()), ("topic", topic)],
        );
        let solution = self.model.invoke(&prompt, &self.options).await?;
        debug!("[{}] 解答长度: {} 字符", self.domain, solution.len());
        Ok(solution)
    }
}

/// 领域 → 解题器
#[derive(Clone, Default)]
pub struct SolverRegistry {
    solvers: HashMap<MathDomain, Arc<dyn Solver>>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 六个领域全部使用同一个模型
    pub fn with_llm(model: Arc<dyn LanguageModel>, options: GenerationOptions) -> Self {
        let mut registry = Self::new();
        for domain in MathDomain::ALL {
            registry.register(Arc::new(LlmSolver::new(domain, model.clone(), options)));
        }
        registry
    }

    /// 按 `solver.domain()` 注册，已有的会被替换
    pub fn register(&mut self, solver: Arc<dyn Solver>) -> &mut Self {
        self.solvers.insert(solver.domain(), solver);
        self
    }

    pub fn get(&self, domain: MathDomain) -> Option<Arc<dyn Solver>> {
        self.solvers.get(&domain).cloned()
    }

    pub fn domains(&self) -> Vec<MathDomain> {
        MathDomain::ALL
            .into_iter()
            .filter(|d| self.solvers.contains_key(d))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.solvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solvers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::ScriptedModel;

    #[test]
    fn test_with_llm_covers_all_domains() {
        let registry = SolverRegistry::with_llm(
            Arc::new(ScriptedModel::replying("ok")),
            GenerationOptions::default(),
        );
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.domains(), MathDomain::ALL.to_vec());
        for domain in MathDomain::ALL {
            assert_eq!(registry.get(domain).unwrap().domain(), domain);
        }
    }

    #[test]
    fn test_register_replaces_by_domain() {
        let first = Arc::new(ScriptedModel::replying("first"));
        let second = Arc::new(ScriptedModel::replying("second"));

        let mut registry = SolverRegistry::new();
        registry.register(Arc::new(LlmSolver::new(
            MathDomain::Algebra,
            first,
            GenerationOptions::default(),
        )));
        registry.register(Arc::new(LlmSolver::new(
            MathDomain::Algebra,
            second.clone(),
            GenerationOptions::default(),
        )));

        assert_eq!(registry.len(), 1);
        let solver = registry.get(MathDomain::Algebra).unwrap();
        let solution = tokio_test::block_on(solver.solve("t")).unwrap();
        assert_eq!(solution, "second");
        assert_eq!(second.prompts().len(), 1);
    }

    #[test]
    fn test_missing_domain() {
        let registry = SolverRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(MathDomain::Statistics).is_none());
    }

    #[tokio::test]
    async fn test_prompt_names_domain_and_topic() {
        let model = Arc::new(ScriptedModel::replying("mean = 5"));
        let solver = LlmSolver::new(
            MathDomain::Statistics,
            model.clone(),
            GenerationOptions::default(),
        );

        let solution = solver.solve("Mean of [2, 4, 6, 8]").await.unwrap();

        assert_eq!(solution, "mean = 5");
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("statistics problem: Mean of [2, 4, 6, 8]"));
    }
}
