//! 集成测试用的桩能力
//!
//! 每个桩返回预设结果，并把调用记录到共享的调用日志里，用于断言阶段顺序。

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use math_animator::services::{
    Classifier, ScriptGenerator, Solver, SolverRegistry, StoryGenerator,
};
use math_animator::{InMemorySessionStore, LlmError, MathDomain, MathFlow, SessionStore};

pub type CallLog = Arc<Mutex<Vec<String>>>;

fn stub_failure() -> LlmError {
    LlmError::EmptyResponse {
        model: "stub".to_string(),
    }
}

pub struct StubClassifier {
    reply: Option<String>,
    log: CallLog,
}

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, topic: &str) -> Result<String, LlmError> {
        self.log.lock().unwrap().push(format!("classify:{topic}"));
        self.reply.clone().ok_or_else(stub_failure)
    }
}

pub struct StubSolver {
    domain: MathDomain,
    reply: Option<String>,
    log: CallLog,
}

#[async_trait]
impl Solver for StubSolver {
    fn domain(&self) -> MathDomain {
        self.domain
    }

    async fn solve(&self, topic: &str) -> Result<String, LlmError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("solve:{}:{topic}", self.domain));
        self.reply.clone().ok_or_else(stub_failure)
    }
}

pub struct StubStory {
    reply: Option<String>,
    log: CallLog,
}

#[async_trait]
impl StoryGenerator for StubStory {
    async fn narrate(&self, solution: &str) -> Result<String, LlmError> {
        self.log.lock().unwrap().push(format!("narrate:{solution}"));
        self.reply.clone().ok_or_else(stub_failure)
    }
}

pub struct StubScript {
    reply: Option<String>,
    log: CallLog,
}

#[async_trait]
impl ScriptGenerator for StubScript {
    async fn render_script(&self, solution: &str, story: &str) -> Result<String, LlmError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("script:{solution}|{story}"));
        self.reply.clone().ok_or_else(stub_failure)
    }
}

/// 桩流程构建器；`None` 表示该能力调用失败
pub struct Stubs {
    pub classifier: Option<String>,
    pub solution: Option<String>,
    /// 单独覆盖某个领域的解题结果
    pub solver_override: Option<(MathDomain, Option<String>)>,
    /// 不注册该领域的解题器
    pub missing_solver: Option<MathDomain>,
    pub story: Option<String>,
    pub script: Option<String>,
}

impl Default for Stubs {
    fn default() -> Self {
        Self {
            classifier: Some("algebra".to_string()),
            solution: Some("x = 2".to_string()),
            solver_override: None,
            missing_solver: None,
            story: Some("A ball rolls to x=2.".to_string()),
            script: Some("<script>".to_string()),
        }
    }
}

pub struct Harness {
    pub flow: MathFlow,
    pub store: Arc<InMemorySessionStore>,
    pub log: CallLog,
}

impl Harness {
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

impl Stubs {
    pub fn build(self) -> Harness {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let classifier = Arc::new(StubClassifier {
            reply: self.classifier.clone(),
            log: log.clone(),
        });
        self.build_with(Arc::new(InMemorySessionStore::new()), classifier, log)
    }

    /// 使用外部的存储和分类器，其余能力仍为桩
    pub fn build_with(
        self,
        store: Arc<InMemorySessionStore>,
        classifier: Arc<dyn Classifier>,
        log: CallLog,
    ) -> Harness {

        let mut solvers = SolverRegistry::new();
        for domain in MathDomain::ALL {
            if self.missing_solver == Some(domain) {
                continue;
            }
            let reply = match &self.solver_override {
                Some((d, reply)) if *d == domain => reply.clone(),
                _ => self.solution.clone(),
            };
            solvers.register(Arc::new(StubSolver {
                domain,
                reply,
                log: log.clone(),
            }));
        }

        let store_dyn: Arc<dyn SessionStore> = store.clone();
        let flow = MathFlow::new(
            store_dyn,
            classifier,
            solvers,
            Arc::new(StubStory {
                reply: self.story,
                log: log.clone(),
            }),
            Arc::new(StubScript {
                reply: self.script,
                log: log.clone(),
            }),
        );

        Harness { flow, store, log }
    }
}
