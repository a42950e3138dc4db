//! 解题流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整处理流程
//!
//! 流程顺序（强制线性）：
//! 1. 等待题目（会话里没有时取用户原始输入）
//! 2. 分类 → 写 `math_domain`，读回并校验
//! 3. 解题 → 按领域查表选出解题器，写 `solution`
//! 4. 讲故事 → 写 `animation_story`
//! 5. 生成脚本 → 写 `blender_code`
//!
//! 任何一步失败都直接中止：不重试、不回滚、不补默认值。已写入的字段留在会话里。

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::{LlmError, WorkflowError};
use crate::models::{MathDomain, Session, SessionField};
use crate::services::{Classifier, ScriptGenerator, SolverRegistry, StoryGenerator};
use crate::store::SessionStore;
use crate::utils::logging::truncate_text;
use crate::workflow::report::{RunReport, RunStatus, StageRecord};
use crate::workflow::run_ctx::RunCtx;
use crate::workflow::stage::{Stage, StageScope};

/// 中止点
struct Abort {
    stage: Option<Stage>,
    error: WorkflowError,
}

/// 解题流程
///
/// - 编排分类、解题、讲故事、生成脚本四个阶段
/// - 只依赖能力（services）和会话存储，不持有模型连接
/// - 阶段之间只通过会话传递数据
pub struct MathFlow {
    store: Arc<dyn SessionStore>,
    classifier: Arc<dyn Classifier>,
    solvers: SolverRegistry,
    story: Arc<dyn StoryGenerator>,
    script: Arc<dyn ScriptGenerator>,
}

impl MathFlow {
    pub fn new(
        store: Arc<dyn SessionStore>,
        classifier: Arc<dyn Classifier>,
        solvers: SolverRegistry,
        story: Arc<dyn StoryGenerator>,
        script: Arc<dyn ScriptGenerator>,
    ) -> Self {
        if solvers.is_empty() {
            warn!("⚠️ 未注册任何解题器，所有题目都会在解题阶段中止");
        } else {
            debug!("已注册 {} 个解题器: {:?}", solvers.len(), solvers.domains());
        }

        Self {
            store,
            classifier,
            solvers,
            story,
            script,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// 执行一次完整流程
    ///
    /// 会话不存在时返回 `Err(WorkflowError::StoreNotFound)`；其他失败都体现在
    /// [`RunStatus::Aborted`] 里，同时带回会话当前状态。
    pub async fn run(&self, ctx: &RunCtx) -> Result<RunReport, WorkflowError> {
        info!("{} 🚀 开始解题流程", ctx);

        let mut stages = Vec::new();
        let mut topic_from_input = false;

        let status = match self.drive(ctx, &mut stages, &mut topic_from_input).await {
            Ok(()) => {
                info!("{} ✓ 流程完成", ctx);
                RunStatus::Complete
            }
            Err(Abort { error, .. }) if error.is_store_not_found() => {
                error!("{} ❌ {}", ctx, error);
                return Err(error);
            }
            Err(Abort { stage, error }) => {
                match stage {
                    Some(stage) => error!("{} ❌ 阶段 {} 失败，流程中止: {}", ctx, stage, error),
                    None => error!("{} ❌ 流程中止: {}", ctx, error),
                }
                RunStatus::Aborted { stage, error }
            }
        };

        let session = self.store.get(&ctx.key).await?;
        debug!("{} 最终会话: {:?}", ctx, session);

        Ok(RunReport {
            key: ctx.key.clone(),
            status,
            session,
            topic_from_input,
            stages,
        })
    }

    async fn drive(
        &self,
        ctx: &RunCtx,
        stages: &mut Vec<StageRecord>,
        topic_from_input: &mut bool,
    ) -> Result<(), Abort> {
        *topic_from_input = self
            .await_topic(ctx)
            .await
            .map_err(|error| Abort { stage: None, error })?;

        for stage in Stage::ORDER {
            let result = match stage {
                Stage::Classify => self.classify(ctx, stages).await,
                Stage::Solve => self.solve(ctx, stages).await,
                Stage::Narrate => self.narrate(ctx, stages).await,
                Stage::RenderScript => self.render_script(ctx, stages).await,
            };
            result.map_err(|error| Abort {
                stage: Some(stage),
                error,
            })?;
        }

        Ok(())
    }

    /// 返回题目是否取自原始输入
    async fn await_topic(&self, ctx: &RunCtx) -> Result<bool, WorkflowError> {
        let mut session = self.store.get(&ctx.key).await?;
        if session.has_text(SessionField::Topic) {
            return Ok(false);
        }

        let raw = ctx.usable_raw_input().ok_or(WorkflowError::InputMissing)?;
        session.set(SessionField::Topic, raw);
        self.store.update(&ctx.key, session).await?;

        info!("{} 从用户输入中提取题目: {}", ctx, truncate_text(raw, 80));
        Ok(true)
    }

    async fn classify(
        &self,
        ctx: &RunCtx,
        stages: &mut Vec<StageRecord>,
    ) -> Result<(), WorkflowError> {
        let stage = Stage::Classify;
        let mut scope = self.open(ctx, stage).await?;

        let topic = scope
            .read(SessionField::Topic)?
            .filter(|t| !t.trim().is_empty())
            .ok_or(WorkflowError::InputMissing)?
            .to_string();
        info!("{} 🔍 题目: {}", ctx, truncate_text(&topic, 80));

        let label = self
            .classifier
            .classify(&topic)
            .await
            .map_err(|source| WorkflowError::StageFailure { stage, source })?;

        // 原样写入，校验失败时留作证据
        scope.write(label);
        let session = self.commit(ctx, scope, stages).await?;

        let stored = session.get(SessionField::MathDomain).unwrap_or_default();
        let domain =
            MathDomain::parse(stored).ok_or_else(|| WorkflowError::ClassificationInvalid {
                label: stored.to_string(),
            })?;

        info!("{} ✓ 数学领域: {}", ctx, domain);
        Ok(())
    }

    async fn solve(
        &self,
        ctx: &RunCtx,
        stages: &mut Vec<StageRecord>,
    ) -> Result<(), WorkflowError> {
        let stage = Stage::Solve;
        let mut scope = self.open(ctx, stage).await?;

        let label = scope
            .read(SessionField::MathDomain)?
            .unwrap_or_default()
            .to_string();
        // 标签合法但没有注册解题器，同样按分类无效处理
        let solver = MathDomain::parse(&label)
            .and_then(|domain| self.solvers.get(domain))
            .ok_or(WorkflowError::ClassificationInvalid { label })?;

        let topic = scope
            .read(SessionField::Topic)?
            .unwrap_or_default()
            .to_string();

        info!("{} 🧮 [{}] 正在解题...", ctx, solver.domain());
        let solution = usable(stage, solver.solve(&topic).await)?;
        debug!("{} 解答: {}", ctx, truncate_text(&solution, 200));

        scope.write(solution);
        self.commit(ctx, scope, stages).await?;

        info!("{} ✓ 解题完成", ctx);
        Ok(())
    }

    async fn narrate(
        &self,
        ctx: &RunCtx,
        stages: &mut Vec<StageRecord>,
    ) -> Result<(), WorkflowError> {
        let stage = Stage::Narrate;
        let mut scope = self.open(ctx, stage).await?;

        let solution = scope
            .read(SessionField::Solution)?
            .ok_or(WorkflowError::EmptyOutput { stage: Stage::Solve })?
            .to_string();

        info!("{} 🎬 正在生成动画故事...", ctx);
        let story = usable(stage, self.story.narrate(&solution).await)?;

        scope.write(story);
        self.commit(ctx, scope, stages).await?;

        info!("{} ✓ 动画故事生成完成", ctx);
        Ok(())
    }

    async fn render_script(
        &self,
        ctx: &RunCtx,
        stages: &mut Vec<StageRecord>,
    ) -> Result<(), WorkflowError> {
        let stage = Stage::RenderScript;
        let mut scope = self.open(ctx, stage).await?;

        let solution = scope
            .read(SessionField::Solution)?
            .ok_or(WorkflowError::EmptyOutput { stage: Stage::Solve })?
            .to_string();
        let story = scope
            .read(SessionField::AnimationStory)?
            .ok_or(WorkflowError::EmptyOutput { stage: Stage::Narrate })?
            .to_string();

        info!("{} 🛠️ 正在生成动画脚本...", ctx);
        let script = usable(stage, self.script.render_script(&solution, &story).await)?;

        scope.write(script);
        self.commit(ctx, scope, stages).await?;

        info!("{} ✓ 动画脚本生成完成", ctx);
        Ok(())
    }

    async fn open(&self, ctx: &RunCtx, stage: Stage) -> Result<StageScope, WorkflowError> {
        let session = self.store.get(&ctx.key).await?;
        Ok(StageScope::new(stage, session))
    }

    /// 只把本阶段的目标字段写回存储
    ///
    /// 写入日志取自 [`StageScope`]；变化字段与阶段开始时的快照比较，
    /// 非目标字段有变化说明同一会话键上有并发运行。
    async fn commit(
        &self,
        ctx: &RunCtx,
        scope: StageScope,
        stages: &mut Vec<StageRecord>,
    ) -> Result<Session, WorkflowError> {
        let stage = scope.stage();
        let target = stage.writes();
        let written = scope.journal().to_vec();
        let opened = scope.opened().clone();
        let value = scope.into_session().get(target).map(str::to_string);

        let mut next = self.store.get(&ctx.key).await?;
        if next.get(target) != opened.get(target) {
            warn!(
                "{} ⚠️ 阶段 {} 执行期间 {} 被其他运行改写，将被覆盖",
                ctx, stage, target
            );
        }
        if let Some(value) = value {
            next.set(target, value);
        }
        self.store.update(&ctx.key, next).await?;

        let after = self.store.get(&ctx.key).await?;
        let changed = after.changed_fields(&opened);
        if changed.iter().any(|f| *f != target) {
            warn!(
                "{} ⚠️ 阶段 {} 执行期间有其他字段变化: {:?}，可能有并发运行",
                ctx, stage, changed
            );
        }
        stages.push(StageRecord {
            stage,
            written,
            changed,
        });

        Ok(after)
    }
}

/// 能力失败或输出为空都视为阶段失败
fn usable(stage: Stage, result: Result<String, LlmError>) -> Result<String, WorkflowError> {
    let output = result.map_err(|source| WorkflowError::StageFailure { stage, source })?;
    if output.trim().is_empty() {
        return Err(WorkflowError::EmptyOutput { stage });
    }
    Ok(output)
}
