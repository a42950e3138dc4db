//! # Math Animator
//!
//! 把一道数学题依次交给领域分类、分领域解题、动画故事生成、动画脚本生成，
//! 各阶段的结果都写进同一个会话记录。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `clients/` - `LlmClient`，唯一持有模型连接，只暴露 `invoke()` 能力
//! - `store/` - 会话存储，create / get / update
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，文本进、文本出
//! - `Classifier` / `Solver`（六个领域，`SolverRegistry` 查表）/ `StoryGenerator` / `ScriptGenerator`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `Stage` - 每个阶段声明读哪些字段、写哪个字段
//! - `MathFlow` - 流程编排（分类 → 解题 → 故事 → 脚本）
//!
//! ### ④ 入口层
//! - `app` - 构建能力、创建会话、运行流程
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{build_flow, App};
pub use clients::{GenerationOptions, LanguageModel, LlmClient};
pub use config::Config;
pub use error::{AppError, AppResult, LlmError, StoreError, WorkflowError};
pub use models::{MathDomain, Session, SessionField, SessionKey};
pub use store::{InMemorySessionStore, SessionStore};
pub use workflow::{MathFlow, RunCtx, RunReport, RunStatus, Stage};
