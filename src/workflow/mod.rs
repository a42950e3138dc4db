pub mod math_flow;
pub mod report;
pub mod run_ctx;
pub mod stage;

pub use math_flow::MathFlow;
pub use report::{RunReport, RunStatus, StageRecord};
pub use run_ctx::RunCtx;
pub use stage::{Stage, StageScope};
