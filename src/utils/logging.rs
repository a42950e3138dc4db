//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数
use std::fs;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::SessionField;
use crate::workflow::{RunReport, RunStatus};

/// 初始化 tracing
///
/// `RUST_LOG` 优先；未设置时默认 `info`，详细模式为 `debug`。
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n解题动画流程日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 数学题解题动画流程");
    info!("🤖 模型: {}", config.llm_model_name);
    info!(
        "⚙️ max_output_tokens={} temperature={} top_p={}",
        config.llm_max_output_tokens, config.llm_temperature, config.llm_top_p
    );
    info!("{}", "=".repeat(60));
}

/// 打印运行结果统计
pub fn log_run_summary(report: &RunReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行结束 - {}", report.key);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    match &report.status {
        RunStatus::Complete => info!("✅ 状态: 完成"),
        RunStatus::Aborted { stage: Some(stage), error } => {
            info!("❌ 状态: 中止于 {} ({})", stage, error)
        }
        RunStatus::Aborted { stage: None, error } => info!("❌ 状态: 中止 ({})", error),
    }
    for field in SessionField::ALL {
        let shown = match report.session.get(field) {
            Some(value) => truncate_text(value, 60),
            None => "<无>".to_string(),
        };
        info!("  {:<16} {}", field.as_str(), shown);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
