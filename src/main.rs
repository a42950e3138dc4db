use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use math_animator::services::extract_code_block;
use math_animator::utils::init_tracing;
use math_animator::{App, Config};

/// 解数学题并生成动画脚本
#[derive(Debug, Parser)]
#[command(name = "math_animator", version)]
struct Cli {
    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 把提取出的脚本写到这个文件
    #[arg(long)]
    script_out: Option<PathBuf>,

    /// 详细日志
    #[arg(short, long)]
    verbose: bool,

    /// 题目
    #[arg(required = true)]
    problem: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.verbose {
        config.verbose_logging = true;
    }

    // 初始化日志
    init_tracing(config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config)?;
    let report = app.run(&cli.problem.join(" ")).await?;

    println!("\n--- 运行结果 ---");
    match (report.artifact(), report.abort_error()) {
        (Some(script), None) => println!("{}", script),
        (_, Some(error)) => println!("流程未完成: {}", error),
        (None, None) => println!("没有产出脚本"),
    }

    println!("\n--- 最终会话状态 ---");
    println!("{}", report.session.to_pretty_json()?);

    if let (Some(path), Some(script)) = (&cli.script_out, report.artifact()) {
        std::fs::write(path, extract_code_block(script))
            .with_context(|| format!("无法写入脚本文件: {}", path.display()))?;
        println!("\n脚本已保存至: {}", path.display());
    }

    if !report.is_complete() {
        std::process::exit(1);
    }

    Ok(())
}
