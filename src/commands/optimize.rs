//! optimize 命令 - 降级 Steam 并写入精简配置

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::modules::common::utils;
use crate::modules::common::settings::MAX_POLL_TIMEOUT_SECS;
use crate::modules::process::system::SystemProcesses;
use crate::modules::service::models::{OperationState, OptimizationConfig, OptimizationResult};
use crate::modules::service::SteamDebloatService;
use crate::modules::startup::models::ClearOutcome;
use crate::modules::writer::modes::SteamMode;

#[derive(Parser, Debug)]
pub struct OptimizeCommand {
    /// 模式 (normal2025july/lite2025july/normal2022dec/lite2022dec)
    #[arg(long, short)]
    pub mode: SteamMode,

    /// 不生成启动脚本
    #[arg(long)]
    pub no_launcher: bool,

    /// 创建桌面快捷方式
    #[arg(long, conflicts_with = "no_launcher")]
    pub shortcut: bool,

    /// 删除 Steam 开机启动项 (仅 Windows)
    #[arg(long)]
    pub remove_startup: bool,

    /// 删除启动项前不备份
    #[arg(long, requires = "remove_startup")]
    pub no_backup: bool,

    /// 只写入文件，不强制下载更新包
    #[arg(long)]
    pub skip_update: bool,

    /// 等待 Steam 退出的超时时间 (秒)，默认取设置
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_POLL_TIMEOUT_SECS))]
    pub timeout: Option<u64>,

    /// 手动指定 Steam 目录
    #[arg(long, env = "STEAM_DEBLOAT_STEAM_DIR")]
    pub steam_dir: Option<PathBuf>,

    /// 输出格式 (table/json)
    #[arg(long, default_value = "table")]
    pub format: String,
}

pub async fn execute(cmd: OptimizeCommand) -> Result<()> {
    let ctx = super::build_context(cmd.steam_dir.clone())?;

    let config = OptimizationConfig {
        mode: cmd.mode,
        create_launcher: !cmd.no_launcher,
        create_shortcut: cmd.shortcut,
        remove_startup_entry: cmd.remove_startup,
        backup_startup_entry: !cmd.no_backup,
        skip_update: cmd.skip_update,
        timeout_secs: cmd.timeout.unwrap_or(ctx.settings.poll_timeout_secs),
    };

    tracing::info!("开始优化, 模式: {}", config.mode);
    println!("=== Steam 优化: {} ===\n", config.mode);

    let mut cancel = super::cancel_on_ctrl_c();
    let mut service = SteamDebloatService::new(ctx, SystemProcesses::new(), super::optional_run_key());
    if cmd.format != "json" {
        service = service.with_observer(super::progress_printer());
    }

    let result = service.optimize(&config, &mut cancel).await;

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_summary(&result),
    }

    match result.state {
        OperationState::Done | OperationState::TimedOut => Ok(()),
        OperationState::Cancelled => anyhow::bail!("操作已取消"),
        _ => anyhow::bail!(
            "{}",
            result.error.unwrap_or_else(|| "优化未完成".to_string())
        ),
    }
}

fn print_summary(result: &OptimizationResult) {
    if let Some(dir) = &result.steam_dir {
        println!("  Steam 目录: {}", dir);
    }
    if let Some(url) = &result.package_url {
        println!("  更新包:     {}", url);
    }

    for file in &result.files_written {
        println!("  已写入:     {}", file);
    }

    match &result.startup {
        Some(ClearOutcome::Cleared { backed_up: true }) => println!("  开机启动:   已删除 (已备份)"),
        Some(ClearOutcome::Cleared { backed_up: false }) => println!("  开机启动:   已删除"),
        Some(ClearOutcome::NotPresent) => println!("  开机启动:   不存在"),
        None => {}
    }

    if result.rolled_back {
        println!("  已回滚本次写入的文件");
    }

    if let Some(finished) = result.finished_at {
        let elapsed = (finished - result.started_at).to_std().unwrap_or_default();
        println!("  用时:       {}", utils::format_duration(elapsed));
    }

    for warning in &result.warnings {
        println!("  警告: {}", warning);
    }

    if result.success() {
        println!("\n  完成。之后请使用启动脚本打开 Steam。");
    }
}
