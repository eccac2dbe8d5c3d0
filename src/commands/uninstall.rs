//! uninstall 命令 - 撤销优化并恢复官方客户端

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::modules::common::settings::MAX_POLL_TIMEOUT_SECS;
use crate::modules::process::system::SystemProcesses;
use crate::modules::service::models::{OperationState, UninstallStatus};
use crate::modules::service::uninstall::UninstallOptions;
use crate::modules::service::UninstallService;

#[derive(Parser, Debug)]
pub struct UninstallCommand {
    /// 不恢复开机启动项
    #[arg(long)]
    pub keep_startup: bool,

    /// 只删除文件，不重新下载官方客户端
    #[arg(long)]
    pub no_reset: bool,

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

pub async fn execute(cmd: UninstallCommand) -> Result<()> {
    let ctx = super::build_context(cmd.steam_dir.clone())?;

    let options = UninstallOptions {
        restore_startup: !cmd.keep_startup,
        reset_client: !cmd.no_reset,
        timeout_secs: cmd.timeout.unwrap_or(ctx.settings.poll_timeout_secs),
    };

    println!("=== 恢复官方 Steam ===\n");

    let mut cancel = super::cancel_on_ctrl_c();
    let mut service = UninstallService::new(ctx, SystemProcesses::new(), super::optional_run_key());
    if cmd.format != "json" {
        service = service.with_observer(super::progress_printer());
    }

    let status = service.uninstall(&options, &mut cancel).await;

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&status)?),
        _ => print_summary(&status),
    }

    match status.state {
        OperationState::Done | OperationState::TimedOut => Ok(()),
        OperationState::Cancelled => anyhow::bail!("操作已取消"),
        _ => anyhow::bail!(
            "{}",
            status.error.unwrap_or_else(|| "恢复未完成".to_string())
        ),
    }
}

fn print_summary(status: &UninstallStatus) {
    if let Some(dir) = &status.steam_dir {
        println!("  Steam 目录: {}", dir);
    }

    for removed in status.removed.iter().filter(|r| r.existed) {
        let mark = if removed.success { "已删除" } else { "删除失败" };
        println!("  {}:     {}", mark, removed.path);
    }

    if status.startup_restored {
        println!("  开机启动:   已从备份恢复");
    }

    for warning in &status.warnings {
        println!("  警告: {}", warning);
    }
}
