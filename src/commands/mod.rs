pub mod config;
pub mod detect;
pub mod modes;
pub mod optimize;
pub mod startup;
pub mod status;
pub mod uninstall;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::modules::common::platform::Platform;
use crate::modules::common::settings::Settings;
use crate::modules::process::models::CancelSignal;
use crate::modules::service::models::OperationState;
use crate::modules::service::{ServiceContext, StateObserver};
use crate::modules::startup::{self as startup_entry, RunKeyStore};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 检测 Steam 安装与当前状态
    Detect(detect::DetectCommand),

    /// 列出可用的降级模式
    Modes(modes::ModesCommand),

    /// 降级并精简 Steam
    Optimize(optimize::OptimizeCommand),

    /// 撤销优化，恢复官方客户端
    Uninstall(uninstall::UninstallCommand),

    /// 管理 Windows 开机启动项
    Startup(startup::StartupCommand),

    /// 查看操作记录
    Status(status::StatusCommand),

    /// 查看或初始化设置
    Config(config::ConfigCommand),
}

pub async fn execute(command: Command) -> Result<()> {
    match command {
        Command::Detect(cmd) => detect::execute(cmd).await,
        Command::Modes(cmd) => modes::execute(cmd).await,
        Command::Optimize(cmd) => optimize::execute(cmd).await,
        Command::Uninstall(cmd) => uninstall::execute(cmd).await,
        Command::Startup(cmd) => startup::execute(cmd).await,
        Command::Status(cmd) => status::execute(cmd).await,
        Command::Config(cmd) => config::execute(cmd).await,
    }
}

/// 读取设置并构造服务上下文
pub(crate) fn build_context(steam_dir: Option<PathBuf>) -> Result<ServiceContext> {
    let settings = Settings::load()?;
    let platform = Platform::current()?;
    Ok(ServiceContext::from_settings(settings, platform, steam_dir)?)
}

/// 当前平台的 Run 键，不支持时返回 None
pub(crate) fn optional_run_key() -> Option<Box<dyn RunKeyStore>> {
    match startup_entry::open_run_key() {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::debug!("启动项不可用: {}", e);
            None
        }
    }
}

/// Ctrl-C 触发的取消信号
pub(crate) fn cancel_on_ctrl_c() -> CancelSignal {
    let (tx, signal) = CancelSignal::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n  收到 Ctrl-C，正在取消...");
            let _ = tx.send(true);
        }
    });
    signal
}

/// 打印进度的状态回调
pub(crate) fn progress_printer() -> StateObserver {
    Box::new(|state: OperationState| {
        let step = match state {
            OperationState::Detecting => Some(1),
            OperationState::StoppingProcess => Some(2),
            OperationState::WritingConfig => Some(3),
            OperationState::LaunchingUpdate => Some(4),
            OperationState::PollingExit => Some(5),
            _ => None,
        };
        match step {
            Some(n) => println!("[{}/5] {}...", n, state),
            None => println!("\n=== {} ===", state),
        }
    })
}
