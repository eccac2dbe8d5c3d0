//! 优化/卸载服务
//!
//! 两个服务共用同一条线性状态机，进程与注册表通过接口注入

pub mod history;
pub mod models;
pub mod optimize;
pub mod uninstall;

use crate::modules::common::error::DebloatError;
use crate::modules::common::paths;
use crate::modules::common::platform::Platform;
use crate::modules::common::settings::Settings;
use crate::modules::locator::{self, models::SteamInstallation};
use crate::modules::process::models::CancelSignal;
use crate::modules::process::ProcessControl;
use crate::modules::startup::{self, RunKeyStore};
use crate::modules::writer::{launcher, shortcut, steam_cfg};
use chrono::Utc;
use models::{OperationState, StateTransition, SystemInfo};
use std::path::PathBuf;
use std::time::Duration;

pub use optimize::SteamDebloatService;
pub use uninstall::UninstallService;

/// 状态变化回调（命令行用来打印进度）
pub type StateObserver = Box<dyn Fn(OperationState) + Send + Sync>;

/// 服务运行所需的路径与设置
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub platform: Platform,
    pub settings: Settings,
    pub steam_dir_override: Option<PathBuf>,
    pub launcher_dir: PathBuf,
    pub shortcut_path: Option<PathBuf>,
    /// 是否把结果写入历史记录
    pub record_history: bool,
}

impl ServiceContext {
    pub fn from_settings(
        settings: Settings,
        platform: Platform,
        steam_dir: Option<PathBuf>,
    ) -> Result<Self, DebloatError> {
        let launcher_dir = settings
            .launcher_dir
            .clone()
            .or_else(paths::desktop_dir)
            .ok_or_else(|| DebloatError::NotFound("无法确定桌面目录".to_string()))?;

        let shortcut_path = shortcut::shortcut_path(platform, &launcher_dir);
        let steam_dir_override = steam_dir.or_else(|| settings.steam_dir.clone());

        Ok(Self {
            platform,
            settings,
            steam_dir_override,
            launcher_dir,
            shortcut_path,
            record_history: true,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        self.settings.poll_interval()
    }
}

/// 记录状态变化
pub(crate) struct StateTracker {
    current: OperationState,
    transitions: Vec<StateTransition>,
    observer: Option<StateObserver>,
}

impl StateTracker {
    pub fn new(observer: Option<StateObserver>) -> Self {
        Self {
            current: OperationState::Idle,
            transitions: Vec::new(),
            observer,
        }
    }

    pub fn enter(&mut self, state: OperationState) {
        tracing::info!("状态: {} → {}", self.current, state);
        self.current = state;
        self.transitions.push(StateTransition {
            state,
            at: Utc::now(),
        });
        if let Some(observer) = &self.observer {
            observer(state);
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> OperationState {
        self.current
    }

    pub fn take_transitions(&mut self) -> Vec<StateTransition> {
        std::mem::take(&mut self.transitions)
    }
}

/// 可被取消的等待，被取消时返回 false
pub(crate) async fn sleep_or_cancel(duration: Duration, cancel: &mut CancelSignal) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = cancel.cancelled() => false,
    }
}

/// 结束 Steam 后等待进程消失的时长
pub(crate) const STOP_GRACE: Duration = Duration::from_secs(30);

/// 汇总当前系统与 Steam 状态
pub fn system_info<P: ProcessControl + ?Sized>(
    ctx: &ServiceContext,
    processes: &mut P,
    run_key: Option<&dyn RunKeyStore>,
) -> SystemInfo {
    let located = locator::locate(ctx.steam_dir_override.as_deref(), ctx.platform);
    collect_system_info(ctx, located, processes, run_key)
}

fn collect_system_info<P: ProcessControl + ?Sized>(
    ctx: &ServiceContext,
    located: Result<SteamInstallation, DebloatError>,
    processes: &mut P,
    run_key: Option<&dyn RunKeyStore>,
) -> SystemInfo {
    let mut warnings = Vec::new();

    let steam = match located {
        Ok(install) => Some(install),
        Err(e) => {
            warnings.push(e.to_string());
            None
        }
    };

    let steam_cfg_applied = steam
        .as_ref()
        .map(|s| steam_cfg::is_steam_cfg_applied(&s.dir))
        .unwrap_or(false);

    let launcher = launcher::launcher_path(ctx.platform, &ctx.launcher_dir);
    let (launcher_path, launcher_mode) = if launcher.is_file() {
        (
            Some(launcher.to_string_lossy().to_string()),
            launcher::detect_launcher_mode(&launcher),
        )
    } else {
        (None, None)
    };

    let startup = match run_key {
        Some(store) => match startup::read(store) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warnings.push(e.to_string());
                None
            }
        },
        None => None,
    };

    SystemInfo {
        platform: ctx.platform,
        os_version: sysinfo::System::long_os_version(),
        steam,
        running_processes: processes.running(),
        steam_cfg_applied,
        launcher_path,
        launcher_mode,
        startup,
        warnings,
    }
}
