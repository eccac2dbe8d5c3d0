use crate::modules::common::platform::Platform;
use crate::modules::locator::models::SteamInstallation;
use crate::modules::process::models::SteamProcess;
use crate::modules::startup::models::{ClearOutcome, StartupEntry};
use crate::modules::writer::models::RemoveResult;
use crate::modules::writer::modes::SteamMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 操作状态
///
/// `Idle → Detecting → StoppingProcess → WritingConfig → LaunchingUpdate → PollingExit → Done | TimedOut | Cancelled`，
/// 任意阶段出错进入 `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationState {
    Idle,
    Detecting,
    StoppingProcess,
    WritingConfig,
    LaunchingUpdate,
    PollingExit,
    Done,
    TimedOut,
    Cancelled,
    Failed,
}

impl OperationState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationState::Done
                | OperationState::TimedOut
                | OperationState::Cancelled
                | OperationState::Failed
        )
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperationState::Idle => "空闲",
            OperationState::Detecting => "检测 Steam 安装",
            OperationState::StoppingProcess => "结束 Steam 进程",
            OperationState::WritingConfig => "写入配置",
            OperationState::LaunchingUpdate => "启动 Steam 更新",
            OperationState::PollingExit => "等待 Steam 退出",
            OperationState::Done => "完成",
            OperationState::TimedOut => "超时",
            OperationState::Cancelled => "已取消",
            OperationState::Failed => "失败",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub state: OperationState,
    pub at: DateTime<Utc>,
}

/// 系统与 Steam 状态概览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub platform: Platform,
    pub os_version: Option<String>,
    pub steam: Option<SteamInstallation>,
    pub running_processes: Vec<SteamProcess>,
    pub steam_cfg_applied: bool,
    pub launcher_path: Option<String>,
    pub launcher_mode: Option<SteamMode>,
    pub startup: Option<StartupEntry>,
    pub warnings: Vec<String>,
}

impl SystemInfo {
    pub fn steam_running(&self) -> bool {
        !self.running_processes.is_empty()
    }
}

/// 优化选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub mode: SteamMode,
    pub create_launcher: bool,
    pub create_shortcut: bool,
    pub remove_startup_entry: bool,
    pub backup_startup_entry: bool,
    /// 只写文件，不强制下载更新包
    pub skip_update: bool,
    pub timeout_secs: u64,
}

impl OptimizationConfig {
    pub fn new(mode: SteamMode) -> Self {
        Self {
            mode,
            create_launcher: true,
            create_shortcut: false,
            remove_startup_entry: false,
            backup_startup_entry: true,
            skip_update: false,
            timeout_secs: crate::modules::common::settings::DEFAULT_POLL_TIMEOUT_SECS,
        }
    }
}

/// 优化结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub id: String,
    pub mode: SteamMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub state: OperationState,
    pub transitions: Vec<StateTransition>,
    pub steam_dir: Option<String>,
    pub package_url: Option<String>,
    pub files_written: Vec<String>,
    pub startup: Option<ClearOutcome>,
    pub rolled_back: bool,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl OptimizationResult {
    pub fn new(mode: SteamMode) -> Self {
        Self {
            id: crate::modules::common::utils::generate_id(),
            mode,
            started_at: Utc::now(),
            finished_at: None,
            state: OperationState::Idle,
            transitions: Vec::new(),
            steam_dir: None,
            package_url: None,
            files_written: Vec::new(),
            startup: None,
            rolled_back: false,
            error: None,
            warnings: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.state == OperationState::Done
    }
}

/// 卸载（恢复）结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UninstallStatus {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub state: OperationState,
    pub transitions: Vec<StateTransition>,
    pub steam_dir: Option<String>,
    pub removed: Vec<RemoveResult>,
    pub startup_restored: bool,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl UninstallStatus {
    pub fn new() -> Self {
        Self {
            id: crate::modules::common::utils::generate_id(),
            started_at: Utc::now(),
            finished_at: None,
            state: OperationState::Idle,
            transitions: Vec::new(),
            steam_dir: None,
            removed: Vec::new(),
            startup_restored: false,
            error: None,
            warnings: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.state == OperationState::Done
    }
}

impl Default for UninstallStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// 写入历史记录的操作
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OperationRecord {
    Optimize(OptimizationResult),
    Uninstall(UninstallStatus),
}

impl OperationRecord {
    pub fn id(&self) -> &str {
        match self {
            OperationRecord::Optimize(r) => &r.id,
            OperationRecord::Uninstall(s) => &s.id,
        }
    }

    pub fn state(&self) -> OperationState {
        match self {
            OperationRecord::Optimize(r) => r.state,
            OperationRecord::Uninstall(s) => s.state,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        match self {
            OperationRecord::Optimize(r) => r.started_at,
            OperationRecord::Uninstall(s) => s.started_at,
        }
    }
}
