use super::models::{OperationRecord, OperationState, OptimizationConfig, OptimizationResult};
use super::{history, sleep_or_cancel, ServiceContext, StateObserver, StateTracker, STOP_GRACE};
use crate::modules::common::error::DebloatError;
use crate::modules::locator::{self, models::SteamInstallation};
use crate::modules::process::models::{CancelSignal, WaitOutcome};
use crate::modules::process::{self, ProcessControl};
use crate::modules::startup::{self, models::ClearOutcome, RunKeyStore};
use crate::modules::writer::{self, launcher, models::WriteJournal, modes, shortcut, steam_cfg};
use chrono::Utc;
use std::time::Duration;

/// 降级并精简 Steam
///
/// 检测安装 → 结束进程 → 写 steam.cfg/启动脚本/启动项 → 以降级参数启动 Steam → 等待其退出
pub struct SteamDebloatService<P: ProcessControl> {
    ctx: ServiceContext,
    processes: P,
    run_key: Option<Box<dyn RunKeyStore>>,
    tracker: StateTracker,
}

impl<P: ProcessControl> SteamDebloatService<P> {
    pub fn new(ctx: ServiceContext, processes: P, run_key: Option<Box<dyn RunKeyStore>>) -> Self {
        Self {
            ctx,
            processes,
            run_key,
            tracker: StateTracker::new(None),
        }
    }

    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.tracker = StateTracker::new(Some(observer));
        self
    }

    pub fn processes(&self) -> &P {
        &self.processes
    }

    pub async fn optimize(
        &mut self,
        config: &OptimizationConfig,
        cancel: &mut CancelSignal,
    ) -> OptimizationResult {
        let mut result = OptimizationResult::new(config.mode);
        let state = self.run(config, cancel, &mut result).await;

        if state == OperationState::Failed {
            tracing::error!("优化失败: {}", result.error.as_deref().unwrap_or("未知错误"));
        }
        self.tracker.enter(state);

        result.state = state;
        result.finished_at = Some(Utc::now());
        result.transitions = self.tracker.take_transitions();

        if self.ctx.record_history {
            if let Err(e) = history::append(OperationRecord::Optimize(result.clone())) {
                tracing::warn!("写入历史记录失败: {}", e);
            }
        }

        result
    }

    async fn run(
        &mut self,
        config: &OptimizationConfig,
        cancel: &mut CancelSignal,
        result: &mut OptimizationResult,
    ) -> OperationState {
        // 1. 检测
        self.tracker.enter(OperationState::Detecting);
        let install =
            match locator::locate(self.ctx.steam_dir_override.as_deref(), self.ctx.platform) {
                Ok(install) => install,
                Err(e) => return fail(result, e),
            };
        result.steam_dir = Some(install.dir.to_string_lossy().to_string());

        if cancel.is_cancelled() {
            return OperationState::Cancelled;
        }

        // 2. 结束进程
        self.tracker.enter(OperationState::StoppingProcess);
        if let Some(state) = self.stop_steam(cancel, result).await {
            return state;
        }

        // 3. 写入配置
        self.tracker.enter(OperationState::WritingConfig);
        let mut journal = WriteJournal::new();
        if let Err(e) = self.write_files(config, &install, &mut journal, result) {
            self.rollback(&journal, result);
            return fail(result, e);
        }
        self.edit_startup(config, result);

        if config.skip_update {
            tracing::info!("已跳过强制更新");
            return OperationState::Done;
        }
        if cancel.is_cancelled() {
            return OperationState::Cancelled;
        }

        // 4. 启动降级
        self.tracker.enter(OperationState::LaunchingUpdate);
        let package_url = config.mode.package_url(&self.ctx.settings);
        result.package_url = Some(package_url.clone());

        let args = modes::update_args(&package_url);
        if let Err(e) = self.processes.launch(&install.executable, &args, &install.dir) {
            self.rollback(&journal, result);
            return fail(result, e);
        }

        // 给更新程序留出启动时间
        if !sleep_or_cancel(self.ctx.poll_interval(), cancel).await {
            return OperationState::Cancelled;
        }

        // 5. 等待退出
        self.tracker.enter(OperationState::PollingExit);
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        match process::wait_for_exit(
            &mut self.processes,
            timeout,
            self.ctx.poll_interval(),
            cancel,
        )
        .await
        {
            WaitOutcome::Exited => OperationState::Done,
            WaitOutcome::TimedOut => {
                result.warnings.push(format!(
                    "Steam 在 {} 秒内没有退出，更新可能仍在进行",
                    timeout.as_secs()
                ));
                OperationState::TimedOut
            }
            WaitOutcome::Cancelled => OperationState::Cancelled,
        }
    }

    /// 返回 Some 表示应提前结束
    async fn stop_steam(
        &mut self,
        cancel: &mut CancelSignal,
        result: &mut OptimizationResult,
    ) -> Option<OperationState> {
        let report = process::stop_all(&mut self.processes);
        for failed in &report.failed {
            result
                .warnings
                .push(format!("无法结束进程 {} ({})", failed.name, failed.pid));
        }
        if report.is_empty() {
            return None;
        }

        match process::wait_for_exit(
            &mut self.processes,
            STOP_GRACE,
            self.ctx.poll_interval(),
            cancel,
        )
        .await
        {
            WaitOutcome::Exited => None,
            WaitOutcome::Cancelled => Some(OperationState::Cancelled),
            WaitOutcome::TimedOut => Some(fail(
                result,
                DebloatError::Timeout("Steam 进程无法结束".to_string()),
            )),
        }
    }

    fn write_files(
        &self,
        config: &OptimizationConfig,
        install: &SteamInstallation,
        journal: &mut WriteJournal,
        result: &mut OptimizationResult,
    ) -> Result<(), DebloatError> {
        let cfg = steam_cfg::write_steam_cfg(&install.dir, journal)?;
        result.files_written.push(cfg.to_string_lossy().to_string());

        if !config.create_launcher {
            return Ok(());
        }

        let script = launcher::write_launcher(
            self.ctx.platform,
            &self.ctx.launcher_dir,
            &install.dir,
            config.mode,
            journal,
        )?;
        result.files_written.push(script.to_string_lossy().to_string());

        if config.create_shortcut {
            let created = self.ctx.shortcut_path.as_deref().map(|path| {
                shortcut::create_shortcut(
                    self.ctx.platform,
                    path,
                    &script,
                    &install.dir,
                    config.mode,
                    journal,
                )
            });
            match created {
                Some(Ok(path)) => result.files_written.push(path.to_string_lossy().to_string()),
                Some(Err(e)) => result.warnings.push(format!("创建快捷方式失败: {}", e)),
                None => result.warnings.push("无法确定快捷方式位置".to_string()),
            }
        }

        Ok(())
    }

    fn edit_startup(&mut self, config: &OptimizationConfig, result: &mut OptimizationResult) {
        if !config.remove_startup_entry {
            return;
        }

        let Some(store) = self.run_key.as_deref_mut() else {
            result
                .warnings
                .push(format!("{} 不支持启动项编辑，已跳过", self.ctx.platform));
            return;
        };

        match startup::clear(store, config.backup_startup_entry) {
            Ok(outcome) => result.startup = Some(outcome),
            Err(e) => result.warnings.push(format!("清除启动项失败: {}", e)),
        }
    }

    fn rollback(&mut self, journal: &WriteJournal, result: &mut OptimizationResult) {
        result.warnings.extend(writer::rollback(journal));

        if let (Some(ClearOutcome::Cleared { backed_up: true }), Some(store)) =
            (&result.startup, self.run_key.as_deref_mut())
        {
            if let Err(e) = startup::restore(store) {
                result.warnings.push(format!("恢复启动项失败: {}", e));
            }
        }

        result.rolled_back = true;
    }
}

fn fail(result: &mut OptimizationResult, error: DebloatError) -> OperationState {
    result.error = Some(error.to_string());
    OperationState::Failed
}
