use super::models::{OperationRecord, OperationState, UninstallStatus};
use super::{history, sleep_or_cancel, ServiceContext, StateObserver, StateTracker, STOP_GRACE};
use crate::modules::common::error::DebloatError;
use crate::modules::locator;
use crate::modules::process::models::{CancelSignal, WaitOutcome};
use crate::modules::process::{self, ProcessControl};
use crate::modules::startup::{self, models::RestoreOutcome, RunKeyStore};
use crate::modules::writer::{self, modes};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UninstallOptions {
    /// 从备份恢复 Run 键中的 Steam 启动项
    pub restore_startup: bool,
    /// 启动 Steam 重新下载官方最新客户端
    pub reset_client: bool,
    pub timeout_secs: u64,
}

impl Default for UninstallOptions {
    fn default() -> Self {
        Self {
            restore_startup: true,
            reset_client: true,
            timeout_secs: crate::modules::common::settings::DEFAULT_POLL_TIMEOUT_SECS,
        }
    }
}

/// 撤销优化：删除本工具写入的文件，恢复启动项，把客户端更新回官方版本
pub struct UninstallService<P: ProcessControl> {
    ctx: ServiceContext,
    processes: P,
    run_key: Option<Box<dyn RunKeyStore>>,
    tracker: StateTracker,
}

impl<P: ProcessControl> UninstallService<P> {
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

    pub async fn uninstall(
        &mut self,
        options: &UninstallOptions,
        cancel: &mut CancelSignal,
    ) -> UninstallStatus {
        let mut status = UninstallStatus::new();
        let state = self.run(options, cancel, &mut status).await;

        if state == OperationState::Failed {
            tracing::error!("恢复失败: {}", status.error.as_deref().unwrap_or("未知错误"));
        }
        self.tracker.enter(state);

        status.state = state;
        status.finished_at = Some(Utc::now());
        status.transitions = self.tracker.take_transitions();

        if self.ctx.record_history {
            if let Err(e) = history::append(OperationRecord::Uninstall(status.clone())) {
                tracing::warn!("写入历史记录失败: {}", e);
            }
        }

        status
    }

    async fn run(
        &mut self,
        options: &UninstallOptions,
        cancel: &mut CancelSignal,
        status: &mut UninstallStatus,
    ) -> OperationState {
        self.tracker.enter(OperationState::Detecting);
        let install =
            match locator::locate(self.ctx.steam_dir_override.as_deref(), self.ctx.platform) {
                Ok(install) => install,
                Err(e) => return fail(status, e),
            };
        status.steam_dir = Some(install.dir.to_string_lossy().to_string());

        if cancel.is_cancelled() {
            return OperationState::Cancelled;
        }

        self.tracker.enter(OperationState::StoppingProcess);
        let report = process::stop_all(&mut self.processes);
        for failed in &report.failed {
            status
                .warnings
                .push(format!("无法结束进程 {} ({})", failed.name, failed.pid));
        }
        if !report.is_empty() {
            match process::wait_for_exit(
                &mut self.processes,
                STOP_GRACE,
                self.ctx.poll_interval(),
                cancel,
            )
            .await
            {
                WaitOutcome::Exited => {}
                WaitOutcome::Cancelled => return OperationState::Cancelled,
                WaitOutcome::TimedOut => {
                    return fail(status, DebloatError::Timeout("Steam 进程无法结束".to_string()))
                }
            }
        }

        self.tracker.enter(OperationState::WritingConfig);
        let artifacts = writer::artifact_paths(
            self.ctx.platform,
            &install.dir,
            &self.ctx.launcher_dir,
            self.ctx.shortcut_path.as_deref(),
        );
        status.removed = writer::remove_artifacts(&artifacts);
        for failed in status.removed.iter().filter(|r| !r.success) {
            status.warnings.push(format!(
                "删除失败 {}: {}",
                failed.path,
                failed.error.as_deref().unwrap_or("未知错误")
            ));
        }

        if options.restore_startup {
            self.restore_startup(status);
        }

        if !options.reset_client {
            return OperationState::Done;
        }

        // steam.cfg 仍在时更新会被拦截
        if install.dir.join(writer::steam_cfg::STEAM_CFG_FILE).exists() {
            return fail(
                status,
                DebloatError::PermissionDenied("steam.cfg 无法删除，客户端不会更新".to_string()),
            );
        }

        if cancel.is_cancelled() {
            return OperationState::Cancelled;
        }

        self.tracker.enter(OperationState::LaunchingUpdate);
        if let Err(e) = self
            .processes
            .launch(&install.executable, &modes::reset_args(), &install.dir)
        {
            return fail(status, e);
        }

        if !sleep_or_cancel(self.ctx.poll_interval(), cancel).await {
            return OperationState::Cancelled;
        }

        self.tracker.enter(OperationState::PollingExit);
        let timeout = Duration::from_secs(options.timeout_secs.max(1));
        match process::wait_for_exit(&mut self.processes, timeout, self.ctx.poll_interval(), cancel)
            .await
        {
            WaitOutcome::Exited => OperationState::Done,
            WaitOutcome::TimedOut => {
                status.warnings.push(format!(
                    "Steam 在 {} 秒内没有退出，更新可能仍在进行",
                    timeout.as_secs()
                ));
                OperationState::TimedOut
            }
            WaitOutcome::Cancelled => OperationState::Cancelled,
        }
    }

    fn restore_startup(&mut self, status: &mut UninstallStatus) {
        let Some(store) = self.run_key.as_deref_mut() else {
            tracing::debug!("{} 没有启动项可恢复", self.ctx.platform);
            return;
        };

        match startup::restore(store) {
            Ok(RestoreOutcome::Restored) => status.startup_restored = true,
            Ok(RestoreOutcome::NoBackup) => tracing::info!("没有启动项备份，跳过恢复"),
            Err(e) => status.warnings.push(format!("恢复启动项失败: {}", e)),
        }
    }
}

fn fail(status: &mut UninstallStatus, error: DebloatError) -> OperationState {
    status.error = Some(error.to_string());
    OperationState::Failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::platform::Platform;
    use crate::modules::process::fake::FakeProcesses;
    use crate::modules::service::test_support::context;
    use crate::modules::startup::fake::MemoryRunKey;
    use crate::modules::startup::{BACKUP_VALUE, STEAM_VALUE};

    #[tokio::test(start_paused = true)]
    async fn removes_artifacts_restores_startup_and_resets_client() {
        let (ctx, root) = context("uninstall-full", Platform::Windows);
        let steam_dir = ctx.steam_dir_override.clone().unwrap();
        let desktop = ctx.launcher_dir.clone();
        std::fs::write(steam_dir.join("steam.cfg"), "BootStrapperInhibitAll=enable\n").unwrap();
        std::fs::write(desktop.join("Steam.bat"), "@echo off\r\n").unwrap();

        let mut key = MemoryRunKey::default();
        key.values
            .insert(BACKUP_VALUE.to_string(), r#""C:\Steam\steam.exe" -silent"#.to_string());

        let mut fake = FakeProcesses::with_running(&["steam.exe"]);
        fake.lifetimes.push_back(Some(2));

        let mut service = UninstallService::new(ctx, fake, Some(Box::new(key)));
        let status = service
            .uninstall(&UninstallOptions::default(), &mut CancelSignal::never())
            .await;

        assert!(status.success(), "{:?}", status.error);
        assert!(!steam_dir.join("steam.cfg").exists());
        assert!(!desktop.join("Steam.bat").exists());
        assert_eq!(status.removed.iter().filter(|r| r.existed).count(), 2);
        assert!(status.startup_restored);

        let store = service.run_key.as_deref().unwrap();
        assert!(store.get(STEAM_VALUE).unwrap().is_some());

        let (_, args) = &service.processes().launches[0];
        assert_eq!(args, &modes::reset_args());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn without_reset_only_files_are_touched() {
        let (ctx, root) = context("uninstall-files", Platform::Linux);
        let options = UninstallOptions {
            reset_client: false,
            ..UninstallOptions::default()
        };

        let mut service = UninstallService::new(ctx, FakeProcesses::with_running(&[]), None);
        let status = service.uninstall(&options, &mut CancelSignal::never()).await;

        assert!(status.success());
        assert!(!status.startup_restored);
        assert!(service.processes().launches.is_empty());
        assert!(status.removed.iter().all(|r| r.success && !r.existed));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn stubborn_steam_fails_before_touching_files() {
        let (ctx, root) = context("uninstall-stubborn", Platform::Windows);
        let steam_dir = ctx.steam_dir_override.clone().unwrap();
        std::fs::write(steam_dir.join("steam.cfg"), "x").unwrap();

        let mut fake = FakeProcesses::with_running(&["steam.exe"]);
        let pid = fake.table[0].pid;
        fake.unkillable.push(pid);

        let mut service = UninstallService::new(ctx, fake, None);
        let status = service
            .uninstall(&UninstallOptions::default(), &mut CancelSignal::never())
            .await;

        assert_eq!(status.state, OperationState::Failed);
        assert!(steam_dir.join("steam.cfg").exists());
        assert_eq!(status.warnings.len(), 1);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn undeletable_steam_cfg_fails_without_launching() {
        let (ctx, root) = context("uninstall-cfg-stuck", Platform::Windows);
        let steam_dir = ctx.steam_dir_override.clone().unwrap();
        // 目录无法被 remove_file 删除
        std::fs::create_dir_all(steam_dir.join("steam.cfg")).unwrap();

        let mut service = UninstallService::new(ctx, FakeProcesses::with_running(&[]), None);
        let status = service
            .uninstall(&UninstallOptions::default(), &mut CancelSignal::never())
            .await;

        assert_eq!(status.state, OperationState::Failed);
        assert!(status.error.as_deref().unwrap_or("").contains("steam.cfg"));
        assert!(status.removed.iter().any(|r| r.existed && !r.success));
        assert!(service.processes().launches.is_empty());
        assert!(!status
            .transitions
            .iter()
            .any(|t| t.state == OperationState::LaunchingUpdate));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_that_never_finishes_times_out() {
        let (ctx, root) = context("uninstall-timeout", Platform::Windows);
        let mut fake = FakeProcesses::with_running(&[]);
        fake.lifetimes.push_back(None);

        let options = UninstallOptions {
            timeout_secs: 90,
            ..UninstallOptions::default()
        };

        let started = tokio::time::Instant::now();
        let mut service = UninstallService::new(ctx, fake, None);
        let status = service.uninstall(&options, &mut CancelSignal::never()).await;

        assert_eq!(status.state, OperationState::TimedOut);
        assert!(started.elapsed() >= Duration::from_secs(90));
        assert_eq!(service.processes().launches.len(), 1);
        assert_eq!(status.warnings.len(), 1);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_polling_reports_cancelled() {
        let (ctx, root) = context("uninstall-cancel-poll", Platform::Windows);
        let mut fake = FakeProcesses::with_running(&[]);
        fake.lifetimes.push_back(None);

        let (tx, mut cancel) = CancelSignal::new();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            let _ = tx.send(true);
        });

        let mut service = UninstallService::new(ctx, fake, None);
        let status = service.uninstall(&UninstallOptions::default(), &mut cancel).await;

        assert_eq!(status.state, OperationState::Cancelled);
        assert_eq!(service.processes().launches.len(), 1);
        assert!(status
            .transitions
            .iter()
            .any(|t| t.state == OperationState::PollingExit));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_reset_skips_launch() {
        let (ctx, root) = context("uninstall-cancel-early", Platform::Windows);

        let (tx, mut cancel) = CancelSignal::new();
        let mut service = UninstallService::new(ctx, FakeProcesses::with_running(&[]), None)
            .with_observer(Box::new(move |state: OperationState| {
                if state == OperationState::WritingConfig {
                    let _ = tx.send(true);
                }
            }));

        let status = service.uninstall(&UninstallOptions::default(), &mut cancel).await;

        assert_eq!(status.state, OperationState::Cancelled);
        assert!(service.processes().launches.is_empty());

        let _ = std::fs::remove_dir_all(&root);
    }
}
