pub mod models;
pub mod system;

use crate::modules::common::error::DebloatError;
use crate::modules::common::utils;
use models::{CancelSignal, SteamProcess, StopReport, WaitOutcome};
use std::path::Path;
use std::time::Duration;

/// Steam 客户端的进程名（不含 .exe，小写）
const STEAM_PROCESS_NAMES: &[&str] = &["steam", "steam.sh", "steamwebhelper", "steamservice"];

/// 进程操作接口，测试中用内存实现替换
pub trait ProcessControl: Send {
    /// 当前运行的 Steam 进程
    fn running(&mut self) -> Vec<SteamProcess>;

    /// 结束指定进程，返回是否成功发出信号
    fn kill(&mut self, pid: u32) -> bool;

    /// 启动程序并返回 PID
    fn launch(&mut self, executable: &Path, args: &[String], cwd: &Path) -> Result<u32, DebloatError>;
}

pub fn is_steam_process_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    let stem = lower.strip_suffix(".exe").unwrap_or(&lower);
    STEAM_PROCESS_NAMES.contains(&stem)
}

/// 结束所有 Steam 进程，失败只记录不中断
pub fn stop_all<P: ProcessControl + ?Sized>(control: &mut P) -> StopReport {
    let mut report = StopReport::default();

    for process in control.running() {
        if control.kill(process.pid) {
            tracing::info!("已结束进程 {} ({})", process.name, process.pid);
            report.killed.push(process);
        } else {
            tracing::warn!("无法结束进程 {} ({})", process.name, process.pid);
            report.failed.push(process);
        }
    }

    report
}

/// 轮询直到没有 Steam 进程、超时或被取消
pub async fn wait_for_exit<P: ProcessControl + ?Sized>(
    control: &mut P,
    timeout: Duration,
    interval: Duration,
    cancel: &mut CancelSignal,
) -> WaitOutcome {
    let started = tokio::time::Instant::now();
    // 超出 Instant 表示范围时视为没有截止时间
    let deadline = started.checked_add(timeout);
    let mut polls = 0u32;

    loop {
        if cancel.is_cancelled() {
            tracing::warn!("等待 Steam 退出时被取消");
            return WaitOutcome::Cancelled;
        }

        polls += 1;
        let running = control.running();
        if running.is_empty() {
            tracing::info!(
                "Steam 进程已全部退出 (轮询 {} 次, 用时 {})",
                polls,
                utils::format_duration(started.elapsed())
            );
            return WaitOutcome::Exited;
        }

        if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
            tracing::warn!(
                "等待 Steam 退出超时 ({}), 仍有 {} 个进程",
                utils::format_duration(timeout),
                running.len()
            );
            return WaitOutcome::TimedOut;
        }

        tracing::debug!("仍有 {} 个 Steam 进程在运行", running.len());

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::warn!("等待 Steam 退出时被取消");
                return WaitOutcome::Cancelled;
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeProcesses;
    use super::*;

    #[test]
    fn matches_steam_names_case_insensitively() {
        assert!(is_steam_process_name("Steam.exe"));
        assert!(is_steam_process_name("steamwebhelper"));
        assert!(is_steam_process_name("SteamService.exe"));
        assert!(is_steam_process_name("steam.sh"));
        assert!(!is_steam_process_name("steam-debloat"));
        assert!(!is_steam_process_name("steamvr.exe"));
    }

    #[test]
    fn stop_all_reports_failures_without_aborting() {
        let mut fake = FakeProcesses::with_running(&["steam.exe", "steamwebhelper.exe"]);
        let stubborn = fake.table[1].pid;
        fake.unkillable.push(stubborn);

        let report = stop_all(&mut fake);

        assert_eq!(report.killed.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].pid, stubborn);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_returns_exited_when_processes_disappear() {
        let mut fake = FakeProcesses::with_running(&[]);
        fake.lifetimes.push_back(Some(3));
        fake.launch(Path::new("steam.exe"), &[], Path::new(".")).unwrap();

        let mut cancel = CancelSignal::never();
        let outcome = wait_for_exit(
            &mut fake,
            Duration::from_secs(600),
            Duration::from_secs(1),
            &mut cancel,
        )
        .await;

        assert_eq!(outcome, WaitOutcome::Exited);
        assert_eq!(fake.polls, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_timeout_waits_without_overflowing() {
        let mut fake = FakeProcesses::with_running(&[]);
        fake.lifetimes.push_back(Some(3));
        fake.launch(Path::new("steam.exe"), &[], Path::new(".")).unwrap();

        let mut cancel = CancelSignal::never();
        let outcome = wait_for_exit(
            &mut fake,
            Duration::from_secs(u64::MAX),
            Duration::from_secs(1),
            &mut cancel,
        )
        .await;

        assert_eq!(outcome, WaitOutcome::Exited);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out_when_steam_keeps_running() {
        let mut fake = FakeProcesses::with_running(&["steam.exe"]);
        let mut cancel = CancelSignal::never();

        let started = tokio::time::Instant::now();
        let outcome = wait_for_exit(
            &mut fake,
            Duration::from_secs(600),
            Duration::from_secs(1),
            &mut cancel,
        )
        .await;

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(started.elapsed() >= Duration::from_secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_stops_on_cancel() {
        let mut fake = FakeProcesses::with_running(&["steam.exe"]);
        let (tx, mut cancel) = CancelSignal::new();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            let _ = tx.send(true);
        });

        let outcome = wait_for_exit(
            &mut fake,
            Duration::from_secs(600),
            Duration::from_secs(1),
            &mut cancel,
        )
        .await;

        assert_eq!(outcome, WaitOutcome::Cancelled);
        assert!(fake.polls >= 5);
    }
}
