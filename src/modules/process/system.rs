use super::models::SteamProcess;
use super::{is_steam_process_name, ProcessControl};
use crate::modules::common::error::DebloatError;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use sysinfo::{Pid, ProcessStatus, System};

/// 基于 sysinfo 的真实进程控制
pub struct SystemProcesses {
    system: System,
    /// 本工具启动的子进程，轮询时回收，避免僵尸进程被当作仍在运行
    children: Vec<Child>,
}

impl SystemProcesses {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            children: Vec::new(),
        }
    }

    fn reap_children(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!("子进程 {} 已退出: {}", child.id(), status);
                false
            }
            Ok(None) => true,
            Err(e) => {
                tracing::debug!("检查子进程 {} 失败: {}", child.id(), e);
                false
            }
        });
    }
}

impl Default for SystemProcesses {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl for SystemProcesses {
    fn running(&mut self) -> Vec<SteamProcess> {
        self.reap_children();
        self.system.refresh_processes();

        let mut processes: Vec<SteamProcess> = self
            .system
            .processes()
            .iter()
            .filter(|(_, p)| p.status() != ProcessStatus::Zombie)
            .filter(|(_, p)| is_steam_process_name(p.name()))
            .map(|(pid, p)| SteamProcess {
                pid: pid.as_u32(),
                name: p.name().to_string(),
            })
            .collect();

        processes.sort_by_key(|p| p.pid);
        processes
    }

    fn kill(&mut self, pid: u32) -> bool {
        match self.system.process(Pid::from_u32(pid)) {
            Some(process) => process.kill(),
            None => false,
        }
    }

    fn launch(&mut self, executable: &Path, args: &[String], cwd: &Path) -> Result<u32, DebloatError> {
        tracing::info!("启动: {} {}", executable.display(), args.join(" "));

        let child = Command::new(executable)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    DebloatError::PermissionDenied(format!(
                        "无法启动 {}: {}",
                        executable.display(),
                        e
                    ))
                } else {
                    DebloatError::Process(format!("无法启动 {}: {}", executable.display(), e))
                }
            })?;

        let pid = child.id();
        self.children.push(child);
        Ok(pid)
    }
}
