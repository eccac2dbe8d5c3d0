//! 桌面快捷方式
//!
//! Windows 通过 PowerShell 的 WScript.Shell 生成 .lnk，Linux 写 .desktop 文件

use super::models::WriteJournal;
use super::modes::SteamMode;
use crate::modules::common::error::DebloatError;
use crate::modules::common::platform::Platform;
use std::path::{Path, PathBuf};

pub const SHORTCUT_NAME: &str = "Steam Debloat";
pub const DESKTOP_ENTRY_FILE: &str = "steam-debloat.desktop";

/// 快捷方式保存位置
pub fn shortcut_path(platform: Platform, desktop_dir: &Path) -> Option<PathBuf> {
    match platform {
        Platform::Windows => Some(desktop_dir.join(format!("{}.lnk", SHORTCUT_NAME))),
        Platform::Linux => dirs::data_dir().map(|d| d.join("applications").join(DESKTOP_ENTRY_FILE)),
    }
}

/// 生成 .desktop 条目
pub fn render_desktop_entry(launcher: &Path, steam_dir: &Path, mode: SteamMode) -> String {
    format!(
        "[Desktop Entry]\nType=Application\nName={}\nComment=Steam ({})\nExec=\"{}\"\nPath={}\nIcon=steam\nTerminal=false\nCategories=Game;\n",
        SHORTCUT_NAME,
        mode.id(),
        launcher.display(),
        steam_dir.display()
    )
}

/// 创建指向启动脚本的快捷方式
pub fn create_shortcut(
    platform: Platform,
    shortcut: &Path,
    launcher: &Path,
    steam_dir: &Path,
    mode: SteamMode,
    journal: &mut WriteJournal,
) -> Result<PathBuf, DebloatError> {
    if let Some(parent) = shortcut.parent() {
        std::fs::create_dir_all(parent)?;
    }
    journal.record(shortcut)?;

    match platform {
        Platform::Linux => {
            std::fs::write(shortcut, render_desktop_entry(launcher, steam_dir, mode))?;
        }
        Platform::Windows => create_lnk(shortcut, launcher, steam_dir)?,
    }

    tracing::info!("已创建快捷方式: {}", shortcut.display());
    Ok(shortcut.to_path_buf())
}

fn create_lnk(shortcut: &Path, launcher: &Path, steam_dir: &Path) -> Result<(), DebloatError> {
    use std::process::Command;

    let script = r#"
$ErrorActionPreference = 'Stop'
$shell = New-Object -ComObject WScript.Shell
$link = $shell.CreateShortcut($env:STEAM_DEBLOAT_LNK)
$link.TargetPath = $env:STEAM_DEBLOAT_TARGET
$link.WorkingDirectory = $env:STEAM_DEBLOAT_WORKDIR
$link.IconLocation = (Join-Path $env:STEAM_DEBLOAT_WORKDIR 'steam.exe') + ',0'
$link.WindowStyle = 7
$link.Save()
"#;

    let output = Command::new("powershell")
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            script,
        ])
        .env("STEAM_DEBLOAT_LNK", shortcut)
        .env("STEAM_DEBLOAT_TARGET", launcher)
        .env("STEAM_DEBLOAT_WORKDIR", steam_dir)
        .output()
        .map_err(|e| DebloatError::Process(format!("执行 PowerShell 失败: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(
            "创建快捷方式失败: status={:?}, stderr={}",
            output.status.code(),
            stderr
        );
        return Err(DebloatError::Process(format!(
            "创建快捷方式失败: {}",
            stderr.trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::paths::test_support;

    #[test]
    fn desktop_entry_points_at_launcher() {
        let entry = render_desktop_entry(
            Path::new("/home/gamer/Desktop/steam-debloat.sh"),
            Path::new("/home/gamer/.steam/steam"),
            SteamMode::Normal2025July,
        );

        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=\"/home/gamer/Desktop/steam-debloat.sh\"\n"));
        assert!(entry.contains("Comment=Steam (normal2025july)"));
    }

    #[test]
    fn windows_shortcut_lands_on_desktop() {
        let path = shortcut_path(Platform::Windows, Path::new("desk")).unwrap();
        assert_eq!(path, Path::new("desk").join("Steam Debloat.lnk"));
    }

    #[test]
    fn linux_shortcut_is_written_and_journaled() {
        let dir = test_support::temp_dir("shortcut");
        let shortcut = dir.join("applications").join(DESKTOP_ENTRY_FILE);
        let mut journal = WriteJournal::new();

        create_shortcut(
            Platform::Linux,
            &shortcut,
            Path::new("/tmp/steam-debloat.sh"),
            Path::new("/tmp/steam"),
            SteamMode::Lite2022Dec,
            &mut journal,
        )
        .unwrap();

        assert!(shortcut.exists());
        assert_eq!(journal.paths(), vec![shortcut.clone()]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
