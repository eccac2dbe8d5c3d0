use super::models::WriteJournal;
use super::modes::SteamMode;
use crate::modules::common::error::DebloatError;
use crate::modules::common::platform::Platform;
use crate::modules::common::utils;
use std::path::{Path, PathBuf};

/// 脚本中的标记行，用于识别本工具生成的启动脚本
pub const LAUNCHER_MARKER: &str = "steam-debloat launcher";

/// 生成启动脚本内容
pub fn render_launcher(platform: Platform, steam_dir: &Path, mode: SteamMode) -> String {
    let args = mode.launch_args(platform);

    match platform {
        Platform::Windows => {
            let lines = [
                "@echo off".to_string(),
                format!("rem {} ({})", LAUNCHER_MARKER, mode.id()),
                format!("cd /d \"{}\"", steam_dir.display()),
                format!(
                    "start \"\" \"{}\" {}",
                    platform.steam_executable(),
                    args.join(" ")
                ),
            ];
            let mut script = lines.join("\r\n");
            script.push_str("\r\n");
            script
        }
        Platform::Linux => {
            let quoted: Vec<String> = args.iter().map(|a| utils::shell_quote(a)).collect();
            format!(
                "#!/bin/sh\n# {} ({})\ncd {} || exit 1\nexec ./{} {} \"$@\"\n",
                LAUNCHER_MARKER,
                mode.id(),
                utils::shell_quote(&steam_dir.to_string_lossy()),
                platform.steam_executable(),
                quoted.join(" ")
            )
        }
    }
}

pub fn launcher_path(platform: Platform, target_dir: &Path) -> PathBuf {
    target_dir.join(platform.launcher_file_name())
}

/// 写入启动脚本（Windows: Steam.bat，Linux: steam-debloat.sh）
pub fn write_launcher(
    platform: Platform,
    target_dir: &Path,
    steam_dir: &Path,
    mode: SteamMode,
    journal: &mut WriteJournal,
) -> Result<PathBuf, DebloatError> {
    std::fs::create_dir_all(target_dir)?;

    let path = launcher_path(platform, target_dir);
    journal.record(&path)?;

    std::fs::write(&path, render_launcher(platform, steam_dir, mode))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    }

    tracing::info!("已写入启动脚本: {}", path.display());
    Ok(path)
}

/// 读取已有启动脚本记录的模式
pub fn detect_launcher_mode(path: &Path) -> Option<SteamMode> {
    let content = std::fs::read_to_string(path).ok()?;
    let line = content.lines().find(|l| l.contains(LAUNCHER_MARKER))?;
    let start = line.rfind('(')? + 1;
    let end = line.rfind(')')?;
    line.get(start..end)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::paths::test_support;

    #[test]
    fn windows_batch_changes_directory_and_starts_steam() {
        let script = render_launcher(
            Platform::Windows,
            Path::new(r"C:\Program Files (x86)\Steam"),
            SteamMode::Normal2022Dec,
        );

        let lines: Vec<&str> = script.split("\r\n").collect();
        assert_eq!(lines[0], "@echo off");
        assert_eq!(lines[2], r#"cd /d "C:\Program Files (x86)\Steam""#);
        assert!(lines[3].starts_with(r#"start "" "steam.exe" -no-dwrite"#));
        assert!(lines[3].ends_with("steam://open/library"));
    }

    #[test]
    fn linux_script_quotes_directory_and_forwards_arguments() {
        let script = render_launcher(
            Platform::Linux,
            Path::new("/home/gamer/My Steam"),
            SteamMode::Lite2025July,
        );

        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("cd '/home/gamer/My Steam' || exit 1"));
        assert!(script.contains("exec ./steam.sh -silent"));
        assert!(script.trim_end().ends_with("\"$@\""));
        assert!(!script.contains("-no-dwrite"));
    }

    #[test]
    fn written_launcher_records_its_mode() {
        let dir = test_support::temp_dir("launcher");
        let mut journal = WriteJournal::new();

        let path = write_launcher(
            Platform::Linux,
            &dir.join("desktop"),
            Path::new("/opt/steam"),
            SteamMode::Lite2022Dec,
            &mut journal,
        )
        .unwrap();

        assert!(path.ends_with("steam-debloat.sh"));
        assert_eq!(detect_launcher_mode(&path), Some(SteamMode::Lite2022Dec));
        assert!(journal.entries()[0].previous.is_none());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }

        let _ = std::fs::remove_dir_all(&dir);
    }
}
