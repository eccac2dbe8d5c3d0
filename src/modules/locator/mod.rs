pub mod models;
pub mod paths;
#[cfg(windows)]
pub mod registry;

use crate::modules::common::error::DebloatError;
use crate::modules::common::platform::Platform;
use models::{Candidate, LocateSource, SteamInstallation};
use std::path::Path;

/// 定位 Steam 安装目录
///
/// 顺序：手动指定 → 注册表（仅 Windows）→ 常见路径
pub fn locate(
    override_dir: Option<&Path>,
    platform: Platform,
) -> Result<SteamInstallation, DebloatError> {
    let mut candidates = Vec::new();

    if let Some(dir) = override_dir {
        candidates.push(Candidate::new(dir.to_path_buf(), LocateSource::Override));
    }

    #[cfg(windows)]
    if platform == Platform::Windows {
        candidates.extend(registry::registry_candidates());
    }

    candidates.extend(paths::known_paths(platform));

    locate_in(&candidates, platform).ok_or_else(|| {
        DebloatError::NotFound(format!(
            "未找到 Steam 安装（已检查 {} 个位置）",
            candidates.len()
        ))
    })
}

/// 在候选目录中找到第一个包含主程序的目录
pub fn locate_in(candidates: &[Candidate], platform: Platform) -> Option<SteamInstallation> {
    let executable = platform.steam_executable();

    for candidate in candidates {
        let exe = candidate.dir.join(executable);
        if exe.is_file() {
            tracing::info!("找到 Steam: {} ({})", candidate.dir.display(), candidate.source);
            return Some(SteamInstallation {
                dir: candidate.dir.clone(),
                executable: exe,
                source: candidate.source.clone(),
            });
        }

        if candidate.dir.exists() {
            tracing::debug!(
                "目录存在但缺少 {}: {}",
                executable,
                candidate.dir.display()
            );
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::paths::test_support;

    #[test]
    fn skips_directories_without_executable() {
        let root = test_support::temp_dir("locate");
        let empty = root.join("empty");
        let real = root.join("real");
        std::fs::create_dir_all(&empty).unwrap();
        std::fs::create_dir_all(&real).unwrap();
        std::fs::write(real.join("steam.sh"), "#!/bin/sh\n").unwrap();

        let candidates = vec![
            Candidate::new(root.join("missing"), LocateSource::Override),
            Candidate::new(empty, LocateSource::KnownPath),
            Candidate::new(real.clone(), LocateSource::KnownPath),
        ];

        let found = locate_in(&candidates, Platform::Linux).unwrap();
        assert_eq!(found.dir, real);
        assert_eq!(found.executable, real.join("steam.sh"));
        assert_eq!(found.source, LocateSource::KnownPath);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn override_wins_when_valid() {
        let root = test_support::temp_dir("locate-override");
        std::fs::write(root.join("steam.exe"), b"MZ").unwrap();

        let found = locate(Some(&root), Platform::Windows).unwrap();
        assert_eq!(found.source, LocateSource::Override);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn nothing_found_returns_none() {
        let root = test_support::temp_dir("locate-none");
        let candidates = vec![Candidate::new(root.clone(), LocateSource::KnownPath)];
        assert!(locate_in(&candidates, Platform::Windows).is_none());
        let _ = std::fs::remove_dir_all(&root);
    }
}
