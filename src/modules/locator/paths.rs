use super::models::{Candidate, LocateSource};
use crate::modules::common::platform::Platform;
use std::path::PathBuf;

/// 常见安装路径
pub fn known_paths(platform: Platform) -> Vec<Candidate> {
    let dirs = match platform {
        Platform::Windows => windows_known_dirs(),
        Platform::Linux => linux_known_dirs(),
    };

    dirs.into_iter()
        .map(|dir| Candidate::new(dir, LocateSource::KnownPath))
        .collect()
}

fn windows_known_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    for var in ["ProgramFiles(x86)", "ProgramFiles", "ProgramW6432"] {
        if let Ok(root) = std::env::var(var) {
            let dir = PathBuf::from(root).join("Steam");
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
    }

    for fallback in [r"C:\Program Files (x86)\Steam", r"C:\Program Files\Steam"] {
        let dir = PathBuf::from(fallback);
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }

    dirs
}

/// 原生、Flatpak 和 Snap 安装
fn linux_known_dirs() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };

    vec![
        home.join(".steam").join("steam"),
        home.join(".local").join("share").join("Steam"),
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
        home.join("snap").join("steam").join("common").join(".steam").join("steam"),
    ]
}
