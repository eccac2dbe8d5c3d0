use super::models::WriteJournal;
use crate::modules::common::error::DebloatError;
use std::path::{Path, PathBuf};

pub const STEAM_CFG_FILE: &str = "steam.cfg";

/// 阻止引导程序自更新
pub const STEAM_CFG_CONTENT: &str = "BootStrapperInhibitAll=enable\nBootStrapperForceSelfUpdate=disable\n";

pub fn steam_cfg_path(steam_dir: &Path) -> PathBuf {
    steam_dir.join(STEAM_CFG_FILE)
}

/// 覆盖写入 steam.cfg
pub fn write_steam_cfg(
    steam_dir: &Path,
    journal: &mut WriteJournal,
) -> Result<PathBuf, DebloatError> {
    let path = steam_cfg_path(steam_dir);
    journal.record(&path)?;

    std::fs::write(&path, STEAM_CFG_CONTENT).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            DebloatError::PermissionDenied(format!(
                "无法写入 {}，请以管理员身份运行",
                path.display()
            ))
        } else {
            DebloatError::FileSystem(e)
        }
    })?;

    tracing::info!("已写入 {}", path.display());
    Ok(path)
}

/// steam.cfg 是否存在且内容为本工具写入
pub fn is_steam_cfg_applied(steam_dir: &Path) -> bool {
    std::fs::read_to_string(steam_cfg_path(steam_dir))
        .map(|content| content.contains("BootStrapperInhibitAll=enable"))
        .unwrap_or(false)
}
