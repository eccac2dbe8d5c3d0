//! 应用数据目录
//!
//! 设置文件与操作记录都放在这里，`STEAM_DEBLOAT_DATA_DIR` 可以重定向整个目录

use super::error::DebloatError;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "steam-debloat";
pub const DATA_DIR_ENV: &str = "STEAM_DEBLOAT_DATA_DIR";

/// 测试中修改数据目录环境变量时持有此锁
#[cfg(test)]
pub static TEST_DATA_DIR_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// 获取数据目录（不存在时创建）
pub fn data_dir() -> Result<PathBuf, DebloatError> {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => dirs::data_dir()
            .ok_or_else(|| DebloatError::NotFound("无法获取用户数据目录".to_string()))?
            .join(APP_DIR_NAME),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 用户桌面目录
pub fn desktop_dir() -> Option<PathBuf> {
    dirs::desktop_dir().or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::DATA_DIR_ENV;
    use std::path::{Path, PathBuf};

    /// 为测试创建唯一的临时目录
    pub fn temp_dir(test_name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "steam-debloat-test-{}-{}",
            test_name,
            uuid::Uuid::new_v4()
        ));
        let _ = std::fs::create_dir_all(&root);
        root
    }

    /// 将数据目录指向临时目录，调用方需要持有 TEST_DATA_DIR_LOCK
    pub fn with_data_root(test_name: &str) -> PathBuf {
        let root = temp_dir(test_name);
        std::env::set_var(DATA_DIR_ENV, &root);
        root
    }

    pub fn cleanup_data_root(root: &Path) {
        std::env::remove_var(DATA_DIR_ENV);
        let _ = std::fs::remove_dir_all(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_honours_env_override() {
        let _guard = TEST_DATA_DIR_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let root = test_support::with_data_root("data-dir");
        let nested = root.join("nested");
        std::env::set_var(DATA_DIR_ENV, &nested);

        let dir = data_dir().unwrap();
        assert_eq!(dir, nested);
        assert!(nested.is_dir());

        test_support::cleanup_data_root(&root);
    }
}
