use super::{RunKeyStore, RUN_KEY};
use crate::modules::common::error::DebloatError;
use winreg::enums::*;
use winreg::RegKey;

/// HKCU Run 键
pub struct WinRunKey {
    hive: RegKey,
}

impl WinRunKey {
    pub fn current_user() -> Self {
        Self {
            hive: RegKey::predef(HKEY_CURRENT_USER),
        }
    }
}

fn registry_error(action: &str, name: &str, e: std::io::Error) -> DebloatError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        DebloatError::PermissionDenied(format!("{} {}: {}", action, name, e))
    } else {
        DebloatError::Registry(format!("{} {}: {}", action, name, e))
    }
}

impl RunKeyStore for WinRunKey {
    fn get(&self, name: &str) -> Result<Option<String>, DebloatError> {
        let key = match self.hive.open_subkey(RUN_KEY) {
            Ok(k) => k,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(registry_error("打开 Run 键失败", RUN_KEY, e)),
        };

        match key.get_value::<String, _>(name) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(registry_error("读取启动项失败", name, e)),
        }
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), DebloatError> {
        let (key, _) = self
            .hive
            .create_subkey(RUN_KEY)
            .map_err(|e| registry_error("打开 Run 键失败", RUN_KEY, e))?;
        key.set_value(name, &value.to_string())
            .map_err(|e| registry_error("写入启动项失败", name, e))
    }

    fn delete(&mut self, name: &str) -> Result<(), DebloatError> {
        let key = match self.hive.open_subkey_with_flags(RUN_KEY, KEY_WRITE) {
            Ok(k) => k,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(registry_error("打开 Run 键失败", RUN_KEY, e)),
        };

        match key.delete_value(name) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(registry_error("删除启动项失败", name, e)),
        }
    }
}
