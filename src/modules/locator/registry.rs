use super::models::{Candidate, LocateSource};
use crate::modules::common::utils;
use winreg::enums::*;
use winreg::RegKey;

/// 从注册表读取候选目录
pub fn registry_candidates() -> Vec<Candidate> {
    // Steam 在注册表中记录安装目录的位置
    let sources = [
        (HKEY_CURRENT_USER, r"Software\Valve\Steam", "SteamPath"),
        (HKEY_LOCAL_MACHINE, r"SOFTWARE\WOW6432Node\Valve\Steam", "InstallPath"),
        (HKEY_LOCAL_MACHINE, r"SOFTWARE\Valve\Steam", "InstallPath"),
    ];
    let mut candidates = Vec::new();

    for (hkey, path, value_name) in sources {
        let key = match RegKey::predef(hkey).open_subkey(path) {
            Ok(k) => k,
            Err(e) => {
                tracing::debug!("打开注册表键 {}\\{} 失败: {}", format_hkey(hkey), path, e);
                continue;
            }
        };

        match key.get_value::<String, _>(value_name) {
            Ok(raw) if !raw.trim().is_empty() => {
                let full_path = format!("{}\\{}\\{}", format_hkey(hkey), path, value_name);
                tracing::debug!("注册表 {} = {}", full_path, raw);
                candidates.push(Candidate::new(
                    utils::normalize_path(&raw),
                    LocateSource::Registry(full_path),
                ));
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("读取 {} 失败: {}", value_name, e),
        }
    }

    candidates
}

pub fn format_hkey(hkey: winreg::HKEY) -> String {
    match hkey {
        HKEY_LOCAL_MACHINE => "HKLM".to_string(),
        HKEY_CURRENT_USER => "HKCU".to_string(),
        HKEY_CLASSES_ROOT => "HKCR".to_string(),
        HKEY_USERS => "HKU".to_string(),
        _ => format!("{:?}", hkey),
    }
}
