//! 降级模式定义
//!
//! 每个模式固定一个更新包地址（Wayback 快照）和一组启动参数

use crate::modules::common::error::DebloatError;
use crate::modules::common::platform::Platform;
use crate::modules::common::settings::Settings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 2025 年 7 月的客户端更新服务器快照
pub const SNAPSHOT_2025_JULY: &str =
    "http://web.archive.org/web/20250722201439if_/media.steampowered.com/client";

/// 2022 年 12 月的客户端更新服务器快照
pub const SNAPSHOT_2022_DEC: &str =
    "http://web.archive.org/web/20221222113839if_/media.steampowered.com/client";

/// 降级命令的固定参数，`-overridepackageurl` 之后紧跟地址
pub const UPDATE_ARGS_PREFIX: &[&str] = &[
    "-forcesteamupdate",
    "-forcepackagedownload",
    "-overridepackageurl",
];
pub const UPDATE_ARGS_SUFFIX: &[&str] = &["-exitsteam"];

/// 仅在 Windows 客户端上有意义的参数
const WINDOWS_ONLY_ARGS: &[&str] = &[
    "-no-dwrite",
    "-disable-winh264",
    "-cef-disable-d3d11",
];

const NORMAL_ARGS: &[&str] = &[
    "-no-dwrite",
    "-no-cef-sandbox",
    "-nooverlay",
    "-nobigpicture",
    "-nofriendsui",
    "-noshaders",
    "-novid",
    "-noverifyfiles",
    "-nointro",
    "-skipstreamingdrivers",
    "-norepairfiles",
    "-nohltv",
    "-nofasthtml",
    "-nocrashmonitor",
    "-no-shared-textures",
    "-disablehighdpi",
    "-cef-single-process",
    "-cef-in-process-gpu",
    "-single_core",
    "-cef-disable-d3d11",
    "-cef-disable-sandbox",
    "-disable-winh264",
    "-vrdisable",
    "-cef-disable-breakpad",
    "-cef-disable-gpu",
    "-cef-disable-hang-timeouts",
    "-cef-disable-seccomp-sandbox",
    "-cef-disable-gpu-compositing",
    "-cef-disable-extensions",
    "-cef-disable-remote-fonts",
    "-cef-enable-media-stream",
    "-cef-disable-accelerated-video-decode",
    "steam://open/library",
];

const LITE_ARGS: &[&str] = &[
    "-silent",
    "-cef-disable-gpu",
    "-cef-disable-gpu-compositing",
    "-cef-disable-d3d11",
    "-cef-single-process",
    "-cef-in-process-gpu",
    "-vrdisable",
    "-no-dwrite",
    "-nocrashmonitor",
    "-nointro",
    "-skipstreamingdrivers",
    "-nobigpicture",
    "-nofriendsui",
    "-noshaders",
    "-novid",
    "-noverifyfiles",
    "-norepairfiles",
    "-nohltv",
    "-nofasthtml",
    "-no-shared-textures",
    "-disablehighdpi",
    "-disable-winh264",
    "-cef-disable-breakpad",
    "-cef-disable-hang-timeouts",
    "-cef-disable-seccomp-sandbox",
    "-cef-disable-extensions",
    "-cef-disable-remote-fonts",
    "-cef-enable-media-stream",
    "-cef-disable-accelerated-video-decode",
    "steam://open/library",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SteamMode {
    Normal2025July,
    Lite2025July,
    Normal2022Dec,
    Lite2022Dec,
}

impl SteamMode {
    pub const ALL: [SteamMode; 4] = [
        SteamMode::Normal2025July,
        SteamMode::Lite2025July,
        SteamMode::Normal2022Dec,
        SteamMode::Lite2022Dec,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SteamMode::Normal2025July => "normal2025july",
            SteamMode::Lite2025July => "lite2025july",
            SteamMode::Normal2022Dec => "normal2022dec",
            SteamMode::Lite2022Dec => "lite2022dec",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SteamMode::Normal2025July => "2025 年 7 月客户端，常规精简参数",
            SteamMode::Lite2025July => "2025 年 7 月客户端，静默启动的轻量参数",
            SteamMode::Normal2022Dec => "2022 年 12 月客户端（旧版界面），常规精简参数",
            SteamMode::Lite2022Dec => "2022 年 12 月客户端（旧版界面），静默启动的轻量参数",
        }
    }

    pub fn is_lite(&self) -> bool {
        matches!(self, SteamMode::Lite2025July | SteamMode::Lite2022Dec)
    }

    /// 内置的更新包地址
    pub fn default_package_url(&self) -> &'static str {
        match self {
            SteamMode::Normal2025July | SteamMode::Lite2025July => SNAPSHOT_2025_JULY,
            SteamMode::Normal2022Dec | SteamMode::Lite2022Dec => SNAPSHOT_2022_DEC,
        }
    }

    /// 更新包地址，设置中的覆盖优先
    pub fn package_url(&self, settings: &Settings) -> String {
        settings
            .package_urls
            .get(self.id())
            .cloned()
            .unwrap_or_else(|| self.default_package_url().to_string())
    }

    /// 写入启动脚本的参数
    pub fn launch_args(&self, platform: Platform) -> Vec<&'static str> {
        let args = if self.is_lite() { LITE_ARGS } else { NORMAL_ARGS };
        args.iter()
            .copied()
            .filter(|arg| platform == Platform::Windows || !WINDOWS_ONLY_ARGS.contains(arg))
            .collect()
    }
}

/// 强制下载指定更新包后退出的参数
pub fn update_args(package_url: &str) -> Vec<String> {
    UPDATE_ARGS_PREFIX
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(package_url.to_string()))
        .chain(UPDATE_ARGS_SUFFIX.iter().map(|s| s.to_string()))
        .collect()
}

/// 恢复到官方最新客户端：`-overridepackageurl` 不带地址
pub fn reset_args() -> Vec<String> {
    UPDATE_ARGS_PREFIX
        .iter()
        .chain(UPDATE_ARGS_SUFFIX.iter())
        .map(|s| s.to_string())
        .collect()
}

impl fmt::Display for SteamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SteamMode {
    type Err = DebloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], "");
        SteamMode::ALL
            .into_iter()
            .find(|mode| mode.id() == normalized)
            .ok_or_else(|| {
                DebloatError::Config(format!(
                    "未知模式: {} (可选: {})",
                    s,
                    SteamMode::ALL
                        .iter()
                        .map(|m| m.id())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_loosely() {
        assert_eq!("normal2022dec".parse::<SteamMode>().unwrap(), SteamMode::Normal2022Dec);
        assert_eq!("Lite-2025-July".parse::<SteamMode>().unwrap(), SteamMode::Lite2025July);
        assert!("normal2019".parse::<SteamMode>().is_err());
    }

    #[test]
    fn update_args_place_url_after_override_flag() {
        let args = update_args(SNAPSHOT_2022_DEC);
        assert_eq!(
            args,
            vec![
                "-forcesteamupdate",
                "-forcepackagedownload",
                "-overridepackageurl",
                SNAPSHOT_2022_DEC,
                "-exitsteam",
            ]
        );
        assert_eq!(
            reset_args(),
            vec![
                "-forcesteamupdate",
                "-forcepackagedownload",
                "-overridepackageurl",
                "-exitsteam",
            ]
        );
    }

    #[test]
    fn linux_args_drop_windows_only_flags() {
        let windows = SteamMode::Normal2025July.launch_args(Platform::Windows);
        let linux = SteamMode::Normal2025July.launch_args(Platform::Linux);

        assert!(windows.contains(&"-no-dwrite"));
        assert!(!linux.contains(&"-no-dwrite"));
        assert!(!linux.contains(&"-disable-winh264"));
        assert_eq!(linux.last(), Some(&"steam://open/library"));
    }

    #[test]
    fn lite_modes_start_silently() {
        assert!(SteamMode::Lite2022Dec.launch_args(Platform::Windows).contains(&"-silent"));
        assert!(!SteamMode::Normal2022Dec.launch_args(Platform::Windows).contains(&"-silent"));
    }

    #[test]
    fn settings_override_package_url() {
        let mut settings = Settings::default();
        assert_eq!(SteamMode::Lite2025July.package_url(&settings), SNAPSHOT_2025_JULY);

        settings
            .package_urls
            .insert("lite2025july".to_string(), "https://mirror.invalid/client".to_string());
        assert_eq!(
            SteamMode::Lite2025July.package_url(&settings),
            "https://mirror.invalid/client"
        );
        assert_eq!(SteamMode::Normal2025July.package_url(&settings), SNAPSHOT_2025_JULY);
    }
}
