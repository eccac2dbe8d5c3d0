use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::modules::process::system::SystemProcesses;
use crate::modules::service::{self, models::SystemInfo};

#[derive(Parser, Debug)]
pub struct DetectCommand {
    /// 手动指定 Steam 目录
    #[arg(long, env = "STEAM_DEBLOAT_STEAM_DIR")]
    pub steam_dir: Option<PathBuf>,

    /// 输出格式 (table/json)
    #[arg(long, default_value = "table")]
    pub format: String,
}

pub async fn execute(cmd: DetectCommand) -> Result<()> {
    let ctx = super::build_context(cmd.steam_dir)?;
    let run_key = super::optional_run_key();
    let mut processes = SystemProcesses::new();

    let info = service::system_info(&ctx, &mut processes, run_key.as_deref());

    match cmd.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&info)?),
        _ => print_table(&info),
    }

    Ok(())
}

fn print_table(info: &SystemInfo) {
    println!("=== 系统信息 ===\n");
    println!(
        "  平台:        {} {}",
        info.platform,
        info.os_version.as_deref().unwrap_or("")
    );

    match &info.steam {
        Some(steam) => {
            println!("  Steam 目录:  {}", steam.dir.display());
            println!("  来源:        {}", steam.source);
        }
        None => println!("  Steam 目录:  未找到"),
    }

    if info.steam_running() {
        let names: Vec<String> = info
            .running_processes
            .iter()
            .map(|p| format!("{}({})", p.name, p.pid))
            .collect();
        println!("  运行中:      是 [{}]", names.join(", "));
    } else {
        println!("  运行中:      否");
    }

    println!(
        "  steam.cfg:   {}",
        if info.steam_cfg_applied { "已写入" } else { "无" }
    );

    match (&info.launcher_path, info.launcher_mode) {
        (Some(path), Some(mode)) => println!("  启动脚本:    {} ({})", path, mode),
        (Some(path), None) => println!("  启动脚本:    {}", path),
        _ => println!("  启动脚本:    无"),
    }

    if let Some(startup) = &info.startup {
        match &startup.command {
            Some(command) => println!(
                "  开机启动:    {}{}",
                command,
                if startup.valid { "" } else { " (不指向 steam.exe)" }
            ),
            None => println!("  开机启动:    无"),
        }
        if let Some(backup) = &startup.backup {
            println!("  启动项备份:  {}", backup);
        }
    }

    for warning in &info.warnings {
        println!("\n  警告: {}", warning);
    }
}
