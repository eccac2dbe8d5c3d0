use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::modules::startup::{self, models::ClearOutcome, models::RestoreOutcome};

#[derive(Parser, Debug)]
pub struct StartupCommand {
    #[command(subcommand)]
    pub action: StartupAction,
}

#[derive(Subcommand, Debug)]
pub enum StartupAction {
    /// 显示当前启动项与备份
    Show,

    /// 删除 Steam 启动项
    Remove {
        /// 删除前不备份
        #[arg(long)]
        no_backup: bool,
    },

    /// 从备份恢复 Steam 启动项
    Restore,
}

pub async fn execute(cmd: StartupCommand) -> Result<()> {
    let mut store = startup::open_run_key()?;

    match cmd.action {
        StartupAction::Show => {
            let entry = startup::read(store.as_ref())?;
            match &entry.command {
                Some(command) => {
                    println!("  {} = {}", entry.value_name, command);
                    match &entry.executable {
                        Some(exe) => println!("  指向: {}", exe),
                        None => println!("  警告: 该启动项不指向 steam.exe"),
                    }
                }
                None => println!("  未设置 Steam 启动项"),
            }
            if let Some(backup) = &entry.backup {
                println!("  备份 {} = {}", startup::BACKUP_VALUE, backup);
            }
        }
        StartupAction::Remove { no_backup } => match startup::clear(store.as_mut(), !no_backup)? {
            ClearOutcome::Cleared { backed_up } => {
                println!("  已删除 Steam 启动项");
                if backed_up {
                    println!("  原值已备份到 {}", startup::BACKUP_VALUE);
                }
            }
            ClearOutcome::NotPresent => println!("  未设置 Steam 启动项"),
        },
        StartupAction::Restore => match startup::restore(store.as_mut())? {
            RestoreOutcome::Restored => println!("  已恢复 Steam 启动项"),
            RestoreOutcome::NoBackup => println!("  没有可恢复的备份"),
        },
    }

    Ok(())
}
