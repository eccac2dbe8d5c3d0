use anyhow::Result;
use clap::Parser;

use crate::modules::service::history;
use crate::modules::service::models::OperationRecord;

#[derive(Parser, Debug)]
pub struct StatusCommand {
    /// 显示条数
    #[arg(long, default_value = "10")]
    pub limit: usize,

    /// 输出格式 (table/json)
    #[arg(long, default_value = "table")]
    pub format: String,
}

pub async fn execute(cmd: StatusCommand) -> Result<()> {
    let records = history::recent(cmd.limit)?;

    if cmd.format == "json" {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("暂无操作记录");
        return Ok(());
    }

    println!("{:<20} {:<10} {:<16} {:<8} 说明", "时间", "操作", "模式", "结果");
    println!("{}", "-".repeat(80));

    for record in &records {
        let (kind, mode, note) = match record {
            OperationRecord::Optimize(r) => (
                "optimize",
                r.mode.id().to_string(),
                r.error.clone().unwrap_or_else(|| r.files_written.join(", ")),
            ),
            OperationRecord::Uninstall(s) => (
                "uninstall",
                "-".to_string(),
                s.error.clone().unwrap_or_else(|| {
                    format!("删除 {} 个文件", s.removed.iter().filter(|r| r.existed).count())
                }),
            ),
        };

        println!(
            "{:<20} {:<10} {:<16} {:<8} {}",
            record.started_at().format("%Y-%m-%d %H:%M:%S"),
            kind,
            mode,
            record.state().to_string(),
            note
        );
    }

    println!("\n共 {} 条记录", records.len());
    Ok(())
}
