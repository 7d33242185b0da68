//
//  sonarqube-client
//  cli/audit_logs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Audit log commands
//!
//! ```bash
//! # Everything recorded in January
//! sq audit-logs download --from 2026-01-01 --to 2026-01-31
//!
//! # The last day, saved to a file
//! sq audit-logs download --from 2026-01-11T12:00:00Z --output audit.json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand};
use console::style;

use super::{connect, print_json, GlobalOptions};

/// Download audit logs (Enterprise edition)
#[derive(Args, Debug)]
pub struct AuditLogsCommand {
    #[command(subcommand)]
    pub command: AuditLogsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuditLogsSubcommand {
    /// Download audit entries for a time range
    Download(DownloadArgs),
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Start of the range (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub from: String,

    /// End of the range (YYYY-MM-DD or RFC 3339, defaults to now)
    #[arg(long)]
    pub to: Option<String>,

    /// Write the entries to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl AuditLogsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuditLogsSubcommand::Download(args) => download(args, global).await,
        }
    }
}

async fn download(args: &DownloadArgs, global: &GlobalOptions) -> Result<()> {
    let from = parse_instant(&args.from, false)?;
    let to = match &args.to {
        Some(to) => parse_instant(to, true)?,
        None => Utc::now(),
    };

    let client = connect(global)?;
    let logs = client.audit_logs().download(from, to).await?;

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&logs)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!(
            "{} Wrote {} entries to {}",
            style("✓").green(),
            logs.audit_logs.len(),
            path.display()
        );
        return Ok(());
    }

    if global.json {
        return print_json(&logs);
    }

    if logs.audit_logs.is_empty() {
        println!("No audit entries between {} and {}", from, to);
        return Ok(());
    }
    for entry in &logs.audit_logs {
        println!(
            "{}  {:<12} {:<10} {}",
            entry.record_created_at.as_deref().unwrap_or("-"),
            entry.category,
            entry.action,
            entry.user_login.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Parses an RFC 3339 instant or a bare date.
///
/// A bare date means the start of that day, or its end when `end_of_day`.
fn parse_instant(value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        bail!("Invalid date '{}'. Use YYYY-MM-DD or RFC 3339", value);
    };
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    };
    let time = time.context("invalid time of day")?;
    Ok(date.and_time(time).and_utc())
}
