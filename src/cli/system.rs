//
//  sonarqube-client
//  cli/system.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! System status and health commands
//!
//! `sq system health` needs an administrator token or the system passcode.
//! It exits non-zero when the server is not `GREEN`, so it can be used as a
//! readiness probe.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::api::resources::SystemHealth;

use super::{connect, print_json, GlobalOptions};

/// System status and health
#[derive(Args, Debug)]
pub struct SystemCommand {
    #[command(subcommand)]
    pub command: SystemSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SystemSubcommand {
    /// Show the server status (UP, STARTING, DB_MIGRATION_NEEDED, ...)
    Status,

    /// Show the server health and its causes
    Health,

    /// Check that the server answers
    Ping,
}

impl SystemCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global)?;

        match &self.command {
            SystemSubcommand::Status => {
                let status = client.system().status().await?;
                if global.json {
                    return print_json(&status);
                }
                let state = if status.is_up() {
                    style(status.status.as_str()).green()
                } else {
                    style(status.status.as_str()).yellow()
                };
                println!("Status:  {}", state);
                println!("Version: {}", status.version);
                if let Some(id) = &status.id {
                    println!("ID:      {}", id);
                }
                Ok(())
            }
            SystemSubcommand::Health => {
                let health = client.system().health().await?;
                if global.json {
                    print_json(&health)?;
                } else {
                    print_health(&health);
                }
                if health.health != "GREEN" {
                    bail!("Server health is {}", health.health);
                }
                Ok(())
            }
            SystemSubcommand::Ping => {
                let pong = client.system().ping().await?;
                if global.json {
                    print_json(&serde_json::json!({ "response": pong }))
                } else {
                    println!("{}", pong);
                    Ok(())
                }
            }
        }
    }
}

fn print_health(health: &SystemHealth) {
    let label = match health.health.as_str() {
        "GREEN" => style(health.health.as_str()).green(),
        "YELLOW" => style(health.health.as_str()).yellow(),
        _ => style(health.health.as_str()).red(),
    };
    println!("Health: {}", label);
    for cause in &health.causes {
        println!("  {} {}", style("-").dim(), cause.message);
    }
}
