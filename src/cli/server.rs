//
//  sonarqube-client
//  cli/server.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server information commands

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{connect, print_json, GlobalOptions};

/// Server information
#[derive(Args, Debug)]
pub struct ServerCommand {
    #[command(subcommand)]
    pub command: ServerSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ServerSubcommand {
    /// Print the server version
    Version,
}

impl ServerCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ServerSubcommand::Version => {
                let client = connect(global)?;
                let version = client.server().version().await?;
                if global.json {
                    print_json(&serde_json::json!({ "version": version }))?;
                } else {
                    println!("{}", version);
                }
                Ok(())
            }
        }
    }
}
