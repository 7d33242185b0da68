//
//  sonarqube-client
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Reads and writes the `[core]` settings and lists the configured server
//! profiles. Profiles themselves are added by `sq auth login` and removed by
//! `sq auth logout`.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, VALID_CORE_KEYS};

use super::{print_json, GlobalOptions};

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Reset a configuration value to its default
    Unset(UnsetArgs),

    /// List all configuration values and servers
    #[command(visible_alias = "ls")]
    List,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

#[derive(Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key
    pub key: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => get(args, global),
            ConfigSubcommand::Set(args) => set(args),
            ConfigSubcommand::Unset(args) => unset(args),
            ConfigSubcommand::List => list(global),
            ConfigSubcommand::Path => {
                println!("{}", Config::config_path()?.display());
                Ok(())
            }
        }
    }
}

fn get(args: &GetArgs, global: &GlobalOptions) -> Result<()> {
    if !VALID_CORE_KEYS.contains(&args.key.as_str()) {
        bail!(
            "Unknown configuration key '{}'. Valid keys: {}",
            args.key,
            VALID_CORE_KEYS.join(", ")
        );
    }

    let value = Config::load()?.get(&args.key);
    if global.json {
        return print_json(&serde_json::json!({ "key": args.key, "value": value }));
    }
    if let Some(value) = value {
        println!("{}", value);
    }
    Ok(())
}

fn set(args: &SetArgs) -> Result<()> {
    let mut config = Config::load()?;
    if args.key == "default_server" && !config.servers.contains_key(&args.value) {
        bail!(
            "Unknown server '{}'. Configured servers: {}",
            args.value,
            server_names(&config).join(", ")
        );
    }
    config.set(&args.key, args.value.clone())?;
    config.save()?;
    println!("{} Set {} to {}", style("✓").green(), args.key, args.value);
    Ok(())
}

fn unset(args: &UnsetArgs) -> Result<()> {
    let mut config = Config::load()?;
    config.unset(&args.key)?;
    config.save()?;
    println!("{} Unset {}", style("✓").green(), args.key);
    Ok(())
}

fn list(global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;

    if global.json {
        return print_json(&config);
    }

    println!("{}", style("core").bold());
    for key in VALID_CORE_KEYS {
        println!(
            "  {} = {}",
            key,
            config.get(key).unwrap_or_else(|| "(not set)".to_string())
        );
    }

    if config.servers.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", style("servers").bold());
    for name in server_names(&config) {
        let server = &config.servers[&name];
        println!("  {}", name);
        println!("    url = {}", server.url);
        println!("    auth = {}", server.auth);
        if let Some(ref username) = server.username {
            println!("    username = {}", username);
        }
    }
    Ok(())
}

fn server_names(config: &Config) -> Vec<String> {
    let mut names: Vec<String> = config.servers.keys().cloned().collect();
    names.sort();
    names
}
