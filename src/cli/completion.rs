//
//  sonarqube-client
//  cli/completion.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shell completion commands
//!
//! ```bash
//! sq completion bash > /etc/bash_completion.d/sq
//! sq completion zsh > "${fpath[1]}/_sq"
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use super::{Cli, GlobalOptions};

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionCommand {
    /// Target shell (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionCommand {
    pub async fn run(&self, _global: &GlobalOptions) -> Result<()> {
        let mut cmd = Cli::command();
        generate(self.shell, &mut cmd, crate::APP_NAME, &mut std::io::stdout());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parses_shell() {
        let cli = Cli::try_parse_from(["sq", "completion", "zsh"]).unwrap();
        match cli.command {
            super::super::Commands::Completion(cmd) => assert_eq!(cmd.shell, Shell::Zsh),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["sq", "completion", "tcsh"]).is_err());
    }
}
