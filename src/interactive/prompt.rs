//
//  sonarqube-client
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive Prompts Module
//!
//! Thin wrappers over `dialoguer` for the few questions `sq` asks: a server
//! URL, a username, a secret, and the occasional confirmation.
//!
//! All prompts fail with an error instead of blocking when stdin is not a
//! terminal, so scripts should pass values through flags or environment
//! variables.
//!
//! # Example
//!
//! ```no_run
//! use sonarqube_client::interactive::{prompt_input_with_default, prompt_password};
//!
//! let url = prompt_input_with_default("SonarQube URL:", "http://localhost:9000").unwrap();
//! let token = prompt_password("Token:").unwrap();
//! ```

use anyhow::{bail, Result};
use console::Term;
use dialoguer::{Confirm, Input, Password};

fn ensure_terminal() -> Result<()> {
    if !Term::stdout().is_term() {
        bail!("Cannot prompt for input: not running in a terminal");
    }
    Ok(())
}

/// Prompts the user for non-empty text input.
pub fn prompt_input(message: &str) -> Result<String> {
    ensure_terminal()?;
    let input: String = Input::new().with_prompt(message).interact_text()?;
    Ok(input)
}

/// Prompts the user for text input, pre-filled with `default`.
pub fn prompt_input_with_default(message: &str, default: &str) -> Result<String> {
    ensure_terminal()?;
    let input: String = Input::new()
        .with_prompt(message)
        .default(default.to_string())
        .interact_text()?;
    Ok(input)
}

/// Prompts the user for a secret.
///
/// Characters are not echoed. Empty input is rejected by re-prompting.
pub fn prompt_password(message: &str) -> Result<String> {
    ensure_terminal()?;
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

/// Asks a yes/no question, returning `default` when the user presses Enter.
pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    ensure_terminal()?;
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}
