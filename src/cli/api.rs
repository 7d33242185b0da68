//
//  sonarqube-client
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! This command sends an arbitrary request through the same executor the
//! typed commands use, so authentication, timeouts and error classification
//! behave identically. It's useful for endpoints without a dedicated command.
//!
//! ## Examples
//!
//! ```bash
//! # Search projects
//! sq api api/projects/search -F q=backend
//!
//! # Create a project (fields become a form body for non-GET methods)
//! sq api -X POST api/projects/create -F project=demo -F name=Demo
//!
//! # Send a JSON body from a file
//! sq api -X POST api/v2/some/endpoint --input body.json
//!
//! # Show what would be sent, secrets redacted
//! sq api api/system/info --dry-run
//! ```

use std::fs;
use std::io::Write;

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

use crate::api::{ApiResponse, RequestOptions, SonarQubeClient};

use super::{connect, GlobalOptions};

/// Make direct API requests
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// API endpoint relative to the server URL (e.g., api/system/status)
    pub endpoint: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request headers as 'Name: Value' (can be specified multiple times)
    #[arg(long, short = 'H', action = clap::ArgAction::Append)]
    pub header: Vec<String>,

    /// Parameters as key=value: query for GET/DELETE, form body otherwise
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Read a JSON request body from file (- for stdin)
    #[arg(long, short = 'f', conflicts_with = "field")]
    pub input: Option<String>,

    /// Print the request instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress output (only report failures)
    #[arg(long)]
    pub silent: bool,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global)?;
        let method = self.parse_method()?;
        let options = self.build_options(&method)?;

        if self.dry_run {
            return self.print_request(&client, &method, &options);
        }

        let response = client.execute(method, &self.endpoint, options).await?;
        if self.silent {
            return Ok(());
        }

        match response {
            ApiResponse::NoContent => {}
            ApiResponse::Json(json) => {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            ApiResponse::Text(text) => println!("{}", text),
            ApiResponse::Binary(bytes) => {
                std::io::stdout().write_all(&bytes)?;
            }
        }

        Ok(())
    }

    fn parse_method(&self) -> Result<Method> {
        match self.method.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            _ => bail!("Unsupported HTTP method: {}", self.method),
        }
    }

    fn build_options(&self, method: &Method) -> Result<RequestOptions> {
        let mut options = RequestOptions::new();

        let fields = self
            .field
            .iter()
            .map(|field| parse_field(field))
            .collect::<Result<Vec<_>>>()?;

        if *method == Method::GET || *method == Method::DELETE || *method == Method::HEAD {
            for (key, value) in fields {
                options = options.query(key, value);
            }
        } else if !fields.is_empty() {
            options = options.form(fields);
        }

        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
                buffer
            } else {
                fs::read_to_string(input)?
            };
            let value: Value = serde_json::from_str(&content)?;
            options = options.json(&value)?;
        }

        for header in &self.header {
            let Some((name, value)) = header.split_once(':') else {
                bail!("Invalid header format: {}. Expected 'Name: Value'", header);
            };
            options = options.header(name.trim(), value.trim())?;
        }

        Ok(options)
    }

    fn print_request(
        &self,
        client: &SonarQubeClient,
        method: &Method,
        options: &RequestOptions,
    ) -> Result<()> {
        let url = client.endpoint_url(&self.endpoint, &options.query)?;
        println!("{} {}", style(method).bold(), url);
        print_headers(&client.prepared_headers(options)?);
        if let Some(body) = &options.body {
            println!();
            println!("{}", String::from_utf8_lossy(&body.encode()?));
        }
        Ok(())
    }
}

fn print_headers(headers: &HeaderMap) {
    for (name, value) in headers {
        let shown = if value.is_sensitive() {
            "<redacted>"
        } else {
            value.to_str().unwrap_or("<binary>")
        };
        println!("{}: {}", style(name.as_str()).dim(), shown);
    }
}

fn parse_field(field: &str) -> Result<(String, String)> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => bail!("Invalid field format: {}. Expected key=value", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestBody;

    fn command(method: &str, fields: &[&str]) -> ApiCommand {
        ApiCommand {
            endpoint: "api/projects/search".to_string(),
            method: method.to_string(),
            header: vec!["X-Trace: abc".to_string()],
            field: fields.iter().map(|f| f.to_string()).collect(),
            input: None,
            dry_run: false,
            silent: false,
        }
    }

    #[test]
    fn test_fields_become_query_for_get() {
        let cmd = command("get", &["q=backend", "ps=5"]);
        let options = cmd.build_options(&cmd.parse_method().unwrap()).unwrap();
        assert_eq!(
            options.query,
            vec![
                ("q".to_string(), "backend".to_string()),
                ("ps".to_string(), "5".to_string())
            ]
        );
        assert!(options.body.is_none());
        assert_eq!(options.headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn test_fields_become_form_for_post() {
        let cmd = command("POST", &["project=demo", "name=Demo App"]);
        let options = cmd.build_options(&Method::POST).unwrap();
        assert!(options.query.is_empty());
        match options.body {
            Some(RequestBody::Form(pairs)) => assert_eq!(pairs.len(), 2),
            other => panic!("expected form body, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input() {
        assert!(command("TRACE", &[]).parse_method().is_err());
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
        assert_eq!(
            parse_field("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
    }
}
