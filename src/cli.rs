//! Command-line arguments and interactive prompts.
//!
//! Every value the run needs can come from a flag; whatever is missing is
//! asked for interactively, with defaults taken from the local checkout.

use std::path::Path;

use clap::{Parser, ValueEnum};
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::model::Provider;
use crate::service::remote::{self, RemoteInfo};
use crate::service::{CommitClient, CredentialStore, HttpTransport, VelocityFormat};

/// Commit velocity for GitHub and BitBucket repositories
#[derive(Parser, Debug, Default)]
#[command(name = "git-velocity", version, about, long_about = None)]
pub struct Args {
    /// Hosting provider: github or bitbucket
    #[arg(long)]
    pub provider: Option<String>,

    /// Slugged repository name
    #[arg(short, long)]
    pub repository: Option<String>,

    /// Repository owner (user or organisation)
    #[arg(short, long)]
    pub owner: Option<String>,

    /// Velocity period: week, month or year
    #[arg(short, long)]
    pub format: Option<String>,

    /// How to present the result
    #[arg(long, value_enum, default_value_t = OutputMode::Plain)]
    pub output: OutputMode,

    /// Fail instead of prompting for missing values
    #[arg(long)]
    pub no_prompt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Coloured console report
    #[default]
    Plain,
    /// Full-screen terminal dashboard
    Dashboard,
}

/// Everything a run needs, after flags and prompts are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub provider: Provider,
    pub repository: String,
    pub owner: String,
    pub format: VelocityFormat,
}

/// Values offered as prompt defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub provider: Option<Provider>,
    pub repository: Option<String>,
    pub owner: Option<String>,
}

impl Defaults {
    /// Defaults for a run started in `dir`: the `origin` remote when there is
    /// one, otherwise just the directory name as the repository.
    pub fn from_dir(dir: &Path) -> Self {
        let dir_name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        match remote::detect(dir) {
            Some(RemoteInfo {
                provider,
                owner,
                repository,
            }) => Self {
                provider,
                repository: Some(repository),
                owner: Some(owner),
            },
            None => Self {
                provider: None,
                repository: dir_name,
                owner: None,
            },
        }
    }
}

/// Source of interactive answers
pub trait Prompter {
    /// Pick one of `items`; returns its index
    fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> AppResult<usize>;

    fn input(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validate: fn(&str) -> Result<(), String>,
    ) -> AppResult<String>;

    fn password(&mut self, prompt: &str) -> AppResult<String>;
}

/// Prompts on the controlling terminal
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> AppResult<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn input(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validate: fn(&str) -> Result<(), String>,
    ) -> AppResult<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input
            .validate_with(|value: &String| validate(value))
            .interact_text()?)
    }

    fn password(&mut self, prompt: &str) -> AppResult<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact()?)
    }
}

/// Characters that would end or split a URL path segment
const RESERVED: &[char] = &['/', '?', '#', '%'];

/// A single URL path segment: non-empty, no whitespace and no `/ ? # %`
pub fn validate_slug(value: &str) -> Result<(), String> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err("Please enter a valid slug.".to_string());
    }
    if let Some(c) = value.chars().find(|c| RESERVED.contains(c)) {
        return Err(format!("Please enter a valid slug ('{}' is not allowed).", c));
    }
    Ok(())
}

pub fn validate_present(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Please enter a value.".to_string());
    }
    Ok(())
}

/// Merge flags, defaults and (unless `no_prompt` is set) interactive answers.
pub fn resolve_inputs(
    args: &Args,
    defaults: &Defaults,
    prompter: &mut dyn Prompter,
) -> AppResult<Inputs> {
    let provider = match &args.provider {
        Some(name) => name.parse::<Provider>()?,
        None if args.no_prompt => defaults.provider.ok_or_else(|| missing("--provider"))?,
        None => {
            let names: Vec<&str> = Provider::ALL.iter().map(|p| p.display_name()).collect();
            let default = defaults
                .provider
                .and_then(|d| Provider::ALL.iter().position(|p| *p == d))
                .unwrap_or(0);
            Provider::ALL[prompter.select("Select repository type", &names, default)?]
        }
    };

    let repository = resolve_text(
        args.repository.as_deref(),
        defaults.repository.as_deref(),
        args.no_prompt,
        "--repository",
        "Enter the slugged name of the repository",
        validate_slug,
        prompter,
    )?;

    let owner = resolve_text(
        args.owner.as_deref(),
        defaults.owner.as_deref(),
        args.no_prompt,
        "--owner",
        "Enter the owner of the repository",
        validate_slug,
        prompter,
    )?;

    let format = match &args.format {
        Some(format) => format.parse::<VelocityFormat>()?,
        None if args.no_prompt => VelocityFormat::default(),
        None => {
            let names: Vec<&str> = VelocityFormat::ALL.iter().map(|f| f.adjective()).collect();
            VelocityFormat::ALL[prompter.select("Velocity calculation format", &names, 0)?]
        }
    };

    let inputs = Inputs {
        provider,
        repository,
        owner,
        format,
    };
    debug!(?inputs, "Resolved inputs");
    Ok(inputs)
}

fn resolve_text(
    flag: Option<&str>,
    default: Option<&str>,
    no_prompt: bool,
    flag_name: &str,
    prompt: &str,
    validate: fn(&str) -> Result<(), String>,
    prompter: &mut dyn Prompter,
) -> AppResult<String> {
    if let Some(value) = flag {
        validate(value).map_err(|e| AppError::Configuration(format!("{}: {}", flag_name, e)))?;
        return Ok(value.to_string());
    }

    if no_prompt {
        let value = default.ok_or_else(|| missing(flag_name))?;
        validate(value).map_err(|e| AppError::Configuration(format!("{}: {}", flag_name, e)))?;
        return Ok(value.to_string());
    }

    prompter.input(prompt, default, validate)
}

fn missing(flag: &str) -> AppError {
    AppError::Configuration(format!("{} is required when prompting is disabled", flag))
}

/// Ask for and store credentials when the provider has none yet.
///
/// Returns `true` when new credentials were stored.
pub fn ensure_credentials<H, S>(
    client: &CommitClient<H, S>,
    no_prompt: bool,
    prompter: &mut dyn Prompter,
) -> AppResult<bool>
where
    H: HttpTransport,
    S: CredentialStore,
{
    if client.is_authorized() {
        return Ok(false);
    }

    let provider = client.provider();
    if no_prompt {
        return Err(AppError::Configuration(format!(
            "No stored {} credentials and prompting is disabled",
            provider
        )));
    }

    let username = prompter.input(
        &format!("Enter {} username", provider),
        None,
        validate_present,
    )?;
    let password = prompter.password(&format!("Enter {} password", provider))?;

    client.authorize(&username, &password)?;
    debug!(provider = %provider, "Stored credentials");
    Ok(true)
}
