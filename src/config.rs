//! Configuration for Telegram API credentials and scrape input
//!
//! Loads configuration from tgs_config.toml, falling back to interactive
//! prompts when the file does not exist.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::prompt;

/// Default config file path
pub const CONFIG_FILE: &str = "tgs_config.toml";

/// Telegram API credentials, immutable once constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: String,
    pub phone: String,
    pub username: String,
}

impl Credentials {
    /// Resolve `${VAR}` placeholders in the string fields and check that
    /// every field is actually filled in.
    fn resolve_and_validate(mut self) -> Result<Self> {
        self.api_hash = resolve_placeholder(self.api_hash);
        self.phone = resolve_placeholder(self.phone);
        self.username = resolve_placeholder(self.username);

        if self.api_id == 0 {
            return Err(Error::InvalidCredentials("api_id must be set".into()));
        }
        for (field, value) in [
            ("api_hash", &self.api_hash),
            ("phone", &self.phone),
            ("username", &self.username),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidCredentials(format!("{} is empty", field)));
            }
        }

        Ok(self)
    }
}

/// What to scrape: either channel references or group references.
///
/// Groups are recognized by the shape check but cannot be fetched;
/// [`InputSpec::channels`] rejects them with an explicit error.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSpec {
    Channels(Vec<String>),
    Groups(Vec<String>),
}

impl InputSpec {
    /// Channel references to fetch, in configuration order.
    pub fn channels(&self) -> Result<&[String]> {
        match self {
            InputSpec::Channels(links) => Ok(links),
            InputSpec::Groups(links) => Err(Error::GroupsUnsupported(links.join(", "))),
        }
    }
}

/// TOML config structures
#[derive(Debug, Deserialize)]
struct TomlConfig {
    telegram: Credentials,
    input: Option<InputTable>,
}

#[derive(Debug, Deserialize)]
struct InputTable {
    channels: Option<Vec<String>>,
    groups: Option<Vec<String>>,
}

/// Resolved configuration, constructed once by the entry point and passed
/// by parameter into every component that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: Credentials,
    pub input: InputSpec,
}

impl Config {
    /// Read the config file at `path`. A missing file falls back to the
    /// interactive prompt sequence; any other read or parse failure is
    /// fatal. There is no merging of file and interactive input.
    pub fn resolve<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_dotenv();

        match fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::interactive(),
            Err(e) => Err(Error::ConfigRead(e)),
        }
    }

    /// Parse a TOML config document.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: TomlConfig = toml::from_str(content)?;
        let input = raw.input.ok_or(Error::NoInput)?;

        let input = match (input.channels, input.groups) {
            (Some(channels), _) if !channels.is_empty() => InputSpec::Channels(channels),
            (_, Some(groups)) if !groups.is_empty() => InputSpec::Groups(groups),
            _ => return Err(Error::NoChannels),
        };

        Ok(Self {
            telegram: raw.telegram.resolve_and_validate()?,
            input,
        })
    }

    /// Collect the minimum fields for a single-channel run from stdin.
    fn interactive() -> Result<Self> {
        println!("Configuration file is not found, enter your telegram API credentials!");

        let api_id = prompt::read_line("api_id: ")?
            .parse::<i32>()
            .map_err(|_| Error::InvalidCredentials("api_id must be an integer".into()))?;

        let telegram = Credentials {
            api_id,
            api_hash: prompt::read_line("api_hash: ")?,
            phone: prompt::read_line("phone: ")?,
            username: prompt::read_line("username: ")?,
        }
        .resolve_and_validate()?;

        let channel = prompt::read_line("Link to the telegram channel to scrape: ")?;

        println!(
            "Configured interactively! To scrape multiple channels and configure \
             other options, use {} (see tgs_config.toml.example)",
            CONFIG_FILE
        );

        Ok(Self {
            telegram,
            input: InputSpec::Channels(vec![channel]),
        })
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }
}

/// Resolve a value of the form `${VAR}` against the environment; any other
/// value passes through unchanged.
fn resolve_placeholder(value: String) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        if let Ok(env_val) = std::env::var(var_name) {
            return env_val;
        }
    }
    value
}
