// src/config/settings.rs
//! Run configuration, resolved once at startup and passed down explicitly.
//!
//! Precedence per key: CLI flag, then environment, then config file, then default.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ledger::DEFAULT_NOTIFICATIONS_FILE;
use crate::listings::source::DEFAULT_LISTINGS_URL;
use crate::notify::TwilioCredentials;

pub const DEFAULT_CINEMA_ID: i64 = 1;
const CONFIG_BASENAME: &str = ".unliminotify";

const ENV_CINEMA_ID: &str = "CINEMA_ID";
const ENV_NOTIFICATIONS_FILE: &str = "NOTIFICATIONS_FILE";
const ENV_SMS_NUMBERS: &str = "SMS_NUMBERS";
const ENV_LISTINGS_URL: &str = "LISTINGS_URL";
const ENV_TWILIO_FROM: &str = "TWILIO_FROM";
const ENV_TWILIO_SID: &str = "TWILIO_SID";
const ENV_TWILIO_TOKEN: &str = "TWILIO_TOKEN";

/// Keys accepted in `~/.unliminotify.toml` / `.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigFile {
    pub cinema_id: Option<i64>,
    pub notifications_file: Option<PathBuf>,
    pub sms_numbers: Option<Vec<String>>,
    pub listings_url: Option<String>,
    pub twilio_from: Option<String>,
    pub twilio_sid: Option<String>,
    pub twilio_token: Option<String>,
}

impl ConfigFile {
    /// TOML or JSON, chosen by extension; unknown extensions try both.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::parse(&content, &ext).with_context(|| format!("parsing config file {}", path.display()))
    }

    fn parse(s: &str, hint_ext: &str) -> Result<Self> {
        match hint_ext {
            "toml" => Ok(toml::from_str(s)?),
            "json" => Ok(serde_json::from_str(s)?),
            _ => toml::from_str::<Self>(s)
                .map_err(anyhow::Error::from)
                .or_else(|_| serde_json::from_str::<Self>(s).map_err(anyhow::Error::from))
                .map_err(|_| anyhow!("unsupported config format (expected TOML or JSON)")),
        }
    }

    /// `$HOME/.unliminotify.toml`, then `.json`; the first that exists.
    pub fn locate_default(home: &Path) -> Option<PathBuf> {
        ["toml", "json"]
            .iter()
            .map(|ext| home.join(format!("{CONFIG_BASENAME}.{ext}")))
            .find(|p| p.is_file())
    }
}

/// Values picked up from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub cinema_id: Option<i64>,
    pub notifications_file: Option<PathBuf>,
    pub sms_numbers: Option<Vec<String>>,
    pub listings_url: Option<String>,
    pub twilio_from: Option<String>,
    pub twilio_sid: Option<String>,
    pub twilio_token: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        let cinema_id = match get(ENV_CINEMA_ID) {
            Some(v) => Some(
                v.trim()
                    .parse::<i64>()
                    .with_context(|| format!("{ENV_CINEMA_ID} must be an integer, got {v:?}"))?,
            ),
            None => None,
        };

        Ok(Self {
            cinema_id,
            notifications_file: get(ENV_NOTIFICATIONS_FILE).map(PathBuf::from),
            sms_numbers: get(ENV_SMS_NUMBERS).map(|v| parse_number_list(&v)),
            listings_url: get(ENV_LISTINGS_URL),
            twilio_from: get(ENV_TWILIO_FROM),
            twilio_sid: get(ENV_TWILIO_SID),
            twilio_token: get(ENV_TWILIO_TOKEN),
        })
    }
}

/// What the command line said explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub cinema_id: Option<i64>,
    pub notifications_file: Option<PathBuf>,
    pub sms_numbers: Vec<String>,
    pub disable_sms: bool,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cinema_id: i64,
    pub notifications_file: PathBuf,
    pub sms_numbers: Vec<String>,
    pub disable_sms: bool,
    pub verbose: bool,
    pub listings_url: String,
    pub twilio: TwilioCredentials,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(Overrides::default(), EnvConfig::default(), ConfigFile::default())
    }
}

impl Settings {
    pub fn resolve(flags: Overrides, env: EnvConfig, file: ConfigFile) -> Self {
        let sms_numbers = if !flags.sms_numbers.is_empty() {
            flags.sms_numbers
        } else {
            env.sms_numbers.or(file.sms_numbers).unwrap_or_default()
        };

        Self {
            cinema_id: flags
                .cinema_id
                .or(env.cinema_id)
                .or(file.cinema_id)
                .unwrap_or(DEFAULT_CINEMA_ID),
            notifications_file: flags
                .notifications_file
                .or(env.notifications_file)
                .or(file.notifications_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTIFICATIONS_FILE)),
            sms_numbers: clean_numbers(sms_numbers),
            disable_sms: flags.disable_sms,
            verbose: flags.verbose,
            listings_url: env
                .listings_url
                .or(file.listings_url)
                .unwrap_or_else(|| DEFAULT_LISTINGS_URL.to_string()),
            twilio: TwilioCredentials {
                from: env.twilio_from.or(file.twilio_from).unwrap_or_default(),
                account_sid: env.twilio_sid.or(file.twilio_sid).unwrap_or_default(),
                auth_token: env.twilio_token.or(file.twilio_token).unwrap_or_default(),
            },
        }
    }

    /// Whether the transport will actually be called.
    pub fn sends_sms(&self) -> bool {
        !self.sms_numbers.is_empty() && !self.disable_sms
    }
}

/// Build settings from flags, the environment and the config file.
/// Returns the config file that was used, if any.
pub fn load_settings(
    flags: Overrides,
    explicit_config: Option<&Path>,
) -> Result<(Settings, Option<PathBuf>)> {
    let path = match explicit_config {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .and_then(|home| ConfigFile::locate_default(&home)),
    };

    let file = match &path {
        Some(p) => ConfigFile::load_from(p)?,
        None => ConfigFile::default(),
    };
    let env = EnvConfig::from_env()?;

    let settings = Settings::resolve(flags, env, file);
    tracing::debug!(
        cinema_id = settings.cinema_id,
        notifications_file = %settings.notifications_file.display(),
        recipients = settings.sms_numbers.len(),
        disable_sms = settings.disable_sms,
        "settings resolved"
    );
    Ok((settings, path))
}

/// Split a comma- or whitespace-separated list of phone numbers.
pub fn parse_number_list(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_numbers(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| m.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let s = Settings::default();
        assert_eq!(s.cinema_id, 1);
        assert_eq!(
            s.notifications_file,
            PathBuf::from("/var/db/unliminotify/notifications")
        );
        assert!(s.sms_numbers.is_empty());
        assert!(!s.sends_sms());
        assert_eq!(s.listings_url, DEFAULT_LISTINGS_URL);
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = ConfigFile {
            cinema_id: Some(3),
            notifications_file: Some("/from/file".into()),
            sms_numbers: Some(vec!["+44file".into()]),
            ..Default::default()
        };
        let env = EnvConfig::from_lookup(lookup(&[("CINEMA_ID", "2"), ("SMS_NUMBERS", "+44a, +44b")]))
            .unwrap();
        let flags = Overrides {
            cinema_id: Some(9),
            ..Default::default()
        };

        let s = Settings::resolve(flags, env, file);
        assert_eq!(s.cinema_id, 9);
        assert_eq!(s.sms_numbers, vec!["+44a".to_string(), "+44b".to_string()]);
        assert_eq!(s.notifications_file, PathBuf::from("/from/file"));
    }

    #[test]
    fn bad_cinema_id_in_env_is_an_error() {
        let err = EnvConfig::from_lookup(lookup(&[("CINEMA_ID", "one")])).unwrap_err();
        assert!(err.to_string().contains("CINEMA_ID"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let env = EnvConfig::from_lookup(lookup(&[("TWILIO_SID", "  "), ("CINEMA_ID", "")])).unwrap();
        assert_eq!(env, EnvConfig::default());
    }

    #[test]
    fn config_formats_parse() {
        let t = ConfigFile::parse(
            r#"
cinema_id = 42
sms_numbers = ["+441", "+442"]
twilio_sid = "AC1"
"#,
            "toml",
        )
        .unwrap();
        assert_eq!(t.cinema_id, Some(42));
        assert_eq!(t.sms_numbers.as_deref().map(|v| v.len()), Some(2));

        let j = ConfigFile::parse(r#"{"notifications_file": "/tmp/n", "twilio_from": "+440"}"#, "json")
            .unwrap();
        assert_eq!(j.notifications_file, Some(PathBuf::from("/tmp/n")));

        let guessed = ConfigFile::parse(r#"{"cinema_id": 5}"#, "").unwrap();
        assert_eq!(guessed.cinema_id, Some(5));
    }

    #[test]
    fn suppressed_sending_never_sends() {
        let flags = Overrides {
            sms_numbers: vec!["+441".into()],
            ..Default::default()
        };
        let s = Settings::resolve(flags.clone(), EnvConfig::default(), ConfigFile::default());
        assert!(s.sends_sms());

        let suppressed = Settings::resolve(
            Overrides {
                disable_sms: true,
                ..flags
            },
            EnvConfig::default(),
            ConfigFile::default(),
        );
        assert!(!suppressed.sends_sms());
    }

    #[test]
    fn number_list_splits_on_commas_and_spaces() {
        assert_eq!(
            parse_number_list("+441,+442 +443,, "),
            vec!["+441".to_string(), "+442".to_string(), "+443".to_string()]
        );
    }
}
