use serde::Deserialize;
use serde_with::serde_as;
use serde_with::DurationSeconds;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::profile::edit::DEFAULT_MIN_BAND_WIDTH;
use crate::profile::records::TemperatureBand;

#[derive(Deserialize, Clone)]
pub struct Config {
    api: ApiConfig,
    #[serde(default)]
    auth: AuthConfig,
    #[serde(default)]
    editor: EditorConfig,
}

impl Config {
    pub fn new(api: ApiConfig, auth: AuthConfig, editor: EditorConfig) -> Self {
        Self { api, auth, editor }
    }

    pub fn get_api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn get_auth(&self) -> &AuthConfig {
        &self.auth
    }

    pub fn get_editor(&self) -> &EditorConfig {
        &self.editor
    }
}

#[serde_as]
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ApiConfig {
    /// Lists every profile of the signed in user.
    profiles_url: String,
    save_profile_url: String,
    delete_profile_url: String,
    /// Receives the whole priority order after a profile is moved.
    priority_url: String,
    status_url: String,
    boost_url: String,
    #[serde_as(as = "DurationSeconds")]
    #[serde(default = "default_timeout")]
    timeout_secs: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl ApiConfig {
    pub fn get_profiles_url(&self) -> &str {
        &self.profiles_url
    }

    pub fn get_save_profile_url(&self) -> &str {
        &self.save_profile_url
    }

    pub fn get_delete_profile_url(&self) -> &str {
        &self.delete_profile_url
    }

    pub fn get_priority_url(&self) -> &str {
        &self.priority_url
    }

    pub fn get_status_url(&self) -> &str {
        &self.status_url
    }

    pub fn get_boost_url(&self) -> &str {
        &self.boost_url
    }

    pub fn get_timeout(&self) -> &Duration {
        &self.timeout_secs
    }
}

#[derive(Deserialize, Clone, Default, Debug, PartialEq)]
pub struct AuthConfig {
    /// File whose first line is the bearer token issued at sign in.
    /// Without one, requests are sent unauthenticated.
    token_file: Option<PathBuf>,
}

impl AuthConfig {
    pub fn get_token_file(&self) -> Option<&PathBuf> {
        self.token_file.as_ref()
    }

    pub fn read_token(&self) -> Result<Option<String>, String> {
        let Some(file) = &self.token_file else {
            return Ok(None);
        };
        let s = fs::read_to_string(file)
            .map_err(|err| format!("Failed to read token file {:?}: {}", file, err))?;
        Ok(s.lines().next().map(str::trim).filter(|token| !token.is_empty()).map(str::to_owned))
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Smallest allowed gap between the low and high temperature of a period.
    min_band_width: f32,
    /// Band every slot of a new profile starts with.
    new_profile_band: TemperatureBand,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_band_width: DEFAULT_MIN_BAND_WIDTH,
            new_profile_band: TemperatureBand::new(18.0, 21.0),
        }
    }
}

impl EditorConfig {
    pub fn get_min_band_width(&self) -> f32 {
        self.min_band_width
    }

    pub fn get_new_profile_band(&self) -> &TemperatureBand {
        &self.new_profile_band
    }
}
