use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Clarifai's public face-detection model.
pub const FACE_DETECT_MODEL: &str = "a403429f2ddf4b49b307e318f00e528b";

pub const CLARIFAI_BASE_URL: &str = "https://api.clarifai.com/";

pub const DEFAULT_BCRYPT_COST: u32 = 10;

const PARSED_KEYS: &[&str] = &["port", "bcrypt_cost", "clarifai_base_url", "proxy"];

const STRING_KEYS: &[&str] = &["database_url", "loglevel", "api_clarifai", "face_model_id"];

/// Runtime configuration, read once at startup and handed to constructors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub loglevel: String,
    /// Clarifai API key (`API_CLARIFAI`).
    pub api_clarifai: String,
    pub clarifai_base_url: Url,
    pub face_model_id: String,
    pub bcrypt_cost: u32,
    pub proxy: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:smart-brain.sqlite".to_string(),
            port: 3000,
            loglevel: "info".to_string(),
            api_clarifai: String::new(),
            clarifai_base_url: Url::parse(CLARIFAI_BASE_URL)
                .expect("static Clarifai base url is valid"),
            face_model_id: FACE_DETECT_MODEL.to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            proxy: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with plain (unprefixed) environment variables.
    ///
    /// Keys in `STRING_KEYS` are read verbatim; `Env` would otherwise parse an
    /// all-digit value such as an API key into a number.
    pub fn figment() -> Figment {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(PARSED_KEYS));
        STRING_KEYS.iter().fold(figment, |figment, key| {
            match std::env::var(key.to_ascii_uppercase()) {
                Ok(value) => figment.merge(Serialized::default(key, value)),
                Err(_) => figment,
            }
        })
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let cfg = Config::load()?;
            assert_eq!(cfg.port, 3000);
            assert_eq!(cfg.bcrypt_cost, 10);
            assert_eq!(cfg.face_model_id, FACE_DETECT_MODEL);
            assert!(cfg.proxy.is_none());
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PORT", "8080");
            jail.set_env("API_CLARIFAI", "secret");
            jail.set_env("DATABASE_URL", "sqlite::memory:");
            let cfg = Config::load()?;
            assert_eq!(cfg.port, 8080);
            assert_eq!(cfg.api_clarifai, "secret");
            assert_eq!(cfg.database_url, "sqlite::memory:");
            Ok(())
        });
    }

    #[test]
    fn numeric_looking_strings_stay_strings() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("API_CLARIFAI", "1234567890");
            jail.set_env("FACE_MODEL_ID", "007");
            let cfg = Config::load()?;
            assert_eq!(cfg.api_clarifai, "1234567890");
            assert_eq!(cfg.face_model_id, "007");
            assert_eq!(cfg.port, 3000);
            Ok(())
        });
    }
}
