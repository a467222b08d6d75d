use crate::{env::EnvManager, error::CliError};
use connectors::{endpoint::Endpoint, sql::base::adapter::DatabaseKind};
use notify::NotifyConfig;
use std::{str::FromStr, time::Duration};

const DEFAULT_DAYS_BACK: u32 = 15;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Everything the process needs, resolved from the environment once at
/// startup. `SOURCE_DB_*` and `TARGET_DB_*` describe the two endpoints;
/// `SYNC_DAYS_BACK` bounds the change window; `NOTIFY_WEBHOOK_URL` turns
/// notifications on.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: Endpoint,
    pub target: Endpoint,
    pub days_back: u32,
    pub notify: Option<NotifyConfig>,
}

impl AppConfig {
    pub fn from_env(env: &EnvManager) -> Result<Self, CliError> {
        Ok(AppConfig {
            source: endpoint_from_env(env, "SOURCE")?,
            target: endpoint_from_env(env, "TARGET")?,
            days_back: parse_or(env, "SYNC_DAYS_BACK", DEFAULT_DAYS_BACK)?,
            notify: env.get("NOTIFY_WEBHOOK_URL").map(|url| NotifyConfig {
                webhook_url: url.to_string(),
                auth_token: env.get("NOTIFY_AUTH_TOKEN").map(str::to_string),
            }),
        })
    }
}

fn endpoint_from_env(env: &EnvManager, prefix: &str) -> Result<Endpoint, CliError> {
    let required = |suffix: &str| {
        let key = format!("{prefix}_DB_{suffix}");
        env.get(&key)
            .map(str::to_string)
            .ok_or_else(|| CliError::Config(format!("Missing required variable {key}")))
    };

    let kind = match env.get(&format!("{prefix}_DB_KIND")) {
        Some(raw) => DatabaseKind::from_str(raw).map_err(CliError::Config)?,
        None => DatabaseKind::Postgres,
    };
    let default_port = match kind {
        DatabaseKind::MySql => 3306,
        DatabaseKind::Postgres => 5432,
    };

    Ok(Endpoint {
        kind,
        host: required("HOST")?,
        port: parse_or(env, &format!("{prefix}_DB_PORT"), default_port)?,
        database: required("DATABASE")?,
        user: required("USER")?,
        password: required("PASSWORD")?,
        encrypt: parse_bool_or(env, &format!("{prefix}_DB_ENCRYPT"), false)?,
        timeout: Duration::from_secs(parse_or(
            env,
            &format!("{prefix}_DB_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?),
    })
}

fn parse_or<T: FromStr>(env: &EnvManager, key: &str, default: T) -> Result<T, CliError> {
    match env.get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| CliError::Config(format!("Invalid value for {key}: {raw}"))),
        None => Ok(default),
    }
}

fn parse_bool_or(env: &EnvManager, key: &str, default: bool) -> Result<bool, CliError> {
    match env.get(key) {
        Some(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(CliError::Config(format!(
                "Invalid boolean for {key}: {other}"
            ))),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(content: &str) -> EnvManager {
        let mut env = EnvManager::empty();
        env.parse_env_content(content).unwrap();
        env
    }

    fn minimal() -> String {
        [
            "SOURCE_DB_KIND=mysql",
            "SOURCE_DB_HOST=erp.local",
            "SOURCE_DB_DATABASE=erp",
            "SOURCE_DB_USER=sync",
            "SOURCE_DB_PASSWORD=secret",
            "TARGET_DB_HOST=cloud.example.com",
            "TARGET_DB_DATABASE=erp_mirror",
            "TARGET_DB_USER=sync",
            "TARGET_DB_PASSWORD=secret",
        ]
        .join("\n")
    }

    #[test]
    fn defaults_fill_the_optional_fields() {
        let config = AppConfig::from_env(&env_from(&minimal())).unwrap();

        assert_eq!(config.source.kind, DatabaseKind::MySql);
        assert_eq!(config.source.port, 3306);
        assert_eq!(config.target.kind, DatabaseKind::Postgres);
        assert_eq!(config.target.port, 5432);
        assert!(!config.source.encrypt);
        assert_eq!(config.days_back, 15);
        assert!(config.notify.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let content = format!(
            "{}\nTARGET_DB_PORT=6432\nTARGET_DB_ENCRYPT=true\nSYNC_DAYS_BACK=30\nNOTIFY_WEBHOOK_URL=https://hooks.example.com/sync",
            minimal()
        );
        let config = AppConfig::from_env(&env_from(&content)).unwrap();

        assert_eq!(config.target.port, 6432);
        assert!(config.target.encrypt);
        assert_eq!(config.days_back, 30);
        assert_eq!(
            config.notify.unwrap().webhook_url,
            "https://hooks.example.com/sync"
        );
    }

    #[test]
    fn missing_endpoint_variable_is_an_error() {
        let content = minimal().replace("TARGET_DB_PASSWORD=secret", "");
        let result = AppConfig::from_env(&env_from(&content));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn bad_days_back_is_an_error() {
        let content = format!("{}\nSYNC_DAYS_BACK=soon", minimal());
        let result = AppConfig::from_env(&env_from(&content));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
