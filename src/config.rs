use std::net::IpAddr;
use std::path::PathBuf;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub data_path: PathBuf,
    pub static_dir: PathBuf,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub submit_rate_limit: u32,
    pub submit_rate_window_secs: u64,
    pub honeypot_field: Option<String>,
    pub strict_validation: bool,
    pub log_level: String,
    pub admin: Option<AdminConfig>,
}

/// Credentials for the admin read gate. When absent, `/get-submissions` is open.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password_hash: String,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("TCRM_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid TCRM_HOST: {e}"))?;

        let port: u16 = env_or("TCRM_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid TCRM_PORT: {e}"))?;

        let data_path = PathBuf::from(env_or("TCRM_DATA_PATH", "data/submissions.json"));
        let static_dir = PathBuf::from(env_or("TCRM_STATIC_DIR", "static"));

        let max_body_size: usize = env_or("TCRM_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid TCRM_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("TCRM_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid TCRM_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let submit_rate_limit: u32 = env_or("TCRM_SUBMIT_RATE_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid TCRM_SUBMIT_RATE_LIMIT: {e}"))?;

        let submit_rate_window_secs: u64 = env_or("TCRM_SUBMIT_RATE_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid TCRM_SUBMIT_RATE_WINDOW_SECS: {e}"))?;

        let honeypot_field = std::env::var("TCRM_HONEYPOT_FIELD")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let strict_validation = parse_bool("TCRM_STRICT_VALIDATION", &env_or("TCRM_STRICT_VALIDATION", "false"))?;

        let log_level = env_or("TCRM_LOG_LEVEL", "info");

        let admin = match (
            std::env::var("TCRM_ADMIN_USERNAME").ok(),
            std::env::var("TCRM_ADMIN_PASSWORD_HASH").ok(),
            std::env::var("TCRM_JWT_SECRET").ok(),
        ) {
            (Some(username), Some(password_hash), Some(jwt_secret)) => {
                if jwt_secret.len() < 32 {
                    return Err("TCRM_JWT_SECRET must be at least 32 characters".to_string());
                }
                Some(AdminConfig {
                    username,
                    password_hash,
                    jwt_secret,
                })
            }
            (None, None, None) => None,
            _ => {
                return Err(
                    "TCRM_ADMIN_USERNAME, TCRM_ADMIN_PASSWORD_HASH and TCRM_JWT_SECRET must be set together"
                        .to_string(),
                );
            }
        };

        Ok(Config {
            host,
            port,
            data_path,
            static_dir,
            max_body_size,
            trusted_proxies,
            submit_rate_limit,
            submit_rate_window_secs,
            honeypot_field,
            strict_validation,
            log_level,
            admin,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(format!("Invalid {key}: expected a boolean, got '{other}'")),
    }
}
