use failure::Fail;
use std::{fs, io, path::Path};

static SERVER_HOST: &str = "SERVER_HOST";
static SERVER_PORT: &str = "SERVER_PORT";
static DATABASE_URL: &str = "DATABASE_URL";
static DB_USERNAME: &str = "DB_USERNAME";
static DB_PASSWORD: &str = "DB_PASSWORD";
static DB_HOST: &str = "DB_HOST";
static DB_PORT: &str = "DB_PORT";
static DB_NAME: &str = "DB_NAME";

// read when DB_PASSWORD is unset
static DB_PASSWORD_SECRET: &str = "products_db_password";
static SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, Fail)]
pub enum ConfigError {
    #[fail(display = "{} is not set", _0)]
    Missing(&'static str),
    #[fail(display = "{} is not a valid port: {:?}", _0, _1)]
    InvalidPort(&'static str, String),
    #[fail(
        display = "failed to read secret {}: {}. Set {} or create the secret before starting the service",
        _0, _1, _2
    )]
    Secret(String, #[cause] io::Error, &'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Database {
    Url(String),
    Parts {
        username: String,
        password: String,
        host: String,
        port: u16,
        name: String,
    },
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Url(url) => url.clone(),
            Database::Parts {
                username,
                password,
                host,
                port,
                name,
            } => format!(
                "postgres://{}:{}@{}:{}/{}",
                urlencoding::encode(username),
                urlencoding::encode(password),
                host,
                port,
                urlencoding::encode(name)
            ),
        }
    }

    /// Where we connect, without credentials. Safe to log.
    pub fn describe(&self) -> String {
        match self {
            Database::Url(_) => format!("<{}>", DATABASE_URL),
            Database::Parts {
                username,
                host,
                port,
                name,
                ..
            } => format!("{}@{}:{}/{}", username, host, port, name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database: Database,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok(), read_secret)
    }

    fn from_lookup<V, S>(var: V, secret: S) -> Result<Config, ConfigError>
    where
        V: Fn(&str) -> Option<String>,
        S: Fn(&str) -> Result<String, ConfigError>,
    {
        let server_host = var(SERVER_HOST).unwrap_or_else(|| "0.0.0.0".to_string());
        let server_port = port(SERVER_PORT, var(SERVER_PORT), 8000)?;

        let database = match var(DATABASE_URL) {
            Some(url) => Database::Url(url),
            None => Database::Parts {
                username: var(DB_USERNAME).ok_or(ConfigError::Missing(DB_USERNAME))?,
                password: match var(DB_PASSWORD) {
                    Some(p) => p,
                    None => secret(DB_PASSWORD_SECRET)?,
                },
                host: var(DB_HOST).unwrap_or_else(|| "localhost".to_string()),
                port: port(DB_PORT, var(DB_PORT), 5432)?,
                name: var(DB_NAME).ok_or(ConfigError::Missing(DB_NAME))?,
            },
        };

        Ok(Config {
            server_host,
            server_port,
            database,
        })
    }
}

fn port(key: &'static str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(key, v)),
        None => Ok(default),
    }
}

/// Secrets are mounted as files under /run/secrets; a trailing newline is
/// not part of the value.
fn read_secret(name: &str) -> Result<String, ConfigError> {
    let path = Path::new(SECRETS_DIR).join(name);
    match fs::read_to_string(&path) {
        Ok(s) => Ok(s.trim_end_matches(|c| c == '\n' || c == '\r').to_string()),
        Err(e) => Err(ConfigError::Secret(
            path.to_string_lossy().into_owned(),
            e,
            DB_PASSWORD,
        )),
    }
}
