use houme_core::area::AreaLabelMode;
use houme_core::error::CoreError;
use reqwest::Url;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `180`). Must exceed the
    /// image generation timeout.
    pub request_timeout_secs: u64,
    /// Time allowed for in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// How area categories are rendered into composed prompts.
    pub area_label_mode: AreaLabelMode,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `180`                   |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `PROMPT_AREA_LABEL`     | `code`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "180".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let area_label_mode = match std::env::var("PROMPT_AREA_LABEL") {
            Ok(name) => AreaLabelMode::from_name(&name).expect("Invalid PROMPT_AREA_LABEL"),
            Err(_) => AreaLabelMode::default(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            area_label_mode,
        }
    }
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// Postgres connection settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig").finish_non_exhaustive()
    }
}

/// Discrete connection settings, used when `DATABASE_URL` is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresParts {
    /// A bare host name or a full `jdbc:postgresql://host:port/db` URL.
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
}

impl Default for PostgresParts {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            user: "root".into(),
            password: Some("root".into()),
            database: "houme".into(),
        }
    }
}

impl DatabaseConfig {
    /// Load from `DATABASE_URL`, or assemble from the `POSTGRES_*` variables.
    ///
    /// | Env Var             | Default     |
    /// |---------------------|-------------|
    /// | `DATABASE_URL`      | assembled   |
    /// | `POSTGRES_HOST`     | `localhost` |
    /// | `POSTGRES_PORT`     | `5432`      |
    /// | `POSTGRES_USER`     | `root`      |
    /// | `POSTGRES_PASSWORD` | `root`      |
    /// | `POSTGRES_DB`       | `houme`     |
    pub fn from_env() -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return Self { url };
        }

        let defaults = PostgresParts::default();
        let parts = PostgresParts {
            host: std::env::var("POSTGRES_HOST").unwrap_or(defaults.host),
            port: std::env::var("POSTGRES_PORT")
                .map(|p| p.parse().expect("POSTGRES_PORT must be a valid u16"))
                .unwrap_or(defaults.port),
            user: std::env::var("POSTGRES_USER").unwrap_or(defaults.user),
            password: std::env::var("POSTGRES_PASSWORD").ok().or(defaults.password),
            database: std::env::var("POSTGRES_DB").unwrap_or(defaults.database),
        };

        Self {
            url: postgres_url(&parts).expect("Invalid POSTGRES_* configuration"),
        }
    }
}

/// Build a `postgres://` URL from discrete settings.
///
/// When `host` is a JDBC URL, its host, port and database take precedence
/// over the separate fields.
pub fn postgres_url(parts: &PostgresParts) -> Result<String, CoreError> {
    let (host, port, database) = match parts.host.strip_prefix("jdbc:") {
        Some(jdbc) => {
            let parsed = Url::parse(jdbc)
                .map_err(|e| CoreError::Validation(format!("Invalid JDBC URL '{jdbc}': {e}")))?;
            let host = parsed
                .host_str()
                .ok_or_else(|| CoreError::Validation(format!("JDBC URL '{jdbc}' has no host")))?
                .to_string();
            let database = match parsed.path().trim_matches('/') {
                "" => parts.database.clone(),
                db => db.to_string(),
            };
            (host, parsed.port().unwrap_or(parts.port), database)
        }
        None => (parts.host.clone(), parts.port, parts.database.clone()),
    };

    let invalid = |what: &str| CoreError::Validation(format!("Invalid database {what}"));
    let mut url = Url::parse("postgres://localhost").map_err(|_| invalid("URL"))?;
    url.set_host(Some(&host)).map_err(|_| invalid("host"))?;
    url.set_port(Some(port)).map_err(|_| invalid("port"))?;
    url.set_username(&parts.user).map_err(|_| invalid("user"))?;
    url.set_password(parts.password.as_deref().filter(|p| !p.is_empty()))
        .map_err(|_| invalid("password"))?;
    url.set_path(&format!("/{database}"));

    Ok(url.to_string())
}
