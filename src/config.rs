//! Environment-resolved gateway configuration.
//!
//! Every environment variable the gateway recognizes is read here, once, at
//! startup. Nothing on the request path consults the environment or compares
//! deployment-mode strings — request-time code receives the already-resolved
//! [`GatewayConfig`].
//!
//! Recognized variables:
//!
//! | Variable            | Meaning                                  | Default |
//! |---------------------|------------------------------------------|---------|
//! | `APP_ENV`           | `development` \| `testing` \| `production` | `development` |
//! | `PORT`              | listen port                              | `3000`  |
//! | `JWT_SECRET`        | shared token-verification key            | required |
//! | `DATABASE_URI_DEV`  | persistence URI, development profile     | required in dev |
//! | `DATABASE_URI_TEST` | persistence URI, testing profile         | required in test |
//! | `DATABASE_URI_PROD` | persistence URI, production profile      | required in prod |
//! | `ALLOWED_ORIGIN`    | CORS allowed origin                      | per-mode |

use std::env;

use crate::error::Error;

const DEFAULT_PORT: u16 = 3000;
const DEV_ORIGIN: &str = "http://localhost:3001";
const PROD_ORIGIN: &str = "https://app.example.com";

/// Which topology the process is running in.
///
/// Selected once at boot from `APP_ENV`; never re-evaluated per request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeploymentMode {
    Development,
    Testing,
    Production,
}

impl DeploymentMode {
    fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") => Self::Production,
            Ok("testing") => Self::Testing,
            // Unknown or absent values fall back to the local profile.
            _ => Self::Development,
        }
    }

    fn database_var(self) -> &'static str {
        match self {
            Self::Development => "DATABASE_URI_DEV",
            Self::Testing => "DATABASE_URI_TEST",
            Self::Production => "DATABASE_URI_PROD",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Production => "production",
        }
    }
}

/// Fully-resolved gateway configuration.
///
/// Built once by [`GatewayConfig::from_env`] and passed down; immutable
/// afterwards.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub mode: DeploymentMode,
    pub listen_port: u16,
    /// Shared HS256 verification key, known only to the gateway and the
    /// token issuer.
    pub token_secret: String,
    /// Persistence URI for the active mode. Opaque to the gateway; handed
    /// to the persistence connector at startup.
    pub database_uri: String,
    /// The single origin the CORS policy advertises.
    pub allowed_origin: String,
}

impl GatewayConfig {
    /// Reads and validates the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `JWT_SECRET` or the mode-selected
    /// database URI is missing, or if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, Error> {
        let mode = DeploymentMode::from_env();

        let listen_port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a valid port: `{raw}`")))?,
            Err(_) => DEFAULT_PORT,
        };

        let token_secret = env::var("JWT_SECRET")
            .map_err(|_| Error::Config("JWT_SECRET is not set".to_owned()))?;

        let database_uri = env::var(mode.database_var())
            .map_err(|_| Error::Config(format!("{} is not set", mode.database_var())))?;

        let allowed_origin = env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| {
            match mode {
                DeploymentMode::Production => PROD_ORIGIN.to_owned(),
                _ => DEV_ORIGIN.to_owned(),
            }
        });

        Ok(Self { mode, listen_port, token_secret, database_uri, allowed_origin })
    }

    /// The externally reachable base address, prefixed onto discovery paths.
    ///
    /// Empty in production — the reverse proxy terminates the public
    /// hostname. Explicit `host:port` in the local topologies.
    pub fn base_url(&self) -> String {
        match self.mode {
            DeploymentMode::Production => String::new(),
            _ => format!("http://localhost:{}", self.listen_port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// The environment is process-global; tests that touch it take this
    /// lock so the harness can keep running them on parallel threads.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: &[&str] = &[
        "APP_ENV",
        "PORT",
        "JWT_SECRET",
        "DATABASE_URI_DEV",
        "DATABASE_URI_TEST",
        "DATABASE_URI_PROD",
        "ALLOWED_ORIGIN",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    fn config(mode: DeploymentMode, port: u16) -> GatewayConfig {
        GatewayConfig {
            mode,
            listen_port: port,
            token_secret: "secret".to_owned(),
            database_uri: "mongodb://localhost/dev".to_owned(),
            allowed_origin: DEV_ORIGIN.to_owned(),
        }
    }

    #[test]
    fn base_url_is_empty_only_in_production() {
        assert_eq!(config(DeploymentMode::Production, 3000).base_url(), "");
        assert_eq!(
            config(DeploymentMode::Development, 3000).base_url(),
            "http://localhost:3000"
        );
        assert_eq!(
            config(DeploymentMode::Testing, 4000).base_url(),
            "http://localhost:4000"
        );
    }

    #[test]
    fn mode_selects_database_variable() {
        assert_eq!(DeploymentMode::Development.database_var(), "DATABASE_URI_DEV");
        assert_eq!(DeploymentMode::Testing.database_var(), "DATABASE_URI_TEST");
        assert_eq!(DeploymentMode::Production.database_var(), "DATABASE_URI_PROD");
    }

    #[test]
    fn from_env_fails_without_the_token_secret() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var("DATABASE_URI_DEV", "mongodb://localhost/dev");

        let err = GatewayConfig::from_env().expect_err("JWT_SECRET is unset");
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("JWT_SECRET")));
        clear_env();
    }

    #[test]
    fn from_env_picks_the_database_uri_for_the_mode() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var("APP_ENV", "testing");
        env::set_var("JWT_SECRET", "secret");
        env::set_var("DATABASE_URI_TEST", "mongodb://localhost/test");
        env::set_var("DATABASE_URI_PROD", "mongodb://db.example.com/prod");

        let config = GatewayConfig::from_env().expect("complete testing environment");
        assert_eq!(config.mode, DeploymentMode::Testing);
        assert_eq!(config.database_uri, "mongodb://localhost/test");
        clear_env();
    }

    #[test]
    fn from_env_fails_when_the_mode_uri_is_missing() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var("APP_ENV", "production");
        env::set_var("JWT_SECRET", "secret");
        // Only the dev URI is set; production must not fall back to it.
        env::set_var("DATABASE_URI_DEV", "mongodb://localhost/dev");

        let err = GatewayConfig::from_env().expect_err("DATABASE_URI_PROD is unset");
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("DATABASE_URI_PROD")));
        clear_env();
    }

    #[test]
    fn from_env_rejects_a_non_numeric_port() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var("PORT", "not-a-port");
        env::set_var("JWT_SECRET", "secret");
        env::set_var("DATABASE_URI_DEV", "mongodb://localhost/dev");

        let err = GatewayConfig::from_env().expect_err("PORT is not a number");
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("PORT")));
        clear_env();
    }

    #[test]
    fn from_env_defaults_port_and_origin() {
        let _guard = ENV_LOCK.lock();
        clear_env();
        env::set_var("JWT_SECRET", "secret");
        env::set_var("DATABASE_URI_DEV", "mongodb://localhost/dev");

        let config = GatewayConfig::from_env().expect("complete dev environment");
        assert_eq!(config.mode, DeploymentMode::Development);
        assert_eq!(config.listen_port, DEFAULT_PORT);
        assert_eq!(config.allowed_origin, DEV_ORIGIN);
        clear_env();
    }
}
