use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::domain::BalanceRules;
use crate::services::DEFAULT_CODE_ATTEMPTS;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    pub frontend_url: String,
    /// Team ratio and minimum player count used when dealing roles.
    pub balance: BalanceRules,
    pub code_attempts: u32,
    /// Deadline given to each service call made on behalf of a request.
    pub operation_timeout: Duration,
    /// Fixed seed for the shared RNG; entropy when unset.
    pub rng_seed: Option<u64>,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `DATABASE_URL`
    /// Optional with defaults: `SERVER_HOST`, `SERVER_PORT`, `ENVIRONMENT`, `LOG_LEVEL`,
    /// `FRONTEND_URL`, `MIN_PLAYERS`, `TEAM_RATIO`, `CODE_ATTEMPTS`, `OPERATION_TIMEOUT_MS`,
    /// `RNG_SEED`
    ///
    /// On Railway, `PORT` overrides `SERVER_PORT` and host defaults to `0.0.0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is not set, or if any optional variable
    /// holds a value that does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let environment = match lookup("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        // Railway provides PORT; fall back to SERVER_PORT, then 3000
        let server_port = lookup("PORT")
            .or_else(|| lookup("SERVER_PORT"))
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        // In production, default to 0.0.0.0 so Railway can route traffic
        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = lookup("SERVER_HOST")
            .unwrap_or_else(|| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3001".to_string());

        let defaults = BalanceRules::default();
        let min_players = lookup("MIN_PLAYERS")
            .map(|raw| raw.parse::<usize>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("MIN_PLAYERS must be a non-negative integer"))?
            .unwrap_or_else(|| defaults.min_players());
        let weights = match lookup("TEAM_RATIO") {
            Some(raw) => BalanceRules::parse_ratio(&raw)
                .map_err(|err| anyhow::anyhow!("TEAM_RATIO is invalid: {err}"))?,
            None => defaults.weights().to_vec(),
        };
        let balance = BalanceRules::new(weights, min_players)
            .map_err(|err| anyhow::anyhow!("team balance is invalid: {err}"))?;

        let code_attempts = lookup("CODE_ATTEMPTS")
            .map(|raw| raw.parse::<u32>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("CODE_ATTEMPTS must be a positive integer"))?
            .unwrap_or(DEFAULT_CODE_ATTEMPTS);
        if code_attempts == 0 {
            anyhow::bail!("CODE_ATTEMPTS must be a positive integer");
        }

        let operation_timeout = lookup("OPERATION_TIMEOUT_MS")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("OPERATION_TIMEOUT_MS must be a number of milliseconds"))?
            .map_or(Duration::from_secs(5), Duration::from_millis);

        let rng_seed = lookup("RNG_SEED")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("RNG_SEED must be a u64"))?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            environment,
            log_level,
            frontend_url,
            balance,
            code_attempts,
            operation_timeout,
            rng_seed,
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}
