//! # MyDesk Config
//!
//! Configuration types for the MyDesk API, loaded from environment variables:
//!
//! - [`server`]: listen address and database connection settings
//! - [`jwt`]: JWT verification and development token settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`observability`]: logging and metrics switches
//!
//! Every struct exposes `from_env()` and a `from_lookup()` variant that reads
//! from any key/value source, which keeps the parsing testable.
//!
//! # Example
//!
//! ```ignore
//! use mydesk_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env();
//! println!("listening on {}", config.server.bind_address());
//! ```

pub mod cors;
pub mod jwt;
pub mod observability;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use observability::{LogFormat, ObservabilityConfig};
pub use server::ServerConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server: ServerConfig::from_lookup(&lookup),
            jwt: JwtConfig::from_lookup(&lookup),
            cors: CorsConfig::from_lookup(&lookup),
            observability: ObservabilityConfig::from_lookup(&lookup),
        }
    }
}

/// Parses a boolean switch: `true`/`1` (any case) enable, anything else disables.
pub(crate) fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
