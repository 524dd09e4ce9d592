//! Client configuration.
//!
//! Credentials and the endpoint address are resolved once, at construction,
//! into an immutable [`Config`]. Each field falls back independently:
//! explicit value, then environment variable, then hardcoded default.

use std::env;

pub const HOST_ENV: &str = "BITCOIND_HOST";
pub const PORT_ENV: &str = "BITCOIND_PORT";
pub const USER_ENV: &str = "BITCOIND_USER";
pub const PASSWORD_ENV: &str = "BITCOIND_PASSWORD";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8332;
const DEFAULT_USER: &str = "user";
const DEFAULT_PASSWORD: &str = "password";

/// Resolved endpoint and basic-auth credentials for a bitcoind RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl Config {
    /// Resolve a config from explicit per-field overrides.
    ///
    /// `None` fields fall back to the `BITCOIND_*` environment variables,
    /// then to the defaults (`127.0.0.1:8332`, `user`/`password`). A
    /// `BITCOIND_PORT` value that is not a valid port number is ignored.
    pub fn resolve(
        host: Option<String>,
        port: Option<u16>,
        user: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self::resolve_with(host, port, user, password, |name| env::var(name).ok())
    }

    // Resolution over an injected environment lookup, so the fallback chain
    // is testable without mutating process-global state.
    fn resolve_with(
        host: Option<String>,
        port: Option<u16>,
        user: Option<String>,
        password: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        Self {
            host: host
                .or_else(|| lookup(HOST_ENV))
                .unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: port
                .or_else(|| lookup(PORT_ENV).and_then(|p| p.parse().ok()))
                .unwrap_or(DEFAULT_PORT),
            user: user
                .or_else(|| lookup(USER_ENV))
                .unwrap_or_else(|| DEFAULT_USER.to_owned()),
            password: password
                .or_else(|| lookup(PASSWORD_ENV))
                .unwrap_or_else(|| DEFAULT_PASSWORD.to_owned()),
        }
    }
}

impl Default for Config {
    /// Environment variables, then the hardcoded defaults.
    fn default() -> Self {
        Self::resolve(None, None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::resolve_with(None, None, None, None, no_env);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8332);
        assert_eq!(config.user, "user");
        assert_eq!(config.password, "password");
    }

    #[test]
    fn explicit_values_win_over_environment() {
        let config = Config::resolve_with(
            Some("node.local".to_owned()),
            Some(18443),
            Some("alice".to_owned()),
            Some("secret".to_owned()),
            |_| Some("from-env".to_owned()),
        );
        assert_eq!(config.host, "node.local");
        assert_eq!(config.port, 18443);
        assert_eq!(config.user, "alice");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn each_field_falls_back_to_environment_independently() {
        let config = Config::resolve_with(None, None, Some("alice".to_owned()), None, |name| {
            match name {
                HOST_ENV => Some("10.0.0.5".to_owned()),
                PORT_ENV => Some("18332".to_owned()),
                PASSWORD_ENV => Some("hunter2".to_owned()),
                _ => None,
            }
        });
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 18332);
        assert_eq!(config.user, "alice");
        assert_eq!(config.password, "hunter2");
    }

    #[test]
    fn unparseable_port_env_falls_through_to_default() {
        let config = Config::resolve_with(None, None, None, None, |name| match name {
            PORT_ENV => Some("not-a-port".to_owned()),
            _ => None,
        });
        assert_eq!(config.port, 8332);
    }
}
