use minigolf_shared::config::PhysicsConfig;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_LISTEN_ADDR: &str = "MINIGOLF_LISTEN_ADDR";
pub const ENV_TICK_MS: &str = "MINIGOLF_TICK_MS";
pub const ENV_NETWORK_EVERY: &str = "MINIGOLF_NETWORK_EVERY";
pub const ENV_LEVEL: &str = "MINIGOLF_LEVEL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid value")]
    InvalidEnv { var: &'static str, value: String },
    #[error("{0} must be > 0")]
    Zero(&'static str),
    #[error("invalid physics: {0}")]
    Physics(#[from] minigolf_shared::config::ConfigError),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Physics tick period.
    pub tick_interval_ms: u64,
    /// Physics ticks per `tick` broadcast.
    pub network_tick_every: u32,
    /// JSON course to load instead of the built-in one.
    pub level_path: Option<PathBuf>,
    pub command_capacity: usize,
    pub broadcast_capacity: usize,
    /// Inbound text frames longer than this are dropped unread.
    pub max_message_bytes: usize,
    /// Gameplay constants for the game loop, also sent in `join`.
    pub physics: PhysicsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            tick_interval_ms: 10,
            network_tick_every: 5,
            level_path: None,
            command_capacity: 256,
            broadcast_capacity: 64,
            max_message_bytes: 1024,
            physics: PhysicsConfig::default(),
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

impl ServerConfig {
    /// Defaults overridden by `MINIGOLF_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
            config.listen_addr = addr;
        }
        if let Some(value) = lookup(ENV_TICK_MS) {
            config.tick_interval_ms = parse_var(ENV_TICK_MS, value)?;
        }
        if let Some(value) = lookup(ENV_NETWORK_EVERY) {
            config.network_tick_every = parse_var(ENV_NETWORK_EVERY, value)?;
        }
        if let Some(path) = lookup(ENV_LEVEL).filter(|p| !p.is_empty()) {
            config.level_path = Some(PathBuf::from(path));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Zero("tick_interval_ms"));
        }
        if self.network_tick_every == 0 {
            return Err(ConfigError::Zero("network_tick_every"));
        }
        if self.command_capacity == 0 {
            return Err(ConfigError::Zero("command_capacity"));
        }
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::Zero("broadcast_capacity"));
        }
        if self.max_message_bytes == 0 {
            return Err(ConfigError::Zero("max_message_bytes"));
        }
        self.physics.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn no_env_gives_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.tick_interval_ms, 10);
        assert_eq!(config.network_tick_every, 5);
        assert!(config.level_path.is_none());
    }

    #[test]
    fn env_overrides_apply() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_LISTEN_ADDR, "127.0.0.1:4000"),
            (ENV_TICK_MS, "20"),
            (ENV_NETWORK_EVERY, " 3 "),
            (ENV_LEVEL, "courses/one.json"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:4000");
        assert_eq!(config.tick_interval_ms, 20);
        assert_eq!(config.network_tick_every, 3);
        assert_eq!(config.level_path, Some(PathBuf::from("courses/one.json")));
    }

    #[test]
    fn unparseable_env_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[(ENV_TICK_MS, "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_TICK_MS, .. }));
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[(ENV_NETWORK_EVERY, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Zero("network_tick_every")));
    }

    #[test]
    fn invalid_physics_is_rejected() {
        let mut config = ServerConfig::default();
        config.physics.friction = 1.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Physics(_)));

        config.physics.friction = 0.99;
        config.physics.putt_power = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_level_path_means_builtin() {
        let config = ServerConfig::from_lookup(lookup(&[(ENV_LEVEL, "")])).unwrap();
        assert!(config.level_path.is_none());
    }
}
