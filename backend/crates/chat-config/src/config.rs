use crate::{
    BroadcasterConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, LoggingConfig, ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
    pub broadcaster: BroadcasterConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. `CHAT_CONFIG_DIR` env var, else `./.chat/`
    /// 2. Create the config directory if missing
    /// 3. Parse `config.toml` if it exists, else defaults
    /// 4. Apply `CHAT_*` environment overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|source| ConfigError::Io {
                path: config_dir.clone(),
                source,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Priority: CHAT_CONFIG_DIR env var > ./.chat/
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd =
            std::env::current_dir().map_err(|source| ConfigError::WorkingDirectory { source })?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate every section. Call after load() so bad values fail at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.logging.validate()?;
        self.websocket.validate()?;
        self.broadcaster.validate()?;
        Ok(())
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match &self.logging.file {
            Some(file) => Ok(Some(
                Self::config_dir()?.join(&self.logging.dir).join(file),
            )),
            None => Ok(None),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (idle shutdown: {})",
            self.server.host,
            self.server.port,
            match self.server.idle_shutdown_secs {
                0 => String::from("disabled"),
                secs => format!("{}s", secs),
            }
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
        info!(
            "  websocket: mailbox={}, buffers={}/{}B, max_message={}B",
            self.websocket.mailbox_capacity,
            self.websocket.read_buffer_size,
            self.websocket.write_buffer_size,
            self.websocket.max_message_size
        );
        info!(
            "  broadcaster: join={}, leave={}, forward={}",
            self.broadcaster.join_queue_capacity,
            self.broadcaster.leave_queue_capacity,
            self.broadcaster.forward_queue_capacity
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("CHAT_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("CHAT_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "CHAT_IDLE_SHUTDOWN_SECS",
            &mut self.server.idle_shutdown_secs,
        );

        // Logging
        Self::apply_env_parse("CHAT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("CHAT_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("CHAT_LOG_FILE", &mut self.logging.file);

        // WebSocket
        Self::apply_env_parse(
            "CHAT_WS_MAILBOX_CAPACITY",
            &mut self.websocket.mailbox_capacity,
        );
        Self::apply_env_parse(
            "CHAT_WS_READ_BUFFER_SIZE",
            &mut self.websocket.read_buffer_size,
        );
        Self::apply_env_parse(
            "CHAT_WS_WRITE_BUFFER_SIZE",
            &mut self.websocket.write_buffer_size,
        );
        Self::apply_env_parse(
            "CHAT_WS_MAX_MESSAGE_SIZE",
            &mut self.websocket.max_message_size,
        );

        // Broadcaster
        Self::apply_env_parse(
            "CHAT_JOIN_QUEUE_CAPACITY",
            &mut self.broadcaster.join_queue_capacity,
        );
        Self::apply_env_parse(
            "CHAT_LEAVE_QUEUE_CAPACITY",
            &mut self.broadcaster.leave_queue_capacity,
        );
        Self::apply_env_parse(
            "CHAT_FORWARD_QUEUE_CAPACITY",
            &mut self.broadcaster.forward_queue_capacity,
        );
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"; anything else is false
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values are ignored
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
