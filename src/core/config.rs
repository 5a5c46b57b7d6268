use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub smtp: SmtpConfig,
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,

    /// "development" (permissive CORS) or "production" (origin-restricted).
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// Required when deployment = "production".
    pub allowed_origin: Option<String>,

    /// Directory served for the landing page; disabled when unset.
    pub static_dir: Option<PathBuf>,

    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    pub username: String,

    /// May be left empty in the file and supplied via SMTP_PASSWORD instead.
    #[serde(default)]
    pub password: String,

    /// Connection/greeting/socket timeout for each send attempt.
    #[serde(default = "default_smtp_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Fixed recipient for every registration notification.
    pub admin_email: String,

    /// Event branding used in subjects, bodies, and attachment names.
    pub event_name: String,

    /// Sender address for all outbound mail.
    pub from_address: String,

    #[serde(default = "default_counter_file")]
    pub counter_file: PathBuf,

    #[serde(default)]
    pub require_email: bool,

    #[serde(default)]
    pub require_pass_image: bool,

    /// Send a confirmation copy to the registrant as well as the admin.
    #[serde(default)]
    pub notify_registrant: bool,

    /// Pause between consecutive sends for one submission.
    #[serde(default = "default_send_pause_ms")]
    pub send_pause_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default = "default_console")]
    pub console: bool,
}

impl LoggingConfig {
    /// Console output when requested explicitly or via format = "console".
    pub fn console_output(&self) -> bool {
        self.console || self.format == "console"
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

// Default value functions
fn default_deployment() -> String {
    "development".to_string()
}

fn default_num_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout() -> u64 {
    10
}

fn default_counter_file() -> PathBuf {
    PathBuf::from("pass_id_counter.json")
}

fn default_send_pause_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// SMTP_PASSWORD in the environment overrides the file value so the
    /// credential can stay out of the config file.
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_toml(&content)?;

        if let Ok(password) = std::env::var("SMTP_PASSWORD") {
            if !password.is_empty() {
                config.smtp.password = password;
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML content without env overrides.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        let valid_deployments = ["development", "production"];
        if !valid_deployments.contains(&self.server.deployment.as_str()) {
            bail!(
                "Invalid deployment '{}'. Must be one of: development, production",
                self.server.deployment
            );
        }

        if self.server.deployment == "production" && self.server.allowed_origin.is_none() {
            bail!("allowed_origin is required when deployment = \"production\"");
        }

        // Validate SMTP config
        if self.smtp.host.is_empty() {
            bail!("smtp host must not be empty");
        }

        if self.smtp.port == 0 {
            bail!("smtp port must be greater than 0");
        }

        if self.smtp.username.is_empty() {
            bail!("smtp username must not be empty");
        }

        if self.smtp.password.is_empty() {
            bail!("smtp password must be set in the config file or via SMTP_PASSWORD");
        }

        if self.smtp.timeout_seconds == 0 {
            bail!("smtp timeout_seconds must be greater than 0");
        }

        // Validate registration config
        if !self.registration.admin_email.contains('@') {
            bail!(
                "Invalid admin_email '{}': not an email address",
                self.registration.admin_email
            );
        }

        if !self.registration.from_address.contains('@') {
            bail!(
                "Invalid from_address '{}': not an email address",
                self.registration.from_address
            );
        }

        if self.registration.event_name.is_empty() {
            bail!("event_name must not be empty");
        }

        if self.registration.send_pause_ms > 60_000 {
            bail!("send_pause_ms must be at most 60000");
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
