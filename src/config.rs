//! Service configuration
//!
//! Every recognized option is listed here with its default. The binary
//! parses it once from flags and environment and validates it before
//! anything else starts.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::Parser;

use crate::{Error, Result};

/// Environment variables whose presence marks a constrained serverless host
pub const SERVERLESS_MARKERS: &[&str] = &["VERCEL", "AWS_LAMBDA_FUNCTION_NAME"];

/// Where the process is running, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionProfile {
    /// Constrained host: reduced-privilege, single-process, no-GPU launch
    Serverless,
    /// Developer machine or ordinary server: may fall back to a local browser
    Local,
}

impl ExecutionProfile {
    /// Detect the profile from the process environment.
    pub fn detect() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Detect the profile from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let serverless = SERVERLESS_MARKERS
            .iter()
            .any(|name| lookup(name).is_some_and(|v| !v.is_empty()));
        if serverless {
            ExecutionProfile::Serverless
        } else {
            ExecutionProfile::Local
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionProfile::Serverless => "serverless",
            ExecutionProfile::Local => "local",
        }
    }
}

/// Command-line / environment configuration for the HTTP service
#[derive(Debug, Clone, Parser)]
#[command(name = "codeshot", version, about = "Code snippet to PNG rendering service")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Browser executable to launch instead of the auto-detected one
    #[arg(long, env = "CHROME_EXECUTABLE_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Lifetime of a cached image, in seconds
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 600)]
    pub cache_ttl_secs: u64,

    /// How often expired cache entries are swept, in seconds
    #[arg(long, default_value_t = 120)]
    pub cache_sweep_secs: u64,

    /// Deadline for rendering one image, in milliseconds
    #[arg(long, env = "RENDER_TIMEOUT_MS", default_value_t = 30_000)]
    pub render_timeout_ms: u64,

    /// Sliding rate-limit window, in seconds
    #[arg(long, default_value_t = 900)]
    pub rate_limit_window_secs: u64,

    /// Requests allowed per client within one window
    #[arg(long, default_value_t = 100)]
    pub rate_limit_max: usize,

    /// Largest accepted request body, in bytes
    #[arg(long, default_value_t = 5 * 1024 * 1024)]
    pub body_limit_bytes: usize,

    /// Rate-limit by `X-Forwarded-For` instead of the peer address
    #[arg(long, env = "TRUST_PROXY", value_parser = FalseyValueParser::new())]
    pub trust_proxy: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            chrome_path: None,
            cache_ttl_secs: 600,
            cache_sweep_secs: 120,
            render_timeout_ms: 30_000,
            rate_limit_window_secs: 900,
            rate_limit_max: 100,
            body_limit_bytes: 5 * 1024 * 1024,
            trust_proxy: false,
        }
    }
}

impl ServerConfig {
    /// Reject values that would make the service unusable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("cache-ttl-secs", self.cache_ttl_secs),
            ("cache-sweep-secs", self.cache_sweep_secs),
            ("render-timeout-ms", self.render_timeout_ms),
            ("rate-limit-window-secs", self.rate_limit_window_secs),
            ("rate-limit-max", self.rate_limit_max as u64),
            ("body-limit-bytes", self.body_limit_bytes as u64),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(Error::ConfigError(format!("{} must be greater than zero", name)));
            }
        }
        if let Some(path) = &self.chrome_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigError("chrome-path must not be empty".into()));
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}
