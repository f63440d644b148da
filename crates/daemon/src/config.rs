//! Service configuration loaded from `GENART_*` environment variables.

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use genart_core::application::worker::constants::{
    DEFAULT_ADMISSION_TIMEOUT, DEFAULT_MAX_DELAY, DEFAULT_QUEUE_CAPACITY, DEFAULT_RENDER_TIMEOUT,
    DEFAULT_SHUTDOWN_GRACE, DEFAULT_WORKER_COUNT,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected 'json' or 'pretty', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Daily rolling log files are written here when set
    pub dir: Option<PathBuf>,
}

/// Everything the daemon needs to wire the service.
///
/// | Env Var                         | Default          |
/// |---------------------------------|------------------|
/// | `GENART_HOST`                   | `0.0.0.0`        |
/// | `GENART_PORT`                   | `8080`           |
/// | `GENART_PUBLIC_HOST`            | `localhost:8080` |
/// | `GENART_WORKERS`                | `30`             |
/// | `GENART_QUEUE_CAPACITY`         | `1024`           |
/// | `GENART_ADMISSION_TIMEOUT_MS`   | `250`            |
/// | `GENART_MAX_DELAY_MS`           | `100000`         |
/// | `GENART_RENDER_TIMEOUT_SECS`    | `60` (0 = none)  |
/// | `GENART_OUTPUT_DIR`             | `./generated`    |
/// | `GENART_CANVAS_WIDTH`/`_HEIGHT` | `600`/`400`      |
/// | `GENART_PLACEHOLDER_PATH`       | unset            |
/// | `GENART_RATE_LIMIT_BURST`       | `200`            |
/// | `GENART_RATE_LIMIT_RATE`        | `100`            |
/// | `GENART_REQUEST_TIMEOUT_SECS`   | `30`             |
/// | `GENART_SHUTDOWN_TIMEOUT_SECS`  | `10`             |
/// | `GENART_LOG_FORMAT`             | `pretty`         |
/// | `GENART_LOG_DIR`                | unset            |
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub public_host: String,
    pub workers: usize,
    pub queue_capacity: usize,
    pub admission_timeout: Duration,
    pub max_delay: Duration,
    pub render_timeout: Option<Duration>,
    pub output_dir: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub placeholder_path: Option<PathBuf>,
    pub rate_limit_burst: u32,
    pub rate_limit_rate: u32,
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub log: LogConfig,
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let render_timeout_secs: u64 =
            env.parse_or("GENART_RENDER_TIMEOUT_SECS", DEFAULT_RENDER_TIMEOUT.as_secs())?;

        let config = Self {
            host: env.parse_or("GENART_HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: env.parse_or("GENART_PORT", 8080)?,
            public_host: env.string_or("GENART_PUBLIC_HOST", "localhost:8080"),
            workers: env.parse_or("GENART_WORKERS", DEFAULT_WORKER_COUNT)?,
            queue_capacity: env.parse_or("GENART_QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY)?,
            admission_timeout: Duration::from_millis(env.parse_or(
                "GENART_ADMISSION_TIMEOUT_MS",
                DEFAULT_ADMISSION_TIMEOUT.as_millis() as u64,
            )?),
            max_delay: Duration::from_millis(
                env.parse_or("GENART_MAX_DELAY_MS", DEFAULT_MAX_DELAY.as_millis() as u64)?,
            ),
            render_timeout: (render_timeout_secs > 0)
                .then(|| Duration::from_secs(render_timeout_secs)),
            output_dir: PathBuf::from(env.string_or("GENART_OUTPUT_DIR", "./generated")),
            canvas_width: env.parse_or("GENART_CANVAS_WIDTH", 600)?,
            canvas_height: env.parse_or("GENART_CANVAS_HEIGHT", 400)?,
            placeholder_path: env.get("GENART_PLACEHOLDER_PATH").map(PathBuf::from),
            rate_limit_burst: env.parse_or("GENART_RATE_LIMIT_BURST", 200)?,
            rate_limit_rate: env.parse_or("GENART_RATE_LIMIT_RATE", 100)?,
            request_timeout: Duration::from_secs(env.parse_or("GENART_REQUEST_TIMEOUT_SECS", 30)?),
            shutdown_timeout: Duration::from_secs(env.parse_or(
                "GENART_SHUTDOWN_TIMEOUT_SECS",
                DEFAULT_SHUTDOWN_GRACE.as_secs(),
            )?),
            log: LogConfig {
                format: env.parse_or("GENART_LOG_FORMAT", LogFormat::Pretty)?,
                dir: env.get("GENART_LOG_DIR").map(PathBuf::from),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("GENART_WORKERS must be at least 1");
        }
        if self.queue_capacity == 0 {
            bail!("GENART_QUEUE_CAPACITY must be at least 1");
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            bail!("canvas dimensions must be non-zero");
        }
        if self.public_host.is_empty() {
            bail!("GENART_PUBLIC_HOST must not be empty");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Thin wrapper so every variable is read and reported the same way
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| anyhow::anyhow!("{}", e))
                .with_context(|| format!("invalid value for {}: '{}'", key, raw)),
            None => Ok(default),
        }
    }
}
