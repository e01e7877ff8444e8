use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

const DEFAULT_WORK_DIR: &str = "./data/work";
const DEFAULT_PDF_DIR: &str = "./data/pdfs";
const DEFAULT_COMPILER: &str = "pdflatex";
const DEFAULT_COMPILE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT_COMPILES: usize = 2;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 8080;

/// Runtime configuration, resolved once at startup and passed into the
/// handlers through [`crate::AppState`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Scratch space for per-request build directories.
    pub work_dir: PathBuf,
    /// Serving directory for finished PDF artifacts.
    ///
    /// Defaults to a sibling of `work_dir` so the publish rename stays on
    /// one filesystem.
    pub serving_dir: PathBuf,
    pub compiler: String,
    pub compile_timeout: Duration,
    pub max_concurrent_compiles: usize,
    pub bind_addr: String,
    pub bind_port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let timeout_secs: u64 = env_or(
            "TEXFORM_COMPILE_TIMEOUT_SECS",
            &DEFAULT_COMPILE_TIMEOUT_SECS.to_string(),
        )
        .parse()
        .context("TEXFORM_COMPILE_TIMEOUT_SECS must be an integer number of seconds")?;

        let max_concurrent_compiles: usize = env_or(
            "TEXFORM_MAX_CONCURRENT_COMPILES",
            &DEFAULT_MAX_CONCURRENT_COMPILES.to_string(),
        )
        .parse()
        .context("TEXFORM_MAX_CONCURRENT_COMPILES must be an integer")?;

        let bind_port: u16 = env_or("TEXFORM_BIND_PORT", &DEFAULT_BIND_PORT.to_string())
            .parse()
            .context("TEXFORM_BIND_PORT must be a port number")?;

        let config = Self {
            work_dir: PathBuf::from(env_or("TEXFORM_WORK_DIR", DEFAULT_WORK_DIR)),
            serving_dir: PathBuf::from(env_or("TEXFORM_PDF_DIR", DEFAULT_PDF_DIR)),
            compiler: env_or("TEXFORM_COMPILER", DEFAULT_COMPILER),
            compile_timeout: Duration::from_secs(timeout_secs),
            max_concurrent_compiles,
            bind_addr: env_or("TEXFORM_BIND_ADDR", DEFAULT_BIND_ADDR),
            bind_port,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.compile_timeout > Duration::ZERO,
            "compile timeout must be positive"
        );
        ensure!(
            self.max_concurrent_compiles >= 1,
            "at least one concurrent compile must be allowed"
        );
        ensure!(
            !self.compiler.trim().is_empty(),
            "compiler executable must not be empty"
        );
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
