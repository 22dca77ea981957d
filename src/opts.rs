//! CLI options.

use std::path::PathBuf;

use clap::Parser;

use crate::prelude::*;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Opts {
    /// Sentry DSN
    #[arg(short, long, env = "REALTY_ESTIMATOR_SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Performance traces sample rate for Sentry
    #[arg(long, default_value = "0", env = "REALTY_ESTIMATOR_TRACES_SAMPLE_RATE")]
    pub traces_sample_rate: f32,

    #[command(flatten)]
    pub web: WebOpts,
}

/// Runs the web application
#[derive(clap::Args)]
pub struct WebOpts {
    /// Pre-trained model artifact: `.json` or a pickle of the same structure
    #[arg(short, long, env = "REALTY_ESTIMATOR_MODEL")]
    pub model: PathBuf,

    /// Web application bind host
    #[arg(long, default_value = "::", env = "REALTY_ESTIMATOR_HOST")]
    pub host: String,

    /// Web application bind port
    #[arg(short, long, default_value = "8080", env = "REALTY_ESTIMATOR_PORT")]
    pub port: u16,

    /// Idle time after which a session and its predictions are forgotten
    #[arg(
        long,
        default_value = "1h",
        value_parser = humantime::parse_duration,
        env = "REALTY_ESTIMATOR_SESSION_TTL",
    )]
    pub session_ttl: StdDuration,
}
