use std::borrow::Cow;

use sentry::integrations::tracing::EventFilter;
use sentry::{ClientInitGuard, ClientOptions};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::prelude::*;

/// Initialises Sentry and installs the global subscriber.
pub fn init(sentry_dsn: Option<String>, traces_sample_rate: f32) -> Result<ClientInitGuard> {
    let guard = init_sentry(sentry_dsn, traces_sample_rate);
    subscriber()?.try_init().context("failed to install the tracing subscriber")?;
    Ok(guard)
}

/// Sentry client, disabled when no DSN is given.
pub fn init_sentry(sentry_dsn: Option<String>, traces_sample_rate: f32) -> ClientInitGuard {
    sentry::init((
        sentry_dsn,
        ClientOptions {
            release: Some(Cow::Borrowed(env!("CARGO_PKG_VERSION"))),
            traces_sample_rate,
            ..Default::default()
        },
    ))
}

/// Console output plus Sentry: warnings and errors become events, the rest are breadcrumbs.
pub fn subscriber() -> Result<impl Subscriber + Send + Sync + 'static> {
    let sentry_layer = sentry::integrations::tracing::layer()
        .event_filter(|metadata| match *metadata.level() {
            Level::ERROR | Level::WARN => EventFilter::Event,
            _ => EventFilter::Breadcrumb,
        })
        .span_filter(|metadata| *metadata.level() <= Level::INFO)
        .with_filter(env_filter("REALTY_ESTIMATOR_SENTRY_LOG", "realty_estimator=debug")?);
    let format_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_filter(env_filter("REALTY_ESTIMATOR_LOG", "realty_estimator=info,poem=warn")?);
    Ok(tracing_subscriber::Registry::default()
        .with(sentry_layer)
        .with(format_layer))
}

fn env_filter(variable: &str, default: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(variable) {
        Ok(filter) => Ok(filter),
        Err(error) => {
            if std::env::var_os(variable).is_some() {
                // Misspelled directives are not silently replaced with the defaults.
                return Err(error).with_context(|| format!("invalid `{}`", variable));
            }
            Ok(EnvFilter::try_new(default)?)
        }
    }
}

pub fn format_elapsed(instant: Instant) -> String {
    humantime::format_duration(instant.elapsed()).to_string()
}
