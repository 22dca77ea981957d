use clap::Parser;

use crate::opts::Opts;
use crate::prelude::*;

mod city;
mod error;
mod features;
mod ledger;
mod model;
mod opts;
mod prelude;
mod property;
mod tracing;
mod web;

#[tokio::main]
async fn main() -> Result {
    let opts = Opts::parse();
    let _sentry_guard = crate::tracing::init(opts.sentry_dsn.clone(), opts.traces_sample_rate)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting…");

    let model = model::load(&opts.web.model)?;
    web::run(&opts.web, model).await
}
