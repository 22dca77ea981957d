use std::net::IpAddr;
use std::str::FromStr;

use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, CookieJarManager, Tracing};
use poem::{get, post, Endpoint, EndpointExt, Route, Server};

use crate::model::Regressor;
use crate::opts::WebOpts;
use crate::prelude::*;
use crate::web::middleware::{ErrorMiddleware, SecurityHeadersMiddleware, SentryMiddleware};
use crate::web::session::SessionStore;

mod cookies;
mod middleware;
mod partials;
mod session;
mod views;

pub async fn run(opts: &WebOpts, model: Arc<dyn Regressor>) -> Result {
    let app = create_app(model, opts.session_ttl);
    info!(host = %opts.host, port = opts.port, "listening…");
    Server::new(TcpListener::bind((IpAddr::from_str(&opts.host)?, opts.port)))
        .run_with_graceful_shutdown(
            app,
            async {
                let _ = tokio::signal::ctrl_c().await;
                info!("shutting down…");
            },
            Some(StdDuration::from_secs(5)),
        )
        .await?;
    Ok(())
}

/// Builds the application around the already loaded model.
pub fn create_app(model: Arc<dyn Regressor>, session_ttl: StdDuration) -> impl Endpoint {
    Route::new()
        .at("/", get(views::index::get))
        .at("/predict", post(views::index::post_predict))
        .at("/clear", post(views::index::post_clear))
        .at("/static/theme.css", get(views::r#static::get_theme_css))
        .at("/api/health", get(views::api::get_health))
        .at("/api/predict", post(views::api::post_predict))
        .at(
            "/api/predictions",
            get(views::api::get_predictions).delete(views::api::delete_predictions),
        )
        .at("/api/compare/:strategy", get(views::api::get_compare))
        .data(model)
        .data(Arc::new(SessionStore::new(session_ttl)))
        .with(Tracing)
        .with(CatchPanic::new())
        .with(ErrorMiddleware)
        .with(CookieJarManager::new())
        .with(SecurityHeadersMiddleware)
        .with(SentryMiddleware)
}
