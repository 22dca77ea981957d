use poem::http::StatusCode;
use poem::web::cookie::CookieJar;
use poem::web::{Data, Json, Path};
use poem::{handler, IntoResponse, Response};
use serde::Serialize;

use crate::ledger::{Prediction, Strategy};
use crate::model::Regressor;
use crate::prelude::*;
use crate::property::PropertyInput;
use crate::web::session::SessionStore;

const CACHE_CONTROL: &str = "no-cache";

#[derive(Serialize)]
pub struct Predicted {
    /// Position in the session ledger, starting from 1.
    pub number: usize,

    #[serde(flatten)]
    pub prediction: Prediction,
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get_health() -> Result<impl IntoResponse> {
    Ok(Response::from(StatusCode::NO_CONTENT).with_header("Cache-Control", CACHE_CONTROL))
}

#[handler]
#[instrument(level = "info", skip_all)]
pub async fn post_predict(
    Json(input): Json<PropertyInput>,
    jar: &CookieJar,
    Data(model): Data<&Arc<dyn Regressor>>,
    Data(sessions): Data<&Arc<SessionStore>>,
) -> poem::Result<Json<Predicted>> {
    let prediction = Prediction::new(input.clamped(), &**model)?;
    let ledger = sessions.ledger(jar).await;
    let mut ledger = ledger.lock().await;
    ledger.append(prediction.clone());
    info!(prediction.price, n_predictions = ledger.len(), "predicted");
    Ok(Json(Predicted {
        number: ledger.len(),
        prediction,
    }))
}

#[handler]
#[instrument(level = "info", skip_all)]
pub async fn get_predictions(
    jar: &CookieJar,
    Data(sessions): Data<&Arc<SessionStore>>,
) -> Json<Vec<Prediction>> {
    let ledger = sessions.ledger(jar).await;
    let predictions: Vec<Prediction> = ledger.lock().await.iter().cloned().collect();
    Json(predictions)
}

#[handler]
#[instrument(level = "info", skip_all)]
pub async fn delete_predictions(
    jar: &CookieJar,
    Data(sessions): Data<&Arc<SessionStore>>,
) -> StatusCode {
    sessions.ledger(jar).await.lock().await.clear();
    StatusCode::NO_CONTENT
}

#[handler]
#[instrument(level = "info", skip_all)]
pub async fn get_compare(
    Path(strategy): Path<Strategy>,
    jar: &CookieJar,
    Data(sessions): Data<&Arc<SessionStore>>,
) -> poem::Result<Json<Prediction>> {
    let ledger = sessions.ledger(jar).await;
    let ledger = ledger.lock().await;
    debug!(?strategy, n_predictions = ledger.len());
    Ok(Json(ledger.compare(strategy)?.clone()))
}
