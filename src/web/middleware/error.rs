use poem::error::{
    MethodNotAllowedError, NotFoundError, ParseCookieError, ParseFormError, ParseJsonError,
    ParsePathError, ParseQueryError, ResponseError,
};
use poem::http::StatusCode;
use poem::web::Json;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use serde_json::json;

use crate::error::Error;
use crate::prelude::*;

impl ResponseError for Error {
    fn status(&self) -> StatusCode {
        match self {
            Self::EmptyLedger => StatusCode::NOT_FOUND,
            Self::InvalidCity(_) | Self::DerivedFeature | Self::Prediction(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

pub struct ErrorMiddleware;

impl<E: Endpoint<Output = Response>> Middleware<E> for ErrorMiddleware {
    type Output = ErrorMiddlewareImpl<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ErrorMiddlewareImpl { ep }
    }
}

pub struct ErrorMiddlewareImpl<E> {
    ep: E,
}

#[poem::async_trait]
impl<E: Endpoint<Output = Response>> Endpoint for ErrorMiddlewareImpl<E> {
    type Output = Response;

    async fn call(&self, request: Request) -> Result<Self::Output> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        match self.ep.call(request).await {
            Err(error) if error.is::<Error>() => {
                info!(?method, ?uri, "{:#}", error);
                let body = json!({ "error": error.to_string() });
                Ok(Json(body).with_status(error.status()).into_response())
            }
            Err(error) if error.is::<NotFoundError>() => {
                info!(?method, ?uri, "{:#}", error);
                Ok(StatusCode::NOT_FOUND.into_response())
            }
            Err(error) if error.is::<MethodNotAllowedError>() => {
                info!(?method, ?uri, "{:#}", error);
                Ok(StatusCode::METHOD_NOT_ALLOWED.into_response())
            }
            Err(error) => {
                if error.is::<ParseQueryError>()
                    || error.is::<ParsePathError>()
                    || error.is::<ParseCookieError>()
                    || error.is::<ParseJsonError>()
                    || error.is::<ParseFormError>()
                {
                    info!(?method, ?uri, "{:#}", error);
                    Ok(StatusCode::BAD_REQUEST.into_response())
                } else {
                    error!(?method, ?uri, "{:#}", error);
                    Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
                }
            }
            result => result,
        }
    }
}
