//! The JSON API.

use std::sync::Arc;

use bytes::Bytes;
use herald_core::{HeraldResult, RequestContext, SendError};
use herald_extract::response::{JsonResponse, ProblemResponse};
use herald_extract::{ExtractionContext, FromRequest, Json, Query};
use http::Response;

use crate::app::AppState;
use crate::features::home::{ProvideName, WelcomeMessage};

/// `POST /api/name`: accepts a name from a JSON body.
///
/// Failed validation answers 400 `application/problem+json`.
pub async fn provide_name(
    state: Arc<AppState>,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HeraldResult<Response<Bytes>> {
    let Json(request) = Json::<ProvideName>::from_request(&req)?;

    match state
        .mediator()
        .send(request, ctx.cancellation().clone())
        .await
    {
        Ok(view) => Ok(JsonResponse::new(view).into_response()),
        Err(SendError::Invalid(failures)) => {
            Ok(ProblemResponse::from_failures(&failures).into_response())
        }
        Err(error) => Err(error.into()),
    }
}

/// `GET /api/welcome`: the welcome line as JSON.
pub async fn welcome(
    state: Arc<AppState>,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HeraldResult<Response<Bytes>> {
    let Query(request) = Query::<WelcomeMessage>::from_request(&req)?;
    let view = state
        .mediator()
        .send(request, ctx.cancellation().clone())
        .await?;
    Ok(JsonResponse::new(view).into_response())
}
