//! The HTML home page.

use std::sync::Arc;

use bytes::Bytes;
use herald_core::{HeraldError, HeraldResult, RequestContext, SendError};
use herald_extract::response::{HtmlResponse, Redirect};
use herald_extract::{ExtractionContext, Form, FromRequest, Query};
use http::Response;

use crate::app::AppState;
use crate::features::home::{ProvideName, WelcomeMessage};

/// `GET /`: greets the visitor named in `?name=`.
pub async fn index(
    state: Arc<AppState>,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HeraldResult<Response<Bytes>> {
    let Query(request) = Query::<WelcomeMessage>::from_request(&req)?;
    let name = request.name.clone();

    let view = state
        .mediator()
        .send(request, ctx.cancellation().clone())
        .await?;
    let html = state.views().welcome(&view, name.as_deref(), [])?;
    Ok(HtmlResponse::new(html).into_response())
}

/// `POST /`: accepts a name from the form.
///
/// An invalid name re-renders the anonymous welcome page with the
/// validation messages. A valid one redirects back to [`index`].
pub async fn provide_name(
    state: Arc<AppState>,
    ctx: RequestContext,
    req: ExtractionContext,
) -> HeraldResult<Response<Bytes>> {
    let Form(request) = Form::<ProvideName>::from_request(&req)?;
    let submitted = request.name.clone();
    let cancel = ctx.cancellation().clone();

    match state.mediator().send(request, cancel.clone()).await {
        Ok(view) => {
            let location = welcome_location(view.name.as_deref())?;
            Ok(Redirect::to(location).into_response())
        }
        Err(SendError::Invalid(failures)) => {
            let view = state
                .mediator()
                .send(WelcomeMessage::anonymous(), cancel)
                .await?;
            let html = state
                .views()
                .welcome(&view, submitted.as_deref(), failures.messages())?;
            Ok(HtmlResponse::new(html).into_response())
        }
        Err(error) => Err(error.into()),
    }
}

fn welcome_location(name: Option<&str>) -> HeraldResult<String> {
    let Some(name) = name else {
        return Ok("/".to_string());
    };

    let query = serde_urlencoded::to_string([("name", name)])
        .map_err(|e| HeraldError::internal_with_source("Failed to encode redirect", e))?;
    Ok(format!("/?{query}"))
}
