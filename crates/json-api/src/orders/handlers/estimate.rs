//! Estimate Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::render_error,
        requests::OrderRequest,
        responses::{ErrorsResponse, EstimateResponse},
    },
    state::State,
};

/// Estimate Order Handler
///
/// Prices a cart without storing anything.
#[endpoint(
    tags("orders"),
    summary = "Estimate Order",
    responses(
        (status_code = StatusCode::OK, description = "Priced order", body = EstimateResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order", body = ErrorsResponse),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<OrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state.app.checkout.estimate(json.into_inner().into()).await {
        Ok(estimate) => {
            res.render(Json(EstimateResponse::from(estimate)));

            Ok(())
        }
        Err(error) => render_error(error, res),
    }
}
