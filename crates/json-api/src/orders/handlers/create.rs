//! Create Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::info;

use crate::{
    extensions::*,
    orders::{
        errors::render_error,
        requests::OrderRequest,
        responses::{ErrorsResponse, OrderCreatedResponse},
    },
    state::State,
};

/// Create Order Handler
///
/// Prices a cart and stores it as a pending order, along with its addresses
/// and promo code usage.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created", body = OrderCreatedResponse),
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

    match state.app.checkout.create_order(json.into_inner().into()).await {
        Ok(placed) => {
            info!(order_uuid = %placed.order, "order created");

            res.status_code(StatusCode::CREATED);
            res.render(Json(OrderCreatedResponse::from(placed)));

            Ok(())
        }
        Err(error) => render_error(error, res),
    }
}
