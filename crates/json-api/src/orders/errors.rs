//! Order Errors

use salvo::{
    http::{StatusCode, StatusError},
    prelude::{Json, Response},
};
use tracing::error;

use storefront_app::domain::checkout::CheckoutError;

use crate::orders::responses::ErrorsResponse;

/// Field reported when no shipping rate covers the destination.
const SHIPPING_FIELD: &str = "shipping";

/// Render a checkout failure.
///
/// Problems with the request become a 400 with a field-keyed body; storage
/// failures are logged and become a bare 500.
pub(crate) fn render_error(error: CheckoutError, res: &mut Response) -> Result<(), StatusError> {
    let body = match error {
        CheckoutError::Validation(validation) => {
            ErrorsResponse::single(validation.field(), validation.to_string())
        }
        CheckoutError::NoShippingRate => {
            ErrorsResponse::single(SHIPPING_FIELD, CheckoutError::NoShippingRate.to_string())
        }
        CheckoutError::Store(source) => {
            error!(error = ?source, "failed to process order");

            return Err(StatusError::internal_server_error());
        }
    };

    res.status_code(StatusCode::BAD_REQUEST);
    res.render(Json(body));

    Ok(())
}
