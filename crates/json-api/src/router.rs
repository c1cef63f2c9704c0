//! App Router

use salvo::Router;

use crate::{healthcheck, observability::request_logging, orders};

pub fn app_router() -> Router {
    Router::new()
        .hoop(request_logging)
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("order")
                .push(Router::with_path("estimate").post(orders::estimate::handler))
                .push(Router::with_path("create").post(orders::create::handler)),
        )
}
