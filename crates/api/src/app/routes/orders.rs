use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use orderdesk_core::OrderId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(add_order))
        .route("/:id", get(get_order).put(update_order).delete(remove_order))
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.orders.get_order(OrderId::new(id)).await {
        Ok(order) => (StatusCode::OK, Json(dto::full_order_response(&order))).into_response(),
        Err(err) => errors::repository_error_to_response(err),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let skip = query.skip.unwrap_or(0);
    let count = query.count.unwrap_or(10);

    match services.orders.list_orders(skip, count).await {
        Ok(orders) => {
            let body: Vec<_> = orders.iter().map(dto::brief_order_response).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => errors::repository_error_to_response(err),
    }
}

pub async fn add_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::BriefOrderRequest>,
) -> axum::response::Response {
    let order = dto::order_from_brief(body, OrderId::new(0));

    match services.orders.add_order(&order).await {
        Ok(id) => (
            StatusCode::OK,
            Json(dto::AddOrderResponse { order_id: id.get() }),
        )
            .into_response(),
        Err(err) => errors::repository_error_to_response(err),
    }
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(body): Json<dto::BriefOrderRequest>,
) -> axum::response::Response {
    let order = dto::order_from_brief(body, OrderId::new(id));

    match services.orders.update_order(&order).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::repository_error_to_response(err),
    }
}

pub async fn remove_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.orders.remove_order(OrderId::new(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::repository_error_to_response(err),
    }
}
