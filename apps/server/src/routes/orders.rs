//! Order endpoints: transactional creation and the committed-order view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use till_core::CoreError;
use till_db::{NewOrder, NewOrderLine, OrderDetails};

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub total_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        OrderResponse {
            order_id: details.header.id,
            customer_id: details.header.customer_id,
            customer_name: details.header.customer_name,
            total_cents: details.header.total_cents,
            created_at: details.header.created_at,
            items: details
                .lines
                .into_iter()
                .map(|line| OrderItemResponse {
                    product_id: line.product_id,
                    product_name: line.product_name,
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                    line_total_cents: line.line_total_cents,
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// POST /orders: atomically create an order from requested line items.
///
/// All validation and stock semantics live in the checkout engine; this
/// handler only reshapes the payload.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), ApiError> {
    debug!(customer_id = %req.customer_id, items = req.items.len(), "create order request");

    let new_order = NewOrder {
        customer_id: req.customer_id,
        lines: req
            .items
            .into_iter()
            .map(|item| NewOrderLine {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect(),
    };

    let placed = state.db.checkout().place_order(&new_order).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: placed.order_id,
            total_cents: placed.total_cents,
        }),
    ))
}

/// GET /orders/{id}: the display view of a committed order.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let details = state
        .db
        .orders()
        .details(&id)
        .await?
        .ok_or_else(|| CoreError::OrderNotFound(id.clone()))?;

    Ok(Json(details.into()))
}
