//! Catalog endpoints: simple field validation, persistence delegated to the
//! product repository. Stock changes made here are catalog corrections;
//! sales go through checkout.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;
use till_core::{validation, Product};
use till_db::repository::product::generate_product_id;

// -- DTOs --

#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price_cents: i64,
    pub stock_quantity: i64,
}

/// Product DTO for API responses.
#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub stock_quantity: i64,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            stock_quantity: p.stock_quantity,
        }
    }
}

fn validate_input(input: &ProductInput) -> Result<(), ApiError> {
    validation::validate_product_name(&input.name).map_err(till_core::CoreError::from)?;
    validation::validate_price_cents(input.price_cents).map_err(till_core::CoreError::from)?;
    validation::validate_stock_quantity(input.stock_quantity)
        .map_err(till_core::CoreError::from)?;
    Ok(())
}

// -- Handlers --

/// GET /products: the catalog, sorted by name.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let products = state.db.products().list().await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// POST /products: add a product.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    validate_input(&input)?;

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name: input.name.trim().to_string(),
        price_cents: input.price_cents,
        stock_quantity: input.stock_quantity,
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;
    debug!(id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /products/{id}: full-field update.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductDto>, ApiError> {
    validate_input(&input)?;

    state
        .db
        .products()
        .update(&id, input.name.trim(), input.price_cents, input.stock_quantity)
        .await?;

    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("product", &id))?;

    Ok(Json(product.into()))
}

/// DELETE /products/{id}: remove a product.
///
/// Returns 409 if committed order lines still reference it.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.products().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
