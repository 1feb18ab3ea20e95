//! Catalog and stock handlers.
//!
//! Reads and purchases need any authenticated caller; every other mutation
//! takes an [`AdminUser`] ahead of the body so role failures win over
//! validation failures.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{OptionalJson, ValidatedJson};
use crate::api::middleware::{AdminUser, CurrentUser};
use crate::api::AppState;
use crate::domain::{CatalogQuery, Category, Item, ItemChanges, NewItem};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created};

type ItemId = WithRejection<Path<Uuid>, AppError>;

/// Item creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    #[schema(example = "Ladoo")]
    pub name: String,
    pub category: Category,
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    #[schema(example = 15.0)]
    pub price: f64,
    #[validate(range(min = 0, message = "Quantity must be a non-negative integer"))]
    #[schema(example = 5)]
    pub quantity: i32,
    pub description: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

impl From<CreateItemRequest> for NewItem {
    fn from(req: CreateItemRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            price: req.price,
            quantity: req.quantity,
            description: req.description,
            image_url: req.image_url,
        }
    }
}

/// Partial item update; omitted fields stay unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: Option<String>,
    pub category: Option<Category>,
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Quantity must be a non-negative integer"))]
    pub quantity: Option<i32>,
    pub description: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

impl From<UpdateItemRequest> for ItemChanges {
    fn from(req: UpdateItemRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            price: req.price,
            quantity: req.quantity,
            description: req.description,
            image_url: req.image_url,
        }
    }
}

/// Purchase or restock body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StockRequest {
    /// Units to move; purchase defaults to 1, restock requires it
    #[schema(value_type = Option<i64>, example = 2)]
    pub quantity: Option<Value>,
}

impl StockRequest {
    /// Accepts integers and integer strings; anything else is an invalid quantity.
    fn requested(&self) -> AppResult<Option<i64>> {
        let invalid = || AppError::invalid_quantity("Please provide a valid quantity");
        match &self.quantity {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }
}

/// Catalog search filters; malformed numbers are ignored
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive name fragment
    pub name: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
}

impl From<&SearchParams> for CatalogQuery {
    fn from(params: &SearchParams) -> Self {
        CatalogQuery::from_raw(
            params.name.as_deref(),
            params.category.as_deref(),
            params.min_price.as_deref(),
            params.max_price.as_deref(),
        )
    }
}

/// Public view of an item's creator
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatorSummary {
    pub id: Uuid,
    pub username: String,
}

/// Item with its resolved creator, if the account still exists
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemDetail {
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<CreatorSummary>,
}

/// Create item routes (mounted behind the authentication middleware)
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/search", get(search_items))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/:id/purchase", post(purchase_item))
        .route("/:id/restock", post(restock_item))
}

/// List the whole catalog, newest first
#[utoipa::path(
    get,
    path = "/items",
    tag = "Items",
    responses(
        (status = 200, description = "All items", body = [Item]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Item>>> {
    let items = state.ledger.search(&CatalogQuery::all()).await?;
    Ok(ApiResponse::list("Items retrieved", items))
}

/// Search the catalog
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "Items",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching items", body = [Item]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<ApiResponse<Vec<Item>>> {
    let query = CatalogQuery::from(&params);
    let items = state.ledger.search(&query).await?;
    Ok(ApiResponse::list("Search completed", items))
}

/// Get an item and its creator
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "Items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = ItemDetail),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_item(
    State(state): State<AppState>,
    WithRejection(Path(id), _): ItemId,
) -> AppResult<ApiResponse<ItemDetail>> {
    let item = state.ledger.get(id).await?;
    let creator = state
        .credentials
        .find_account(item.created_by)
        .await?
        .map(|account| CreatorSummary {
            id: account.id,
            username: account.username,
        });

    Ok(ApiResponse::success("Item retrieved", ItemDetail { item, creator }))
}

/// Add an item to the catalog (admin only)
#[utoipa::path(
    post,
    path = "/items",
    tag = "Items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_item(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(payload): ValidatedJson<CreateItemRequest>,
) -> AppResult<Created<Item>> {
    let item = state.ledger.create(payload.into(), admin.id).await?;
    Ok(Created(ApiResponse::success("Item created successfully", item)))
}

/// Update an item (admin only)
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "Items",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_item(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Path(id), _): ItemId,
    ValidatedJson(payload): ValidatedJson<UpdateItemRequest>,
) -> AppResult<ApiResponse<Item>> {
    let item = state.ledger.update(id, payload.into()).await?;
    Ok(ApiResponse::success("Item updated successfully", item))
}

/// Delete an item (admin only)
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "Items",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_item(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Path(id), _): ItemId,
) -> AppResult<ApiResponse<()>> {
    state.ledger.delete(id).await?;
    Ok(ApiResponse::message("Item deleted successfully"))
}

/// Purchase stock of an item
#[utoipa::path(
    post,
    path = "/items/{id}/purchase",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body(content = StockRequest, description = "Optional; defaults to one unit"),
    responses(
        (status = 200, description = "Purchase successful", body = Item),
        (status = 400, description = "Invalid quantity or insufficient stock"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn purchase_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    WithRejection(Path(id), _): ItemId,
    OptionalJson(payload): OptionalJson<StockRequest>,
) -> AppResult<ApiResponse<Item>> {
    let quantity = payload.unwrap_or_default().requested()?;
    let item = state.ledger.purchase(id, quantity).await?;

    tracing::debug!(item_id = %id, buyer = %user.id, "Purchase handled");
    Ok(ApiResponse::success("Purchase successful", item))
}

/// Restock an item (admin only)
#[utoipa::path(
    post,
    path = "/items/{id}/restock",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = StockRequest,
    responses(
        (status = 200, description = "Restock successful", body = Item),
        (status = 400, description = "Invalid quantity"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn restock_item(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Path(id), _): ItemId,
    OptionalJson(payload): OptionalJson<StockRequest>,
) -> AppResult<ApiResponse<Item>> {
    let quantity = payload.unwrap_or_default().requested()?;
    let item = state.ledger.restock(id, quantity).await?;
    Ok(ApiResponse::success("Restock successful", item))
}
