//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, item_handler};
use crate::domain::{AccountResponse, Category, Item, Role};

/// OpenAPI documentation for the Sweet Shop API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sweet Shop API",
        version = "0.1.0",
        description = "Sweet shop inventory: accounts, role-gated catalog management and stock tracking",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Catalog endpoints
        item_handler::list_items,
        item_handler::search_items,
        item_handler::get_item,
        item_handler::create_item,
        item_handler::update_item,
        item_handler::delete_item,
        // Inventory endpoints
        item_handler::purchase_item,
        item_handler::restock_item,
    ),
    components(
        schemas(
            // Domain types
            Role,
            Category,
            Item,
            AccountResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthResponse,
            // Item handler types
            item_handler::CreateItemRequest,
            item_handler::UpdateItemRequest,
            item_handler::StockRequest,
            item_handler::ItemDetail,
            item_handler::CreatorSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Account registration and login"),
        (name = "Items", description = "Catalog browsing and management"),
        (name = "Inventory", description = "Purchases and restocks")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token obtained from /auth/login or /auth/register"))
                        .build(),
                ),
            );
        }
    }
}
