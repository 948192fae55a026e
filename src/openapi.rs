use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Food Delivery API",
        version = "1.0.0",
        description = r#"
# Food Delivery API

Backend for a food ordering service: browse the menu, build a session cart,
and check out into a persisted order.

## Sessions

Cart endpoints are keyed by the `X-Session-Id` header. Omit it and the
response carries a freshly generated session id to reuse on later requests.

## Authentication

Checkout and order endpoints require a JWT issued by `/api/v1/auth/login`:

```
Authorization: Bearer <token>
```

## Pagination

List endpoints accept `page`, `per_page`, `search`, `sort_by` and
`sort_order` query parameters.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "catalog", description = "Menu browsing"),
        (name = "cart", description = "Session cart"),
        (name = "checkout", description = "Cart to order conversion"),
        (name = "orders", description = "Order history and lookup"),
        (name = "auth", description = "Registration and login"),
        (name = "admin", description = "Administrative endpoints"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::handlers::health::health_check,

        crate::handlers::catalog::list_dishes,
        crate::handlers::catalog::get_dish,
        crate::handlers::catalog::list_categories,
        crate::handlers::catalog::dishes_in_category,

        crate::handlers::carts::view_cart,
        crate::handlers::carts::add_to_cart,
        crate::handlers::carts::remove_from_cart,

        crate::handlers::checkout::checkout,

        crate::handlers::orders::list_my_orders,
        crate::handlers::orders::get_order,

        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::me,

        crate::handlers::admin::advance_order,
    ),
    components(
        schemas(
            crate::cart::Cart,
            crate::handlers::carts::AddToCartRequest,
            crate::handlers::checkout::CheckoutRequest,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_core_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Food Delivery API"));
        assert!(json.contains("/api/v1/cart"));
        assert!(json.contains("/api/v1/checkout"));
    }
}
