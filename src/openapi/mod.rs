use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Admin API",
        version = "0.1.0",
        description = r#"
# Inventory Admin

Read-only back-office view over the inventory and warehouse schema owned by
the stock-taking system: users, warehouses, products, teams, audit and count
sessions, transactions and pending transactions.

## Entities

Entity slugs are snake_case: `user`, `warehouse`, `product`, `team`,
`audit_session`, `count_session`, `transaction`, `pending_transaction`.

## Listing

- `page`: page number (default: 1)
- `per_page`: items per page (default: 100, max: 200)
- `q`: case-insensitive search over the entity's searchable fields
- `sort`: list field to order by, `-` prefix for descending
- any other key filters a filterable field by exact value, e.g. `?type=IN`

## Error Handling

```json
{
  "error": "Not Found",
  "message": "Not found: product 'p-404' does not exist",
  "request_id": "…",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    tags(
        (name = "catalog", description = "Schema-mapped record catalog"),
        (name = "reports", description = "Stock and transaction summaries")
    ),
    paths(
        crate::handlers::catalog::describe_catalog,
        crate::handlers::catalog::describe_entity,
        crate::handlers::catalog::list_records,
        crate::handlers::catalog::get_record,
        crate::handlers::catalog::list_filter_choices,
        crate::handlers::reports::summary_report,
    ),
    components(
        schemas(
            crate::catalog::EntityType,
            crate::catalog::FieldKind,
            crate::catalog::EntityInfo,
            crate::catalog::FieldInfo,
            crate::services::catalog::CatalogDescription,
            crate::services::catalog::SiteInfo,
            crate::services::catalog::RecordPage,
            crate::services::catalog::Record,
            crate::services::catalog::FieldValue,
            crate::services::catalog::ReferenceValue,
            crate::services::catalog::FieldChoices,
            crate::services::catalog::FilterChoice,
            crate::services::reports::SummaryReport,
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
