//! Catalog commands: item listing, lookup, counting, and stock.

use kivio_ecommerce_client::ItemFilters;
use tracing::info;

use super::{CommandError, Context, print_body, print_json};

/// List one page of items.
///
/// With a name filter or `raw`, storefront records are printed unmapped;
/// otherwise only sellable items are shown.
pub async fn list(
    ctx: &Context,
    page: u32,
    limit: u32,
    name: Option<String>,
    raw: bool,
) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    if raw || name.is_some() {
        let filters = ItemFilters { name };
        let body = creds
            .run(ctx.service.get_items_raw(
                ctx.base_url(),
                creds.api_key(),
                page,
                limit,
                true,
                &filters,
            ))
            .await?;
        print_body(&body);
        return Ok(());
    }

    let items = creds
        .run(ctx.service.get_items(ctx.base_url(), creds.api_key(), page, limit))
        .await?;
    print_json(&items)
}

/// Sweep the whole catalog.
pub async fn all(ctx: &Context, raw: bool) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    if raw {
        let body = creds
            .run(ctx.service.get_all_items_raw(ctx.base_url(), creds.api_key()))
            .await?;
        print_body(&body);
        return Ok(());
    }

    let items = creds
        .run(ctx.service.get_all_items(ctx.base_url(), creds.api_key()))
        .await?;
    info!(count = items.len(), "Fetched sellable items");
    print_json(&items)
}

/// Get one item.
pub async fn get(ctx: &Context, id: &str, raw: bool) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    if raw {
        let body = creds
            .run(ctx.service.get_item_by_id_raw(ctx.base_url(), creds.api_key(), id))
            .await?;
        print_body(&body);
        return Ok(());
    }

    let item = creds
        .run(ctx.service.get_item_by_id(ctx.base_url(), creds.api_key(), id))
        .await?;
    print_json(&item)
}

pub async fn count(ctx: &Context, name: Option<String>) -> Result<(), CommandError> {
    let creds = &ctx.credentials;
    let filters = ItemFilters { name };

    let count = creds
        .run(ctx.service.count_items(ctx.base_url(), creds.api_key(), &filters))
        .await?;
    print_json(&serde_json::json!({ "count": count }))
}

pub async fn set_stock(ctx: &Context, id: &str, quantity: i64) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    creds
        .run(
            ctx.service
                .update_item_stock(ctx.base_url(), creds.api_key(), id, quantity),
        )
        .await?;

    info!(item_id = id, quantity, "Stock updated");
    print_json(&serde_json::json!({ "itemId": id, "stockQuantity": quantity }))
}
