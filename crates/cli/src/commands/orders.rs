//! Order, cart item, and store commands.

use kivio_ecommerce_core::{OrderId, OrderItemId};
use tracing::info;

use super::{CommandError, Context, print_body, print_json};

pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    let body = creds
        .run(ctx.service.get_orders_raw(ctx.base_url(), creds.api_key()))
        .await?;
    print_body(&body);
    Ok(())
}

/// Create an order. Running this twice creates two orders.
pub async fn create(ctx: &Context, body: &[u8]) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    let created = creds
        .run(ctx.service.create_order(ctx.base_url(), creds.api_key(), body))
        .await?;
    print_body(&created);
    Ok(())
}

pub async fn update(ctx: &Context, order_id: OrderId, body: &[u8]) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    creds
        .run(ctx.service.update_order(
            ctx.base_url(),
            creds.api_key(),
            order_id,
            body,
        ))
        .await?;

    info!(order_id = %order_id, "Order updated");
    print_json(&serde_json::json!({ "orderId": order_id, "updated": true }))
}

pub async fn update_item_price(
    ctx: &Context,
    order_id: OrderId,
    item_id: OrderItemId,
    body: &[u8],
) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    creds
        .run(ctx.service.update_order_item_price(
            ctx.base_url(),
            creds.api_key(),
            order_id,
            item_id,
            body,
        ))
        .await?;

    info!(order_id = %order_id, item_id = %item_id, "Order item price updated");
    print_json(&serde_json::json!({ "orderId": order_id, "itemId": item_id, "updated": true }))
}

pub async fn add_cart_item(ctx: &Context, body: &[u8]) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    let created = creds
        .run(
            ctx.service
                .create_shopping_cart_item(ctx.base_url(), creds.api_key(), body),
        )
        .await?;
    print_body(&created);
    Ok(())
}

pub async fn list_stores(ctx: &Context) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    let body = creds
        .run(ctx.service.get_stores_raw(ctx.base_url(), creds.api_key()))
        .await?;
    print_body(&body);
    Ok(())
}
