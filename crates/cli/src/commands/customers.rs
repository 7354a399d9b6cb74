//! Customer commands: lookup, creation, addresses, and carts.

use kivio_ecommerce_core::CustomerId;
use tracing::info;

use super::{CommandError, Context, print_body, print_json};

pub async fn list(ctx: &Context, raw: bool) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    if raw {
        let body = creds
            .run(ctx.service.get_customers_raw(ctx.base_url(), creds.api_key()))
            .await?;
        print_body(&body);
        return Ok(());
    }

    let customers = creds
        .run(ctx.service.get_customers(ctx.base_url(), creds.api_key()))
        .await?;
    print_json(&customers)
}

pub async fn get(ctx: &Context, id: &str) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    let customer = creds
        .run(ctx.service.get_customer_by_id(ctx.base_url(), creds.api_key(), id))
        .await?;
    print_json(&customer)
}

pub async fn create(ctx: &Context, body: &[u8]) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    let created = creds
        .run(ctx.service.create_customer(ctx.base_url(), creds.api_key(), body))
        .await?;
    print_body(&created);
    Ok(())
}

pub async fn create_billing_address(
    ctx: &Context,
    customer_id: CustomerId,
    body: &[u8],
) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    let created = creds
        .run(ctx.service.create_billing_address(
            ctx.base_url(),
            creds.api_key(),
            customer_id,
            body,
        ))
        .await?;
    print_body(&created);
    Ok(())
}

pub async fn create_shipping_address(
    ctx: &Context,
    customer_id: CustomerId,
    body: &[u8],
) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    let created = creds
        .run(ctx.service.create_shipping_address(
            ctx.base_url(),
            creds.api_key(),
            customer_id,
            body,
        ))
        .await?;
    print_body(&created);
    Ok(())
}

/// Empty a customer's cart.
pub async fn clear_cart(ctx: &Context, customer_id: CustomerId) -> Result<(), CommandError> {
    let creds = &ctx.credentials;

    creds
        .run(ctx.service.delete_customer_cart(
            ctx.base_url(),
            creds.api_key(),
            customer_id,
        ))
        .await?;

    info!(customer_id = %customer_id, "Cart cleared");
    print_json(&serde_json::json!({ "customerId": customer_id, "cleared": true }))
}
