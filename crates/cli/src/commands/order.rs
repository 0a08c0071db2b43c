//! Pedido commands: checkout from the cart, listing and tracking.

use doceria_client::api::types::{Pedido, PedidoCreate};
use doceria_client::state::AppState;
use doceria_core::{PedidoId, format_brl};

use crate::CheckoutArgs;

/// Turn the persisted cart into a pedido, then clear the cart.
pub async fn checkout(state: &AppState, args: CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cart = state.cart();
    if cart.is_empty() {
        return Err("o carrinho está vazio; adicione itens antes do checkout".into());
    }

    let cliente = state.account().resolve(state.api(), state.auth()).await?;

    let mut pedido = PedidoCreate::new(cliente.id, cart.format_for_order());
    pedido.delivery = args.delivery;
    pedido.delivery_date = args.date;
    pedido.delivery_time = args.time;
    pedido.payment_method = args.payment;
    pedido.change_for = args.change_for;
    pedido.notes = args.notes;

    let created = state.api().create_pedido(&pedido).await?;
    cart.clear()?;

    tracing::info!(
        "Pedido {} criado - total {}",
        created.order_number,
        format_brl(created.total)
    );
    tracing::info!("Acompanhe com: doceria order track {}", created.order_number);
    Ok(())
}

pub async fn list(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let cliente = state.account().resolve(state.api(), state.auth()).await?;
    let pedidos = state.api().list_pedidos_by_cliente(cliente.id).await?;

    if pedidos.is_empty() {
        tracing::info!("Você ainda não realizou nenhum pedido.");
        return Ok(());
    }

    for pedido in pedidos {
        tracing::info!(
            "{}  {}  {:>10}  {}",
            pedido.order_number,
            pedido.placed_at.format("%d/%m/%Y"),
            format_brl(pedido.total),
            pedido.status.label(),
        );
    }
    Ok(())
}

pub async fn show(state: &AppState, id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let pedido = state.api().get_pedido(PedidoId::new(id)).await?;
    print_pedido(&pedido);
    Ok(())
}

pub async fn track(state: &AppState, numero: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pedido = state.api().find_pedido_by_numero(numero).await?;
    print_pedido(&pedido);
    Ok(())
}

fn print_pedido(pedido: &Pedido) {
    tracing::info!(
        "Pedido {} - {} ({})",
        pedido.order_number,
        pedido.status.label(),
        pedido.delivery,
    );
    tracing::info!("  realizado em {}", pedido.placed_at.format("%d/%m/%Y %H:%M"));

    for item in &pedido.items {
        tracing::info!(
            "  {:>2}x {:<40} {:>10}",
            item.quantity,
            item.item_name,
            format_brl(item.subtotal),
        );
    }

    if pedido.delivery_fee > rust_decimal::Decimal::ZERO {
        tracing::info!("  taxa de entrega: {}", format_brl(pedido.delivery_fee));
    }
    if pedido.discount > rust_decimal::Decimal::ZERO {
        tracing::info!("  desconto: {}", format_brl(pedido.discount));
    }
    tracing::info!("  total: {}", format_brl(pedido.total));
}
