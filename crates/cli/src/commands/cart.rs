//! Local cart commands.

use doceria_client::cart::CartProduct;
use doceria_client::state::AppState;
use doceria_core::{ItemKind, KitId, ProdutoId, format_brl};

/// Fetch the catalog item and merge it into the cart.
pub async fn add(
    state: &AppState,
    id: i32,
    kind: ItemKind,
    qty: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = match kind {
        ItemKind::Produto => CartProduct::from(&state.api().get_produto(ProdutoId::new(id)).await?),
        ItemKind::Kit => CartProduct::from(&state.api().get_kit(KitId::new(id)).await?),
    };

    let name = product.name.clone();
    state.cart().add_item(&product, qty)?;
    tracing::info!("{name} adicionado ao carrinho");
    Ok(())
}

pub fn remove(state: &AppState, id: i32, kind: ItemKind) -> Result<(), Box<dyn std::error::Error>> {
    state.cart().remove_item(id, kind)?;
    tracing::info!("item removido do carrinho");
    Ok(())
}

pub fn set_qty(
    state: &AppState,
    id: i32,
    kind: ItemKind,
    qty: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    state.cart().update_quantity(id, kind, qty)?;
    tracing::info!("quantidade atualizada");
    Ok(())
}

pub fn list(state: &AppState) {
    let cart = state.cart();
    let items = cart.items();

    if items.is_empty() {
        tracing::info!("Seu carrinho está vazio.");
        return;
    }

    for item in &items {
        tracing::info!(
            "{:>2}x {:<40} {:>10}  [{} {}]",
            item.quantity,
            item.name,
            format_brl(item.line_total()),
            item.kind,
            item.id,
        );
    }
    tracing::info!(
        "{} itens - total {}",
        cart.item_count(),
        format_brl(cart.total())
    );
}

pub fn clear(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    state.cart().clear()?;
    tracing::info!("carrinho esvaziado");
    Ok(())
}
