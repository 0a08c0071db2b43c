//! Management commands. These hit authenticated backend endpoints that plain
//! customer accounts can also call on a development server; against
//! production they require staff credentials.

use rust_decimal::Decimal;

use doceria_client::api::types::{PedidoFilter, ProdutoCreate};
use doceria_client::state::AppState;
use doceria_core::{CategoriaId, ClienteId, PedidoStatus, format_brl};

pub async fn add_categoria(state: &AppState, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let categoria = state.api().create_categoria(name).await?;
    tracing::info!("Categoria {} criada (id {})", categoria.name, categoria.id);
    Ok(())
}

pub async fn add_produto(
    state: &AppState,
    name: &str,
    price: Decimal,
    categoria_id: i32,
    description: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let produto = state
        .api()
        .create_produto(&ProdutoCreate {
            name: name.to_owned(),
            description,
            price,
            category_id: CategoriaId::new(categoria_id),
        })
        .await?;

    tracing::info!(
        "Produto {} criado (id {}, {})",
        produto.name,
        produto.id,
        format_brl(produto.price)
    );
    Ok(())
}

pub async fn pedidos(
    state: &AppState,
    skip: u32,
    limit: u32,
    status: Option<PedidoStatus>,
    cliente_id: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = PedidoFilter {
        skip,
        limit,
        status,
        cliente_id: cliente_id.map(ClienteId::new),
    };
    let pedidos = state.api().list_pedidos(&filter).await?;

    if pedidos.is_empty() {
        tracing::info!("Nenhum pedido encontrado.");
        return Ok(());
    }

    for pedido in pedidos {
        tracing::info!(
            "{}  cliente {:>4}  {}  {:>10}  {}",
            pedido.order_number,
            pedido.cliente_id.as_i32(),
            pedido.placed_at.format("%d/%m/%Y"),
            format_brl(pedido.total),
            pedido.status.label(),
        );
    }
    Ok(())
}
