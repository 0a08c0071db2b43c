//! Catalog browsing commands.

use doceria_client::state::AppState;
use doceria_core::{KitId, ProdutoId, format_brl};

pub async fn categorias(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let categorias = state.api().list_categorias().await?;

    if categorias.is_empty() {
        tracing::info!("Nenhuma categoria cadastrada.");
        return Ok(());
    }

    for categoria in categorias {
        tracing::info!("{:>4}  {}", categoria.id.as_i32(), categoria.name);
    }
    Ok(())
}

pub async fn produtos(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let produtos = state.api().list_produtos().await?;

    if produtos.is_empty() {
        tracing::info!("Nenhum produto cadastrado.");
        return Ok(());
    }

    for produto in produtos {
        tracing::info!(
            "{:>4}  {:<40} {}",
            produto.id.as_i32(),
            produto.name,
            format_brl(produto.price)
        );
    }
    Ok(())
}

pub async fn kits(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let kits = state.api().list_kits().await?;

    if kits.is_empty() {
        tracing::info!("Nenhum kit cadastrado.");
        return Ok(());
    }

    for kit in kits {
        tracing::info!(
            "{:>4}  {:<40} {}",
            kit.id.as_i32(),
            kit.name,
            format_brl(kit.price)
        );
    }
    Ok(())
}

pub async fn produto(state: &AppState, id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let produto = state.api().get_produto(ProdutoId::new(id)).await?;

    tracing::info!("{} ({})", produto.name, format_brl(produto.price));
    if let Some(description) = &produto.description {
        tracing::info!("  {description}");
    }
    tracing::info!("  categoria: {}", produto.category_id);
    Ok(())
}

pub async fn kit(state: &AppState, id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let kit = state.api().get_kit(KitId::new(id)).await?;

    tracing::info!("{} ({})", kit.name, format_brl(kit.price));
    if let Some(description) = &kit.description {
        tracing::info!("  {description}");
    }
    Ok(())
}
