//! Account dashboard, profile and payment commands.

use doceria_client::api::types::ClienteUpdate;
use doceria_client::state::AppState;
use doceria_core::{PagamentoId, format_brl};

use crate::ProfileArgs;

pub async fn dashboard(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = state.account().dashboard(state.api(), state.auth()).await?;

    tracing::info!("{} <{}>", dashboard.cliente.name, dashboard.cliente.email);
    tracing::info!("  pedidos:       {}", dashboard.stats.total);
    tracing::info!("  entregues:     {}", dashboard.stats.delivered);
    tracing::info!("  em andamento:  {}", dashboard.stats.open);
    tracing::info!("  total gasto:   {}", format_brl(dashboard.stats.total_spent));

    if dashboard.recent.is_empty() {
        tracing::info!("Você ainda não realizou nenhum pedido.");
        return Ok(());
    }

    tracing::info!("Pedidos recentes:");
    for pedido in &dashboard.recent {
        tracing::info!(
            "  {}  {}  {:>10}  {}",
            pedido.order_number,
            pedido.placed_at.format("%d/%m/%Y"),
            format_brl(pedido.total),
            pedido.status.label(),
        );
    }
    Ok(())
}

pub async fn update(state: &AppState, args: ProfileArgs) -> Result<(), Box<dyn std::error::Error>> {
    let changes = ClienteUpdate {
        name: args.name,
        phone: args.phone,
        address: args.address,
        number: args.number,
        neighborhood: args.neighborhood,
        city: args.city,
        state: args.state,
        postal_code: args.postal_code,
        ..ClienteUpdate::default()
    };

    let cliente = state
        .account()
        .update_profile(state.api(), state.auth(), &changes)
        .await?;
    tracing::info!("Cadastro atualizado para {}", cliente.name);
    Ok(())
}

pub async fn pagamentos(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let cliente = state.account().resolve(state.api(), state.auth()).await?;
    let pagamentos = state
        .api()
        .list_pagamentos_by_cliente(cliente.id, 0, 100)
        .await?;

    if pagamentos.is_empty() {
        tracing::info!("Nenhum pagamento registrado.");
        return Ok(());
    }

    for pagamento in pagamentos {
        tracing::info!(
            "{:>4}  {}  {:>10}  {}  {}",
            pagamento.id.as_i32(),
            pagamento.order_number.as_deref().unwrap_or("-"),
            format_brl(pagamento.amount),
            pagamento.payment_method,
            pagamento.status.label(),
        );
    }
    Ok(())
}

pub async fn pagamento(state: &AppState, id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let pagamento = state.api().get_pagamento(PagamentoId::new(id)).await?;

    tracing::info!(
        "Pagamento {} - {} ({})",
        pagamento.id,
        format_brl(pagamento.amount),
        pagamento.status.label()
    );
    tracing::info!("  forma: {}", pagamento.payment_method);
    if pagamento.installments > 1 {
        tracing::info!("  parcelas: {}", pagamento.installments);
    }
    if let Some(paid_at) = pagamento.paid_at {
        tracing::info!("  pago em: {}", paid_at.format("%d/%m/%Y %H:%M"));
    }
    if let Some(reason) = &pagamento.refusal_reason {
        tracing::info!("  recusado: {reason}");
    }
    Ok(())
}

pub async fn historico(state: &AppState, id: i32) -> Result<(), Box<dyn std::error::Error>> {
    let entries = state
        .api()
        .get_pagamento_historico(PagamentoId::new(id))
        .await?;

    if entries.is_empty() {
        tracing::info!("Sem histórico para este pagamento.");
        return Ok(());
    }

    for entry in entries {
        let from = entry
            .previous_status
            .map_or("-", doceria_core::PagamentoStatus::label);
        tracing::info!(
            "{}  {} -> {}  {}",
            entry.changed_at.format("%d/%m/%Y %H:%M"),
            from,
            entry.new_status.label(),
            entry.description.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}
