//! Wire types mirroring the backend's schemas.
//!
//! The backend speaks Portuguese on the wire; struct fields carry English
//! names and `#[serde(rename)]` to the wire names. Monetary values are JSON
//! numbers, handled as [`Decimal`] through `rust_decimal::serde::float`.
//! Backend timestamps are naive ISO-8601 (no offset), hence
//! [`NaiveDateTime`].

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use doceria_core::{
    CategoriaId, ClienteId, ContatoId, FormaPagamento, KitId, PagamentoId, PagamentoStatus,
    PedidoId, PedidoStatus, ProdutoId, TipoEntrega, UserId,
};

// =============================================================================
// Auth
// =============================================================================

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// Decoded JWT payload. All claims optional: the token stays opaque and a
/// payload we cannot use simply yields no user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    pub id: Option<i32>,
    pub email: Option<String>,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub exp: Option<i64>,
}

/// Message-only responses (`/auth/register`, `/auth/change-password`).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthMessage {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(rename = "senha")]
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    #[serde(rename = "nome")]
    pub name: &'a str,
    pub email: &'a str,
    #[serde(rename = "senha")]
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChangePasswordRequest<'a> {
    #[serde(rename = "senha_atual")]
    pub current_password: &'a str,
    #[serde(rename = "nova_senha")]
    pub new_password: &'a str,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Categoria {
    pub id: CategoriaId,
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Produto {
    pub id: ProdutoId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "categoria_id")]
    pub category_id: CategoriaId,
}

/// Body of `POST /produtos/`.
#[derive(Debug, Clone, Serialize)]
pub struct ProdutoCreate {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "categoria_id")]
    pub category_id: CategoriaId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kit {
    pub id: KitId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

// =============================================================================
// Clientes
// =============================================================================

/// Full customer record (`GET /clientes/{id}`, `GET /clientes/por-email`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    pub id: ClienteId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub cpf: Option<String>,
    #[serde(rename = "endereco")]
    pub address: Option<String>,
    #[serde(rename = "numero")]
    pub number: Option<String>,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
    #[serde(rename = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    #[serde(rename = "estado")]
    pub state: Option<String>,
    #[serde(rename = "cep")]
    pub postal_code: Option<String>,
    #[serde(rename = "data_nascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "data_cadastro")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "data_atualizacao")]
    pub updated_at: NaiveDateTime,
}

/// Summary shape returned by listings and `GET /clientes/buscar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClienteResumo {
    pub id: ClienteId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "ativo")]
    pub active: bool,
}

/// Body of `POST /clientes/`. Blank optionals are omitted entirely - the
/// backend validates present fields (phone digits, CPF length) even when
/// empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClienteCreate {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "numero", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "complemento", skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(rename = "bairro", skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "cep", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(rename = "data_nascimento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /clientes/{id}` - partial update, absent fields untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClienteUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "numero", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "complemento", skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(rename = "bairro", skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cidade", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "cep", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(rename = "data_nascimento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "ativo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

// =============================================================================
// Pedidos
// =============================================================================

/// One order line as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPedido {
    pub id: i32,
    pub produto_id: Option<ProdutoId>,
    pub kit_id: Option<KitId>,
    #[serde(rename = "nome_item")]
    pub item_name: String,
    #[serde(rename = "descricao_item")]
    pub item_description: Option<String>,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "preco_unitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

/// One order line in a `POST /pedidos/` body.
///
/// Exactly one of `produto_id`/`kit_id` is populated; the other serializes as
/// an explicit `null`, which is what the backend schema expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPedidoCreate {
    pub produto_id: Option<ProdutoId>,
    pub kit_id: Option<KitId>,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

/// Body of `POST /pedidos/`.
#[derive(Debug, Clone, Serialize)]
pub struct PedidoCreate {
    pub cliente_id: ClienteId,
    #[serde(rename = "tipo_entrega")]
    pub delivery: TipoEntrega,
    #[serde(rename = "data_entrega", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(rename = "hora_entrega", skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(rename = "usar_endereco_cliente")]
    pub use_cliente_address: bool,
    #[serde(rename = "endereco_entrega", skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(rename = "numero_entrega", skip_serializing_if = "Option::is_none")]
    pub delivery_number: Option<String>,
    #[serde(
        rename = "complemento_entrega",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_complement: Option<String>,
    #[serde(rename = "bairro_entrega", skip_serializing_if = "Option::is_none")]
    pub delivery_neighborhood: Option<String>,
    #[serde(rename = "cidade_entrega", skip_serializing_if = "Option::is_none")]
    pub delivery_city: Option<String>,
    #[serde(rename = "estado_entrega", skip_serializing_if = "Option::is_none")]
    pub delivery_state: Option<String>,
    #[serde(rename = "cep_entrega", skip_serializing_if = "Option::is_none")]
    pub delivery_postal_code: Option<String>,
    #[serde(rename = "forma_pagamento", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<FormaPagamento>,
    #[serde(
        rename = "troco_para",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub change_for: Option<Decimal>,
    #[serde(rename = "itens")]
    pub items: Vec<ItemPedidoCreate>,
    #[serde(rename = "desconto", with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(rename = "taxa_entrega", with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PedidoCreate {
    /// Minimal order for `cliente_id` with the given lines: delivery to the
    /// customer's own address, no discount, no fee.
    #[must_use]
    pub fn new(cliente_id: ClienteId, items: Vec<ItemPedidoCreate>) -> Self {
        Self {
            cliente_id,
            delivery: TipoEntrega::Entrega,
            delivery_date: None,
            delivery_time: None,
            use_cliente_address: true,
            delivery_address: None,
            delivery_number: None,
            delivery_complement: None,
            delivery_neighborhood: None,
            delivery_city: None,
            delivery_state: None,
            delivery_postal_code: None,
            payment_method: None,
            change_for: None,
            items,
            discount: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            notes: None,
        }
    }
}

/// Full order record (`GET /pedidos/{id}`, `GET /pedidos/numero/{numero}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pedido {
    pub id: PedidoId,
    #[serde(rename = "numero_pedido")]
    pub order_number: String,
    pub cliente_id: ClienteId,
    pub status: PedidoStatus,
    #[serde(rename = "tipo_entrega")]
    pub delivery: TipoEntrega,
    #[serde(rename = "data_pedido")]
    pub placed_at: NaiveDateTime,
    #[serde(rename = "data_entrega")]
    pub delivery_date: Option<String>,
    #[serde(rename = "hora_entrega")]
    pub delivery_time: Option<String>,
    #[serde(rename = "endereco_entrega")]
    pub delivery_address: Option<String>,
    #[serde(rename = "numero_entrega")]
    pub delivery_number: Option<String>,
    #[serde(rename = "complemento_entrega")]
    pub delivery_complement: Option<String>,
    #[serde(rename = "bairro_entrega")]
    pub delivery_neighborhood: Option<String>,
    #[serde(rename = "cidade_entrega")]
    pub delivery_city: Option<String>,
    #[serde(rename = "estado_entrega")]
    pub delivery_state: Option<String>,
    #[serde(rename = "cep_entrega")]
    pub delivery_postal_code: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(rename = "desconto", with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(rename = "taxa_entrega", with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "forma_pagamento")]
    pub payment_method: Option<FormaPagamento>,
    #[serde(rename = "troco_para", with = "rust_decimal::serde::float_option")]
    pub change_for: Option<Decimal>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "itens")]
    pub items: Vec<ItemPedido>,
    #[serde(rename = "data_criacao")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "data_atualizacao")]
    pub updated_at: NaiveDateTime,
}

/// Summary shape returned by order listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedidoResumo {
    pub id: PedidoId,
    #[serde(rename = "numero_pedido")]
    pub order_number: String,
    pub cliente_id: ClienteId,
    pub status: PedidoStatus,
    #[serde(rename = "tipo_entrega")]
    pub delivery: TipoEntrega,
    #[serde(rename = "data_pedido")]
    pub placed_at: NaiveDateTime,
    #[serde(rename = "data_entrega")]
    pub delivery_date: Option<String>,
    #[serde(rename = "hora_entrega")]
    pub delivery_time: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "forma_pagamento")]
    pub payment_method: Option<FormaPagamento>,
}

/// Filters for `GET /pedidos/`.
#[derive(Debug, Clone)]
pub struct PedidoFilter {
    pub skip: u32,
    pub limit: u32,
    pub status: Option<PedidoStatus>,
    pub cliente_id: Option<ClienteId>,
}

impl Default for PedidoFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
            status: None,
            cliente_id: None,
        }
    }
}

// =============================================================================
// Pagamentos
// =============================================================================

/// Full payment record (`GET /pagamentos/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagamento {
    pub id: PagamentoId,
    pub pedido_id: PedidoId,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "valor_pago", with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    #[serde(rename = "troco", with = "rust_decimal::serde::float")]
    pub change: Decimal,
    #[serde(rename = "forma_pagamento")]
    pub payment_method: FormaPagamento,
    pub status: PagamentoStatus,
    #[serde(rename = "bandeira_cartao")]
    pub card_brand: Option<String>,
    #[serde(rename = "ultimos_digitos")]
    pub last_digits: Option<String>,
    #[serde(rename = "parcelas")]
    pub installments: u32,
    #[serde(rename = "chave_pix")]
    pub pix_key: Option<String>,
    #[serde(rename = "codigo_pix")]
    pub pix_code: Option<String>,
    #[serde(rename = "codigo_transacao")]
    pub transaction_code: Option<String>,
    #[serde(rename = "codigo_autorizacao")]
    pub authorization_code: Option<String>,
    pub nsu: Option<String>,
    #[serde(rename = "data_criacao")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "data_pagamento")]
    pub paid_at: Option<NaiveDateTime>,
    #[serde(rename = "data_estorno")]
    pub refunded_at: Option<NaiveDateTime>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "motivo_recusa")]
    pub refusal_reason: Option<String>,
    #[serde(rename = "motivo_estorno")]
    pub refund_reason: Option<String>,
    #[serde(rename = "numero_pedido", default)]
    pub order_number: Option<String>,
}

/// Summary shape returned by payment listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagamentoResumo {
    pub id: PagamentoId,
    pub pedido_id: PedidoId,
    #[serde(rename = "valor", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "forma_pagamento")]
    pub payment_method: FormaPagamento,
    pub status: PagamentoStatus,
    #[serde(rename = "parcelas")]
    pub installments: u32,
    #[serde(rename = "data_criacao")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "data_pagamento")]
    pub paid_at: Option<NaiveDateTime>,
    #[serde(rename = "numero_pedido", default)]
    pub order_number: Option<String>,
}

/// One entry of `GET /pagamentos/{id}/historico`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricoPagamento {
    pub id: i32,
    pub pagamento_id: PagamentoId,
    #[serde(rename = "status_anterior")]
    pub previous_status: Option<PagamentoStatus>,
    #[serde(rename = "status_novo")]
    pub new_status: PagamentoStatus,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub usuario_id: Option<UserId>,
    #[serde(rename = "data_alteracao")]
    pub changed_at: NaiveDateTime,
}

// =============================================================================
// Contato
// =============================================================================

/// Body of `POST /contato/` (event inquiry form).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContatoCreate {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "numero_pessoas", skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,
    #[serde(rename = "tipo_evento", skip_serializing_if = "Option::is_none")]
    pub event_kind: Option<String>,
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "local", skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(rename = "observacao", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Acknowledged contact record.
#[derive(Debug, Clone, Deserialize)]
pub struct Contato {
    pub id: ContatoId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_produto_parses_wire_shape() {
        let produto: Produto = serde_json::from_str(
            r#"{"id":1,"nome":"Bolo de Chocolate","descricao":"Chocolate belga","preco":89.9,"categoria_id":2}"#,
        )
        .unwrap();
        assert_eq!(produto.name, "Bolo de Chocolate");
        assert_eq!(produto.price, Decimal::new(899, 1));
        assert_eq!(produto.category_id, CategoriaId::new(2));
    }

    #[test]
    fn test_cliente_parses_naive_timestamps() {
        let cliente: Cliente = serde_json::from_str(
            r#"{
                "id": 7, "nome": "Maria", "email": "maria@example.com",
                "telefone": null, "cpf": null, "endereco": null, "numero": null,
                "complemento": null, "bairro": null, "cidade": null,
                "estado": null, "cep": null, "data_nascimento": null,
                "observacoes": null, "ativo": true,
                "data_cadastro": "2024-03-10T14:30:00",
                "data_atualizacao": "2024-03-10T14:30:00"
            }"#,
        )
        .unwrap();
        assert_eq!(cliente.id, ClienteId::new(7));
        assert!(cliente.active);
    }

    #[test]
    fn test_cliente_create_omits_blank_optionals() {
        let input = ClienteCreate {
            name: "Maria".to_owned(),
            email: "maria@example.com".to_owned(),
            ..ClienteCreate::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["nome"], "Maria");
        assert!(!object.contains_key("telefone"));
    }

    #[test]
    fn test_item_pedido_create_serializes_explicit_nulls() {
        let line = ItemPedidoCreate {
            produto_id: None,
            kit_id: Some(KitId::new(3)),
            quantity: 2,
            notes: None,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert!(json["produto_id"].is_null());
        assert_eq!(json["kit_id"], 3);
        assert_eq!(json["quantidade"], 2);
        assert!(json["observacoes"].is_null());
    }

    #[test]
    fn test_pedido_create_minimal_shape() {
        let pedido = PedidoCreate::new(ClienteId::new(1), Vec::new());
        let json = serde_json::to_value(&pedido).unwrap();
        assert_eq!(json["cliente_id"], 1);
        assert_eq!(json["tipo_entrega"], "entrega");
        assert_eq!(json["usar_endereco_cliente"], true);
        assert_eq!(json["desconto"], 0.0);
        assert!(json.get("forma_pagamento").is_none());
        assert!(json.get("troco_para").is_none());
    }

    #[test]
    fn test_pedido_resumo_parses_wire_shape() {
        let resumo: PedidoResumo = serde_json::from_str(
            r#"{
                "id": 12, "numero_pedido": "PED-0012", "cliente_id": 7,
                "status": "saiu_entrega", "tipo_entrega": "entrega",
                "data_pedido": "2024-03-11T09:00:00",
                "data_entrega": null, "hora_entrega": null,
                "total": 150.5, "forma_pagamento": "pix"
            }"#,
        )
        .unwrap();
        assert_eq!(resumo.status, PedidoStatus::SaiuEntrega);
        assert_eq!(resumo.payment_method, Some(FormaPagamento::Pix));
        assert_eq!(resumo.total, Decimal::new(1505, 1));
    }
}
