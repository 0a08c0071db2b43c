//! Status and kind enums for catalog, order, and payment entities.
//!
//! The backend speaks lowercase Portuguese snake_case on the wire
//! (`"em_preparo"`, `"cartao_credito"`). Unknown values must not break
//! deserialization of otherwise valid records, so the order and payment
//! status enums carry a `Desconhecido` catch-all mapped via `#[serde(other)]`
//! and every status-to-presentation mapping defines a default arm.

use serde::{Deserialize, Serialize};

/// Kind of sellable item: a single product or a bundled kit.
///
/// Cart identity is `(id, kind)` - a produto and a kit may share a numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Produto,
    Kit,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Produto => write!(f, "produto"),
            Self::Kit => write!(f, "kit"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "produto" => Ok(Self::Produto),
            "kit" => Ok(Self::Kit),
            _ => Err(format!("invalid item kind: {s}")),
        }
    }
}

/// Lifecycle status of a Pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PedidoStatus {
    #[default]
    Pendente,
    Confirmado,
    EmPreparo,
    Pronto,
    SaiuEntrega,
    Entregue,
    Cancelado,
    /// Catch-all for wire values introduced after this client shipped.
    #[serde(other)]
    Desconhecido,
}

impl PedidoStatus {
    /// Human-readable pt-BR label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::Confirmado => "Confirmado",
            Self::EmPreparo => "Em Preparo",
            Self::Pronto => "Pronto",
            Self::SaiuEntrega => "Saiu para Entrega",
            Self::Entregue => "Entregue",
            Self::Cancelado => "Cancelado",
            Self::Desconhecido => "Desconhecido",
        }
    }

    /// Presentation badge for this status.
    ///
    /// Unknown statuses render as pending, matching how the dashboard treats
    /// values it has never seen.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        match self {
            Self::Confirmado => StatusBadge::Confirmed,
            Self::EmPreparo => StatusBadge::Preparing,
            Self::Pronto => StatusBadge::Ready,
            Self::SaiuEntrega => StatusBadge::Delivering,
            Self::Entregue => StatusBadge::Delivered,
            Self::Cancelado => StatusBadge::Cancelled,
            Self::Pendente | Self::Desconhecido => StatusBadge::Pending,
        }
    }

    /// True while the order is still in flight (counted as "pending" on the
    /// dashboard): pendente, confirmado, em_preparo, pronto, saiu_entrega.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            Self::Pendente | Self::Confirmado | Self::EmPreparo | Self::Pronto | Self::SaiuEntrega
        )
    }
}

impl std::fmt::Display for PedidoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pendente => "pendente",
            Self::Confirmado => "confirmado",
            Self::EmPreparo => "em_preparo",
            Self::Pronto => "pronto",
            Self::SaiuEntrega => "saiu_entrega",
            Self::Entregue => "entregue",
            Self::Cancelado => "cancelado",
            Self::Desconhecido => "desconhecido",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PedidoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(Self::Pendente),
            "confirmado" => Ok(Self::Confirmado),
            "em_preparo" => Ok(Self::EmPreparo),
            "pronto" => Ok(Self::Pronto),
            "saiu_entrega" => Ok(Self::SaiuEntrega),
            "entregue" => Ok(Self::Entregue),
            "cancelado" => Ok(Self::Cancelado),
            _ => Err(format!("invalid pedido status: {s}")),
        }
    }
}

/// Presentation badge styles for order statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBadge {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivering,
    Delivered,
    Cancelled,
}

impl StatusBadge {
    /// CSS class used by web surfaces for this badge.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Pending => "status-pending",
            Self::Confirmed => "status-confirmed",
            Self::Preparing => "status-preparing",
            Self::Ready => "status-ready",
            Self::Delivering => "status-delivering",
            Self::Delivered => "status-delivered",
            Self::Cancelled => "status-cancelled",
        }
    }
}

/// How a Pedido reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TipoEntrega {
    #[default]
    Entrega,
    Retirada,
}

impl std::fmt::Display for TipoEntrega {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entrega => write!(f, "entrega"),
            Self::Retirada => write!(f, "retirada"),
        }
    }
}

impl std::str::FromStr for TipoEntrega {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrega" => Ok(Self::Entrega),
            "retirada" => Ok(Self::Retirada),
            _ => Err(format!("invalid tipo de entrega: {s}")),
        }
    }
}

/// Payment method accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormaPagamento {
    Dinheiro,
    Pix,
    CartaoCredito,
    CartaoDebito,
    Transferencia,
    Boleto,
}

impl std::fmt::Display for FormaPagamento {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Dinheiro => "dinheiro",
            Self::Pix => "pix",
            Self::CartaoCredito => "cartao_credito",
            Self::CartaoDebito => "cartao_debito",
            Self::Transferencia => "transferencia",
            Self::Boleto => "boleto",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for FormaPagamento {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dinheiro" => Ok(Self::Dinheiro),
            "pix" => Ok(Self::Pix),
            "cartao_credito" => Ok(Self::CartaoCredito),
            "cartao_debito" => Ok(Self::CartaoDebito),
            "transferencia" => Ok(Self::Transferencia),
            "boleto" => Ok(Self::Boleto),
            _ => Err(format!("invalid forma de pagamento: {s}")),
        }
    }
}

/// Lifecycle status of a Pagamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PagamentoStatus {
    #[default]
    Pendente,
    Processando,
    Aprovado,
    Recusado,
    Estornado,
    Cancelado,
    #[serde(other)]
    Desconhecido,
}

impl PagamentoStatus {
    /// Human-readable pt-BR label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::Processando => "Processando",
            Self::Aprovado => "Aprovado",
            Self::Recusado => "Recusado",
            Self::Estornado => "Estornado",
            Self::Cancelado => "Cancelado",
            Self::Desconhecido => "Desconhecido",
        }
    }
}
