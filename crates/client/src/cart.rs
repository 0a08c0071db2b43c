//! Client-local shopping cart.
//!
//! The cart is an ordered list of line items keyed by `(id, kind)`, persisted
//! whole under one storage key. Adding an item that is already present merges
//! by adding quantities. Every mutating call persists the whole list and
//! notifies listeners synchronously.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use doceria_core::{ItemKind, KitId, ProdutoId};

use crate::api::types::{ItemPedidoCreate, Kit, Produto};
use crate::listeners::{Listeners, Subscription};
use crate::storage::{KeyValueStore, StorageError, keys};

/// What goes into the cart: the catalog attributes of a produto or kit.
#[derive(Debug, Clone)]
pub struct CartProduct {
    pub id: i32,
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
}

impl From<&Produto> for CartProduct {
    fn from(produto: &Produto) -> Self {
        Self {
            id: produto.id.as_i32(),
            kind: ItemKind::Produto,
            name: produto.name.clone(),
            description: produto.description.clone().unwrap_or_default(),
            price: produto.price,
            image: None,
        }
    }
}

impl From<&Kit> for CartProduct {
    fn from(kit: &Kit) -> Self {
        Self {
            id: kit.id.as_i32(),
            kind: ItemKind::Kit,
            name: kit.name.clone(),
            description: kit.description.clone().unwrap_or_default(),
            price: kit.price,
            image: None,
        }
    }
}

/// One cart line. Identity is `(id, kind)`.
///
/// The serialized shape matches what the persisted cart has always looked
/// like (`type`, `observacoes`), so an existing stored cart keeps working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(
        rename = "observacoes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl CartItem {
    /// Line total: price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Event broadcast after every cart mutation, carrying the new item list.
#[derive(Debug, Clone)]
pub struct CartUpdated {
    pub items: Vec<CartItem>,
}

/// Storage-persisted shopping cart with merge-by-key add semantics.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn KeyValueStore>,
    listeners: Listeners<CartUpdated>,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                listeners: Listeners::new(),
            }),
        }
    }

    /// Register a listener for [`CartUpdated`] events.
    pub fn on_change(
        &self,
        listener: impl Fn(&CartUpdated) + Send + Sync + 'static,
    ) -> Subscription<CartUpdated> {
        self.inner.listeners.subscribe(listener)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Current items, read from the store on every call so external writes
    /// are visible. A corrupt stored value reads as an empty cart.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.inner.storage.get(keys::CART).map_or_else(Vec::new, |raw| {
            serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(%err, "stored cart is unreadable; treating as empty");
                Vec::new()
            })
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Sum of price × quantity over all items; zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items().iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all items (the badge number).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items().iter().map(|item| item.quantity).sum()
    }

    /// Project the cart into order lines: exactly one of `produto_id` /
    /// `kit_id` per line, based on the item kind.
    #[must_use]
    pub fn format_for_order(&self) -> Vec<ItemPedidoCreate> {
        self.items()
            .iter()
            .map(|item| ItemPedidoCreate {
                produto_id: (item.kind == ItemKind::Produto).then(|| ProdutoId::new(item.id)),
                kit_id: (item.kind == ItemKind::Kit).then(|| KitId::new(item.id)),
                quantity: item.quantity,
                notes: item.notes.clone(),
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add `quantity` of a product (merging with an existing `(id, kind)`
    /// line), persist, notify. A zero quantity counts as one.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails; the cart is unchanged.
    pub fn add_item(&self, product: &CartProduct, quantity: u32) -> Result<(), StorageError> {
        let quantity = quantity.max(1);
        let mut items = self.items();

        if let Some(item) = items
            .iter_mut()
            .find(|item| item.id == product.id && item.kind == product.kind)
        {
            item.quantity += quantity;
        } else {
            items.push(CartItem {
                id: product.id,
                kind: product.kind,
                name: product.name.clone(),
                description: product.description.clone(),
                price: product.price,
                quantity,
                image: product.image.clone(),
                notes: None,
            });
        }

        tracing::debug!(name = %product.name, quantity, "added to cart");
        self.save(&items)
    }

    /// Remove the `(id, kind)` line. Persists and notifies even when the
    /// item was absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn remove_item(&self, id: i32, kind: ItemKind) -> Result<(), StorageError> {
        let mut items = self.items();
        items.retain(|item| !(item.id == id && item.kind == kind));
        self.save(&items)
    }

    /// Overwrite the quantity of the `(id, kind)` line. Zero is equivalent
    /// to removal. No-op when the item is absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails.
    pub fn update_quantity(&self, id: i32, kind: ItemKind, quantity: u32) -> Result<(), StorageError> {
        if quantity == 0 {
            return self.remove_item(id, kind);
        }

        let mut items = self.items();
        match items
            .iter_mut()
            .find(|item| item.id == id && item.kind == kind)
        {
            Some(item) => {
                item.quantity = quantity;
                self.save(&items)
            }
            None => Ok(()),
        }
    }

    /// Empty the cart, persist, notify.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the removal fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.inner.storage.remove(keys::CART)?;
        self.inner.listeners.emit(&CartUpdated { items: Vec::new() });
        Ok(())
    }

    /// Whole-list replacement write, then notify.
    fn save(&self, items: &[CartItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.inner.storage.set(keys::CART, &raw)?;
        self.inner.listeners.emit(&CartUpdated {
            items: items.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store() -> CartStore {
        CartStore::new(Arc::new(MemoryStore::new()))
    }

    fn brigadeiro() -> CartProduct {
        CartProduct {
            id: 1,
            kind: ItemKind::Produto,
            name: "Brigadeiros (50un)".to_owned(),
            description: "Brigadeiros tradicionais".to_owned(),
            price: Decimal::new(7500, 2),
            image: None,
        }
    }

    fn kit_festa() -> CartProduct {
        CartProduct {
            id: 1,
            kind: ItemKind::Kit,
            name: "Kit Festa".to_owned(),
            description: String::new(),
            price: Decimal::new(18000, 2),
            image: None,
        }
    }

    #[test]
    fn test_add_same_identity_merges_quantities() {
        let cart = store();
        cart.add_item(&brigadeiro(), 2).unwrap();
        cart.add_item(&brigadeiro(), 3).unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_same_id_different_kind_are_distinct_lines() {
        let cart = store();
        cart.add_item(&brigadeiro(), 1).unwrap();
        cart.add_item(&kit_festa(), 1).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let cart = store();
        cart.add_item(&brigadeiro(), 0).unwrap();
        assert_eq!(cart.items().first().unwrap().quantity, 1);
    }

    #[test]
    fn test_update_quantity_zero_is_removal() {
        let cart = store();
        cart.add_item(&brigadeiro(), 2).unwrap();
        cart.update_quantity(1, ItemKind::Produto, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_overwrites() {
        let cart = store();
        cart.add_item(&brigadeiro(), 2).unwrap();
        cart.update_quantity(1, ItemKind::Produto, 7).unwrap();
        assert_eq!(cart.items().first().unwrap().quantity, 7);
    }

    #[test]
    fn test_update_quantity_absent_item_is_noop() {
        let cart = store();
        cart.add_item(&brigadeiro(), 2).unwrap();

        let events = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&events);
        let _sub = cart.on_change(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        cart.update_quantity(99, ItemKind::Produto, 3).unwrap();
        assert_eq!(events.load(Ordering::SeqCst), 0);
        assert_eq!(cart.items().first().unwrap().quantity, 2);
    }

    #[test]
    fn test_remove_item() {
        let cart = store();
        cart.add_item(&brigadeiro(), 2).unwrap();
        cart.add_item(&kit_festa(), 1).unwrap();

        cart.remove_item(1, ItemKind::Produto).unwrap();
        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().kind, ItemKind::Kit);
    }

    #[test]
    fn test_total_sums_price_times_quantity() {
        let cart = store();
        assert_eq!(cart.total(), Decimal::ZERO);

        cart.add_item(&brigadeiro(), 2).unwrap(); // 2 × 75.00
        cart.add_item(&kit_festa(), 1).unwrap(); // 1 × 180.00
        assert_eq!(cart.total(), Decimal::new(33000, 2));
    }

    #[test]
    fn test_clear_empties_and_notifies() {
        let cart = store();
        cart.add_item(&brigadeiro(), 2).unwrap();

        let events = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&events);
        let _sub = cart.on_change(move |update| {
            assert!(update.items.is_empty());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        cart.clear().unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_format_for_order_produto_kit_mirror() {
        let cart = store();
        cart.add_item(&brigadeiro(), 2).unwrap();
        cart.add_item(&kit_festa(), 1).unwrap();

        let lines = cart.format_for_order();
        assert_eq!(lines.len(), 2);

        let produto_line = lines.first().unwrap();
        assert_eq!(produto_line.produto_id, Some(ProdutoId::new(1)));
        assert_eq!(produto_line.kit_id, None);
        assert_eq!(produto_line.quantity, 2);

        let kit_line = lines.get(1).unwrap();
        assert_eq!(kit_line.produto_id, None);
        assert_eq!(kit_line.kit_id, Some(KitId::new(1)));
        assert_eq!(kit_line.quantity, 1);
    }

    #[test]
    fn test_mutation_notifies_with_items() {
        let cart = store();
        let events = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&events);
        let _sub = cart.on_change(move |update| {
            assert_eq!(update.items.len(), 1);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        cart.add_item(&brigadeiro(), 1).unwrap();
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_corrupt_stored_cart_reads_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(keys::CART, "not json").unwrap();
        let cart = CartStore::new(storage);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_persisted_wire_shape() {
        let storage = Arc::new(MemoryStore::new());
        let cart = CartStore::new(Arc::clone(&storage) as Arc<dyn KeyValueStore>);
        cart.add_item(&kit_festa(), 1).unwrap();

        let raw = storage.get(keys::CART).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let line = json.as_array().unwrap().first().unwrap();
        assert_eq!(line["type"], "kit");
        assert_eq!(line["quantity"], 1);
        assert_eq!(line["price"], 180.0);
    }
}
