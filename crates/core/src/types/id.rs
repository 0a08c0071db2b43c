//! Type-safe entity IDs.
//!
//! The backend hands out plain integer primary keys; wrapping each entity's
//! key in its own newtype keeps a `ClienteId` from ever being passed where a
//! `PedidoId` belongs. [`define_id!`] stamps out the wrappers.

/// Define an `i32`-backed ID newtype.
///
/// The generated type is `Copy`, hashable, ordered, and serializes
/// transparently as the raw integer. `Display` delegates to `i32`, so width
/// and alignment flags work in format strings.
///
/// ```
/// # use doceria_core::define_id;
/// define_id!(
///     /// Example entity.
///     WidgetId
/// );
///
/// let id = WidgetId::new(42);
/// assert_eq!(id.as_i32(), 42);
/// assert_eq!(format!("{id:>5}"), "   42");
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Backend auth user (token subject).
    UserId
);
define_id!(
    /// Catalog category.
    CategoriaId
);
define_id!(
    /// Sellable product.
    ProdutoId
);
define_id!(
    /// Bundled kit.
    KitId
);
define_id!(
    /// Customer record.
    ClienteId
);
define_id!(
    /// Order.
    PedidoId
);
define_id!(
    /// Payment.
    PagamentoId
);
define_id!(
    /// Event inquiry.
    ContatoId
);
