//! Session-scoped cart store.
//!
//! Wraps the [`Cart`] aggregate with persistence. The store starts
//! `Uninitialized` and writes nothing until [`CartStore::hydrate`] has loaded
//! the stored cart, so an empty initial cart can never overwrite a saved one.
//! If the stored cart cannot be read the store goes `Unavailable`: writes stay
//! suppressed and the next mutation retries the read. After hydration every
//! mutation rewrites the whole line list under [`CART_STORAGE_KEY`]. Write
//! failures are logged; the in-memory cart stays authoritative for the
//! session.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::{
    domain::cart::{Cart, CartLineItem, CartSummary, OrderItemPayload},
    storage::KeyValueStore,
};

pub const CART_STORAGE_KEY: &str = "bakery_cart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StorePhase {
    Uninitialized,
    /// The last read of the stored cart failed.
    Unavailable,
    Hydrated,
}

struct Inner {
    cart: Cart,
    phase: StorePhase,
}

pub struct CartStore {
    inner: Mutex<Inner>,
    storage: Arc<dyn KeyValueStore>,
}

impl CartStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                cart: Cart::new(),
                phase: StorePhase::Uninitialized,
            }),
            storage,
        }
    }

    pub async fn phase(&self) -> StorePhase {
        self.inner.lock().await.phase
    }

    /// Load the stored cart. Lines added before hydration are kept and merged
    /// after the stored ones. Calling this twice is a no-op.
    pub async fn hydrate(&self) {
        if self.phase().await == StorePhase::Hydrated {
            return;
        }

        let mut stored = match self.storage.get(CART_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => cart,
                Err(err) => {
                    tracing::warn!(error = %err, "stored cart is unreadable, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored cart, will retry");
                let mut inner = self.inner.lock().await;
                if inner.phase != StorePhase::Hydrated {
                    inner.phase = StorePhase::Unavailable;
                }
                return;
            }
        };

        let dropped = stored.retain_valid();
        if dropped > 0 {
            tracing::warn!(dropped, "discarded stored cart lines with out-of-range figures");
        }

        let mut inner = self.inner.lock().await;
        if inner.phase == StorePhase::Hydrated {
            return;
        }

        let pending = std::mem::replace(&mut inner.cart, stored);
        let had_pending = !pending.is_empty();
        for line in pending.lines() {
            inner.cart.add_item(line.clone());
        }
        inner.phase = StorePhase::Hydrated;
        tracing::debug!(lines = inner.cart.lines().len(), "cart hydrated");

        if had_pending {
            self.persist(&inner).await;
        }
    }

    pub async fn add_item(&self, item: CartLineItem) -> Cart {
        self.mutate(|cart| cart.add_item(item)).await
    }

    pub async fn remove_item(&self, menu_item_id: i64) -> Cart {
        self.mutate(|cart| cart.remove_item(menu_item_id)).await
    }

    pub async fn update_quantity(&self, menu_item_id: i64, quantity: i64) -> Cart {
        self.mutate(|cart| cart.update_quantity(menu_item_id, quantity))
            .await
    }

    pub async fn clear(&self) -> Cart {
        self.mutate(Cart::clear).await
    }

    pub async fn remove_ordered(&self, ordered: &[CartLineItem]) -> Cart {
        self.mutate(|cart| cart.remove_ordered(ordered)).await
    }

    pub async fn snapshot(&self) -> Cart {
        self.inner.lock().await.cart.clone()
    }

    pub async fn summary(&self) -> CartSummary {
        self.inner.lock().await.cart.summary()
    }

    pub async fn order_items(&self) -> Vec<OrderItemPayload> {
        self.inner.lock().await.cart.order_items()
    }

    /// The lock is held through the write so snapshots land in mutation order.
    async fn mutate<F>(&self, change: F) -> Cart
    where
        F: FnOnce(&mut Cart),
    {
        if self.phase().await == StorePhase::Unavailable {
            self.hydrate().await;
        }

        let mut inner = self.inner.lock().await;
        change(&mut inner.cart);
        self.persist(&inner).await;
        inner.cart.clone()
    }

    async fn persist(&self, inner: &Inner) {
        if inner.phase != StorePhase::Hydrated {
            tracing::debug!(phase = ?inner.phase, "cart not hydrated, skipping persistence");
            return;
        }

        let raw = match serde_json::to_string(&inner.cart) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize cart");
                return;
            }
        };

        if let Err(err) = self.storage.set(CART_STORAGE_KEY, &raw).await {
            tracing::warn!(error = %err, "failed to persist cart");
        }
    }
}
