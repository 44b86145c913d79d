//! Client-local cart persistence.
//!
//! The cart is serialized to the client-local key-value store after every
//! mutation and loaded back at session start. The format is the cart's
//! serde JSON; it is a local cache, not a wire protocol.

use crate::cart::Cart;
use crate::error::CommerceError;
use mercato_store::KvStore;

/// Persists carts in a key-value store, one entry per session.
pub struct CartSessions<S> {
    store: S,
}

impl<S: KvStore> CartSessions<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(session_id: &str) -> String {
        format!("cart:{session_id}")
    }

    /// Save the cart under its session key.
    pub fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        tracing::debug!(session = %cart.session_id, items = cart.items.len(), "saving cart");
        self.store.set(&Self::key(&cart.session_id), cart)?;
        Ok(())
    }

    /// Load a session's cart, if one was saved.
    pub fn load(&self, session_id: &str) -> Result<Option<Cart>, CommerceError> {
        let cart: Option<Cart> = self.store.get(&Self::key(session_id))?;
        tracing::debug!(session = %session_id, found = cart.is_some(), "loaded cart");
        Ok(cart)
    }

    /// Drop a session's saved cart.
    pub fn clear(&self, session_id: &str) -> Result<(), CommerceError> {
        self.store.delete(&Self::key(session_id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DiscountTable, Product};
    use crate::money::{Currency, Money};
    use mercato_store::MemoryKv;

    #[test]
    fn test_save_and_load_round_trip() {
        let sessions = CartSessions::new(MemoryKv::new());
        let p = Product::new("p-1", "Mug", Money::new(1200, Currency::USD), "kitchen");
        let mut cart = Cart::new("s-1");
        cart.add_item(&p, 2, &DiscountTable::empty()).unwrap();

        sessions.save(&cart).unwrap();
        let loaded = sessions.load("s-1").unwrap().unwrap();
        assert_eq!(loaded, cart);
    }

    #[test]
    fn test_load_missing_session() {
        let sessions = CartSessions::new(MemoryKv::new());
        assert!(sessions.load("nobody").unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let sessions = CartSessions::new(MemoryKv::new());
        let cart = Cart::new("s-1");
        sessions.save(&cart).unwrap();
        sessions.clear("s-1").unwrap();
        assert!(sessions.load("s-1").unwrap().is_none());
    }
}
