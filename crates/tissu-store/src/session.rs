//! # Cart Sessions
//!
//! Maps shopper session ids to their cart ledgers.
//!
//! ## Thread Safety
//! The cart ledger itself is single-threaded by design; this module is the
//! lock boundary around it. Each session gets its own `Arc<Mutex<Cart>>`:
//! 1. Concurrent requests for *different* sessions never contend
//! 2. Concurrent requests for the *same* session serialize, so the
//!    validate-then-commit guarantee of the ledger holds across handlers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Request (session "a") ──► sessions["a"] ──► Mutex ──► Cart         │
//! │  Request (session "b") ──► sessions["b"] ──► Mutex ──► Cart         │
//! │                                                                     │
//! │  The outer map lock is held only long enough to clone the Arc;     │
//! │  cart work happens under the per-session lock.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use tissu_core::Cart;

/// Registry of per-session cart ledgers.
#[derive(Debug, Default)]
pub struct CartSessions {
    sessions: Mutex<HashMap<String, Arc<Mutex<Cart>>>>,
}

impl CartSessions {
    /// Creates an empty session registry.
    pub fn new() -> Self {
        CartSessions::default()
    }

    /// Returns the cart handle for a session, creating an empty cart on
    /// first access.
    fn handle(&self, session_id: &str) -> Arc<Mutex<Cart>> {
        let mut sessions = self.sessions.lock().expect("Session map mutex poisoned");
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %session_id, "creating cart session");
                Arc::new(Mutex::new(Cart::new()))
            })
            .clone()
    }

    /// Executes a closure with read access to a session's cart.
    pub fn with_cart<T>(&self, session_id: &str, f: impl FnOnce(&Cart) -> T) -> T {
        let handle = self.handle(session_id);
        let cart = handle.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a closure with mutable access to a session's cart.
    pub fn with_cart_mut<T>(&self, session_id: &str, f: impl FnOnce(&mut Cart) -> T) -> T {
        let handle = self.handle(session_id);
        let mut cart = handle.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }

    /// Drops a session and its cart entirely (shopper logged out or the
    /// session expired). Dropping an unknown session is a no-op.
    pub fn drop_session(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.lock().expect("Session map mutex poisoned");
        let removed = sessions.remove(session_id).is_some();
        if removed {
            debug!(session_id = %session_id, "dropped cart session");
        }
        removed
    }

    /// Number of live sessions (diagnostics).
    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .expect("Session map mutex poisoned")
            .len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tissu_core::{CartLine, Money, Quantity, Unit};

    fn line(id: &str, price_cents: i64, quantity_units: i64) -> CartLine {
        CartLine {
            product_id: id.to_string(),
            name: format!("Product {id}"),
            unit_price: Money::from_cents(price_cents),
            quantity: Quantity::from_units(quantity_units),
            fabric_type: "bazin".to_string(),
            fabric_subtype: "Riche".to_string(),
            unit: Unit::Meter,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn sessions_are_isolated() {
        let sessions = CartSessions::new();

        sessions
            .with_cart_mut("a", |cart| cart.add_line(line("p1", 1000, 2)))
            .unwrap();

        assert_eq!(
            sessions.with_cart("a", |cart| cart.total()),
            Money::from_cents(2000)
        );
        assert!(sessions.with_cart("b", |cart| cart.is_empty()));
        assert_eq!(sessions.session_count(), 2);
    }

    #[test]
    fn drop_session_discards_the_cart() {
        let sessions = CartSessions::new();

        sessions
            .with_cart_mut("a", |cart| cart.add_line(line("p1", 1000, 2)))
            .unwrap();

        assert!(sessions.drop_session("a"));
        assert!(!sessions.drop_session("a"));

        // Accessing the session again starts from an empty cart
        assert!(sessions.with_cart("a", |cart| cart.is_empty()));
    }

    #[test]
    fn concurrent_mutations_on_one_session_serialize() {
        let sessions = Arc::new(CartSessions::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sessions = Arc::clone(&sessions);
                std::thread::spawn(move || {
                    sessions
                        .with_cart_mut("shared", |cart| {
                            cart.add_line(line(&format!("p{i}"), 100, 1))
                        })
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(sessions.with_cart("shared", |cart| cart.line_count()), 8);
        assert_eq!(
            sessions.with_cart("shared", |cart| cart.total()),
            Money::from_cents(800)
        );
    }
}
