//! Storage seam for the pricing core.
//!
//! The hosted backend (document database, auth, object storage) is an
//! external collaborator. The traits here are the whole surface the domain
//! needs from it; implementations are injected, never imported as
//! singletons. [`MemoryStore`] is the dev and test backend.

mod backend;
mod memory;
mod service;
mod session;

pub use backend::{CatalogStore, ConsumptionRecord, CouponStore, OrderStore, RuleStore};
pub use memory::MemoryStore;
pub use service::{apply_coupon_to_cart, load_discount_table, place_order, validate_coupon};
pub use session::CartSessions;
