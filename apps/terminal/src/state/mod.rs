//! # State Module
//!
//! Separate state types instead of one `AppState`, so each command takes
//! only what it touches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────────┐  │
//! │  │   Backend    │  │ CatalogState │  │  CartState   │  │ ConfigState │  │
//! │  │              │  │              │  │              │  │             │  │
//! │  │ Local(db)    │  │ products     │  │ Arc<Mutex<   │  │ store name  │  │
//! │  │ Remote(rest) │  │ customers    │  │  SaleSession │  │ cashier     │  │
//! │  │              │  │ (RwLock)     │  │ >>           │  │ backend     │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └─────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Backend: pooled connections / HTTP client (thread-safe)             │
//! │  • CatalogState: RwLock, replaced wholesale on reload                  │
//! │  • CartState: Mutex, never held across an await                        │
//! │  • ConfigState: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod backend;
mod cart;
mod catalog;
mod config;

pub use backend::{Backend, BackendError, StartupError};
pub use cart::{CartState, CartView, SaleSession};
pub use catalog::CatalogState;
pub use config::{BackendKind, BackendSettings, ConfigError, ConfigState};
