//! # karu-remote: Hosted Backend for KarU POS
//!
//! Implements [`karu_core::PosStore`] against a PostgREST endpoint such as
//! a Supabase project.
//!
//! ```rust,ignore
//! use karu_remote::{RestConfig, RestStore};
//!
//! let store = RestStore::new(&RestConfig::new("https://abc.supabase.co", anon_key))?;
//! let products = store.sellable_products().await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod store;
pub mod wire;

pub use client::RestClient;
pub use config::RestConfig;
pub use error::{RemoteError, RemoteResult};
pub use store::RestStore;
