//! Sui RPC Gateway
//!
//! This crate serves the legacy Sui JSON-RPC 2.0 API (`sui_*`, `suix_*`)
//! on top of a typed ledger backend whose data model differs: explicit
//! read masks, 64-bit integers, raw byte payloads, and single-item lookups
//! where the legacy API had paginated lists.
//!
//! # Architecture
//!
//! ```text
//! Wallets / SDKs / indexers
//!     |
//!     | legacy JSON-RPC calls
//!     v
//! Sui RPC Gateway (this crate)
//!     |
//!     | typed backend calls with read masks
//!     v
//! Ledger backend (LedgerService / StateService / TransactionExecutionService)
//! ```
//!
//! # Modules
//!
//! - `config` - Environment and configuration management
//! - `server` - JSON-RPC server setup and middleware wiring
//! - `dispatch` - Envelope validation, routing and error mapping
//! - `methods` - Method registry and one adapter per legacy method
//! - `translator` - Value normalization, read masks and response reshaping
//! - `emulator` - Paginated lists rebuilt from single-item lookups
//! - `sui` - Backend trait, message types and HTTP client

pub mod config;
pub mod dispatch;
pub mod emulator;
pub mod methods;
pub mod server;
pub mod sui;
pub mod translator;
