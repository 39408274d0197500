//! Convert between JSON values and the Antelope binary format using contract ABIs.
//!
//! # Overview
//!
//! A contract's ABI names the types of its action payloads, table rows and action return values.
//! After an ABI is registered with a [Registry], any type it declares (or any builtin, array,
//! optional or binary extension spec built from them, such as `permission_level[]` or `name?`)
//! can be encoded from JSON or decoded back into JSON.
//!
//! Registration validates the whole ABI up front: every referenced type must exist, aliases
//! and base structs may not form cycles, and binary extension fields may only end a struct.
//! Encoding and decoding then work against an immutable [Context] shared through an
//! [std::sync::Arc], so a [Registry] can be used from many threads at once.
//!
//! Errors carry the path of the offending value (for example `actions[2].data.quantity`).
//!
//! # Example
//!
//! ```rust
//! use antelope_abi::Registry;
//! use serde_json::json;
//!
//! let registry = Registry::default();
//! registry.register_json("eosio.token", &json!({
//!     "version": "eosio::abi/1.1",
//!     "structs": [{
//!         "name": "transfer",
//!         "base": "",
//!         "fields": [
//!             { "name": "from", "type": "name" },
//!             { "name": "to", "type": "name" },
//!             { "name": "quantity", "type": "asset" },
//!             { "name": "memo", "type": "string" }
//!         ]
//!     }],
//!     "actions": [{ "name": "transfer", "type": "transfer", "ricardian_contract": "" }]
//! })).unwrap();
//!
//! let transfer = json!({
//!     "from": "alice",
//!     "to": "bob",
//!     "quantity": "1.0000 EOS",
//!     "memo": "test transfer"
//! });
//! let ty = registry.lookup_action_type("eosio.token", "transfer").unwrap();
//! let bytes = registry.encode("eosio.token", &ty, &transfer).unwrap();
//! assert_eq!(bytes.len(), 8 + 8 + 16 + 14);
//! assert_eq!(registry.decode("eosio.token", &ty, &bytes).unwrap(), transfer);
//! ```

pub mod abi_def;
pub use abi_def::{abi_bin_to_json, abi_json_to_bin, AbiDef};
pub mod asset;
pub use asset::{Asset, ExtendedAsset, Symbol, SymbolCode};
mod builtin;
mod config;
pub use config::Config;
pub mod context;
pub use context::Context;
mod decoder;
mod encoder;
mod error;
pub use error::{Error, ErrorKind, ParseError};
pub mod name;
pub use name::Name;
mod path;
mod registry;
pub use registry::Registry;
mod resolver;
pub use resolver::Resolved;
pub mod time;
pub use time::{BlockTimestamp, TimePoint, TimePointSec};
pub mod types;
pub use types::{Builtin, Field, Type, TypeId};
