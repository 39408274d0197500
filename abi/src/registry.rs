//! Contracts registered by name.
//!
//! Contexts are built outside of the lock and swapped in under a short write lock. Readers clone
//! the [Arc] of a context under the read lock and then encode or decode against that immutable
//! snapshot, so a reader never observes a contract mid-replacement and registration of one
//! contract never blocks on work done for another.

use crate::{
    abi_def::AbiDef, context::Context, decoder, encoder, name::Name, resolver::Resolved, Config,
    Error,
};
use antelope_utils::{from_hex, hex};
use serde_json::Value;
use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, warn};

/// A set of contracts and their ABIs.
pub struct Registry {
    cfg: Config,
    contexts: RwLock<HashMap<String, Arc<Context>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Registry {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            contexts: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Validates `abi` and installs it for `contract`, replacing any previous ABI.
    ///
    /// If validation fails the previous ABI (if any) stays in place.
    pub fn register_abi(&self, contract: &str, abi: AbiDef) -> Result<(), Error> {
        let context = match Context::new(contract, abi, &self.cfg) {
            Ok(context) => context,
            Err(err) => {
                warn!(contract, error = %err, "rejected abi");
                return Err(err);
            }
        };
        let (types, structs, variants) = context.declared();
        let replaced = self
            .contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(contract.to_string(), Arc::new(context))
            .is_some();
        debug!(contract, types, structs, variants, replaced, "registered abi");
        Ok(())
    }

    /// Registers a JSON ABI document.
    pub fn register_json(&self, contract: &str, abi: &Value) -> Result<(), Error> {
        let abi = AbiDef::from_json(abi).inspect_err(|err| {
            warn!(contract, error = %err, "rejected abi");
        })?;
        self.register_abi(contract, abi)
    }

    /// Registers a JSON ABI document given as text.
    pub fn register_json_str(&self, contract: &str, abi: &str) -> Result<(), Error> {
        let abi = AbiDef::from_json_str(abi).inspect_err(|err| {
            warn!(contract, error = %err, "rejected abi");
        })?;
        self.register_abi(contract, abi)
    }

    /// Registers a binary ABI document.
    pub fn register_bin(&self, contract: &str, abi: &[u8]) -> Result<(), Error> {
        let abi = AbiDef::from_bin(abi, &self.cfg.abi_range()).inspect_err(|err| {
            warn!(contract, error = %err, "rejected abi");
        })?;
        self.register_abi(contract, abi)
    }

    /// Registers a hex-encoded binary ABI document.
    pub fn register_hex(&self, contract: &str, abi: &str) -> Result<(), Error> {
        let abi = from_hex(abi).ok_or_else(|| Error::Schema("invalid hex".to_string()))?;
        self.register_bin(contract, &abi)
    }

    /// Removes `contract`, returning whether it was registered.
    pub fn delete_contract(&self, contract: &str) -> bool {
        let removed = self
            .contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(contract)
            .is_some();
        debug!(contract, removed, "deleted contract");
        removed
    }

    /// Returns the names of all registered contracts.
    pub fn loaded(&self) -> BTreeSet<String> {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Returns the current context of `contract`.
    pub fn context(&self, contract: &str) -> Result<Arc<Context>, Error> {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(contract)
            .cloned()
            .ok_or_else(|| Error::not_found("contract", contract))
    }

    /// Resolves a type spec such as `transfer`, `uint64[]` or `permission_level?` against
    /// `contract`.
    pub fn resolve_type(&self, contract: &str, spec: &str) -> Result<Resolved, Error> {
        Resolved::new(self.context(contract)?, spec, self.cfg.max_depth)
    }

    fn lookup(
        &self,
        contract: &str,
        kind: &'static str,
        name: &str,
        get: impl Fn(&Context, Name) -> Option<&str>,
    ) -> Result<String, Error> {
        let context = self.context(contract)?;
        name.parse()
            .ok()
            .and_then(|name| get(&context, name))
            .map(str::to_string)
            .ok_or_else(|| Error::not_found(kind, name))
    }

    /// Returns the type of the payload of `action`.
    pub fn lookup_action_type(&self, contract: &str, action: &str) -> Result<String, Error> {
        self.lookup(contract, "action", action, Context::action_type)
    }

    /// Returns the row type of `table`.
    pub fn lookup_table_type(&self, contract: &str, table: &str) -> Result<String, Error> {
        self.lookup(contract, "table", table, Context::table_type)
    }

    /// Returns the return value type of `action`.
    pub fn lookup_action_result_type(&self, contract: &str, action: &str) -> Result<String, Error> {
        self.lookup(contract, "action result", action, Context::action_result_type)
    }

    /// Encodes `value` as `spec`.
    pub fn encode(&self, contract: &str, spec: &str, value: &Value) -> Result<Vec<u8>, Error> {
        let resolved = self.resolve_type(contract, spec)?;
        encoder::encode(&resolved, value, &self.cfg)
    }

    /// Encodes `value` as `spec` and returns lowercase hex.
    pub fn encode_to_hex(&self, contract: &str, spec: &str, value: &Value) -> Result<String, Error> {
        self.encode(contract, spec, value).map(|bytes| hex(&bytes))
    }

    /// Decodes a `spec` value starting at `cursor`, returning it with the position just after it.
    ///
    /// Bytes after the value are left for the caller.
    pub fn decode_at(
        &self,
        contract: &str,
        spec: &str,
        bytes: &[u8],
        cursor: usize,
    ) -> Result<(Value, usize), Error> {
        let resolved = self.resolve_type(contract, spec)?;
        let rest = bytes.get(cursor..).ok_or_else(|| Error::StreamOverrun {
            path: String::new(),
        })?;
        let (value, consumed) = decoder::decode(&resolved, rest, &self.cfg)?;
        Ok((value, cursor + consumed))
    }

    /// Decodes a `spec` value that must span all of `bytes` (unless
    /// [Config::allow_trailing_bytes] is set).
    pub fn decode(&self, contract: &str, spec: &str, bytes: &[u8]) -> Result<Value, Error> {
        let (value, end) = self.decode_at(contract, spec, bytes, 0)?;
        if end != bytes.len() && !self.cfg.allow_trailing_bytes {
            return Err(Error::format(format!(
                "extra data: {} bytes after {spec}",
                bytes.len() - end
            )));
        }
        Ok(value)
    }

    /// Decodes a hex-encoded `spec` value.
    pub fn decode_from_hex(&self, contract: &str, spec: &str, hex: &str) -> Result<Value, Error> {
        let bytes = from_hex(hex).ok_or_else(|| Error::format("invalid hex"))?;
        self.decode(contract, spec, &bytes)
    }
}
