use crate::{
    abi_def::AbiDef,
    name::Name,
    resolver::Builder,
    types::{Type, TypeId},
    Config, Error,
};
use std::collections::HashMap;

/// A registered contract: its ABI and the types resolved from it.
///
/// Immutable once built. Re-registering a contract builds a new [Context] rather than modifying
/// the existing one.
#[derive(Debug)]
pub struct Context {
    contract: String,
    abi: AbiDef,
    types: Vec<Type>,
    names: HashMap<String, TypeId>,
    actions: HashMap<Name, String>,
    tables: HashMap<Name, String>,
    action_results: HashMap<Name, String>,
    zero_size: Vec<bool>,
}

impl Context {
    /// Validates `abi` and resolves every type it declares or references.
    pub fn new(contract: &str, abi: AbiDef, cfg: &Config) -> Result<Self, Error> {
        let tables = Builder::new(&abi, cfg.max_depth).build()?;
        Ok(Self {
            contract: contract.to_string(),
            abi,
            types: tables.types,
            names: tables.names,
            actions: tables.actions,
            tables: tables.tables,
            action_results: tables.action_results,
            zero_size: tables.zero_size,
        })
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn abi(&self) -> &AbiDef {
        &self.abi
    }

    /// Returns the type registered under `name` (a builtin, a declared type or a compound spec
    /// used by the ABI).
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    /// Returns the type stored at `id`.
    ///
    /// Panics if `id` was not produced by this context.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0]
    }

    pub(crate) fn len(&self) -> usize {
        self.types.len()
    }

    pub(crate) fn is_zero_size(&self, id: TypeId) -> bool {
        self.zero_size[id.0]
    }

    /// Returns the type of the `action` payload.
    pub fn action_type(&self, action: Name) -> Option<&str> {
        self.actions.get(&action).map(String::as_str)
    }

    /// Returns the row type of `table`.
    pub fn table_type(&self, table: Name) -> Option<&str> {
        self.tables.get(&table).map(String::as_str)
    }

    /// Returns the return value type of `action`.
    pub fn action_result_type(&self, action: Name) -> Option<&str> {
        self.action_results.get(&action).map(String::as_str)
    }

    /// Returns the number of declared aliases, structs and variants.
    pub(crate) fn declared(&self) -> (usize, usize, usize) {
        (
            self.abi.types.len(),
            self.abi.structs.len(),
            self.abi.variants.len(),
        )
    }
}
