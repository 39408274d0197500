//! Resolve type names into [Type] descriptors.
//!
//! A type spec is a base name followed by any number of `[]` (array) and `?` (optional)
//! suffixes, optionally ending in a single `$` (binary extension). Suffixes are stripped from the
//! right, so `int8?[]` is an array of optional `int8`. The base name is looked up among the
//! builtins and the aliases, structs and variants declared by the ABI.
//!
//! At registration every spec the ABI mentions is resolved into the contract's arena (compound
//! specs are interned under their full text). Specs first seen at call time are resolved into a
//! [Resolved] overlay that extends the shared arena without modifying it.

use crate::{
    abi_def::{AbiDef, VERSION_PREFIX},
    context::Context,
    name::Name,
    types::{Builtin, Field, Type, TypeId},
    Error,
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// Why a type spec could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SpecError {
    Unknown(String),
    Invalid(String),
    TooDeep(String),
}

impl SpecError {
    fn into_schema(self, context: &str) -> Error {
        match self {
            Self::Unknown(name) => Error::Schema(format!("unknown type '{name}' in {context}")),
            Self::Invalid(detail) => Error::Schema(format!("{detail} in {context}")),
            Self::TooDeep(spec) => {
                Error::Schema(format!("type '{spec}' is nested too deeply in {context}"))
            }
        }
    }
}

/// Storage that type specs are resolved into.
pub(crate) trait Arena {
    /// Returns the type registered under `name`, if any.
    fn lookup(&self, name: &str) -> Option<TypeId>;

    /// Stores `ty` and registers it under `spec`.
    fn insert(&mut self, spec: &str, ty: Type) -> TypeId;
}

/// Resolves `spec`, interning any compound types it needs.
pub(crate) fn resolve_spec(
    arena: &mut impl Arena,
    spec: &str,
    allow_extension: bool,
    max_depth: usize,
) -> Result<TypeId, SpecError> {
    resolve_at(arena, spec, allow_extension, 0, max_depth)
}

fn resolve_at(
    arena: &mut impl Arena,
    spec: &str,
    allow_extension: bool,
    depth: usize,
    max_depth: usize,
) -> Result<TypeId, SpecError> {
    if depth > max_depth {
        return Err(SpecError::TooDeep(spec.to_string()));
    }
    let extension = spec.strip_suffix('$');
    if extension.is_some() && !allow_extension {
        return Err(SpecError::Invalid(format!(
            "binary extension '{spec}' is only allowed on trailing struct fields"
        )));
    }
    if let Some(id) = arena.lookup(spec) {
        return Ok(id);
    }

    let ty = if let Some(inner) = extension {
        Type::Extension(resolve_at(arena, inner, false, depth + 1, max_depth)?)
    } else if let Some(inner) = spec.strip_suffix('?') {
        if inner.ends_with('?') {
            return Err(SpecError::Invalid(format!("optional of optional '{spec}'")));
        }
        Type::Optional(resolve_at(arena, inner, false, depth + 1, max_depth)?)
    } else if let Some(inner) = spec.strip_suffix("[]") {
        Type::Array(resolve_at(arena, inner, false, depth + 1, max_depth)?)
    } else {
        return Err(SpecError::Unknown(spec.to_string()));
    };
    Ok(arena.insert(spec, ty))
}

/// Everything registration derives from an [AbiDef].
pub(crate) struct Tables {
    pub types: Vec<Type>,
    pub names: HashMap<String, TypeId>,
    pub actions: HashMap<Name, String>,
    pub tables: HashMap<Name, String>,
    pub action_results: HashMap<Name, String>,
    /// Types whose values can encode to zero bytes.
    pub zero_size: Vec<bool>,
}

/// Builds the type arena of a contract.
pub(crate) struct Builder<'a> {
    abi: &'a AbiDef,
    max_depth: usize,
    types: Vec<Option<Type>>,
    names: HashMap<String, TypeId>,
}

impl Arena for Builder<'_> {
    fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    fn insert(&mut self, spec: &str, ty: Type) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(Some(ty));
        self.names.insert(spec.to_string(), id);
        id
    }
}

impl<'a> Builder<'a> {
    pub fn new(abi: &'a AbiDef, max_depth: usize) -> Self {
        let mut builder = Self {
            abi,
            max_depth,
            types: Vec::new(),
            names: HashMap::new(),
        };
        for builtin in Builtin::ALL {
            builder.insert(builtin.name(), Type::Builtin(builtin));
        }
        builder
    }

    /// Reserves a slot for a declared type, rejecting empty and duplicate names.
    fn declare(&mut self, name: &str, kind: &str) -> Result<TypeId, Error> {
        if name.is_empty() {
            return Err(Error::Schema(format!("{kind} with empty name")));
        }
        if self.names.contains_key(name) {
            return Err(Error::Schema(format!("abi redefines type '{name}'")));
        }
        let id = TypeId(self.types.len());
        self.types.push(None);
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    fn resolve(
        &mut self,
        spec: &str,
        allow_extension: bool,
        context: &str,
    ) -> Result<TypeId, Error> {
        let max_depth = self.max_depth;
        resolve_spec(self, spec, allow_extension, max_depth)
            .map_err(|err| err.into_schema(context))
    }

    /// Follows aliases from `id`, failing if the chain is longer than the depth limit.
    fn unalias(&self, mut id: TypeId) -> Option<TypeId> {
        for _ in 0..=self.max_depth {
            match self.types.get(id.0) {
                Some(Some(Type::Alias { target, .. })) => id = *target,
                _ => return Some(id),
            }
        }
        None
    }

    pub fn build(mut self) -> Result<Tables, Error> {
        let abi = self.abi;
        if !abi.version.starts_with(VERSION_PREFIX) {
            return Err(Error::Schema(format!(
                "unsupported abi version '{}'",
                abi.version
            )));
        }

        // Reserve every declared name before resolving anything so declarations may refer to
        // each other in any order
        let mut aliases = Vec::with_capacity(abi.types.len());
        for def in &abi.types {
            aliases.push(self.declare(&def.new_type_name, "type")?);
        }
        let mut structs = Vec::with_capacity(abi.structs.len());
        for def in &abi.structs {
            structs.push(self.declare(&def.name, "struct")?);
        }
        let mut variants = Vec::with_capacity(abi.variants.len());
        for def in &abi.variants {
            variants.push(self.declare(&def.name, "variant")?);
        }

        // Aliases
        for (def, &id) in abi.types.iter().zip(&aliases) {
            let context = format!("type '{}'", def.new_type_name);
            let target = self.resolve(&def.type_, false, &context)?;
            self.types[id.0] = Some(Type::Alias {
                name: def.new_type_name.clone(),
                target,
            });
        }
        for (def, &id) in abi.types.iter().zip(&aliases) {
            let mut current = id;
            for _ in 0..=self.max_depth {
                match &self.types[current.0] {
                    Some(Type::Alias { target, .. }) => current = *target,
                    _ => break,
                }
                if current == id {
                    break;
                }
            }
            if current == id || matches!(self.types[current.0], Some(Type::Alias { .. })) {
                return Err(Error::Schema(format!(
                    "type '{}' is cyclic or nested too deeply",
                    def.new_type_name
                )));
            }
        }

        // Own fields and bases
        let struct_index: HashMap<TypeId, usize> =
            structs.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut own_fields = Vec::with_capacity(abi.structs.len());
        let mut bases = Vec::with_capacity(abi.structs.len());
        for def in &abi.structs {
            let mut fields = Vec::with_capacity(def.fields.len());
            for field in &def.fields {
                let context = format!("field '{}' of struct '{}'", field.name, def.name);
                let ty = self.resolve(&field.type_, true, &context)?;
                let extension = field.type_.ends_with('$');
                fields.push((
                    Field {
                        name: field.name.clone(),
                        ty,
                    },
                    extension,
                ));
            }
            own_fields.push(fields);

            if def.base.is_empty() {
                bases.push(None);
                continue;
            }
            let base = self
                .lookup(&def.base)
                .and_then(|id| self.unalias(id))
                .ok_or_else(|| {
                    Error::Schema(format!(
                        "unknown base '{}' of struct '{}'",
                        def.base, def.name
                    ))
                })?;
            let index = struct_index.get(&base).ok_or_else(|| {
                Error::Schema(format!(
                    "base '{}' of struct '{}' is not a struct",
                    def.base, def.name
                ))
            })?;
            bases.push(Some(*index));
        }

        // Effective fields (bases first)
        for (i, def) in abi.structs.iter().enumerate() {
            let mut chain = vec![i];
            let mut current = bases[i];
            while let Some(base) = current {
                if chain.contains(&base) {
                    return Err(Error::Schema(format!(
                        "struct '{}' has a cyclic base",
                        def.name
                    )));
                }
                if chain.len() > self.max_depth {
                    return Err(Error::Schema(format!(
                        "struct '{}' has too many bases",
                        def.name
                    )));
                }
                chain.push(base);
                current = bases[base];
            }

            let mut fields = Vec::new();
            let mut names = HashSet::new();
            let mut extension_seen = false;
            for &index in chain.iter().rev() {
                for (field, extension) in &own_fields[index] {
                    if !names.insert(field.name.as_str()) {
                        return Err(Error::Schema(format!(
                            "duplicate field '{}' in struct '{}'",
                            field.name, def.name
                        )));
                    }
                    if extension_seen && !extension {
                        return Err(Error::Schema(format!(
                            "field '{}' of struct '{}' follows a binary extension",
                            field.name, def.name
                        )));
                    }
                    extension_seen |= extension;
                    fields.push(field.clone());
                }
            }
            self.types[structs[i].0] = Some(Type::Struct {
                name: def.name.clone(),
                base: bases[i].map(|base| structs[base]),
                fields,
            });
        }

        // Variants
        for (def, &id) in abi.variants.iter().zip(&variants) {
            let mut seen = HashSet::new();
            let mut members = Vec::with_capacity(def.types.len());
            for member in &def.types {
                if !seen.insert(member.as_str()) {
                    return Err(Error::Schema(format!(
                        "duplicate member '{}' in variant '{}'",
                        member, def.name
                    )));
                }
                let context = format!("variant '{}'", def.name);
                members.push((member.clone(), self.resolve(member, false, &context)?));
            }
            self.types[id.0] = Some(Type::Variant {
                name: def.name.clone(),
                members,
            });
        }

        // Actions, tables and action results must name resolvable types
        let mut actions = HashMap::with_capacity(abi.actions.len());
        for def in &abi.actions {
            self.resolve(&def.type_, false, &format!("action '{}'", def.name))?;
            if actions.insert(def.name, def.type_.clone()).is_some() {
                return Err(Error::Schema(format!("duplicate action '{}'", def.name)));
            }
        }
        let mut tables = HashMap::with_capacity(abi.tables.len());
        for def in &abi.tables {
            self.resolve(&def.type_, false, &format!("table '{}'", def.name))?;
            if tables.insert(def.name, def.type_.clone()).is_some() {
                return Err(Error::Schema(format!("duplicate table '{}'", def.name)));
            }
        }
        let mut action_results = HashMap::with_capacity(abi.action_results.len());
        for def in &abi.action_results {
            self.resolve(&def.result_type, false, &format!("action result '{}'", def.name))?;
            if action_results
                .insert(def.name, def.result_type.clone())
                .is_some()
            {
                return Err(Error::Schema(format!(
                    "duplicate action result '{}'",
                    def.name
                )));
            }
        }

        let types = self
            .types
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::Schema("unresolved type".to_string()))?;
        let zero_size = zero_size(&types);
        Ok(Tables {
            types,
            names: self.names,
            actions,
            tables,
            action_results,
            zero_size,
        })
    }
}

/// Marks the types whose values can take no bytes on the wire: binary extensions (absent at the
/// end of the input), aliases of such types and structs made only of them.
fn zero_size(types: &[Type]) -> Vec<bool> {
    let mut marked = vec![false; types.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for (i, ty) in types.iter().enumerate() {
            if marked[i] {
                continue;
            }
            let zero = match ty {
                Type::Extension(_) => true,
                Type::Alias { target, .. } => marked[target.0],
                Type::Struct { fields, .. } => fields.iter().all(|field| marked[field.ty.0]),
                Type::Builtin(_) | Type::Array(_) | Type::Optional(_) | Type::Variant { .. } => {
                    false
                }
            };
            if zero {
                marked[i] = true;
                changed = true;
            }
        }
    }
    marked
}

/// A type resolved against a contract, ready to encode or decode.
///
/// Holds a snapshot of the contract, so it stays valid (and unchanged) if the contract is
/// re-registered or deleted afterwards.
#[derive(Debug, Clone)]
pub struct Resolved {
    context: Arc<Context>,
    scratch: Vec<Type>,
    root: TypeId,
}

struct Overlay<'a> {
    context: &'a Context,
    scratch: Vec<Type>,
    names: HashMap<String, TypeId>,
}

impl Arena for Overlay<'_> {
    fn lookup(&self, name: &str) -> Option<TypeId> {
        self.context
            .lookup(name)
            .or_else(|| self.names.get(name).copied())
    }

    fn insert(&mut self, spec: &str, ty: Type) -> TypeId {
        let id = TypeId(self.context.len() + self.scratch.len());
        self.scratch.push(ty);
        self.names.insert(spec.to_string(), id);
        id
    }
}

impl Resolved {
    pub(crate) fn new(context: Arc<Context>, spec: &str, max_depth: usize) -> Result<Self, Error> {
        let mut overlay = Overlay {
            context: &context,
            scratch: Vec::new(),
            names: HashMap::new(),
        };
        let root = resolve_spec(&mut overlay, spec, true, max_depth).map_err(|err| match err {
            SpecError::Unknown(name) => Error::not_found("type", name),
            SpecError::Invalid(detail) => Error::format(detail),
            SpecError::TooDeep(_) => Error::RecursionLimit {
                path: String::new(),
            },
        })?;
        let scratch = overlay.scratch;
        Ok(Self {
            context,
            scratch,
            root,
        })
    }

    /// Returns the contract this type was resolved against.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the resolved type.
    pub fn root(&self) -> TypeId {
        self.root
    }

    /// Returns the type stored at `id`.
    ///
    /// Panics if `id` did not come from this [Resolved] or its context.
    pub fn get(&self, id: TypeId) -> &Type {
        let len = self.context.len();
        if id.0 < len {
            self.context.get(id)
        } else {
            &self.scratch[id.0 - len]
        }
    }

    /// Returns the root type.
    pub fn ty(&self) -> &Type {
        self.get(self.root)
    }

    /// Returns whether a value of `id` can encode to zero bytes.
    pub(crate) fn is_zero_size(&self, id: TypeId) -> bool {
        if id.0 < self.context.len() {
            self.context.is_zero_size(id)
        } else {
            // Scratch only holds arrays, optionals and extensions
            matches!(self.get(id), Type::Extension(_))
        }
    }
}
