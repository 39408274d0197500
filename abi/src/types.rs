//! Resolved type descriptors.
//!
//! Types live in an arena owned by a [crate::Context] and refer to each other by [TypeId], which
//! lets a struct refer to itself (through an optional or array field).

/// Index of a [Type] in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

/// Built-in types with a fixed JSON and binary form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Bool,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Int128,
    Uint128,
    VarInt32,
    VarUint32,
    Float32,
    Float64,
    Float128,
    TimePoint,
    TimePointSec,
    BlockTimestamp,
    Name,
    Bytes,
    String,
    Checksum160,
    Checksum256,
    Checksum512,
    PublicKey,
    Signature,
    Symbol,
    SymbolCode,
    Asset,
    ExtendedAsset,
}

impl Builtin {
    /// Every built-in type, in arena order.
    pub const ALL: [Builtin; 31] = [
        Self::Bool,
        Self::Int8,
        Self::Uint8,
        Self::Int16,
        Self::Uint16,
        Self::Int32,
        Self::Uint32,
        Self::Int64,
        Self::Uint64,
        Self::Int128,
        Self::Uint128,
        Self::VarInt32,
        Self::VarUint32,
        Self::Float32,
        Self::Float64,
        Self::Float128,
        Self::TimePoint,
        Self::TimePointSec,
        Self::BlockTimestamp,
        Self::Name,
        Self::Bytes,
        Self::String,
        Self::Checksum160,
        Self::Checksum256,
        Self::Checksum512,
        Self::PublicKey,
        Self::Signature,
        Self::Symbol,
        Self::SymbolCode,
        Self::Asset,
        Self::ExtendedAsset,
    ];

    /// Returns the name used for this type in ABIs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Int128 => "int128",
            Self::Uint128 => "uint128",
            Self::VarInt32 => "varint32",
            Self::VarUint32 => "varuint32",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Float128 => "float128",
            Self::TimePoint => "time_point",
            Self::TimePointSec => "time_point_sec",
            Self::BlockTimestamp => "block_timestamp_type",
            Self::Name => "name",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Checksum160 => "checksum160",
            Self::Checksum256 => "checksum256",
            Self::Checksum512 => "checksum512",
            Self::PublicKey => "public_key",
            Self::Signature => "signature",
            Self::Symbol => "symbol",
            Self::SymbolCode => "symbol_code",
            Self::Asset => "asset",
            Self::ExtendedAsset => "extended_asset",
        }
    }

    /// Looks up a built-in type by its ABI name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    /// Returns the arena slot reserved for this type.
    pub(crate) fn id(self) -> TypeId {
        TypeId(self as usize)
    }
}

/// A field of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
}

/// A resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Builtin(Builtin),
    /// Another name for `target`.
    Alias { name: String, target: TypeId },
    /// `T[]`: a `varuint32` count followed by the elements.
    Array(TypeId),
    /// `T?`: a presence byte followed by the value when present.
    Optional(TypeId),
    /// `T$`: a trailing struct field that may be absent.
    Extension(TypeId),
    /// A struct with its effective fields: those of its bases (outermost first), then its own.
    Struct {
        name: String,
        base: Option<TypeId>,
        fields: Vec<Field>,
    },
    /// A tagged union. A member's position is its wire tag.
    Variant {
        name: String,
        members: Vec<(String, TypeId)>,
    },
}
