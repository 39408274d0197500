use antelope_codec::RangeCfg;
use antelope_cryptography::public_key::DEFAULT_LEGACY_PREFIX;

/// Configuration for a [crate::Registry].
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum nesting of type references accepted at registration and of values accepted
    /// when encoding or decoding.
    pub max_depth: usize,

    /// Whether [crate::Registry::decode] tolerates bytes left over after the value.
    pub allow_trailing_bytes: bool,

    /// Prefixes accepted for legacy (untyped) public keys, such as `EOS`.
    pub legacy_key_prefixes: Vec<String>,

    /// Maximum length of any string or vector read from a binary ABI.
    pub max_abi_len: usize,

    /// Maximum length of an array whose elements can encode to zero bytes (such as an empty
    /// struct). The input length cannot bound these, so this does.
    pub max_zero_size_elements: usize,
}

impl Config {
    pub(crate) fn abi_range(&self) -> RangeCfg {
        RangeCfg::from(..=self.max_abi_len)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 32,
            allow_trailing_bytes: false,
            legacy_key_prefixes: vec![DEFAULT_LEGACY_PREFIX.to_string()],
            max_abi_len: 1024 * 1024,
            max_zero_size_elements: 1024,
        }
    }
}
