#![no_main]

use antelope_abi::Registry;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::json;
use std::sync::OnceLock;

const TYPES: [&str; 8] = [
    "transfer",
    "everything",
    "shape",
    "transfer[]",
    "shape?",
    "asset",
    "public_key",
    "signature",
];

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    ty: u8,
    data: Vec<u8>,
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let registry = Registry::default();
        registry
            .register_json(
                "fuzz",
                &json!({
                    "version": "eosio::abi/1.2",
                    "types": [{ "new_type_name": "account", "type": "name" }],
                    "structs": [
                        { "name": "transfer", "base": "", "fields": [
                            { "name": "from", "type": "account" },
                            { "name": "to", "type": "account" },
                            { "name": "quantity", "type": "asset" },
                            { "name": "memo", "type": "string" }
                        ]},
                        { "name": "point", "base": "", "fields": [
                            { "name": "x", "type": "float64" },
                            { "name": "y", "type": "float32" }
                        ]},
                        { "name": "everything", "base": "point", "fields": [
                            { "name": "flag", "type": "bool" },
                            { "name": "small", "type": "int8" },
                            { "name": "big", "type": "uint128" },
                            { "name": "packed", "type": "varint32" },
                            { "name": "at", "type": "time_point" },
                            { "name": "sec", "type": "time_point_sec" },
                            { "name": "slot", "type": "block_timestamp_type" },
                            { "name": "blob", "type": "bytes" },
                            { "name": "digest", "type": "checksum256" },
                            { "name": "sym", "type": "symbol" },
                            { "name": "ext", "type": "extended_asset$" },
                            { "name": "more", "type": "float128$" }
                        ]}
                    ],
                    "variants": [{ "name": "shape", "types": ["point", "transfer", "uint8"] }]
                }),
            )
            .unwrap();
        registry
    })
}

fn fuzz(input: FuzzInput) {
    let registry = registry();
    let ty = TYPES[input.ty as usize % TYPES.len()];
    let Ok(value) = registry.decode("fuzz", ty, &input.data) else {
        return;
    };

    // Anything that decodes must encode without error
    let encoded = registry
        .encode("fuzz", ty, &value)
        .expect("failed to encode a decoded value");

    // Re-decoding the re-encoded bytes must be stable
    let decoded = registry
        .decode("fuzz", ty, &encoded)
        .expect("failed to decode a re-encoded value");
    assert_eq!(
        registry.encode("fuzz", ty, &decoded).unwrap(),
        encoded
    );
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
