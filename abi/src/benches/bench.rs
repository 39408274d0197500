use antelope_abi::Registry;
use criterion::criterion_main;
use serde_json::{json, Value};


criterion_main!(encode::benches, decode::benches);

/// Returns a registry holding a token contract with a `transfer` action and a `batch` struct
/// holding many transfers.
fn registry() -> Registry {
    let registry = Registry::default();
    registry
        .register_json(
            "eosio.token",
            &json!({
                "version": "eosio::abi/1.1",
                "structs": [
                    {
                        "name": "transfer",
                        "base": "",
                        "fields": [
                            { "name": "from", "type": "name" },
                            { "name": "to", "type": "name" },
                            { "name": "quantity", "type": "asset" },
                            { "name": "memo", "type": "string" }
                        ]
                    },
                    {
                        "name": "batch",
                        "base": "",
                        "fields": [{ "name": "transfers", "type": "transfer[]" }]
                    }
                ],
                "actions": [{ "name": "transfer", "type": "transfer", "ricardian_contract": "" }]
            }),
        )
        .unwrap();
    registry
}

/// Returns a `batch` of `len` transfers.
fn batch(len: usize) -> Value {
    let transfers: Vec<_> = (0..len)
        .map(|i| {
            json!({
                "from": "alice",
                "to": "bob",
                "quantity": format!("{}.0000 EOS", i),
                "memo": format!("transfer {i}")
            })
        })
        .collect();
    json!({ "transfers": transfers })
}
