#![no_main]

use antelope_abi::{abi_bin_to_json, abi_json_to_bin, Registry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = abi_bin_to_json(data) else {
        return;
    };
    let bin = abi_json_to_bin(&json).expect("failed to encode a decoded abi");
    assert_eq!(abi_bin_to_json(&bin).unwrap(), json);

    // Registration may reject the abi but must not panic
    let _ = Registry::default().register_bin("fuzz", &bin);
});
