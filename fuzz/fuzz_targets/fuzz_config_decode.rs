#![no_main]

use aerospike_connect::{derive_policies, parse_config, AerospikeConfig, RetryBudget};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding arbitrary documents must never panic, and whatever decodes
    // must yield a retry budget and operation policies.
    if let Ok(config) = parse_config::<AerospikeConfig>(text) {
        let budget = RetryBudget::from_config(&config);
        assert!(budget.max_attempts >= 1);
        assert!(derive_policies(&config).is_ok());
        let _ = config.seed();
    }
});
