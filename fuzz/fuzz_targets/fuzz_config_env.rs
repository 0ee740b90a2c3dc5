//! Fuzz target: environment overrides
//!
//! Splits the input into four NUL-separated values and feeds them to
//! `SystemConfig::from_lookup` as the `ALARM_*` variables. Verifies:
//! - No panics under arbitrary (including non-UTF-8-derived) strings
//! - Every accepted configuration passes `validate()` again
//! - An accepted service unit is never blank
//!
//! cargo fuzz run fuzz_config_env

#![no_main]

use homealarm::config::{
    ENV_GPIO_BACKEND, ENV_LOG_LEVEL, ENV_MOTION_DEVICE, ENV_SERVICE_UNIT, SystemConfig,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut parts = text.split('\0').map(str::to_owned);
    let values: [Option<String>; 4] = std::array::from_fn(|_| parts.next());

    let lookup = |key: &str| -> Option<String> {
        let idx = match key {
            k if k == ENV_LOG_LEVEL => 0,
            k if k == ENV_GPIO_BACKEND => 1,
            k if k == ENV_MOTION_DEVICE => 2,
            k if k == ENV_SERVICE_UNIT => 3,
            _ => return None,
        };
        values[idx].clone()
    };

    if let Ok(config) = SystemConfig::from_lookup(lookup) {
        assert!(config.validate().is_ok());
        assert!(!config.service_unit.trim().is_empty());
    }
});
