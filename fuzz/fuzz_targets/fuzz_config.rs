//! Fuzz target: `BacklightConfig` decoding
//!
//! Feeds arbitrary bytes to both the JSON and postcard decoders.  Any
//! config that decodes and validates must round-trip through postcard and
//! be accepted by `AppService::new`.
//!
//! cargo fuzz run fuzz_config

#![no_main]

use backlight::app::service::AppService;
use backlight::config::BacklightConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let from_json = core::str::from_utf8(data)
        .ok()
        .and_then(|s| BacklightConfig::from_json(s).ok());
    let from_blob = BacklightConfig::from_bytes(data).ok();

    for config in [from_json, from_blob].into_iter().flatten() {
        if config.validate().is_err() {
            continue;
        }
        let bytes = config.to_bytes().expect("valid config must encode");
        assert_eq!(BacklightConfig::from_bytes(&bytes), Ok(config.clone()));
        assert!(AppService::new(config).is_ok());
    }
});
