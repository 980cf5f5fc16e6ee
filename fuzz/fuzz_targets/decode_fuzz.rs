#![no_main]
use asegraph::DecodeOptions;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must only ever produce errors, never panics.
    let _ = asegraph::decode(data);

    // Same input with hidden pixels materialized and a tight cel limit.
    let opts = DecodeOptions {
        load_hidden_pixels: true,
        max_cel_bytes: 1 << 20,
    };
    let _ = asegraph::decode_with_options(data, &opts);
});
