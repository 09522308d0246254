#![no_main]

use libfuzzer_sys::fuzz_target;
use utf_rs::Backend;

fuzz_target!(|data: &[u8]| {
    // UTF-8 validation must agree with the standard library on arbitrary
    // bytes, including the offset of the first invalid sequence.

    let backend = unsafe { Backend::new_unchecked("scalar") }.unwrap();
    let result = backend.validate_utf8_with_errors(data);

    match std::str::from_utf8(data) {
        Ok(s) => {
            assert!(result.is_ok(), "std accepts, we reject: {:?}", result);
            assert_eq!(result.count, data.len());
            assert_eq!(
                backend.count_utf8(data),
                s.chars().count(),
                "valid UTF-8 code point count should match std"
            );
            assert_eq!(backend.utf32_length_from_utf8(data), s.chars().count());
        }
        Err(e) => {
            assert!(result.is_err(), "std rejects at {}, we accept", e.valid_up_to());
            assert_eq!(
                result.count,
                e.valid_up_to(),
                "error offset must be the leading byte of the bad sequence"
            );
        }
    }

    // ASCII acceptance implies UTF-8 acceptance.
    if backend.validate_ascii(data) {
        assert!(result.is_ok(), "ASCII input rejected as UTF-8");
    }
});
