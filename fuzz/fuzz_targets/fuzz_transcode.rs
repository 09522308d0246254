#![no_main]

use libfuzzer_sys::fuzz_target;
use utf_rs::Endianness;

fuzz_target!(|data: &[u8]| {
    // Valid UTF-8 must survive a round trip through each target form, and the
    // length predictions must match the converters exactly.
    let backend = utf_rs::active_backend();
    if !backend.validate_utf8(data) {
        return;
    }

    for endian in [Endianness::Little, Endianness::Big] {
        let len16 = backend.utf16_length_from_utf8(data);
        let mut units = vec![0u16; len16];
        let n = backend.convert_utf8_to_utf16(data, &mut units, endian);
        assert_eq!(n, len16, "UTF-16 length prediction mismatch");
        assert!(backend.validate_utf16(&units, endian), "converted UTF-16 invalid");

        let len8 = backend.utf8_length_from_utf16(&units, endian);
        assert_eq!(len8, data.len(), "UTF-8 length prediction mismatch");
        let mut back = vec![0u8; len8];
        let m = backend.convert_utf16_to_utf8(&units, &mut back, endian);
        assert_eq!(m, data.len());
        assert_eq!(back, data, "UTF-16 round trip changed the data");
    }

    let len32 = backend.utf32_length_from_utf8(data);
    let mut values = vec![0u32; len32];
    let n = backend.convert_utf8_to_utf32(data, &mut values);
    assert_eq!(n, len32, "UTF-32 length prediction mismatch");
    assert!(backend.validate_utf32(&values), "converted UTF-32 invalid");
    assert_eq!(len32, backend.count_utf8(data), "code point count mismatch");

    let len8 = backend.utf8_length_from_utf32(&values);
    assert_eq!(len8, data.len());
    let mut back = vec![0u8; len8];
    let m = backend.convert_utf32_to_utf8(&values, &mut back);
    assert_eq!(m, data.len());
    assert_eq!(back, data, "UTF-32 round trip changed the data");
});
