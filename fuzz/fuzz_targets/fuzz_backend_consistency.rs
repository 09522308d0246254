#![no_main]

use libfuzzer_sys::fuzz_target;
use utf_rs::{Backend, Endianness};

// The SIMD kernels must be bit-identical to the scalar reference on every
// input, including malformed ones: same results, same error offsets, same
// output buffers.
fn check_pair(scalar: Backend, simd: Backend, data: &[u8]) {
    assert_eq!(
        scalar.validate_ascii_with_errors(data),
        simd.validate_ascii_with_errors(data),
        "{} ASCII validation mismatch",
        simd.name()
    );
    assert_eq!(
        scalar.validate_utf8_with_errors(data),
        simd.validate_utf8_with_errors(data),
        "{} UTF-8 validation mismatch",
        simd.name()
    );
    assert_eq!(
        scalar.count_utf8(data),
        simd.count_utf8(data),
        "{} count mismatch",
        simd.name()
    );

    let len16 = scalar.utf16_length_from_utf8(data);
    let mut scalar_u16 = vec![0u16; len16];
    let mut simd_u16 = vec![0u16; len16];
    for endian in [Endianness::Little, Endianness::Big] {
        let a = scalar.convert_utf8_to_utf16_with_errors(data, &mut scalar_u16, endian);
        let b = simd.convert_utf8_to_utf16_with_errors(data, &mut simd_u16, endian);
        assert_eq!(a, b, "{} UTF-8 -> UTF-16 result mismatch", simd.name());
        if a.is_ok() {
            assert_eq!(scalar_u16, simd_u16, "{} UTF-8 -> UTF-16 output mismatch", simd.name());
        }
    }

    let len32 = scalar.utf32_length_from_utf8(data);
    let mut scalar_u32 = vec![0u32; len32];
    let mut simd_u32 = vec![0u32; len32];
    let a = scalar.convert_utf8_to_utf32_with_errors(data, &mut scalar_u32);
    let b = simd.convert_utf8_to_utf32_with_errors(data, &mut simd_u32);
    assert_eq!(a, b, "{} UTF-8 -> UTF-32 result mismatch", simd.name());
    if a.is_ok() {
        assert_eq!(scalar_u32, simd_u32, "{} UTF-8 -> UTF-32 output mismatch", simd.name());
    }

    // Reinterpret the input as UTF-16 units, preserving the stored layout.
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .collect();
    for endian in [Endianness::Little, Endianness::Big] {
        assert_eq!(
            scalar.validate_utf16_with_errors(&units, endian),
            simd.validate_utf16_with_errors(&units, endian),
            "{} UTF-16 validation mismatch",
            simd.name()
        );

        let len8 = scalar.utf8_length_from_utf16(&units, endian);
        let mut scalar_u8 = vec![0u8; len8];
        let mut simd_u8 = vec![0u8; len8];
        let a = scalar.convert_utf16_to_utf8_with_errors(&units, &mut scalar_u8, endian);
        let b = simd.convert_utf16_to_utf8_with_errors(&units, &mut simd_u8, endian);
        assert_eq!(a, b, "{} UTF-16 -> UTF-8 result mismatch", simd.name());
        if a.is_ok() {
            assert_eq!(scalar_u8, simd_u8, "{} UTF-16 -> UTF-8 output mismatch", simd.name());
        }
    }

    // And as UTF-32 values.
    let values: Vec<u32> = data
        .chunks_exact(4)
        .map(|quad| u32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]))
        .collect();
    assert_eq!(
        scalar.validate_utf32_with_errors(&values),
        simd.validate_utf32_with_errors(&values),
        "{} UTF-32 validation mismatch",
        simd.name()
    );
}

fuzz_target!(|data: &[u8]| {
    let scalar = unsafe { Backend::new_unchecked("scalar") }.unwrap();

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("avx2") {
            let avx2 = unsafe { Backend::new_unchecked("avx2") }.unwrap();
            check_pair(scalar, avx2, data);
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") {
            let neon = unsafe { Backend::new_unchecked("neon") }.unwrap();
            check_pair(scalar, neon, data);
        }
    }
});
