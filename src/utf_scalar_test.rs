#[cfg(test)]
pub mod tests {
    use crate::utf_scalar;
    use crate::{check_bom, detect_encodings, Backend, EncodingKind, EncodingSet};
    use crate::{Endianness, ErrorCode, TranscodeResult};
    use pretty_assertions::assert_eq;
    use proptest::collection::vec as prop_vec;
    use proptest::prelude::*;
    use rstest::rstest;
    use rstest_reuse;
    use rstest_reuse::*;

    // Helpers to build expected results
    pub fn ok(count: usize) -> TranscodeResult {
        TranscodeResult {
            error: ErrorCode::Success,
            count,
        }
    }

    pub fn err(error: ErrorCode, offset: usize) -> TranscodeResult {
        TranscodeResult {
            error,
            count: offset,
        }
    }

    // Template: UTF-8 validation cases
    // Reused by utf_x86_test.rs and utf_arm64_test.rs against the SIMD kernels.
    // On success the count is the input length; on failure it is the offset of
    // the leading byte of the offending sequence.
    #[template]
    #[rstest]
    // Empty and ASCII
    #[case::empty(b"", ok(0))]
    #[case::ascii_short(b"hello", ok(5))]
    #[case::ascii_exact_8(b"12345678", ok(8))]
    #[case::ascii_long(b"the quick brown fox jumps over the lazy dog", ok(43))]
    // 2-byte sequences (110xxxxx 10xxxxxx)
    // é = C3 A9
    #[case::two_byte_complete(b"\xC3\xA9", ok(2))]
    #[case::ascii_plus_two_byte(b"caf\xC3\xA9", ok(5))]
    // 3-byte sequences (1110xxxx 10xxxxxx 10xxxxxx)
    // ✓ = E2 9C 93
    #[case::three_byte_complete(b"\xE2\x9C\x93", ok(3))]
    // 4-byte sequences (11110xxx 10xxxxxx 10xxxxxx 10xxxxxx)
    // 💯 = F0 9F 92 AF
    #[case::four_byte_complete(b"\xF0\x9F\x92\xAF", ok(4))]
    #[case::boundary_u10ffff(b"\xF4\x8F\xBF\xBF", ok(4))]
    // Truncated sequences
    #[case::truncated_two_byte(b"\xC3", err(ErrorCode::TooShort, 0))]
    #[case::truncated_three_byte_one(b"\xE2", err(ErrorCode::TooShort, 0))]
    #[case::truncated_three_byte_two(b"\xE2\x9C", err(ErrorCode::TooShort, 0))]
    #[case::truncated_four_byte_three(b"\xF0\x9F\x92", err(ErrorCode::TooShort, 0))]
    #[case::ascii_then_truncated(b"hello\xC3", err(ErrorCode::TooShort, 5))]
    #[case::broken_continuation(b"\xC3\x41", err(ErrorCode::TooShort, 0))]
    // Stray continuation bytes
    #[case::lone_continuation(b"\x80", err(ErrorCode::TooLong, 0))]
    #[case::continuation_after_ascii(b"ab\x80", err(ErrorCode::TooLong, 2))]
    #[case::extra_continuation(b"\xC3\xA9\xA9", err(ErrorCode::TooLong, 2))]
    // Invalid leading bytes
    #[case::header_ff(b"\xFF", err(ErrorCode::HeaderBits, 0))]
    #[case::header_fe(b"\xFE", err(ErrorCode::HeaderBits, 0))]
    #[case::header_f8(b"\xF8\x80\x80\x80\x80", err(ErrorCode::HeaderBits, 0))]
    // Overlong encodings
    #[case::overlong_two_byte(b"\xC0\x80", err(ErrorCode::Overlong, 0))]
    #[case::overlong_three_byte(b"\xE0\x80\x80", err(ErrorCode::Overlong, 0))]
    #[case::overlong_four_byte(b"\xF0\x80\x80\x80", err(ErrorCode::Overlong, 0))]
    // Surrogates and out-of-range code points
    #[case::encoded_high_surrogate(b"\xED\xA0\x80", err(ErrorCode::Surrogate, 0))]
    #[case::encoded_low_surrogate(b"\xED\xBF\xBF", err(ErrorCode::Surrogate, 0))]
    #[case::above_u10ffff(b"\xF4\x90\x80\x80", err(ErrorCode::TooLarge, 0))]
    // Errors past the SIMD chunk width (32/16 bytes)
    #[case::error_past_one_chunk(
        b"0123456789012345678901234567890123456789\x80",
        err(ErrorCode::TooLong, 40)
    )]
    #[case::sequence_split_across_chunks(
        b"0123456789012345678901234567890\xE2\x9C\x93",
        ok(34)
    )]
    pub fn common_utf8_validation_cases(#[case] input: &[u8], #[case] expected: TranscodeResult) {}

    // Template: UTF-16 validation cases, little-endian unit values.
    #[template]
    #[rstest]
    #[case::empty(&[], ok(0))]
    #[case::bmp_only(&[0x0068, 0x0069, 0x4E2D], ok(3))]
    #[case::max_bmp_non_surrogate(&[0xD7FF, 0xE000, 0xFFFF], ok(3))]
    // 💩 = D83D DCA9
    #[case::surrogate_pair(&[0xD83D, 0xDCA9], ok(2))]
    #[case::pair_between_bmp(&[0x0041, 0xD83D, 0xDCA9, 0x0042], ok(4))]
    #[case::lone_high(&[0xD800], err(ErrorCode::Surrogate, 0))]
    #[case::lone_low(&[0xDC00], err(ErrorCode::Surrogate, 0))]
    #[case::high_then_bmp(&[0xD800, 0x0041], err(ErrorCode::Surrogate, 0))]
    #[case::high_then_high(&[0xD800, 0xD800], err(ErrorCode::Surrogate, 0))]
    #[case::low_before_pair(&[0xDC00, 0xD83D, 0xDCA9], err(ErrorCode::Surrogate, 0))]
    // Pair straddling the NEON chunk boundary (8 units)
    #[case::pair_straddles_8(&[0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0xD83D, 0xDCA9], ok(9))]
    // Pair straddling the AVX2 chunk boundary (16 units)
    #[case::pair_straddles_16(
        &[0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
          0x69, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0xD83D, 0xDCA9],
        ok(17)
    )]
    #[case::lone_high_at_16(
        &[0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
          0x69, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0xD800],
        err(ErrorCode::Surrogate, 16)
    )]
    #[case::lone_low_past_chunk(
        &[0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
          0x69, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0xDC00],
        err(ErrorCode::Surrogate, 17)
    )]
    pub fn common_utf16_validation_cases(#[case] input: &[u16], #[case] expected: TranscodeResult) {}

    // Template: UTF-8 -> UTF-16LE conversion cases. `expected_out` holds
    // little-endian unit values and is only meaningful on success.
    #[template]
    #[rstest]
    #[case::empty(b"", ok(0), &[])]
    #[case::ascii(b"hi", ok(2), &[0x0068, 0x0069])]
    #[case::ascii_past_fast_path(b"0123456789", ok(10),
        &[0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39])]
    #[case::two_byte(b"\xC3\xA9", ok(1), &[0x00E9])]
    #[case::three_byte(b"\xE2\x9C\x93", ok(1), &[0x2713])]
    #[case::four_byte_pair(b"\xF0\x9F\x92\xA9", ok(2), &[0xD83D, 0xDCA9])]
    #[case::mixed(b"a\xC3\xA9\xF0\x9F\x92\xA9", ok(4), &[0x61, 0x00E9, 0xD83D, 0xDCA9])]
    #[case::truncated_tail(b"ab\xE2\x9C", err(ErrorCode::TooShort, 2), &[])]
    #[case::surrogate_in_input(b"ab\xED\xA0\x80", err(ErrorCode::Surrogate, 2), &[])]
    // Sequences crossing 16- and 32-byte load boundaries
    #[case::four_byte_at_30(
        b"012345678901234567890123456789\xF0\x9F\x92\xA9",
        ok(32),
        &[0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39,
          0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39,
          0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39,
          0xD83D, 0xDCA9]
    )]
    pub fn common_utf8_to_utf16le_cases(
        #[case] input: &[u8],
        #[case] expected: TranscodeResult,
        #[case] expected_out: &[u16],
    ) {
    }

    // Template: UTF-16LE -> UTF-8 conversion cases.
    #[template]
    #[rstest]
    #[case::empty(&[], ok(0), b"")]
    #[case::ascii(&[0x68, 0x69], ok(2), b"hi")]
    #[case::ascii_two_chunks(
        &[0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61,
          0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x61, 0x62],
        ok(17),
        b"aaaaaaaaaaaaaaaab"
    )]
    #[case::bmp_two_byte(&[0x00E9], ok(2), b"\xC3\xA9")]
    #[case::bmp_three_byte(&[0x2713], ok(3), b"\xE2\x9C\x93")]
    #[case::pair_to_four_byte(&[0xD83D, 0xDCA9], ok(4), b"\xF0\x9F\x92\xA9")]
    #[case::lone_high(&[0x41, 0xD800], err(ErrorCode::Surrogate, 1), b"")]
    #[case::lone_low(&[0xDC00, 0x41], err(ErrorCode::Surrogate, 0), b"")]
    pub fn common_utf16le_to_utf8_cases(
        #[case] input: &[u16],
        #[case] expected: TranscodeResult,
        #[case] expected_out: &[u8],
    ) {
    }

    // Template: UTF-8 -> UTF-32 conversion cases.
    #[template]
    #[rstest]
    #[case::empty(b"", ok(0), &[])]
    #[case::ascii(b"hi", ok(2), &[0x68, 0x69])]
    #[case::mixed(b"a\xC3\xA9\xE2\x9C\x93\xF0\x9F\x92\xA9", ok(4), &[0x61, 0xE9, 0x2713, 0x1F4A9])]
    #[case::four_byte_only(b"\xF4\x8F\xBF\xBF", ok(1), &[0x10FFFF])]
    #[case::overlong(b"\xC0\x80", err(ErrorCode::Overlong, 0), &[])]
    #[case::truncated(b"abcd\xF0\x9F", err(ErrorCode::TooShort, 4), &[])]
    pub fn common_utf8_to_utf32_cases(
        #[case] input: &[u8],
        #[case] expected: TranscodeResult,
        #[case] expected_out: &[u32],
    ) {
    }

    // ====================================================================
    // Template applications: scalar kernels
    // ====================================================================

    #[apply(common_utf8_validation_cases)]
    fn test_validate_utf8_scalar(input: &[u8], expected: TranscodeResult) {
        assert_eq!(utf_scalar::validate_utf8_with_errors(input), expected);
    }

    #[apply(common_utf16_validation_cases)]
    fn test_validate_utf16_scalar(input: &[u16], expected: TranscodeResult) {
        assert_eq!(
            utf_scalar::validate_utf16_with_errors(input, Endianness::Little),
            expected
        );
        // The same unit values byte-swapped must validate identically as BE.
        let swapped: Vec<u16> = input.iter().map(|u| u.swap_bytes()).collect();
        assert_eq!(
            utf_scalar::validate_utf16_with_errors(&swapped, Endianness::Big),
            expected
        );
    }

    #[apply(common_utf8_to_utf16le_cases)]
    fn test_convert_utf8_to_utf16_scalar(
        input: &[u8],
        expected: TranscodeResult,
        expected_out: &[u16],
    ) {
        let mut dst = vec![0u16; utf_scalar::utf16_length_from_utf8(input)];
        let result = utf_scalar::convert_utf8_to_utf16_with_errors(input, &mut dst, Endianness::Little);
        assert_eq!(result, expected, "input: {:?}", input);
        if expected.is_ok() {
            assert_eq!(&dst[..result.count], expected_out);
        }
    }

    #[apply(common_utf16le_to_utf8_cases)]
    fn test_convert_utf16_to_utf8_scalar(
        input: &[u16],
        expected: TranscodeResult,
        expected_out: &[u8],
    ) {
        let mut dst = vec![0u8; utf_scalar::utf8_length_from_utf16(input, Endianness::Little)];
        let result = utf_scalar::convert_utf16_to_utf8_with_errors(input, &mut dst, Endianness::Little);
        assert_eq!(result, expected, "input: {:?}", input);
        if expected.is_ok() {
            assert_eq!(&dst[..result.count], expected_out);
        }
    }

    #[apply(common_utf8_to_utf32_cases)]
    fn test_convert_utf8_to_utf32_scalar(
        input: &[u8],
        expected: TranscodeResult,
        expected_out: &[u32],
    ) {
        let mut dst = vec![0u32; utf_scalar::utf32_length_from_utf8(input)];
        let result = utf_scalar::convert_utf8_to_utf32_with_errors(input, &mut dst);
        assert_eq!(result, expected, "input: {:?}", input);
        if expected.is_ok() {
            assert_eq!(&dst[..result.count], expected_out);
        }
    }

    // ====================================================================
    // ASCII and UTF-32 validation
    // ====================================================================

    #[rstest]
    #[case::empty(b"", ok(0))]
    #[case::short(b"abc", ok(3))]
    #[case::exact_block(b"12345678", ok(8))]
    #[case::high_bit_in_block(b"1234\x80678", err(ErrorCode::TooLarge, 4))]
    #[case::high_bit_in_tail(b"123456789\xFF", err(ErrorCode::TooLarge, 9))]
    #[case::high_bit_past_simd_chunk(
        b"0123456789012345678901234567890123\xC3\xA9",
        err(ErrorCode::TooLarge, 34)
    )]
    fn test_validate_ascii_scalar(#[case] input: &[u8], #[case] expected: TranscodeResult) {
        assert_eq!(utf_scalar::validate_ascii_with_errors(input), expected);
    }

    #[rstest]
    #[case::empty(&[], ok(0))]
    #[case::plain(&[0x61, 0x10FFFF, 0xE000], ok(3))]
    #[case::surrogate_low_edge(&[0xD800], err(ErrorCode::Surrogate, 0))]
    #[case::surrogate_high_edge(&[0xDFFF], err(ErrorCode::Surrogate, 0))]
    #[case::too_large(&[0x61, 0x110000], err(ErrorCode::TooLarge, 1))]
    #[case::error_past_simd_chunks(
        &[0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0xD800],
        err(ErrorCode::Surrogate, 8)
    )]
    fn test_validate_utf32_scalar(#[case] input: &[u32], #[case] expected: TranscodeResult) {
        assert_eq!(utf_scalar::validate_utf32_with_errors(input), expected);
    }

    // ====================================================================
    // Remaining conversion directions
    // ====================================================================

    #[rstest]
    #[case::bmp(&[0x68, 0x2713], &[0x68, 0x2713])]
    #[case::pair(&[0xD83D, 0xDCA9], &[0x1F4A9])]
    fn test_convert_utf16_to_utf32_scalar(#[case] input: &[u16], #[case] expected: &[u32]) {
        let mut dst = vec![0u32; utf_scalar::utf32_length_from_utf16(input, Endianness::Little)];
        let result =
            utf_scalar::convert_utf16_to_utf32_with_errors(input, &mut dst, Endianness::Little);
        assert_eq!(result, ok(expected.len()));
        assert_eq!(&dst[..], expected);
    }

    #[test]
    fn test_convert_utf16_to_utf32_lone_surrogate() {
        let input = [0x41u16, 0xDC00];
        let mut dst = [0u32; 2];
        let result =
            utf_scalar::convert_utf16_to_utf32_with_errors(&input, &mut dst, Endianness::Little);
        assert_eq!(result, err(ErrorCode::Surrogate, 1));
        assert_eq!(result.count_or_zero(), 0);
    }

    #[rstest]
    #[case::ascii(&[0x68, 0x69], b"hi")]
    #[case::all_widths(&[0x61, 0xE9, 0x2713, 0x1F4A9], b"a\xC3\xA9\xE2\x9C\x93\xF0\x9F\x92\xA9")]
    fn test_convert_utf32_to_utf8_scalar(#[case] input: &[u32], #[case] expected: &[u8]) {
        let mut dst = vec![0u8; utf_scalar::utf8_length_from_utf32(input)];
        let result = utf_scalar::convert_utf32_to_utf8_with_errors(input, &mut dst);
        assert_eq!(result, ok(expected.len()));
        assert_eq!(&dst[..], expected);
    }

    #[test]
    fn test_convert_utf32_to_utf8_rejects_surrogate_and_range() {
        let mut dst = [0u8; 8];
        assert_eq!(
            utf_scalar::convert_utf32_to_utf8_with_errors(&[0x61, 0xD800], &mut dst),
            err(ErrorCode::Surrogate, 1)
        );
        assert_eq!(
            utf_scalar::convert_utf32_to_utf8_with_errors(&[0x110000], &mut dst),
            err(ErrorCode::TooLarge, 0)
        );
    }

    #[rstest]
    #[case::bmp(&[0x68, 0x2713], &[0x68, 0x2713])]
    #[case::supplementary(&[0x1F4A9], &[0xD83D, 0xDCA9])]
    fn test_convert_utf32_to_utf16_scalar(#[case] input: &[u32], #[case] expected: &[u16]) {
        let mut dst = vec![0u16; utf_scalar::utf16_length_from_utf32(input)];
        let result =
            utf_scalar::convert_utf32_to_utf16_with_errors(input, &mut dst, Endianness::Little);
        assert_eq!(result, ok(expected.len()));
        assert_eq!(&dst[..], expected);
    }

    // ====================================================================
    // Big-endian storage
    // ====================================================================

    #[test]
    fn test_convert_utf8_to_utf16be_swaps_unit_bytes() {
        let mut le = [0u16; 4];
        let mut be = [0u16; 4];
        let input = b"a\xF0\x9F\x92\xA9";
        let n_le = utf_scalar::convert_utf8_to_utf16_with_errors(input, &mut le, Endianness::Little).count;
        let n_be = utf_scalar::convert_utf8_to_utf16_with_errors(input, &mut be, Endianness::Big).count;
        assert_eq!(n_le, 3);
        assert_eq!(n_be, 3);
        for i in 0..n_le {
            assert_eq!(be[i], le[i].swap_bytes());
        }
    }

    #[test]
    fn test_convert_utf16be_to_utf8() {
        // "hé" with each unit stored big-endian
        let stored = [0x0068u16.to_be(), 0x00E9u16.to_be()];
        let mut dst = [0u8; 8];
        let result =
            utf_scalar::convert_utf16_to_utf8_with_errors(&stored, &mut dst, Endianness::Big);
        assert_eq!(result, ok(3));
        assert_eq!(&dst[..3], b"h\xC3\xA9");
    }

    #[test]
    fn test_change_endianness_utf16_is_involutive() {
        let src = [0x0041u16, 0xD83D, 0xDCA9, 0xFFFE];
        let mut swapped = [0u16; 4];
        let mut back = [0u16; 4];
        assert_eq!(utf_scalar::change_endianness_utf16(&src, &mut swapped), 4);
        assert_eq!(utf_scalar::change_endianness_utf16(&swapped, &mut back), 4);
        assert_eq!(back, src);
        assert_eq!(swapped[0], 0x4100);
    }

    // ====================================================================
    // Trusted-input conversions
    // ====================================================================

    #[rstest]
    #[case::ascii("hello")]
    #[case::mixed("héllo ✓ 💯")]
    #[case::cjk("中文測試")]
    fn test_convert_valid_matches_checked(#[case] text: &str) {
        let src = text.as_bytes();

        let mut checked16 = vec![0u16; utf_scalar::utf16_length_from_utf8(src)];
        let mut trusted16 = vec![0u16; checked16.len()];
        let n = utf_scalar::convert_utf8_to_utf16_with_errors(src, &mut checked16, Endianness::Little)
            .count;
        assert_eq!(
            utf_scalar::convert_valid_utf8_to_utf16(src, &mut trusted16, Endianness::Little),
            n
        );
        assert_eq!(trusted16, checked16);

        let mut checked32 = vec![0u32; utf_scalar::utf32_length_from_utf8(src)];
        let mut trusted32 = vec![0u32; checked32.len()];
        let n = utf_scalar::convert_utf8_to_utf32_with_errors(src, &mut checked32).count;
        assert_eq!(utf_scalar::convert_valid_utf8_to_utf32(src, &mut trusted32), n);
        assert_eq!(trusted32, checked32);

        let mut back8 = vec![0u8; utf_scalar::utf8_length_from_utf16(&checked16, Endianness::Little)];
        assert_eq!(
            utf_scalar::convert_valid_utf16_to_utf8(&checked16, &mut back8, Endianness::Little),
            src.len()
        );
        assert_eq!(&back8[..], src);

        let mut back8_from32 = vec![0u8; utf_scalar::utf8_length_from_utf32(&checked32)];
        assert_eq!(
            utf_scalar::convert_valid_utf32_to_utf8(&checked32, &mut back8_from32),
            src.len()
        );
        assert_eq!(&back8_from32[..], src);
    }

    // ====================================================================
    // Rewind recovery
    // ====================================================================

    #[rstest]
    #[case::on_leading(b"a\xE2\x9C\x93", 1, 1)]
    #[case::one_back(b"a\xE2\x9C\x93", 2, 1)]
    #[case::two_back(b"a\xE2\x9C\x93", 3, 1)]
    #[case::three_back(b"\xF0\x9F\x92\xA9", 3, 0)]
    #[case::at_zero(b"\x80\x80", 0, 0)]
    #[case::on_ascii(b"abc", 1, 1)]
    fn test_rewind_to_leading_byte(
        #[case] input: &[u8],
        #[case] pos: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(utf_scalar::rewind_to_leading_byte(input, pos), expected);
    }

    #[test]
    fn test_rewind_and_convert_resumes_mid_sequence() {
        // Simulates a SIMD kernel handing off two bytes into the emoji.
        let src = b"ab\xF0\x9F\x92\xA9";
        let mut dst = [0u32; 4];
        dst[0] = 0x61;
        dst[1] = 0x62;
        let result = utf_scalar::rewind_and_convert_utf8_to_utf32_with_errors(src, 4, &mut dst, 2);
        assert_eq!(result, ok(3));
        assert_eq!(&dst[..3], &[0x61, 0x62, 0x1F4A9]);
    }

    #[test]
    fn test_rewind_and_convert_reports_absolute_offset() {
        let src = b"ab\xF0\x9F\x92\xFF";
        let mut dst = [0u16; 4];
        let result =
            utf_scalar::rewind_and_convert_utf8_to_utf16_with_errors(src, 4, &mut dst, 2, Endianness::Little);
        assert_eq!(result, err(ErrorCode::TooShort, 2));
    }

    // ====================================================================
    // Counting and length prediction
    // ====================================================================

    #[rstest]
    #[case::empty("", 0)]
    #[case::ascii("hello", 5)]
    #[case::mixed("héllo ✓ 💯", 9)]
    fn test_count_utf8(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(utf_scalar::count_utf8(text.as_bytes()), expected);
        assert_eq!(text.chars().count(), expected);
    }

    #[rstest]
    #[case::bmp_only(&[0x68, 0x2713], 2)]
    #[case::with_pair(&[0x68, 0xD83D, 0xDCA9], 2)]
    fn test_count_utf16(#[case] input: &[u16], #[case] expected: usize) {
        assert_eq!(utf_scalar::count_utf16(input, Endianness::Little), expected);
    }

    #[rstest]
    #[case::ascii("abc")]
    #[case::two_byte("café")]
    #[case::three_byte("✓✓")]
    #[case::four_byte("💯💯")]
    #[case::mixed("a é ✓ 💯")]
    fn test_length_predictions_match_conversions(#[case] text: &str) {
        let src = text.as_bytes();

        let predicted16 = utf_scalar::utf16_length_from_utf8(src);
        let mut dst16 = vec![0u16; predicted16];
        assert_eq!(
            utf_scalar::convert_utf8_to_utf16_with_errors(src, &mut dst16, Endianness::Little),
            ok(predicted16)
        );

        let predicted32 = utf_scalar::utf32_length_from_utf8(src);
        let mut dst32 = vec![0u32; predicted32];
        assert_eq!(
            utf_scalar::convert_utf8_to_utf32_with_errors(src, &mut dst32),
            ok(predicted32)
        );

        assert_eq!(
            utf_scalar::utf8_length_from_utf16(&dst16, Endianness::Little),
            src.len()
        );
        assert_eq!(
            utf_scalar::utf32_length_from_utf16(&dst16, Endianness::Little),
            predicted32
        );
        assert_eq!(utf_scalar::utf8_length_from_utf32(&dst32), src.len());
        assert_eq!(utf_scalar::utf16_length_from_utf32(&dst32), predicted16);
    }

    // ====================================================================
    // Byte-oriented validators (encoding detection support)
    // ====================================================================

    #[rstest]
    #[case::empty(b"", true)]
    #[case::ascii_le(b"h\x00i\x00", true)]
    #[case::pair_le(b"\x3D\xD8\xA9\xDC", true)]
    #[case::lone_high_le(b"\x3D\xD8", false)]
    #[case::lone_low_le(b"\xA9\xDC", false)]
    fn test_validate_utf16_bytes_le(#[case] buf: &[u8], #[case] expected: bool) {
        assert_eq!(
            utf_scalar::validate_utf16_bytes(buf, Endianness::Little),
            expected
        );
    }

    #[rstest]
    #[case::ascii_be(b"\x00h\x00i", true)]
    #[case::pair_be(b"\xD8\x3D\xDC\xA9", true)]
    #[case::lone_high_be(b"\xD8\x3D\x00h", false)]
    fn test_validate_utf16_bytes_be(#[case] buf: &[u8], #[case] expected: bool) {
        assert_eq!(
            utf_scalar::validate_utf16_bytes(buf, Endianness::Big),
            expected
        );
    }

    #[rstest]
    #[case::ascii(b"h\x00\x00\x00", true)]
    #[case::max_code_point(b"\xFF\xFF\x10\x00", true)]
    #[case::surrogate(b"\x00\xD8\x00\x00", false)]
    #[case::too_large(b"\x00\x00\x11\x00", false)]
    fn test_validate_utf32le_bytes(#[case] buf: &[u8], #[case] expected: bool) {
        assert_eq!(utf_scalar::validate_utf32le_bytes(buf), expected);
    }

    // ====================================================================
    // BOM handling and encoding detection
    // ====================================================================

    #[rstest]
    #[case::utf8(b"\xEF\xBB\xBFhello", Some((EncodingKind::Utf8, 3)))]
    #[case::utf16le(b"\xFF\xFEh\x00", Some((EncodingKind::Utf16Le, 2)))]
    #[case::utf16be(b"\xFE\xFF\x00h", Some((EncodingKind::Utf16Be, 2)))]
    // FF FE 00 00 must read as the longer UTF-32LE mark, not UTF-16LE + NUL.
    #[case::utf32le_beats_utf16le(b"\xFF\xFE\x00\x00", Some((EncodingKind::Utf32Le, 4)))]
    #[case::utf32be(b"\x00\x00\xFE\xFFrest", Some((EncodingKind::Utf32Be, 4)))]
    #[case::none(b"hello", None)]
    #[case::truncated_mark(b"\xFF", None)]
    #[case::empty(b"", None)]
    fn test_check_bom(#[case] buf: &[u8], #[case] expected: Option<(EncodingKind, usize)>) {
        assert_eq!(check_bom(buf), expected);
    }

    #[test]
    fn test_detect_encodings_trusts_bom() {
        // The payload after the mark is not even valid UTF-16, but a BOM wins.
        let set = detect_encodings(b"\xFF\xFE\x00\xD8");
        assert!(set.contains(EncodingKind::Utf16Le));
        assert!(!set.contains(EncodingKind::Utf8));
    }

    #[test]
    fn test_detect_encodings_without_bom() {
        // Plain ASCII of even length reads as UTF-8 and UTF-16LE, and as
        // UTF-32LE only when the length is divisible by four.
        let set = detect_encodings(b"AB");
        assert!(set.contains(EncodingKind::Utf8));
        assert!(set.contains(EncodingKind::Utf16Le));
        assert!(!set.contains(EncodingKind::Utf32Le));

        let set = detect_encodings(b"h\x00\x00\x00");
        assert!(set.contains(EncodingKind::Utf32Le));

        assert!(detect_encodings(b"\xFF").is_empty());
    }

    #[test]
    fn test_detect_encodings_empty_is_everything() {
        let set = detect_encodings(b"");
        assert!(set.contains(EncodingKind::Utf8));
        assert!(set.contains(EncodingKind::Utf16Le));
        assert!(set.contains(EncodingKind::Utf32Le));
    }

    #[test]
    fn test_encoding_set_display() {
        let mut set = EncodingSet::empty();
        assert_eq!(set.to_string(), "none");
        set.insert(EncodingKind::Utf16Le);
        set.insert(EncodingKind::Utf8);
        assert_eq!(set.to_string(), "UTF-8, UTF-16LE");
    }

    // ====================================================================
    // Backend dispatch surface
    // ====================================================================

    #[test]
    fn test_detected_backend_is_available() {
        let backend = Backend::detect();
        assert!(backend.supported());
        assert!(backend.available());
        assert!(!backend.requires_alignment());
        assert!(backend.alignment() >= 1);
    }

    #[test]
    fn test_backend_new_unchecked_names() {
        assert!(unsafe { Backend::new_unchecked("scalar") }.is_some());
        assert!(unsafe { Backend::new_unchecked("avx2") }.is_some());
        assert!(unsafe { Backend::new_unchecked("neon") }.is_some());
        assert!(unsafe { Backend::new_unchecked("sse9") }.is_none());
    }

    #[test]
    fn test_scalar_backend_always_works() {
        let backend = unsafe { Backend::new_unchecked("scalar") }.unwrap();
        assert_eq!(backend.name(), "Scalar");
        assert!(backend.available());
        assert!(backend.validate_utf8("héllo ✓".as_bytes()));
        assert_eq!(backend.count_utf8("héllo ✓".as_bytes()), 7);
    }

    #[test]
    fn test_free_functions_route_through_active_backend() {
        assert!(crate::validate_utf8(b"hello"));
        assert!(!crate::validate_utf8(b"\xFF"));
        assert!(crate::validate_utf16le(&[0xD83D, 0xDCA9]));
        assert!(!crate::validate_utf16be(&[0xD800u16.to_be()]));
        assert_eq!(crate::count_utf8("héllo".as_bytes()), 5);
        assert_eq!(crate::utf16_length_from_utf8("💯".as_bytes()), 2);

        let mut swapped = [0u16; 2];
        assert_eq!(crate::change_endianness_utf16(&[0x1234, 0xABCD], &mut swapped), 2);
        assert_eq!(swapped, [0x3412, 0xCDAB]);
    }

    // ====================================================================
    // Property-Based Tests (PropTest)
    // ====================================================================

    // Property: UTF-8 validation agrees with the standard library, including
    // the reported error offset (std's valid_up_to is the leading byte of the
    // first bad sequence).
    proptest! {
        #[test]
        fn prop_validate_utf8_matches_std(bytes in prop_vec(0u8..=255u8, 0..200)) {
            let result = utf_scalar::validate_utf8_with_errors(&bytes);
            match std::str::from_utf8(&bytes) {
                Ok(_) => prop_assert!(result.is_ok(), "std accepts, we reject: {:?}", result),
                Err(e) => {
                    prop_assert!(result.is_err(), "std rejects at {}, we accept", e.valid_up_to());
                    prop_assert_eq!(result.count, e.valid_up_to());
                }
            }
        }
    }

    // Property: valid strings round-trip through UTF-16LE and back.
    proptest! {
        #[test]
        fn prop_utf8_utf16_round_trip(input in "\\PC*") {
            let src = input.as_bytes();
            let mut units = vec![0u16; utf_scalar::utf16_length_from_utf8(src)];
            let n = utf_scalar::convert_utf8_to_utf16_with_errors(src, &mut units, Endianness::Little);
            prop_assert_eq!(n, ok(units.len()));
            prop_assert!(utf_scalar::validate_utf16_with_errors(&units, Endianness::Little).is_ok());

            let mut back = vec![0u8; utf_scalar::utf8_length_from_utf16(&units, Endianness::Little)];
            let m = utf_scalar::convert_utf16_to_utf8_with_errors(&units, &mut back, Endianness::Little);
            prop_assert_eq!(m, ok(src.len()));
            prop_assert_eq!(&back[..], src);
        }
    }

    // Property: valid strings round-trip through UTF-32 and back.
    proptest! {
        #[test]
        fn prop_utf8_utf32_round_trip(input in "\\PC*") {
            let src = input.as_bytes();
            let mut points = vec![0u32; utf_scalar::utf32_length_from_utf8(src)];
            let n = utf_scalar::convert_utf8_to_utf32_with_errors(src, &mut points);
            prop_assert_eq!(n, ok(points.len()));
            prop_assert!(utf_scalar::validate_utf32_with_errors(&points).is_ok());

            let expected: Vec<u32> = input.chars().map(|c| c as u32).collect();
            prop_assert_eq!(&points, &expected);

            let mut back = vec![0u8; utf_scalar::utf8_length_from_utf32(&points)];
            let m = utf_scalar::convert_utf32_to_utf8_with_errors(&points, &mut back);
            prop_assert_eq!(m, ok(src.len()));
            prop_assert_eq!(&back[..], src);
        }
    }

    // Property: count_utf8 equals chars().count() on valid input.
    proptest! {
        #[test]
        fn prop_count_utf8_matches_chars(input in "\\PC*") {
            prop_assert_eq!(utf_scalar::count_utf8(input.as_bytes()), input.chars().count());
        }
    }

    // Property: UTF-16 validation agrees with char::decode_utf16 on native-
    // order unit values.
    #[cfg(target_endian = "little")]
    proptest! {
        #[test]
        fn prop_validate_utf16le_matches_decode_utf16(units in prop_vec(0u16..=0xFFFF, 0..100)) {
            let ours = utf_scalar::validate_utf16_with_errors(&units, Endianness::Little).is_ok();
            let std_ok = char::decode_utf16(units.iter().copied()).all(|r| r.is_ok());
            prop_assert_eq!(ours, std_ok);
        }
    }

    // Property: the plain convert entry points return 0 exactly when their
    // checked form errors, and the checked count otherwise.
    proptest! {
        #[test]
        fn prop_plain_convert_zero_on_error(bytes in prop_vec(0u8..=255u8, 0..100)) {
            let mut dst = vec![0u16; crate::utf16_length_from_utf8(&bytes)];
            let checked = crate::convert_utf8_to_utf16le_with_errors(&bytes, &mut dst);
            let mut dst2 = vec![0u16; dst.len()];
            let plain = crate::convert_utf8_to_utf16le(&bytes, &mut dst2);
            if checked.is_ok() {
                prop_assert_eq!(plain, checked.count);
            } else {
                prop_assert_eq!(plain, 0);
            }
        }
    }
}
