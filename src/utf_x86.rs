//! x86/x86_64 SIMD kernels for Unicode validation and transcoding.
//!
//! This module contains platform-specific optimizations using:
//! - AVX2: 32 bytes/instruction (Intel Haswell+, AMD Excavator+)
//!
//! Every kernel shares its contract with the scalar module: identical results,
//! identical error offsets, on every input. Chunks that cannot be handled
//! vectorially (non-ASCII runs, chunk-straddling sequences) are handed to the
//! scalar steppers, and the vector loop resumes at the next boundary.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::utf_scalar;
use crate::{Endianness, ErrorCode, TranscodeResult};

/// Byte shuffle that swaps the two bytes of every 16-bit lane.
const SWAP16: [u8; 32] = [
    1, 0, 3, 2, 5, 4, 7, 6, 9, 8, 11, 10, 13, 12, 15, 14, //
    1, 0, 3, 2, 5, 4, 7, 6, 9, 8, 11, 10, 13, 12, 15, 14,
];

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn load_chunk(ptr: *const u8) -> __m256i {
    unsafe { _mm256_loadu_si256(ptr as *const __m256i) }
}

#[target_feature(enable = "avx2")]
#[inline]
unsafe fn load_utf16_chunk(src: &[u16], pos: usize, endian: Endianness) -> __m256i {
    unsafe {
        let chunk = _mm256_loadu_si256(src.as_ptr().add(pos) as *const __m256i);
        if endian == Endianness::Big {
            let swap = _mm256_loadu_si256(SWAP16.as_ptr() as *const __m256i);
            _mm256_shuffle_epi8(chunk, swap)
        } else {
            chunk
        }
    }
}

// ============================================================================
// ASCII
// ============================================================================

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn validate_ascii_avx2(src: &[u8]) -> TranscodeResult {
    let mut pos = 0;
    while pos + 32 <= src.len() {
        let mask = unsafe { _mm256_movemask_epi8(load_chunk(src.as_ptr().add(pos))) } as u32;
        if mask != 0 {
            return TranscodeResult::error(ErrorCode::TooLarge, pos + mask.trailing_zeros() as usize);
        }
        pos += 32;
    }
    match utf_scalar::validate_ascii_with_errors(&src[pos..]) {
        r if r.is_ok() => TranscodeResult::success(src.len()),
        r => TranscodeResult::error(r.error, pos + r.count),
    }
}

// ============================================================================
// UTF-8
// ============================================================================

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn validate_utf8_avx2(src: &[u8]) -> TranscodeResult {
    let mut pos = 0;
    while pos + 32 <= src.len() {
        let mask = unsafe { _mm256_movemask_epi8(load_chunk(src.as_ptr().add(pos))) } as u32;
        if mask == 0 {
            pos += 32;
            continue;
        }
        // Mixed chunk: decode code points until the window is consumed. A
        // sequence may run past the window end; the loop condition absorbs it.
        let window_end = pos + 32;
        while pos < window_end && pos < src.len() {
            match utf_scalar::decode_utf8(src, pos) {
                Ok((_, next)) => pos = next,
                Err(code) => return TranscodeResult::error(code, pos),
            }
        }
    }
    utf_scalar::validate_utf8_from(src, pos)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn convert_utf8_to_utf16_avx2(
    src: &[u8],
    dst: &mut [u16],
    endian: Endianness,
) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 32 <= src.len() {
        let chunk = unsafe { load_chunk(src.as_ptr().add(pos)) };
        let mask = unsafe { _mm256_movemask_epi8(chunk) } as u32;
        if mask == 0 {
            // Widen 32 ASCII bytes to 32 UTF-16 units.
            unsafe {
                let lo = _mm256_castsi256_si128(chunk);
                let hi = _mm256_extracti128_si256::<1>(chunk);
                let mut w0 = _mm256_cvtepu8_epi16(lo);
                let mut w1 = _mm256_cvtepu8_epi16(hi);
                if endian == Endianness::Big {
                    let swap = _mm256_loadu_si256(SWAP16.as_ptr() as *const __m256i);
                    w0 = _mm256_shuffle_epi8(w0, swap);
                    w1 = _mm256_shuffle_epi8(w1, swap);
                }
                _mm256_storeu_si256(dst.as_mut_ptr().add(out) as *mut __m256i, w0);
                _mm256_storeu_si256(dst.as_mut_ptr().add(out + 16) as *mut __m256i, w1);
            }
            pos += 32;
            out += 32;
            continue;
        }
        let window_end = pos + 32;
        while pos < window_end && pos < src.len() {
            match utf_scalar::decode_utf8(src, pos) {
                Ok((value, next)) => {
                    out += utf_scalar::encode_utf16(value, dst, out, endian);
                    pos = next;
                }
                Err(code) => return TranscodeResult::error(code, pos),
            }
        }
    }
    utf_scalar::rewind_and_convert_utf8_to_utf16_with_errors(src, pos, dst, out, endian)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn convert_utf8_to_utf32_avx2(src: &[u8], dst: &mut [u32]) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 32 <= src.len() {
        let chunk = unsafe { load_chunk(src.as_ptr().add(pos)) };
        let mask = unsafe { _mm256_movemask_epi8(chunk) } as u32;
        if mask == 0 {
            // Widen 32 ASCII bytes to 32 UTF-32 units, 8 at a time.
            unsafe {
                for i in 0..4 {
                    let eight =
                        _mm_loadl_epi64(src.as_ptr().add(pos + i * 8) as *const __m128i);
                    let wide = _mm256_cvtepu8_epi32(eight);
                    _mm256_storeu_si256(dst.as_mut_ptr().add(out + i * 8) as *mut __m256i, wide);
                }
            }
            pos += 32;
            out += 32;
            continue;
        }
        let window_end = pos + 32;
        while pos < window_end && pos < src.len() {
            match utf_scalar::decode_utf8(src, pos) {
                Ok((value, next)) => {
                    dst[out] = value;
                    out += 1;
                    pos = next;
                }
                Err(code) => return TranscodeResult::error(code, pos),
            }
        }
    }
    utf_scalar::rewind_and_convert_utf8_to_utf32_with_errors(src, pos, dst, out)
}

/// Number of code points: bytes that are not UTF-8 continuations.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn count_utf8_avx2(src: &[u8]) -> usize {
    let mut count = 0;
    let mut pos = 0;

    // Continuation bytes match 10xxxxxx: isolate the top two bits and compare.
    while pos + 32 <= src.len() {
        unsafe {
            let chunk = load_chunk(src.as_ptr().add(pos));
            let masked = _mm256_and_si256(chunk, _mm256_set1_epi8(0b1100_0000u8 as i8));
            let is_cont = _mm256_cmpeq_epi8(masked, _mm256_set1_epi8(0b1000_0000u8 as i8));
            let cont_mask = _mm256_movemask_epi8(is_cont) as u32;
            count += 32 - cont_mask.count_ones() as usize;
        }
        pos += 32;
    }

    count + utf_scalar::count_utf8(&src[pos..])
}

// ============================================================================
// UTF-16
// ============================================================================

/// Surrogate-pair validation over 16 units per iteration.
///
/// Builds three bitmasks from the chunk: V (non-surrogate), H (high-surrogate
/// candidates), L (low-surrogate candidates), then checks `V | a | b` where
/// `a = H & (L >> 2)` marks highs correctly followed by lows and `b = a << 2`
/// marks their partners. Movemasks double every unit's bit, hence the shifts
/// by 2. All-ones means the chunk is valid; all-ones except the last unit
/// means a trailing high surrogate that must be re-examined with the next
/// chunk (the cursor retreats one unit); anything else is a hard failure
/// localized by a scalar re-scan.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn validate_utf16_avx2(src: &[u16], endian: Endianness) -> TranscodeResult {
    let mut pos = 0;
    while pos + 16 <= src.len() {
        let chunk = unsafe { load_utf16_chunk(src, pos, endian) };
        let (surr_mask, hi_mask, lo_mask) = unsafe {
            let blocked = _mm256_and_si256(chunk, _mm256_set1_epi16(0xF800u16 as i16));
            let surr = _mm256_cmpeq_epi16(blocked, _mm256_set1_epi16(0xD800u16 as i16));
            let paired = _mm256_and_si256(chunk, _mm256_set1_epi16(0xFC00u16 as i16));
            let hi = _mm256_cmpeq_epi16(paired, _mm256_set1_epi16(0xD800u16 as i16));
            let lo = _mm256_cmpeq_epi16(paired, _mm256_set1_epi16(0xDC00u16 as i16));
            (
                _mm256_movemask_epi8(surr) as u32,
                _mm256_movemask_epi8(hi) as u32,
                _mm256_movemask_epi8(lo) as u32,
            )
        };

        if surr_mask == 0 {
            pos += 16;
            continue;
        }

        let v = !surr_mask;
        let a = hi_mask & (lo_mask >> 2);
        let b = a << 2;
        let c = v | a | b;

        if c == u32::MAX {
            pos += 16;
        } else if c == 0x3FFF_FFFF && hi_mask >> 30 == 0b11 {
            // Trailing high surrogate: re-examine it together with the next
            // chunk rather than reporting a false error.
            pos += 15;
        } else {
            return utf_scalar::validate_utf16_from(src, pos, endian);
        }
    }
    utf_scalar::validate_utf16_from(src, pos, endian)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn convert_utf16_to_utf8_avx2(
    src: &[u16],
    dst: &mut [u8],
    endian: Endianness,
) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 16 <= src.len() {
        let chunk = unsafe { load_utf16_chunk(src, pos, endian) };
        let ascii = unsafe {
            let high_bits = _mm256_and_si256(chunk, _mm256_set1_epi16(0xFF80u16 as i16));
            let is_ascii = _mm256_cmpeq_epi16(high_bits, _mm256_setzero_si256());
            _mm256_movemask_epi8(is_ascii) as u32
        };
        if ascii == u32::MAX {
            // Pack 16 ASCII units down to 16 bytes.
            unsafe {
                let packed = _mm256_packus_epi16(chunk, chunk);
                let ordered = _mm256_permute4x64_epi64::<0b11_01_10_00>(packed);
                let low = _mm256_castsi256_si128(ordered);
                _mm_storeu_si128(dst.as_mut_ptr().add(out) as *mut __m128i, low);
            }
            pos += 16;
            out += 16;
            continue;
        }
        let window_end = pos + 16;
        while pos < window_end && pos < src.len() {
            match utf_scalar::decode_utf16(src, pos, endian) {
                Ok((value, next)) => {
                    out += utf_scalar::encode_utf8(value, dst, out);
                    pos = next;
                }
                Err(code) => return TranscodeResult::error(code, pos),
            }
        }
    }
    utf_scalar::convert_utf16_to_utf8_from(src, pos, dst, out, endian)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn convert_utf16_to_utf32_avx2(
    src: &[u16],
    dst: &mut [u32],
    endian: Endianness,
) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 16 <= src.len() {
        let chunk = unsafe { load_utf16_chunk(src, pos, endian) };
        let surr_mask = unsafe {
            let blocked = _mm256_and_si256(chunk, _mm256_set1_epi16(0xF800u16 as i16));
            let surr = _mm256_cmpeq_epi16(blocked, _mm256_set1_epi16(0xD800u16 as i16));
            _mm256_movemask_epi8(surr) as u32
        };
        if surr_mask == 0 {
            // No pairs in this chunk: plain widening of 16 BMP units.
            unsafe {
                let lo = _mm256_castsi256_si128(chunk);
                let hi = _mm256_extracti128_si256::<1>(chunk);
                let w0 = _mm256_cvtepu16_epi32(lo);
                let w1 = _mm256_cvtepu16_epi32(hi);
                _mm256_storeu_si256(dst.as_mut_ptr().add(out) as *mut __m256i, w0);
                _mm256_storeu_si256(dst.as_mut_ptr().add(out + 8) as *mut __m256i, w1);
            }
            pos += 16;
            out += 16;
            continue;
        }
        let window_end = pos + 16;
        while pos < window_end && pos < src.len() {
            match utf_scalar::decode_utf16(src, pos, endian) {
                Ok((value, next)) => {
                    dst[out] = value;
                    out += 1;
                    pos = next;
                }
                Err(code) => return TranscodeResult::error(code, pos),
            }
        }
    }
    utf_scalar::convert_utf16_to_utf32_from(src, pos, dst, out, endian)
}

// ============================================================================
// UTF-32
// ============================================================================

/// Branch-free range validation: accumulate the lane-wise maximum of the
/// values and of the values shifted so the surrogate range lands at the top
/// of the unsigned space, then compare both maxima against fixed thresholds
/// once after the loop. The error path re-scans scalar for the exact lane.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn validate_utf32_avx2(src: &[u32]) -> TranscodeResult {
    let mut pos = 0;
    unsafe {
        let standard_max = _mm256_set1_epi32(0x10FFFF);
        let offset = _mm256_set1_epi32(0xFFFF_2000u32 as i32);
        let standard_offset_max = _mm256_set1_epi32(0xFFFF_F7FFu32 as i32);
        let mut current_max = _mm256_setzero_si256();
        let mut current_offset_max = _mm256_setzero_si256();

        while pos + 8 <= src.len() {
            let chunk = _mm256_loadu_si256(src.as_ptr().add(pos) as *const __m256i);
            current_max = _mm256_max_epu32(current_max, chunk);
            current_offset_max =
                _mm256_max_epu32(current_offset_max, _mm256_add_epi32(chunk, offset));
            pos += 8;
        }

        let range_diff = _mm256_xor_si256(
            _mm256_max_epu32(current_max, standard_max),
            standard_max,
        );
        let surr_diff = _mm256_xor_si256(
            _mm256_max_epu32(current_offset_max, standard_offset_max),
            standard_offset_max,
        );
        if _mm256_testz_si256(range_diff, range_diff) == 0
            || _mm256_testz_si256(surr_diff, surr_diff) == 0
        {
            return utf_scalar::validate_utf32_from(src, 0);
        }
    }
    utf_scalar::validate_utf32_from(src, pos)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn convert_utf32_to_utf8_avx2(src: &[u32], dst: &mut [u8]) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 8 <= src.len() {
        let ascii = unsafe {
            let chunk = _mm256_loadu_si256(src.as_ptr().add(pos) as *const __m256i);
            let high_bits = _mm256_and_si256(chunk, _mm256_set1_epi32(0xFFFF_FF80u32 as i32));
            let is_ascii = _mm256_cmpeq_epi32(high_bits, _mm256_setzero_si256());
            _mm256_movemask_epi8(is_ascii) as u32
        };
        if ascii == u32::MAX {
            // Narrow 8 ASCII lanes to 8 bytes.
            unsafe {
                let chunk = _mm256_loadu_si256(src.as_ptr().add(pos) as *const __m256i);
                let lo = _mm256_castsi256_si128(chunk);
                let hi = _mm256_extracti128_si256::<1>(chunk);
                let words = _mm_packus_epi32(lo, hi);
                let bytes = _mm_packus_epi16(words, words);
                _mm_storel_epi64(dst.as_mut_ptr().add(out) as *mut __m128i, bytes);
            }
            pos += 8;
            out += 8;
            continue;
        }
        let window_end = pos + 8;
        let partial = utf_scalar::convert_utf32_to_utf8_from(
            &src[..window_end.min(src.len())],
            pos,
            dst,
            out,
        );
        if partial.is_err() {
            return partial;
        }
        out = partial.count;
        pos = window_end;
    }
    utf_scalar::convert_utf32_to_utf8_from(src, pos, dst, out)
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn convert_utf32_to_utf16_avx2(
    src: &[u32],
    dst: &mut [u16],
    endian: Endianness,
) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 8 <= src.len() {
        let (bmp, surr) = unsafe {
            let chunk = _mm256_loadu_si256(src.as_ptr().add(pos) as *const __m256i);
            let high_bits = _mm256_and_si256(chunk, _mm256_set1_epi32(0xFFFF_0000u32 as i32));
            let is_bmp = _mm256_cmpeq_epi32(high_bits, _mm256_setzero_si256());
            let blocked = _mm256_and_si256(chunk, _mm256_set1_epi32(0xFFFF_F800u32 as i32));
            let is_surr = _mm256_cmpeq_epi32(blocked, _mm256_set1_epi32(0xD800));
            (
                _mm256_movemask_epi8(is_bmp) as u32,
                _mm256_movemask_epi8(is_surr) as u32,
            )
        };
        if bmp == u32::MAX && surr == 0 {
            // All lanes fit a single unit: narrow 8 lanes to 8 units.
            unsafe {
                let chunk = _mm256_loadu_si256(src.as_ptr().add(pos) as *const __m256i);
                let lo = _mm256_castsi256_si128(chunk);
                let hi = _mm256_extracti128_si256::<1>(chunk);
                let mut units = _mm_packus_epi32(lo, hi);
                if endian == Endianness::Big {
                    let swap = _mm_loadu_si128(SWAP16.as_ptr() as *const __m128i);
                    units = _mm_shuffle_epi8(units, swap);
                }
                _mm_storeu_si128(dst.as_mut_ptr().add(out) as *mut __m128i, units);
            }
            pos += 8;
            out += 8;
            continue;
        }
        let window_end = pos + 8;
        let partial = utf_scalar::convert_utf32_to_utf16_from(
            &src[..window_end.min(src.len())],
            pos,
            dst,
            out,
            endian,
        );
        if partial.is_err() {
            return partial;
        }
        out = partial.count;
        pos = window_end;
    }
    utf_scalar::convert_utf32_to_utf16_from(src, pos, dst, out, endian)
}
