//! ARM64 NEON SIMD kernels for Unicode validation and transcoding.
//!
//! This module contains platform-specific optimizations using:
//! - NEON: 16 bytes/instruction (all ARM64 CPUs including Apple Silicon, AWS Graviton)
//!
//! Operations without a NEON kernel dispatch straight to the scalar module.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::utf_scalar;
use crate::{Endianness, TranscodeResult};

/// NEON movemask for an 8-lane vector of 0xFF/0x00 lanes.
///
/// NEON has no direct movemask instruction like x86's `_mm_movemask_epi8`,
/// so the high bits are positioned with a multiply and folded together with
/// pairwise adds.
#[target_feature(enable = "neon")]
#[inline]
unsafe fn neon_movemask_u8x8(vec: uint8x8_t) -> u8 {
    unsafe {
        let shifted = vshr_n_u8::<7>(vec);
        let bit_positions = vreinterpret_u8_u64(vdup_n_u64(0x8040201008040201u64));
        let positioned = vmul_u8(shifted, bit_positions);
        let sum1 = vpaddl_u8(positioned);
        let sum2 = vpaddl_u16(sum1);
        let sum3 = vpaddl_u32(sum2);
        vget_lane_u64::<0>(sum3) as u8
    }
}

/// Check if chunk contains non-ASCII bytes (>= 0x80)
#[target_feature(enable = "neon")]
#[inline]
unsafe fn neon_has_non_ascii(chunk: uint8x16_t) -> bool {
    unsafe { vmaxvq_u8(chunk) >= 0x80 }
}

#[target_feature(enable = "neon")]
#[inline]
unsafe fn load_utf16_chunk(src: &[u16], pos: usize, endian: Endianness) -> uint16x8_t {
    unsafe {
        let chunk = vld1q_u16(src.as_ptr().add(pos));
        if endian == Endianness::Big {
            vreinterpretq_u16_u8(vrev16q_u8(vreinterpretq_u8_u16(chunk)))
        } else {
            chunk
        }
    }
}

/// One bit per 16-bit lane of a 0xFFFF/0x0000 comparison result.
#[target_feature(enable = "neon")]
#[inline]
unsafe fn neon_movemask_u16x8(cmp: uint16x8_t) -> u8 {
    unsafe { neon_movemask_u8x8(vmovn_u16(cmp)) }
}

// ============================================================================
// ASCII
// ============================================================================

#[target_feature(enable = "neon")]
pub(crate) unsafe fn validate_ascii_neon(src: &[u8]) -> TranscodeResult {
    let mut pos = 0;
    while pos + 16 <= src.len() {
        let chunk = unsafe { vld1q_u8(src.as_ptr().add(pos)) };
        if unsafe { neon_has_non_ascii(chunk) } {
            break;
        }
        pos += 16;
    }
    match utf_scalar::validate_ascii_with_errors(&src[pos..]) {
        r if r.is_ok() => TranscodeResult::success(src.len()),
        r => TranscodeResult::error(r.error, pos + r.count),
    }
}

// ============================================================================
// UTF-8
// ============================================================================

#[target_feature(enable = "neon")]
pub(crate) unsafe fn validate_utf8_neon(src: &[u8]) -> TranscodeResult {
    let mut pos = 0;
    while pos + 16 <= src.len() {
        let chunk = unsafe { vld1q_u8(src.as_ptr().add(pos)) };
        if !unsafe { neon_has_non_ascii(chunk) } {
            pos += 16;
            continue;
        }
        let window_end = pos + 16;
        while pos < window_end && pos < src.len() {
            match utf_scalar::decode_utf8(src, pos) {
                Ok((_, next)) => pos = next,
                Err(code) => return TranscodeResult::error(code, pos),
            }
        }
    }
    utf_scalar::validate_utf8_from(src, pos)
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn convert_utf8_to_utf16_neon(
    src: &[u8],
    dst: &mut [u16],
    endian: Endianness,
) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 16 <= src.len() {
        let chunk = unsafe { vld1q_u8(src.as_ptr().add(pos)) };
        if !unsafe { neon_has_non_ascii(chunk) } {
            unsafe {
                let mut w0 = vmovl_u8(vget_low_u8(chunk));
                let mut w1 = vmovl_u8(vget_high_u8(chunk));
                if endian == Endianness::Big {
                    w0 = vreinterpretq_u16_u8(vrev16q_u8(vreinterpretq_u8_u16(w0)));
                    w1 = vreinterpretq_u16_u8(vrev16q_u8(vreinterpretq_u8_u16(w1)));
                }
                vst1q_u16(dst.as_mut_ptr().add(out), w0);
                vst1q_u16(dst.as_mut_ptr().add(out + 8), w1);
            }
            pos += 16;
            out += 16;
            continue;
        }
        let window_end = pos + 16;
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

#[target_feature(enable = "neon")]
pub(crate) unsafe fn convert_utf8_to_utf32_neon(src: &[u8], dst: &mut [u32]) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 16 <= src.len() {
        let chunk = unsafe { vld1q_u8(src.as_ptr().add(pos)) };
        if !unsafe { neon_has_non_ascii(chunk) } {
            unsafe {
                let lo = vmovl_u8(vget_low_u8(chunk));
                let hi = vmovl_u8(vget_high_u8(chunk));
                vst1q_u32(dst.as_mut_ptr().add(out), vmovl_u16(vget_low_u16(lo)));
                vst1q_u32(dst.as_mut_ptr().add(out + 4), vmovl_u16(vget_high_u16(lo)));
                vst1q_u32(dst.as_mut_ptr().add(out + 8), vmovl_u16(vget_low_u16(hi)));
                vst1q_u32(dst.as_mut_ptr().add(out + 12), vmovl_u16(vget_high_u16(hi)));
            }
            pos += 16;
            out += 16;
            continue;
        }
        let window_end = pos + 16;
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

/// Count UTF-8 code points (non-continuation bytes).
#[target_feature(enable = "neon")]
pub(crate) unsafe fn count_utf8_neon(src: &[u8]) -> usize {
    let mut count = 0;
    let mut pos = 0;
    while pos + 16 <= src.len() {
        unsafe {
            let chunk = vld1q_u8(src.as_ptr().add(pos));
            let masked = vandq_u8(chunk, vdupq_n_u8(0b1100_0000));
            let is_cont = vceqq_u8(masked, vdupq_n_u8(0b1000_0000));
            let ones = vandq_u8(is_cont, vdupq_n_u8(1));
            count += 16 - vaddvq_u8(ones) as usize;
        }
        pos += 16;
    }
    count + utf_scalar::count_utf8(&src[pos..])
}

// ============================================================================
// UTF-16
// ============================================================================

/// Surrogate-pair validation over 8 units per iteration, same mask algebra as
/// the AVX2 kernel with single-bit lanes: `a = H & (L >> 1)`, `b = a << 1`,
/// valid iff `V | a | b` is all ones.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn validate_utf16_neon(src: &[u16], endian: Endianness) -> TranscodeResult {
    let mut pos = 0;
    while pos + 8 <= src.len() {
        let chunk = unsafe { load_utf16_chunk(src, pos, endian) };
        let (surr_mask, hi_mask, lo_mask) = unsafe {
            let blocked = vandq_u16(chunk, vdupq_n_u16(0xF800));
            let surr = vceqq_u16(blocked, vdupq_n_u16(0xD800));
            let paired = vandq_u16(chunk, vdupq_n_u16(0xFC00));
            let hi = vceqq_u16(paired, vdupq_n_u16(0xD800));
            let lo = vceqq_u16(paired, vdupq_n_u16(0xDC00));
            (
                neon_movemask_u16x8(surr),
                neon_movemask_u16x8(hi),
                neon_movemask_u16x8(lo),
            )
        };

        if surr_mask == 0 {
            pos += 8;
            continue;
        }

        let v = !surr_mask;
        let a = hi_mask & (lo_mask >> 1);
        let b = a << 1;
        let c = v | a | b;

        if c == u8::MAX {
            pos += 8;
        } else if c == 0x7F && hi_mask >> 7 == 1 {
            // Trailing high surrogate: re-examine together with the next chunk.
            pos += 7;
        } else {
            return utf_scalar::validate_utf16_from(src, pos, endian);
        }
    }
    utf_scalar::validate_utf16_from(src, pos, endian)
}

#[target_feature(enable = "neon")]
pub(crate) unsafe fn convert_utf16_to_utf8_neon(
    src: &[u16],
    dst: &mut [u8],
    endian: Endianness,
) -> TranscodeResult {
    let mut pos = 0;
    let mut out = 0;
    while pos + 8 <= src.len() {
        let chunk = unsafe { load_utf16_chunk(src, pos, endian) };
        if unsafe { vmaxvq_u16(chunk) } < 0x80 {
            unsafe { vst1_u8(dst.as_mut_ptr().add(out), vmovn_u16(chunk)) };
            pos += 8;
            out += 8;
            continue;
        }
        let window_end = pos + 8;
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

// ============================================================================
// UTF-32
// ============================================================================

/// Branch-free range validation: lane-wise running maxima of the values and
/// of the values offset so the surrogate range lands at the top of the
/// unsigned space, checked once after the loop.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn validate_utf32_neon(src: &[u32]) -> TranscodeResult {
    let mut pos = 0;
    unsafe {
        let offset = vdupq_n_u32(0xFFFF_2000);
        let mut current_max = vdupq_n_u32(0);
        let mut current_offset_max = vdupq_n_u32(0);

        while pos + 4 <= src.len() {
            let chunk = vld1q_u32(src.as_ptr().add(pos));
            current_max = vmaxq_u32(current_max, chunk);
            current_offset_max = vmaxq_u32(current_offset_max, vaddq_u32(chunk, offset));
            pos += 4;
        }

        if vmaxvq_u32(current_max) > 0x10FFFF || vmaxvq_u32(current_offset_max) > 0xFFFF_F7FF {
            return utf_scalar::validate_utf32_from(src, 0);
        }
    }
    utf_scalar::validate_utf32_from(src, pos)
}
