//! Portable scalar transcoding kernels.
//!
//! Reference implementation for every validation, conversion, and counting
//! routine. Always compiled, always correct; the SIMD modules must produce
//! bit-identical results and hand chunk tails back to these loops.

use crate::{Endianness, ErrorCode, TranscodeResult};

pub(crate) const CODE_POINT_MAX: u32 = 0x10FFFF;
const HIGH_BIT_MASK_64: u64 = 0x8080_8080_8080_8080;

#[inline]
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    unit & 0xFC00 == 0xD800
}

#[inline]
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    unit & 0xFC00 == 0xDC00
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Read an 8-byte block as a little-endian word for the ASCII fast path.
///
/// Returns None when fewer than 8 bytes remain.
#[inline]
fn ascii_block(src: &[u8], pos: usize) -> Option<u64> {
    let block = src.get(pos..pos + 8)?;
    let word = u64::from_le_bytes(block.try_into().ok()?);
    (word & HIGH_BIT_MASK_64 == 0).then_some(word)
}

// ============================================================================
// Code point steppers
// ============================================================================

/// Decode one UTF-8 sequence starting at `pos`.
///
/// Returns the code point and the index just past the sequence. On malformed
/// input the caller reports the error at `pos` (the leading byte).
#[inline]
pub(crate) fn decode_utf8(src: &[u8], pos: usize) -> Result<(u32, usize), ErrorCode> {
    let lead = src[pos];

    if lead < 0x80 {
        return Ok((lead as u32, pos + 1));
    }
    if is_continuation(lead) {
        // A continuation byte where a leading byte belongs: the previous
        // sequence claimed fewer bytes than are present.
        return Err(ErrorCode::TooLong);
    }

    let (len, min, lead_bits) = match lead {
        0xC0..=0xDF => (2, 0x80u32, (lead & 0x1F) as u32),
        0xE0..=0xEF => (3, 0x800, (lead & 0x0F) as u32),
        0xF0..=0xF7 => (4, 0x10000, (lead & 0x07) as u32),
        _ => return Err(ErrorCode::HeaderBits),
    };

    if pos + len > src.len() {
        return Err(ErrorCode::TooShort);
    }

    let mut value = lead_bits;
    for i in 1..len {
        let byte = src[pos + i];
        if !is_continuation(byte) {
            return Err(ErrorCode::TooShort);
        }
        value = (value << 6) | (byte & 0x3F) as u32;
    }

    if value < min {
        return Err(ErrorCode::Overlong);
    }
    if value > CODE_POINT_MAX {
        return Err(ErrorCode::TooLarge);
    }
    if (0xD800..=0xDFFF).contains(&value) {
        return Err(ErrorCode::Surrogate);
    }

    Ok((value, pos + len))
}

/// Decode one UTF-16 code unit or surrogate pair starting at `pos`.
#[inline]
pub(crate) fn decode_utf16(
    src: &[u16],
    pos: usize,
    endian: Endianness,
) -> Result<(u32, usize), ErrorCode> {
    let unit = endian.read16(src[pos]);

    if is_high_surrogate(unit) {
        if pos + 1 >= src.len() {
            return Err(ErrorCode::Surrogate);
        }
        let low = endian.read16(src[pos + 1]);
        if !is_low_surrogate(low) {
            return Err(ErrorCode::Surrogate);
        }
        let value = 0x10000 + (((unit - 0xD800) as u32) << 10) + (low - 0xDC00) as u32;
        return Ok((value, pos + 2));
    }
    if is_low_surrogate(unit) {
        return Err(ErrorCode::Surrogate);
    }

    Ok((unit as u32, pos + 1))
}

/// Classify one UTF-32 code unit.
#[inline]
fn check_utf32(value: u32) -> Result<u32, ErrorCode> {
    if value > CODE_POINT_MAX {
        return Err(ErrorCode::TooLarge);
    }
    if (0xD800..=0xDFFF).contains(&value) {
        return Err(ErrorCode::Surrogate);
    }
    Ok(value)
}

// ============================================================================
// Code point writers
// ============================================================================

/// Write one code point as UTF-8 at `dst[out..]`, returning bytes written.
///
/// The destination must have been sized with the length utilities; a short
/// destination is a caller bug and panics via slice indexing.
#[inline]
pub(crate) fn encode_utf8(value: u32, dst: &mut [u8], out: usize) -> usize {
    if value < 0x80 {
        dst[out] = value as u8;
        1
    } else if value < 0x800 {
        dst[out] = 0xC0 | (value >> 6) as u8;
        dst[out + 1] = 0x80 | (value & 0x3F) as u8;
        2
    } else if value < 0x10000 {
        dst[out] = 0xE0 | (value >> 12) as u8;
        dst[out + 1] = 0x80 | ((value >> 6) & 0x3F) as u8;
        dst[out + 2] = 0x80 | (value & 0x3F) as u8;
        3
    } else {
        dst[out] = 0xF0 | (value >> 18) as u8;
        dst[out + 1] = 0x80 | ((value >> 12) & 0x3F) as u8;
        dst[out + 2] = 0x80 | ((value >> 6) & 0x3F) as u8;
        dst[out + 3] = 0x80 | (value & 0x3F) as u8;
        4
    }
}

/// Write one code point as UTF-16 at `dst[out..]`, returning units written.
#[inline]
pub(crate) fn encode_utf16(value: u32, dst: &mut [u16], out: usize, endian: Endianness) -> usize {
    if value < 0x10000 {
        dst[out] = endian.write16(value as u16);
        1
    } else {
        let v = value - 0x10000;
        dst[out] = endian.write16(0xD800 | (v >> 10) as u16);
        dst[out + 1] = endian.write16(0xDC00 | (v & 0x3FF) as u16);
        2
    }
}

// ============================================================================
// ASCII
// ============================================================================

pub(crate) fn validate_ascii_with_errors(src: &[u8]) -> TranscodeResult {
    let mut pos = 0;
    while ascii_block(src, pos).is_some() {
        pos += 8;
    }
    while pos < src.len() {
        if src[pos] >= 0x80 {
            return TranscodeResult::error(ErrorCode::TooLarge, pos);
        }
        pos += 1;
    }
    TranscodeResult::success(src.len())
}

// ============================================================================
// UTF-8 validation
// ============================================================================

pub(crate) fn validate_utf8_with_errors(src: &[u8]) -> TranscodeResult {
    validate_utf8_from(src, 0)
}

pub(crate) fn validate_utf8_from(src: &[u8], mut pos: usize) -> TranscodeResult {
    while pos < src.len() {
        if ascii_block(src, pos).is_some() {
            pos += 8;
            continue;
        }
        match decode_utf8(src, pos) {
            Ok((_, next)) => pos = next,
            Err(code) => return TranscodeResult::error(code, pos),
        }
    }
    TranscodeResult::success(src.len())
}

// ============================================================================
// UTF-16 validation
// ============================================================================

pub(crate) fn validate_utf16_with_errors(src: &[u16], endian: Endianness) -> TranscodeResult {
    validate_utf16_from(src, 0, endian)
}

pub(crate) fn validate_utf16_from(src: &[u16], mut pos: usize, endian: Endianness) -> TranscodeResult {
    while pos < src.len() {
        match decode_utf16(src, pos, endian) {
            Ok((_, next)) => pos = next,
            Err(code) => return TranscodeResult::error(code, pos),
        }
    }
    TranscodeResult::success(src.len())
}

// ============================================================================
// UTF-32 validation
// ============================================================================

pub(crate) fn validate_utf32_with_errors(src: &[u32]) -> TranscodeResult {
    validate_utf32_from(src, 0)
}

pub(crate) fn validate_utf32_from(src: &[u32], mut pos: usize) -> TranscodeResult {
    while pos < src.len() {
        if let Err(code) = check_utf32(src[pos]) {
            return TranscodeResult::error(code, pos);
        }
        pos += 1;
    }
    TranscodeResult::success(src.len())
}

// ============================================================================
// UTF-8 -> UTF-16 / UTF-32
// ============================================================================

pub(crate) fn convert_utf8_to_utf16_with_errors(
    src: &[u8],
    dst: &mut [u16],
    endian: Endianness,
) -> TranscodeResult {
    convert_utf8_to_utf16_from(src, 0, dst, 0, endian)
}

/// Resumable form used by the SIMD kernels: starts at input `pos` with `out`
/// units already written. Success count is the total output length.
pub(crate) fn convert_utf8_to_utf16_from(
    src: &[u8],
    mut pos: usize,
    dst: &mut [u16],
    mut out: usize,
    endian: Endianness,
) -> TranscodeResult {
    while pos < src.len() {
        if let Some(word) = ascii_block(src, pos) {
            // Widen 8 ASCII bytes without per-byte branching.
            for shift in 0..8 {
                dst[out + shift] = endian.write16(((word >> (shift * 8)) & 0x7F) as u16);
            }
            pos += 8;
            out += 8;
            continue;
        }
        match decode_utf8(src, pos) {
            Ok((value, next)) => {
                out += encode_utf16(value, dst, out, endian);
                pos = next;
            }
            Err(code) => return TranscodeResult::error(code, pos),
        }
    }
    TranscodeResult::success(out)
}

pub(crate) fn convert_valid_utf8_to_utf16(src: &[u8], dst: &mut [u16], endian: Endianness) -> usize {
    let mut pos = 0;
    let mut out = 0;
    while pos < src.len() {
        let lead = src[pos];
        if lead < 0x80 {
            dst[out] = endian.write16(lead as u16);
            pos += 1;
        } else if lead < 0xE0 {
            dst[out] =
                endian.write16((((lead & 0x1F) as u16) << 6) | (src[pos + 1] & 0x3F) as u16);
            pos += 2;
        } else if lead < 0xF0 {
            dst[out] = endian.write16(
                (((lead & 0x0F) as u16) << 12)
                    | (((src[pos + 1] & 0x3F) as u16) << 6)
                    | (src[pos + 2] & 0x3F) as u16,
            );
            pos += 3;
        } else {
            let value = (((lead & 0x07) as u32) << 18)
                | (((src[pos + 1] & 0x3F) as u32) << 12)
                | (((src[pos + 2] & 0x3F) as u32) << 6)
                | (src[pos + 3] & 0x3F) as u32;
            out += encode_utf16(value, dst, out, endian) - 1;
            pos += 4;
        }
        out += 1;
    }
    out
}

pub(crate) fn convert_utf8_to_utf32_with_errors(src: &[u8], dst: &mut [u32]) -> TranscodeResult {
    convert_utf8_to_utf32_from(src, 0, dst, 0)
}

pub(crate) fn convert_utf8_to_utf32_from(
    src: &[u8],
    mut pos: usize,
    dst: &mut [u32],
    mut out: usize,
) -> TranscodeResult {
    while pos < src.len() {
        if let Some(word) = ascii_block(src, pos) {
            for shift in 0..8 {
                dst[out + shift] = ((word >> (shift * 8)) & 0x7F) as u32;
            }
            pos += 8;
            out += 8;
            continue;
        }
        match decode_utf8(src, pos) {
            Ok((value, next)) => {
                dst[out] = value;
                out += 1;
                pos = next;
            }
            Err(code) => return TranscodeResult::error(code, pos),
        }
    }
    TranscodeResult::success(out)
}

pub(crate) fn convert_valid_utf8_to_utf32(src: &[u8], dst: &mut [u32]) -> usize {
    let mut pos = 0;
    let mut out = 0;
    while pos < src.len() {
        let lead = src[pos];
        let (value, len) = if lead < 0x80 {
            (lead as u32, 1)
        } else if lead < 0xE0 {
            ((((lead & 0x1F) as u32) << 6) | (src[pos + 1] & 0x3F) as u32, 2)
        } else if lead < 0xF0 {
            (
                (((lead & 0x0F) as u32) << 12)
                    | (((src[pos + 1] & 0x3F) as u32) << 6)
                    | (src[pos + 2] & 0x3F) as u32,
                3,
            )
        } else {
            (
                (((lead & 0x07) as u32) << 18)
                    | (((src[pos + 1] & 0x3F) as u32) << 12)
                    | (((src[pos + 2] & 0x3F) as u32) << 6)
                    | (src[pos + 3] & 0x3F) as u32,
                4,
            )
        };
        dst[out] = value;
        out += 1;
        pos += len;
    }
    out
}

// ============================================================================
// Rewind recovery
// ============================================================================

/// Walk backward from `pos` (at most 3 bytes) to the start of the UTF-8
/// sequence containing it. `pos` may sit on a continuation byte when a SIMD
/// kernel bails out mid-sequence.
#[inline]
pub(crate) fn rewind_to_leading_byte(src: &[u8], mut pos: usize) -> usize {
    let mut steps = 0;
    while steps < 3 && pos > 0 && pos < src.len() && is_continuation(src[pos]) {
        pos -= 1;
        steps += 1;
    }
    pos
}

/// Resume UTF-8 -> UTF-32 conversion at a possibly mid-sequence `pos`.
///
/// Error offsets stay absolute: the rewind distance is folded into the
/// reported position because conversion restarts from the corrected start.
pub(crate) fn rewind_and_convert_utf8_to_utf32_with_errors(
    src: &[u8],
    pos: usize,
    dst: &mut [u32],
    out: usize,
) -> TranscodeResult {
    convert_utf8_to_utf32_from(src, rewind_to_leading_byte(src, pos), dst, out)
}

/// Resume UTF-8 -> UTF-16 conversion at a possibly mid-sequence `pos`.
pub(crate) fn rewind_and_convert_utf8_to_utf16_with_errors(
    src: &[u8],
    pos: usize,
    dst: &mut [u16],
    out: usize,
    endian: Endianness,
) -> TranscodeResult {
    convert_utf8_to_utf16_from(src, rewind_to_leading_byte(src, pos), dst, out, endian)
}

// ============================================================================
// UTF-16 -> UTF-8 / UTF-32
// ============================================================================

pub(crate) fn convert_utf16_to_utf8_with_errors(
    src: &[u16],
    dst: &mut [u8],
    endian: Endianness,
) -> TranscodeResult {
    convert_utf16_to_utf8_from(src, 0, dst, 0, endian)
}

pub(crate) fn convert_utf16_to_utf8_from(
    src: &[u16],
    mut pos: usize,
    dst: &mut [u8],
    mut out: usize,
    endian: Endianness,
) -> TranscodeResult {
    while pos < src.len() {
        // ASCII fast path: four units at a time.
        if pos + 4 <= src.len() {
            let merged = endian.read16(src[pos])
                | endian.read16(src[pos + 1])
                | endian.read16(src[pos + 2])
                | endian.read16(src[pos + 3]);
            if merged < 0x80 {
                for i in 0..4 {
                    dst[out + i] = endian.read16(src[pos + i]) as u8;
                }
                pos += 4;
                out += 4;
                continue;
            }
        }
        match decode_utf16(src, pos, endian) {
            Ok((value, next)) => {
                out += encode_utf8(value, dst, out);
                pos = next;
            }
            Err(code) => return TranscodeResult::error(code, pos),
        }
    }
    TranscodeResult::success(out)
}

pub(crate) fn convert_valid_utf16_to_utf8(src: &[u16], dst: &mut [u8], endian: Endianness) -> usize {
    let mut pos = 0;
    let mut out = 0;
    while pos < src.len() {
        let unit = endian.read16(src[pos]);
        if is_high_surrogate(unit) {
            let low = endian.read16(src[pos + 1]);
            let value = 0x10000 + (((unit - 0xD800) as u32) << 10) + (low - 0xDC00) as u32;
            out += encode_utf8(value, dst, out);
            pos += 2;
        } else {
            out += encode_utf8(unit as u32, dst, out);
            pos += 1;
        }
    }
    out
}

pub(crate) fn convert_utf16_to_utf32_with_errors(
    src: &[u16],
    dst: &mut [u32],
    endian: Endianness,
) -> TranscodeResult {
    convert_utf16_to_utf32_from(src, 0, dst, 0, endian)
}

pub(crate) fn convert_utf16_to_utf32_from(
    src: &[u16],
    mut pos: usize,
    dst: &mut [u32],
    mut out: usize,
    endian: Endianness,
) -> TranscodeResult {
    while pos < src.len() {
        match decode_utf16(src, pos, endian) {
            Ok((value, next)) => {
                dst[out] = value;
                out += 1;
                pos = next;
            }
            Err(code) => return TranscodeResult::error(code, pos),
        }
    }
    TranscodeResult::success(out)
}

pub(crate) fn convert_valid_utf16_to_utf32(src: &[u16], dst: &mut [u32], endian: Endianness) -> usize {
    let mut pos = 0;
    let mut out = 0;
    while pos < src.len() {
        let unit = endian.read16(src[pos]);
        if is_high_surrogate(unit) {
            let low = endian.read16(src[pos + 1]);
            dst[out] = 0x10000 + (((unit - 0xD800) as u32) << 10) + (low - 0xDC00) as u32;
            pos += 2;
        } else {
            dst[out] = unit as u32;
            pos += 1;
        }
        out += 1;
    }
    out
}

// ============================================================================
// UTF-32 -> UTF-8 / UTF-16
// ============================================================================

pub(crate) fn convert_utf32_to_utf8_with_errors(src: &[u32], dst: &mut [u8]) -> TranscodeResult {
    convert_utf32_to_utf8_from(src, 0, dst, 0)
}

pub(crate) fn convert_utf32_to_utf8_from(
    src: &[u32],
    mut pos: usize,
    dst: &mut [u8],
    mut out: usize,
) -> TranscodeResult {
    while pos < src.len() {
        match check_utf32(src[pos]) {
            Ok(value) => {
                out += encode_utf8(value, dst, out);
                pos += 1;
            }
            Err(code) => return TranscodeResult::error(code, pos),
        }
    }
    TranscodeResult::success(out)
}

pub(crate) fn convert_valid_utf32_to_utf8(src: &[u32], dst: &mut [u8]) -> usize {
    let mut out = 0;
    for &value in src {
        out += encode_utf8(value, dst, out);
    }
    out
}

pub(crate) fn convert_utf32_to_utf16_with_errors(
    src: &[u32],
    dst: &mut [u16],
    endian: Endianness,
) -> TranscodeResult {
    convert_utf32_to_utf16_from(src, 0, dst, 0, endian)
}

pub(crate) fn convert_utf32_to_utf16_from(
    src: &[u32],
    mut pos: usize,
    dst: &mut [u16],
    mut out: usize,
    endian: Endianness,
) -> TranscodeResult {
    while pos < src.len() {
        match check_utf32(src[pos]) {
            Ok(value) => {
                out += encode_utf16(value, dst, out, endian);
                pos += 1;
            }
            Err(code) => return TranscodeResult::error(code, pos),
        }
    }
    TranscodeResult::success(out)
}

pub(crate) fn convert_valid_utf32_to_utf16(src: &[u32], dst: &mut [u16], endian: Endianness) -> usize {
    let mut out = 0;
    for &value in src {
        out += encode_utf16(value, dst, out, endian);
    }
    out
}

/// UTF-16LE <-> UTF-16BE: byte-swap every unit.
pub(crate) fn change_endianness_utf16(src: &[u16], dst: &mut [u16]) -> usize {
    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d = s.swap_bytes();
    }
    src.len()
}

// ============================================================================
// Counting and length prediction
// ============================================================================

/// Number of code points in valid UTF-8: bytes that are not continuations.
pub(crate) fn count_utf8(src: &[u8]) -> usize {
    src.iter().filter(|&&b| !is_continuation(b)).count()
}

/// Number of code points in valid UTF-16: units that are not low surrogates.
pub(crate) fn count_utf16(src: &[u16], endian: Endianness) -> usize {
    src.iter()
        .filter(|&&u| !is_low_surrogate(endian.read16(u)))
        .count()
}

pub(crate) fn utf16_length_from_utf8(src: &[u8]) -> usize {
    // One unit per code point, one extra for each 4-byte sequence.
    src.iter()
        .map(|&b| match b {
            b if is_continuation(b) => 0,
            0xF0.. => 2,
            _ => 1,
        })
        .sum()
}

pub(crate) fn utf32_length_from_utf8(src: &[u8]) -> usize {
    count_utf8(src)
}

pub(crate) fn utf8_length_from_utf16(src: &[u16], endian: Endianness) -> usize {
    src.iter()
        .map(|&u| {
            let unit = endian.read16(u);
            if unit < 0x80 {
                1
            } else if unit < 0x800 {
                2
            } else if is_high_surrogate(unit) || is_low_surrogate(unit) {
                // Each half of a pair accounts for 2 of the 4 bytes.
                2
            } else {
                3
            }
        })
        .sum()
}

pub(crate) fn utf32_length_from_utf16(src: &[u16], endian: Endianness) -> usize {
    count_utf16(src, endian)
}

pub(crate) fn utf8_length_from_utf32(src: &[u32]) -> usize {
    src.iter()
        .map(|&v| {
            if v < 0x80 {
                1
            } else if v < 0x800 {
                2
            } else if v < 0x10000 {
                3
            } else {
                4
            }
        })
        .sum()
}

pub(crate) fn utf16_length_from_utf32(src: &[u32]) -> usize {
    src.iter().map(|&v| if v < 0x10000 { 1 } else { 2 }).sum()
}

// ============================================================================
// Byte-oriented validators for encoding detection
// ============================================================================

/// Validate a byte buffer as UTF-16 in the given byte order.
///
/// Used by encoding detection, where the input has no alignment guarantee.
pub(crate) fn validate_utf16_bytes(buf: &[u8], endian: Endianness) -> bool {
    debug_assert!(buf.len() % 2 == 0);
    let mut pending_high: Option<u16> = None;
    for pair in buf.chunks_exact(2) {
        let unit = match endian {
            Endianness::Little => u16::from_le_bytes([pair[0], pair[1]]),
            Endianness::Big => u16::from_be_bytes([pair[0], pair[1]]),
        };
        match pending_high {
            Some(_) => {
                if !is_low_surrogate(unit) {
                    return false;
                }
                pending_high = None;
            }
            None => {
                if is_high_surrogate(unit) {
                    pending_high = Some(unit);
                } else if is_low_surrogate(unit) {
                    return false;
                }
            }
        }
    }
    pending_high.is_none()
}

/// Validate a byte buffer as UTF-32LE.
pub(crate) fn validate_utf32le_bytes(buf: &[u8]) -> bool {
    debug_assert!(buf.len() % 4 == 0);
    buf.chunks_exact(4)
        .map(|q| u32::from_le_bytes([q[0], q[1], q[2], q[3]]))
        .all(|v| check_utf32(v).is_ok())
}
