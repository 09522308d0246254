// Library interface for utf-rs
// Exposes Unicode validation, transcoding, and counting entry points routed
// through the best SIMD backend available on the running CPU.

use std::sync::OnceLock;

use thiserror::Error;

#[cfg(target_arch = "aarch64")]
mod utf_arm64;
pub(crate) mod utf_scalar;
#[cfg(test)]
mod utf_scalar_test;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod utf_x86;

/// Classification of the first malformed code unit found in an input buffer.
///
/// Every routine reports errors as data; nothing in this crate panics on
/// malformed input or aborts the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    /// The input was processed completely.
    #[error("success")]
    Success,
    /// A leading code unit's bit pattern matches no valid encoding-form prefix.
    #[error("invalid leading bit pattern")]
    HeaderBits,
    /// A multi-unit sequence is truncated by end of buffer or a broken
    /// continuation unit.
    #[error("truncated or broken multi-unit sequence")]
    TooShort,
    /// A continuation unit appeared where a leading unit belongs.
    #[error("unexpected continuation unit")]
    TooLong,
    /// A code point was encoded in more units than its minimal form requires.
    #[error("overlong encoding")]
    Overlong,
    /// A decoded value exceeds U+10FFFF.
    #[error("code point above U+10FFFF")]
    TooLarge,
    /// A lone or mismatched surrogate, or a surrogate-range scalar value.
    #[error("invalid surrogate")]
    Surrogate,
}

/// Outcome of a validation or conversion call.
///
/// On success `count` is the number of output units written (conversions) or
/// input units consumed (validation). On failure it is the offset, in input
/// units, of the first offending unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeResult {
    pub error: ErrorCode,
    pub count: usize,
}

impl TranscodeResult {
    #[inline]
    pub(crate) fn success(count: usize) -> Self {
        TranscodeResult {
            error: ErrorCode::Success,
            count,
        }
    }

    #[inline]
    pub(crate) fn error(error: ErrorCode, offset: usize) -> Self {
        TranscodeResult {
            error,
            count: offset,
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.error == ErrorCode::Success
    }

    #[inline]
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Collapse to the plain-convert contract: count on success, 0 on error.
    #[inline]
    pub(crate) fn count_or_zero(self) -> usize {
        if self.is_ok() { self.count } else { 0 }
    }
}

/// Byte order of UTF-16 code units within a `&[u16]` buffer.
///
/// The tag states how each unit's bytes are stored; it is trusted, not
/// detected. A mismatched tag is a caller bug the library cannot observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Decode a stored unit to its native-order value.
    #[inline]
    pub(crate) fn read16(self, unit: u16) -> u16 {
        match self {
            Endianness::Little => u16::from_le(unit),
            Endianness::Big => u16::from_be(unit),
        }
    }

    /// Encode a native-order value for storage.
    #[inline]
    pub(crate) fn write16(self, unit: u16) -> u16 {
        match self {
            Endianness::Little => unit.to_le(),
            Endianness::Big => unit.to_be(),
        }
    }
}

/// An encoding form recognizable by [`detect_encodings`] and the BOM check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingKind {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl EncodingKind {
    fn bit(self) -> u8 {
        match self {
            EncodingKind::Utf8 => 1 << 0,
            EncodingKind::Utf16Le => 1 << 1,
            EncodingKind::Utf16Be => 1 << 2,
            EncodingKind::Utf32Le => 1 << 3,
            EncodingKind::Utf32Be => 1 << 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EncodingKind::Utf8 => "UTF-8",
            EncodingKind::Utf16Le => "UTF-16LE",
            EncodingKind::Utf16Be => "UTF-16BE",
            EncodingKind::Utf32Le => "UTF-32LE",
            EncodingKind::Utf32Be => "UTF-32BE",
        }
    }

    const ALL: [EncodingKind; 5] = [
        EncodingKind::Utf8,
        EncodingKind::Utf16Le,
        EncodingKind::Utf16Be,
        EncodingKind::Utf32Le,
        EncodingKind::Utf32Be,
    ];
}

/// Bitmask of encodings a buffer validated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodingSet(u8);

impl EncodingSet {
    pub const fn empty() -> Self {
        EncodingSet(0)
    }

    pub fn contains(&self, kind: EncodingKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: EncodingKind) {
        self.0 |= kind.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = EncodingKind> + '_ {
        EncodingKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl From<EncodingKind> for EncodingSet {
    fn from(kind: EncodingKind) -> Self {
        EncodingSet(kind.bit())
    }
}

impl std::fmt::Display for EncodingSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for kind in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", kind.name())?;
            first = false;
        }
        Ok(())
    }
}

/// Check for a byte-order mark at the start of `buf`.
///
/// Returns the signaled encoding and the BOM's byte length. Longer marks win:
/// `FF FE 00 00` is UTF-32LE, not UTF-16LE followed by a NUL.
pub fn check_bom(buf: &[u8]) -> Option<(EncodingKind, usize)> {
    if buf.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        Some((EncodingKind::Utf32Be, 4))
    } else if buf.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        Some((EncodingKind::Utf32Le, 4))
    } else if buf.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some((EncodingKind::Utf8, 3))
    } else if buf.starts_with(&[0xFF, 0xFE]) {
        Some((EncodingKind::Utf16Le, 2))
    } else if buf.starts_with(&[0xFE, 0xFF]) {
        Some((EncodingKind::Utf16Be, 2))
    } else {
        None
    }
}

/// Report every encoding `buf` could be.
///
/// A BOM is trusted outright. Without one, the buffer is independently
/// validated as UTF-8, UTF-16LE (even length only), and UTF-32LE (length
/// divisible by 4 only).
pub fn detect_encodings(buf: &[u8]) -> EncodingSet {
    if let Some((kind, _)) = check_bom(buf) {
        return EncodingSet::from(kind);
    }

    let mut found = EncodingSet::empty();
    if active_backend().validate_utf8(buf) {
        found.insert(EncodingKind::Utf8);
    }
    if buf.len() % 2 == 0 && utf_scalar::validate_utf16_bytes(buf, Endianness::Little) {
        found.insert(EncodingKind::Utf16Le);
    }
    if buf.len() % 4 == 0 && utf_scalar::validate_utf32le_bytes(buf) {
        found.insert(EncodingKind::Utf32Le);
    }
    found
}

// Private marker to prevent external construction of Backend variants
// NOT pub - this is intentionally private!
#[derive(Debug, Clone, Copy, PartialEq)]
struct Private;

/// SIMD implementation path used for transcoding.
///
/// **IMPORTANT**: Variants cannot be constructed directly from outside this
/// crate due to the private `Private` field. Use `Backend::detect()` to safely
/// obtain a backend supported by the current CPU.
#[allow(private_interfaces)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backend {
    /// AVX2 256-bit vectors (x86/x86_64)
    Avx2(Private),
    /// ARM NEON 128-bit vectors (aarch64)
    Neon(Private),
    /// Scalar fallback implementation
    Scalar(Private),
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

static ACTIVE_BACKEND: OnceLock<Backend> = OnceLock::new();

/// The backend every free function routes through.
///
/// Resolved on first call and immutable for the process lifetime.
pub fn active_backend() -> Backend {
    *ACTIVE_BACKEND.get_or_init(Backend::detect)
}

impl Backend {
    /// Detect which SIMD backend is supported by the current CPU at runtime.
    ///
    /// Runtime detection is authoritative: a kernel compiled in but not
    /// executable on this CPU is never returned. The scalar fallback is
    /// always correct and always available.
    ///
    /// # Example
    /// ```
    /// use utf_rs::Backend;
    ///
    /// let backend = Backend::detect();
    /// assert!(backend.available());
    /// assert!(backend.validate_utf8(b"hello"));
    /// ```
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if is_x86_feature_detected!("avx2") {
                return Backend::Avx2(Private);
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                return Backend::Neon(Private);
            }
        }

        Backend::Scalar(Private)
    }

    /// Construct a specific backend for consistency testing.
    ///
    /// # Safety
    ///
    /// **DANGER**: Caller MUST verify the CPU supports the requested feature
    /// before invoking any operation, or the program will crash with SIGILL
    /// (illegal instruction). Always guard with CPU feature detection.
    ///
    /// # Parameters
    /// - `backend_type`: One of: "scalar", "avx2", "neon"
    ///
    /// # Returns
    /// - `Some(backend)` if the backend name is valid
    /// - `None` if the backend name is invalid
    pub unsafe fn new_unchecked(backend_type: &str) -> Option<Self> {
        match backend_type {
            "scalar" => Some(Backend::Scalar(Private)),
            "avx2" => Some(Backend::Avx2(Private)),
            "neon" => Some(Backend::Neon(Private)),
            _ => None,
        }
    }

    /// Human-readable engine name.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Avx2(_) => "AVX2",
            Backend::Neon(_) => "NEON",
            Backend::Scalar(_) => "Scalar",
        }
    }

    /// Preferred load alignment in bytes. Kernels use unaligned loads, so
    /// this is advisory.
    pub fn alignment(&self) -> usize {
        match self {
            Backend::Avx2(_) => 32,
            Backend::Neon(_) => 16,
            Backend::Scalar(_) => 1,
        }
    }

    /// Whether inputs must honor [`Backend::alignment`]. Always false here;
    /// every kernel tolerates unaligned buffers.
    pub fn requires_alignment(&self) -> bool {
        false
    }

    /// Compile-time support: was this backend's kernel built into the binary?
    pub fn supported(&self) -> bool {
        match self {
            Backend::Avx2(_) => cfg!(any(target_arch = "x86", target_arch = "x86_64")),
            Backend::Neon(_) => cfg!(target_arch = "aarch64"),
            Backend::Scalar(_) => true,
        }
    }

    /// Runtime availability on the executing CPU. Authoritative over
    /// [`Backend::supported`].
    pub fn available(&self) -> bool {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => std::arch::is_aarch64_feature_detected!("neon"),
            Backend::Scalar(_) => true,
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    pub fn validate_ascii(&self, src: &[u8]) -> bool {
        self.validate_ascii_with_errors(src).is_ok()
    }

    pub fn validate_ascii_with_errors(&self, src: &[u8]) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::validate_ascii_avx2(src) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => unsafe { utf_arm64::validate_ascii_neon(src) },
            _ => utf_scalar::validate_ascii_with_errors(src),
        }
    }

    pub fn validate_utf8(&self, src: &[u8]) -> bool {
        self.validate_utf8_with_errors(src).is_ok()
    }

    pub fn validate_utf8_with_errors(&self, src: &[u8]) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::validate_utf8_avx2(src) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => unsafe { utf_arm64::validate_utf8_neon(src) },
            _ => utf_scalar::validate_utf8_with_errors(src),
        }
    }

    pub fn validate_utf16(&self, src: &[u16], endian: Endianness) -> bool {
        self.validate_utf16_with_errors(src, endian).is_ok()
    }

    pub fn validate_utf16_with_errors(&self, src: &[u16], endian: Endianness) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::validate_utf16_avx2(src, endian) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => unsafe { utf_arm64::validate_utf16_neon(src, endian) },
            _ => utf_scalar::validate_utf16_with_errors(src, endian),
        }
    }

    pub fn validate_utf32(&self, src: &[u32]) -> bool {
        self.validate_utf32_with_errors(src).is_ok()
    }

    pub fn validate_utf32_with_errors(&self, src: &[u32]) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::validate_utf32_avx2(src) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => unsafe { utf_arm64::validate_utf32_neon(src) },
            _ => utf_scalar::validate_utf32_with_errors(src),
        }
    }

    // ------------------------------------------------------------------
    // UTF-8 -> UTF-16 / UTF-32
    // ------------------------------------------------------------------

    pub fn convert_utf8_to_utf16(&self, src: &[u8], dst: &mut [u16], endian: Endianness) -> usize {
        self.convert_utf8_to_utf16_with_errors(src, dst, endian)
            .count_or_zero()
    }

    pub fn convert_utf8_to_utf16_with_errors(
        &self,
        src: &[u8],
        dst: &mut [u16],
        endian: Endianness,
    ) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::convert_utf8_to_utf16_avx2(src, dst, endian) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => unsafe { utf_arm64::convert_utf8_to_utf16_neon(src, dst, endian) },
            _ => utf_scalar::convert_utf8_to_utf16_with_errors(src, dst, endian),
        }
    }

    /// Input must already be valid UTF-8; output for malformed input is
    /// unspecified, though never memory-unsafe.
    pub fn convert_valid_utf8_to_utf16(
        &self,
        src: &[u8],
        dst: &mut [u16],
        endian: Endianness,
    ) -> usize {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe {
                utf_x86::convert_utf8_to_utf16_avx2(src, dst, endian).count
            },
            _ => utf_scalar::convert_valid_utf8_to_utf16(src, dst, endian),
        }
    }

    pub fn convert_utf8_to_utf32(&self, src: &[u8], dst: &mut [u32]) -> usize {
        self.convert_utf8_to_utf32_with_errors(src, dst).count_or_zero()
    }

    pub fn convert_utf8_to_utf32_with_errors(&self, src: &[u8], dst: &mut [u32]) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::convert_utf8_to_utf32_avx2(src, dst) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => unsafe { utf_arm64::convert_utf8_to_utf32_neon(src, dst) },
            _ => utf_scalar::convert_utf8_to_utf32_with_errors(src, dst),
        }
    }

    pub fn convert_valid_utf8_to_utf32(&self, src: &[u8], dst: &mut [u32]) -> usize {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::convert_utf8_to_utf32_avx2(src, dst).count },
            _ => utf_scalar::convert_valid_utf8_to_utf32(src, dst),
        }
    }

    // ------------------------------------------------------------------
    // UTF-16 -> UTF-8 / UTF-32
    // ------------------------------------------------------------------

    pub fn convert_utf16_to_utf8(&self, src: &[u16], dst: &mut [u8], endian: Endianness) -> usize {
        self.convert_utf16_to_utf8_with_errors(src, dst, endian)
            .count_or_zero()
    }

    pub fn convert_utf16_to_utf8_with_errors(
        &self,
        src: &[u16],
        dst: &mut [u8],
        endian: Endianness,
    ) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::convert_utf16_to_utf8_avx2(src, dst, endian) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => unsafe { utf_arm64::convert_utf16_to_utf8_neon(src, dst, endian) },
            _ => utf_scalar::convert_utf16_to_utf8_with_errors(src, dst, endian),
        }
    }

    pub fn convert_valid_utf16_to_utf8(
        &self,
        src: &[u16],
        dst: &mut [u8],
        endian: Endianness,
    ) -> usize {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe {
                utf_x86::convert_utf16_to_utf8_avx2(src, dst, endian).count
            },
            _ => utf_scalar::convert_valid_utf16_to_utf8(src, dst, endian),
        }
    }

    pub fn convert_utf16_to_utf32(&self, src: &[u16], dst: &mut [u32], endian: Endianness) -> usize {
        self.convert_utf16_to_utf32_with_errors(src, dst, endian)
            .count_or_zero()
    }

    pub fn convert_utf16_to_utf32_with_errors(
        &self,
        src: &[u16],
        dst: &mut [u32],
        endian: Endianness,
    ) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::convert_utf16_to_utf32_avx2(src, dst, endian) },
            _ => utf_scalar::convert_utf16_to_utf32_with_errors(src, dst, endian),
        }
    }

    pub fn convert_valid_utf16_to_utf32(
        &self,
        src: &[u16],
        dst: &mut [u32],
        endian: Endianness,
    ) -> usize {
        utf_scalar::convert_valid_utf16_to_utf32(src, dst, endian)
    }

    // ------------------------------------------------------------------
    // UTF-32 -> UTF-8 / UTF-16
    // ------------------------------------------------------------------

    pub fn convert_utf32_to_utf8(&self, src: &[u32], dst: &mut [u8]) -> usize {
        self.convert_utf32_to_utf8_with_errors(src, dst).count_or_zero()
    }

    pub fn convert_utf32_to_utf8_with_errors(&self, src: &[u32], dst: &mut [u8]) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::convert_utf32_to_utf8_avx2(src, dst) },
            _ => utf_scalar::convert_utf32_to_utf8_with_errors(src, dst),
        }
    }

    pub fn convert_valid_utf32_to_utf8(&self, src: &[u32], dst: &mut [u8]) -> usize {
        utf_scalar::convert_valid_utf32_to_utf8(src, dst)
    }

    pub fn convert_utf32_to_utf16(&self, src: &[u32], dst: &mut [u16], endian: Endianness) -> usize {
        self.convert_utf32_to_utf16_with_errors(src, dst, endian)
            .count_or_zero()
    }

    pub fn convert_utf32_to_utf16_with_errors(
        &self,
        src: &[u32],
        dst: &mut [u16],
        endian: Endianness,
    ) -> TranscodeResult {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::convert_utf32_to_utf16_avx2(src, dst, endian) },
            _ => utf_scalar::convert_utf32_to_utf16_with_errors(src, dst, endian),
        }
    }

    pub fn convert_valid_utf32_to_utf16(
        &self,
        src: &[u32],
        dst: &mut [u16],
        endian: Endianness,
    ) -> usize {
        utf_scalar::convert_valid_utf32_to_utf16(src, dst, endian)
    }

    // ------------------------------------------------------------------
    // Counting and length prediction
    // ------------------------------------------------------------------

    /// Number of code points in valid UTF-8 input.
    pub fn count_utf8(&self, src: &[u8]) -> usize {
        match self {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::Avx2(_) => unsafe { utf_x86::count_utf8_avx2(src) },
            #[cfg(target_arch = "aarch64")]
            Backend::Neon(_) => unsafe { utf_arm64::count_utf8_neon(src) },
            _ => utf_scalar::count_utf8(src),
        }
    }

    /// Number of code points in valid UTF-16 input.
    pub fn count_utf16(&self, src: &[u16], endian: Endianness) -> usize {
        utf_scalar::count_utf16(src, endian)
    }

    pub fn utf16_length_from_utf8(&self, src: &[u8]) -> usize {
        utf_scalar::utf16_length_from_utf8(src)
    }

    pub fn utf32_length_from_utf8(&self, src: &[u8]) -> usize {
        self.count_utf8(src)
    }

    pub fn utf8_length_from_utf16(&self, src: &[u16], endian: Endianness) -> usize {
        utf_scalar::utf8_length_from_utf16(src, endian)
    }

    pub fn utf32_length_from_utf16(&self, src: &[u16], endian: Endianness) -> usize {
        utf_scalar::utf32_length_from_utf16(src, endian)
    }

    pub fn utf8_length_from_utf32(&self, src: &[u32]) -> usize {
        utf_scalar::utf8_length_from_utf32(src)
    }

    pub fn utf16_length_from_utf32(&self, src: &[u32]) -> usize {
        utf_scalar::utf16_length_from_utf32(src)
    }
}

// ============================================================================
// Free-function surface
// ============================================================================
//
// One entry point per operation, endianness expanded into le/be names, all
// routed through the process-wide backend resolved by `active_backend()`.

macro_rules! forward {
    ($(#[$meta:meta])* $name:ident($($arg:ident: $ty:ty),*) -> $ret:ty => $method:ident($($pass:expr),*)) => {
        $(#[$meta])*
        pub fn $name($($arg: $ty),*) -> $ret {
            active_backend().$method($($pass),*)
        }
    };
}

forward!(
    /// True when every byte of `src` is ASCII.
    validate_ascii(src: &[u8]) -> bool => validate_ascii(src)
);
forward!(validate_ascii_with_errors(src: &[u8]) -> TranscodeResult => validate_ascii_with_errors(src));
forward!(
    /// True when `src` is well-formed UTF-8.
    validate_utf8(src: &[u8]) -> bool => validate_utf8(src)
);
forward!(validate_utf8_with_errors(src: &[u8]) -> TranscodeResult => validate_utf8_with_errors(src));
forward!(validate_utf16le(src: &[u16]) -> bool => validate_utf16(src, Endianness::Little));
forward!(validate_utf16le_with_errors(src: &[u16]) -> TranscodeResult => validate_utf16_with_errors(src, Endianness::Little));
forward!(validate_utf16be(src: &[u16]) -> bool => validate_utf16(src, Endianness::Big));
forward!(validate_utf16be_with_errors(src: &[u16]) -> TranscodeResult => validate_utf16_with_errors(src, Endianness::Big));
forward!(validate_utf32(src: &[u32]) -> bool => validate_utf32(src));
forward!(validate_utf32_with_errors(src: &[u32]) -> TranscodeResult => validate_utf32_with_errors(src));

forward!(convert_utf8_to_utf16le(src: &[u8], dst: &mut [u16]) -> usize => convert_utf8_to_utf16(src, dst, Endianness::Little));
forward!(convert_utf8_to_utf16le_with_errors(src: &[u8], dst: &mut [u16]) -> TranscodeResult => convert_utf8_to_utf16_with_errors(src, dst, Endianness::Little));
forward!(convert_valid_utf8_to_utf16le(src: &[u8], dst: &mut [u16]) -> usize => convert_valid_utf8_to_utf16(src, dst, Endianness::Little));
forward!(convert_utf8_to_utf16be(src: &[u8], dst: &mut [u16]) -> usize => convert_utf8_to_utf16(src, dst, Endianness::Big));
forward!(convert_utf8_to_utf16be_with_errors(src: &[u8], dst: &mut [u16]) -> TranscodeResult => convert_utf8_to_utf16_with_errors(src, dst, Endianness::Big));
forward!(convert_valid_utf8_to_utf16be(src: &[u8], dst: &mut [u16]) -> usize => convert_valid_utf8_to_utf16(src, dst, Endianness::Big));
forward!(convert_utf8_to_utf32(src: &[u8], dst: &mut [u32]) -> usize => convert_utf8_to_utf32(src, dst));
forward!(convert_utf8_to_utf32_with_errors(src: &[u8], dst: &mut [u32]) -> TranscodeResult => convert_utf8_to_utf32_with_errors(src, dst));
forward!(convert_valid_utf8_to_utf32(src: &[u8], dst: &mut [u32]) -> usize => convert_valid_utf8_to_utf32(src, dst));

forward!(convert_utf16le_to_utf8(src: &[u16], dst: &mut [u8]) -> usize => convert_utf16_to_utf8(src, dst, Endianness::Little));
forward!(convert_utf16le_to_utf8_with_errors(src: &[u16], dst: &mut [u8]) -> TranscodeResult => convert_utf16_to_utf8_with_errors(src, dst, Endianness::Little));
forward!(convert_valid_utf16le_to_utf8(src: &[u16], dst: &mut [u8]) -> usize => convert_valid_utf16_to_utf8(src, dst, Endianness::Little));
forward!(convert_utf16be_to_utf8(src: &[u16], dst: &mut [u8]) -> usize => convert_utf16_to_utf8(src, dst, Endianness::Big));
forward!(convert_utf16be_to_utf8_with_errors(src: &[u16], dst: &mut [u8]) -> TranscodeResult => convert_utf16_to_utf8_with_errors(src, dst, Endianness::Big));
forward!(convert_valid_utf16be_to_utf8(src: &[u16], dst: &mut [u8]) -> usize => convert_valid_utf16_to_utf8(src, dst, Endianness::Big));
forward!(convert_utf16le_to_utf32(src: &[u16], dst: &mut [u32]) -> usize => convert_utf16_to_utf32(src, dst, Endianness::Little));
forward!(convert_utf16le_to_utf32_with_errors(src: &[u16], dst: &mut [u32]) -> TranscodeResult => convert_utf16_to_utf32_with_errors(src, dst, Endianness::Little));
forward!(convert_valid_utf16le_to_utf32(src: &[u16], dst: &mut [u32]) -> usize => convert_valid_utf16_to_utf32(src, dst, Endianness::Little));
forward!(convert_utf16be_to_utf32(src: &[u16], dst: &mut [u32]) -> usize => convert_utf16_to_utf32(src, dst, Endianness::Big));
forward!(convert_utf16be_to_utf32_with_errors(src: &[u16], dst: &mut [u32]) -> TranscodeResult => convert_utf16_to_utf32_with_errors(src, dst, Endianness::Big));
forward!(convert_valid_utf16be_to_utf32(src: &[u16], dst: &mut [u32]) -> usize => convert_valid_utf16_to_utf32(src, dst, Endianness::Big));

forward!(convert_utf32_to_utf8(src: &[u32], dst: &mut [u8]) -> usize => convert_utf32_to_utf8(src, dst));
forward!(convert_utf32_to_utf8_with_errors(src: &[u32], dst: &mut [u8]) -> TranscodeResult => convert_utf32_to_utf8_with_errors(src, dst));
forward!(convert_valid_utf32_to_utf8(src: &[u32], dst: &mut [u8]) -> usize => convert_valid_utf32_to_utf8(src, dst));
forward!(convert_utf32_to_utf16le(src: &[u32], dst: &mut [u16]) -> usize => convert_utf32_to_utf16(src, dst, Endianness::Little));
forward!(convert_utf32_to_utf16le_with_errors(src: &[u32], dst: &mut [u16]) -> TranscodeResult => convert_utf32_to_utf16_with_errors(src, dst, Endianness::Little));
forward!(convert_valid_utf32_to_utf16le(src: &[u32], dst: &mut [u16]) -> usize => convert_valid_utf32_to_utf16(src, dst, Endianness::Little));
forward!(convert_utf32_to_utf16be(src: &[u32], dst: &mut [u16]) -> usize => convert_utf32_to_utf16(src, dst, Endianness::Big));
forward!(convert_utf32_to_utf16be_with_errors(src: &[u32], dst: &mut [u16]) -> TranscodeResult => convert_utf32_to_utf16_with_errors(src, dst, Endianness::Big));
forward!(convert_valid_utf32_to_utf16be(src: &[u32], dst: &mut [u16]) -> usize => convert_valid_utf32_to_utf16(src, dst, Endianness::Big));

forward!(count_utf8(src: &[u8]) -> usize => count_utf8(src));
forward!(count_utf16le(src: &[u16]) -> usize => count_utf16(src, Endianness::Little));
forward!(count_utf16be(src: &[u16]) -> usize => count_utf16(src, Endianness::Big));
forward!(utf16_length_from_utf8(src: &[u8]) -> usize => utf16_length_from_utf8(src));
forward!(utf32_length_from_utf8(src: &[u8]) -> usize => utf32_length_from_utf8(src));
forward!(utf8_length_from_utf16le(src: &[u16]) -> usize => utf8_length_from_utf16(src, Endianness::Little));
forward!(utf8_length_from_utf16be(src: &[u16]) -> usize => utf8_length_from_utf16(src, Endianness::Big));
forward!(utf32_length_from_utf16le(src: &[u16]) -> usize => utf32_length_from_utf16(src, Endianness::Little));
forward!(utf32_length_from_utf16be(src: &[u16]) -> usize => utf32_length_from_utf16(src, Endianness::Big));
forward!(utf8_length_from_utf32(src: &[u32]) -> usize => utf8_length_from_utf32(src));
forward!(utf16_length_from_utf32(src: &[u32]) -> usize => utf16_length_from_utf32(src));

/// UTF-16LE <-> UTF-16BE: byte-swap every unit into `dst`.
pub fn change_endianness_utf16(src: &[u16], dst: &mut [u16]) -> usize {
    utf_scalar::change_endianness_utf16(src, dst)
}
