//! SIMD-accelerated primitives with a portable scalar fallback.
//!
//! [`scalar`] is the behavioral reference: every primitive exposed here
//! dispatches to a vectorized fast path only when the current CPU supports
//! it, and otherwise falls back to the scalar form. Fast paths must never
//! produce a result that differs from the scalar implementation.

pub mod scalar;

#[cfg(target_arch = "aarch64")]
mod neon;

/// Runtime capability flags, detected once and cached.
#[derive(Debug, Clone, Copy)]
pub struct SimdCaps {
    pub neon: bool,
}

impl SimdCaps {
    fn detect() -> Self {
        #[cfg(target_arch = "aarch64")]
        {
            // NEON is a baseline feature of every aarch64 target Rust
            // compiles for, but we still probe it explicitly to mirror the
            // capability-flag pattern used for other architectures.
            Self { neon: std::arch::is_aarch64_feature_detected!("neon") }
        }
        #[cfg(not(target_arch = "aarch64"))]
        {
            Self { neon: false }
        }
    }
}

/// Returns the detected SIMD capabilities for the current process. Computed
/// once; cheap to call repeatedly afterward.
pub fn caps() -> SimdCaps {
    use std::sync::OnceLock;
    static CAPS: OnceLock<SimdCaps> = OnceLock::new();
    *CAPS.get_or_init(SimdCaps::detect)
}

/// FNV-1a hash of a byte slice. Used for vocabulary hash maps and the piece
/// cache. No vectorized fast path exists for this primitive in the
/// reference implementation; it is scalar on every architecture.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    scalar::hash_bytes(bytes)
}

/// Index of the first byte `>= 0x80`, or `data.len()` if `data` is entirely
/// ASCII.
#[inline]
pub fn find_non_ascii(data: &[u8]) -> usize {
    #[cfg(target_arch = "aarch64")]
    {
        if caps().neon {
            return unsafe { neon::find_non_ascii(data) };
        }
    }
    scalar::find_non_ascii(data)
}

/// True if every byte in `data` is `< 0x80`.
#[inline]
pub fn is_all_ascii(data: &[u8]) -> bool {
    #[cfg(target_arch = "aarch64")]
    {
        if caps().neon {
            return unsafe { neon::is_all_ascii(data) };
        }
    }
    scalar::is_all_ascii(data)
}

/// Counts UTF-8 codepoints (i.e. non-continuation bytes) in `data`. Does not
/// validate that `data` is well-formed UTF-8.
#[inline]
pub fn count_utf8_chars(data: &[u8]) -> usize {
    #[cfg(target_arch = "aarch64")]
    {
        if caps().neon {
            return unsafe { neon::count_utf8_chars(data) };
        }
    }
    scalar::count_utf8_chars(data)
}

/// Returns `(index, value)` of the smallest element in `values`. Ties break
/// toward the lowest index. `values` must be non-empty for the result to be
/// meaningful; an empty slice yields `(0, u32::MAX)`.
#[inline]
pub fn argmin_u32(values: &[u32]) -> (usize, u32) {
    #[cfg(target_arch = "aarch64")]
    {
        if caps().neon {
            return unsafe { neon::argmin_u32(values) };
        }
    }
    scalar::argmin_u32(values)
}

/// Length of the longest ASCII-letter run starting at `data[0]`.
#[inline]
pub fn match_ascii_letters(data: &[u8]) -> usize {
    #[cfg(target_arch = "aarch64")]
    {
        if caps().neon {
            return unsafe { neon::match_ascii_letters(data) };
        }
    }
    scalar::match_ascii_letters(data)
}

/// Decodes standard base64 (RFC 4648, `+`/`/` alphabet) from `input` into
/// `out`, stopping at the first `=` or once `out` is full. Non-alphabet
/// bytes (including whitespace) are skipped. Returns the number of bytes
/// written.
#[inline]
pub fn base64_decode(input: &[u8], out: &mut [u8]) -> usize {
    #[cfg(target_arch = "aarch64")]
    {
        if caps().neon {
            return unsafe { neon::base64_decode(input, out) };
        }
    }
    scalar::base64_decode(input, out)
}
