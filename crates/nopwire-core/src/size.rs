//! `SizeType` — the canonical length/count integer for container prefixes.

/// Unsigned integer used for every count/length prefix embedded in a
/// container payload. Matches the host's pointer width, same as the
/// original implementation's `std::size_t`.
#[cfg(target_pointer_width = "64")]
pub type SizeType = u64;

/// Unsigned integer used for every count/length prefix embedded in a
/// container payload. Matches the host's pointer width, same as the
/// original implementation's `std::size_t`.
#[cfg(not(target_pointer_width = "64"))]
pub type SizeType = u32;
