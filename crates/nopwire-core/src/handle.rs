//! The wire-level handle reference. Handle *policies* and owning wrappers
//! live in the `nopwire` crate; this crate only carries the raw reference
//! type the `Reader`/`Writer` contracts push and resolve.

/// Signed 64-bit reference a `Handle` encodes inline. `-1`
/// ([`EMPTY_HANDLE_REFERENCE`]) denotes the empty handle; non-negative
/// values are opaque indices the Writer assigns in push order.
pub type HandleReference = i64;

/// The reference value denoting an empty handle.
pub const EMPTY_HANDLE_REFERENCE: HandleReference = -1;
