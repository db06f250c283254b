//! Shared logging setup.

/// Initialize process-wide tracing with the given output format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: Format) -> bool {
    tracing::init(format)
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use tracing::Format;
