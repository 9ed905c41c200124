/// Wrapper around `tracing::trace!` tagging an event with a snapshot name and its data, so log
/// tooling can follow how the SDL evolves while a schema is composed. Compiled out unless the
/// `snapshot_tracing` feature is enabled.
///
/// The data must implement the tracing crate's `Value` trait, typically a `&str`:
/// ```ignore
/// snapshot!("ConcatenatedTypeDefs", sdl.as_str(), "concatenated type definitions");
/// // Generates:
/// // trace!(snapshot = "ConcatenatedTypeDefs", data = sdl.as_str(), "concatenated type definitions");
/// ```
macro_rules! snapshot {
    ($name:literal, $value:expr, $msg:literal) => {
        #[cfg(feature = "snapshot_tracing")]
        trace!(snapshot = $name, data = $value, $msg);
    };
}

pub(crate) use snapshot;
