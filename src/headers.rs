//! Protocol header names, lower-case as they appear on the wire.

/// Marks a protocol-aware request, echoed as `x-inertia: true` on JSON responses.
pub const X_INERTIA: &str = "x-inertia";

/// Asset version the client was built against.
pub const X_INERTIA_VERSION: &str = "x-inertia-version";

/// Where the client should hard-reload to after a version mismatch.
pub const X_INERTIA_LOCATION: &str = "x-inertia-location";

/// Component a partial reload targets.
pub const X_INERTIA_PARTIAL_COMPONENT: &str = "x-inertia-partial-component";

/// Comma-separated prop keys of a partial reload.
pub const X_INERTIA_PARTIAL_DATA: &str = "x-inertia-partial-data";
