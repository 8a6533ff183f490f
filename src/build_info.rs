//! Build-time information
//!
//! Metadata captured by the build script, printed by `input-doctor` so a
//! report can be matched to the binary that produced it.

/// Package name from Cargo.toml
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.85.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Returns a one-line version string
///
/// Format: `{name} {version} ({target_triple}-opt{opt_level})`
pub fn version_string() -> String {
    format!(
        "{} {} ({}-opt{})",
        PKG_NAME, PKG_VERSION, CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL
    )
}

/// Every captured field as `(label, value)` pairs
pub fn fields() -> [(&'static str, &'static str); 6] {
    [
        ("Version", PKG_VERSION),
        ("Built", BUILD_TIMESTAMP),
        ("Target", CARGO_TARGET_TRIPLE),
        ("Optimization", CARGO_OPT_LEVEL),
        ("Rustc", RUSTC_SEMVER),
        ("Channel", RUSTC_CHANNEL),
    ]
}

/// Returns a multi-line build info string
pub fn detailed_info() -> String {
    fields()
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
