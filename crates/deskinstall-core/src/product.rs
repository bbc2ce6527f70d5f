pub const PRODUCT_DISPLAY_NAME: &str = "AnythingLLM";
pub const PRODUCT_SLUG: &str = "anything-llm";
pub const STATE_FILE_NAME: &str = "installer-state.json";

/// Version of the bundled payload, fixed at build time.
pub fn available_version() -> &'static str {
    option_env!("DESKINSTALL_APP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
