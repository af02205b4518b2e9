pub const DEFAULT_TOGGLE_KEY: &str = "ctrl+space";
pub const DEFAULT_HOST_LATENCY_MS: u64 = 40;
pub const MAX_HOST_LATENCY_MS: u64 = 5_000;
pub const DEFAULT_REFRESH_FALLBACK_MS: u64 = 750;
pub const MIN_REFRESH_FALLBACK_MS: u64 = 50;
pub const MAX_REFRESH_FALLBACK_MS: u64 = 10_000;
pub const DEFAULT_OPEN_TIMEOUT_MS: u64 = 3_000;
pub const MIN_OPEN_TIMEOUT_MS: u64 = 100;
pub const MAX_OPEN_TIMEOUT_MS: u64 = 30_000;

pub(super) const MAX_HOST_ARGS: usize = 64;
pub(super) const MAX_HOST_ARG_BYTES: usize = 8 * 1024;
