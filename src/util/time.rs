/// Milliseconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Milliseconds since the UNIX epoch
#[cfg(target_arch = "wasm32")]
pub fn timestamp_millis() -> u64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| (perf.time_origin() + perf.now()) as u64)
        .unwrap_or(0)
}

/// Seconds since the UNIX epoch, used for plan creation/update stamps
pub fn timestamp_secs() -> u64 {
    timestamp_millis() / 1000
}
