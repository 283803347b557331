// Runs once per test binary that links this crate.
#[ctor::ctor(anonymous)]
fn test_init() {
    let _ = env_logger::builder()
        .parse_env(env_logger::Env::default().default_filter_or("info,itimer=debug"))
        .format_level(true)
        .format_source_path(true)
        .format_module_path(false)
        .format_timestamp_micros()
        // Log to stdout so the output is captured per test
        .target(env_logger::Target::Stdout)
        .is_test(true)
        .try_init();
}
