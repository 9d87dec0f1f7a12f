use std::io::Write;

/// Installs the process logger. `RUST_LOG` overrides the default `info` level.
/// Logs go to stderr so the report on stdout stays clean.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:<5}] {}", record.level(), record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}
