use {
    abi_union::{UnionConfig, run},
    anyhow::Context,
    tap::TapFallible,
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt},
};

fn init_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("abi_union=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let config = UnionConfig::default();
    run(&config)
        .tap_err(|e| error!(kind = ?e.kind(), "merging ABI groups failed"))
        .with_context(|| {
            format!(
                "merging {} into {}",
                config.input.display(),
                config.output.display()
            )
        })
        .map(|summary| info!(entries = summary.entries, output = %config.output.display(), "done"))
}
