use anyhow::Context;
use vreg::domain::config::AppConfig;
use vreg::kernel::config::load_config;
use vreg_server::{Server, init_logger};

#[cfg(feature = "profiling")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Explicit config file path; `server.toml` in the working directory is used when unset.
const CONFIG_ENV: &str = "VREG_CONFIG";

#[vreg_runtime::main(interactive)]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "profiling")]
    let _profiler = dhat::Profiler::new_heap();

    let cfg: AppConfig = load_config(std::env::var_os(CONFIG_ENV))
        .context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;

    Server::builder().config(cfg).build()?.run().await
}
