use anyhow::Context;
use ogs::domain::config::ApiConfig;
use ogs::kernel::config::{CONFIG_PATH_VAR, load_config};
use ogs_logger::Logger;
use ogs_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::var_os(CONFIG_PATH_VAR);
    let cfg: ApiConfig = load_config(path).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).config(&cfg.logging)?.init()?;

    Server::builder().config(cfg).build().await?.run().await
}
