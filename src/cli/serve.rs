use std::net::SocketAddr;

use anyhow::Context as _;
use clap::Parser;
use cookbook::{
    Cookbook,
    server::{self, ServerState},
};
use tracing::instrument;

use super::Paths;

#[derive(Debug, Parser)]
pub struct Serve {
    /// Address to listen on (overrides the configuration file)
    #[arg(long, value_name = "ADDR")]
    listen: Option<SocketAddr>,

    /// Start with an empty cookbook instead of the catalog file
    #[arg(long)]
    empty: bool,
}

impl Serve {
    #[instrument(skip(paths))]
    pub fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let mut config = paths.load_config()?;
        if let Some(listen) = self.listen {
            config.set_listen(listen);
        }

        let cookbook = if config.seed_catalog && !self.empty {
            paths.open_catalog()?.into_cookbook()
        } else {
            Cookbook::new()
        };

        let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
        runtime
            .block_on(server::serve(
                config.listen(),
                ServerState::new(cookbook).shared(),
            ))
            .with_context(|| format!("server on {} failed", config.listen()))
    }
}
