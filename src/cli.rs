use std::path::PathBuf;

mod add;
mod list;
mod serve;
mod summary;
mod terminal;
mod validate;

use add::Add;
use anyhow::Context as _;
use clap::ArgAction;
use cookbook::{Catalog, Config};
use list::List;
use serve::Serve;
use summary::Summary;
use tracing::instrument;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the catalog file
    #[arg(long, default_value = "cookbook.yaml", global = true)]
    catalog: PathBuf,

    /// The path to the configuration file
    #[arg(long, default_value = "cookbook.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let paths = Paths {
            catalog: self.catalog,
            config: self.config,
        };
        self.command.run(&paths)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// File locations shared by every command.
#[derive(Debug)]
struct Paths {
    catalog: PathBuf,
    config: PathBuf,
}

impl Paths {
    /// Loads the catalog, starting empty if the file does not exist.
    fn open_catalog(&self) -> anyhow::Result<Catalog> {
        Catalog::open(&self.catalog)
            .with_context(|| format!("failed to open catalog {}", self.catalog.display()))
    }

    /// Loads the configuration, using the defaults if the file does not exist.
    fn load_config(&self) -> anyhow::Result<Config> {
        Config::load_or_default(&self.config).map_err(anyhow::Error::msg)
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Print the canonical form of an entry name
    Parse(Parse),

    /// Add an ingredient or a recipe to the catalog
    #[command(subcommand)]
    Add(Add),

    /// Show the total cook time and base ingredients of a recipe
    Summary(Summary),

    /// List the entries in the catalog
    List(List),

    /// Check the catalog for broken references and cycles
    Validate(Validate),

    /// Serve the catalog over HTTP
    Serve(Serve),

    /// Show or modify configuration settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    fn run(self, paths: &Paths) -> anyhow::Result<()> {
        match self {
            Self::Parse(command) => command.run()?,
            Self::Add(command) => command.run(paths)?,
            Self::Summary(command) => command.run(paths)?,
            Self::List(command) => command.run(paths)?,
            Self::Validate(command) => command.run(paths)?,
            Self::Serve(command) => command.run(paths)?,
            Self::Config(command) => command.run(paths)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Parse {
    /// The raw name, e.g. 'bEtty_CROCker-pancakes'
    raw: String,
}

impl Parse {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        let normalized = cookbook::normalize(&self.raw)?;
        println!("{normalized}");
        Ok(())
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file
    ///
    /// Settings that are not given keep their current value.
    Set {
        /// Address the HTTP server listens on
        #[arg(long)]
        listen: Option<std::net::SocketAddr>,

        /// Whether `serve` seeds its cookbook from the catalog file
        #[arg(long)]
        seed_catalog: Option<bool>,
    },
}

impl ConfigCommand {
    #[instrument(skip(paths))]
    fn run(self, paths: &Paths) -> anyhow::Result<()> {
        let mut config = paths.load_config()?;

        match self {
            Self::Show => {
                println!("listen = {}", config.listen());
                println!("seed_catalog = {}", config.seed_catalog);
            }
            Self::Set {
                listen,
                seed_catalog,
            } => {
                if let Some(listen) = listen {
                    config.set_listen(listen);
                }
                if let Some(seed_catalog) = seed_catalog {
                    config.seed_catalog = seed_catalog;
                }
                config.save(&paths.config).map_err(anyhow::Error::msg)?;
                println!("Updated {}", paths.config.display());
            }
        }

        Ok(())
    }
}

/// Output format shared by the reporting commands.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}
