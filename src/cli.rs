use std::path::PathBuf;

mod expand;
mod legend;
mod show;
mod terminal;
mod tree;

use anyhow::Context as _;
use clap::ArgAction;
use coursetree::{Config, CourseCode, CourseDatabase, load_database};
use expand::Expand;
use legend::Legend;
use show::Show;
use tracing::instrument;
use tree::Tree;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The configuration file
    #[arg(short, long, default_value = "coursetree.toml", global = true)]
    config: PathBuf,

    /// The course database, a file or a directory of files
    ///
    /// Overrides the database named in the configuration file.
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let context = Context {
            config: self.config,
            database: self.database,
        };
        self.command.run(&context)
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

        // stdout carries the tree itself, which may be JSON
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Build a prerequisite tree from a seed and print it by layer
    Tree(Tree),

    /// Show a course's details
    Show(Show),

    /// Append a course and its related courses to a seed
    Expand(Expand),

    /// Explain what each status means
    Legend(Legend),
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::Tree(command) => command.run(context)?,
            Self::Show(command) => command.run(context)?,
            Self::Expand(command) => command.run(context)?,
            Self::Legend(_) => Legend::run(),
        }
        Ok(())
    }
}

/// The global options every subcommand loads from.
#[derive(Debug)]
pub struct Context {
    config: PathBuf,
    database: Option<PathBuf>,
}

impl Context {
    pub fn config(&self) -> anyhow::Result<Config> {
        Config::load_or_default(&self.config).map_err(anyhow::Error::msg)
    }

    #[instrument(level = "debug", skip(config))]
    pub fn database(&self, config: &Config) -> anyhow::Result<CourseDatabase> {
        let path = self
            .database
            .clone()
            .or_else(|| config.database_path(&self.config))
            .with_context(|| {
                format!(
                    "no course database given; pass --database or set `database` in {}",
                    self.config.display()
                )
            })?;
        load_database(&path).with_context(|| format!("failed to load {}", path.display()))
    }
}

/// Reads a course code typed on the command line, the way seed codes are read.
fn parse_code(input: &str, config: &Config) -> anyhow::Result<CourseCode> {
    let code = if config.normalize_codes {
        CourseCode::normalize(input)
    } else {
        CourseCode::new(input.trim().to_string()).ok()
    };
    code.with_context(|| format!("'{input}' is not a course code"))
}
