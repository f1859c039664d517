use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::app::LaunchOptions;
use crate::input::Bindings;
use crate::nav::BoundaryPolicy;

#[derive(Parser)]
#[command(name = "slidedeck")]
#[command(author, version, about)]
#[command(long_about = "Present a markdown slide deck with keyboard navigation and speaker notes.\n\n\
    Slides are split on `---` lines, three blank lines, or a new `# ` heading.\n\
    A `Notes:` line starts the speaker notes for a slide.\n\n\
    Examples:\n  \
    slidedeck talk.md                    Present fullscreen\n  \
    slidedeck talk.md --windowed         Present in a window\n  \
    slidedeck talk.md --boundary wrap    Wrap around at the ends\n  \
    slidedeck outline talk.md            List slide titles\n  \
    slidedeck keys                       Show key bindings")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Markdown file to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// What happens when navigating past the first or last slide
    #[arg(long, value_enum, global = false)]
    pub boundary: Option<BoundaryPolicy>,

    /// Key binding preset
    #[arg(long, value_enum, global = false)]
    pub bindings: Option<Bindings>,

    /// Color theme (light or dark)
    #[arg(long, global = false)]
    pub theme: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the slides of a deck
    Outline {
        /// Markdown file to inspect
        file: PathBuf,
    },

    /// Show the effective key bindings
    Keys {
        /// Key binding preset (defaults to the configured one)
        #[arg(long, value_enum)]
        bindings: Option<Bindings>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.boundary, defaults.bindings, defaults.theme, keys.s)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Log level implied by `-v`/`-q`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Outline { file }) => {
                if !file.exists() {
                    anyhow::bail!("File not found: {}", file.display());
                }
                crate::commands::outline::run(&file)
            }
            Some(Commands::Keys { bindings }) => crate::commands::keys::run(bindings),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("slidedeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    let launch = LaunchOptions {
                        windowed: self.windowed,
                        slide: self.slide,
                        boundary: self.boundary,
                        bindings: self.bindings,
                        theme: self.theme,
                    };
                    crate::app::run(file, launch)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}
