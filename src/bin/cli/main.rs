mod app;
mod commands;
#[cfg(feature = "tui")]
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "recall-cli", about = "RecallForge flashcards from the terminal", version)]
struct Cli {
    /// API base URL (overrides RECALLFORGE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and log in
    Register {
        username: String,
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in with username and password
    Login {
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log out and discard the stored session
    Logout,

    /// Show the currently logged-in user
    Whoami,

    /// Deck management
    #[command(subcommand)]
    Decks(DecksCommand),

    /// List cards, optionally scoped to one deck
    Cards {
        #[arg(long)]
        deck: Option<i64>,
    },

    /// Submit a URL for ingestion and watch the job to completion
    Ingest {
        url: String,
        /// Deck the generated cards go into
        #[arg(long)]
        deck: i64,
    },

    /// Review due cards
    Review {
        /// Review a single deck (default: all decks)
        #[arg(long)]
        deck: Option<i64>,
        /// Line-based review instead of the full-screen TUI
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand)]
enum DecksCommand {
    /// List decks
    List,

    /// Create a deck
    New {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a deck
    Rm {
        id: i64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    let app = app::App::new(cli.api_url.as_deref())?;

    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            runtime.block_on(commands::auth::run_register(
                &app,
                &username,
                &email,
                password.as_deref(),
            ))?;
        }
        Command::Login { username, password } => {
            runtime.block_on(commands::auth::run_login(&app, &username, password.as_deref()))?;
        }
        Command::Logout => commands::auth::run_logout(&app)?,
        Command::Whoami => runtime.block_on(commands::auth::run_whoami(&app))?,
        Command::Decks(subcmd) => match subcmd {
            DecksCommand::List => runtime.block_on(commands::decks::run_decks(&app))?,
            DecksCommand::New { name, description } => {
                runtime.block_on(commands::decks::run_new(&app, &name, description))?;
            }
            DecksCommand::Rm { id } => runtime.block_on(commands::decks::run_rm(&app, id))?,
        },
        Command::Cards { deck } => runtime.block_on(commands::decks::run_cards(&app, deck))?,
        Command::Ingest { url, deck } => {
            runtime.block_on(commands::ingest::run(&app, &url, deck))?;
        }
        Command::Review { deck, plain } => {
            #[cfg(feature = "tui")]
            {
                if plain {
                    runtime.block_on(commands::review::run_plain(&app, deck))?;
                } else {
                    tui::run(&runtime, &app, deck)?;
                }
            }
            #[cfg(not(feature = "tui"))]
            {
                let _ = plain;
                runtime.block_on(commands::review::run_plain(&app, deck))?;
            }
        }
    }

    Ok(())
}
