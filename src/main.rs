use std::io::{self, Write};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pastor_messages::config::Config;
use pastor_messages::models::message::MessageId;
use pastor_messages::services::auth::Session;
use pastor_messages::services::pastor_messages::PastorMessageApi;
use pastor_messages::services::storage::{LocalStorage, TOKEN_KEY};
use pastor_messages::views::admin::AdminPanel;
use pastor_messages::views::home::HomeView;

#[derive(Parser)]
#[command(name = "pastor-admin", about = "Manage the pastor messages shown on the home page")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store the bearer token used for admin requests
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored token
    Logout,
    /// Show all messages
    List,
    /// Create a new message
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        /// Make it the active message
        #[arg(long)]
        active: bool,
    },
    /// Edit an existing message; omitted fields keep their current value
    Edit {
        id: MessageId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a message (asks for confirmation)
    Delete {
        id: MessageId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Make a message the active one
    Activate { id: MessageId },
    /// Show what the public home page displays
    Home,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let storage = LocalStorage::new(&config.session_file);
    let api = PastorMessageApi::new(&config.api_url);

    match args.command {
        Command::Login { token } => {
            storage.set(TOKEN_KEY, &token)?;
            if !Session::with_token(token).is_admin() {
                tracing::warn!("Stored token does not carry a valid admin role");
            }
            println!("Token saved to {}", storage.path().display());
            Ok(())
        }
        Command::Logout => {
            if storage.remove(TOKEN_KEY)? {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
            Ok(())
        }
        Command::Home => {
            print!("{}", HomeView::mount(&api).await.render());
            Ok(())
        }
        command => {
            let session = Session::from_storage(&storage)?;
            let panel = AdminPanel::mount(api, session).await?;
            run_admin(&panel, command).await
        }
    }
}

async fn run_admin(panel: &AdminPanel, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Create {
            title,
            message,
            active,
        } => {
            panel.set_title(title);
            panel.set_message(message);
            panel.set_active(active);
            panel.submit().await;
        }
        Command::Edit {
            id,
            title,
            message,
            active,
        } => {
            if !panel.start_edit(id) {
                print!("{}", panel.render());
                anyhow::bail!("Message {} not found", id);
            }
            if let Some(title) = title {
                panel.set_title(title);
            }
            if let Some(message) = message {
                panel.set_message(message);
            }
            if let Some(active) = active {
                panel.set_active(active);
            }
            panel.submit().await;
        }
        Command::Delete { id, yes } => {
            if yes {
                panel.delete(id, &|_: &str| true).await;
            } else {
                panel.delete(id, &ask_on_stdin).await;
            }
        }
        Command::Activate { id } => panel.activate(id).await,
        // mounting already loaded the list
        Command::List | Command::Login { .. } | Command::Logout | Command::Home => {}
    }

    print!("{}", panel.render());
    match panel.snapshot().status {
        Some(status) if status.is_error() => anyhow::bail!("{}", status.text()),
        _ => Ok(()),
    }
}

fn ask_on_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
