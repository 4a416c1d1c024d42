use crate::{conf::settings, pkg::client::ClientSession, pkg::server::listen, prelude::Result};
use clap::{Parser, Subcommand};

mod account;
mod jobs;
mod migrate;

#[derive(Parser)]
#[command(about = "job board api server and command-line client")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Serve the job board api and board page
    Listen,
    /// Apply database migrations
    Migrate,
    /// Browse and manage job postings through the api
    #[command(subcommand)]
    Jobs(jobs::JobsCommand),
    Signup {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    Whoami,
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    let session = ClientSession::load(&settings.session_file).await;
    match args.command {
        Some(SubCommandType::Listen) => {
            listen().await?;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply().await?;
        }
        Some(SubCommandType::Jobs(command)) => {
            jobs::run(command, session.as_ref()).await?;
        }
        Some(SubCommandType::Signup { username, password }) => {
            account::signup(&username, &password).await?;
        }
        Some(SubCommandType::Login { username, password }) => {
            account::login(&username, &password).await?;
        }
        Some(SubCommandType::Logout) => {
            account::logout(session.as_ref()).await?;
        }
        Some(SubCommandType::Whoami) => {
            account::whoami(session.as_ref()).await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
