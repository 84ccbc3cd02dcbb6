//! ember binary: command-line chat client

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ember_client::{ipfs, ClientBuilder, OutgoingMessage};
use ember_core::{Account, ChatConfig, SecretKey};

#[derive(Parser)]
#[command(name = "ember", about = "Client for the ember blockchain chat")]
struct Cli {
    /// Path to the client configuration file
    #[arg(long, default_value = "./ember-data/config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a fresh account and print its secret key
    Generate,
    /// Log in with a secret key (hex)
    Login { secret_key: String },
    /// Log out and clear stored credentials
    Logout,
    /// Show the active address
    Whoami,
    /// Show the current energy balance
    Energy,
    /// List chats in the configured space
    Chats,
    /// Send a message to a chat
    Send {
        chat_id: String,
        message: String,
        /// Message id this send replies to
        #[arg(long)]
        reply_to: Option<String>,
        /// Captcha verification token for the request-token path
        #[arg(long)]
        captcha_token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let config = if cli.config.exists() {
        ChatConfig::load(&cli.config)?
    } else {
        ChatConfig::default()
    };

    match cli.command {
        Command::Generate => {
            let account = Account::generate();
            println!("address:    {}", account.address);
            println!("secret key: {}", account.secret.to_hex());
            println!("Keep the secret key safe; it is the only way back into this account.");
        }
        Command::Login { secret_key } => {
            if !SecretKey::is_well_formed_hex(&secret_key) {
                anyhow::bail!("a secret key is 64 hex characters");
            }
            let mut client = ClientBuilder::new(config).build();
            if client.login_with_key(&secret_key).await {
                if let Some(address) = client.address() {
                    println!("logged in as {}", address);
                }
            } else {
                anyhow::bail!("the secret key provided is not valid");
            }
        }
        Command::Logout => {
            let mut client = ClientBuilder::new(config).build();
            client.restore().await;
            client.logout();
            println!("logged out");
        }
        Command::Whoami => {
            let mut client = ClientBuilder::new(config).build();
            client.restore().await;
            match client.address() {
                Some(address) => println!("{} ({})", address, address.truncated()),
                None => println!("logged out"),
            }
        }
        Command::Energy => {
            let mut client = ClientBuilder::new(config).build();
            client.restore().await;
            match client.energy() {
                Some(balance) => println!("energy: {}", balance),
                None => println!("no active session"),
            }
        }
        Command::Chats => {
            let gateway_url = config.ipfs_gateway.clone();
            let client = ClientBuilder::new(config).build();
            let chats = client.list_chats().await?;
            for chat in chats {
                let when = chat
                    .latest_message_at
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>8}  {:<32}  last message: {}", chat.chat_id, chat.title, when);
                if let Some(url) = chat
                    .image_cid
                    .as_deref()
                    .and_then(|cid| ipfs::content_url(&gateway_url, cid))
                {
                    println!("          image: {}", url);
                }
            }
        }
        Command::Send {
            chat_id,
            message,
            reply_to,
            captcha_token,
        } => {
            let mut builder = ClientBuilder::new(config);
            if let Some(token) = captcha_token {
                builder = builder.captcha_token(token);
            }
            let mut client = builder.build();
            client.restore().await;

            let mut draft = OutgoingMessage::new(chat_id, message);
            if let Some(reply_to) = reply_to {
                draft = draft.replying_to(reply_to);
            }

            let receipt = client.send(&draft).await?;
            if receipt.account_created {
                println!("generated a fresh account for this message");
                println!("run `ember whoami` to see its address");
            }
            println!("sent via {} path", receipt.path);
        }
    }

    Ok(())
}
