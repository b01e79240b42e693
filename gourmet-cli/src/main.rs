//! gourmet: terminal front end for the Gourmet ordering platform
//!
//! Drives the same flows as the web app: guest ordering and payment, the
//! kitchen and staff boards, and the owner / admin back office. State that
//! the browser would keep in local storage lives in a JSON file instead.

mod commands;
mod logging;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gourmet_client::{ClientConfig, FileStore, GourmetClient, SharedStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "gourmet", version, about = "Gourmet restaurant ordering client")]
struct Cli {
    /// Core API base URL
    #[arg(long, env = "GOURMET_API_URL", global = true)]
    api_url: Option<String>,

    /// AI assistant base URL
    #[arg(long, env = "GOURMET_AI_URL", global = true)]
    ai_url: Option<String>,

    /// File holding the token, cart and table between runs
    #[arg(long, env = "GOURMET_STATE", default_value = ".gourmet/state.json", global = true)]
    state: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "GOURMET_LOG", global = true)]
    log: Option<String>,

    /// Also write daily log files here
    #[arg(long, env = "GOURMET_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and keep the token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GOURMET_PASSWORD")]
        password: String,
    },
    /// Sign out and forget the token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Branches open to guests
    Branches,
    /// Pick the table the guest is sitting at
    Table {
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        number: Option<String>,
    },
    /// Guest menu of a branch (defaults to the current table's branch)
    Menu {
        #[arg(long)]
        branch: Option<String>,
        /// Only items whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Edit the cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Send the cart to the kitchen
    Order,
    /// Follow an order until it is done (defaults to the last order)
    Track {
        order_id: Option<String>,
    },
    /// Kitchen or staff board of a branch
    Board(BoardArgs),
    /// Move orders along the kitchen / serving flow
    #[command(subcommand)]
    Status(StatusCommand),
    /// Pay the current bill
    Pay(PayArgs),
    /// Staff payment queues
    #[command(subcommand)]
    Payments(PaymentsCommand),
    /// Owner back office
    #[command(subcommand)]
    Owner(OwnerCommand),
    /// Platform administration
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Ask the branch assistant
    Chat {
        #[arg(long)]
        branch: String,
        /// Forget the conversation instead of sending
        #[arg(long)]
        clear: bool,
        message: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum CartCommand {
    /// List the cart
    Show,
    /// Add one unit of a menu item
    Add {
        #[arg(long)]
        branch: Option<String>,
        menu_item_id: String,
    },
    /// Set the quantity of a row (0 removes it)
    Qty { index: usize, quantity: i64 },
    /// Attach a note to a row
    Note { index: usize, note: String },
    /// Remove a row
    Remove { index: usize },
    /// Empty the cart
    Clear,
}

#[derive(Args, Debug)]
struct BoardArgs {
    #[arg(value_enum)]
    kind: BoardKind,
    #[arg(long)]
    branch: String,
    /// Only sessions matching this text (staff board)
    #[arg(long)]
    search: Option<String>,
    /// Longest wait first (staff board)
    #[arg(long)]
    longest_first: bool,
    /// Keep refreshing until interrupted
    #[arg(long)]
    watch: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BoardKind {
    Kitchen,
    Staff,
}

#[derive(Subcommand, Debug)]
enum StatusCommand {
    /// Kitchen starts an order
    Cook { branch: String, order_id: String },
    /// Kitchen marks an order ready
    Ready { branch: String, order_id: String },
    /// Staff start serving every ready order of a session
    Serve { branch: String, session_id: String },
    /// Staff finish serving a session
    Done { branch: String, session_id: String },
}

#[derive(Args, Debug)]
struct PayArgs {
    #[arg(value_enum)]
    method: PayMethod,
    /// Session to pay (defaults to the current one)
    #[arg(long)]
    session: Option<String>,
    /// Wait until staff settle the bill
    #[arg(long)]
    wait: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PayMethod {
    Qr,
    Cash,
}

#[derive(Subcommand, Debug)]
enum PaymentsCommand {
    /// Cash requests and reported transfers
    List { branch: String },
    /// Confirm a cash payment
    ConfirmCash { branch: String, bill_id: String },
    /// Verify a bank transfer
    VerifyQr { branch: String, bill_id: String },
}

#[derive(Subcommand, Debug)]
enum OwnerCommand {
    /// Today's figures
    Stats,
    /// Branches of the restaurant
    Branches {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Tables of a branch
    Tables {
        branch: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Menu items of a branch
    Items {
        branch: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Platform counters
    Dashboard,
    /// User accounts
    Users {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Lock or unlock this user after listing
        #[arg(long)]
        toggle: Option<String>,
    },
    /// Restaurants
    Restaurants {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Revenue per restaurant
    Revenue {
        #[arg(long, value_enum, default_value_t = Period::Today)]
        period: Period,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Period {
    Today,
    Month,
    All,
}

fn build_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    if let Some(url) = &cli.ai_url {
        config.ai_base_url = url.clone();
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap sees its values
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let _guard = logging::init(cli.log.as_deref(), cli.log_dir.as_deref())?;

    let store: SharedStore = Arc::new(
        FileStore::open(&cli.state)
            .with_context(|| format!("cannot open state file {}", cli.state.display()))?,
    );
    let config = build_config(&cli);
    tracing::debug!(api = %config.base_url, ai = %config.ai_base_url, "Client configured");
    let client = Arc::new(GourmetClient::new(config, store)?);

    commands::run(client, cli.command).await
}
