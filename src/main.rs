use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use file_manager::{
    commands::{self, RouteOrder},
    config::Config,
    create_router,
    utils::init_logger,
    AppState,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Remove stale scratch files (*.tmp, *.bak, *.orig, *.rej, *~) recursively
    Clean {
        /// Directory to clean, defaults to the current directory
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
    /// Display the route table
    Urls {
        /// URL to resolve (ex. /storage/v1/file/image.png)
        #[arg(short, long)]
        url: Option<String>,
        /// Method used when resolving --url
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Column to order by
        #[arg(short, long, value_enum, default_value_t = RouteOrder::Rule)]
        order: RouteOrder,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Clean { root } => {
            let root = match root {
                Some(root) => root,
                None => std::env::current_dir()?,
            };
            for path in commands::clean(&root, &[config.storage.files_dir.clone()])? {
                println!("Removing {}", path.display());
            }
            Ok(())
        }
        Command::Urls { url, method, order } => {
            let table = match url {
                Some(url) => commands::render_match(&url, &method),
                None => commands::render_routes(order),
            };
            println!("{table}");
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    // Initialize tracing
    let _log_guard = init_logger(config.server.log_dir.as_deref());

    info!("Execution mode: '{}'", config.server.mode);
    info!("Authentication: {}", config.auth.api_key.is_some());
    info!("Lock Incoming: {}", config.auth.auth_incoming);
    info!("Lock Outgoing: {}", config.auth.auth_outgoing);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    // Create shared state
    let state = AppState::new(config);
    state.store.ensure_root().await?;

    // Create router
    let app = create_router(state)?;

    // Start server
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
