//! proxy-deployer
//!
//! Connects a local account to an EVM chain, deploys a proxy through a
//! factory and installs a module.
//!
//! ```text
//!   config.toml ──▶ DeployerConfig
//!   DEPLOYER_PRIVATE_KEY ──▶ Wallet ──┐
//!   RPC endpoint ──▶ BlockchainClient ┴─▶ SessionProvider ──▶ Session
//!                                                              │
//!                    RpcGateway ◀── DeploymentWorkflow ◀───────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use proxy_deployer::blockchain::{BlockchainClient, RpcGateway};
use proxy_deployer::config::{load_or_default, DeployerConfig};
use proxy_deployer::observability::{logging, metrics};
use proxy_deployer::workflow::{DeploymentWorkflow, WorkflowOutcome, WorkflowSettings};
use proxy_deployer::SessionProvider;

#[derive(Parser)]
#[command(name = "proxy-deployer")]
#[command(about = "Deploy a proxy through a factory and install a module on it", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate core deployment and module installation
    Simulate {
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the connected account and chain
    Session,
    /// Print the deployment salt
    Salt,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level);
    logging::init_logging(level);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.command {
        Commands::Salt => {
            let settings = WorkflowSettings::from_config(&config)?;
            println!("{}", settings.salt());
        }
        Commands::Session => {
            let provider = session_provider(&config)?;
            let session = provider.connect().await?;
            println!("{} ({})", provider.app().name, provider.app().url);
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        Commands::Simulate { json } => {
            let provider = session_provider(&config)?;
            let session = provider.connect().await?;

            let gateway = RpcGateway::new(
                provider.client().clone(),
                provider.wallet(),
                &config.workflow,
            )?;
            let workflow = DeploymentWorkflow::new(
                gateway,
                WorkflowSettings::from_config(&config)?,
                config.workflow.guard_reentrancy,
            );

            match workflow.run(&session).await? {
                Some(outcome) if json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Some(outcome) => print_outcome(&outcome),
                None => eprintln!("No active account or chain; nothing submitted"),
            }
        }
    }

    Ok(())
}

fn session_provider(
    config: &DeployerConfig,
) -> Result<SessionProvider, Box<dyn std::error::Error>> {
    let client = BlockchainClient::new(config.blockchain.clone())?;
    Ok(SessionProvider::from_env(config.app.clone(), client)?)
}

fn print_outcome(outcome: &WorkflowOutcome) {
    println!("run:            {}", outcome.run_id);
    println!("account:        {}", outcome.account);
    println!("chain:          {}", outcome.chain);
    println!("salt:           {}", outcome.salt);
    println!("deploy tx:      {}", outcome.deploy_tx);
    match outcome.proxy {
        Some(proxy) => println!("proxy:          {}", proxy),
        None => println!("proxy:          <no ProxyDeployed event>"),
    }
    println!("install target: {}", outcome.install_target);
    println!("install tx:     {}", outcome.install_tx);
}
