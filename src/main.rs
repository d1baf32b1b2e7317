use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::Path;

use fulfillment_console::config::FulfillmentConfig;
use fulfillment_console::oms::OmsClient;
use fulfillment_console::render::render_session;
use fulfillment_console::telemetry::{
    create_fulfillment_span, generate_correlation_id, init_telemetry, shutdown_telemetry,
};
use fulfillment_console::workflow::{
    FulfillmentController, FulfillmentError, FulfillmentPhase,
};

#[derive(Parser)]
#[command(name = "fulfillment-console")]
#[command(about = "Warehouse console for the outward order fulfillment workflow")]
#[command(
    long_about = "Drives the order-management service through the fulfillment workflow: \
                  search inventory, create an outward order, pack the shipment and hand it \
                  over for dispatch. Start with 'fulfillment-console run' for an interactive \
                  session."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the search, create, pack-and-dispatch workflow interactively
    Run,
    /// Run the full workflow non-interactively from arguments
    Fulfill {
        /// SKU:quantity mapping, e.g. "SKU1:5, SKU2:3"
        #[arg(long)]
        map: String,
        /// Order code to create the outward order under
        #[arg(long = "order-code")]
        order_code: String,
    },
    /// Look up available inventory for a comma-separated SKU list
    Search {
        /// SKU codes, e.g. "SKU1, SKU2"
        #[arg(long)]
        skus: String,
    },
    /// Write a fulfillment-console.toml configuration scaffold
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, help = "Overwrite fulfillment-console.toml if it already exists")]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    FulfillmentConfig::load_env_file()?;
    let config = FulfillmentConfig::load()?;
    init_telemetry(&config.observability)?;

    let result = match cli.command {
        None => {
            println!("No command given. Try 'fulfillment-console run' to start a session,");
            println!("or 'fulfillment-console --help' for the full command list.");
            Ok(())
        }
        Some(Commands::Run) => {
            tokio::runtime::Runtime::new()?.block_on(async { run_command(config).await })
        }
        Some(Commands::Fulfill { map, order_code }) => tokio::runtime::Runtime::new()?
            .block_on(async { fulfill_command(config, &map, &order_code).await }),
        Some(Commands::Search { skus }) => {
            tokio::runtime::Runtime::new()?.block_on(async { search_command(config, &skus).await })
        }
        Some(Commands::Init { force }) => init_command(force),
    };

    shutdown_telemetry();
    result
}

/// Interactive session: one controller, prompts per phase, snapshot redrawn
/// after every action. 'reset' restarts the workflow, 'quit' leaves.
async fn run_command(config: FulfillmentConfig) -> Result<()> {
    let correlation_id = generate_correlation_id();
    let span = create_fulfillment_span("run", None, &correlation_id);
    let _guard = span.enter();

    let client = OmsClient::new(config.oms.clone())?;
    let mut controller = FulfillmentController::new(client, &config.workflow);

    loop {
        println!();
        print!("{}", render_session(controller.session()));

        match controller.session().phase() {
            FulfillmentPhase::Search => {
                let Some(input) = prompt("SKUs to search (comma separated): ")? else {
                    break;
                };
                match handle_meta(&input, &mut controller) {
                    MetaCommand::Quit => break,
                    MetaCommand::Reset => continue,
                    MetaCommand::None => {}
                }
                if let Err(error) = controller.search_inventory(&input).await {
                    println!("Search failed: {error}");
                }
            }
            FulfillmentPhase::OrderCreation => {
                let Some(map) = prompt("SKU:quantity map (e.g. SKU1:5, SKU2:3): ")? else {
                    break;
                };
                match handle_meta(&map, &mut controller) {
                    MetaCommand::Quit => break,
                    MetaCommand::Reset => continue,
                    MetaCommand::None => {}
                }
                let Some(order_code) = prompt("Order code: ")? else {
                    break;
                };
                if let Err(error) = controller.create_order(&map, &order_code).await {
                    println!("Order creation failed: {error}");
                }
            }
            FulfillmentPhase::PackAndDispatch => {
                let Some(input) = prompt("Press Enter to pack and dispatch: ")? else {
                    break;
                };
                match handle_meta(&input, &mut controller) {
                    MetaCommand::Quit => break,
                    MetaCommand::Reset => continue,
                    MetaCommand::None => {}
                }
                match controller.pack_and_dispatch().await {
                    Ok(_) => {}
                    Err(error @ FulfillmentError::Handover(_)) => {
                        println!("Dispatch failed: {error}");
                        println!("Pack artifacts are kept; retrying will re-pack the order.");
                    }
                    Err(error) => println!("Packing failed: {error}"),
                }
            }
            FulfillmentPhase::Dispatched => {
                let Some(answer) = prompt("Start a new order? [y/N]: ")? else {
                    break;
                };
                if answer.eq_ignore_ascii_case("y") {
                    controller.reset();
                } else {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Non-interactive end-to-end run: search the mapped SKUs, create the
/// order, then pack and dispatch it.
async fn fulfill_command(
    config: FulfillmentConfig,
    map: &str,
    order_code: &str,
) -> Result<()> {
    let correlation_id = generate_correlation_id();
    let span = create_fulfillment_span("fulfill", Some(order_code), &correlation_id);
    let _guard = span.enter();

    let client = OmsClient::new(config.oms.clone())?;
    let mut controller = FulfillmentController::new(client, &config.workflow);

    let records = controller.search_inventory(&sku_list_from_map(map)).await?;
    for record in &records {
        println!(
            "{}: available quantity {}",
            record.channel_sku_code, record.qc_pass_available_quantity
        );
    }

    controller.create_order(map, order_code).await?;
    println!("Order {order_code} created");

    match controller.pack_and_dispatch().await {
        Ok(artifacts) => {
            if let Some(url) = &artifacts.shipping_label_url {
                println!("shipping label: {url}");
            }
            if let Some(url) = &artifacts.invoice_url {
                println!("invoice: {url}");
            }
            println!("Order {order_code} dispatched");
            Ok(())
        }
        Err(error @ FulfillmentError::Handover(_)) => {
            if let Some(artifacts) = controller.session().artifacts() {
                if let Some(url) = &artifacts.shipping_label_url {
                    println!("shipping label: {url}");
                }
                if let Some(url) = &artifacts.invoice_url {
                    println!("invoice: {url}");
                }
            }
            Err(error.into())
        }
        Err(error) => Err(error.into()),
    }
}

async fn search_command(config: FulfillmentConfig, skus: &str) -> Result<()> {
    let client = OmsClient::new(config.oms.clone())?;
    let mut controller = FulfillmentController::new(client, &config.workflow);

    let records = controller.search_inventory(skus).await?;
    for record in records {
        println!(
            "{}: available quantity {}",
            record.channel_sku_code, record.qc_pass_available_quantity
        );
    }
    Ok(())
}

fn init_command(force: bool) -> Result<()> {
    let path = "fulfillment-console.toml";
    if Path::new(path).exists() && !force {
        anyhow::bail!("{path} already exists; pass --force to overwrite it");
    }

    // Scaffold from the defaults, never from the loaded config: credentials
    // injected through the environment must not end up on disk.
    FulfillmentConfig::default().save_to_file(path)?;
    println!("Wrote {path}");
    println!("Credentials are read from OMS_*_AUTH_USERNAME / OMS_*_AUTH_PASSWORD env vars");
    println!("(or a .env file) unless set in the configuration file.");
    Ok(())
}

enum MetaCommand {
    None,
    Reset,
    Quit,
}

fn handle_meta<C>(input: &str, controller: &mut FulfillmentController<C>) -> MetaCommand
where
    C: fulfillment_console::oms::OmsApi,
{
    match input.trim().to_ascii_lowercase().as_str() {
        "quit" | "exit" => MetaCommand::Quit,
        "reset" => {
            controller.reset();
            println!("Session reset.");
            MetaCommand::Reset
        }
        _ => MetaCommand::None,
    }
}

/// Prompt on stdout and read one trimmed line; None on end of input.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    let bytes = std::io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Derive the comma-separated SKU list for the search step from the
/// SKU:quantity mapping argument.
fn sku_list_from_map(map: &str) -> String {
    map.split(',')
        .filter_map(|entry| entry.split_once(':').map(|(code, _)| code.trim()))
        .filter(|code| !code.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
