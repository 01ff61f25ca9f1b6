use crate::demo::{run_demo, run_refund_quote, DemoArgs, RefundQuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ev_rental::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EV Rental Orchestrator",
    about = "Run the EV rental booking and cancellation service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Refund policy utilities
    Refund {
        #[command(subcommand)]
        command: RefundCommand,
    },
    /// Run an end-to-end CLI demo covering booking and cancellation workflows
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RefundCommand {
    /// Quote the refund owed for a rental start and payment amount
    Quote(RefundQuoteArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Refund {
            command: RefundCommand::Quote(args),
        } => run_refund_quote(args),
        Command::Demo(args) => run_demo(args),
    }
}
