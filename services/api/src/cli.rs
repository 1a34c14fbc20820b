use crate::demo::{run_catalog_listing, run_demo, CatalogArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use kyc_checklist::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "KYC Checklist Service",
    about = "Demonstrate and run the field-investigation document checklist from the command line",
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
    /// Inspect the required-document catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Run an end-to-end CLI demo covering one checklist session
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Print the document categories for one user type
    Show(CatalogArgs),
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
        Command::Catalog {
            command: CatalogCommand::Show(args),
        } => run_catalog_listing(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
