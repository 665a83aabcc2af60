//! Status command implementation.

use clap::Args;

use crate::cli::ConnectionArgs;
use crate::client::OutlineClient;
use crate::Result;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Export job (file operation) id
    pub job_id: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = args.connection.resolve()?;
    config.validate()?;

    let client = OutlineClient::new(&config.base_url(), &config.token)?;
    let status = client.check_export_status(&args.job_id).await?;

    println!("{}: {}", args.job_id, status.data.state);
    Ok(())
}
