use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = rigdesk_api::Args::parse();

	rigdesk_api::run(args).await
}
