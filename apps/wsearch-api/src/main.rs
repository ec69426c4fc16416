use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = wsearch_api::Args::parse();

	wsearch_api::run(args).await
}
