#[path = "bloggen-cli/app/mod.rs"]
mod app;
#[path = "bloggen-cli/args.rs"]
mod args;
#[path = "bloggen-cli/config/mod.rs"]
mod config;
#[path = "bloggen-cli/logging.rs"]
mod logging;
#[path = "bloggen-cli/term/mod.rs"]
mod term;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
