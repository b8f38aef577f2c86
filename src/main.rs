#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = linguaprep::run().await {
        eprintln!("linguaprep fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
