#[tokio::main]
async fn main() {
    if let Err(e) = web3_utils::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
