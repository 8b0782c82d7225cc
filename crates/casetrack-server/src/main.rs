use casetrack_server::{AppConfig, ServerBuilder, observability};

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let cfg = AppConfig::from_env();
    if let Err(e) = cfg.validate() {
        eprintln!("Configuration error: {e}");
        std::process::exit(2);
    }

    tracing::info!(
        addr = %cfg.addr(),
        development = cfg.development,
        "Configuration loaded"
    );

    let server = match ServerBuilder::new().with_config(cfg).build() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Server initialization failed: {e}");
            std::process::exit(2);
        }
    };

    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
    }
}
