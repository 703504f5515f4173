use romshelf_lib::bootstrap;

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap::tracing::init_tracing_subscriber() {
        eprintln!("Failed to initialize tracing: {err}");
    }

    let config = match bootstrap::load_config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load config: {err:#}");
            std::process::exit(1);
        }
    };

    let console_name = std::env::args().nth(1);
    if let Err(err) = bootstrap::run_app(config, console_name).await {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}
