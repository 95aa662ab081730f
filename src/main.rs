use domainextractor::app::App;
use domainextractor::cli::Cli;
use domainextractor::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::from_args();
    init_logging(cli.verbose);

    let code = match App::run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            if cli.error_enabled() {
                eprintln!("Error: {e:#}");
            }
            1
        }
    };
    std::process::exit(code);
}
