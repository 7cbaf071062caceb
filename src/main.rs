use clap::Parser;
use roadworks::app;
use roadworks::utils::{logger, validation::Validate};
use roadworks::{CliConfig, SeedConfig};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting roadworks portal");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let portal = match &config.seed {
        Some(path) => {
            tracing::info!(seed = %path, "loading portal state from seed file");
            match SeedConfig::from_file(path).and_then(app::portal_from_seed) {
                Ok(portal) => portal,
                Err(e) => {
                    tracing::error!("Failed to load seed file: {}", e);
                    eprintln!("{}", e.user_friendly_message());
                    eprintln!("Suggestion: {}", e.recovery_suggestion());
                    std::process::exit(1);
                }
            }
        }
        None => {
            tracing::info!("no seed file given, using built-in demo data");
            app::demo_portal()?
        }
    };

    tracing::info!(
        users = portal.users().len(),
        requests = portal.all_requests().len(),
        resources = portal.resources().len(),
        "portal state loaded"
    );

    match app::write_reports(&portal, std::path::Path::new(&config.out)) {
        Ok(paths) => {
            let snapshot = portal.dashboard();
            tracing::info!("Reports generated successfully");
            println!(
                "{} requests tracked, completion rate {}%",
                snapshot.total_requests, snapshot.completion_rate_percent
            );
            println!("Report saved to: {}", paths.report.display());
            println!("Dashboard JSON saved to: {}", paths.dashboard.display());
            println!("Request CSV saved to: {}", paths.requests_csv.display());
        }
        Err(e) => {
            tracing::error!("Report generation failed: {}", e);
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
