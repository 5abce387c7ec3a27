use clap::Parser;
use speedometer::cli::{Cli, Commands};
use speedometer::config::{Config, ConfigError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing file falls back to the bundled example; an invalid one is fatal
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Io(e)) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::from_toml(include_str!("../config.toml.example"))?
        }
        Err(e) => return Err(e.into()),
    };

    // Initialize telemetry
    let _telemetry = speedometer::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Replay(args) => {
            args.execute(&config).await?;
        }
        Commands::Check => {
            println!("Configuration OK: {}", cli.config);
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Speedometer: period={}, min_threshold={}, history_limit={}",
                config.speedometer.period,
                config.speedometer.min_threshold,
                config.speedometer.history_limit
            );
            println!(
                "  Alerts: enabled={}, cooldown={} bars, destination={:?}",
                config.speedometer.alerts_enabled,
                config.speedometer.alert_cooldown_bars,
                config.speedometer.alert_destination
            );
            println!(
                "  Feed: series={}, capacity={}",
                config.feed.series, config.feed.channel_capacity
            );
            println!(
                "  Telemetry: level={}, format={:?}, metrics_port={:?}",
                config.telemetry.log_level,
                config.telemetry.log_format,
                config.telemetry.metrics_port
            );
        }
    }

    Ok(())
}
