use clap::Parser;
use log::kv::{Key, Value, VisitSource};
use rental_harvest::{Harvest, HarvestConfig, SearchSession, output};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.log_file);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let session = match &args.url {
        Some(url) => SearchSession::from_url(url),
        None => SearchSession::for_destination(&config.base_url, &args.destination),
    };
    let session = match session {
        Ok(session) => session,
        Err(e) => {
            ::log::error!("Invalid search: {}", e);
            eprintln!("Invalid search: {e}");
            std::process::exit(2);
        }
    };

    ::log::info!("Starting harvest for {}", session.destination());
    println!("Note: harvesting requires a WebDriver server (e.g., ChromeDriver).");
    println!("Set WEBDRIVER_URL if not using {}", config.webdriver_url);

    let output_dir = config.output_dir.clone();
    let report = match Harvest::new(session.clone())
        .with_config(config)
        .with_pages(args.pages)
        .run()
        .await
    {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Error in main execution: {}", e);
            eprintln!("Harvest failed: {e}");
            std::process::exit(1);
        }
    };

    let dataset = if args.dedup {
        report.dataset.deduplicated()
    } else {
        report.dataset
    };

    let path = output_dir.join(output::DATASET_FILE);
    if let Err(e) = output::write_csv(&dataset, &path) {
        ::log::error!("Failed to write {}: {}", path.display(), e);
        eprintln!("Failed to write {}: {e}", path.display());
        std::process::exit(1);
    }

    ::log::info!(records = dataset.len(); "Extraction complete. {} listings saved", dataset.len());
    println!(
        "Harvested {} listings for {} and saved them to '{}'",
        dataset.len(),
        session.destination(),
        path.display()
    );
}

/// File config, then environment, then command-line flags
fn load_config(args: &Args) -> rental_harvest::Result<HarvestConfig> {
    let mut config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    }
    .with_env_overrides();

    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(url) = &args.webdriver_url {
        config.webdriver_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Appends `key=value` pairs of a log record
struct Fields(String);

impl<'kvs> VisitSource<'kvs> for Fields {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), log::kv::Error> {
        let _ = write!(self.0, " {key}={value}");
        Ok(())
    }
}

/// Sends log lines to the append-only log file, or stderr if it cannot be opened
fn init_logging(log_file: &Path) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        let mut fields = Fields(String::new());
        let _ = record.key_values().visit(&mut fields);
        let ts = buf.timestamp();
        writeln!(
            buf,
            "{} - {} - {}{}",
            ts,
            record.level(),
            record.args(),
            fields.0
        )
    });

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Cannot open log file {}: {e}", log_file.display()),
    }
    builder.init();
}
