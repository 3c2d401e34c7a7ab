use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rental-harvest")]
#[command(about = "Harvests listing records from rental search results into a CSV dataset")]
#[command(version)]
pub struct Args {
    /// City or area to search for
    #[arg(default_value = "Barcelona")]
    pub destination: String,

    /// Maximum number of results pages to walk
    #[arg(short, long, default_value_t = rental_harvest::DEFAULT_PAGES, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Full search URL to start from instead of the destination
    #[arg(long)]
    pub url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dataset directory (CSV and images)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Append-only log file
    #[arg(long, default_value = "scraping.log")]
    pub log_file: PathBuf,

    /// Drop repeated listing ids before writing
    #[arg(long)]
    pub dedup: bool,
}
