use clap::Parser;
use schemagen::{ExtractError, GeneratorConfig, SchemaGenerator, inject_json_ld};
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(serde_json::Error),

    #[error("Missing setting: pass --{0} or set it in the config file")]
    MissingSetting(&'static str),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Prints the schema.org JSON-LD for an HTML page.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The rendered page
    input: PathBuf,

    /// URL of the page, absolute or site-relative
    #[arg(long)]
    page_url: Option<String>,

    /// Site root used to resolve relative links
    #[arg(long)]
    site_url: Option<String>,

    #[arg(long)]
    site_name: Option<String>,

    /// JSON file with generator settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the page with the payload spliced in before </body>
    #[arg(long, default_value_t = false)]
    inject: bool,

    /// Pretty-print the payload
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn load_config(args: &Args) -> Result<GeneratorConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?).map_err(CliError::Config)?,
        None => GeneratorConfig::default(),
    };
    if let Some(page_url) = &args.page_url {
        config.page_url = page_url.clone();
    }
    if let Some(site_url) = &args.site_url {
        config.site_url = site_url.clone();
    }
    if let Some(site_name) = &args.site_name {
        config.site_name = site_name.clone();
    }
    if config.page_url.is_empty() {
        return Err(CliError::MissingSetting("page-url"));
    }
    if config.site_url.is_empty() {
        return Err(CliError::MissingSetting("site-url"));
    }
    Ok(config)
}

fn main() -> Result<(), CliError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "schemagen=warn");
        }
    }
    env_logger::init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let html = fs::read_to_string(&args.input)?;

    let generator = SchemaGenerator::new(config);
    let value = generator.as_value(&html)?;
    let payload = match args.pretty {
        true => serde_json::to_string_pretty(&value)?,
        false => serde_json::to_string(&value)?,
    };

    if args.inject {
        print!("{}", inject_json_ld(&html, &payload));
    } else {
        println!("{}", payload);
    }
    Ok(())
}
