// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use pokemon_priority::config::{ClientCommand, ClientConfig};
use pokemon_priority::validation::Validator;
use pokemon_priority::{
    fetch_catalog, load_catalog_file, Catalog, CredentialStore, HttpInstanceApi, InstanceApi,
};
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = ClientConfig::parse();
    match &config.command {
        None | Some(ClientCommand::Ui) => {
            init_file_logging()?;
            run_ui_mode(&config)?;
        }
        Some(ClientCommand::Validate { file }) => {
            init_stderr_logging();
            run_validate(&config, file)?;
        }
        Some(ClientCommand::Fix { file, in_place }) => {
            init_stderr_logging();
            run_fix(&config, file, *in_place)?;
        }
        Some(ClientCommand::Instances) => {
            init_stderr_logging();
            run_instances(&config)?;
        }
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The terminal belongs to the UI, so logs go to a file
fn init_file_logging() -> Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pokeprio");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let path = dir.join("pokeprio.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init();

    Ok(())
}

fn load_catalog(config: &ClientConfig) -> Result<Catalog> {
    let catalog = match &config.catalog.catalog_file {
        Some(path) => load_catalog_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => fetch_catalog(&config.catalog.catalog_url)
            .with_context(|| format!("Failed to fetch catalog from {}", config.catalog.catalog_url))?,
    };
    info!(entries = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn read_order_file(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn run_validate(config: &ClientConfig, file: &Path) -> Result<()> {
    println!("🔍 Validating priority order");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let catalog = load_catalog(config)?;
    println!("✓ Catalog: {} pokemon", catalog.len());

    let text = read_order_file(file)?;
    let report = Validator::new(&catalog).validate(&text);

    if report.is_valid() {
        println!("✅ {} is a complete priority order", file.display());
        return Ok(());
    }

    println!("⚠️  {}", report.summary());
    for line in report.banner_lines() {
        println!("   {}", line);
    }
    println!("\n   Run: pokeprio fix {} --in-place", file.display());
    std::process::exit(1);
}

fn run_fix(config: &ClientConfig, file: &Path, in_place: bool) -> Result<()> {
    let catalog = load_catalog(config)?;
    let text = read_order_file(file)?;
    let fixed = Validator::new(&catalog).fix(&text).join("\n");

    if in_place {
        fs::write(file, format!("{}\n", fixed))
            .with_context(|| format!("Failed to write {}", file.display()))?;
        println!("🔧 Fixed {} ({} entries)", file.display(), catalog.len());
    } else {
        println!("{}", fixed);
    }

    Ok(())
}

fn run_instances(config: &ClientConfig) -> Result<()> {
    let credential = CredentialStore::open(config.credential_path());
    let Some(password) = credential.password() else {
        eprintln!("❌ Not logged in!");
        eprintln!("   Log in from the editor first: pokeprio ui");
        std::process::exit(1);
    };

    let api = HttpInstanceApi::new(&config.server_url);
    let instances = api
        .list_instances(password)
        .with_context(|| format!("Failed to list instances from {}", api.base_url()))?;

    println!("📦 Saved instances ({})", instances.len());
    for instance in instances {
        println!("   {:>4}  {}", instance.id, instance.name);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &ClientConfig) -> Result<()> {
    use pokemon_priority::Session;

    println!("🖥️  Loading Pokemon Priority editor...\n");

    println!("📊 Loading catalog...");
    let catalog = load_catalog(config)?;
    println!("✓ Loaded {} pokemon\n", catalog.len());

    let credential = CredentialStore::open(config.credential_path());
    let session = Session::new(catalog, credential);
    let api = HttpInstanceApi::new(&config.server_url);

    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(session, Box::new(api));
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &ClientConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: pokeprio validate <file> / pokeprio fix <file>");
    std::process::exit(1);
}
