use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use hybrid_crypt::{settings::DEFAULT_SETTINGS_FILE, Mode, Settings};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Hybrid file encryption: AES-128-CBC data, RSA-OAEP wrapped key
#[derive(Parser)]
#[command(name = "hybrid-crypt")]
#[command(about = "Hybrid file encryption with an RSA-wrapped AES key")]
#[command(version)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["generation", "encryption", "decryption"]),
))]
struct Cli {
    /// Generate the RSA key pair and the wrapped symmetric key
    #[arg(short = 'g', long)]
    generation: bool,
    /// Encrypt the initial file
    #[arg(short = 'e', long)]
    encryption: bool,
    /// Decrypt the encrypted file
    #[arg(short = 'd', long)]
    decryption: bool,
    /// Settings file with the key and data file paths
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.generation {
            Mode::Generate
        } else if self.encryption {
            Mode::Encrypt
        } else {
            Mode::Decrypt
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "hybrid_crypt=debug"
    } else {
        "hybrid_crypt=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = execute(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let settings = Settings::load(&cli.settings)
        .with_context(|| format!("Failed to load settings from {}", cli.settings.display()))?;

    let mode = cli.mode();
    hybrid_crypt::run(mode, &settings).with_context(|| format!("{} failed", mode))?;

    Ok(())
}
