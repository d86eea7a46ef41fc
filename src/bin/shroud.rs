//! Shroud CLI - recursive file encryption
//!
//! Command-line interface for encrypting and decrypting the files of a
//! directory tree using NaCl secretbox (XSalsa20Poly1305) under a
//! pre-shared password.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use shroud::{Key, load_config, load_key_text, shroud_path, unshroud_path};

#[derive(Parser)]
#[command(name = "shroud")]
#[command(version)]
#[command(about = "Recursive, pattern-selected file encryption.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new password and print it to stdout
    GeneratePassword,

    /// Encrypt files matching the configured patterns under a path
    #[command(alias = "s")]
    Shroud {
        /// Root of the directory tree to shroud
        path: PathBuf,

        /// Path to the password file
        #[arg(short, long, value_name = "FILE", default_value = ".shroud_pass")]
        password_file: PathBuf,

        /// Path to the pattern configuration file
        #[arg(short, long, value_name = "FILE", default_value = "shroud.toml")]
        config_file: PathBuf,
    },

    /// Decrypt all .shroud files under a path
    #[command(alias = "u")]
    Unshroud {
        /// Root of the directory tree to unshroud
        path: PathBuf,

        /// Path to the password file
        #[arg(short, long, value_name = "FILE", default_value = ".shroud_pass")]
        password_file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::GeneratePassword => run_generate_password(),
        Commands::Shroud {
            path,
            password_file,
            config_file,
        } => run_shroud(&path, &password_file, &config_file),
        Commands::Unshroud {
            path,
            password_file,
        } => run_unshroud(&path, &password_file),
    };

    if let Err(e) = result {
        report(&e);
        process::exit(1);
    }
}

fn run_generate_password() -> shroud::Result<()> {
    let key_text = Key::generate()?.to_text();
    println!("{}", key_text.as_str());
    Ok(())
}

fn run_shroud(path: &Path, password_file: &Path, config_file: &Path) -> shroud::Result<()> {
    let key = load_key(password_file)?;
    let patterns = load_config(config_file)?;
    let count = shroud_path(path, &key, &patterns)?;
    println!("Shrouded {} file(s) in {}", count, path.display());
    Ok(())
}

fn run_unshroud(path: &Path, password_file: &Path) -> shroud::Result<()> {
    let key = load_key(password_file)?;
    let count = unshroud_path(path, &key)?;
    println!("Unshrouded {} file(s) in {}", count, path.display());
    Ok(())
}

fn load_key(password_file: &Path) -> shroud::Result<Key> {
    Key::from_text(&load_key_text(password_file)?).map_err(|e| {
        e.with_context(format!("invalid password in {}", password_file.display()))
    })
}

fn report(err: &shroud::ShroudError) {
    eprintln!("Error: {}", err);
    let mut cause = std::error::Error::source(err);
    while let Some(source) = cause {
        eprintln!("  caused by: {}", source);
        cause = source.source();
    }
}
