//! `ovpnadmin` operator CLI.
//!
//! Small companion to the web UI for jobs that happen at a shell prompt:
//! producing the `ADMIN_PASSWORD_HASH` value, and listing, revoking, or
//! exporting client certificates without going through HTTP. Shares the
//! `OVPNADMIN_*` / `EASYRSA_PASSWORD` environment configuration with the
//! server.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};

use ovpnadmin_core::{CommandRunner, DockerRunner, EasyRsa};

#[derive(Parser)]
#[command(name = "ovpnadmin", version, about = "Manage OpenVPN client certificates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the hex SHA-256 of the admin password for ADMIN_PASSWORD_HASH.
    HashPassword {
        /// Password to hash; prompted for (twice) when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// List all client certificates.
    List,
    /// Revoke a client certificate and regenerate the CRL.
    Revoke {
        /// Client name.
        name: String,
    },
    /// Write a client's .ovpn profile to a file or stdout.
    Export {
        /// Client name.
        name: String,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Build the docker-backed driver from the shared environment variables.
fn easyrsa_from_env() -> EasyRsa {
    let runner = Arc::new(DockerRunner {
        vpn_data: std::env::var("OVPNADMIN_VPN_DATA")
            .unwrap_or_else(|_| "/opt/vpn-data".to_owned()),
        image: std::env::var("OVPNADMIN_DOCKER_IMAGE").unwrap_or_else(|_| "vpn".to_owned()),
        container: std::env::var("OVPNADMIN_VPN_CONTAINER").unwrap_or_else(|_| "vpn".to_owned()),
        use_sudo: std::env::var("OVPNADMIN_USE_SUDO")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true),
    });
    let passphrase = std::env::var("EASYRSA_PASSWORD").unwrap_or_default();
    EasyRsa::new(runner as Arc<dyn CommandRunner>, passphrase)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password } => hash_password_cmd(password),
        Commands::List => list_cmd().await,
        Commands::Revoke { name } => revoke_cmd(&name).await,
        Commands::Export { name, output } => export_cmd(&name, output).await,
    }
}

fn hash_password_cmd(password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            let first = rpassword::prompt_password("New admin password: ")
                .context("failed to read password")?;
            let second = rpassword::prompt_password("Confirm password: ")
                .context("failed to read password")?;
            if first != second {
                bail!("passwords do not match");
            }
            first
        }
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }

    println!("{}", hex::encode(Sha256::digest(password.as_bytes())));
    Ok(())
}

async fn list_cmd() -> anyhow::Result<()> {
    let certs = easyrsa_from_env()
        .list_clients()
        .await
        .context("listing failed")?;

    if certs.is_empty() {
        println!("no client certificates");
        return Ok(());
    }

    println!("{:<24} {:<12} {:<12} STATUS", "NAME", "CREATED", "EXPIRES");
    for cert in certs {
        let fmt = |d: Option<chrono::NaiveDateTime>| {
            d.map_or_else(|| "n/a".to_owned(), |d| d.format("%Y-%m-%d").to_string())
        };
        println!(
            "{:<24} {:<12} {:<12} {}",
            cert.name,
            fmt(cert.created),
            fmt(cert.expires),
            cert.status.label()
        );
    }
    Ok(())
}

async fn revoke_cmd(name: &str) -> anyhow::Result<()> {
    easyrsa_from_env()
        .revoke_client(name)
        .await
        .with_context(|| format!("revoking '{name}' failed"))?;
    println!("certificate '{name}' revoked, CRL regenerated");
    Ok(())
}

async fn export_cmd(name: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let profile = easyrsa_from_env()
        .client_config(name)
        .await
        .with_context(|| format!("exporting '{name}' failed"))?;

    match output {
        Some(path) => {
            std::fs::write(&path, profile)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => print!("{profile}"),
    }
    Ok(())
}
