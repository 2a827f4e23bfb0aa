//! `dm`: command-line client for the deepmirror prediction API.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use deepmirror::auth::{jwt, EMAIL_ENV, PASSWORD_ENV};
use deepmirror::{
    Chain, Credentials, DeepMirrorClient, StructureModel, StructurePredictionRequest,
    TrainRequest,
};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dm", version, about = "deepmirror prediction API client")]
struct Cli {
    /// API host, overrides DEEPMIRROR_HOST and the config file
    #[arg(long, global = true)]
    host: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and cache the session token
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prefer DM_CLIENT_PASSWORD or the prompt; flags end up in shell history
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove the cached session token
    Logout,
    /// Show where the token is cached and when it expires
    Status,
    /// Inspect available models
    #[command(subcommand)]
    Models(ModelsCommand),
    /// Predict a property for one or more SMILES
    Predict {
        model: String,
        #[arg(required = true)]
        smiles: Vec<String>,
    },
    /// Train a custom model
    Train {
        model_name: String,
        /// Comma-separated or repeated SMILES
        #[arg(long, required = true, value_delimiter = ',')]
        smiles: Vec<String>,
        /// One label per SMILES, same order
        #[arg(long, required = true, value_delimiter = ',', allow_negative_numbers = true)]
        labels: Vec<f64>,
        /// Labels are 0/1 classes instead of continuous values
        #[arg(long)]
        classification: bool,
    },
    /// Human liver microsome stability predictions
    #[command(subcommand)]
    Hlm(HlmCommand),
    /// Co-folding structure prediction
    #[command(subcommand)]
    Structure(StructureCommand),
}

#[derive(Subcommand)]
enum ModelsCommand {
    List,
    Metadata { model_id: String },
    Info { model_id: String },
}

#[derive(Subcommand)]
enum HlmCommand {
    Submit {
        #[arg(required = true)]
        smiles: Vec<String>,
    },
    Get {
        task_id: String,
        /// Poll until the task finishes
        #[arg(long)]
        wait: bool,
        #[arg(long, default_value_t = 10)]
        poll_secs: u64,
        #[arg(long, default_value_t = 900)]
        timeout_secs: u64,
    },
}

#[derive(Subcommand)]
enum StructureCommand {
    /// Submit a complex; chains are sent as proteins, DNA, RNA, then ligands
    Predict {
        #[arg(long, default_value = "chai1")]
        model: StructureModel,
        #[arg(long)]
        protein: Vec<String>,
        #[arg(long)]
        dna: Vec<String>,
        #[arg(long)]
        rna: Vec<String>,
        /// Ligand SMILES
        #[arg(long)]
        ligand: Vec<String>,
        /// Build MSAs on the server
        #[arg(long)]
        msa: bool,
        #[arg(long)]
        name: Option<String>,
    },
    List,
    Download {
        task_id: String,
        /// Defaults to <task-id>.zip
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut builder = DeepMirrorClient::builder();
    if let Some(host) = cli.host {
        builder = builder.host(host);
    }
    let client = builder.build().context("failed to configure client")?;

    match cli.command {
        Commands::Login { email, password } => {
            let email = match email.or_else(|| std::env::var(EMAIL_ENV).ok()) {
                Some(email) => email,
                None => prompt("Email: ")?,
            };
            let password = match password.or_else(|| std::env::var(PASSWORD_ENV).ok()) {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            client.login(&Credentials::new(email, password)).await?;
            println!(
                "Logged in. Token saved to {}",
                client.token_store().describe()
            );
        }
        Commands::Logout => {
            client.logout().await?;
            println!("Logged out.");
        }
        Commands::Status => {
            let current = client.current_token().await?;
            let token = current.as_ref().map(|(token, _)| token.as_str());
            let expires_at = token
                .and_then(jwt::expires_at)
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs());
            print_json(&serde_json::json!({
                "host": client.settings().host,
                "token_store": client.token_store().describe(),
                "logged_in": current.is_some(),
                "token_source": current.as_ref().map(|(_, source)| source),
                "expired": token.map(jwt::is_expired),
                "expires_at": expires_at,
            }))?;
        }
        Commands::Models(cmd) => match cmd {
            ModelsCommand::List => print_json(&client.list_models().await?)?,
            ModelsCommand::Metadata { model_id } => {
                print_json(&client.model_metadata(&model_id).await?)?
            }
            ModelsCommand::Info { model_id } => print_json(&client.model_info(&model_id).await?)?,
        },
        Commands::Predict { model, smiles } => {
            print_json(&client.predict(&model, &smiles).await?)?;
        }
        Commands::Train {
            model_name,
            smiles,
            labels,
            classification,
        } => {
            let request = TrainRequest::new(model_name, smiles, labels).classification(classification);
            print_json(&client.train(&request).await?)?;
        }
        Commands::Hlm(cmd) => match cmd {
            HlmCommand::Submit { smiles } => print_json(&client.predict_hlm(&smiles).await?)?,
            HlmCommand::Get {
                task_id,
                wait,
                poll_secs,
                timeout_secs,
            } => {
                let result = if wait {
                    client
                        .wait_for_hlm(
                            &task_id,
                            Duration::from_secs(poll_secs.max(1)),
                            Duration::from_secs(timeout_secs),
                        )
                        .await?
                } else {
                    client.get_predict_hlm(&task_id).await?
                };
                print_json(&result)?;
            }
        },
        Commands::Structure(cmd) => match cmd {
            StructureCommand::Predict {
                model,
                protein,
                dna,
                rna,
                ligand,
                msa,
                name,
            } => {
                let chains = protein
                    .into_iter()
                    .map(Chain::protein)
                    .chain(dna.into_iter().map(Chain::dna))
                    .chain(rna.into_iter().map(Chain::rna))
                    .chain(ligand.into_iter().map(Chain::ligand));
                let mut request = StructurePredictionRequest::new(model).use_msa_server(msa);
                for chain in chains {
                    request = request.chain(chain);
                }
                if let Some(name) = name {
                    request = request.name(name);
                }
                print_json(&client.structure_predict(&request).await?)?;
            }
            StructureCommand::List => print_json(&client.list_structure_tasks().await?)?,
            StructureCommand::Download { task_id, output } => {
                let output = output.unwrap_or_else(|| PathBuf::from(format!("{task_id}.zip")));
                let archive = client.download_structure_prediction(&task_id).await?;
                tokio::fs::write(&output, &archive)
                    .await
                    .with_context(|| format!("failed to write {}", output.display()))?;
                println!("Saved {} bytes to {}", archive.len(), output.display());
            }
        },
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deepmirror={level},dm={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let value = line.trim().to_owned();
    if value.is_empty() {
        bail!("no input given for {}", label.trim_end_matches(": "));
    }
    Ok(value)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
