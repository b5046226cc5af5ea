//! checkwriter - mail checks and documents from the command line
//!
//! Main entry point for the checkwriter CLI.

use anyhow::Context;
use checkwriter::config::{validate_config_result, CheckWriterConfig};
use checkwriter::message::{Address, DocumentMail, MailCheck, ShippingType};
use checkwriter::{CheckWriterError, Client};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process;

/// checkwriter - send physical mail through OnlineCheckWriter
#[derive(Parser, Debug)]
#[command(name = "checkwriter")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/checkwriter/config.yaml)
    #[arg(short, long, env = "CHECKWRITER_CONFIG")]
    config: Option<PathBuf>,

    /// Use the sandbox endpoint
    #[arg(long)]
    sandbox: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a configuration file
    Init {
        /// API key to store in the new file
        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check the configuration for errors
    Validate,

    /// Mail a PDF, uploading it first when given a local file
    MailPdf {
        /// Local PDF to upload
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        file: Option<PathBuf>,

        /// URL of an already uploaded document
        #[arg(long)]
        url: Option<String>,

        /// Document title (default: file name without extension)
        #[arg(long)]
        title: Option<String>,

        /// Shipping tier: standard, express, priority (or 1-3)
        #[arg(long)]
        shipping_type: Option<ShippingType>,

        #[command(flatten)]
        recipient: RecipientArgs,
    },

    /// Issue and mail a check
    MailCheck {
        /// Amount in dollars
        #[arg(long)]
        amount: f64,

        /// Bank account to draw on (default: configured account)
        #[arg(long)]
        bank_account: Option<String>,

        /// Memo printed on the check
        #[arg(long)]
        memo: Option<String>,

        /// Internal note, not printed
        #[arg(long)]
        note: Option<String>,

        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        issue_date: Option<NaiveDate>,

        #[arg(long)]
        shipping_type: Option<ShippingType>,

        #[command(flatten)]
        recipient: RecipientArgs,
    },

    /// Upload a document for later mailing
    Upload {
        file: PathBuf,

        #[arg(long)]
        title: Option<String>,

        /// Key the service uses to deduplicate retried uploads
        #[arg(long)]
        idempotency_key: Option<String>,
    },

    /// Show the status of a mailed item
    Status {
        /// Item type (checks, letters, postcards, ...)
        item_type: String,
        id: String,
    },

    /// Cancel a pending mail item
    Cancel { item_type: String, id: String },

    /// Verify a postal address
    VerifyAddress {
        #[command(flatten)]
        address: RecipientArgs,
    },
}

#[derive(Args, Debug, Default)]
struct RecipientArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    address1: Option<String>,
    #[arg(long)]
    address2: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl From<RecipientArgs> for Address {
    fn from(args: RecipientArgs) -> Self {
        Address {
            name: args.name,
            company: args.company,
            address_line_1: args.address1,
            address_line_2: args.address2,
            city: args.city,
            state: args.state,
            zip: args.zip,
            country: args.country,
            phone: args.phone,
            email: args.email,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = checkwriter::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config;
    let sandbox = cli.sandbox;

    let response = match cli.command {
        Commands::Init { api_key, force } => {
            return handle_init_command(config_path.as_ref(), api_key, force);
        }

        Commands::Validate => {
            let config = load_config(config_path.as_ref(), sandbox)?;
            validate_config_result(&config)?;
            println!(
                "✓ Configuration is valid ({} edition, {})",
                config.edition, config.base_url
            );
            return Ok(());
        }

        Commands::MailPdf {
            file,
            url,
            title,
            shipping_type,
            recipient,
        } => {
            let mut mail = DocumentMail::create().to(recipient.into());
            if let Some(file) = file {
                mail = mail.file(file);
            }
            if let Some(url) = url {
                mail = mail.attachment_url(url);
            }
            if let Some(title) = title {
                mail = mail.document_title(title);
            }
            if let Some(shipping_type) = shipping_type {
                mail = mail.shipping_type(shipping_type);
            }
            connect(config_path.as_ref(), sandbox)?
                .send_document_mail(&mail)
                .await?
        }

        Commands::MailCheck {
            amount,
            bank_account,
            memo,
            note,
            issue_date,
            shipping_type,
            recipient,
        } => {
            let mut check = MailCheck::create().amount(amount).to(recipient.into());
            if let Some(bank_account) = bank_account {
                check = check.bank_account(bank_account);
            }
            if let Some(memo) = memo {
                check = check.memo(memo);
            }
            if let Some(note) = note {
                check = check.note(note);
            }
            if let Some(date) = issue_date {
                check = check.issue_date(date);
            }
            if let Some(shipping_type) = shipping_type {
                check = check.shipping_type(shipping_type);
            }
            connect(config_path.as_ref(), sandbox)?
                .send_mail_check(&check)
                .await?
        }

        Commands::Upload {
            file,
            title,
            idempotency_key,
        } => {
            connect(config_path.as_ref(), sandbox)?
                .upload_document_for_mailing(&file, title.as_deref(), idempotency_key.as_deref())
                .await?
        }

        Commands::Status { item_type, id } => {
            connect(config_path.as_ref(), sandbox)?
                .get_status(&item_type, &id)
                .await?
        }

        Commands::Cancel { item_type, id } => {
            connect(config_path.as_ref(), sandbox)?
                .cancel(&item_type, &id)
                .await?
        }

        Commands::VerifyAddress { address } => {
            connect(config_path.as_ref(), sandbox)?
                .verify_address(&address.into())
                .await?
        }
    };

    print_response(&response)
}

/// Load and validate configuration, then build the HTTP client
fn connect(config_path: Option<&PathBuf>, sandbox: bool) -> anyhow::Result<Client> {
    let config = load_config(config_path, sandbox)?;
    validate_config_result(&config)?;
    Ok(Client::new(&config)?)
}

/// Config file (when present), then environment overrides, then `--sandbox`
fn load_config(path: Option<&PathBuf>, sandbox: bool) -> anyhow::Result<CheckWriterConfig> {
    let mut config = match path {
        Some(path) => CheckWriterConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => match CheckWriterConfig::load_default() {
            Ok(config) => config,
            Err(CheckWriterError::Config(msg)) if msg.contains("Config file not found") => {
                tracing::debug!("No config file; using environment only");
                CheckWriterConfig::default()
            }
            Err(e) => return Err(e.into()),
        },
    };

    config.apply_env()?;

    if sandbox {
        config = config.sandbox();
    }

    Ok(config)
}

fn handle_init_command(
    config_path: Option<&PathBuf>,
    api_key: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let config_file = config_path
        .cloned()
        .unwrap_or_else(CheckWriterConfig::default_path);

    if config_file.exists() && !force {
        println!("Configuration already exists at {}", config_file.display());
        println!();
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    let config = CheckWriterConfig::new(api_key.unwrap_or_default());
    config.save(&config_file)?;

    println!("✓ Created configuration at {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("  1. Set api_key (or export ONLINECHECKWRITER_API_KEY)");
    println!("  2. Add a default_sender and default_bank_account_id");
    println!("  3. Check it:");
    println!("     checkwriter validate");

    Ok(())
}

fn print_response(response: &Value) -> anyhow::Result<()> {
    let pretty = serde_json::to_string_pretty(response)?;
    println!("{}", pretty);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mail_pdf_requires_a_source() {
        let result = Cli::try_parse_from(["checkwriter", "mail-pdf", "--name", "Ada"]);
        assert!(result.is_err());

        let both = Cli::try_parse_from([
            "checkwriter",
            "mail-pdf",
            "--file",
            "a.pdf",
            "--url",
            "https://x/a.pdf",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn test_mail_check_arguments() {
        let cli = Cli::try_parse_from([
            "checkwriter",
            "--sandbox",
            "mail-check",
            "--amount",
            "500",
            "--issue-date",
            "2026-01-28",
            "--shipping-type",
            "express",
            "--name",
            "Jane",
            "--zip",
            "73301",
        ])
        .unwrap();

        assert!(cli.sandbox);
        match cli.command {
            Commands::MailCheck {
                amount,
                issue_date,
                shipping_type,
                recipient,
                ..
            } => {
                assert_eq!(amount, 500.0);
                assert_eq!(issue_date, NaiveDate::from_ymd_opt(2026, 1, 28));
                assert_eq!(shipping_type, Some(ShippingType::Express));
                assert_eq!(recipient.zip.as_deref(), Some("73301"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_recipient_args_into_address() {
        let address: Address = RecipientArgs {
            name: Some("Ada".into()),
            address1: Some("1 Main".into()),
            ..Default::default()
        }
        .into();

        assert_eq!(address.address_line_1.as_deref(), Some("1 Main"));
        assert!(address.city.is_none());
    }

    #[test]
    fn test_init_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        handle_init_command(Some(&path), Some("secret".into()), false).unwrap();
        let config = CheckWriterConfig::load(&path).unwrap();
        assert_eq!(config.api_key, "secret");
    }
}
