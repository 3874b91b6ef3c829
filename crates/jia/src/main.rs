//! Console entry point: dashboard, customer listing, and interactive chat.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jia_client::{CardImage, CustomerStore, HttpAssistantClient, RestCustomerStore};
use jia_config::JiaConfig;
use jia_core::cache::CacheControl;
use jia_core::dashboard::Dashboard;
use jia_core::directory::{CustomerDirectory, FilterMode};
use jia_core::session::ChatSession;
use jia_core::types::Sender;
use jia_core::validation::FormField;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "jia", version, about = "Customer master-data console")]
struct Cli {
    /// Explicit config file; defaults to the layered jia.json5 lookup.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the master data dashboard cards.
    Dashboard,
    /// List customers, optionally filtered.
    Customers {
        /// Substring filter over the customer fields.
        #[arg(long)]
        filter: Option<String>,
        /// Filtering strategy.
        #[arg(long, value_enum, default_value_t = FilterModeArg::Client)]
        mode: FilterModeArg,
    },
    /// Chat with the onboarding assistant.
    Chat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterModeArg {
    /// Filter the fetched master list in memory.
    Client,
    /// Delegate to the assistant backend's name search.
    Server,
}

impl From<FilterModeArg> for FilterMode {
    fn from(arg: FilterModeArg) -> Self {
        match arg {
            FilterModeArg::Client => FilterMode::ClientSide,
            FilterModeArg::Server => FilterMode::ServerSide,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    jia::init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => JiaConfig::load_from_path(path)?,
        None => JiaConfig::load(std::env::current_dir()?)?,
    };
    config.validate()?;

    let store: Arc<dyn CustomerStore> = Arc::new(RestCustomerStore::new(&config.store)?);
    let assistant = Arc::new(HttpAssistantClient::new(&config.assistant)?);
    let caches = Arc::new(CacheControl::new());

    match cli.command {
        Command::Dashboard => {
            let dashboard = Dashboard::new(store, caches);
            for card in dashboard.cards().await? {
                println!(
                    "{:<26} {:<10} {:>10}  {:>5}  {} new last month",
                    card.title, card.source, card.count, card.trend, card.new_count
                );
            }
        }
        Command::Customers { filter, mode } => {
            let directory = CustomerDirectory::new(store, assistant, caches, mode.into());
            let customers = directory.customers(filter.as_deref()).await?;
            for customer in &customers {
                println!(
                    "#{:<5} {:<28} {:<16} {}",
                    customer.id,
                    customer.name,
                    customer.gst_number.as_deref().unwrap_or("-"),
                    customer.address.as_deref().unwrap_or("-"),
                );
            }
            println!("{} of {} customers", customers.len(), directory.count().await?);
        }
        Command::Chat => run_chat(store, assistant, caches).await?,
    }
    Ok(())
}

/// Interactive chat loop over stdin.
async fn run_chat(
    store: Arc<dyn CustomerStore>,
    assistant: Arc<HttpAssistantClient>,
    caches: Arc<CacheControl>,
) -> Result<()> {
    let mut session = ChatSession::new(assistant);
    let mut printed = 0usize;
    println!("Commands: :upload <path>, :create, :quit");
    print_new(&session, &mut printed);

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim().to_string();
        match input.as_str() {
            ":quit" => break,
            ":create" => {
                if !session.open_onboarding() {
                    println!("The onboarding form cannot be opened right now.");
                    continue;
                }
                fill_form(&mut session)?;
                match session.submit_onboarding(store.as_ref(), &caches).await {
                    Some(created) => debug!("created customer (id={})", created.id),
                    None => {
                        if let Some(form) = session.form() {
                            for (field, error) in form.errors() {
                                println!("  {}: {error}", field.as_str());
                            }
                            if let Some(banner) = form.banner() {
                                println!("  {banner:?}");
                            }
                        }
                        session.cancel_onboarding();
                    }
                }
            }
            _ if input.starts_with(":upload ") => {
                let path = input.trim_start_matches(":upload ").trim();
                match stage_from_path(path) {
                    Ok(image) => {
                        session.stage_upload(image);
                        session.submit("").await;
                    }
                    Err(err) => println!("Could not read {path}: {err}"),
                }
            }
            _ => session.submit(&input).await,
        }
        print_new(&session, &mut printed);
        if session.create_prompt_visible() {
            println!("(type :create to onboard a new customer)");
        }
    }
    session.close();
    Ok(())
}

/// Print transcript entries appended since the last call.
fn print_new(session: &ChatSession, printed: &mut usize) {
    for message in &session.messages()[*printed..] {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Assistant => "jia",
        };
        println!("[{}] {who}: {}", message.sent_at, message.text);
    }
    *printed = session.messages().len();
}

/// Prompt for each form field, keeping prefilled values on empty input.
fn fill_form(session: &mut ChatSession) -> Result<()> {
    let fields = [
        (FormField::Name, "Customer name"),
        (FormField::Company, "Company"),
        (FormField::GstNumber, "GST number"),
        (FormField::PanNumber, "PAN number"),
        (FormField::Address, "Address"),
        (FormField::EmailAddress, "Email"),
        (FormField::PhoneNumber, "Phone"),
    ];
    let stdin = std::io::stdin();
    let mut line = String::new();
    for (field, label) in fields {
        let current = session
            .form()
            .map(|form| form.field(field).to_string())
            .unwrap_or_default();
        if current.is_empty() {
            print!("  {label}: ");
        } else {
            print!("  {label} [{current}]: ");
        }
        std::io::stdout().flush()?;
        line.clear();
        stdin.read_line(&mut line)?;
        let value = line.trim();
        if !value.is_empty()
            && let Some(form) = session.form_mut()
        {
            form.set_field(field, value);
        }
    }
    Ok(())
}

/// Read a file from disk into a staged card image.
fn stage_from_path(path: &str) -> Result<CardImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("card")
        .to_string();
    let mime = match Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string();
    Ok(CardImage {
        file_name,
        mime,
        bytes,
    })
}
