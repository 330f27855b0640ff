use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nest_admin::draft::DraftModel;
use nest_admin::models::ProfileUpdate;
use nest_admin::{
    AccountDesk, AccountOutcome, ClientConfig, FormContext, FormSession, HttpListingService,
    ListingService, Liveness, LocalPreviewProvider, MediaKind, MemorySessionStore, SessionStore,
    SubmissionGuard, SubmitOutcome,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "NEST listing administration", long_about = None)]
#[command(after_help = "The Listing Service URL is read from NEST_API_URL (or .env).")]
struct Cli {
    /// Bearer token from an earlier login
    #[arg(long, env = "NEST_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "NEST_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "NEST_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List amenities offered by the service
    Amenities,
    /// List services offered by the service
    Services,
    /// List all properties
    Properties,
    /// Create a property from a JSON draft
    Create {
        #[arg(long)]
        draft: PathBuf,
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Update a property, optionally replacing its fields from a JSON draft
    Update {
        id: String,
        #[arg(long)]
        draft: Option<PathBuf>,
        #[command(flatten)]
        media: MediaArgs,
    },
    /// Delete a property
    Delete { id: String },
    /// Change the signed-in administrator's profile
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// New password; omit to keep the current one
        #[arg(long, env = "NEST_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
    },
    /// List contact messages left by visitors
    Contacts,
    /// Delete a contact message
    DeleteContact { id: String },
}

#[derive(clap::Args)]
struct MediaArgs {
    /// Image file to upload (repeatable)
    #[arg(long = "image")]
    images: Vec<PathBuf>,
    /// Video file to upload (repeatable)
    #[arg(long = "video")]
    videos: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Loads .env first so the flags below can fall back to it
    let config = ClientConfig::from_env()?;
    let cli = Cli::parse();

    info!("🏠 NEST Admin");
    info!("=============");

    let service: Arc<dyn ListingService> = Arc::new(HttpListingService::new(config.clone())?);
    let session = Arc::new(match &cli.token {
        Some(token) => MemorySessionStore::with_token(token),
        None => MemorySessionStore::new(),
    });

    if let (None, Some(email), Some(password)) = (&cli.token, &cli.email, &cli.password) {
        let user = service
            .login(email, password)
            .await
            .context("Login failed")?;
        session.sign_in(user);
    }

    let ctx = FormContext::new(
        &config,
        service.clone(),
        session.clone(),
        Arc::new(LocalPreviewProvider::new()),
    );

    match cli.command {
        Commands::Amenities => {
            for (i, item) in service.list_amenities().await?.iter().enumerate() {
                println!("{}. {} ({})", i + 1, item.name, item.id);
            }
        }
        Commands::Services => {
            for (i, item) in service.list_services().await?.iter().enumerate() {
                println!("{}. {} ({})", i + 1, item.name, item.id);
            }
        }
        Commands::Properties => {
            let properties = service.list_properties().await?;
            info!("✅ Found {} properties", properties.len());
            for (i, property) in properties.iter().enumerate() {
                println!("{}. {} [{}]", i + 1, property.name, property.status);
                println!("   {}, {}", property.location.address, property.location.city);
                println!("   {} room type(s)", property.room_types.len());
                println!("   ID: {}", property.id);
                println!();
            }
        }
        Commands::Create { draft, media } => {
            let draft = read_draft(&draft).await?;
            let mut form = FormSession::create(&ctx, Liveness::new()).await?;
            form.load_draft(draft);
            report(run_form(&mut form, &media).await?)?;
        }
        Commands::Update { id, draft, media } => {
            let mut form = FormSession::update(&ctx, &id, Liveness::new()).await?;
            if let Some(path) = draft {
                form.load_draft(read_draft(&path).await?);
            }
            report(run_form(&mut form, &media).await?)?;
        }
        Commands::Delete { id } => {
            let guard = SubmissionGuard::new(service.clone(), session.clone());
            report(guard.delete(&id).await)?;
        }
        Commands::Profile {
            name,
            email,
            new_password,
        } => {
            let desk = AccountDesk::new(service.clone(), session.clone());
            let update = ProfileUpdate {
                name,
                email,
                password: new_password.unwrap_or_default(),
            };
            report_account(desk.update_profile(update).await)?;
            if let Some(user) = session.current_user() {
                println!("{} <{}>", user.name, user.email);
            }
        }
        Commands::Contacts => {
            let desk = AccountDesk::new(service.clone(), session.clone());
            let contacts = report_account(desk.contacts().await)?;
            info!("✅ Found {} contact message(s)", contacts.len());
            for (i, contact) in contacts.iter().enumerate() {
                println!("{}. {} ({})", i + 1, contact.name, contact.phone);
                println!("   {}", contact.message);
                println!("   Property: {}", contact.property_id);
                if let Some(at) = contact.created_at {
                    println!("   Received: {}", at.format("%Y-%m-%d %H:%M"));
                }
                println!("   ID: {}", contact.id);
                println!();
            }
        }
        Commands::DeleteContact { id } => {
            let desk = AccountDesk::new(service.clone(), session.clone());
            report_account(desk.delete_contact(&id).await)?;
        }
    }

    Ok(())
}

async fn read_draft(path: &Path) -> Result<DraftModel> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid draft {}", path.display()))
}

async fn run_form(form: &mut FormSession, media: &MediaArgs) -> Result<SubmitOutcome> {
    for notice in form.take_notices() {
        warn!("{}", notice.message);
    }
    for gap in form.draft().gaps() {
        warn!("Draft gap: {}", gap);
    }

    for path in &media.images {
        form.stage_path(MediaKind::Image, path).await?;
    }
    for path in &media.videos {
        form.stage_path(MediaKind::Video, path).await?;
    }

    info!("Submitting {} field(s)...", form.payload().len());
    Ok(form.submit().await)
}

fn report(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Succeeded { redirect, notice } => {
            info!("✅ {}", notice.message);
            println!("Next: {:?}", redirect);
            Ok(())
        }
        SubmitOutcome::SessionExpired => bail!("Session expired, please log in again"),
        SubmitOutcome::Failed(notice) => bail!("{}", notice.message),
        SubmitOutcome::Ignored | SubmitOutcome::Discarded => {
            warn!("Nothing was submitted");
            Ok(())
        }
    }
}

fn report_account<T>(outcome: AccountOutcome<T>) -> Result<T> {
    match outcome {
        AccountOutcome::Done { value, notice } => {
            if let Some(notice) = notice {
                info!("✅ {}", notice.message);
            }
            Ok(value)
        }
        AccountOutcome::SessionExpired => bail!("Session expired, please log in again"),
        AccountOutcome::Failed(notice) => bail!("{}", notice.message),
    }
}
