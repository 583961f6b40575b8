//! # MedTrack CLI
//!
//! Household medication inventory with weekly setup and reorder reminders.
//!
//! Usage:
//!   medtrack serve                     # HTTP API + reminder timers
//!   medtrack remind weekly             # Send the weekly setup reminder now
//!   medtrack remind reorder            # Run the reorder check now
//!   medtrack status                    # Supply overview
//!   medtrack refill 3 2                # Add two packages to drug #3
//!   medtrack test-email                # Check the mail transport
//!   medtrack config show               # Show configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use medtrack_core::clock::{Clock, SystemClock};
use medtrack_core::traits::{MedicationStore, Page};
use medtrack_core::{dosage, window, MedTrackConfig};
use medtrack_scheduler::{ReminderEngine, ReminderSchedules, TriggerKind, TriggerOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "medtrack",
    version,
    about = "💊 MedTrack — household medication inventory and reminders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and the reminder timers
    Serve {
        /// Serve the API without scheduling reminders
        #[arg(long)]
        no_scheduler: bool,
    },

    /// Run a reminder trigger now
    Remind {
        #[arg(value_enum)]
        kind: RemindKind,
    },

    /// Show supply for every drug
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Record a refill
    Refill {
        /// Drug id
        id: i64,
        /// Number of packages received
        #[arg(default_value_t = 1)]
        packages: u32,
    },

    /// Send a test message through the configured transport
    TestEmail,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RemindKind {
    Weekly,
    Reorder,
}

impl From<RemindKind> for TriggerKind {
    fn from(kind: RemindKind) -> Self {
        match kind {
            RemindKind::Weekly => TriggerKind::Weekly,
            RemindKind::Reorder => TriggerKind::Reorder,
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (secrets masked)
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

struct App {
    config: MedTrackConfig,
    store: Arc<dyn MedicationStore>,
    clock: Arc<dyn Clock>,
    engine: Arc<ReminderEngine>,
}

impl App {
    fn open(config: MedTrackConfig) -> Result<Self> {
        let store: Arc<dyn MedicationStore> = Arc::new(
            medtrack_store::open_store(&config.database)
                .with_context(|| format!("opening database {}", config.database.path))?,
        );
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let notifier = medtrack_notify::create_notifier(&config.notify);
        let engine = Arc::new(ReminderEngine::new(
            Arc::clone(&store),
            notifier,
            Arc::clone(&clock),
            config.reminder.clone(),
        ));
        Ok(Self { config, store, clock, engine })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "medtrack=debug,medtrack_core=debug,medtrack_store=debug,medtrack_notify=debug,medtrack_scheduler=debug,medtrack_gateway=debug,tower_http=debug"
    } else {
        "medtrack=info,medtrack_core=info,medtrack_store=info,medtrack_notify=info,medtrack_scheduler=info,medtrack_gateway=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    // Load config
    let config_path = cli.config.clone().unwrap_or_else(MedTrackConfig::default_path);
    let initializing = matches!(cli.command, Commands::Config { action: ConfigAction::Init { .. } });
    // init creates the file, so it must not require one
    let config = if initializing {
        MedTrackConfig::default()
    } else if cli.config.is_some() {
        MedTrackConfig::load_from(&config_path)?
    } else {
        MedTrackConfig::load()?
    };

    match cli.command {
        Commands::Serve { no_scheduler } => {
            let app = App::open(config)?;
            let scheduler = if no_scheduler || !app.config.schedule.enabled {
                tracing::info!("Reminder scheduler disabled");
                None
            } else {
                let schedules = ReminderSchedules::from_config(&app.config.schedule)?;
                Some(Arc::clone(&app.engine).spawn(schedules))
            };

            println!("💊 MedTrack v{}", env!("CARGO_PKG_VERSION"));
            println!("   Database: {}", app.config.database.resolved_path().display());
            println!("   Notifier: {}", app.engine.notifier_name());

            let state = Arc::new(medtrack_gateway::AppState::new(
                Arc::clone(&app.store),
                Arc::clone(&app.engine),
                Arc::clone(&app.clock),
            ));
            let served = medtrack_gateway::start(state, &app.config.gateway).await;
            if let Some(handle) = scheduler {
                handle.shutdown();
            }
            served?;
        }

        Commands::Remind { kind } => {
            let app = App::open(config)?;
            let kind = TriggerKind::from(kind);
            match app.engine.trigger(kind).await? {
                TriggerOutcome::Sent { drugs } => println!("✅ {kind} reminder sent ({drugs} drug(s))"),
                TriggerOutcome::Skipped => println!("✅ Nothing to reorder, no reminder sent"),
            }
        }

        Commands::Status { json } => {
            let app = App::open(config)?;
            let today = app.clock.today();
            let drugs = app.store.list_drugs(Page::all()).await?;
            let vacations = app.store.list_vacations(Page::all()).await?;
            let current = window::find_current(&vacations, today);

            if json {
                let rows: Vec<serde_json::Value> = drugs
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "drug": d,
                            "summary": dosage::compute(d, today),
                        })
                    })
                    .collect();
                let out = serde_json::json!({ "today": today, "drugs": rows, "doctor_vacation": current });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!("💊 Supply on {today} ({} week)\n", dosage::WeekParity::of(today));
            if drugs.is_empty() {
                println!("  No drugs tracked yet. Add some via POST /drugs.");
            }
            for drug in &drugs {
                let summary = dosage::compute(drug, today);
                let flag = if summary.needs_reorder { "⚠️ " } else { "✅" };
                println!(
                    "  {flag} #{:<3} {:<24} {:>7} pills  {:>6.1} days  ({:.2}/day)",
                    drug.id,
                    drug.name,
                    drug.current_amount,
                    summary.days_remaining,
                    summary.daily_consumption
                );
            }
            if let Some(v) = current {
                println!("\n  🏖️  Doctor on vacation {} → {}", v.start_date, v.end_date);
            }
        }

        Commands::Refill { id, packages } => {
            let app = App::open(config)?;
            let drug = app
                .store
                .refill_drug(id, packages, app.clock.now_utc())
                .await?
                .with_context(|| format!("drug #{id} not found"))?;
            println!("✅ {} refilled: {} pills on hand", drug.name, drug.current_amount);
        }

        Commands::TestEmail => {
            let app = App::open(config)?;
            app.engine.send_test().await?;
            println!("✅ Test message sent via {}", app.engine.notifier_name());
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let mut shown = config;
                for secret in [
                    &mut shown.notify.mailjet.api_key,
                    &mut shown.notify.mailjet.api_secret,
                    &mut shown.notify.smtp.password,
                ] {
                    if !secret.is_empty() {
                        *secret = "********".into();
                    }
                }
                println!("# {}", config_path.display());
                println!("{}", toml::to_string_pretty(&shown)?);
            }
            ConfigAction::Init { force } => {
                if MedTrackConfig::init_at(&config_path, force)? {
                    println!("✅ Config saved to: {}", config_path.display());
                } else {
                    println!("Config already exists: {} (use --force to overwrite)", config_path.display());
                }
            }
        },
    }

    Ok(())
}
