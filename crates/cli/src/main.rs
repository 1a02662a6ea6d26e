//! QueueSmart CLI - terminal front-end for the queue management engine
//!
//! The engine returns plain data; everything the user sees is rendered
//! here. Protected commands check the session before touching anything.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::Confirm;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use queuesmart_core::application::{
    seed, AuthService, QueueEngine, Records, RegisterRequest, ServiceCatalog, SessionGuard,
};
use queuesmart_core::domain::{DomainError, Priority, Role, ServiceDraft, ServiceId, ServiceStatus};
use queuesmart_core::error::AppError;
use queuesmart_core::port::{Notice, NotificationSink, SystemTimeProvider};
use queuesmart_infra_store::JsonFileStore;

const DEFAULT_DATA_PATH: &str = "~/.queuesmart/state.json";

#[derive(Parser)]
#[command(name = "queuesmart")]
#[command(about = "QueueSmart queue management CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the state file
    #[arg(long, env = "QUEUESMART_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    data_path: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Repeat the password
        #[arg(long)]
        confirm_password: String,

        #[arg(long, value_enum, default_value = "user")]
        role: RoleArg,
    },

    /// Log in and start a session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami,

    /// Show catalog and queue totals (admin)
    Dashboard,

    /// Manage services
    Services {
        #[command(subcommand)]
        command: ServiceCommands,
    },

    /// Join and manage queues
    Queue {
        #[command(subcommand)]
        command: QueueCommands,
    },
}

#[derive(Subcommand)]
enum ServiceCommands {
    /// List services
    List {
        /// Only services open for joining
        #[arg(long)]
        open: bool,
    },

    /// Create a service (admin)
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,

        /// Minutes per person, 1-480
        #[arg(long)]
        duration: Option<i64>,

        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },

    /// Update a service; omitted fields keep their current value (admin)
    Update {
        id: ServiceId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Minutes per person, 1-480
        #[arg(long)]
        duration: Option<i64>,

        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
    },

    /// Open or close a service queue (admin)
    Toggle { id: ServiceId },

    /// Delete a service and its queue (admin)
    Delete {
        id: ServiceId,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum QueueCommands {
    /// Join a service queue
    Join {
        service_id: ServiceId,

        /// Defaults to the logged-in user's name
        #[arg(long)]
        name: Option<String>,

        /// Defaults to the logged-in user's email
        #[arg(long)]
        email: Option<String>,
    },

    /// Show a queue with positions and wait times
    Show { service_id: ServiceId },

    /// Serve the next person in line (admin)
    Serve { service_id: ServiceId },

    /// Move a person one position forward (admin)
    MoveUp { service_id: ServiceId, position: usize },

    /// Move a person one position back (admin)
    MoveDown { service_id: ServiceId, position: usize },

    /// Move a person from one position to another (admin)
    Reorder {
        service_id: ServiceId,
        from: usize,
        to: usize,
    },

    /// Remove a person from a queue (admin)
    Remove {
        service_id: ServiceId,
        position: usize,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

/// Prints toast-style notifications from the engine to the terminal.
struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn notify(&self, message: &str, notice: Notice) {
        match notice {
            Notice::Success => println!("{} {}", "✓".green().bold(), message),
            Notice::Info => println!("{} {}", "•".bold(), message),
            Notice::Error => eprintln!("{} {}", "✗".red().bold(), message.red()),
        }
    }
}

/// Unwrap an engine result, rendering the failure the way the original UI
/// would (field errors listed, guard failures with a hint) and exiting.
fn exit_on_error<T>(result: queuesmart_core::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            match &err {
                AppError::Domain(DomainError::Validation(errors)) => {
                    for e in errors {
                        eprintln!("{} {}", "✗".red().bold(), e.message.red());
                    }
                }
                AppError::Domain(DomainError::EmptyQueue(_)) => {
                    eprintln!(
                        "{} {}",
                        "✗".red().bold(),
                        "No one in the queue to serve.".red()
                    );
                }
                AppError::Domain(DomainError::Unauthenticated) => {
                    eprintln!(
                        "{} {}",
                        "✗".red().bold(),
                        "You are not logged in. Try: queuesmart login".red()
                    );
                }
                AppError::Domain(DomainError::Forbidden { required }) => {
                    eprintln!(
                        "{} {}",
                        "✗".red().bold(),
                        format!("This action requires the {required} role.").red()
                    );
                }
                other => eprintln!("{} {}", "✗".red().bold(), other.to_string().red()),
            }
            std::process::exit(1);
        }
    }
}

/// 1-based display position -> 0-based queue index
fn to_index(position: usize) -> Result<usize> {
    if position == 0 {
        anyhow::bail!("positions start at 1");
    }
    Ok(position - 1)
}

fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("confirmation prompt failed")?;
    if !confirmed {
        println!("Cancelled.");
    }
    Ok(confirmed)
}

fn init_tracing() {
    let log_format =
        std::env::var("QUEUESMART_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("queuesmart_core=warn,queuesmart_infra_store=warn"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .init();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Composition root: wire the store, records, and services together
    let data_path = shellexpand::tilde(&cli.data_path).into_owned();
    let store = Arc::new(
        JsonFileStore::open(&data_path)
            .map_err(|e| anyhow::anyhow!("open state file {data_path}: {e}"))?,
    );
    let records = Records::new(store);
    seed::init_demo_data(&records).map_err(|e| anyhow::anyhow!("seed demo data: {e}"))?;

    let sink: Arc<dyn NotificationSink> = Arc::new(TerminalSink);
    let time_provider = Arc::new(SystemTimeProvider);
    let catalog = ServiceCatalog::new(records.clone(), sink.clone());
    let engine = QueueEngine::new(records.clone(), time_provider.clone(), sink.clone());
    let guard = SessionGuard::new(records.clone());
    let auth = AuthService::new(records.clone(), time_provider);

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
            role,
        } => {
            let account = exit_on_error(auth.register(RegisterRequest {
                name,
                email,
                password,
                confirm_password,
                role: role.into(),
            }));
            println!(
                "{} Account created for {}. You can now log in.",
                "✓".green().bold(),
                account.email
            );
        }

        Commands::Login { email, password } => {
            let principal = exit_on_error(auth.login(&email, &password));
            println!(
                "{} Logged in as {} ({})",
                "✓".green().bold(),
                principal.name.bold(),
                principal.role
            );
        }

        Commands::Logout => {
            exit_on_error(guard.logout());
            println!("{} Logged out.", "✓".green().bold());
        }

        Commands::Whoami => match guard.current_user() {
            Some(principal) => {
                println!("  {} {}", "Name:".bold(), principal.name);
                println!("  {} {}", "Email:".bold(), principal.email);
                println!("  {} {}", "Role:".bold(), principal.role);
            }
            None => println!("Not logged in."),
        },

        Commands::Dashboard => {
            exit_on_error(guard.require_role(Role::Admin));
            let stats = catalog.dashboard();

            println!("{}", "Dashboard".cyan().bold());
            println!();
            println!("  {} {}", "Total Services:".bold(), stats.total_services);
            println!("  {} {}", "Active Queues:".bold(), stats.open_services);
            println!("  {} {}", "Users Waiting:".bold(), stats.total_waiting);
            println!();

            let services = catalog.list();
            if services.is_empty() {
                println!("No services configured yet.");
            } else {
                let mut rows = Vec::new();
                for service in &services {
                    let stats = exit_on_error(engine.stats(service.id));
                    rows.push(render::dashboard_row(service, stats.count));
                }
                println!("{}", render::table(rows));
            }
        }

        Commands::Services { command } => match command {
            ServiceCommands::List { open } => {
                exit_on_error(guard.require_auth());
                let mut services = catalog.list();
                if open {
                    services.retain(|s| s.status == ServiceStatus::Open);
                }
                if services.is_empty() {
                    println!("No services yet.");
                } else {
                    let rows: Vec<_> = services.iter().map(render::service_row).collect();
                    println!("{}", render::table(rows));
                }
            }

            ServiceCommands::Create {
                name,
                description,
                duration,
                priority,
            } => {
                exit_on_error(guard.require_role(Role::Admin));
                let service = exit_on_error(catalog.create(ServiceDraft {
                    name,
                    description,
                    duration,
                    priority: priority.map(Into::into),
                }));
                println!("  {} {}", "ID:".bold(), service.id);
            }

            ServiceCommands::Update {
                id,
                name,
                description,
                duration,
                priority,
            } => {
                exit_on_error(guard.require_role(Role::Admin));
                // prefill omitted fields from the existing service, like the
                // edit form does
                let existing = exit_on_error(catalog.get(id));
                exit_on_error(catalog.update(
                    id,
                    ServiceDraft {
                        name: name.unwrap_or(existing.name),
                        description: description.unwrap_or(existing.description),
                        duration: duration.or(Some(existing.duration)),
                        priority: priority.map(Into::into).or(Some(existing.priority)),
                    },
                ));
            }

            ServiceCommands::Toggle { id } => {
                exit_on_error(guard.require_role(Role::Admin));
                exit_on_error(catalog.toggle_status(id));
            }

            ServiceCommands::Delete { id, yes } => {
                exit_on_error(guard.require_role(Role::Admin));
                if confirm(
                    "Are you sure you want to delete this service? This action cannot be undone.",
                    yes,
                )? {
                    exit_on_error(catalog.delete(id));
                }
            }
        },

        Commands::Queue { command } => match command {
            QueueCommands::Join {
                service_id,
                name,
                email,
            } => {
                let principal = exit_on_error(guard.require_auth());
                let service = exit_on_error(catalog.get(service_id));
                if service.status != ServiceStatus::Open {
                    eprintln!(
                        "{} {}",
                        "✗".red().bold(),
                        format!("{} is not open for joining.", service.name).red()
                    );
                    std::process::exit(1);
                }

                let name = name.unwrap_or(principal.name);
                let email = email.unwrap_or(principal.email);
                exit_on_error(engine.enqueue(service_id, &name, &email));

                let stats = exit_on_error(engine.stats(service_id));
                println!("  {} {}", "Position:".bold(), stats.count);
                if let Some(est) = stats.estimated_wait_minutes {
                    println!("  {} {} min", "Est. wait:".bold(), est);
                }
            }

            QueueCommands::Show { service_id } => {
                exit_on_error(guard.require_auth());
                let service = exit_on_error(catalog.get(service_id));
                let entries = exit_on_error(engine.entries(service_id));
                let stats = exit_on_error(engine.stats(service_id));

                println!("{}", format!("{} — Queue", service.name).cyan().bold());
                println!();
                println!("  {} {}", "People in Queue:".bold(), stats.count);
                match stats.estimated_wait_minutes {
                    Some(est) => println!("  {} {} min", "Est. Total Wait:".bold(), est),
                    None => println!("  {} —", "Est. Total Wait:".bold()),
                }
                println!();

                if entries.is_empty() {
                    println!("No one is in this queue right now.");
                } else {
                    let rows: Vec<_> = entries
                        .iter()
                        .enumerate()
                        .map(|(i, entry)| {
                            render::queue_row(i + 1, entry, engine.waited_minutes(entry))
                        })
                        .collect();
                    println!("{}", render::table(rows));
                }
            }

            QueueCommands::Serve { service_id } => {
                exit_on_error(guard.require_role(Role::Admin));
                exit_on_error(engine.serve_next(service_id));
            }

            QueueCommands::MoveUp {
                service_id,
                position,
            } => {
                exit_on_error(guard.require_role(Role::Admin));
                exit_on_error(engine.move_up(service_id, to_index(position)?));
                println!("{} Queue updated.", "✓".green().bold());
            }

            QueueCommands::MoveDown {
                service_id,
                position,
            } => {
                exit_on_error(guard.require_role(Role::Admin));
                exit_on_error(engine.move_down(service_id, to_index(position)?));
                println!("{} Queue updated.", "✓".green().bold());
            }

            QueueCommands::Reorder {
                service_id,
                from,
                to,
            } => {
                exit_on_error(guard.require_role(Role::Admin));
                exit_on_error(engine.reorder(service_id, to_index(from)?, to_index(to)?));
                println!("{} Queue updated.", "✓".green().bold());
            }

            QueueCommands::Remove {
                service_id,
                position,
                yes,
            } => {
                exit_on_error(guard.require_role(Role::Admin));
                let index = to_index(position)?;
                let entries = exit_on_error(engine.entries(service_id));
                let Some(entry) = entries.get(index) else {
                    eprintln!(
                        "{} {}",
                        "✗".red().bold(),
                        format!("No one at position {position}.").red()
                    );
                    std::process::exit(1);
                };

                if confirm(&format!("Remove {} from the queue?", entry.name), yes)? {
                    exit_on_error(engine.remove_at(service_id, index));
                }
            }
        },
    }

    Ok(())
}
