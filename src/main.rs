use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use volaplace_client::api::{FundShiftRequest, HttpApi, ShiftApi};
use volaplace_client::config::{self, Config};
use volaplace_client::reconcile::{action_for, Tab, Tracked};
use volaplace_client::store::{self, KeyValueStore, SessionStore, SqliteStore};
use volaplace_client::volunteer::Volunteer;
use volaplace_client::{auth, payments};

#[derive(Debug, Parser)]
#[command(author, version, about = "VolaPlace volunteer shift client")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write an example config file
    Init,
    #[command(flatten)]
    Client(ClientCommand),
}

/// Commands that need config, local state and the backend.
#[derive(Debug, Subcommand)]
enum ClientCommand {
    /// Sign in and store the session locally
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and clear the local session
    Logout,
    /// Show the signed-in user after checking the token with the backend
    Whoami,
    /// List shifts with their status and available action
    Shifts {
        #[arg(long, value_enum, default_value_t = TabArg::All)]
        tab: TabArg,
    },
    /// Totals over completed shifts
    Stats,
    /// Register for a funded shift
    Register { shift_id: i64 },
    /// Check in to a registered shift (must be on site)
    CheckIn { shift_id: i64 },
    /// Check out and report how many beneficiaries were served
    CheckOut {
        shift_id: i64,
        #[arg(long)]
        beneficiaries: u32,
    },
    /// Approve a pending payout (admin)
    ApprovePayment { roster_id: i64 },
    /// Fund a shift via mobile money (organization)
    FundShift {
        shift_id: i64,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        phone: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TabArg {
    Available,
    Upcoming,
    Pending,
    Completed,
    All,
}

impl From<TabArg> for Tab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Available => Tab::Available,
            TabArg::Upcoming => Tab::Upcoming,
            TabArg::Pending => Tab::Pending,
            TabArg::Completed => Tab::Completed,
            TabArg::All => Tab::All,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let command = match args.command {
        Command::Init => return write_example_config(&args.config),
        Command::Client(command) => command,
    };

    let cfg = config::load(Some(&args.config))
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    cfg.ensure_dirs()?;

    let pool = store::init_pool(&cfg.database_url()).await?;
    store::run_migrations(&pool).await?;
    let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(pool));
    let session = SessionStore::new(kv.clone());

    let token = session.token().await?;
    let http = HttpApi::new(cfg.base_url()?, token, cfg.timeout())?;
    info!(base_url = %http.base_url(), "using backend");
    let api: Arc<dyn ShiftApi> = Arc::new(http);

    run(command, &cfg, api, kv, &session).await
}

async fn run(
    command: ClientCommand,
    cfg: &Config,
    api: Arc<dyn ShiftApi>,
    kv: Arc<dyn KeyValueStore>,
    session: &SessionStore,
) -> Result<()> {
    let ttl = cfg.app.optimistic_ttl();
    match command {
        ClientCommand::Login { email, password } => {
            let user = auth::login(api.as_ref(), session, &email, &password).await?;
            println!(
                "Logged in as {} ({:?})",
                user.name.as_deref().or(user.email.as_deref()).unwrap_or("user"),
                user.role
            );
        }
        ClientCommand::Logout => {
            auth::logout(api.as_ref(), session).await?;
            println!("Logged out.");
        }
        ClientCommand::Whoami => match auth::verify(api.as_ref(), session).await? {
            Some(user) => println!(
                "#{} {} {:?}",
                user.id,
                user.email.as_deref().unwrap_or("-"),
                user.role
            ),
            None => println!("Not logged in."),
        },
        ClientCommand::Shifts { tab } => {
            let mut volunteer = Volunteer::from_session(api, kv, ttl).await?;
            volunteer.refresh().await?;
            let rows = volunteer.board().bucket(tab.into());
            if rows.is_empty() {
                println!("No shifts.");
            }
            for tracked in rows {
                println!("{}", render_row(tracked, ttl));
            }
        }
        ClientCommand::Stats => {
            let mut volunteer = Volunteer::from_session(api, kv, ttl).await?;
            volunteer.refresh().await?;
            let stats = volunteer.board().stats_at(chrono::Utc::now());
            println!("Total earned:         KES {}", stats.total_earned);
            println!("Total hours:          {}", stats.total_hours);
            println!("Beneficiaries served: {}", stats.total_beneficiaries);
        }
        ClientCommand::Register { shift_id } => {
            let mut volunteer = Volunteer::from_session(api, kv, ttl).await?;
            volunteer.refresh().await?;
            println!("{}", volunteer.register(shift_id).await?);
            print_shift(&volunteer, shift_id, ttl);
        }
        ClientCommand::CheckIn { shift_id } => {
            let mut volunteer = Volunteer::from_session(api, kv, ttl).await?;
            volunteer.refresh().await?;
            println!("{}", volunteer.check_in(shift_id).await?);
            print_shift(&volunteer, shift_id, ttl);
        }
        ClientCommand::CheckOut {
            shift_id,
            beneficiaries,
        } => {
            let mut volunteer = Volunteer::from_session(api, kv, ttl).await?;
            volunteer.refresh().await?;
            println!("{}", volunteer.check_out(shift_id, beneficiaries).await?);
            print_shift(&volunteer, shift_id, ttl);
        }
        ClientCommand::ApprovePayment { roster_id } => {
            let message = payments::approve_payment(api.as_ref(), session, roster_id).await?;
            println!("{message}");
        }
        ClientCommand::FundShift {
            shift_id,
            amount,
            phone,
        } => {
            let request = FundShiftRequest {
                shift_id,
                amount,
                phone_number: phone,
            };
            let message = payments::fund_shift(api.as_ref(), session, &request).await?;
            println!("{message}");
        }
    }
    Ok(())
}

fn write_example_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    std::fs::write(path, config::example())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn print_shift(volunteer: &Volunteer, shift_id: i64, ttl: chrono::Duration) {
    if let Some(tracked) = volunteer.board().find(shift_id) {
        println!("{}", render_row(tracked, ttl));
    }
}

fn render_row(tracked: &Tracked, ttl: chrono::Duration) -> String {
    let now = chrono::Utc::now();
    let status = tracked.status_at(now, ttl);
    let view = tracked.view();
    let button = action_for(status, &view);
    let offer = match (button.action, button.badge) {
        (Some(action), _) if button.enabled => action.label().to_string(),
        (Some(action), _) => format!("{} (disabled: not funded)", action.label()),
        (None, Some(badge)) => badge.to_string(),
        (None, None) => String::new(),
    };
    format!(
        "#{:<5} {:<32} {:<10} {:<16} {}",
        view.id,
        view.title,
        view.date.as_deref().unwrap_or("-"),
        status,
        offer
    )
}
