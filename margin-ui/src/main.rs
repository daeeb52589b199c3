use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, info};

use margin_core::payments::StkPushState;
use margin_core::{
    BusinessProfile, DashboardState, ProfileDraft, Route, Sector, StkPushRequest, ThemeMode,
    UserAccount, VatStatus, calculate_non_compliant_expense_penalty, calculate_paye_monthly,
    KENYA_CORPORATE_TAX_RATE_2026, format_kes,
};
use margin_ui::config::AppConfig;
use margin_ui::utils::{parse_amount_or_zero, parse_decimal};
use margin_ui::views::{self, DashboardView, Tab};
use margin_ui::{app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// KRA-Ready: real-time duka profit after KRA, VAT and eTIMS rules.
#[derive(Debug, Parser)]
#[command(name = "kra-ready", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preference store backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    store: Option<String>,

    /// Preference store connection string, e.g. `kra-ready.db` or `:memory:`.
    #[arg(long, global = true)]
    prefs: Option<String>,

    /// Log filter, e.g. `debug` or `margin_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on stderr.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a screen of the dashboard.
    Show(ShowArgs),
    /// Send a simulated M-Pesa STK push and wait for the outcome.
    Bill(BillArgs),
    /// Extra corporate tax caused by a non-eTIMS expense.
    Penalty {
        amount: String,
        /// Corporate tax rate as a fraction.
        #[arg(long)]
        rate: Option<String>,
    },
    /// Monthly PAYE on a gross salary under the 2026 bands.
    Paye { gross_salary: String },
    /// Read or change the stored theme preference.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Debug, clap::Args)]
struct ShowArgs {
    /// Start path: `/` for the dashboard, `/auth` or `/profile`.
    #[arg(default_value = "/")]
    path: String,

    #[arg(long, value_enum, default_value_t = Tab::Home)]
    tab: Tab,

    #[arg(long)]
    gross_sales: Option<String>,

    /// Expense CSV (`label,amount,kind`) replacing the sample list.
    #[arg(long)]
    expenses: Option<PathBuf>,

    /// Log an expense on top of the starting list; repeatable.
    #[arg(long = "add-expense", value_name = "LABEL,AMOUNT[,KIND]")]
    add_expense: Vec<String>,

    /// Amount for the live penalty calculator.
    #[arg(long)]
    penalty_preview: Option<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    business_name: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    kra_pin: Option<String>,

    #[arg(long, default_value = "non-vat")]
    vat_status: VatStatus,

    #[arg(long, default_value = "retail")]
    sector: Sector,
}

#[derive(Debug, clap::Args)]
struct BillArgs {
    #[arg(long)]
    phone: String,

    #[arg(long)]
    amount: String,

    #[arg(long)]
    delay_ms: Option<u64>,

    #[arg(long)]
    failure_rate: Option<f64>,

    /// Seed for a reproducible outcome.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum ThemeAction {
    Get,
    Set { mode: String },
    Toggle,
}

// ─── setup ───────────────────────────────────────────────────────────────────

fn apply_overrides(
    cli: &Cli,
    config: &mut AppConfig,
) {
    if let Some(backend) = &cli.store {
        config.store.backend = backend.clone();
    }
    if let Some(prefs) = &cli.prefs {
        config.store.connection_string = prefs.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }
    if cli.quiet {
        config.logging.console = false;
    }
    match &cli.command {
        Command::Show(args) => {
            if let Some(raw) = &args.gross_sales {
                config.dashboard.gross_sales = Some(parse_amount_or_zero(raw));
            }
            if let Some(path) = &args.expenses {
                config.dashboard.expenses_csv = Some(path.clone());
            }
        }
        Command::Bill(args) => {
            if let Some(delay_ms) = args.delay_ms {
                config.simulator.delay_ms = delay_ms;
            }
            if let Some(rate) = args.failure_rate {
                config.simulator.failure_rate = rate;
            }
            if args.seed.is_some() {
                config.simulator.seed = args.seed;
            }
        }
        _ => {}
    }
}

fn configure_logging(
    cli: &Cli,
    config: &AppConfig,
) -> Result<()> {
    // RUST_LOG already applied at init; an explicit flag or config level wins over it.
    if cli.log_level.is_some() || std::env::var_os("RUST_LOG").is_none() {
        logging::set_log_level(&config.logging.level)?;
    }
    logging::set_console_enabled(config.logging.console)?;
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }
    Ok(())
}

// ─── commands ────────────────────────────────────────────────────────────────

async fn show(
    args: &ShowArgs,
    config: &AppConfig,
) -> Result<String> {
    let route = Route::resolve(&args.path);
    debug!(%route, path = %args.path, "route resolved");
    let mut out = String::new();

    match route {
        Route::Dashboard => {
            let mut state = app::build_dashboard(&config.dashboard)?;
            app::log_expenses(&mut state, &args.add_expense)?;
            let registry = app::build_registry();
            let theme = app::open_desktop_theme_service(&registry, &config.store).await?;
            let view = DashboardView {
                state: &state,
                tab: args.tab,
                theme: theme.get(),
                appearance: theme.effective(),
                penalty_preview: args.penalty_preview.as_deref().map(parse_amount_or_zero),
            };
            views::render_dashboard(&mut out, &view)?;
            out.push('\n');
            views::quick_bill::render(&mut out, &StkPushState::default())?;
        }
        Route::Auth => {
            let outcome = registration(args);
            views::account::render_auth(&mut out, outcome.as_ref())?;
        }
        Route::Profile => {
            let user = registration(args)
                .and_then(Result::ok)
                .unwrap_or_else(UserAccount::placeholder);
            let profile = (args.business_name.is_some() || args.location.is_some()).then(|| {
                BusinessProfile::try_from(ProfileDraft {
                    business_name: args.business_name.clone().unwrap_or_default(),
                    kra_pin: args.kra_pin.clone().unwrap_or_default(),
                    vat_status: args.vat_status,
                    sector: args.sector,
                    location: args.location.clone().unwrap_or_default(),
                })
            });
            views::account::render_profile(&mut out, &user, profile.as_ref())?;
        }
    }
    Ok(out)
}

fn registration(args: &ShowArgs) -> Option<Result<UserAccount, margin_core::AccountError>> {
    if args.name.is_none() && args.phone.is_none() {
        return None;
    }
    Some(UserAccount::register(
        args.name.as_deref().unwrap_or_default(),
        args.phone.as_deref().unwrap_or_default(),
        args.email.as_deref().unwrap_or_default(),
        Utc::now(),
    ))
}

async fn bill(
    args: &BillArgs,
    config: &AppConfig,
) -> Result<String> {
    let simulator = app::build_simulator(&config.simulator)?;
    let request = StkPushRequest::new(args.phone.clone(), parse_amount_or_zero(&args.amount));

    let mut announced = false;
    let settled = app::run_quick_bill(&simulator, request, |pending| {
        let mut lines = String::new();
        if views::quick_bill::render(&mut lines, pending).is_ok() {
            print!("{lines}");
        }
        info!(wait_ms = config.simulator.delay_ms, "waiting for STK callback");
        announced = true;
    })
    .await?;

    let mut out = String::new();
    views::quick_bill::render(&mut out, &settled)?;
    if announced {
        // The header went out with the pending line.
        out = out.lines().last().map(|line| format!("{line}\n")).unwrap_or_default();
    }
    Ok(out)
}

fn penalty(
    amount: &str,
    rate: Option<&str>,
) -> Result<String> {
    let amount = parse_amount_or_zero(amount);
    let rate = match rate {
        Some(raw) => parse_decimal(raw)?,
        None => KENYA_CORPORATE_TAX_RATE_2026,
    };
    if !(Decimal::ZERO..=Decimal::ONE).contains(&rate) {
        bail!("rate must be a fraction between 0 and 1, got {rate}");
    }
    let extra = calculate_non_compliant_expense_penalty(amount, rate);
    Ok(format!(
        "Extra tax on an informal cost of {}: {}\n",
        format_kes(amount),
        format_kes(extra)
    ))
}

fn paye(gross_salary: &str) -> String {
    let gross = parse_amount_or_zero(gross_salary);
    let tax = calculate_paye_monthly(gross);
    format!(
        "Monthly PAYE on {}: {}\nNet after PAYE: {}\n",
        format_kes(gross),
        format_kes(tax),
        format_kes(gross - tax)
    )
}

async fn theme(
    action: &ThemeAction,
    config: &AppConfig,
) -> Result<String> {
    let registry = app::build_registry();
    let service = app::open_desktop_theme_service(&registry, &config.store).await?;

    let mode = match action {
        ThemeAction::Get => service.get(),
        ThemeAction::Set { mode } => {
            let mode = ThemeMode::parse(mode.trim())
                .with_context(|| format!("unknown theme '{mode}'; use light, dark or system"))?;
            service.set(mode).await?;
            mode
        }
        ThemeAction::Toggle => service.toggle().await?,
    };
    Ok(format!("{mode} ({})\n", service.effective()))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    apply_overrides(&cli, &mut config);
    configure_logging(&cli, &config)?;
    debug!(?config, "configuration loaded");

    let output = match &cli.command {
        Command::Show(args) => show(args, &config).await?,
        Command::Bill(args) => bill(args, &config).await?,
        Command::Penalty { amount, rate } => penalty(amount, rate.as_deref())?,
        Command::Paye { gross_salary } => paye(gross_salary),
        Command::Theme { action } => theme(action, &config).await?,
    };
    print!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn penalty_defaults_to_corporate_rate() {
        assert_eq!(
            penalty("10,000", None).unwrap(),
            "Extra tax on an informal cost of KES 10,000: KES 3,000\n"
        );
    }

    #[test]
    fn penalty_rejects_rate_above_one() {
        assert!(penalty("100", Some("30")).is_err());
    }

    #[test]
    fn paye_reports_tax_and_net() {
        assert_eq!(
            paye("24000"),
            "Monthly PAYE on KES 24,000: KES 2,400\nNet after PAYE: KES 21,600\n"
        );
    }

    #[test]
    fn show_flags_override_dashboard_config() {
        let cli = Cli::parse_from(["kra-ready", "--store", "memory", "show", "--gross-sales", "80,000"]);
        let mut config = AppConfig::default();

        apply_overrides(&cli, &mut config);

        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.dashboard.gross_sales, Some(Decimal::from(80000)));
    }

    #[test]
    fn bill_flags_override_simulator_config() {
        let cli = Cli::parse_from([
            "kra-ready", "bill", "--phone", "0712345678", "--amount", "100", "--failure-rate", "0",
            "--seed", "9", "--delay-ms", "5",
        ]);
        let mut config = AppConfig::default();

        apply_overrides(&cli, &mut config);

        assert_eq!(config.simulator.failure_rate, 0.0);
        assert_eq!(config.simulator.seed, Some(9));
        assert_eq!(config.simulator.delay_ms, 5);
    }

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.store.backend = "memory".to_string();
        config
    }

    #[tokio::test]
    async fn added_expenses_follow_the_sample_list() {
        let cli = Cli::parse_from([
            "kra-ready", "show", "--tab", "expenses", "--add-expense", "Boda delivery,450,informal",
            "--add-expense", "  Rent ,8,000",
        ]);
        let Command::Show(args) = &cli.command else {
            panic!("expected show");
        };

        let out = show(args, &memory_config()).await.unwrap();

        assert!(out.contains("eTIMS: 2 · Informal: 2"));
        assert!(out.contains("Boda delivery"));
        assert!(out.contains("KES 8,000"));
        let fuel = out.find("Cash fuel (no receipt)").unwrap();
        let boda = out.find("Boda delivery").unwrap();
        assert!(fuel < boda);
    }

    #[tokio::test]
    async fn added_expense_with_bad_amount_is_rejected() {
        let cli = Cli::parse_from(["kra-ready", "show", "--add-expense", "Sugar,lots,informal"]);
        let Command::Show(args) = &cli.command else {
            panic!("expected show");
        };

        let err = show(args, &memory_config()).await.unwrap_err();

        assert!(format!("{err:#}").contains("amount must be greater than zero"));
    }

    #[tokio::test]
    async fn added_expense_with_blank_label_is_rejected() {
        let cli = Cli::parse_from(["kra-ready", "show", "--add-expense", "   ,100"]);
        let Command::Show(args) = &cli.command else {
            panic!("expected show");
        };

        let err = show(args, &memory_config()).await.unwrap_err();

        assert!(format!("{err:#}").contains("expense label is required"));
    }

    #[tokio::test]
    async fn profile_route_uses_placeholder_user() {
        let cli = Cli::parse_from(["kra-ready", "show", "/profile", "--business-name", "Umoja Duka"]);
        let Command::Show(args) = &cli.command else {
            panic!("expected show");
        };

        let out = show(args, &AppConfig::default()).await.unwrap();

        assert!(out.starts_with("Hi Duka,"));
        assert!(out.contains("Cannot save profile: location is required."));
    }

    #[tokio::test]
    async fn auth_route_registers_account() {
        let cli = Cli::parse_from([
            "kra-ready", "show", "/auth", "--name", "Achieng Otieno", "--phone", "0722000111",
        ]);
        let Command::Show(args) = &cli.command else {
            panic!("expected show");
        };

        let out = show(args, &AppConfig::default()).await.unwrap();

        assert!(out.contains("Welcome, Achieng."));
    }
}
