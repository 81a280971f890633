//! Churnwise CLI
//!
//! Command-line front end for the churn dashboard:
//! - Dashboard statistics
//! - Customer lookup with retention offers
//! - Churn prediction from a customer form
//! - Support chat
//! - Service health and accounts

use anyhow::Context;
use churnwise::config::{generate_default_config, LoggingConfig};
use churnwise::stats::{format_stat, DisplayFormat};
use churnwise::{
    encode, ChatSession, ChurnBackend, Config, CustomerForm, CustomerView, DashboardData,
    DashboardService, DatasetBackend, FeatureVector, FormField, HttpBackend, Notice,
    PredictionResult,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "churnwise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Customer churn analytics from the command line")]
#[command(long_about = "Churnwise talks to a churn prediction service.\nInspect churn statistics, look up customers, predict churn risk and ask the support chat.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Churn service URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Read stats and customers from a local Telco churn CSV instead of the service
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show churn statistics
    Stats,

    /// Look up a customer profile
    Customer {
        /// Customer ID (e.g. 7590-VHVEG)
        id: String,
    },

    /// Predict churn risk for a customer
    Predict {
        /// Form file (TOML or JSON) with the customer's answers
        #[arg(long)]
        form: Option<PathBuf>,

        #[command(flatten)]
        answers: FormArgs,

        /// Print the encoded feature vector without calling the service
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask the support chat (interactive when no question is given)
    Chat {
        /// Question
        query: Vec<String>,
    },

    /// Check churn service health
    Health,

    /// Log in and print an access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Form answers given as flags; they override the form file
#[derive(Args, Default)]
pub struct FormArgs {
    /// No or Yes
    #[arg(long)]
    pub senior_citizen: Option<String>,
    #[arg(long)]
    pub partner: Option<String>,
    #[arg(long)]
    pub dependents: Option<String>,
    /// Months with the company
    #[arg(long)]
    pub tenure: Option<String>,
    /// DSL, Fiber optic or No
    #[arg(long)]
    pub internet_service: Option<String>,
    #[arg(long)]
    pub online_security: Option<String>,
    #[arg(long)]
    pub online_backup: Option<String>,
    #[arg(long)]
    pub device_protection: Option<String>,
    #[arg(long)]
    pub tech_support: Option<String>,
    #[arg(long)]
    pub streaming_tv: Option<String>,
    #[arg(long)]
    pub streaming_movies: Option<String>,
    /// Month-to-month, One year or Two year
    #[arg(long)]
    pub contract: Option<String>,
    #[arg(long)]
    pub paperless_billing: Option<String>,
    /// Bank transfer (automatic), Credit card (automatic), Electronic check or Mailed check
    #[arg(long)]
    pub payment_method: Option<String>,
    #[arg(long)]
    pub monthly_charges: Option<String>,
    #[arg(long)]
    pub total_charges: Option<String>,
}

impl FormArgs {
    fn to_form(&self) -> CustomerForm {
        let answers = [
            (FormField::SeniorCitizen, &self.senior_citizen),
            (FormField::Partner, &self.partner),
            (FormField::Dependents, &self.dependents),
            (FormField::Tenure, &self.tenure),
            (FormField::InternetService, &self.internet_service),
            (FormField::OnlineSecurity, &self.online_security),
            (FormField::OnlineBackup, &self.online_backup),
            (FormField::DeviceProtection, &self.device_protection),
            (FormField::TechSupport, &self.tech_support),
            (FormField::StreamingTV, &self.streaming_tv),
            (FormField::StreamingMovies, &self.streaming_movies),
            (FormField::Contract, &self.contract),
            (FormField::PaperlessBilling, &self.paperless_billing),
            (FormField::PaymentMethod, &self.payment_method),
            (FormField::MonthlyCharges, &self.monthly_charges),
            (FormField::TotalCharges, &self.total_charges),
        ];

        let mut form = CustomerForm::new();
        for (field, value) in answers {
            if let Some(value) = value {
                form.set(field, value.as_str());
            }
        }
        form
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.backend.url = url;
    }
    if let Some(path) = cli.dataset {
        config.dataset.path = Some(path);
    }

    init_tracing(&config.logging);
    tracing::debug!("Churnwise CLI v{}", env!("CARGO_PKG_VERSION"));

    let format = cli.format;

    match cli.command {
        Commands::Stats => {
            let data = connect(&config)?
                .load_stats()
                .await
                .unwrap_or_else(|e| fail(&e.notice(), &e));

            match format {
                OutputFormat::Json => print_json(&data)?,
                OutputFormat::Table => print_stats(&data),
            }
        }

        Commands::Customer { id } => {
            let view = connect(&config)?
                .lookup_customer(&id)
                .await
                .unwrap_or_else(|e| fail(&e.notice(), &e));

            match format {
                OutputFormat::Json => print_json(&view)?,
                OutputFormat::Table => print_customer(&view),
            }
        }

        Commands::Predict {
            form,
            answers,
            dry_run,
        } => {
            let mut customer = match &form {
                Some(path) => load_form(path)?,
                None => CustomerForm::new(),
            };
            customer.merge(&answers.to_form());

            if dry_run {
                let features = encode(&customer).unwrap_or_else(|e| {
                    let err = churnwise::DashboardError::from(e);
                    fail(&err.notice(), &err)
                });
                match format {
                    OutputFormat::Json => print_json(&features)?,
                    OutputFormat::Table => print_features(&features),
                }
                return Ok(());
            }

            let result = connect(&config)?
                .predict_churn(&customer)
                .await
                .unwrap_or_else(|e| fail(&e.notice(), &e));

            match format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Table => print_prediction(&result),
            }
        }

        Commands::Chat { query } => {
            let backend = open_backend(&config)?;
            let mut session = ChatSession::new();
            let json = format == OutputFormat::Json;

            if !query.is_empty() {
                if let Some(outcome) = session.ask(backend.as_ref(), &query.join(" ")).await {
                    if let Some(notice) = &outcome.notice {
                        print_notice(notice);
                    }
                    println!("{}", chat_output(&session, &outcome.reply, format)?);
                }
            } else {
                chat_loop(&mut session, backend.as_ref(), !json).await?;
                if json {
                    print_json(&session)?;
                }
            }
        }

        Commands::Health => {
            let backend = open_backend(&config)?;
            let health = backend
                .health()
                .await
                .with_context(|| format!("Health check against {} failed", backend.name()))?;

            match format {
                OutputFormat::Json => print_json(&health)?,
                OutputFormat::Table => match &health.reason {
                    Some(reason) => println!("Status: {} ({})", health.status, reason),
                    None => println!("Status: {}", health.status),
                },
            }

            if !health.is_up() {
                std::process::exit(1);
            }
        }

        Commands::Login { email, password } => {
            let backend = open_backend(&config)?;
            let token = backend.login(&email, &password).await.context("Login failed")?;

            match format {
                OutputFormat::Json => print_json(&token)?,
                OutputFormat::Table => {
                    println!("{}", token.access_token);
                    eprintln!("Set CHURNWISE_API_TOKEN or [backend] token to use it for predictions");
                }
            }
        }

        Commands::Register { email, password } => {
            let backend = open_backend(&config)?;
            let message = backend
                .register(&email, &password)
                .await
                .context("Registration failed")?;
            println!("{}", message);
        }

        Commands::Config { output } => write_default_config(output.as_deref())?,
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("churnwise={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    // stderr keeps stdout clean for --format json
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn connect(config: &Config) -> anyhow::Result<DashboardService> {
    Ok(DashboardService::new(open_backend(config)?))
}

fn open_backend(config: &Config) -> anyhow::Result<Arc<dyn ChurnBackend>> {
    if let Some(path) = &config.dataset.path {
        let backend = DatasetBackend::open(path)
            .with_context(|| format!("Failed to load dataset {}", path.display()))?;
        return Ok(Arc::new(backend));
    }

    let backend = HttpBackend::new(config.backend.clone()).context("Failed to create HTTP client")?;
    tracing::debug!(url = %config.backend.url, "Using churn service");
    Ok(Arc::new(backend))
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Read a form file; `.json` files are JSON, anything else TOML
fn load_form(path: &Path) -> anyhow::Result<CustomerForm> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read form {}", path.display()))?;

    let form = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON form {}", path.display()))?
    } else {
        toml::from_str(&content).with_context(|| format!("Invalid TOML form {}", path.display()))?
    };

    Ok(form)
}

/// Read questions from stdin until EOF or `exit`
///
/// With `replies_to_stdout` off (JSON output), replies go to stderr so stdout
/// only carries the final transcript.
async fn chat_loop(
    session: &mut ChatSession,
    backend: &dyn ChurnBackend,
    replies_to_stdout: bool,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Ask about your account (Ctrl-D to quit)");
    loop {
        eprint!("> ");
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        if let Some(outcome) = session.ask(backend, &line).await {
            if let Some(notice) = &outcome.notice {
                print_notice(notice);
            }
            if replies_to_stdout {
                println!("{}", outcome.reply);
            } else {
                eprintln!("{}", outcome.reply);
            }
        }
    }

    Ok(())
}

/// Stdout for a one-shot question: the reply, or only the transcript as JSON
fn chat_output(session: &ChatSession, reply: &str, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Table => reply.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(session)?,
    })
}

fn print_notice(notice: &Notice) {
    eprintln!("{}: {}", notice.title, notice.description);
}

/// Print the notice for a failed operation and exit
fn fail(notice: &Notice, error: &dyn std::fmt::Display) -> ! {
    tracing::debug!(error = %error, "Operation failed");
    print_notice(notice);
    std::process::exit(1);
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_stats(data: &DashboardData) {
    for card in data.cards() {
        println!("{:<22} {}", card.label, card.value);
    }
    println!(
        "{:<22} {}",
        "Active Customers",
        format_stat(data.active_customers, DisplayFormat::Round, None)
    );

    let slices = data.distribution();
    if !slices.is_empty() {
        println!("\nChurn Distribution");
        println!("{}", "-".repeat(34));
        for slice in slices {
            println!(
                "{:<12} {:>10} {:>10}",
                slice.name,
                format_stat(Some(slice.value), DisplayFormat::Round, None),
                format_stat(Some(slice.share), DisplayFormat::Percent, Some("%"))
            );
        }
    }

    println!("\nChurn Trend");
    println!("{}", "-".repeat(34));
    for point in data.churn_trend_or_default() {
        println!("{:<12} {:>9.1}%", point.month, point.churn_rate);
    }

    println!("\nChurn Reasons");
    println!("{}", "-".repeat(34));
    for reason in data.churn_reasons_or_default() {
        println!("{:<20} {:>9.1}%", reason.reason, reason.percentage);
    }
}

fn print_customer(view: &CustomerView) {
    let p = &view.profile;
    let rows = [
        ("Customer ID", p.customer_id.clone()),
        ("Gender", p.gender.clone()),
        ("Senior Citizen", if p.is_senior() { "Yes" } else { "No" }.to_string()),
        ("Partner", p.partner.clone()),
        ("Dependents", p.dependents.clone()),
        ("Tenure", format!("{} months", p.tenure)),
        ("Contract", p.contract.clone()),
        ("Paperless Billing", p.paperless_billing.clone()),
        ("Payment Method", p.payment_method.clone()),
        ("Monthly Charges", format_stat(Some(p.monthly_charges), DisplayFormat::Currency, None)),
        ("Total Charges", format_stat(Some(p.total_charges), DisplayFormat::Currency, None)),
        ("Churn", p.churn.clone()),
    ];
    for (label, value) in rows {
        println!("{:<20} {}", label, value);
    }

    println!("\nServices");
    println!("{}", "-".repeat(30));
    for service in &view.services {
        let mark = if service.active { "✓" } else { "✗" };
        println!("{} {}", mark, service.name);
    }

    if !view.offers.is_empty() {
        println!("\nRetention Offers");
        println!("{}", "-".repeat(70));
        for offer in view.offers {
            println!("{:<26} {:>3}%  {}", offer.title, offer.success_rate, offer.description);
        }
    }
}

fn print_features(features: &FeatureVector) {
    for (name, value) in features.iter() {
        println!("{:<36} {}", name, value);
    }
}

fn print_prediction(result: &PredictionResult) {
    println!("Churn Prediction: {}", result.prediction.label());
    if let Some(percent) = result.prediction.probability_percent() {
        println!(
            "Probability: {}%",
            format_stat(Some(percent / 100.0), DisplayFormat::Percent, None)
        );
    }
}
