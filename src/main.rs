use anyhow::{Context, bail};
use api_client::{EvaluatorClient, HttpTransport};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use config_store::{ConfigStore, DocumentSource, Fallback, StoreError};
use configuration::{CoercionPolicy, Settings, init_tracing, load_settings};
use core_types::{DealField, DealResult, format_multiple};
use deal_form::{
    DealForm, SubmitOutcome, industry_options, security_type_options, submit_deal,
};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde_json::Value;
use session::EvaluationSession;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// The main entry point for the Dealflow client.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Overrides such as DEALFLOW__API__BASE_URL may live in a .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(base_url) = cli.base_url {
        settings.api.base_url = base_url;
    }
    if let Some(coercion) = cli.coercion {
        settings.store.coercion = coercion;
    }

    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = init_tracing(&settings.logging).context("Failed to initialise logging")?;

    let client = connect(&settings)?;

    match cli.command {
        Commands::Evaluate(args) => handle_evaluate(args, client, &settings).await,
        Commands::UploadCsv(args) => handle_upload_csv(args, client).await,
        Commands::Industries => handle_industries(client, &settings).await,
        Commands::Config(ConfigCommand::Show) => handle_config_show(client, &settings).await,
        Commands::Config(ConfigCommand::Update(args)) => {
            handle_config_update(args, client, &settings).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Submit deals to the evaluator and keep its model configuration in sync.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file to load instead of ./dealflow.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluator address, overriding api.base_url.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// How unparseable configuration edits are treated.
    #[arg(long, global = true, value_enum)]
    coercion: Option<CoercionPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a deal locally and submit it for evaluation.
    Evaluate(EvaluateArgs),
    /// Upload a CSV of deals and print the evaluator's results.
    UploadCsv(UploadCsvArgs),
    /// List the selectable industries with their multiples.
    Industries,
    /// Inspect or edit the model configuration and industry multiples.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the current configuration and multiple table.
    Show,
    /// Edit values and save both documents back to the evaluator.
    Update(UpdateArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

/// Every field is passed as typed; validation happens on submit.
#[derive(Parser)]
struct EvaluateArgs {
    #[arg(long, default_value = "")]
    company_name: String,
    #[arg(long, default_value = "")]
    industry: String,
    #[arg(long, default_value = "")]
    ask: String,
    #[arg(long, default_value = "")]
    valuation_cap: String,
    #[arg(long, default_value = "", help = security_type_help())]
    security_type: String,
    /// Percent, 0 to 100.
    #[arg(long, default_value = "")]
    discount_rate: String,
    /// Percent, 0 to 100.
    #[arg(long, default_value = "")]
    interest: String,
    /// Comma-separated, e.g. "5000, 10000, 15000".
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    yearly_revenue: String,
    #[arg(long, default_value = "")]
    monthly_burn: String,
    #[arg(long, default_value = "")]
    current_cash: String,
    /// Optional; blank counts as zero.
    #[arg(long, default_value = "")]
    previous_raise: String,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

impl EvaluateArgs {
    fn value(&self, field: DealField) -> &str {
        match field {
            DealField::CompanyName => &self.company_name,
            DealField::Industry => &self.industry,
            DealField::Ask => &self.ask,
            DealField::ValuationCap => &self.valuation_cap,
            DealField::SecurityType => &self.security_type,
            DealField::DiscountRate => &self.discount_rate,
            DealField::Interest => &self.interest,
            DealField::YearlyRevenue => &self.yearly_revenue,
            DealField::MonthlyBurn => &self.monthly_burn,
            DealField::CurrentCash => &self.current_cash,
            DealField::PreviousRaise => &self.previous_raise,
        }
    }
}

fn security_type_help() -> String {
    let labels: Vec<String> = security_type_options()
        .iter()
        .map(|security| format!("\"{}\"", security.label()))
        .collect();
    format!("One of {}.", labels.join(", "))
}

#[derive(Parser)]
struct UploadCsvArgs {
    /// The CSV file to upload.
    path: PathBuf,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Parser)]
struct UpdateArgs {
    /// A model assumption, e.g. --set modeled_discount_rate=0.25
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// An industry multiple, e.g. --multiple Software=3.5
    #[arg(long = "multiple", value_name = "INDUSTRY=VALUE")]
    multiple: Vec<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn connect(settings: &Settings) -> anyhow::Result<EvaluatorClient> {
    let transport = HttpTransport::new(&settings.api).context("Failed to build the HTTP client")?;
    tracing::debug!(base_url = transport.base_url(), "Evaluator transport ready.");
    Ok(EvaluatorClient::new(Arc::new(transport)))
}

fn spinner(message: &'static str) -> anyhow::Result<ProgressBar> {
    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}

/// Loads the multiple table, falling back to the built-in one when the
/// evaluator cannot be reached.
async fn load_industries(store: &mut ConfigStore) -> anyhow::Result<()> {
    let progress = spinner("Loading industry multiples...")?;
    if let Err(err) = store.load_multiples().await {
        tracing::warn!(error = %err, "Using the built-in industry multiples.");
    }
    progress.finish_and_clear();
    Ok(())
}

async fn handle_evaluate(
    args: EvaluateArgs,
    client: EvaluatorClient,
    settings: &Settings,
) -> anyhow::Result<()> {
    let mut store = ConfigStore::new(client.clone(), Fallback::default(), settings.store.coercion);
    load_industries(&mut store).await?;

    let mut form = DealForm::new();
    for field in DealField::ALL {
        form.set_field(field.as_str(), args.value(field))
            .with_context(|| format!("Invalid --{}", field.as_str().replace('_', "-")))?;
    }
    let form = Mutex::new(form);
    let session = EvaluationSession::new(client);

    let progress = spinner("Evaluating deal...")?;
    let outcome = submit_deal(&form, store.multiples(), &session).await;
    progress.finish_and_clear();

    match outcome {
        SubmitOutcome::Evaluated(result) => {
            print_results(&[result], args.format);
            Ok(())
        }
        SubmitOutcome::Invalid(err) => bail!("Deal rejected: {err}"),
        SubmitOutcome::Failed(message) => bail!(message),
        SubmitOutcome::Busy => bail!("A submission is already in progress."),
    }
}

async fn handle_upload_csv(args: UploadCsvArgs, client: EvaluatorClient) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let file_name = args
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("deals.csv")
        .to_string();

    let session = EvaluationSession::new(client);
    let progress = spinner("Uploading CSV...")?;
    let response = session.submit_csv(&file_name, bytes).await;
    progress.finish_and_clear();

    let response = response.context("Failed to evaluate the CSV")?;
    print_results(&response.results, args.format);
    Ok(())
}

async fn handle_industries(client: EvaluatorClient, settings: &Settings) -> anyhow::Result<()> {
    let mut store = ConfigStore::new(client, Fallback::default(), settings.store.coercion);
    load_industries(&mut store).await?;

    let mut table = Table::new();
    table.set_header(vec!["Industry", "Multiple"]);
    for option in industry_options(store.multiples()) {
        let multiple = option.multiple_label();
        table.add_row(vec![option.name, multiple]);
    }
    println!("{table}");
    if store.multiples_source() == DocumentSource::Fallback {
        println!("(evaluator unreachable: showing built-in multiples)");
    }
    Ok(())
}

async fn handle_config_show(client: EvaluatorClient, settings: &Settings) -> anyhow::Result<()> {
    let mut store = ConfigStore::new(client, Fallback::default(), settings.store.coercion);

    let progress = spinner("Loading configuration...")?;
    if let Err(err) = store.load_config().await {
        tracing::warn!(error = %err, "Showing the default model configuration.");
    }
    if let Err(err) = store.load_multiples().await {
        tracing::warn!(error = %err, "Showing the built-in industry multiples.");
    }
    progress.finish_and_clear();

    print_store(&store);
    Ok(())
}

async fn handle_config_update(
    args: UpdateArgs,
    client: EvaluatorClient,
    settings: &Settings,
) -> anyhow::Result<()> {
    let mut store = ConfigStore::new(client, Fallback::default(), settings.store.coercion);

    // Saving writes whole documents, so never start from the fallback here.
    let progress = spinner("Loading configuration...")?;
    let loaded = async {
        store.load_config().await?;
        store.load_multiples().await?;
        Ok::<(), StoreError>(())
    }
    .await;
    progress.finish_and_clear();
    loaded.context("Failed to load the current configuration")?;

    for assignment in &args.set {
        let (name, raw) = split_assignment(assignment)?;
        store
            .set_config_field(name, raw)
            .with_context(|| format!("Invalid --set {assignment}"))?;
    }
    for assignment in &args.multiple {
        let (industry, raw) = split_assignment(assignment)?;
        store
            .set_multiple(industry, raw)
            .with_context(|| format!("Invalid --multiple {assignment}"))?;
    }

    let progress = spinner("Saving configuration...")?;
    let saved = store.save().await;
    progress.finish_and_clear();

    match saved {
        Ok(()) => {
            print_store(&store);
            println!("Configuration and industry multiples saved.");
            Ok(())
        }
        Err(err @ StoreError::PartialSave(_)) => {
            bail!("{err}. The model configuration was saved; rerun to retry the multiples.")
        }
        Err(err) => Err(err).context("Nothing was saved"),
    }
}

fn split_assignment(assignment: &str) -> anyhow::Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, raw)) if !name.trim().is_empty() => Ok((name.trim(), raw)),
        _ => bail!("Expected NAME=VALUE, got `{assignment}`"),
    }
}

// ==============================================================================
// Rendering
// ==============================================================================

fn decimal_cell(value: Decimal) -> String {
    value.normalize().to_string()
}

fn source_label(source: DocumentSource) -> &'static str {
    match source {
        DocumentSource::Loaded => "evaluator",
        DocumentSource::Fallback => "built-in defaults",
    }
}

fn print_store(store: &ConfigStore) {
    let mut config = Table::new();
    config.set_header(vec!["Field", "Assumption", "Value"]);
    for (field, value) in store.config().entries() {
        config.add_row(vec![
            field.as_str().to_string(),
            field.label().to_string(),
            decimal_cell(value),
        ]);
    }
    println!("Model configuration ({})", source_label(store.config_source()));
    println!("{config}");

    let mut multiples = Table::new();
    multiples.set_header(vec!["Industry", "Multiple"]);
    for (industry, multiple) in store.multiples().iter() {
        multiples.add_row(vec![industry.to_string(), format_multiple(multiple)]);
    }
    println!("Industry multiples ({})", source_label(store.multiples_source()));
    println!("{multiples}");
}

fn print_results(results: &[DealResult], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for result in results {
                println!("{}", result.to_pretty_json());
            }
        }
        OutputFormat::Table => {
            for result in results {
                println!("{}", result_table(result));
            }
        }
    }
}

/// Renders a result object as one row per key. Anything else is shown as JSON.
fn result_table(result: &DealResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    match result.as_value() {
        Value::Object(entries) => {
            for (key, value) in entries {
                table.add_row(vec![key.clone(), value_cell(value)]);
            }
        }
        other => {
            table.add_row(vec!["result".to_string(), other.to_string()]);
        }
    }
    table
}

fn value_cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(value_cell).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
