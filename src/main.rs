use clap::{Parser, ValueEnum};
use coursepay::application::controller::PaymentController;
use coursepay::application::loader::CachedScriptLoader;
use coursepay::config::GatewayConfig;
use coursepay::domain::payment::{GatewayFailure, GatewayResponse, PaymentOutcome};
use coursepay::domain::ports::{EnrollmentStoreBox, ScriptLoaderBox};
use coursepay::domain::session::SessionPhase;
use coursepay::domain::user::UserContext;
use coursepay::infrastructure::in_memory::{InMemoryEnrollmentStore, InMemoryGateway, StaticFetcher};
use coursepay::interfaces::json::report_writer::{ReportWriter, SessionReport};
use coursepay::interfaces::json::request_reader::RequestReader;
use coursepay::logging;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info, warn};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScriptSource {
    /// Fetch the checkout bundle over HTTP(S).
    Http,
    /// Treat the bundle as already present.
    Bundled,
    /// Behave as if the network were down.
    Offline,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Simulation {
    Success,
    Failure,
    Dismiss,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Payment request JSON file
    input: PathBuf,

    /// Authenticated user id. Without it the payment is refused.
    #[arg(long)]
    user_id: Option<String>,

    #[arg(long)]
    user_name: Option<String>,

    #[arg(long)]
    user_email: Option<String>,

    #[arg(long)]
    user_phone: Option<String>,

    /// Publishable gateway key.
    #[arg(long, env = "GATEWAY_KEY_ID")]
    gateway_key: Option<String>,

    #[arg(long, value_enum, default_value_t = ScriptSource::Bundled)]
    script_source: ScriptSource,

    /// Terminal event the simulated checkout widget fires.
    #[arg(long, value_enum, default_value_t = Simulation::Success)]
    simulate: Simulation,

    #[arg(long, default_value = "pay_simulated")]
    payment_id: String,

    /// Gateway order id; defaults to the request's order id.
    #[arg(long)]
    order_id: Option<String>,

    #[arg(long, default_value = "")]
    signature: String,

    #[arg(long, default_value = "BAD_REQUEST_ERROR")]
    failure_code: String,

    #[arg(long, default_value = "Payment declined by the issuing bank")]
    failure_description: String,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_level(cli.log_level);

    let file = File::open(&cli.input).into_diagnostic()?;
    let request = RequestReader::new(file).read_request().into_diagnostic()?;

    let mut config = GatewayConfig::from_env();
    if let Some(key) = &cli.gateway_key {
        config = config.with_key_id(key.as_str());
    }

    let gateway = InMemoryGateway::new();
    match cli.simulate {
        Simulation::Success => gateway.push_outcome(PaymentOutcome::Success(GatewayResponse {
            payment_id: cli.payment_id.clone(),
            order_id: cli
                .order_id
                .clone()
                .or_else(|| request.order_id.clone())
                .unwrap_or_default(),
            signature: cli.signature.clone(),
        })),
        Simulation::Failure => gateway.push_outcome(PaymentOutcome::Failure(GatewayFailure {
            code: cli.failure_code.clone(),
            description: cli.failure_description.clone(),
        })),
        Simulation::Dismiss => gateway.push_dismissal(),
    }

    let user = cli.user_id.as_deref().map(|uid| UserContext {
        display_name: cli.user_name.clone(),
        email: cli.user_email.clone(),
        phone_number: cli.user_phone.clone(),
        ..UserContext::new(uid)
    });

    let controller = PaymentController::new(
        config,
        script_loader(cli.script_source)?,
        Arc::new(gateway.clone()),
        enrollment_store(cli.db_path)?,
    )
    .with_user(user)
    .with_success_callback(|enrollment_id, course_id| {
        info!(%enrollment_id, %course_id, "enrollment confirmed");
    });

    match controller.initiate(request).await {
        Ok(handle) => {
            handle.outcome().await.into_diagnostic()?;
        }
        Err(e) => warn!(error = %e, "checkout was not opened"),
    }

    let state = controller.state();
    let outcome = match &state.phase {
        SessionPhase::Done(outcome) => Some(outcome.clone()),
        _ => None,
    };
    let report = SessionReport::new(&state, outcome, gateway.opened().into_iter().next());

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_report(&report).into_diagnostic()?;

    Ok(())
}

fn script_loader(source: ScriptSource) -> Result<ScriptLoaderBox> {
    let loader: ScriptLoaderBox = match source {
        ScriptSource::Http => http_loader()?,
        ScriptSource::Bundled => Arc::new(CachedScriptLoader::new(StaticFetcher::available())),
        ScriptSource::Offline => Arc::new(CachedScriptLoader::new(StaticFetcher::unavailable())),
    };
    Ok(loader)
}

#[cfg(feature = "http-loader")]
fn http_loader() -> Result<ScriptLoaderBox> {
    use coursepay::infrastructure::http::HttpFetcher;

    let fetcher = HttpFetcher::new().into_diagnostic()?;
    Ok(Arc::new(CachedScriptLoader::new(fetcher)))
}

#[cfg(not(feature = "http-loader"))]
fn http_loader() -> Result<ScriptLoaderBox> {
    warn!(
        "WARNING: HTTP script loading requested, but 'http-loader' feature is not enabled. Falling back to the bundled SDK."
    );
    Ok(Arc::new(CachedScriptLoader::new(StaticFetcher::available())))
}

#[cfg(feature = "storage-rocksdb")]
fn enrollment_store(db_path: Option<PathBuf>) -> Result<EnrollmentStoreBox> {
    use coursepay::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryEnrollmentStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn enrollment_store(db_path: Option<PathBuf>) -> Result<EnrollmentStoreBox> {
    if db_path.is_some() {
        warn!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Arc::new(InMemoryEnrollmentStore::new()))
}
