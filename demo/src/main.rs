//! VaidyaConnect command-line front end.
//!
//! Drives the server action facade against a local Ollama model, or against
//! canned answers with `--offline`.
//!
//! Usage:
//!   cargo run -p demo -- patients
//!   cargo run -p demo -- translate Agnimandya --context "bloating after meals"
//!   cargo run -p demo -- --offline interactions 1
//!   cargo run -p demo -- emr Agnimandya --patient 1
//!   cargo run -p demo -- history export --out codes.csv

mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vaidya_auth::{from_config, password_digest, AuthConfig, UserRecord};
use vaidya_clinical::{
    fixtures::{find_patient, patients},
    ClinicalOperations, EmrRequest, Patient, ServerActions,
};
use vaidya_contracts::{
    auth::{AuthContext, Credentials},
    envelope::ResultEnvelope,
    error::{VaidyaError, VaidyaResult},
    operation::{OperationOutput, TranslateTermInput},
};
use vaidya_core::{traits::ModelTransport, InvocationAdapter};
use vaidya_history::CodeHistory;
use vaidya_transport::{OllamaTransport, ScriptedTransport};
use vaidya_verify::SchemaValidator;

use crate::config::AppConfig;

// ── CLI definition ────────────────────────────────────────────────────────────

/// VaidyaConnect: AYUSH and allopathic clinical assistance backed by an LLM.
#[derive(Parser)]
#[command(
    name = "vaidya",
    about = "VaidyaConnect clinical assistant",
    long_about = "Translates AYUSH terms into standardized codes, suggests integrated\n\
                  treatments, predicts disease progression and flags drug interactions\n\
                  for the demo patient dossiers."
)]
struct Cli {
    /// Configuration file (defaults to ./vaidya.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    email: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    /// Answer from canned responses instead of calling the model.
    #[arg(long, global = true)]
    offline: bool,

    /// Print the raw result envelope as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the demo patients, or show one dossier.
    Patients {
        /// Patient id to show in full.
        id: Option<String>,
    },
    /// Translate an AYUSH term into standardized medical codes.
    Translate {
        term: String,
        #[arg(long)]
        context: Option<String>,
    },
    /// Suggest integrated treatments for a patient.
    Suggest { patient: String },
    /// Predict disease progression for a patient.
    Predict { patient: String },
    /// Identify interactions between a patient's AYUSH and allopathic medications.
    Interactions { patient: String },
    /// Code an EMR diagnosis and record it in the history.
    Emr {
        diagnosis: String,
        #[arg(long)]
        context: Option<String>,
        #[arg(long)]
        patient: Option<String>,
    },
    /// Inspect the code history.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Register a user and print its configuration entry.
    Signup {
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List entries, most recent first.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Export entries as CSV.
    Export {
        #[arg(long)]
        search: Option<String>,
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Archive an entry by id.
    Archive { id: String },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    // Set RUST_LOG=debug for pipeline detail.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> VaidyaResult<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Patients { id } => return show_patients(id.as_deref()),
        Command::Signup { name } => return signup(&cli, &config.auth, name),
        _ => {}
    }

    let ctx = authenticate(&cli, &config.auth)?;
    let actions = build_actions(&config, cli.offline)?;
    let cancel = cancel_on_ctrl_c();
    let json = cli.json;

    let code = match cli.command {
        Command::Translate { term, context } => {
            let input = TranslateTermInput {
                ayush_term: term,
                context,
            };
            let envelope = actions.get_translated_term(&ctx, &input, &cancel).await;
            report_output(envelope, json)
        }
        Command::Suggest { patient } => {
            let input = patient_by_id(&patient)?.suggest_treatment_input();
            let envelope = actions.get_personalized_treatments(&ctx, &input, &cancel).await;
            report_output(envelope, json)
        }
        Command::Predict { patient } => {
            let input = patient_by_id(&patient)?.predict_progression_input();
            let envelope = actions.get_disease_prediction(&ctx, &input, &cancel).await;
            report_output(envelope, json)
        }
        Command::Interactions { patient } => {
            let input = patient_by_id(&patient)?.identify_interactions_input();
            let envelope = actions.get_drug_interactions(&ctx, &input, &cancel).await;
            report_output(envelope, json)
        }
        Command::Emr {
            diagnosis,
            context,
            patient,
        } => {
            let request = EmrRequest {
                diagnosis,
                context,
                patient_id: patient,
            };
            let envelope = actions.code_diagnosis(&ctx, &request, &cancel).await;
            report(envelope, json, |coding| {
                println!("TM2 code:    {}", coding.tm2_code);
                println!("ICD-11 code: {}", coding.icd11_code);
                println!();
                println!("{}", coding.reasoning);
            })
        }
        Command::History { command } => run_history(&actions, &ctx, command, json)?,
        Command::Patients { .. } | Command::Signup { .. } => ExitCode::SUCCESS,
    };

    Ok(code)
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn authenticate(cli: &Cli, auth: &AuthConfig) -> VaidyaResult<AuthContext> {
    let checker = from_config(auth);
    let credentials = match (&cli.email, &cli.password) {
        (Some(email), Some(password)) => Some(Credentials {
            email: email.clone(),
            password: password.clone(),
        }),
        _ => None,
    };
    let ctx = checker.authenticate(credentials.as_ref())?;
    info!(email = %ctx.principal.email, "authenticated");
    Ok(ctx)
}

fn build_actions(config: &AppConfig, offline: bool) -> VaidyaResult<ServerActions> {
    let transport: Arc<dyn ModelTransport> = if offline {
        debug!("using offline scripted transport");
        Arc::new(ScriptedTransport::offline())
    } else {
        let ollama = OllamaTransport::new(&config.model)?;
        debug!(base_url = ollama.base_url(), model = ollama.model(), "using ollama transport");
        Arc::new(ollama)
    };

    let adapter = Arc::new(InvocationAdapter::new(
        transport,
        Arc::new(SchemaValidator::new()),
        config.retry.clone(),
        config.limits.max_concurrent,
    ));
    let operations = ClinicalOperations::new(adapter)?;
    let history = Arc::new(CodeHistory::open(&config.history.path));

    Ok(ServerActions::new(operations, history))
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            child.cancel();
        }
    });
    token
}

fn patient_by_id(id: &str) -> VaidyaResult<Patient> {
    find_patient(id).ok_or_else(|| VaidyaError::validation("patient", format!("no patient with id '{id}'")))
}

// ── Commands without a model ──────────────────────────────────────────────────

fn show_patients(id: Option<&str>) -> VaidyaResult<ExitCode> {
    match id {
        Some(id) => {
            let patient = patient_by_id(id)?;
            println!("{}", to_pretty_json(&patient)?);
        }
        None => {
            for p in patients() {
                let conditions: Vec<&str> =
                    p.allopathic_records.iter().map(|r| r.condition.as_str()).collect();
                println!(
                    "{:>3}  {:<14} {:>3}  {:<7} {}",
                    p.id,
                    p.name,
                    p.age,
                    p.gender.to_string(),
                    conditions.join(", ")
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct UsersSnippet<'a> {
    auth: AuthUsers<'a>,
}

#[derive(Serialize)]
struct AuthUsers<'a> {
    users: [&'a UserRecord; 1],
}

/// Registration lives only as long as the process. The printed entry is what
/// makes the user permanent once added to the configuration file.
fn signup(cli: &Cli, auth: &AuthConfig, name: &str) -> VaidyaResult<ExitCode> {
    let (Some(email), Some(password)) = (&cli.email, &cli.password) else {
        return Err(VaidyaError::validation("email", "signup requires --email and --password"));
    };

    let credentials = Credentials {
        email: email.clone(),
        password: password.clone(),
    };
    let ctx = from_config(auth).register(&credentials, name)?;

    let record = UserRecord {
        email: ctx.principal.email.clone(),
        name: ctx.principal.name.clone(),
        password_sha256: password_digest(email, password),
        capabilities: Vec::new(),
    };
    let snippet = toml::to_string(&UsersSnippet {
        auth: AuthUsers { users: [&record] },
    })
    .map_err(|e| VaidyaError::ConfigError {
        reason: format!("failed to render user entry: {e}"),
    })?;

    println!("Registered {} <{}>.", record.name, record.email);
    println!("Add this entry to your configuration to keep the account:");
    println!();
    print!("{snippet}");
    Ok(ExitCode::SUCCESS)
}

fn run_history(
    actions: &ServerActions,
    ctx: &AuthContext,
    command: HistoryCommand,
    json: bool,
) -> VaidyaResult<ExitCode> {
    let code = match command {
        HistoryCommand::List { search } => {
            let envelope = actions.history_entries(ctx, search.as_deref());
            report(envelope, json, |entries| {
                if entries.is_empty() {
                    println!("No history entries.");
                }
                for e in entries {
                    println!(
                        "{}  {:<24} {:<14} {:<10} {:<4} {:<8} {}",
                        e.timestamp.format("%Y-%m-%d %H:%M"),
                        e.diagnosis,
                        e.tm2_code,
                        e.icd11_code,
                        e.patient_id.as_deref().unwrap_or("-"),
                        e.status.to_string(),
                        e.id
                    );
                }
            })
        }
        HistoryCommand::Export { search, out } => {
            let envelope = actions.export_history_csv(ctx, search.as_deref());
            match (envelope, out) {
                (ResultEnvelope::Success { data }, Some(path)) => {
                    std::fs::write(&path, data).map_err(|e| VaidyaError::HistoryError {
                        reason: format!("cannot write '{}': {e}", path.display()),
                    })?;
                    println!("Exported to {}", path.display());
                    ExitCode::SUCCESS
                }
                (envelope, _) => report(envelope, json, |csv| print!("{csv}")),
            }
        }
        HistoryCommand::Archive { id } => {
            let envelope = actions.archive_history_entry(ctx, &id);
            report(envelope, json, |archived| {
                if *archived {
                    println!("Archived {id}.");
                } else {
                    println!("No entry with id {id}.");
                }
            })
        }
    };
    Ok(code)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn report<T: Serialize>(envelope: ResultEnvelope<T>, json: bool, render: impl FnOnce(&T)) -> ExitCode {
    if json {
        match to_pretty_json(&envelope) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("error: {e}"),
        }
        return if envelope.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    match &envelope {
        ResultEnvelope::Success { data } => {
            render(data);
            ExitCode::SUCCESS
        }
        ResultEnvelope::Failure { error } => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// Print an operation's envelope: the envelope as-is with `--json`, otherwise
/// the output rendered through its tagged variant.
fn report_output<T>(envelope: ResultEnvelope<T>, json: bool) -> ExitCode
where
    T: Serialize + Into<OperationOutput>,
{
    if json {
        return report(envelope, true, |_| {});
    }
    report(envelope.map(Into::into), false, render_output)
}

fn render_output(output: &OperationOutput) {
    match output {
        OperationOutput::TranslateTerm(out) => {
            println!("Standardized codes: {}", out.standardized_codes.join(", "));
            println!();
            println!("{}", out.reasoning);
        }
        OperationOutput::SuggestTreatment(out) => {
            println!("{}", out.treatment_suggestions);
        }
        OperationOutput::PredictProgression(out) => {
            println!("Progression");
            println!("  {}", out.disease_progression_prediction);
            println!();
            println!("Health risks");
            println!("  {}", out.potential_health_risks);
        }
        OperationOutput::IdentifyInteractions(out) => {
            if out.interactions.is_empty() {
                println!("No interactions identified.");
            }
            for interaction in &out.interactions {
                println!("- {interaction}");
            }
            println!();
            println!("{}", out.summary);
        }
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> VaidyaResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| VaidyaError::ConfigError {
        reason: format!("failed to render JSON: {e}"),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
