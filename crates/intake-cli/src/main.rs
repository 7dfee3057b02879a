use clap::{Parser, Subcommand};
use intake_core::config;
use intake_core::engine::runner::{ConsolePrompter, SessionRunner};
use intake_core::judge::{JudgePolicy, JudgeService, SubstringPolicy, TokenPolicy};
use intake_core::model::{Question, SessionOutcome};
use intake_core::providers::llm::openai::OpenAiClient;
use intake_core::providers::llm::scripted::ScriptedClient;
use intake_core::providers::llm::LlmClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "intake",
    version,
    about = "LLM-gated medical intake questionnaire"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Conduct a questionnaire session and persist the result
    Run(RunArgs),
    /// Decrypt and print persisted submissions
    List(ListArgs),
    Version,
}

#[derive(Parser, Clone)]
struct RunArgs {
    #[arg(long, default_value = ".intake/intake.db")]
    db: PathBuf,

    /// judge provider: openai|scripted (scripted accepts everything and is
    /// for offline/dev only; opt in explicitly)
    #[arg(long, default_value = "openai", env = "INTAKE_JUDGE")]
    judge: String,

    /// Judge model identifier (provider-specific)
    #[arg(long, default_value = config::DEFAULT_JUDGE_MODEL, env = "INTAKE_JUDGE_MODEL")]
    judge_model: String,

    /// Timeout for one judge call; an elapsed timeout counts as a rejection
    #[arg(long, default_value_t = config::DEFAULT_JUDGE_TIMEOUT_SECONDS, env = "INTAKE_JUDGE_TIMEOUT_SECONDS")]
    judge_timeout_seconds: u64,

    /// Temperature used for judge calls
    #[arg(long, default_value_t = 0.0, env = "INTAKE_JUDGE_TEMPERATURE")]
    judge_temperature: f32,

    /// Max tokens for the judge response
    #[arg(long, default_value_t = 64, env = "INTAKE_JUDGE_MAX_TOKENS")]
    judge_max_tokens: u32,

    /// Require an explicit VALID/INVALID token from the judge instead of
    /// the default substring heuristic
    #[arg(long)]
    strict_judge: bool,

    #[arg(long, default_value_t = config::DEMO_USER_ID)]
    user_id: i64,

    #[arg(long, hide = true, env = "OPENAI_API_KEY")]
    api_key: Option<String>,

    /// 64 hex chars; generated fresh (and logged) when unset
    #[arg(long, env = "INTAKE_ENCRYPTION_KEY")]
    encryption_key: Option<String>,
}

#[derive(Parser, Clone)]
struct ListArgs {
    #[arg(long, default_value = ".intake/intake.db")]
    db: PathBuf,

    #[arg(long, env = "INTAKE_ENCRYPTION_KEY")]
    encryption_key: Option<String>,
}

mod exit_codes {
    pub const OK: i32 = 0;
    pub const REJECTED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            exit_codes::CONFIG_ERROR
        }
    };
    std::process::exit(code);
}

async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => cmd_run(args).await,
        Command::List(args) => cmd_list(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<i32> {
    ensure_parent_dir(&args.db)?;
    let store = intake_core::storage::Store::open(&args.db)?;
    store.init_schema()?;

    let cipher = config::load_cipher(args.encryption_key.as_deref())?;

    let client: Arc<dyn LlmClient> = match args.judge.as_str() {
        "openai" => {
            let api_key = match args.api_key {
                Some(key) => key,
                None => config::require_secret("OPENAI_API_KEY")?,
            };
            Arc::new(OpenAiClient::new(
                args.judge_model,
                api_key,
                args.judge_temperature,
                args.judge_max_tokens,
            ))
        }
        "scripted" => Arc::new(ScriptedClient::accepting()),
        other => anyhow::bail!("unknown judge provider '{}' (expected openai|scripted)", other),
    };

    let policy: Box<dyn JudgePolicy> = if args.strict_judge {
        Box::new(TokenPolicy)
    } else {
        Box::new(SubstringPolicy)
    };

    let runner = SessionRunner {
        judge: JudgeService::new(
            client,
            policy,
            Duration::from_secs(args.judge_timeout_seconds),
        ),
        store,
        cipher,
        user_id: args.user_id,
    };

    let mut prompter = ConsolePrompter;
    match runner.run(&mut prompter, &Question::intake_set()).await? {
        SessionOutcome::Saved { .. } => Ok(exit_codes::OK),
        SessionOutcome::Rejected => Ok(exit_codes::REJECTED),
    }
}

async fn cmd_list(args: ListArgs) -> anyhow::Result<i32> {
    ensure_parent_dir(&args.db)?;
    let store = intake_core::storage::Store::open(&args.db)?;
    store.init_schema()?;

    let key_hex = match args.encryption_key {
        Some(key) => key,
        None => config::require_secret("INTAKE_ENCRYPTION_KEY")?,
    };
    let cipher = intake_core::crypto::FieldCipher::from_hex(&key_hex)?;

    let rows = store.list_history()?;
    intake_core::report::console::print_history(&rows, &cipher)?;
    Ok(exit_codes::OK)
}

fn ensure_parent_dir(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
