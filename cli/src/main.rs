//! `learnhub` terminal client for the account API.
//!
//! Drives the same session and profile stores as the browser client, with a
//! file-backed token store standing in for `localStorage`. Protected commands
//! go through the route guard first, so an expired token is cleared exactly as
//! it would be on a guarded page.

mod token_file;
mod transport;


use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use session::token::inspect_token;
use session::transport::RestApi;
use session::types::{LoginCredentials, ProfileForm, RegisterCredentials, Role};
use session::{ApiConfig, GuardDecision, GuardOptions, ProfileStore, RouteGuard, SessionError, SessionStore, TokenStore};

use crate::token_file::{FileTokenStore, TOKEN_FILE_ENV};
use crate::transport::{ReqwestHttp, load_photo};

type CliApi = RestApi<ReqwestHttp, FileTokenStore>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("not logged in; run `learnhub login` first")]
    NotLoggedIn,
    /// Error message recorded on the session by a failed guard fetch.
    #[error("{0}")]
    SessionMessage(String),
    #[error("missing password; pass --password or set LEARNHUB_PASSWORD")]
    MissingPassword,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
}

#[derive(Parser, Debug)]
#[command(name = "learnhub", about = "LearnHub account and profile CLI")]
struct Cli {
    #[arg(long, env = session::config::API_URL_ENV)]
    api_url: Option<String>,

    #[arg(long, env = TOKEN_FILE_ENV)]
    token_file: Option<PathBuf>,

    /// Log requests and state transitions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(LoginArgs),
    Register(RegisterArgs),
    /// Show the user behind the stored token.
    Me,
    Logout,
    /// Decode the stored token without contacting the server.
    Token,
    Profile(ProfileCommand),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "LEARNHUB_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    firstname: String,
    #[arg(long)]
    lastname: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "LEARNHUB_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Defaults to the password when omitted.
    #[arg(long, env = "LEARNHUB_CONFIRM_PASSWORD", hide_env_values = true)]
    confirm_password: Option<String>,
    #[arg(long, value_parser = parse_role)]
    role: Option<Role>,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Get,
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        #[arg(long)]
        data: String,
    },
    /// Validate locally, then update the existing profile or create one.
    Save {
        #[arg(long)]
        data: String,
    },
    Delete,
    UploadPhoto {
        path: PathBuf,
    },
}

struct CliContext {
    config: ApiConfig,
    tokens: FileTokenStore,
    http: ReqwestHttp,
}

impl CliContext {
    fn api(&self) -> CliApi {
        RestApi::new(self.config.clone(), self.http.clone(), self.tokens.clone())
    }

    fn sessions(&self) -> SessionStore<CliApi, FileTokenStore> {
        SessionStore::new(self.api(), self.tokens.clone())
    }

    fn profiles(&self) -> ProfileStore<CliApi> {
        ProfileStore::new(self.api())
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CliContext {
        config: ApiConfig::from_override(cli.api_url.as_deref()),
        tokens: FileTokenStore::new(cli.token_file.unwrap_or_else(FileTokenStore::default_path)),
        http: ReqwestHttp::new()?,
    };
    tracing::debug!(base_url = %ctx.config.base_url, token_file = %ctx.tokens.path().display(), "cli context");

    match cli.command {
        Command::Login(args) => run_login(&ctx, args).await,
        Command::Register(args) => run_register(&ctx, args).await,
        Command::Me => run_me(&ctx).await,
        Command::Logout => run_logout(&ctx).await,
        Command::Token => run_token(&ctx),
        Command::Profile(profile) => run_profile(&ctx, profile).await,
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_login(ctx: &CliContext, args: LoginArgs) -> Result<(), CliError> {
    let password = args.password.ok_or(CliError::MissingPassword)?;
    let store = ctx.sessions();
    let user = store.login(&LoginCredentials { email: args.email, password }).await?;
    print_json(&serde_json::to_value(user)?)
}

async fn run_register(ctx: &CliContext, args: RegisterArgs) -> Result<(), CliError> {
    let credentials = register_credentials(args)?;
    let store = ctx.sessions();
    let user = store.register(&credentials).await?;
    print_json(&serde_json::to_value(user)?)
}

async fn run_me(ctx: &CliContext) -> Result<(), CliError> {
    let store = ctx.sessions();
    require_session(&store).await?;
    let session = store.snapshot();
    match session.user() {
        Some(user) => print_json(&serde_json::to_value(user)?),
        // The guard renders a pending session when /auth/me failed transiently.
        None => Err(session.error.map_or(CliError::NotLoggedIn, CliError::SessionMessage)),
    }
}

async fn run_logout(ctx: &CliContext) -> Result<(), CliError> {
    let store = ctx.sessions();
    store.initialize();
    store.logout().await;
    eprintln!("logged out");
    Ok(())
}

fn run_token(ctx: &CliContext) -> Result<(), CliError> {
    let token = ctx.tokens.get().ok_or(CliError::NotLoggedIn)?;
    let diagnostics = inspect_token(&token, now_unix_secs());
    print_json(&serde_json::to_value(diagnostics)?)
}

async fn run_profile(ctx: &CliContext, profile: ProfileCommand) -> Result<(), CliError> {
    require_session(&ctx.sessions()).await?;
    let store = ctx.profiles();
    match profile.command {
        ProfileSubcommand::Get => {
            let profile = store.load().await?;
            print_json(&serde_json::to_value(profile)?)
        }
        ProfileSubcommand::Create { data } => {
            let profile = store.create(&parse_form(&data)?).await?;
            print_json(&serde_json::to_value(profile)?)
        }
        ProfileSubcommand::Update { data } => {
            let profile = store.update(&parse_form(&data)?).await?;
            print_json(&serde_json::to_value(profile)?)
        }
        ProfileSubcommand::Save { data } => {
            let form = parse_form(&data)?;
            if let Err(err) = store.load().await {
                tracing::debug!(error = %err, "no existing profile; saving creates one");
            }
            let profile = store.save(&form, time::OffsetDateTime::now_utc().date()).await?;
            print_json(&serde_json::to_value(profile)?)
        }
        ProfileSubcommand::Delete => {
            store.delete().await?;
            eprintln!("profile deleted");
            Ok(())
        }
        ProfileSubcommand::UploadPhoto { path } => {
            let photo = load_photo(&path).map_err(|source| CliError::ReadFile { path: path.clone(), source })?;
            let url = store.upload_photo(&photo).await?;
            print_json(&serde_json::json!({ "photoUrl": url }))
        }
    }
}

/// Run the route guard the way a protected page would.
async fn require_session(store: &SessionStore<CliApi, FileTokenStore>) -> Result<(), CliError> {
    let mut guard = RouteGuard::new(GuardOptions::default());
    match guard.settle(store).await {
        GuardDecision::Render => Ok(()),
        GuardDecision::Redirect(_) => Err(store.snapshot().error.map_or(CliError::NotLoggedIn, CliError::SessionMessage)),
        GuardDecision::Loading | GuardDecision::FetchUser => Err(CliError::NotLoggedIn),
    }
}

fn register_credentials(args: RegisterArgs) -> Result<RegisterCredentials, CliError> {
    let password = args.password.ok_or(CliError::MissingPassword)?;
    let confirm_password = args.confirm_password.unwrap_or_else(|| password.clone());
    Ok(RegisterCredentials {
        firstname: args.firstname,
        lastname: args.lastname,
        email: args.email,
        password,
        confirm_password,
        role: args.role,
    })
}

fn parse_role(raw: &str) -> Result<Role, String> {
    serde_json::from_value(Value::String(raw.to_ascii_lowercase()))
        .map_err(|_| format!("unknown role `{raw}` (expected user, admin or moderator)"))
}

fn parse_form(data: &str) -> Result<ProfileForm, CliError> {
    Ok(serde_json::from_str(data)?)
}

fn now_unix_secs() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
