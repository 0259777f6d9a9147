use clap::Parser;
use taskboard_cli::commands::{self, cli, Session};
use taskboard_cli::http::handle_serve;
use taskboard_core::api::{load_default, AppConfig, BoardError, CliError, LoggingConfig};
use taskboard_plugins::factory::BackendKind;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let mut cfg =
        load_default(args.config.as_deref()).map_err(|e| CliError::Config(e.to_string()))?;
    if let Some(url) = args.server_url.as_deref() {
        cfg.client.base_url = url.to_string();
    }
    init_tracing(&cfg.logging).map_err(CliError::Command)?;

    dispatch(args, cfg).await?;
    Ok(0)
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: IO / command error
    // 30: board rejected the request (unknown id)
    // 31: board rejected the request (invalid input)
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Io(_) => 20,
        CliError::Command(_) => 20,
        CliError::Board(BoardError::NotFound { .. }) => 30,
        CliError::Board(BoardError::Validation(_)) => 31,
        CliError::Board(BoardError::TransactionFailure(_)) => 50,
        CliError::Anyhow(_) => 50,
    }
}

async fn dispatch(args: cli::Args, cfg: AppConfig) -> Result<(), CliError> {
    let kind = if args.local {
        BackendKind::Local
    } else {
        BackendKind::Remote
    };

    match args.command {
        cli::Commands::Serve(serve_args) => handle_serve(serve_args, &cfg).await,
        cli::Commands::Settings(settings_args) => {
            commands::settings::handle_settings(settings_args, &cfg, args.json)
        }
        command => {
            let mut session = Session::open(cfg, kind, args.json)?;
            run_client_command(command, &mut session).await
        }
    }
}

async fn run_client_command(command: cli::Commands, session: &mut Session) -> Result<(), CliError> {
    match command {
        cli::Commands::Board(board_args) => commands::board::handle_board(board_args, session).await,
        cli::Commands::List => commands::board::handle_list(session).await,
        cli::Commands::Stats => commands::board::handle_stats(session).await,
        cli::Commands::Show(id_args) => commands::board::handle_show(id_args, session).await,
        cli::Commands::Users => commands::board::handle_users(session).await,
        cli::Commands::Create(create_args) => {
            commands::tasks::handle_create(create_args, session).await
        }
        cli::Commands::Update(update_args) => {
            commands::tasks::handle_update(update_args, session).await
        }
        cli::Commands::Move(move_args) => commands::tasks::handle_move(move_args, session).await,
        cli::Commands::Drop(drop_args) => commands::tasks::handle_drop(drop_args, session).await,
        cli::Commands::Delete(id_args) => commands::tasks::handle_delete(id_args, session).await,
        cli::Commands::Comment(comment_args) => {
            commands::comments::handle_comment(comment_args, session).await
        }
        cli::Commands::Serve(_) | cli::Commands::Settings(_) => Err(CliError::Command(
            "command does not use a board backend".to_string(),
        )),
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("taskboard"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("taskboard.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
