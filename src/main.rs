use std::{env, path::PathBuf, process::ExitCode};

use arcane_board::{
    ArcaneBoard, BoardConfig, BoardSession, Result,
    data::json::JsonCatalog,
    script::{self, ScriptedCommands},
    session::FileStore,
};
use log::{error, info};

const DEMO_SCRIPT: &str = "\
# place a few runes around the core and commit them
place 1 2 1
place 2 2 3
place 3 0 0
check 5 3 3
stats
grid
apply
";

struct Args {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut args = Args {
        config: None,
        script: None,
    };
    let mut raw = env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = raw.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => return Err(format!("unknown flag '{flag}'")),
            _ if args.script.is_none() => args.script = Some(PathBuf::from(&arg)),
            _ => return Err(format!("unexpected argument '{arg}'")),
        }
    }
    Ok(args)
}

fn build_session(config: &BoardConfig) -> Result<BoardSession> {
    let board = match &config.data_dir {
        Some(dir) => {
            let catalog = JsonCatalog::from_dir(dir)?;
            info!("Loaded catalogs from {}", dir.display());
            ArcaneBoard::new(catalog.clone(), catalog)
        }
        None => ArcaneBoard::with_builtin_catalogs(),
    };
    let store = FileStore::new(&config.save_dir);
    let mut session = BoardSession::new(board, store, &config.save_slot);
    session.initialize(config.default_class)?;
    Ok(session)
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => BoardConfig::from_file(path)?,
        None => BoardConfig::default(),
    };
    config.apply_env_overrides();

    let mut commands = match &args.script {
        Some(path) => ScriptedCommands::from_file(path)?,
        None => ScriptedCommands::parse(DEMO_SCRIPT)?,
    };

    let mut session = build_session(&config)?;
    let (runes, layouts) = session.board_mut().warm_caches();
    info!(
        "{} board ready ({} runes, {} layouts cached)",
        config.default_class, runes, layouts
    );

    while let Some(command) = commands.next_command() {
        for line in script::execute(&mut session, &command)? {
            info!("{line}");
        }
    }

    if session.has_unsaved_changes() {
        info!("Exiting with unapplied board changes");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            error!("{message}");
            eprintln!("usage: arcane-board [--config <file>] [script]");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
