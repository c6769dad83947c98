use clap::Parser;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use diceshell::config::{self, ConfigError, ShellConfig};
use diceshell::dice::Die;
use diceshell::ops::{self, DiceTable};
use diceshell::{CancelToken, Shell};
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Interactive dice shell.
#[derive(Parser, Debug)]
#[command(name = "diceshell", version, about)]
struct Cli {
    /// Path to a JSON config file (default: ~/.config/diceshell.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of sides of the starting die
    #[arg(long)]
    sides: Option<u32>,

    /// Seed the starting die for repeatable rolls
    #[arg(long)]
    seed: Option<i64>,

    /// End the session after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Disable coloured prompt and errors
    #[arg(long)]
    no_color: bool,

    /// Write the resolved settings back to the config file before starting
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let cfg = resolve_config(&cli);
    if cli.save_config {
        match save_config(&cli, &cfg) {
            Ok(path) => print_colored_message(
                &format!("Config saved to {}\n", path.display()),
                Color::Green,
                cfg.color,
            ),
            Err(e) => print_colored_message(
                &format!("Warning: could not save config: {e}\n"),
                Color::DarkYellow,
                cfg.color,
            ),
        }
    }

    match run(&cli, &cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_colored_message(&format!("Error: {e}\n"), Color::Red, cfg.color);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, cfg: &ShellConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut die = Die::new(cfg.sides)?;
    if let Some(seed) = cli.seed {
        die.seed(seed);
    }
    let table = Arc::new(Mutex::new(DiceTable::new(die)));

    let mut shell = Shell::new();
    shell.set_name(env!("CARGO_PKG_NAME"));
    shell.set_version(env!("CARGO_PKG_VERSION"));
    if let Some(banner) = &cfg.banner {
        shell.set_help_text(banner)?;
    }
    shell.set_prompt(&cfg.prompt);
    shell.set_color(cfg.color);
    ops::install(&mut shell, table)?;

    let root = CancelToken::new();
    let interrupt = root.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupt received");
            interrupt.cancel();
        }
    });
    let token = match cfg.timeout_secs {
        Some(secs) => root.child_with_timeout(Duration::from_secs(secs)),
        None => root,
    };

    print_colored_message(
        &format!("{} {}. Type 'help' for commands.\n", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        Color::DarkMagenta,
        cfg.color,
    );

    let state = shell
        .run(BufReader::new(io::stdin()), io::stdout(), &token)
        .await?;
    log::debug!("shell finished in state {state:?}");
    println!();
    Ok(())
}

fn resolve_config(cli: &Cli) -> ShellConfig {
    let loaded = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let mut cfg = match loaded {
        Ok(cfg) => cfg,
        Err(ConfigError::NotFound(path)) if cli.config.is_none() => {
            log::debug!("no config at {}, using defaults", path.display());
            ShellConfig::default()
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            ShellConfig::default()
        }
    };

    if let Some(sides) = cli.sides {
        cfg.sides = sides;
    }
    if let Some(timeout) = cli.timeout {
        cfg.timeout_secs = Some(timeout);
    }
    if cli.no_color {
        cfg.color = false;
    }
    cfg
}

/// Save `cfg` to `--config` when given, else to the default path.
fn save_config(cli: &Cli, cfg: &ShellConfig) -> Result<PathBuf, ConfigError> {
    match &cli.config {
        Some(path) => cfg.save_to(path).map(|()| path.clone()),
        None => cfg.save(),
    }
}

fn print_colored_message(message: &str, color: Color, enabled: bool) {
    let mut stdout = io::stdout();
    let result = if enabled {
        execute!(stdout, SetForegroundColor(color), Print(message), ResetColor)
    } else {
        execute!(stdout, Print(message))
    };
    if let Err(e) = result {
        log::warn!("failed to write to stdout: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_land_in_saved_config() {
        let path = std::env::temp_dir().join(format!("diceshell-cli-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let path_arg = path.to_string_lossy().into_owned();
        let cli = Cli::parse_from([
            "diceshell",
            "--config",
            path_arg.as_str(),
            "--sides",
            "20",
            "--no-color",
            "--save-config",
        ]);
        let cfg = resolve_config(&cli);
        let saved = save_config(&cli, &cfg).unwrap();
        let loaded = config::load_config_from(&saved).unwrap();
        std::fs::remove_file(&saved).unwrap();
        assert_eq!(saved, path);
        assert_eq!(loaded.sides, 20);
        assert!(!loaded.color);
    }
}
