mod app;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::{App, Mode};
use smartcal::{
    calendar::{self, Month},
    config::{AppConfig, ConfigError},
    theme::ThemeConfig,
    widget::{render_lines, Calendar, CalendarProps, CALENDAR_HEIGHT, CALENDAR_WIDTH},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // ── smartcal grid [YYYY-MM] ───────────────────────────────────────────────
    if args.get(1).map(|s| s.as_str()) == Some("grid") {
        return cmd_grid(args.get(2).map(|s| s.as_str()));
    }

    // ── smartcal theme [name] ─────────────────────────────────────────────────
    if args.get(1).map(|s| s.as_str()) == Some("theme") {
        return cmd_theme(args.get(2).map(|s| s.as_str()));
    }

    // ── smartcal [--controlled] (TUI) ─────────────────────────────────────────
    let mode = if args.iter().skip(1).any(|a| a == "--controlled") {
        Mode::Controlled
    } else {
        Mode::Uncontrolled
    };
    run_tui(mode)
}

/// A broken config file never stops a command; it falls back to defaults.
fn config_or_default(loaded: Result<AppConfig, ConfigError>) -> AppConfig {
    loaded.unwrap_or_else(|e| {
        tracing::warn!("{e}; using default configuration");
        AppConfig::default()
    })
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ─── Grid command ─────────────────────────────────────────────────────────────

fn cmd_grid(month_arg: Option<&str>) -> Result<()> {
    init_stderr_logging();

    let cfg   = config_or_default(AppConfig::load());
    let today = calendar::today();
    let month = match month_arg {
        Some(s) => s.parse::<Month>()?,
        None    => Month::of(today),
    };
    let selected = if month.contains(today) { today } else { month.first_day() };

    // Only the symbols are printed; styling stays in the buffer.
    let cal = Calendar::new(
        CalendarProps::new(selected)
            .week_start(cfg.week_start)
            .show_adjacent_days(cfg.show_adjacent_days),
    );
    for line in render_lines(&cal, CALENDAR_WIDTH, CALENDAR_HEIGHT) {
        println!("{}", line.trim_end());
    }
    Ok(())
}

// ─── Theme command ────────────────────────────────────────────────────────────

fn cmd_theme(name: Option<&str>) -> Result<()> {
    init_stderr_logging();

    let Some(name) = name else {
        for t in ThemeConfig::all_themes() {
            println!("{}", t.name);
        }
        return Ok(());
    };
    let theme = ThemeConfig::by_name(name).ok_or_else(|| anyhow!("unknown theme {name:?}"))?;
    theme.save()?;
    println!("Theme set to {}.", theme.name);
    Ok(())
}

// ─── TUI ─────────────────────────────────────────────────────────────────────

fn run_tui(mode: Mode) -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("smartcal");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "smartcal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    tracing::info!("Starting smartcal ({mode:?})");

    let cfg = config_or_default(AppConfig::load());
    let theme = ThemeConfig::load(cfg.theme.as_deref()).context("loading theme")?;

    let mut app = App::new(&cfg, theme, mode, calendar::today());
    app.run()
}
