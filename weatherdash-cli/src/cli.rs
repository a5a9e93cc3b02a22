use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::fmt;
use weatherdash_core::{
    ClockStyle, Config, Dashboard, FilePreferenceStore, RenderSink, UnitSystem, feed_from_config,
};

use crate::sink::{JsonSink, TerminalSink};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// OpenWeather API key; overrides the configured one.
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and display preferences.
    Configure,

    /// Show current conditions and the forecast.
    Show {
        /// City to look up; remembered for next time. Defaults to the last one.
        city: Option<String>,

        /// Print a JSON document instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Switch between metric and imperial units and show the result.
    ToggleUnits {
        #[arg(long)]
        json: bool,
    },

    /// Choose the unit system explicitly and show the result.
    Units {
        /// "metric" or "imperial".
        unit: UnitSystem,

        #[arg(long)]
        json: bool,
    },

    /// Menu-driven dashboard: search, toggle units, refresh.
    Interactive,
}

/// Which dashboard action a command maps to.
enum Action {
    Refresh,
    Search(String),
    Toggle,
    SetUnit(UnitSystem),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => {
                let action = match city {
                    Some(city) => Action::Search(city),
                    None => Action::Refresh,
                };
                run_once(self.api_key, action, json).await
            }
            Command::ToggleUnits { json } => run_once(self.api_key, Action::Toggle, json).await,
            Command::Units { unit, json } => {
                run_once(self.api_key, Action::SetUnit(unit), json).await
            }
            Command::Interactive => interactive(self.api_key).await,
        }
    }
}

fn open_dashboard(api_key: Option<String>) -> anyhow::Result<Dashboard<FilePreferenceStore>> {
    let mut config = Config::load()?;
    if let Some(key) = api_key {
        config.set_api_key(key);
    }

    let feed = feed_from_config(&config)?;
    let store = FilePreferenceStore::open(Config::preferences_file_path()?)?;

    Dashboard::load(feed, store, config.clock).context("Failed to load dashboard preferences")
}

async fn perform(
    dash: &mut Dashboard<FilePreferenceStore>,
    action: Action,
    sink: &mut dyn RenderSink,
) -> weatherdash_core::error::Result<()> {
    match action {
        Action::Refresh => dash.refresh(sink).await,
        Action::Search(city) => dash.search(&city, sink).await,
        Action::Toggle => dash.toggle_unit(sink).await,
        Action::SetUnit(unit) => dash.set_unit(unit, sink).await,
    }
}

async fn run_once(api_key: Option<String>, action: Action, json: bool) -> anyhow::Result<()> {
    let mut dash = open_dashboard(api_key)?;

    if json {
        let mut sink = JsonSink::default();
        let outcome = perform(&mut dash, action, &mut sink).await;
        sink.print()?;
        outcome?;
    } else {
        let mut sink = TerminalSink::stdout();
        perform(&mut dash, action, &mut sink).await?;
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()?;
    config.set_api_key(api_key);

    let start = ClockStyle::all().iter().position(|c| *c == config.clock).unwrap_or(0);
    config.clock = Select::new("Clock style:", ClockStyle::all().to_vec())
        .with_starting_cursor(start)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Search,
    ToggleUnits,
    Refresh,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 4] =
        [MenuItem::Search, MenuItem::ToggleUnits, MenuItem::Refresh, MenuItem::Quit];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Search => f.write_str("Search city"),
            MenuItem::ToggleUnits => f.write_str("Toggle units"),
            MenuItem::Refresh => f.write_str("Refresh"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

async fn interactive(api_key: Option<String>) -> anyhow::Result<()> {
    let mut dash = open_dashboard(api_key)?;
    let mut sink = TerminalSink::stdout();
    let mut action = Some(Action::Refresh);

    loop {
        if let Some(action) = action.take() {
            if let Err(e) = perform(&mut dash, action, &mut sink).await {
                eprintln!("Error: {:#}", anyhow::Error::from(e));
            }
        }

        let prompt = format!("{} ({}):", dash.city(), dash.unit());
        action = match Select::new(&prompt, MenuItem::ALL.to_vec()).prompt()? {
            MenuItem::Search => {
                let city = Text::new("City:").prompt()?;
                if city.trim().is_empty() {
                    None
                } else {
                    Some(Action::Search(city))
                }
            }
            MenuItem::ToggleUnits => Some(Action::Toggle),
            MenuItem::Refresh => Some(Action::Refresh),
            MenuItem::Quit => return Ok(()),
        };
    }
}
