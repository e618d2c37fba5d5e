//! Interactive numbered menu.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

use super::Context;
use crate::client::WeatherClient;
use meteo_weather::{MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};

/// Forecast length used when the days prompt is blank or not a number.
const DEFAULT_DAYS: i64 = 7;

/// Arguments for `meteo menu`.
#[derive(Args, Debug, Default)]
pub struct MenuArgs {}

enum ControlFlow {
    Continue,
    Exit,
}

/// Menu state.
pub struct Menu {
    client: WeatherClient,
    editor: Editor<(), DefaultHistory>,
}

impl Menu {
    pub fn new(client: WeatherClient) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(false)
            .build();

        Ok(Self {
            client,
            editor: Editor::with_config(config)?,
        })
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            self.print_choices();

            let choice = match self.prompt("\nEnter your choice (1-4): ") {
                Some(choice) => choice,
                None => break,
            };

            match self.handle_choice(&choice) {
                ControlFlow::Continue => continue,
                ControlFlow::Exit => break,
            }
        }

        println!("Goodbye! 👋");
        self.client.close()
    }

    fn handle_choice(&mut self, choice: &str) -> ControlFlow {
        match choice {
            "1" => {
                if let Some(location) = self.prompt_location("Enter location: ") {
                    self.print_dim("\nGetting current weather...");
                    println!("{}", self.client.current_weather(&location));
                }
            }
            "2" => {
                if let Some(location) = self.prompt_location("Enter location: ") {
                    let input = self
                        .prompt("Enter number of days (1-16, default 7): ")
                        .unwrap_or_default();
                    let days = parse_days(&input);
                    self.print_dim(&format!("\nGetting {days}-day forecast..."));
                    println!("{}", self.client.weather_forecast(&location, days));
                }
            }
            "3" => {
                if let Some(location) = self.prompt_location("Enter location to search: ") {
                    self.print_dim("\nSearching location...");
                    println!("{}", self.client.search_location(&location));
                }
            }
            "4" => return ControlFlow::Exit,
            _ => println!("{}", style("Invalid choice. Please try again.").red()),
        }
        ControlFlow::Continue
    }

    /// Read one trimmed line. `None` means input ended.
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Some(line.trim().to_string()),
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.print_dim("(Interrupted - choose 4 or press Ctrl+D to exit)");
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    return None;
                }
                Err(e) => {
                    tracing::error!(error = %e, "input error");
                    return None;
                }
            }
        }
    }

    fn prompt_location(&mut self, prompt: &str) -> Option<String> {
        self.prompt(prompt).filter(|s| !s.is_empty())
    }

    fn print_welcome(&mut self) {
        let dim = Style::new().dim();
        println!("{}", style("🌤️  Weather MCP Client").bold().cyan());
        println!("{}", dim.apply_to("=".repeat(40)));
        println!("✅ Connected to weather server!");

        let tools = self.client.tool_names();
        println!("Available tools: {}", tools.join(", "));
        println!();
    }

    fn print_choices(&self) {
        println!("\n{}", style("Weather Client Commands:").bold());
        println!("1. Get current weather");
        println!("2. Get weather forecast");
        println!("3. Search location");
        println!("4. Exit");
    }

    fn print_dim(&self, msg: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }
}

/// Days from the prompt: blank or non-numeric gives 7, otherwise clamped to 1..=16.
pub fn parse_days(input: &str) -> i64 {
    input
        .trim()
        .parse::<i64>()
        .map(|days| days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS))
        .unwrap_or(DEFAULT_DAYS)
}

/// Run `meteo menu` (also the default with no subcommand).
pub fn run(_args: MenuArgs, ctx: &Context) -> Result<()> {
    println!("Starting weather server...");
    let client = ctx.connect()?;
    Menu::new(client)?.run()
}
