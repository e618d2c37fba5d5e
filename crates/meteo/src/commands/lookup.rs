//! One-shot lookups: `meteo current`, `meteo forecast`, `meteo search`.

use anyhow::Result;
use clap::Args;

use super::Context;
use crate::client::WeatherClient;

/// Arguments for `meteo current`.
#[derive(Args, Debug)]
pub struct CurrentArgs {
    /// Place name, e.g. "Bangkok, Thailand"
    pub location: String,
}

/// Arguments for `meteo forecast`.
#[derive(Args, Debug)]
pub struct ForecastArgs {
    /// Place name, e.g. "New York"
    pub location: String,

    /// Number of forecast days (1-16)
    #[arg(short, long, default_value_t = 7)]
    pub days: i64,
}

/// Arguments for `meteo search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Place name to resolve
    pub location: String,
}

/// Run `meteo current`.
pub fn run_current(args: CurrentArgs, ctx: &Context) -> Result<()> {
    with_client(ctx, |client| client.current_weather(&args.location))
}

/// Run `meteo forecast`.
pub fn run_forecast(args: ForecastArgs, ctx: &Context) -> Result<()> {
    with_client(ctx, |client| {
        client.weather_forecast(&args.location, args.days)
    })
}

/// Run `meteo search`.
pub fn run_search(args: SearchArgs, ctx: &Context) -> Result<()> {
    with_client(ctx, |client| client.search_location(&args.location))
}

fn with_client(ctx: &Context, lookup: impl FnOnce(&mut WeatherClient) -> String) -> Result<()> {
    let mut client = ctx.connect()?;
    let text = lookup(&mut client);
    println!("{text}");
    client.close()
}
