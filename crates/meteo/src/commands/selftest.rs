//! `meteo test`: scripted run of all three tools.

use anyhow::Result;
use clap::Args;
use console::style;

use super::Context;

/// Arguments for `meteo test`.
#[derive(Args, Debug)]
pub struct TestArgs {}

/// Run `meteo test`.
pub fn run(_args: TestArgs, ctx: &Context) -> Result<()> {
    println!("{}", style("🧪 Testing Weather MCP Client").bold());
    println!("{}", "=".repeat(40));
    println!("Starting weather server...");

    let mut client = match ctx.connect() {
        Ok(client) => client,
        Err(e) => {
            println!("❌ Test failed: {e:#}");
            return Err(e);
        }
    };
    println!("✅ Server started successfully!");

    println!("\n📍 Testing current weather for Bangkok...");
    println!("{}", client.current_weather("Bangkok, Thailand"));

    println!("\n📅 Testing 3-day forecast for New York...");
    println!("{}", client.weather_forecast("New York", 3));

    println!("\n🔍 Testing location search for Tokyo...");
    println!("{}", client.search_location("Tokyo"));

    println!("\n✅ All tests completed successfully!");
    client.close()
}
