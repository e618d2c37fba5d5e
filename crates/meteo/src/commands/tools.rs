//! `meteo tools`: list what the server advertises.

use anyhow::Result;
use clap::Args;
use console::style;

use super::Context;

/// Arguments for `meteo tools`.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Show descriptions and full input schemas
    #[arg(long)]
    pub full: bool,
}

/// Run `meteo tools`.
pub fn run(args: ToolsArgs, ctx: &Context) -> Result<()> {
    let mut client = ctx.connect()?;

    if ctx.verbose
        && let Some(info) = client.server_info()
    {
        eprintln!("Server: {} v{}", info.name, info.version);
    }

    let tools = client.list_tools()?;
    for tool in &tools {
        if args.full {
            println!("{}", style(&tool.name).bold());
            if let Some(description) = &tool.description {
                println!("  {description}");
            }
            if let Some(schema) = &tool.input_schema {
                for line in serde_json::to_string_pretty(schema)?.lines() {
                    println!("    {line}");
                }
            }
            println!();
        } else {
            println!("{}", tool.name);
        }
    }

    client.close()
}
