use anyhow::Result;
use solarsuit::Dashboard;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::OptionsArgs) -> Result<()> {
    let mut dashboard = Dashboard::new(cli.config()?);
    println!("{}", serde_json::to_string_pretty(&dashboard.options(&args.state))?);
    Ok(())
}
