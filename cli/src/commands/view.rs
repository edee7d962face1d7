use anyhow::Result;
use solarsuit::{Dashboard, Selection};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ViewArgs) -> Result<()> {
    let mut dashboard = Dashboard::new(cli.config()?);
    let selection = Selection::new(&args.state, &args.district, args.category, args.layer);

    let view = dashboard.view(&selection);
    if view.records.is_empty() {
        tracing::warn!(state = %args.state, district = %args.district, "no records match the selection");
    }

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
