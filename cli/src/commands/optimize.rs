use anyhow::Result;
use solarsuit::optimize;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::OptimizeArgs) -> Result<()> {
    let config = cli.config()?;
    let input = args.input.clone().unwrap_or(config.fallback_path.clone());
    let output = args.output.clone().unwrap_or(config.primary_path.clone());
    let tolerance = args.tolerance.unwrap_or(config.simplify_tolerance);

    eprintln!("[optimize] simplifying {} with tolerance {tolerance}", input.display());
    let report = optimize(&input, &output, tolerance)?;
    eprintln!(
        "[optimize] wrote {} features to {} ({} -> {} vertices)",
        report.features, output.display(), report.vertices_before, report.vertices_after,
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
