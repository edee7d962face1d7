use anyhow::Result;
use solarsuit::load_dataset;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ExportArgs) -> Result<()> {
    let dataset = load_dataset(&cli.config()?);
    dataset.export(&args.output)?;
    eprintln!("[export] wrote {} records to {}", dataset.len(), args.output.display());
    Ok(())
}
