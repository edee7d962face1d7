use anyhow::Result;
use serde_json::json;
use solarsuit::classify;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ClassifyArgs) -> Result<()> {
    let tier = classify(Some(args.value), args.category);
    println!("{}", json!({
        "value": args.value,
        "category": args.category.column(),
        "tier": tier,
        "rank": tier.rank(),
        "color": tier.color(),
    }));
    Ok(())
}
