use anyhow::{Result, bail};
use smartgrowth::{
    AdoptionOrder, LayerId, Summary, adopted_parcels, read_feature_collection,
    jobs::DEFAULT_DATA_DIR,
};

use crate::cli::{Cli, ScenarioArgs};

pub fn run(_cli: &Cli, args: &ScenarioArgs) -> Result<()> {
    let layer: LayerId = args.layer.parse()?;
    let Some(config) = layer.scenario() else {
        bail!("[scenario] Layer {layer} has no adoption scenario");
    };
    let data_dir = args.data_dir.clone().unwrap_or(DEFAULT_DATA_DIR.into());
    let percent = args.percent.unwrap_or(config.default_adoption).clamp(0.0, 100.0);

    let Some(summary_file) = layer.summary_file() else {
        bail!("[scenario] Layer {layer} has no summary file");
    };
    let summary = Summary::read(&data_dir.join(summary_file), &config.layout)?;

    println!("{layer} at {percent}% adoption");
    match summary.projected(percent) {
        Ok(metrics) => {
            for (name, value) in metrics.iter() {
                println!("  {name}: {value}");
            }
        }
        Err(e) => println!("  projected impact: N/A ({e})"),
    }

    let totals = summary.totals();
    if !totals.is_empty() {
        println!("  parcels developed: {}", adopted_parcels(&totals, percent));
    }

    if let (Some(key), Some(priority)) = (config.identity, config.priority) {
        let features = read_feature_collection(&data_dir.join(layer.data_file()))?;
        let order = AdoptionOrder::from_collection(&features, key, priority);
        let adopted = order.adopted(percent);
        println!("  adopted features: {} of {} eligible", adopted.len(), order.eligible_count());
    }
    Ok(())
}
