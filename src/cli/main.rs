use clap::Parser;
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;

use disaster_triage::ml::TrainedPipeline;

#[derive(Parser)]
#[command(name = "triage-predict")]
#[command(about = "Classify a disaster message with a trained model", long_about = None)]
struct Cli {
    /// Trained model file produced by triage-train
    #[arg(value_name = "MODEL")]
    model: PathBuf,

    /// Message text to classify
    #[arg(value_name = "MESSAGE")]
    message: String,

    /// Print every category with its 0/1 assignment as JSON
    #[arg(short, long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let pipeline = TrainedPipeline::load(&cli.model)?;
    let assignments = pipeline.predict_one(&cli.message)?;

    if cli.json {
        let categories: serde_json::Map<String, serde_json::Value> = pipeline
            .category_names()
            .iter()
            .zip(&assignments)
            .map(|(name, &flag)| (name.clone(), json!(flag == 1)))
            .collect();
        let body = json!({
            "message": cli.message,
            "categories": categories,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let assigned: Vec<&str> = pipeline
            .category_names()
            .iter()
            .zip(assignments.iter().copied())
            .filter(|(_, flag)| *flag == 1)
            .map(|(name, _)| name.as_str())
            .collect();
        if assigned.is_empty() {
            println!("No categories assigned");
        } else {
            println!("Assigned categories: {}", assigned.join(", "));
        }
    }

    Ok(())
}
