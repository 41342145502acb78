use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use disaster_triage::config::Config;
use disaster_triage::ml::{evaluate, GridSearch};
use disaster_triage::store::MessageStore;

#[derive(Parser)]
#[command(name = "triage-train")]
#[command(about = "Train the multi-label disaster message classifier", long_about = None)]
struct Cli {
    /// SQLite database with the labeled messages table
    #[arg(value_name = "DATABASE")]
    database: PathBuf,

    /// File the trained model is written to
    #[arg(value_name = "MODEL")]
    model: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "disaster_triage=info,triage_train=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    tracing::info!("Starting triage-train v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(database = %cli.database.display(), "Loading data...");
    let store = MessageStore::open(&cli.database)?;
    let dataset = store.load_dataset(&config.data)?;
    let (train, test) = dataset.train_test_split(config.split.test_ratio, config.split.seed)?;
    tracing::info!(
        train_rows = train.len(),
        test_rows = test.len(),
        categories = train.n_categories(),
        "split dataset"
    );

    tracing::info!("Building model...");
    let search = GridSearch::new(
        config.vectorizer.clone(),
        config.classifier.clone(),
        config.search.clone(),
    );

    tracing::info!("Training model...");
    let outcome = search.run(&train)?;
    match outcome.best_max_features {
        Some(cap) => tracing::info!(max_features = cap, "Best parameters"),
        None => tracing::info!(max_features = "unlimited", "Best parameters"),
    }

    tracing::info!("Evaluating model...");
    let predictions = outcome.pipeline.predict_texts(&test.texts)?;
    let report = evaluate(&test.labels, &predictions, &test.category_names)?;
    tracing::info!("Held-out results:\n{report}");

    tracing::info!(model = %cli.model.display(), "Saving model...");
    outcome.pipeline.save(&cli.model)?;
    tracing::info!("Trained model saved");

    let mut report_store = MessageStore::create(&config.report.database)?;
    report_store.write_report(&config.report.table, &report)?;
    tracing::info!(
        database = %config.report.database.display(),
        table = %config.report.table,
        "Model performance report saved"
    );

    Ok(())
}
