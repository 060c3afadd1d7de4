use clap::Parser;
use product_import::config::Command;
use product_import::domain::model::{ExportRequest, FileFormat, ImportMode};
use product_import::domain::ports::{ConfigProvider, ProductApi, Storage};
use product_import::utils::{logger, validation::Validate};
use product_import::{CliConfig, HttpProductApi, ImportSession, LocalStorage, PipelineError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse().load()?;
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting product-import CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let api = HttpProductApi::new(config.api_base()).with_timeout(config.request_timeout_secs());
    let storage = LocalStorage::new(config.output_path().to_string());

    let result = match config.command.clone() {
        Command::Import {
            file,
            mode,
            dry_run,
        } => run_import(&api, &file, mode, dry_run).await,
        Command::Export { format, category } => {
            run_export(&api, &storage, &config, format, category).await
        }
        Command::Template { format } => run_template(&api, &storage, &config, format).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_import(
    api: &HttpProductApi,
    file: &str,
    mode: ImportMode,
    dry_run: bool,
) -> product_import::Result<()> {
    let content = tokio::fs::read_to_string(file).await?;

    let mut session = ImportSession::new(mode);
    session.select_file(file, content)?;
    let preview = session.parse()?;

    println!("📄 {}: {} valid records", file, preview.total_count);
    for (i, record) in preview.sample.iter().enumerate() {
        println!(
            "  {}. {} ({:.2})",
            i + 1,
            record.name.as_deref().unwrap_or("(unnamed)"),
            record.price.unwrap_or(0.0)
        );
    }
    if preview.total_count > preview.sample.len() {
        println!(
            "  ... and {} more",
            preview.total_count - preview.sample.len()
        );
    }

    if !preview.is_valid {
        return Err(PipelineError::ValidationError {
            message: format!("{} contains no valid records", file),
        });
    }

    if dry_run {
        println!("Dry run, nothing submitted");
        return Ok(());
    }

    let outcome = session.submit(api).await?;
    println!(
        "✅ Import completed: {} total, {} created, {} updated, {} skipped",
        outcome.total, outcome.created, outcome.updated, outcome.skipped
    );
    if !outcome.errors.is_empty() {
        println!("⚠️  {} rows failed:", outcome.errors.len());
        for error in &outcome.errors {
            println!("  row {}: {}: {}", error.index, error.name, error.message);
        }
    }

    Ok(())
}

async fn run_export(
    api: &HttpProductApi,
    storage: &LocalStorage,
    config: &CliConfig,
    format: FileFormat,
    category: Option<String>,
) -> product_import::Result<()> {
    let request = ExportRequest { format, category };
    let file = api.export_products(&request).await?;
    storage.write_file(&file.filename, &file.bytes).await?;

    println!(
        "✅ Export saved to {}/{}",
        config.output_path(),
        file.filename
    );
    Ok(())
}

async fn run_template(
    api: &HttpProductApi,
    storage: &LocalStorage,
    config: &CliConfig,
    format: FileFormat,
) -> product_import::Result<()> {
    let file = api.export_template(format).await?;
    storage.write_file(&file.filename, &file.bytes).await?;

    println!(
        "✅ Template saved to {}/{}",
        config.output_path(),
        file.filename
    );
    Ok(())
}
