mod cli;

use anyhow::Context;
use bookmarks_importer::services::importer::{convert, document_header, Notice};
use bookmarks_importer::services::renderer::flatten;
use bookmarks_importer::{
    Confirm, FilePicker, FixedAnswer, FsStorage, Importer, PathPicker, Settings, SettingsStore, TerminalConfirm,
};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands, ConfigArgs, ImportArgs, InspectArgs, PreviewArgs, RenderOverrides};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides --verbose
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_level(cli.verbose).into()))
        .with_target(false)
        .init();

    let store = SettingsStore::new(&cli.config);
    let settings = store
        .load()
        .await
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;

    let result = match &cli.command {
        Commands::Import(args) => handle_import_command(args, settings, &cli.vault).await,
        Commands::Preview(args) => handle_preview_command(args, settings).await,
        Commands::Inspect(args) => handle_inspect_command(args, &settings).await,
        Commands::Config(args) => handle_config_command(args, &settings, &store).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn fallback_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn apply_overrides(mut settings: Settings, overrides: &RenderOverrides) -> Settings {
    if let Some(view_mode) = &overrides.view_mode {
        settings.view_mode = view_mode.clone().into();
    }
    if let Some(service) = &overrides.screenshot_service {
        settings.screenshot_service = service.clone().into();
    }
    if let Some(date_format) = &overrides.date_format {
        settings.date_format = date_format.clone().into();
    }
    if overrides.no_dates {
        settings.include_descriptions = false;
    }
    settings
}

async fn read_export(path: &Path) -> anyhow::Result<String> {
    let html = PathPicker::new(Some(path.to_path_buf())).pick().await?;
    html.context("No file selected")
}

async fn handle_import_command(args: &ImportArgs, settings: Settings, vault: &Path) -> anyhow::Result<()> {
    let mut settings = apply_overrides(settings, &args.overrides);
    if let Some(folder) = &args.output_folder {
        settings.output_folder = folder.clone();
    }

    info!("Importing {} into {}", args.file.display(), vault.display());

    let storage = FsStorage::new(vault);
    let picker = PathPicker::new(Some(args.file.clone()));
    let notice = if args.yes || args.no_overwrite {
        run_import(&settings, storage, FixedAnswer(args.yes), &picker).await
    } else {
        run_import(&settings, storage, TerminalConfirm, &picker).await
    };

    // The importer already logged the failure
    if !show_notice(notice.as_ref()) {
        std::process::exit(1);
    }
    Ok(())
}

/// Prints the import notice and reports whether the import went through.
fn show_notice(notice: Option<&Notice>) -> bool {
    match notice {
        Some(failed @ Notice::Failed(_)) => {
            eprintln!("{}", failed);
            false
        }
        Some(notice) => {
            println!("{}", notice);
            true
        }
        None => true,
    }
}

async fn run_import<C: Confirm>(
    settings: &Settings,
    storage: FsStorage,
    confirm: C,
    picker: &PathPicker,
) -> Option<Notice> {
    Importer::new(settings, storage, confirm).run_with_notice(picker).await
}

async fn handle_preview_command(args: &PreviewArgs, settings: Settings) -> anyhow::Result<()> {
    let settings = apply_overrides(settings, &args.overrides);
    let html = read_export(&args.file).await?;
    let conversion = convert(&settings, &html)?;

    if args.with_header {
        print!("{}", document_header(Utc::now().date_naive(), &conversion.formatted_date));
    }
    print!("{}", conversion.markdown);
    Ok(())
}

async fn handle_inspect_command(args: &InspectArgs, settings: &Settings) -> anyhow::Result<()> {
    let html = read_export(&args.file).await?;
    let conversion = convert(settings, &html)?;

    println!("\n=== Analysis for '{}' ===", args.file.display());
    println!("Bookmarks: {}", conversion.stats.leaves);
    println!("Folders: {}", conversion.stats.folders);
    println!("Deepest folder nesting: {}", conversion.stats.max_depth);
    println!("Creation date: {} (from {})", conversion.formatted_date, conversion.creation_date.source);

    if args.detailed {
        println!("\nBookmark Details:");
        for bookmark in flatten(&conversion.bookmarks) {
            let added = bookmark
                .date_added
                .map(|date| format!(" (added {})", date))
                .unwrap_or_default();
            println!("  [{}] {} <{}>{}", bookmark.folder, bookmark.title, bookmark.url, added);
        }
    }

    if let Some(json_path) = &args.json_output {
        let json_content = serde_json::to_string_pretty(&serde_json::json!({
            "source": args.file.display().to_string(),
            "creation_date": conversion.formatted_date,
            "stats": conversion.stats,
            "bookmarks": conversion.bookmarks,
        }))
        .context("Failed to serialize bookmark tree")?;

        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON analysis file")?;

        info!("Bookmark tree written to: {}", json_path.display());
    }

    Ok(())
}

async fn handle_config_command(args: &ConfigArgs, settings: &Settings, store: &SettingsStore) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(settings)?);

    if args.init {
        store.save(settings).await?;
    } else {
        info!("Settings file: {}", store.path().display());
    }
    Ok(())
}
