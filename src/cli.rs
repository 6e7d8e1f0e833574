use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bm-import")]
#[command(about = "A CLI tool for converting browser bookmark exports into Markdown notes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file
    #[arg(long, global = true, default_value = "bookmarks-importer.json")]
    pub config: PathBuf,

    /// Vault directory the Markdown file is written into
    #[arg(short = 'o', long, global = true, default_value = ".")]
    pub vault: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a bookmark export into the vault
    Import(ImportArgs),

    /// Print the rendered Markdown without writing anything
    Preview(PreviewArgs),

    /// Summarize a bookmark export
    Inspect(InspectArgs),

    /// Show or initialize the settings file
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct RenderOverrides {
    /// Rendering style for this run
    #[arg(long, value_parser = PossibleValuesParser::new(["list", "table", "cards"]))]
    pub view_mode: Option<String>,

    /// Screenshot service for table and card previews
    #[arg(long, value_parser = PossibleValuesParser::new(["thum.io", "api.thumbnail.ws", "none"]))]
    pub screenshot_service: Option<String>,

    /// Date format used for the {date} placeholder
    #[arg(long, value_parser = PossibleValuesParser::new([
        "YYYY-MM-DD", "DD-MM-YYYY", "MM-DD-YYYY", "YYYY/MM/DD", "DD/MM/YYYY", "MM/DD/YYYY",
    ]))]
    pub date_format: Option<String>,

    /// Leave out "Added on" dates in list mode
    #[arg(long)]
    pub no_dates: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Bookmark export (HTML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub overrides: RenderOverrides,

    /// Folder inside the vault, overriding the settings file
    #[arg(long, value_name = "FOLDER")]
    pub output_folder: Option<String>,

    /// Overwrite an existing file without asking
    #[arg(short, long, conflicts_with = "no_overwrite")]
    pub yes: bool,

    /// Never overwrite; write a timestamped copy instead
    #[arg(long)]
    pub no_overwrite: bool,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Bookmark export (HTML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub overrides: RenderOverrides,

    /// Include the document header
    #[arg(long)]
    pub with_header: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Bookmark export (HTML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write the parsed bookmark tree to a JSON file
    #[arg(long = "json", value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// List every bookmark with its folder path
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the effective settings to the settings file
    #[arg(long)]
    pub init: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_json_flag() {
        let cli = Cli::try_parse_from(["bm-import", "inspect", "export.html", "--json", "tree.json", "--detailed"]).unwrap();

        let Commands::Inspect(args) = cli.command else {
            panic!("expected the inspect command");
        };
        assert_eq!(args.file, PathBuf::from("export.html"));
        assert_eq!(args.json_output, Some(PathBuf::from("tree.json")));
        assert!(args.detailed);
    }

    #[test]
    fn test_overwrite_answers_conflict() {
        assert!(Cli::try_parse_from(["bm-import", "import", "export.html", "--yes"]).is_ok());
        assert!(Cli::try_parse_from(["bm-import", "import", "export.html", "--yes", "--no-overwrite"]).is_err());
    }
}
