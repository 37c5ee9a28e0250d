//! LookML Generator CLI
//!
//! Loads a CSV, TSV, Parquet, JSON or YAML file and prints or writes the
//! LookML view and dashboard generated from it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lookml_gen::analyzers::ColumnClassifier;
use lookml_gen::config::ProjectConfig;
use lookml_gen::dataset::Dataset;
use lookml_gen::error::LookmlError;
use lookml_gen::formatters::{render_profile_json, render_profile_table};
use lookml_gen::generator::ArtifactGenerator;
use lookml_gen::logging::setup::{init_logging, LoggingConfig};
use lookml_gen::sources::load_dataset;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lookml-gen", author, version, about, long_about = None)]
struct Cli {
    /// Log per-column and per-tile decisions
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the automatic classification of every column
    Inspect {
        file: PathBuf,

        /// Print profiles as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate the LookML view
    View {
        file: PathBuf,

        #[command(flatten)]
        project: ProjectArgs,

        #[arg(long)]
        sql_table_name: Option<String>,

        /// Database and schema prefixed to the view name when no table name is given
        #[arg(long)]
        schema: Option<String>,

        /// Classify columns from the data instead of the configured overrides
        #[arg(long)]
        auto: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate the LookML dashboard
    Dashboard {
        file: PathBuf,

        #[command(flatten)]
        project: ProjectArgs,

        #[arg(long)]
        title: Option<String>,

        /// Suggest tiles from the classified fields when none are configured
        #[arg(long)]
        suggest: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write the view and the dashboard described by a project file
    Generate {
        file: PathBuf,

        #[arg(long)]
        config: PathBuf,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct ProjectArgs {
    /// Project file (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    view_name: Option<String>,
}

impl ProjectArgs {
    fn load(&self) -> Result<ProjectConfig> {
        let mut config = match &self.config {
            Some(path) => ProjectConfig::from_path(path)
                .with_context(|| format!("loading project file {}", path.display()))?,
            None => ProjectConfig::default(),
        };
        if let Some(view_name) = &self.view_name {
            config = config.with_view_name(view_name);
        }
        Ok(config)
    }
}

#[derive(Args, Debug, Default)]
struct OutputArgs {
    /// Write the artifact into this directory instead of stdout
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = if cli.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::default()
    };
    init_logging(logging.with_json_format(cli.json_logs))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    run(cli.command).await
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Inspect { file, json } => {
            let dataset = load(&file).await?;
            let profiles = ColumnClassifier::new().profile(&dataset)?;
            if json {
                println!("{}", render_profile_json(&profiles)?);
            } else {
                print!("{}", render_profile_table(&profiles));
            }
        }
        Command::View {
            file,
            project,
            sql_table_name,
            schema,
            auto,
            output,
        } => {
            let mut config = project.load()?;
            if let Some(table) = sql_table_name {
                config = config.with_sql_table_name(table);
            }
            if let Some(schema) = schema {
                config = config.with_schema(schema);
            }
            if auto {
                config = config.with_auto_classify(true);
            }
            // Tiles are not rendered here.
            config.tiles.clear();
            config.suggest_tiles = false;

            let dataset = load(&file).await?;
            let artifacts = ArtifactGenerator::new(config).generate(&dataset)?;
            emit(
                output.out_dir.as_deref(),
                &artifacts.view_file_name,
                &artifacts.view_text,
            )?;
        }
        Command::Dashboard {
            file,
            project,
            title,
            suggest,
            output,
        } => {
            let mut config = project.load()?;
            if let Some(title) = title {
                config = config.with_dashboard_title(title);
            }
            if suggest {
                config = config.with_suggest_tiles(true);
            }

            let dataset = load(&file).await?;
            let artifacts = ArtifactGenerator::new(config).generate(&dataset)?;
            let dashboard = artifacts
                .dashboard
                .ok_or(LookmlError::NoTilesConfigured)
                .context("configure tiles in the project file or pass --suggest")?;
            emit(
                output.out_dir.as_deref(),
                &dashboard.file_name,
                &dashboard.yaml,
            )?;
        }
        Command::Generate {
            file,
            config,
            out_dir,
        } => {
            let project = ProjectArgs {
                config: Some(config),
                view_name: None,
            }
            .load()?;

            let dataset = load(&file).await?;
            let artifacts = ArtifactGenerator::new(project).generate(&dataset)?;
            emit(Some(&out_dir), &artifacts.view_file_name, &artifacts.view_text)?;
            if let Some(dashboard) = &artifacts.dashboard {
                emit(Some(&out_dir), &dashboard.file_name, &dashboard.yaml)?;
            }
        }
    }
    Ok(())
}

async fn load(file: &Path) -> Result<Dataset> {
    let dataset = load_dataset(file)
        .await
        .with_context(|| format!("loading {}", file.display()))?;
    info!(
        path = %file.display(),
        rows = dataset.num_rows(),
        columns = dataset.num_columns(),
        "Loaded dataset"
    );
    Ok(dataset)
}

/// Prints an artifact, or writes it as `out_dir/file_name`.
fn emit(out_dir: Option<&Path>, file_name: &str, content: &str) -> Result<()> {
    match out_dir {
        Some(dir) => {
            let path = write_artifact(dir, file_name, content)?;
            println!("{}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn write_artifact(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "Wrote artifact");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_view() {
        let cli = Cli::try_parse_from([
            "lookml-gen",
            "view",
            "orders.csv",
            "--view-name",
            "orders",
            "--schema",
            "ANALYTICS.CORE",
            "--auto",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(!cli.json_logs);
        match cli.command {
            Command::View {
                file,
                project,
                schema,
                auto,
                output,
                ..
            } => {
                assert_eq!(file, PathBuf::from("orders.csv"));
                assert_eq!(project.view_name.as_deref(), Some("orders"));
                assert_eq!(schema.as_deref(), Some("ANALYTICS.CORE"));
                assert!(auto);
                assert!(output.out_dir.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_generate_requires_config() {
        assert!(Cli::try_parse_from(["lookml-gen", "generate", "orders.csv"]).is_err());

        let cli = Cli::try_parse_from([
            "lookml-gen",
            "--json-logs",
            "generate",
            "orders.csv",
            "--config",
            "project.yml",
        ])
        .unwrap();
        assert!(cli.json_logs);
        match cli.command {
            Command::Generate { out_dir, .. } => assert_eq!(out_dir, PathBuf::from(".")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_project_args_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.yml");
        std::fs::write(&path, "view_name: orders\nmodel_name: retail\n").unwrap();

        let config = ProjectArgs {
            config: Some(path),
            view_name: Some("orders_v2".to_string()),
        }
        .load()
        .unwrap();
        assert_eq!(config.view_name, "orders_v2");
        assert_eq!(config.model_name, "retail");
    }

    #[test]
    fn test_write_artifact_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("lookml");
        let path = write_artifact(&out, "orders.view.lkml", "view: orders {\n}").unwrap();
        assert_eq!(path, out.join("orders.view.lkml"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "view: orders {\n}");
    }

    #[tokio::test]
    async fn test_generate_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("orders.csv");
        let mut rows = String::from("id,amount\n");
        for i in 0..20 {
            rows.push_str(&format!("{i},5\n"));
        }
        std::fs::write(&data, rows).unwrap();
        let project = dir.path().join("project.yml");
        std::fs::write(
            &project,
            "view_name: orders\nauto_classify: true\nsuggest_tiles: true\n",
        )
        .unwrap();
        let out = dir.path().join("out");

        run(Command::Generate {
            file: data,
            config: project,
            out_dir: out.clone(),
        })
        .await
        .unwrap();

        assert!(out.join("orders.view.lkml").exists());
        assert!(out
            .join("my_advanced_lookml_dashboard.dashboard.lookml")
            .exists());
    }

    #[tokio::test]
    async fn test_dashboard_suggest_without_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("orders.csv");
        let mut rows = String::from("id,region,amount\n");
        for i in 0..40 {
            rows.push_str(&format!("{i},{},{}\n", ["north", "south"][i % 2], i % 3));
        }
        std::fs::write(&data, rows).unwrap();
        let out = dir.path().join("out");

        let cli = Cli::try_parse_from([
            "lookml-gen",
            "dashboard",
            data.to_str().unwrap(),
            "--view-name",
            "orders",
            "--title",
            "Sales Overview",
            "--suggest",
            "--out-dir",
            out.to_str().unwrap(),
        ])
        .unwrap();
        run(cli.command).await.unwrap();

        let yaml = std::fs::read_to_string(out.join("sales_overview.dashboard.lookml")).unwrap();
        assert!(yaml.contains("title: Total amount"));
        assert!(yaml.contains("explore: orders"));
    }
}
