//! unoutline CLI - document outline and persona analysis tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unoutline::collection::CollectionConfig;
use unoutline::{
    AnalyzeOptions, CollectionAnalyzer, EmbeddingProvider, JsonFormat, LinkOptions,
    OutlineOptions, OutlineSet, PersonaStore, PrecomputedEmbeddings, TitleOptions,
    SIMILARITY_THRESHOLD,
};

#[derive(Parser)]
#[command(name = "unoutline")]
#[command(version)]
#[command(about = "Infer document outlines and persona-ranked sections from layout data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the title and outline of layout files
    ///
    /// With several files the output is one JSON object keyed by file name.
    Outline {
        /// Input layout JSON files
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output Markdown instead of JSON
        #[arg(long, conflicts_with = "compact")]
        markdown: bool,

        /// Consider title candidates anywhere on the first page
        #[arg(long)]
        no_title_limit: bool,
    },

    /// Rank and link sections of a document collection for a persona
    Analyze {
        /// Collection directory (input.json + layouts/)
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Persona name (defaults to the manifest persona)
        #[arg(long)]
        persona: Option<String>,

        /// Persona table JSON file (defaults to the built-in table)
        #[arg(long, value_name = "FILE", env = "UNOUTLINE_PERSONAS")]
        personas: Option<PathBuf>,

        /// Precomputed embeddings JSON file (text -> vector)
        #[arg(long, value_name = "FILE")]
        embeddings: Option<PathBuf>,

        /// Similarity threshold for connections
        #[arg(long, default_value_t = SIMILARITY_THRESHOLD)]
        threshold: f32,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List known personas
    Personas {
        /// Persona table JSON file (defaults to the built-in table)
        #[arg(long, value_name = "FILE", env = "UNOUTLINE_PERSONAS")]
        personas: Option<PathBuf>,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            inputs,
            output,
            compact,
            markdown,
            no_title_limit,
        }) => cmd_outline(&inputs, output.as_deref(), compact, markdown, no_title_limit),
        Some(Commands::Analyze {
            dir,
            persona,
            personas,
            embeddings,
            threshold,
            output,
        }) => cmd_analyze(
            &dir,
            persona.as_deref(),
            personas.as_deref(),
            embeddings.as_deref(),
            threshold,
            output.as_deref(),
        ),
        Some(Commands::Personas { personas, json }) => cmd_personas(personas.as_deref(), json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: unoutline <COMMAND>".yellow());
            println!("       unoutline --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(
    inputs: &[PathBuf],
    output: Option<&Path>,
    compact: bool,
    markdown: bool,
    no_title_limit: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = OutlineOptions::new();
    if no_title_limit {
        options = options.with_title(TitleOptions::default().anywhere_on_page());
    }
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let rendered = match inputs {
        [input] => {
            let result = unoutline::outline_file_with_options(input, &options)?;
            if markdown {
                unoutline::render::outline_to_markdown(&result)
            } else {
                unoutline::render::to_json(&result, format)?
            }
        }
        _ => {
            let pb = progress_bar(inputs.len());
            pb.set_message("Outlining...");
            let outlines = unoutline::outline_files(pb.wrap_iter(inputs.iter()), &options);
            pb.finish_and_clear();
            render_outline_set(&outlines?, markdown, format)?
        }
    };

    write_output(output, &rendered)
}

/// Render several outlines: one JSON object keyed by file name, or Markdown
/// documents separated by rules.
fn render_outline_set(
    outlines: &OutlineSet,
    markdown: bool,
    format: JsonFormat,
) -> unoutline::Result<String> {
    if !markdown {
        return unoutline::render::to_json(outlines, format);
    }
    let parts: Vec<String> = outlines
        .iter()
        .map(|(name, result)| {
            format!(
                "<!-- {} -->\n{}",
                name,
                unoutline::render::outline_to_markdown(result)
            )
        })
        .collect();
    Ok(parts.join("\n\n---\n\n"))
}

fn cmd_analyze(
    dir: &Path,
    persona: Option<&str>,
    personas: Option<&Path>,
    embeddings: Option<&Path>,
    threshold: f32,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = CollectionConfig::load(dir)?;
    let store = load_personas(personas)?;
    let persona = persona.unwrap_or(&config.persona.role).to_string();

    let pb = progress_bar(config.documents.len());

    let mut documents = Vec::with_capacity(config.documents.len());
    for entry in &config.documents {
        pb.set_message(entry.filename.clone());
        match entry.load(dir) {
            Ok(doc) => documents.push(doc),
            Err(e) => pb.println(format!(
                "{} {}: {}",
                "Skipped".yellow(),
                entry.filename,
                e
            )),
        }
        pb.inc(1);
    }

    log::debug!(
        "Analyzing {} of {} documents for {:?}",
        documents.len(),
        config.documents.len(),
        persona
    );
    pb.set_message("Ranking sections...");
    let provider = match embeddings {
        Some(path) => Some(PrecomputedEmbeddings::open(path)?),
        None => None,
    };

    let options = AnalyzeOptions::new().with_link(LinkOptions::new().with_threshold(threshold));
    let mut analyzer = CollectionAnalyzer::new(&store, &persona, &options)?;
    let result = analyzer.analyze(
        &documents,
        provider.as_ref().map(|p| p as &dyn EmbeddingProvider),
    );
    pb.finish_with_message("Done!");

    if let Some(ref reason) = result.connection_error {
        eprintln!("{} {}", "Connections skipped:".yellow(), reason);
    }

    let json = unoutline::render::to_json(&result, JsonFormat::Pretty)?;
    write_output(output, &json)?;

    if output.is_some() {
        println!(
            "{} {} sections, {} connections",
            "Analyzed".green().bold(),
            result.sections.len(),
            result.connections.len()
        );
    }

    Ok(())
}

fn cmd_personas(personas: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = load_personas(personas)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&store)?);
        return Ok(());
    }

    println!("{}", "Personas".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for name in store.names() {
        let profile = store.resolve(name);
        let keywords: Vec<String> = profile
            .keywords
            .iter()
            .map(|(k, w)| format!("{}={}", k, w))
            .collect();
        println!(
            "{} (min {}pt): {}",
            name.bold(),
            profile.min_font_size,
            keywords.join(", ")
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document outline and persona analysis tool");
    println!();
    println!("License: MIT");
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

fn load_personas(path: Option<&Path>) -> unoutline::Result<PersonaStore> {
    match path {
        Some(path) => PersonaStore::open(path),
        None => Ok(PersonaStore::builtin()),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_personas_builtin() {
        let store = load_personas(None).unwrap();
        assert!(store.get("Travel Planner").is_some());
    }

    #[test]
    fn test_load_personas_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Auditor": {{"keywords": {{"ledger": 4}}, "min_font_size": 9}}}}"#
        )
        .unwrap();

        let store = load_personas(Some(file.path())).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve("Auditor").keywords["ledger"], 4);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output(Some(&path), "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_cli_parses_several_outline_inputs() {
        let cli = Cli::parse_from(["unoutline", "outline", "a.json", "b.json", "--compact"]);
        match cli.command {
            Some(Commands::Outline {
                inputs, compact, ..
            }) => {
                assert_eq!(inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert!(compact);
            }
            _ => panic!("expected outline"),
        }
        assert!(Cli::try_parse_from(["unoutline", "outline"]).is_err());
    }

    #[test]
    fn test_outline_several_files_keyed_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = Vec::new();
        for (stem, title) in [("file01", "Annual Report"), ("file02", "Field Guide")] {
            let doc = unoutline::LayoutDocument::new(stem).with_page(vec![
                unoutline::TextRun::bold(title, 20.0).at(72.0, 50.0),
            ]);
            let path = dir.path().join(format!("{}.json", stem));
            fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
            inputs.push(path);
        }
        let out = dir.path().join("out.json");

        cmd_outline(&inputs, Some(&out), true, false, false).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["file01.json"]["title"], "Annual Report");
        assert_eq!(value["file02.json"]["title"], "Field Guide");
        assert!(value["file02.json"]["outline"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_outline_set_markdown() {
        let mut outlines = OutlineSet::new();
        outlines.insert("a.json".to_string(), unoutline::OutlineResult::new("Alpha", vec![]));
        outlines.insert("b.json".to_string(), unoutline::OutlineResult::new("Beta", vec![]));

        let markdown = render_outline_set(&outlines, true, JsonFormat::Pretty).unwrap();
        assert!(markdown.starts_with("<!-- a.json -->\n# Alpha"));
        assert!(markdown.contains("---\n\n<!-- b.json -->\n# Beta"));
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::parse_from([
            "unoutline",
            "analyze",
            "collection",
            "--persona",
            "HR Professional",
            "--threshold",
            "0.8",
        ]);
        match cli.command {
            Some(Commands::Analyze {
                persona, threshold, ..
            }) => {
                assert_eq!(persona.as_deref(), Some("HR Professional"));
                assert_eq!(threshold, 0.8);
            }
            _ => panic!("expected analyze"),
        }
    }
}
