//! Classify Extracted Elements
//!
//! Reads a JSON array of text elements, classifies every element and prints
//! the results (or the assembled structured document) as pretty JSON.
//!
//! Usage:
//!   cargo run --release --bin classify_elements -- elements.json
//!   cargo run --release --bin classify_elements -- elements.json --metrics metrics.json
//!   cargo run --release --bin classify_elements -- elements.json --structure --strict
//!
//! Set `RUST_LOG=debug` to see per-element decisions.

use doc_structure::structure::StructureBuilder;
use doc_structure::{ClassifierConfig, DocumentClassifier, Error, Result, TextElement};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

struct CliConfig {
    input: PathBuf,
    metrics: Option<PathBuf>,
    config: Option<PathBuf>,
    preset: Option<String>,
    structure: bool,
    plain_text: bool,
}

impl CliConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut metrics = None;
        let mut config = None;
        let mut preset = None;
        let mut structure = false;
        let mut plain_text = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--metrics" => {
                    i += 1;
                    metrics = args.get(i).map(PathBuf::from);
                },
                "--config" => {
                    i += 1;
                    config = args.get(i).map(PathBuf::from);
                },
                "--strict" | "--lenient" => {
                    preset = Some(args[i].trim_start_matches("--").to_string());
                },
                "--structure" => {
                    structure = true;
                },
                "--text" => {
                    structure = true;
                    plain_text = true;
                },
                other if !other.starts_with("--") && input.is_none() => {
                    input = Some(PathBuf::from(other));
                },
                other => {
                    eprintln!("Warning: ignoring unknown argument {}", other);
                },
            }
            i += 1;
        }

        Some(Self {
            input: input?,
            metrics,
            config,
            preset,
            structure,
            plain_text,
        })
    }

    fn classifier_config(&self) -> Result<ClassifierConfig> {
        let mut config = match self.preset.as_deref() {
            Some("strict") => ClassifierConfig::strict(),
            Some("lenient") => ClassifierConfig::lenient(),
            _ => ClassifierConfig::default(),
        };

        if let Some(path) = &self.config {
            let text = fs::read_to_string(path)?;
            config = serde_json::from_str(&text)?;
        }

        Ok(config)
    }
}

fn read_json(path: &PathBuf) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn run(cli: &CliConfig) -> Result<()> {
    let input = read_json(&cli.input)?;
    let values = match input {
        Value::Array(values) => values,
        Value::Object(mut object) => match object.remove("elements") {
            Some(Value::Array(values)) => values,
            _ => {
                return Err(Error::InvalidElement {
                    index: 0,
                    reason: "expected an \"elements\" array".to_string(),
                })
            },
        },
        _ => {
            return Err(Error::InvalidElement {
                index: 0,
                reason: "expected a JSON array of elements".to_string(),
            })
        },
    };

    let raw_metrics = match &cli.metrics {
        Some(path) => Some(read_json(path)?),
        None => None,
    };

    let classifier = DocumentClassifier::with_config(cli.classifier_config()?);
    let results = classifier.classify_values(&values, raw_metrics.as_ref());
    log::info!("Classified {} elements", results.len());

    if !cli.structure {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let elements: Vec<TextElement> = values
        .iter()
        .enumerate()
        .map(|(index, value)| TextElement::from_value(index, value).unwrap_or_default())
        .collect();
    let metrics = classifier.metrics_for_values(&values, raw_metrics.as_ref());
    let document = StructureBuilder::new().build_with_metrics(&elements, &results, &metrics);

    if cli.plain_text {
        print!("{}", document.to_plain_text());
    } else {
        println!("{}", document.to_json()?);
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let Some(cli) = CliConfig::from_args() else {
        eprintln!(
            "Usage: classify_elements <elements.json> [--metrics <metrics.json>] \
             [--config <config.json>] [--strict|--lenient] [--structure|--text]"
        );
        std::process::exit(2);
    };

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
