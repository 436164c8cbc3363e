use clap::Parser;
use flowtable::prelude::*;
use serde::Deserialize;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- JSON Deserialization Structs (Input Format Specific) ---
// These match the diagram export format and are only used here for conversion.

#[derive(Deserialize)]
struct RawDiagram {
    steps: Vec<RawStep>,
    #[serde(default)]
    connections: Vec<RawConnection>,
    #[serde(default, alias = "classificationRules")]
    classification_rules: Option<RawKeywords>,
}

#[derive(Deserialize)]
struct RawStep {
    id: String,
    name: String,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default, alias = "parentId")]
    parent_id: Option<String>,
}

#[derive(Deserialize)]
struct RawConnection {
    #[serde(alias = "fromStepId")]
    from_step_id: String,
    #[serde(alias = "toStepId")]
    to_step_id: String,
    #[serde(rename = "type")]
    kind: String,
}

/// A missing list falls back to the default keywords.
#[derive(Deserialize)]
struct RawKeywords {
    #[serde(default, alias = "ruleKeywords", alias = "rule")]
    rule_keywords: Option<Vec<String>>,
    #[serde(default, alias = "behaviorKeywords", alias = "behavior")]
    behavior_keywords: Option<Vec<String>>,
}

impl RawKeywords {
    fn into_config(self) -> std::result::Result<KeywordConfig, KeywordConfigError> {
        let defaults = KeywordConfig::default();
        KeywordConfig::new(
            self.rule_keywords
                .unwrap_or_else(|| defaults.rule_keywords().to_vec()),
            self.behavior_keywords
                .unwrap_or_else(|| defaults.behavior_keywords().to_vec()),
        )
    }
}

// --- Converter Implementation ---

impl IntoDiagram for RawDiagram {
    fn into_diagram(self) -> std::result::Result<DiagramDefinition, ImportError> {
        let steps = self
            .steps
            .into_iter()
            .map(|raw| -> std::result::Result<Step, ImportError> {
                let kind = raw.kind.as_deref().map(parse_kind).transpose()?;
                Ok(Step {
                    id: StepId::new(raw.id),
                    name: raw.name,
                    alias: raw.alias,
                    description: raw.description,
                    kind,
                    parent: raw.parent_id.map(StepId::new),
                    assumptions: Vec::new(),
                    questions: Vec::new(),
                    images: Vec::new(),
                })
            })
            .collect::<std::result::Result<Vec<_>, ImportError>>()?;

        let connections = self
            .connections
            .into_iter()
            .map(|raw| -> std::result::Result<Connection, ImportError> {
                let kind = match raw.kind.to_lowercase().as_str() {
                    "success" => ConnectionKind::Success,
                    "failure" => ConnectionKind::Failure,
                    other => {
                        return Err(ImportError::Validation(format!(
                            "Unknown connection type '{}'",
                            other
                        )));
                    }
                };
                Ok(Connection::new(
                    StepId::new(raw.from_step_id),
                    StepId::new(raw.to_step_id),
                    kind,
                ))
            })
            .collect::<std::result::Result<Vec<_>, ImportError>>()?;

        let keywords = self
            .classification_rules
            .map(RawKeywords::into_config)
            .transpose()
            .map_err(|e| ImportError::Validation(e.to_string()))?;

        Ok(DiagramDefinition {
            steps,
            connections,
            keywords,
        })
    }
}

fn parse_kind(kind: &str) -> std::result::Result<StepKind, ImportError> {
    match kind.to_lowercase().as_str() {
        "state" => Ok(StepKind::State),
        "rule" => Ok(StepKind::Rule),
        "behavior" | "behaviour" => Ok(StepKind::Behavior),
        other => Err(ImportError::Validation(format!(
            "Unknown step type '{}'",
            other
        ))),
    }
}

/// Compiles a step diagram into a state-machine transition table (CSV)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the diagram JSON file
    diagram_path: String,

    /// Path to a state dictionary JSON object (qualified name -> label)
    #[arg(long)]
    state_dict: Option<String>,

    /// Path to a rule dictionary JSON object (qualified name -> label)
    #[arg(long)]
    rule_dict: Option<String>,

    /// Path to a keyword configuration JSON file, overriding the diagram's own
    #[arg(short, long)]
    keywords: Option<String>,

    /// Priority given to every generated row
    #[arg(short, long, default_value_t = 50)]
    priority: i32,

    /// Where to write the CSV. Prints to stdout when omitted
    #[arg(short, long)]
    output: Option<String>,

    /// Write the effective state/rule dictionaries next to the output
    #[arg(long)]
    emit_dictionaries: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Loading and Conversion ---
    let diagram_json = fs::read_to_string(&cli.diagram_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read diagram file '{}': {}",
            &cli.diagram_path, e
        ))
    });
    let raw: RawDiagram = serde_json::from_str(&diagram_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse diagram JSON: {}", e)));
    let mut project = Project::import(raw)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to import diagram: {}", e)));

    if let Some(path) = &cli.keywords {
        let keywords = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| KeywordConfig::from_json(&json).map_err(|e| e.to_string()))
            .unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to load keywords from '{}': {}", path, e))
            });
        project.set_keywords(keywords);
        project.reclassify();
        project.regenerate_dictionaries();
    }
    if let Some(path) = &cli.state_dict {
        project.dictionaries_mut().state = load_dictionary(path);
    }
    if let Some(path) = &cli.rule_dict {
        project.dictionaries_mut().rule = load_dictionary(path);
    }

    // --- 2. Compilation ---
    let compile_start = Instant::now();
    let table = Compiler::builder(project.store())
        .with_keywords(project.keywords().clone())
        .with_classifications(project.classifications().clone())
        .with_dictionaries(project.dictionaries().clone())
        .with_default_priority(cli.priority)
        .build()
        .compile();
    let compile_duration = compile_start.elapsed();

    // --- 3. Export ---
    let csv = to_csv_string(&table.rows);
    match &cli.output {
        Some(path) => {
            fs::write(path, &csv).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write CSV to '{}': {}", path, e))
            });
            if cli.emit_dictionaries {
                write_dictionaries(&project, path);
            }
        }
        None => print!("{}", csv),
    }

    // --- 4. Summary ---
    eprintln!("\n--- Diagram Summary ---");
    eprintln!("Steps:        {}", project.store().len());
    eprintln!("Connections:  {}", project.store().connections().len());
    eprintln!("Rows:         {}", table.len());
    eprintln!("Diagnostics:  {}", table.diagnostics.len());
    for diagnostic in &table.diagnostics {
        eprintln!("  -> {}", diagnostic);
    }
    eprintln!("\n--- Performance Summary ---");
    eprintln!("Compilation:      {:?}", compile_duration);
    eprintln!("Total Execution:  {:?}", total_start.elapsed());
}

fn load_dictionary(path: &str) -> Dictionary {
    fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| Dictionary::from_json(&json).map_err(|e| e.to_string()))
        .unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load dictionary '{}': {}", path, e))
        })
}

fn write_dictionaries(project: &Project, output_path: &str) {
    let stem = output_path.trim_end_matches(".csv");
    for (suffix, dictionary) in [
        ("state", &project.dictionaries().state),
        ("rule", &project.dictionaries().rule),
    ] {
        let path = format!("{}.{}-dictionary.json", stem, suffix);
        let json = dictionary
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode dictionary: {}", e)));
        fs::write(&path, json)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
        eprintln!("  -> Wrote {} dictionary to '{}'", suffix, path);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
