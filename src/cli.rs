//! Minimal CLI: decode → (normalize | narrow | decode into a model)
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use json_poly::models::default_registry;
use json_poly::stream::{self, ValueStream};
use json_poly::{DecodeOptions, DuplicateKeys, GenericJsonValue, PolymorphicValue, ServiceEndpointValue, StringOrStringArray};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// decode JSON/NDJSON wire payloads into polymorphic values and print their
/// canonical form, a narrowed view, or a model decode
#[derive(Parser, Debug)]
#[command(name = "json-poly", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// decode and print the canonical encoding
    Normalize(NormalizeOut),
    /// apply a narrowing accessor to each document
    Narrow(NarrowOut),
    /// decode each document into a registered model and print its wire form
    Decode(DecodeOut),
    /// list the registered model ids
    Models,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /service/0/serviceEndpoint)
    #[arg(long)]
    json_pointer: Option<String>,

    /// fail on repeated object keys instead of keeping the last one
    #[arg(long, default_value_t = false)]
    reject_duplicate_keys: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// indent JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(clap::Parser, Debug)]
struct NormalizeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Narrowing {
    String,
    Bool,
    Number,
    Array,
    StringOrArray,
    ServiceEndpoint,
}

#[derive(clap::Parser, Debug)]
struct NarrowOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// accessor to apply
    #[arg(long = "as", value_enum)]
    as_: Narrowing,
}

#[derive(clap::Parser, Debug)]
struct DecodeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// registered model id (see `json-poly models`)
    #[arg(long)]
    model: String,
}

/// Result of a run: the number of documents that failed.
#[derive(Debug, Default)]
pub struct Outcome {
    pub failures: usize,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn options(&self) -> DecodeOptions {
        DecodeOptions {
            duplicate_keys: if self.reject_duplicate_keys { DuplicateKeys::Reject } else { DuplicateKeys::LastWins },
        }
    }

    /// Feed every selected document to `apply`. Per-document failures are
    /// reported and counted; I/O and glob errors abort.
    fn load_process(
        &self,
        outcome: &mut Outcome,
        mut apply: impl FnMut(&PolymorphicValue) -> json_poly::Result<String>,
    ) -> Result<Vec<String>> {
        let options = self.options();
        let mut lines = Vec::new();
        for source in resolve_file_path_patterns(&self.input)? {
            let (label, bytes) = source.read()?;
            let documents: Vec<(String, json_poly::Result<PolymorphicValue>)> = if self.ndjson {
                ValueStream::from_slice(&bytes, options)
                    .enumerate()
                    .map(|(i, doc)| (format!("{label}#{}", i + 1), doc.map(|(_, v)| v)))
                    .collect()
            } else {
                vec![(label.clone(), stream::from_slice_with(&bytes, options))]
            };
            for (doc_label, doc) in documents {
                let result = doc.and_then(|value| match self.json_pointer.as_deref() {
                    None => apply(&value),
                    Some(pointer) => match value.pointer(pointer) {
                        Some(node) => apply(node),
                        None => Err(json_poly::ValueError::Decode {
                            target: "document".to_string(),
                            path: pointer.to_string(),
                            message: "JSON pointer selects nothing".to_string(),
                        }),
                    },
                });
                match result {
                    Ok(line) => lines.push(line),
                    Err(error) => {
                        outcome.failures += 1;
                        tracing::debug!(document = %doc_label, %error, "document failed");
                        eprintln!("{doc_label}: {error}");
                    }
                }
            }
        }
        Ok(lines)
    }
}

impl OutputSettings {
    fn render(&self, value: &PolymorphicValue) -> String {
        if self.pretty { stream::to_string_pretty(value) } else { stream::to_string(value) }
    }

    fn write(&self, lines: &[String]) -> Result<()> {
        let mut text = lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
            }
            None => {
                print!("{text}");
                Ok(())
            }
        }
    }
}

impl Narrowing {
    fn apply(self, value: &PolymorphicValue) -> json_poly::Result<PolymorphicValue> {
        let generic = GenericJsonValue::new(value.clone());
        match self {
            Narrowing::String => generic.as_string().map(PolymorphicValue::from),
            Narrowing::Bool => generic.as_bool().map(PolymorphicValue::from),
            Narrowing::Number => generic.as_number().cloned().map(PolymorphicValue::from),
            Narrowing::Array => generic.as_array().map(|xs| PolymorphicValue::Sequence(xs.to_vec())),
            Narrowing::StringOrArray => StringOrStringArray::from_value(value)
                .map(|xs| PolymorphicValue::from(xs.into_vec())),
            Narrowing::ServiceEndpoint => ServiceEndpointValue::new(value.clone())
                .as_array()
                .map(|xs| PolymorphicValue::Sequence(xs.into_owned())),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<Outcome> {
        let mut outcome = Outcome::default();
        match &self.cmd {
            Command::Normalize(target) => {
                let output = &target.output_settings;
                let lines = target
                    .input_settings
                    .load_process(&mut outcome, |value| Ok(output.render(value)))?;
                output.write(&lines)?;
            }
            Command::Narrow(target) => {
                let output = &target.output_settings;
                let narrowing = target.as_;
                let lines = target
                    .input_settings
                    .load_process(&mut outcome, |value| narrowing.apply(value).map(|v| output.render(&v)))?;
                output.write(&lines)?;
            }
            Command::Decode(target) => {
                let registry = default_registry();
                if !registry.contains(&target.model) {
                    let known = registry.type_ids().collect::<Vec<_>>().join(", ");
                    anyhow::bail!("unknown model `{}` (known: {known})", target.model);
                }
                let output = &target.output_settings;
                let lines = target.input_settings.load_process(&mut outcome, |value| {
                    registry.decode_to_value(&target.model, value).map(|v| output.render(&v))
                })?;
                output.write(&lines)?;
            }
            Command::Models => {
                for id in default_registry().type_ids() {
                    println!("{id}");
                }
            }
        }
        Ok(outcome)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    fn read(&self) -> Result<(String, Vec<u8>)> {
        match self {
            Source::Stdin => {
                let mut bytes = Vec::new();
                std::io::stdin().read_to_end(&mut bytes).context("failed to read stdin")?;
                Ok(("<stdin>".to_string(), bytes))
            }
            Source::File(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read source file {}", path.display()))?;
                Ok((path.to_string_lossy().to_string(), bytes))
            }
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<Source>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<Source>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            out.push(Source::Stdin);
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                matched_any = true;
                out.push(Source::File(entry?));
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(Source::File(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}
