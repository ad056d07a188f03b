//! Conformance runner: every fixture must survive a decode/encode round trip
//! unchanged, and its `/cases` table must agree with the string-or-array codec.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use json_poly::{stream, PolymorphicValue, StringOrStringArray};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "dev-test-runner")]
struct Cli {
    /// fixture glob
    #[arg(default_value = "dev-test-runner/fixtures/*.json")]
    pattern: String,
}

#[derive(Debug, Deserialize)]
struct Case {
    field: serde_json::Value,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expect {
    Items(Vec<String>),
    Outcome(ExpectedFailure),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ExpectedFailure {
    TypeMismatch,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli.pattern) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            eprintln!("{}", format!("{failed} fixture(s) failed").red().bold());
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(pattern: &str) -> Result<usize> {
    let paths = glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern: {pattern}"))?
        .collect::<Result<Vec<PathBuf>, _>>()?;
    if paths.is_empty() {
        anyhow::bail!("glob pattern matched no files: {pattern}");
    }
    let mut failed = 0;
    for path in &paths {
        match check_fixture(path) {
            Ok(cases) => println!("✅ {} {}", path.display(), format!("({cases} cases)").dimmed()),
            Err(error) => {
                failed += 1;
                println!("❌ {} {}", path.display(), format!("{error:#}").red());
            }
        }
    }
    Ok(failed)
}

fn check_fixture(path: &Path) -> Result<usize> {
    let src = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let reference: serde_json::Value = serde_json::from_str(&src).context("reference decode")?;
    let decoded = stream::from_str(&src).context("polymorphic decode")?;

    let expected = serde_json::to_string(&reference)?;
    let actual = stream::to_string(&decoded);
    if expected != actual {
        anyhow::bail!("round trip differs\n  expected: {expected}\n  actual:   {actual}");
    }
    if serde_json::Value::from(decoded.clone()) != reference {
        anyhow::bail!("converted value differs from reference");
    }

    let Some(cases) = decoded.pointer("/cases") else { return Ok(0) };
    let cases: Vec<Case> = {
        let de = &mut serde_json::Deserializer::from_str(&cases.to_string());
        serde_path_to_error::deserialize(de).context("malformed /cases table")?
    };
    for (index, case) in cases.iter().enumerate() {
        check_case(case).with_context(|| format!("/cases/{index}"))?;
    }
    Ok(cases.len())
}

fn check_case(case: &Case) -> Result<()> {
    let field = PolymorphicValue::from(case.field.clone());
    match (StringOrStringArray::from_value(&field), &case.expect) {
        (Ok(items), Expect::Items(expected)) if &*items == expected.as_slice() => Ok(()),
        (Err(error), Expect::Outcome(ExpectedFailure::TypeMismatch)) if error.is_type_mismatch() => Ok(()),
        (got, _) => anyhow::bail!("field {} gave {got:?}, expected {:?}", case.field, case.expect),
    }
}
