//! Command-line entry point: evaluate a small demo rule graph against
//! an on-disk state directory.

use {
    anyhow::Context,
    clap::Parser,
    snowflake::{state::State, Config, Evaluator},
    snowflake_core::{Rule, Source},
    snowflake_util::source_name::SourceName,
    std::{collections::BTreeMap, path::PathBuf, rc::Rc},
};

/// Evaluate a rule graph against a Snowflake state directory.
#[derive(Parser)]
struct Args
{
    /// Path to the state directory. Created if it does not exist.
    #[arg(long, default_value = ".snowflake")]
    state_dir: PathBuf,
}

fn demo_graph() -> Rc<Rule>
{
    let mut leaf_sources = BTreeMap::new();
    leaf_sources.insert(
        SourceName::new("snowflake-build").unwrap(),
        Source::Inline(b"#!/bin/sh\necho hello from leaf > snowflake-output\n".to_vec()),
    );
    let leaf = Rc::new(Rule::new("leaf", vec![], leaf_sources));

    let mut top_sources = BTreeMap::new();
    top_sources.insert(
        SourceName::new("snowflake-build").unwrap(),
        Source::Inline(
            b"#!/bin/sh\ncat \"$1\" > snowflake-output\n".to_vec(),
        ),
    );
    Rc::new(Rule::new("top", vec![leaf], top_sources))
}

fn main() -> anyhow::Result<()>
{
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("reading configuration")?;
    let shell = config.shell.clone();
    let state = State::open(&args.state_dir, config)
        .with_context(|| format!("opening state directory {}", args.state_dir.display()))?;

    let evaluator = Evaluator::new(&state, &shell);
    let rule = demo_graph();

    let output_hash = evaluator.evaluate(&rule).context("evaluating demo rule graph")?;

    println!("{} -> {output_hash}", rule.name);
    Ok(())
}
