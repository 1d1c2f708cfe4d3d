//! Driving a rule graph to completion.

use {
    crate::fanout,
    snowflake_actions::{read_log, RunOutcome, Runner},
    snowflake_core::{Backend, BuildRecord, Error, Outcome, Rule},
    snowflake_util::hash::Hash,
    std::{path::Path, rc::Rc, time::{Instant, SystemTime, UNIX_EPOCH}},
    tracing::{info, info_span, warn},
};

/// Evaluates a rule graph against a [`Backend`].
///
/// Single-threaded and recursive, matching the rule graph's own
/// structure: a rule's output hash cannot be known until every
/// dependency's output hash is known, so dependencies are always
/// evaluated before their dependents.
pub struct Evaluator<'a, B: Backend>
{
    backend: &'a B,
    shell: &'a Path,
}

impl<'a, B: Backend> Evaluator<'a, B>
{
    /// Construct an evaluator driven against `backend`, invoking build
    /// scripts with `shell`.
    pub fn new(backend: &'a B, shell: &'a Path) -> Self
    {
        Self{backend, shell}
    }

    /// Evaluate `rule` and every rule it transitively depends on,
    /// returning `rule`'s output hash.
    ///
    /// Memoized per rule for the lifetime of this process (invariant
    /// 4): evaluating the same [`Rc<Rule>`] twice in one evaluator run
    /// does no repeated work.
    pub fn evaluate(&self, rule: &Rc<Rule>) -> Result<Hash, Error>
    {
        if let Some(hash) = rule.output_hash_cell().get() {
            return Ok(*hash);
        }

        let span = info_span!("evaluate", rule = %rule.name);
        let _guard = span.enter();

        let dep_output_hashes = rule.dependencies.iter()
            .map(|dep| self.evaluate(dep))
            .collect::<Result<Vec<_>, _>>()?;

        let result = self.evaluate_uncached(rule, &dep_output_hashes);

        if let Ok(hash) = result {
            let _ = rule.output_hash_cell().set(hash);
        }

        result
    }

    fn evaluate_uncached(&self, rule: &Rule, dep_output_hashes: &[Hash])
        -> Result<Hash, Error>
    {
        let start_time = unix_now();
        let started = Instant::now();

        let sources_hash = rule.sources_hash().map_err(Error::SourceUnreadable)?;
        let build_hash = *rule.build_hash_cell().get_or_init(|| {
            snowflake_core::build_hash(sources_hash, dep_output_hashes)
        });

        let cached = self.backend.get_cache(build_hash)?
            .filter(|&output_hash| self.backend.stash_exists(output_hash));

        if let Some(output_hash) = cached {
            info!(%build_hash, %output_hash, "cache hit");
            self.journal(rule, build_hash, Some(output_hash), start_time,
                         started.elapsed(), Outcome::Cached);
            return Ok(output_hash);
        }

        match self.run(rule, build_hash, dep_output_hashes) {
            Ok(output_hash) => {
                self.journal(rule, build_hash, Some(output_hash), start_time,
                             started.elapsed(), Outcome::Success);
                Ok(output_hash)
            }
            Err(err) => {
                warn!(%build_hash, error = %err, "build failed");
                self.journal(rule, build_hash, None, start_time,
                             started.elapsed(), Outcome::Failed);
                Err(err)
            }
        }
    }

    fn run(&self, rule: &Rule, build_hash: Hash, dep_output_hashes: &[Hash])
        -> Result<Hash, Error>
    {
        self.backend.prepare_scratch(build_hash, &rule.sources)?;

        let scratch_dir = self.backend.scratch_path(build_hash);
        let dependency_paths: Vec<_> =
            dep_output_hashes.iter().map(|hash| fanout::dependency_path(*hash)).collect();

        let runner = Runner{shell: self.shell};
        let outcome = runner.run(&scratch_dir, &dependency_paths)
            .map_err(|err| Error::BuildScriptFailed{
                status: "shell could not be spawned".to_owned(),
                log: err.to_string(),
            })?;

        if let RunOutcome::Failed{status} = outcome {
            let log = read_log(&scratch_dir).unwrap_or_default();
            return Err(Error::BuildScriptFailed{status: status.to_string(), log});
        }

        let output_path = scratch_dir.join("snowflake-output");
        if !output_path.exists() {
            return Err(Error::OutputMissing);
        }

        let output_hash = snowflake_core::output_hash(&output_path)
            .map_err(Error::ScratchSetupFailed)?;

        self.backend.promote(&output_path, output_hash)?;
        self.backend.set_cache(build_hash, output_hash)?;

        Ok(output_hash)
    }

    fn journal(
        &self,
        rule: &Rule,
        build_hash: Hash,
        output_hash: Option<Hash>,
        start_time: u64,
        duration: std::time::Duration,
        outcome: Outcome,
    )
    {
        let record = BuildRecord{
            name: rule.name.clone(),
            build_hash,
            output_hash,
            start_time,
            duration: Some(duration),
            outcome,
        };
        if let Err(err) = self.backend.record_build(&record) {
            warn!(error = %err, "failed to write journal record");
        }
    }
}

fn unix_now() -> u64
{
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
mod tests
{
    use {
        super::*,
        crate::{config::Config, state::State},
        snowflake_util::source_name::SourceName,
        std::collections::BTreeMap,
    };

    fn rule_with_script(name: &str, body: &str, deps: Vec<Rc<Rule>>) -> Rc<Rule>
    {
        let mut sources = BTreeMap::new();
        sources.insert(SourceName::new("snowflake-build").unwrap(),
                        snowflake_core::Source::Inline(body.as_bytes().to_vec()));
        Rc::new(Rule::new(name, deps, sources))
    }

    #[test]
    fn evaluating_a_leaf_rule_produces_an_output_hash()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = Config{shell: "/bin/sh".into(), copy: "cp".into()};
        let state = State::open(dir.path(), config).unwrap();
        let evaluator = Evaluator::new(&state, Path::new("/bin/sh"));

        let rule = rule_with_script(
            "leaf",
            "#!/bin/sh\necho hi > snowflake-output\n",
            vec![],
        );

        let hash = evaluator.evaluate(&rule).unwrap();
        let output_path = state.output_path(hash);
        assert_eq!(std::fs::read(output_path).unwrap(), b"hi\n");
    }

    #[test]
    fn evaluating_twice_in_process_is_memoized()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = Config{shell: "/bin/sh".into(), copy: "cp".into()};
        let state = State::open(dir.path(), config).unwrap();
        let evaluator = Evaluator::new(&state, Path::new("/bin/sh"));

        let rule = rule_with_script(
            "leaf",
            "#!/bin/sh\ndate +%s%N > snowflake-output\n",
            vec![],
        );

        let first = evaluator.evaluate(&rule).unwrap();
        let second = evaluator.evaluate(&rule).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn a_fresh_rule_with_the_same_build_hash_hits_the_backend_cache()
    {
        // Two distinct Rule objects (so no in-process memoization can
        // help) with identical sources produce identical build hashes,
        // so the second evaluation must come from the Cache rather
        // than re-running a build script whose output is different
        // every time it actually runs.
        let dir = tempfile::tempdir().unwrap();
        let config = Config{shell: "/bin/sh".into(), copy: "cp".into()};
        let state = State::open(dir.path(), config).unwrap();
        let evaluator = Evaluator::new(&state, Path::new("/bin/sh"));

        let script = "#!/bin/sh\n{ date +%s%N; echo $$; } > snowflake-output\n";
        let first_hash = evaluator.evaluate(&rule_with_script("leaf", script, vec![])).unwrap();
        let second_hash = evaluator.evaluate(&rule_with_script("leaf", script, vec![])).unwrap();
        assert_eq!(first_hash, second_hash);
    }

    #[test]
    fn dependency_output_is_reachable_from_the_dependent()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = Config{shell: "/bin/sh".into(), copy: "cp".into()};
        let state = State::open(dir.path(), config).unwrap();
        let evaluator = Evaluator::new(&state, Path::new("/bin/sh"));

        let dep = rule_with_script(
            "dep",
            "#!/bin/sh\necho dep-output > snowflake-output\n",
            vec![],
        );
        let top = rule_with_script(
            "top",
            "#!/bin/sh\ncat \"$1\" > snowflake-output\n",
            vec![dep],
        );

        let hash = evaluator.evaluate(&top).unwrap();
        let output = std::fs::read(state.output_path(hash)).unwrap();
        assert_eq!(output, b"dep-output\n");
    }

    #[test]
    fn a_cache_hit_whose_stash_entry_is_gone_is_rebuilt()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = Config{shell: "/bin/sh".into(), copy: "cp".into()};
        let state = State::open(dir.path(), config).unwrap();
        let evaluator = Evaluator::new(&state, Path::new("/bin/sh"));

        let script = "#!/bin/sh\n{ date +%s%N; echo $$; } > snowflake-output\n";
        let first_hash = evaluator.evaluate(&rule_with_script("leaf", script, vec![])).unwrap();

        std::fs::remove_file(state.output_path(first_hash)).unwrap();

        // The cache still records build_hash -> first_hash, but the
        // stash entry is gone, so this must run the script again
        // rather than return a hash with nothing behind it.
        let second_hash = evaluator.evaluate(&rule_with_script("leaf", script, vec![])).unwrap();
        assert!(state.output_path(second_hash).exists());
    }

    #[test]
    fn missing_output_is_an_error()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = Config{shell: "/bin/sh".into(), copy: "cp".into()};
        let state = State::open(dir.path(), config).unwrap();
        let evaluator = Evaluator::new(&state, Path::new("/bin/sh"));

        let rule = rule_with_script("leaf", "#!/bin/sh\ntrue\n", vec![]);

        let err = evaluator.evaluate(&rule).unwrap_err();
        assert!(matches!(err, Error::OutputMissing));
    }

    #[test]
    fn failing_build_script_is_reported_with_its_log()
    {
        let dir = tempfile::tempdir().unwrap();
        let config = Config{shell: "/bin/sh".into(), copy: "cp".into()};
        let state = State::open(dir.path(), config).unwrap();
        let evaluator = Evaluator::new(&state, Path::new("/bin/sh"));

        let rule = rule_with_script(
            "leaf",
            "#!/bin/sh\necho boom 1>&2\nexit 1\n",
            vec![],
        );

        let err = evaluator.evaluate(&rule).unwrap_err();
        match err {
            Error::BuildScriptFailed{log, ..} => assert!(log.contains("boom")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
