use {
    serde::{Deserialize, Serialize},
    snowflake_util::hash::Hash,
    std::time::Duration,
};

/// The outcome of evaluating a single rule, as recorded in the
/// journal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome
{
    /// The build hash was already present in the cache; the runner
    /// was not invoked.
    Cached,

    /// The runner was invoked and produced an output.
    Success,

    /// The runner was invoked and failed, or its output was rejected.
    Failed,
}

/// A single row of the journal: the outcome of evaluating one rule.
///
/// The journal is append-only and diagnostic only — the engine never
/// reads it back. It exists so a human (or a log aggregator) can
/// reconstruct what happened during an evaluation after the fact.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BuildRecord
{
    /// The rule's human-readable name. Informative only; not unique.
    pub name: String,

    /// The rule's build hash.
    pub build_hash: Hash,

    /// The rule's output hash, if the build reached that point.
    pub output_hash: Option<Hash>,

    /// When evaluation of this rule began, as a Unix timestamp in
    /// seconds.
    pub start_time: u64,

    /// How long evaluation of this rule took, if it finished.
    pub duration: Option<Duration>,

    /// What happened.
    pub outcome: Outcome,
}
