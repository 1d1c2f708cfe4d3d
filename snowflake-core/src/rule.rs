use {
    crate::{hasher, source::Source},
    snowflake_util::{hash::Hash, source_name::SourceName},
    std::{cell::OnceCell, collections::BTreeMap, io, rc::Rc},
};

/// An immutable, named unit of work: a set of named sources plus an
/// ordered list of dependency rules, producing a single output
/// artifact.
///
/// Rules form a directed acyclic graph through [`dependencies`]; a
/// rule holds shared references ([`Rc`]) to its dependencies rather
/// than owning them, since the same dependency may be shared by many
/// rules. Cycles are undefined behavior the caller must prevent — this
/// type does not check for them.
///
/// Each rule memoizes its three hashes (sources, build, output) at
/// most once per process, per invariant 4. Because the evaluator that
/// drives this engine is single-threaded and blocking (see the
/// concurrency model), a plain [`OnceCell`] suffices: there is never a
/// second thread racing to compute the same hash.
///
/// [`dependencies`]: `Self::dependencies`
pub struct Rule
{
    /// Human-readable name. Informative only; need not be unique.
    pub name: String,

    /// Ordered dependency rules. Order is significant: it is folded
    /// into the build hash (see [`hasher::build_hash`]).
    pub dependencies: Vec<Rc<Rule>>,

    /// Mapping from logical source name to how that source is
    /// supplied.
    pub sources: BTreeMap<SourceName, Source>,

    sources_hash: OnceCell<Hash>,
    build_hash:   OnceCell<Hash>,
    output_hash:  OnceCell<Hash>,
}

impl Rule
{
    /// Construct a new rule.
    pub fn new(
        name: impl Into<String>,
        dependencies: Vec<Rc<Rule>>,
        sources: BTreeMap<SourceName, Source>,
    ) -> Self
    {
        Self{
            name: name.into(),
            dependencies,
            sources,
            sources_hash: OnceCell::new(),
            build_hash:   OnceCell::new(),
            output_hash:  OnceCell::new(),
        }
    }

    /// The rule's sources hash, computed at most once.
    ///
    /// Pure: depends only on [`sources`][`Self::sources`], never
    /// touches the Cache or Stash.
    pub fn sources_hash(&self) -> io::Result<Hash>
    {
        if let Some(hash) = self.sources_hash.get() {
            return Ok(*hash);
        }
        let hash = hasher::sources_hash(&self.sources)?;
        // Lost races (there are none, see struct docs) just mean a
        // redundant set(); the value is identical either way.
        let _ = self.sources_hash.set(hash);
        Ok(hash)
    }

    /// The memoization slot for the build hash.
    ///
    /// Unlike [`sources_hash`][`Self::sources_hash`], the build hash
    /// cannot be computed by the rule alone: it folds in dependency
    /// *output* hashes, and obtaining those may require building the
    /// dependencies. That recursive, Backend-driven computation is the
    /// evaluator's responsibility; this method only exposes the slot
    /// it reads and writes.
    pub fn build_hash_cell(&self) -> &OnceCell<Hash>
    {
        &self.build_hash
    }

    /// The memoization slot for the output hash.
    ///
    /// Like [`build_hash_cell`][`Self::build_hash_cell`], populated by
    /// the evaluator: computing this value may require running the
    /// build script.
    pub fn output_hash_cell(&self) -> &OnceCell<Hash>
    {
        &self.output_hash
    }
}
