use std::io;

/// Error returned while evaluating a single rule.
///
/// No error is swallowed inside the core: each of these halts
/// evaluation of the current rule after the caller has had a chance to
/// journal a `failed` record and emit user-facing diagnostics. The
/// caller decides whether to abandon the whole rule graph or recover.
#[derive(Debug, thiserror::Error)]
pub enum Error
{
    /// A source file could not be read.
    #[error("cannot read source: {0}")]
    SourceUnreadable(#[source] io::Error),

    /// Setting up the scratch directory (mkdir, copy, or link) failed.
    #[error("cannot set up scratch directory: {0}")]
    ScratchSetupFailed(#[source] io::Error),

    /// The build script exited with a nonzero status.
    #[error("build script failed with {status}")]
    BuildScriptFailed
    {
        /// The exit status of the build script, formatted by the
        /// standard library (e.g. `exit status: 1`, or
        /// `signal: 9 (SIGKILL)`).
        status: String,

        /// The contents of `snowflake-log`, for display to the user.
        log: String,
    },

    /// The build script exited successfully but did not produce
    /// `snowflake-output`.
    #[error("snowflake-output is missing after a successful build")]
    OutputMissing,

    /// An unexpected filesystem error occurred while promoting the
    /// build's output into the stash.
    ///
    /// This does not include the benign case of the destination
    /// already being present (or a non-empty directory refusing the
    /// rename) — that outcome is not an error; see [`Stash::promote`].
    ///
    /// [`Stash::promote`]: /snowflake-manual/index.html
    #[error("cannot promote output to stash: {0}")]
    PromotionFailed(#[source] io::Error),

    /// Reading or writing the build-hash → output-hash cache mapping
    /// failed.
    #[error("cache I/O error: {0}")]
    CacheIOError(#[source] io::Error),
}
