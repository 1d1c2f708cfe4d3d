use std::path::PathBuf;

/// How a single entry of a rule's sources mapping is supplied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source
{
    /// Literal file content, given directly.
    Inline(Vec<u8>),

    /// A path on the host filesystem, materialized by recursive copy.
    OnDiskCopy(PathBuf),

    /// A path on the host filesystem, materialized by recursive hard
    /// link.
    ///
    /// Faster than [`OnDiskCopy`][`Self::OnDiskCopy`], but aliases the
    /// source tree with the scratch directory (and, after promotion,
    /// the stash): a build script that mutates this entry in place
    /// corrupts the stash. The caller accepts this risk by choosing
    /// this variant.
    OnDiskLink(PathBuf),
}
