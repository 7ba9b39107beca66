//! Leaf directory reduction
//!
//! FTP `MKD` only creates one level at a time, so every directory a file
//! lands in must exist before the upload. Creating each *leaf* recursively
//! is enough: its ancestors come along for free.

use crate::domain::value_objects::RelativePath;

/// Compute the minimal set of leaf directories for a list of file paths.
///
/// The result has set semantics: no member is an ancestor of another and
/// the root is never included. Members are ordered by when they became a
/// leaf, so output is deterministic for a given input.
pub fn leaf_directories(paths: &[RelativePath]) -> Vec<RelativePath> {
    let mut leaves: Vec<RelativePath> = Vec::new();

    for path in paths {
        let directory = match path.parent() {
            Some(dir) if !dir.is_root() => dir,
            _ => continue,
        };

        if leaves.is_empty() {
            leaves.push(directory);
            continue;
        }

        // Members never nest, so at most one of them is an ancestor of `directory`.
        if let Some(index) = leaves.iter().position(|leaf| leaf.is_ancestor_of(&directory)) {
            leaves.remove(index);
            leaves.push(directory);
            continue;
        }

        if leaves.iter().any(|leaf| directory.contains(leaf)) {
            continue;
        }

        leaves.push(directory);
    }

    leaves
}
