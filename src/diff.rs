//! Line-level opcode diff
//!
//! Classic longest-common-subsequence alignment over lines treated as opaque
//! tokens, emitting coalesced contiguous opcodes (Equal / Delete / Insert /
//! Replace) that cover both sequences completely and in order. Lyric
//! documents are small, so the quadratic DP table is a non-issue.

use std::ops::Range;

/// Classification of one contiguous opcode range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    /// `original[range]` equals `modified[range]`
    Equal,

    /// `original[range]` was removed
    Delete,

    /// `modified[range]` was added
    Insert,

    /// `original[range]` was replaced by `modified[range]`
    Replace,
}

/// One opcode: a tag plus the index ranges it covers in each sequence.
///
/// For `Delete` the modified range is empty, for `Insert` the original range
/// is empty; both are still positioned at the correct insertion point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOp {
    pub tag: DiffTag,
    pub original: Range<usize>,
    pub modified: Range<usize>,
}

/// Compute the opcode sequence transforming `original` into `modified`.
///
/// Opcodes are emitted in order, adjacent same-classification runs are
/// coalesced, and together they cover `0..original.len()` and
/// `0..modified.len()` exactly. Two empty inputs produce no opcodes.
pub fn diff_lines<T: PartialEq>(original: &[T], modified: &[T]) -> Vec<DiffOp> {
    let matches = matching_indices(original, modified);
    let mut ops = Vec::new();
    let mut i = 0;
    let mut j = 0;
    let mut k = 0;

    while i < original.len() || j < modified.len() {
        if let Some(&(mi, mj)) = matches.get(k) {
            if i < mi || j < mj {
                ops.push(gap_op(i..mi, j..mj));
                i = mi;
                j = mj;
            }
            // coalesce the run of consecutive matches into one Equal op
            let start = (i, j);
            while matches.get(k) == Some(&(i, j)) {
                i += 1;
                j += 1;
                k += 1;
            }
            ops.push(DiffOp {
                tag: DiffTag::Equal,
                original: start.0..i,
                modified: start.1..j,
            });
        } else {
            ops.push(gap_op(i..original.len(), j..modified.len()));
            i = original.len();
            j = modified.len();
        }
    }

    ops
}

fn gap_op(original: Range<usize>, modified: Range<usize>) -> DiffOp {
    let tag = match (original.is_empty(), modified.is_empty()) {
        (false, false) => DiffTag::Replace,
        (false, true) => DiffTag::Delete,
        (true, false) => DiffTag::Insert,
        (true, true) => unreachable!("gap op requires a non-empty side"),
    };
    DiffOp {
        tag,
        original,
        modified,
    }
}

/// Index pairs of one longest common subsequence, in order
fn matching_indices<T: PartialEq>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    let n = a.len();
    let m = b.len();

    // lengths[i][j] = LCS length of a[i..] and b[j..]
    let mut lengths = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if a[i] == b[j] {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }

    let mut matches = Vec::with_capacity(lengths[0][0]);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            matches.push((i, j));
            i += 1;
            j += 1;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    matches
}
