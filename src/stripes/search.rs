//! Runs of equally labelled stripes.

use super::calculator::StripeEvaluation;
use super::positioning::StripeIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchFrom {
    Top,
    Bottom,
}

/// First stripe, scanning from `from`, that starts a run of `min_number`
/// consecutive stripes labelled `value`; `-1` if there is none.
///
/// Scanning from the bottom the returned index is the lowest stripe of the
/// run. A `min_number` of zero is treated as one.
pub fn find_stripe_index(
    stripes: &[StripeEvaluation],
    from: SearchFrom,
    value: StripeEvaluation,
    min_number: usize,
) -> StripeIndex {
    let run = min_number.max(1);
    let n = stripes.len();
    if n < run {
        return -1;
    }
    let matches_run = |lo: usize| stripes[lo..lo + run].iter().all(|&s| s == value);
    match from {
        SearchFrom::Top => (0..=n - run)
            .find(|&start| matches_run(start))
            .map_or(-1, |start| start as StripeIndex),
        SearchFrom::Bottom => (run - 1..n)
            .rev()
            .find(|&bottom| matches_run(bottom + 1 - run))
            .map_or(-1, |bottom| bottom as StripeIndex),
    }
}
