//! Concurrency helper: bounded parallel map that keeps input order.

use rayon::prelude::*;

/// Apply `f` to every item with at most `limit` calls in flight.
/// Output order matches input order for any `limit`.
pub fn map_ordered_limited<T, R, F>(items: &[T], limit: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Sync + Fn(&T) -> R,
{
    if limit <= 1 {
        return items.iter().map(&f).collect();
    }
    let mut out = Vec::with_capacity(items.len());
    for chunk in items.chunks(limit) {
        let part: Vec<R> = chunk.par_iter().map(&f).collect();
        out.extend(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_at_any_limit() {
        let items: Vec<u32> = (0..37).collect();
        for limit in [0, 1, 4, 64] {
            let out = map_ordered_limited(&items, limit, |x| x * 2);
            assert_eq!(out, items.iter().map(|x| x * 2).collect::<Vec<_>>());
        }
    }
}
