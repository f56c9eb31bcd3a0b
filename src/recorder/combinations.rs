/// Lexicographic enumeration of the ordered k-subsets of `0..n`: every way to
/// pick `k` finger slots in increasing index order. Pairing these with a
/// chord's ascending notes encodes the no-crossing constraint directly, so
/// full permutations never need to be enumerated.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    k: usize,
    cursor: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        let cursor = if k <= n { Some((0..k).collect()) } else { None };
        Combinations { n, k, cursor }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.cursor.take()?;

        // Advance: bump the rightmost index that still has headroom and
        // reset everything after it.
        let mut next = current.clone();
        let mut advanced = false;
        for i in (0..self.k).rev() {
            if next[i] < self.n - self.k + i {
                next[i] += 1;
                for j in i + 1..self.k {
                    next[j] = next[j - 1] + 1;
                }
                advanced = true;
                break;
            }
        }
        if advanced {
            self.cursor = Some(next);
        }

        Some(current)
    }
}
