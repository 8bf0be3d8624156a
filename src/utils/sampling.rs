use rand::seq::SliceRandom;
use rand::Rng;

/// Returns up to `count` items drawn without replacement, in random order.
pub fn sample<T: Clone>(items: &[T], count: usize) -> Vec<T> {
    sample_with(&mut rand::thread_rng(), items, count)
}

pub fn sample_with<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T], count: usize) -> Vec<T> {
    if items.is_empty() || count == 0 {
        return Vec::new();
    }
    let mut pool: Vec<T> = items.to_vec();
    let amount = count.min(pool.len());
    let (picked, _) = pool.partial_shuffle(rng, amount);
    picked.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn length_is_bounded_by_input_and_count() {
        let items: Vec<u32> = (0..100).collect();
        for (len, count) in [(0usize, 5usize), (1, 5), (1, 0), (5, 60), (100, 60), (100, 100)] {
            let out = sample(&items[..len], count);
            assert_eq!(out.len(), count.min(len), "len={} count={}", len, count);
        }
    }

    #[test]
    fn never_repeats_an_element() {
        let items: Vec<u32> = (0..80).collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let out = sample_with(&mut rng, &items, 60);
            let unique: HashSet<_> = out.iter().collect();
            assert_eq!(unique.len(), out.len());
            assert!(out.iter().all(|x| items.contains(x)));
        }
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let items = vec!["a", "b", "c", "d", "e", "f"];
        let first = sample_with(&mut StdRng::seed_from_u64(42), &items, 4);
        let second = sample_with(&mut StdRng::seed_from_u64(42), &items, 4);
        assert_eq!(first, second);
    }

    #[test]
    fn full_sample_is_a_permutation() {
        let items: Vec<u32> = (0..12).collect();
        let mut out = sample(&items, 12);
        out.sort();
        assert_eq!(out, items);
    }
}
