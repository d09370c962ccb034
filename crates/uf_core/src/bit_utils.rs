pub struct BitPack;

impl BitPack {
    /// Number of u64 words needed to hold `bits` flags.
    #[inline(always)]
    pub fn words_for(bits: usize) -> usize {
        bits.div_ceil(64)
    }

    #[inline(always)]
    pub fn get(storage: &[u64], index: usize) -> bool {
        let word = storage[index / 64];
        let bit = index % 64;
        (word >> bit) & 1 == 1
    }

    #[inline(always)]
    pub fn toggle(storage: &mut [u64], index: usize) {
        let word_idx = index / 64;
        let bit_idx = index % 64;
        storage[word_idx] ^= 1 << bit_idx;
    }

    #[inline(always)]
    pub fn set(storage: &mut [u64], index: usize, val: bool) {
        let word_idx = index / 64;
        let bit_idx = index % 64;
        if val {
            storage[word_idx] |= 1 << bit_idx;
        } else {
            storage[word_idx] &= !(1 << bit_idx);
        }
    }

    pub fn count_ones(storage: &[u64]) -> usize {
        storage.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn iter_ones(storage: &[u64]) -> impl Iterator<Item = usize> + '_ {
        storage.iter().enumerate().flat_map(|(w, &word)| {
            let mut rest = word;
            core::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(w * 64 + bit)
            })
        })
    }
}
