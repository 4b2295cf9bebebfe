//! Fixed-length bitset used to encode one side of a bipartition.
//!
//! # Overview
//! Each bit position corresponds to a species id handed out by
//! [`TaxonIndex`](crate::taxa::TaxonIndex). A split and its complement describe
//! the same bipartition, so splits are compared in their **canonical form**:
//! the orientation in which bit 0 (the first indexed leaf) is set.
//!
//! # Example
//! For leaves [A, B, C, D] mapped to ids [0, 1, 2, 3]:
//! - {A, B} | {C, D} → `0b0011` (already canonical, A is set)
//! - {C, D} | {A, B} → `0b1100` → canonical `0b0011`

/// A fixed-length bitset over `len` leaves.
///
/// Bits are packed into `u64` words; bits at positions `>= len` are always zero,
/// so derived equality and hashing only depend on the represented leaf set.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Bitset {
    words: Vec<u64>,
    len: usize,
}

impl Bitset {
    /// Creates a bitset over `len` leaves with every bit cleared.
    ///
    /// # Example
    /// ```
    /// # use tree_split_distances::bitset::Bitset;
    /// // 100 leaves need 2 words (128 bits)
    /// let bs = Bitset::zeros(100);
    /// assert_eq!(bs.words().len(), 2);
    /// assert_eq!(bs.count_ones(), 0);
    /// ```
    pub fn zeros(len: usize) -> Self {
        Bitset {
            words: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Number of leaves this bitset ranges over.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed words, least significant bit of word 0 is leaf 0.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Sets the bit of leaf `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    ///
    /// # Example
    /// ```
    /// # use tree_split_distances::bitset::Bitset;
    /// let mut bs = Bitset::zeros(8);
    /// bs.set(0);
    /// bs.set(5);
    /// assert_eq!(bs.words()[0], 0b00100001);
    /// ```
    #[inline]
    pub fn set(&mut self, idx: usize) {
        assert!(idx < self.len, "bit {idx} out of range for {} leaves", self.len);
        let word = idx >> 6; // idx / 64
        let bit = idx & 63; // idx % 64
        self.words[word] |= 1u64 << bit;
    }

    /// Returns whether leaf `idx` is set. Out-of-range positions read as unset.
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        idx < self.len && (self.words[idx >> 6] >> (idx & 63)) & 1 == 1
    }

    /// Bitwise OR with another bitset of the same length (union of leaf sets).
    ///
    /// # Example
    /// ```
    /// # use tree_split_distances::bitset::Bitset;
    /// let mut left = Bitset::zeros(4);
    /// left.set(0);
    /// let mut right = Bitset::zeros(4);
    /// right.set(1);
    /// left.or_assign(&right);
    /// assert_eq!(left.words()[0], 0b11);
    /// ```
    #[inline]
    pub fn or_assign(&mut self, other: &Bitset) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    /// Population count: how many leaves lie on this side of the split.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Hamming distance to `other`, i.e. `popcount(self ^ other)`.
    #[inline]
    pub fn xor_count(&self, other: &Bitset) -> usize {
        debug_assert_eq!(self.len, other.len);
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones() as usize)
            .sum()
    }

    /// Bitwise complement restricted to the first `len` bits.
    ///
    /// # Example
    /// ```
    /// # use tree_split_distances::bitset::Bitset;
    /// let mut bs = Bitset::zeros(4);
    /// bs.set(0);
    /// bs.set(1);
    /// assert_eq!(bs.complement().words()[0], 0b1100);
    /// ```
    pub fn complement(&self) -> Bitset {
        let mut words: Vec<u64> = self.words.iter().map(|w| !w).collect();
        let tail = self.len & 63;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
        Bitset { words, len: self.len }
    }

    /// Whether this orientation is the canonical one (leaf 0 set).
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.get(0)
    }

    /// Canonical orientation of the bipartition: itself if leaf 0 is set,
    /// otherwise its complement.
    ///
    /// # Example
    /// ```
    /// # use tree_split_distances::bitset::Bitset;
    /// let mut cd = Bitset::zeros(4);
    /// cd.set(2);
    /// cd.set(3);
    /// assert_eq!(cd.clone().canonical().words()[0], 0b0011);
    /// assert_eq!(cd.clone().canonical(), cd.complement().canonical());
    /// ```
    pub fn canonical(self) -> Bitset {
        if self.is_canonical() {
            self
        } else {
            self.complement()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_basic() {
        let mut bs = Bitset::zeros(4);
        bs.set(0);
        bs.set(2);
        assert_eq!(bs.words()[0], 0b0101);
        assert!(bs.get(0));
        assert!(!bs.get(1));
        assert!(!bs.get(17));
    }

    #[test]
    fn test_bitset_or() {
        let mut bs1 = Bitset::zeros(4);
        bs1.set(0);
        bs1.set(1);

        let mut bs2 = Bitset::zeros(4);
        bs2.set(2);
        bs2.set(3);

        bs1.or_assign(&bs2);
        assert_eq!(bs1.words()[0], 0b1111);
    }

    #[test]
    fn test_count_ones_and_xor() {
        let mut a = Bitset::zeros(6);
        a.set(0);
        a.set(2);
        a.set(5);
        assert_eq!(a.count_ones(), 3);

        let mut b = Bitset::zeros(6);
        b.set(0);
        b.set(1);
        assert_eq!(a.xor_count(&b), 3);
        assert_eq!(b.xor_count(&a), 3);
    }

    #[test]
    fn test_complement_masks_padding() {
        let mut bs = Bitset::zeros(5);
        bs.set(1);
        let comp = bs.complement();
        assert_eq!(comp.words()[0], 0b11101);
        assert_eq!(comp.count_ones(), 4);
        assert_eq!(comp.complement(), bs);
    }

    /// Splits {A,B}|{C,D,E} and {C,D,E}|{A,B} must collapse onto one value.
    ///
    /// ```text
    /// A=0, B=1, C=2, D=3, E=4
    /// {A,B}   0b00011  leaf 0 set   → keep
    /// {C,D,E} 0b11100  leaf 0 unset → flip to 0b00011
    /// ```
    #[test]
    fn test_canonical_is_orientation_free() {
        let mut ab = Bitset::zeros(5);
        ab.set(0);
        ab.set(1);
        let cde = ab.complement();

        assert!(ab.is_canonical());
        assert!(!cde.is_canonical());
        assert_eq!(ab.clone().canonical(), cde.canonical());
        assert_eq!(ab.clone().canonical(), ab);
    }

    #[test]
    fn test_large_tree() {
        // More than 64 leaves span multiple words
        let mut bs = Bitset::zeros(128);
        bs.set(0);
        bs.set(63);
        bs.set(64);
        bs.set(127);

        assert_eq!(bs.count_ones(), 4);
        assert_eq!(bs.words()[0], 1u64 | (1u64 << 63));
        assert_eq!(bs.words()[1], 1u64 | (1u64 << 63));
        assert_eq!(bs.complement().count_ones(), 124);
    }

    #[test]
    fn test_partial_last_word() {
        let mut bs = Bitset::zeros(70);
        bs.set(69);
        let comp = bs.complement();
        assert_eq!(comp.count_ones(), 69);
        assert!(comp.get(0));
        assert!(!comp.get(69));
        assert_eq!(comp.clone().canonical(), comp);
        assert_eq!(bs.canonical(), comp);
    }
}
