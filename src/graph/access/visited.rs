//! Visited sets for graph traversals.
//!
//! Traversal bookkeeping runs on the calling thread only, so the set is a plain
//! word-packed bitset. Hooks never touch it.

const WORD_BITS: usize = u64::BITS as usize;

/// A dense, word-packed set of node indices.
#[derive(Debug, Clone)]
pub(crate) struct VisitedSet {
    words: Vec<u64>,
    len: usize,
}

impl VisitedSet {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Returns `true` iff `node` was not yet visited, marking it visited.
    #[inline(always)]
    pub(crate) fn try_visit(&mut self, node: usize) -> bool {
        let (word, mask) = Self::locate(node);
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }

    #[inline(always)]
    pub(crate) fn is_visited(&self, node: usize) -> bool {
        let (word, mask) = Self::locate(node);
        self.words[word] & mask != 0
    }

    /// Lowest unvisited index at or after `from`.
    pub(crate) fn first_unvisited_from(&self, from: usize) -> Option<usize> {
        if from >= self.len {
            return None;
        }
        let mut word = from / WORD_BITS;
        // Treat bits below `from` in the first word as visited.
        let mut bits = !self.words[word] & (u64::MAX << (from % WORD_BITS));
        loop {
            if bits != 0 {
                let index = word * WORD_BITS + bits.trailing_zeros() as usize;
                return (index < self.len).then_some(index);
            }
            word += 1;
            if word == self.words.len() {
                return None;
            }
            bits = !self.words[word];
        }
    }

    #[inline(always)]
    fn locate(node: usize) -> (usize, u64) {
        (node / WORD_BITS, 1u64 << (node % WORD_BITS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_visit_marks_once() {
        let mut set = VisitedSet::new(70);
        assert!(set.try_visit(65));
        assert!(!set.try_visit(65));
        assert!(set.is_visited(65));
        assert!(!set.is_visited(64));
    }

    #[test]
    fn test_first_unvisited_skips_full_words() {
        let mut set = VisitedSet::new(130);
        for i in 0..129 {
            set.try_visit(i);
        }
        assert_eq!(set.first_unvisited_from(0), Some(129));
        set.try_visit(129);
        assert_eq!(set.first_unvisited_from(0), None);
    }

    #[test]
    fn test_first_unvisited_respects_start() {
        let mut set = VisitedSet::new(10);
        set.try_visit(4);
        assert_eq!(set.first_unvisited_from(0), Some(0));
        assert_eq!(set.first_unvisited_from(4), Some(5));
        assert_eq!(set.first_unvisited_from(10), None);
        assert_eq!(VisitedSet::new(0).first_unvisited_from(0), None);
    }
}
