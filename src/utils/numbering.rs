//! First-fit allocation of display numbers over a sparse integer space

use std::collections::HashSet;

/// Tracks taken display numbers and hands out the lowest free slot at or
/// above a requested number.
#[derive(Debug, Default)]
pub struct NumberPool {
    taken: HashSet<u32>,
}

impl NumberPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the lowest free number >= `wanted` and mark it taken
    pub fn claim(&mut self, wanted: u32) -> u32 {
        let mut number = wanted;
        while self.taken.contains(&number) {
            number += 1;
        }
        self.taken.insert(number);
        number
    }

    pub fn is_taken(&self, number: u32) -> bool {
        self.taken.contains(&number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_free_number() {
        let mut pool = NumberPool::new();
        assert_eq!(pool.claim(101), 101);
    }

    #[test]
    fn test_claim_collides_and_increments() {
        let mut pool = NumberPool::new();
        assert_eq!(pool.claim(101), 101);
        assert_eq!(pool.claim(101), 102);
        assert_eq!(pool.claim(101), 103);
        assert_eq!(pool.claim(102), 104);
    }

    #[test]
    fn test_claim_skips_run_of_taken_numbers() {
        let mut pool = NumberPool::new();
        pool.claim(10);
        pool.claim(11);
        pool.claim(12);
        assert_eq!(pool.claim(10), 13);
        assert_eq!(pool.claim(9), 9);
    }
}
