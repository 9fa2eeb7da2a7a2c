use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

pub const PAGE_SIZE: usize = 20;
// Stays below the page size so a short page still leaves room for re-sampling.
pub const MAX_INDEX: usize = 18;
// The catalog refuses listing pages above this, whatever `total_pages` says.
pub const MAX_PAGES: u32 = 500;

pub trait Entropy: Send + Sync {
    /// Uniform draw in `[0, upper)`. Returns 0 when `upper` is 0.
    fn below(&self, upper: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEntropy;

impl Entropy for SystemEntropy {
    fn below(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }
}

#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Entropy for SeededEntropy {
    fn below(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(0..upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub page: u32,
    pub index: usize,
}

#[derive(Clone)]
pub struct Sampler {
    entropy: Arc<dyn Entropy>,
}

impl Sampler {
    pub fn new(entropy: Arc<dyn Entropy>) -> Self {
        Self { entropy }
    }

    pub fn pick(&self, page_count: u32) -> Draw {
        let pages = page_count.clamp(1, MAX_PAGES);
        let page = self.draw_below(pages as usize) as u32 + 1;
        let index = self.draw_below(MAX_INDEX) + 1;
        Draw { page, index }
    }

    fn draw_below(&self, upper: usize) -> usize {
        self.entropy.below(upper).min(upper.saturating_sub(1))
    }

    pub fn take_from(&self, pool: &mut Vec<usize>) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }
        let at = self.draw_below(pool.len());
        Some(pool.swap_remove(at))
    }

    pub fn entropy(&self) -> &Arc<dyn Entropy> {
        &self.entropy
    }
}
