/// Source of shuffle picks.
pub trait ShuffleRng {
    /// A uniformly distributed index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Picks from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadShuffle;

impl ShuffleRng for ThreadShuffle {
    fn pick(&mut self, len: usize) -> usize {
        rand::random_range(0..len)
    }
}

impl<F> ShuffleRng for F
where
    F: FnMut(usize) -> usize,
{
    fn pick(&mut self, len: usize) -> usize {
        self(len)
    }
}
