//! Shared helpers for the end-to-end suites.

#![allow(dead_code)]

/// Deterministic xorshift64 PRNG for reproducible test inputs.
///
/// Same seed, same sequence, on every platform.
pub struct DetRng {
    state: u64,
}

impl DetRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform-ish value in `[0, bound)`.
    pub fn next_usize(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be non-zero");
        (self.next_u64() as usize) % bound
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }

    /// Draws `count` distinct values from `[0, bound)`.
    pub fn distinct(&mut self, count: usize, bound: usize) -> Vec<usize> {
        assert!(count <= bound);
        let mut pool: Vec<usize> = (0..bound).collect();
        self.shuffle(&mut pool);
        pool.truncate(count);
        pool
    }
}

/// Opt-in tracing output for test debugging (`RUST_LOG=trace`).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Calls `visit` with every `choose`-element combination of `0..n`, in
/// lexicographic order.
pub fn for_each_combination(n: usize, choose: usize, mut visit: impl FnMut(&[usize])) {
    assert!(choose <= n);
    let mut indices: Vec<usize> = (0..choose).collect();
    loop {
        visit(&indices);
        // Advance to the next combination in lexicographic order.
        let mut i = choose;
        while i > 0 && indices[i - 1] == i - 1 + n - choose {
            i -= 1;
        }
        if i == 0 {
            return;
        }
        indices[i - 1] += 1;
        for j in i..choose {
            indices[j] = indices[j - 1] + 1;
        }
    }
}
