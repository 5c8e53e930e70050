use deframer::framing::SyncWord;
use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_bits<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen_range(0..=1u8)).collect()
}

pub fn random_bytes<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

/// Independent sliding-window check for `sync` anywhere in `bits`.
pub fn contains_sync(sync: SyncWord, bits: &[u8]) -> bool {
    let pattern: Vec<u8> = sync.bits().collect();
    bits.windows(pattern.len()).any(|w| w == pattern.as_slice())
}
