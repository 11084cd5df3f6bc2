use itertools::Itertools;
use rand::RngCore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init();
}

pub(crate) fn gen_test_data(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("key{:09}", i), format!("value{:09}", i)))
        .collect_vec()
}

const PROMOTE: u64 = 0;
const STOP: u64 = u64::MAX;

/// Random source replaying a fixed script, so node heights are known up front.
///
/// A draw of `0` wins every promotion trial and `u64::MAX` loses it. The
/// script repeats once exhausted.
pub(crate) struct ScriptedRng {
    script: Vec<u64>,
    pos: usize,
}

impl ScriptedRng {
    /// Script producing `heights` in order, for a list capped at `max_level`.
    pub(crate) fn with_heights(max_level: usize, heights: &[usize]) -> Self {
        let mut script = Vec::new();
        for &height in heights {
            assert!((1..=max_level).contains(&height));
            script.extend(std::iter::repeat_n(PROMOTE, height - 1));
            // a node at max level stops without another trial
            if height < max_level {
                script.push(STOP);
            }
        }
        Self { script, pos: 0 }
    }

    pub(crate) fn always_promote() -> Self {
        Self {
            script: vec![PROMOTE],
            pos: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        assert!(!self.script.is_empty(), "empty rng script");
        let value = self.script[self.pos % self.script.len()];
        self.pos += 1;
        value
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
