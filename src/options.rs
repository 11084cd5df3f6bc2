use crate::{
    error::{Error, Result},
    sync::SyncSkipList,
};

pub const DEFAULT_MAX_LEVEL: usize = 32;
pub const DEFAULT_SKIP_FACTOR: u32 = 4;

/// Validated construction parameters, fixed for the lifetime of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipListConfig {
    pub(crate) max_level: usize,
    pub(crate) skip_factor: u32,
}

impl SkipListConfig {
    pub fn new(max_level: usize, skip_factor: u32) -> Result<Self> {
        if max_level == 0 {
            return Err(Error::InvalidMaxLevel(max_level));
        }
        if skip_factor < 2 {
            return Err(Error::InvalidSkipFactor(skip_factor));
        }
        Ok(Self {
            max_level,
            skip_factor,
        })
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn skip_factor(&self) -> u32 {
        self.skip_factor
    }
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            skip_factor: DEFAULT_SKIP_FACTOR,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkipListOptions {
    max_level: usize,

    skip_factor: u32,

    seed: Option<u64>,
}

impl Default for SkipListOptions {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            skip_factor: DEFAULT_SKIP_FACTOR,
            seed: None,
        }
    }
}

impl SkipListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on the height of any node.
    pub fn max_level(&mut self, level: usize) -> &mut Self {
        self.max_level = level;
        self
    }

    /// A node grows one more level with probability `1 / factor`.
    pub fn skip_factor(&mut self, factor: u32) -> &mut Self {
        self.skip_factor = factor;
        self
    }

    /// Seed for the level draw. Without one the generator is seeded from the OS.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(&self) -> Result<SkipListConfig> {
        SkipListConfig::new(self.max_level, self.skip_factor)
    }

    pub fn create<K, V>(&self) -> Result<SyncSkipList<K, V>>
    where
        K: Ord,
    {
        let config = self.build()?;
        let list = match self.seed {
            Some(seed) => SyncSkipList::with_seed(config, seed),
            None => SyncSkipList::with_config(config),
        };
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let config = SkipListOptions::new().build().unwrap();
        assert_eq!(config.max_level(), 32);
        assert_eq!(config.skip_factor(), 4);
        assert_eq!(config, SkipListConfig::default());
    }

    #[test]
    fn test_reject_zero_max_level() {
        let err = SkipListOptions::new().max_level(0).build().unwrap_err();
        assert_eq!(err, Error::InvalidMaxLevel(0));
    }

    #[test]
    fn test_reject_small_skip_factor() {
        for factor in [0, 1] {
            let err = SkipListOptions::new()
                .skip_factor(factor)
                .build()
                .unwrap_err();
            assert_eq!(err, Error::InvalidSkipFactor(factor));
        }
    }

    #[test]
    fn test_minimal_config() {
        let config = SkipListConfig::new(1, 2).unwrap();
        assert_eq!(config.max_level(), 1);
        assert_eq!(config.skip_factor(), 2);
    }

    #[test]
    fn test_create_seeded() -> anyhow::Result<()> {
        let list = SkipListOptions::new()
            .max_level(8)
            .skip_factor(2)
            .seed(42)
            .create::<u32, String>()?;
        list.insert(1, "one".to_string());
        assert_eq!(list.get(&1), Some("one".to_string()));
        assert_eq!(list.max_level(), 8);
        assert_eq!(list.skip_factor(), 2);
        Ok(())
    }
}
