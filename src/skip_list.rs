use std::{borrow::Borrow, cmp::Ordering::*, fmt, mem};

use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};

use crate::{
    arena::{NodeArena, NodeId},
    error::Result,
    options::SkipListConfig,
};

/// Forward link at one level, `None` is the end of that level.
type Link = Option<NodeId>;

/// Predecessor at one level, `None` is the head.
type Cursor = Option<NodeId>;

struct Node<K, V> {
    key: K,
    value: V,
    // one link per level the node participates in
    tower: Box<[Link]>,
}

impl<K, V> Node<K, V> {
    fn height(&self) -> usize {
        self.tower.len()
    }
}

/// Ordered map backed by a skip list.
///
/// Nodes are owned by an index arena and linked by slot ids, so unlinking a
/// node and dropping it happen in the same step. Writes take `&mut self`; see
/// [`SyncSkipList`](crate::sync::SyncSkipList) for the shared, locked form.
pub struct SkipList<K, V, R = SmallRng> {
    head: Box<[Link]>,
    nodes: NodeArena<Node<K, V>>,
    // predecessors of the last write traversal, indexed by level
    update: Box<[Cursor]>,
    level: usize,
    len: usize,
    config: SkipListConfig,
    rng: R,
}

impl<K, V> SkipList<K, V>
where
    K: Ord,
{
    pub fn new(max_level: usize, skip_factor: u32) -> Result<Self> {
        let config = SkipListConfig::new(max_level, skip_factor)?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: SkipListConfig) -> Self {
        Self::with_rng(config, SmallRng::from_os_rng())
    }

    pub fn with_seed(config: SkipListConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<K, V> Default for SkipList<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::with_config(SkipListConfig::default())
    }
}

impl<K, V, R> SkipList<K, V, R>
where
    K: Ord,
    R: RngCore,
{
    /// Builds an empty list drawing node heights from `rng`.
    pub fn with_rng(config: SkipListConfig, rng: R) -> Self {
        tracing::debug!(
            max_level = config.max_level,
            skip_factor = config.skip_factor,
            "create skip list"
        );
        SkipList {
            head: vec![None; config.max_level].into_boxed_slice(),
            nodes: NodeArena::new(),
            update: vec![None; config.max_level].into_boxed_slice(),
            level: 0,
            len: 0,
            config,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels currently in use, 0 for an empty list.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.config.max_level
    }

    pub fn skip_factor(&self) -> u32 {
        self.config.skip_factor
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.nodes[id].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &mut self.nodes[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Inserts `value` under `key`. An existing node keeps its place and only
    /// has its value swapped; the old value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let prev = self.find_update(&key);
        if let Some(id) = self.next(prev, 0) {
            let node = &mut self.nodes[id];
            if node.key == key {
                return Some(mem::replace(&mut node.value, value));
            }
        }

        let height = self.random_height();
        if height > self.level {
            // nothing links at these levels yet except the head
            self.update[self.level..height].fill(None);
            tracing::trace!(from = self.level, to = height, "raise skip list level");
            self.level = height;
        }

        let tower = (0..height)
            .map(|level| self.next(self.update[level], level))
            .collect();
        let id = self.nodes.alloc(Node { key, value, tower });
        for level in 0..height {
            self.set_next(self.update[level], level, Some(id));
        }

        self.len += 1;
        None
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let prev = self.find_update(key);
        let target = self
            .next(prev, 0)
            .filter(|&id| self.key_of::<Q>(id) == key)?;

        for level in 0..self.nodes[target].height() {
            let prev = self.update[level];
            if self.next(prev, level) == Some(target) {
                let next = self.nodes[target].tower[level];
                self.set_next(prev, level, next);
            }
        }

        let level = self.level;
        while self.level > 0 && self.head[self.level - 1].is_none() {
            self.level -= 1;
        }
        if self.level != level {
            tracing::trace!(from = level, to = self.level, "lower skip list level");
        }

        self.len -= 1;
        let node = self.nodes.free(target);
        debug_assert_eq!(self.nodes.len(), self.len);
        Some(node.value)
    }

    fn key_of<Q>(&self, id: NodeId) -> &Q
    where
        K: Borrow<Q>,
        Q: ?Sized,
    {
        self.nodes[id].key.borrow()
    }

    fn next(&self, cur: Cursor, level: usize) -> Link {
        match cur {
            Some(id) => self.nodes[id].tower[level],
            None => self.head[level],
        }
    }

    fn set_next(&mut self, cur: Cursor, level: usize, link: Link) {
        match cur {
            Some(id) => self.nodes[id].tower[level] = link,
            None => self.head[level] = link,
        }
    }

    /// Walks down from the top level, carrying the cursor across levels, and
    /// returns the node holding `key`.
    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next(cur, level) {
                match self.key_of::<Q>(next).cmp(key) {
                    Less => cur = Some(next),
                    Equal => return Some(next),
                    Greater => break,
                }
            }
        }
        None
    }

    /// Same descent as [`find`](Self::find), but records the predecessor at
    /// every level in use and returns the level 0 predecessor.
    fn find_update<Q>(&mut self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = None;
        for level in (0..self.level).rev() {
            while let Some(next) = self.next(cur, level) {
                if self.key_of::<Q>(next) < key {
                    cur = Some(next);
                } else {
                    break;
                }
            }
            self.update[level] = cur;
        }
        cur
    }

    // [1, max_level]
    fn random_height(&mut self) -> usize {
        let mut height = 1;
        while height < self.config.max_level && self.rng.random_ratio(1, self.config.skip_factor) {
            height += 1;
        }
        height
    }
}

impl<K, V, R> fmt::Debug for SkipList<K, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("max_level", &self.config.max_level)
            .field("skip_factor", &self.config.skip_factor)
            .field("level", &self.level)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
impl<K, V, R> SkipList<K, V, R>
where
    K: Ord + fmt::Debug,
{
    /// Panics unless every structural invariant holds.
    pub(crate) fn check_invariants(&self) {
        assert!(self.level <= self.config.max_level);
        assert!(
            self.head[self.level..].iter().all(Option::is_none),
            "head links above level {}",
            self.level
        );

        let mut base = Vec::new();
        let mut cur = self.head[0];
        while let Some(id) = cur {
            let node = &self.nodes[id];
            assert!(node.height() >= 1 && node.height() <= self.level);
            base.push(id);
            cur = node.tower[0];
        }
        assert_eq!(base.len(), self.len);
        assert_eq!(self.nodes.len(), self.len, "orphaned nodes in arena");
        for pair in base.windows(2) {
            let (a, b) = (&self.nodes[pair[0]].key, &self.nodes[pair[1]].key);
            assert!(a < b, "keys out of order: {a:?} >= {b:?}");
        }

        let tallest = base
            .iter()
            .map(|&id| self.nodes[id].height())
            .max()
            .unwrap_or(0);
        assert_eq!(self.level, tallest);

        for level in 1..self.level {
            let expected = base
                .iter()
                .copied()
                .filter(|&id| self.nodes[id].height() > level)
                .collect::<Vec<_>>();
            let mut actual = Vec::new();
            let mut cur = self.head[level];
            while let Some(id) = cur {
                actual.push(id);
                cur = self.nodes[id].tower[level];
            }
            assert_eq!(actual, expected, "level {level} is not a subsequence of level 0");
        }
    }

    pub(crate) fn heights(&self) -> Vec<usize> {
        let mut heights = Vec::new();
        let mut cur = self.head[0];
        while let Some(id) = cur {
            heights.push(self.nodes[id].height());
            cur = self.nodes[id].tower[0];
        }
        heights
    }
}
