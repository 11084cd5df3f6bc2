use std::{
    mem,
    ops::{Index, IndexMut},
};

/// Handle to an occupied arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<NodeId> },
}

/// Slot storage owning every node of a list. Vacated slots are chained into a
/// free list and reused before the backing vector grows.
pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    free: Option<NodeId>,
    len: usize,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn alloc(&mut self, item: T) -> NodeId {
        self.len += 1;
        match self.free {
            Some(id) => {
                let slot = mem::replace(&mut self.slots[id.0], Slot::Occupied(item));
                let Slot::Vacant { next_free } = slot else {
                    panic!("free list points at occupied slot {}", id.0);
                };
                self.free = next_free;
                id
            }
            None => {
                self.slots.push(Slot::Occupied(item));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) -> T {
        let vacant = Slot::Vacant {
            next_free: self.free,
        };
        match mem::replace(&mut self.slots[id.0], vacant) {
            Slot::Occupied(item) => {
                self.free = Some(id);
                self.len -= 1;
                item
            }
            Slot::Vacant { next_free } => {
                // undo, the slot was never ours to free
                self.slots[id.0] = Slot::Vacant { next_free };
                panic!("double free of node slot {}", id.0);
            }
        }
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        match &self.slots[id.0] {
            Slot::Occupied(item) => item,
            Slot::Vacant { .. } => panic!("dangling node id {}", id.0),
        }
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match &mut self.slots[id.0] {
            Slot::Occupied(item) => item,
            Slot::Vacant { .. } => panic!("dangling node id {}", id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_alloc_and_free() {
        let mut arena = NodeArena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a], "a");
        assert_eq!(arena[b], "b");

        assert_eq!(arena.free(a), "a");
        assert_eq!(arena.len(), 1);
        assert_eq!(arena[b], "b");
    }

    #[test]
    fn test_slot_reuse() {
        let mut arena = NodeArena::new();
        let ids = (0..4).map(|i| arena.alloc(i)).collect::<Vec<_>>();
        arena.free(ids[1]);
        arena.free(ids[3]);

        // most recently freed first
        assert_eq!(arena.alloc(30), ids[3]);
        assert_eq!(arena.alloc(10), ids[1]);
        assert_eq!(arena.slots.len(), 4);

        arena[ids[0]] += 100;
        assert_eq!(arena[ids[0]], 100);
        assert_eq!(arena[ids[1]], 10);
    }

    #[test]
    #[should_panic(expected = "dangling")]
    fn test_dangling_index() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(1);
        arena.free(id);
        let _value = arena[id];
    }

    #[test]
    #[should_panic(expected = "double free")]
    fn test_double_free() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(1);
        arena.free(id);
        arena.free(id);
    }

    #[test]
    fn test_object_drop() {
        static DROP_COUNTER: AtomicUsize = AtomicUsize::new(0);

        struct DropItem;

        impl DropItem {
            fn new() -> Self {
                DROP_COUNTER.fetch_add(1, Ordering::SeqCst);
                Self
            }
        }

        impl Drop for DropItem {
            fn drop(&mut self) {
                DROP_COUNTER.fetch_sub(1, Ordering::SeqCst);
            }
        }

        let mut arena = NodeArena::new();
        let first = arena.alloc(DropItem::new());
        for _ in 0..4 {
            arena.alloc(DropItem::new());
        }
        assert_eq!(DROP_COUNTER.load(Ordering::SeqCst), 5);

        drop(arena.free(first));
        assert_eq!(DROP_COUNTER.load(Ordering::SeqCst), 4);

        drop(arena);
        assert_eq!(DROP_COUNTER.load(Ordering::SeqCst), 0);
    }
}
