//! A skip list ordered map guarded by a single reader/writer lock.
//!
//! [`SkipList`] is the unsynchronized structure; [`SyncSkipList`] wraps it for
//! sharing between threads, with lookups taking the lock shared and writes
//! taking it exclusively.

mod arena;
#[cfg(test)]
mod test_utils;

pub mod error;
pub mod options;
pub mod skip_list;
pub mod sync;

pub use error::{Error, Result};
pub use options::{SkipListConfig, SkipListOptions};
pub use skip_list::SkipList;
pub use sync::SyncSkipList;

pub mod prelude {
    pub use crate::{
        error::{Error, Result},
        options::{SkipListConfig, SkipListOptions},
        skip_list::SkipList,
        sync::SyncSkipList,
    };
}
