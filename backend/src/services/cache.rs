//! Response cache for grid projections.
//!
//! A projection is fully determined by the snapshot generation, the resolved
//! window with its UTC offset and the channel range, so entries never go
//! stale by age. They are
//! dropped wholesale when a newer generation shows up, and oldest-first when
//! the capacity is reached.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use super::grid::ChannelRange;
use crate::api::GuideData;
use crate::models::GridWindow;

/// `DateTime<FixedOffset>` equality ignores the offset, but the rendered
/// window does not, so the offset is keyed explicitly.
type CacheKey = (GridWindow, i32, ChannelRange);

fn cache_key(window: &GridWindow, range: ChannelRange) -> CacheKey {
    (*window, window.start.offset().local_minus_utc(), range)
}

#[derive(Default)]
struct CacheState {
    generation: u64,
    entries: HashMap<CacheKey, Arc<GuideData>>,
    insertion_order: VecDeque<CacheKey>,
}

/// Bounded, generation-scoped cache of [`GuideData`].
pub struct GuideCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl GuideCache {
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(
        &self,
        generation: u64,
        window: &GridWindow,
        range: ChannelRange,
    ) -> Option<Arc<GuideData>> {
        let state = self.state.lock();
        if state.generation != generation {
            return None;
        }
        state.entries.get(&cache_key(window, range)).cloned()
    }

    /// Store a projection computed against `generation`.
    ///
    /// Results computed against an older generation than the cache has
    /// already seen are returned without being stored.
    pub fn insert(
        &self,
        generation: u64,
        window: &GridWindow,
        range: ChannelRange,
        data: GuideData,
    ) -> Arc<GuideData> {
        let data = Arc::new(data);
        if self.capacity == 0 {
            return data;
        }

        let mut state = self.state.lock();
        if generation < state.generation {
            return data;
        }
        if generation > state.generation {
            log::debug!(
                "Guide cache moving from generation {} to {}, dropping {} entries",
                state.generation,
                generation,
                state.entries.len()
            );
            state.generation = generation;
            state.entries.clear();
            state.insertion_order.clear();
        }

        let key = cache_key(window, range);
        if state.entries.insert(key, Arc::clone(&data)).is_none() {
            state.insertion_order.push_back(key);
        }
        while state.entries.len() > self.capacity {
            match state.insertion_order.pop_front() {
                Some(oldest) => {
                    state.entries.remove(&oldest);
                }
                None => break,
            }
        }

        data
    }
}
