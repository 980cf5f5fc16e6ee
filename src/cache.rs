// Path-keyed cache of decoded documents.
//
// An explicit object with caller-managed lifetime. Each path owns a slot
// guarded by its own mutex: the map lock is held only long enough to find
// or create the slot, and the slot lock is held across the decode. Two
// threads asking for the same uncached path therefore run one decode, and
// both get the same `Arc`. Loads of different paths proceed in parallel.
// Failed decodes leave the slot empty so a later call retries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::decode::DecodeOptions;
use crate::document::Document;
use crate::error::DecodeError;
use crate::io::decode_file_with_options;

type Slot = Arc<Mutex<Option<Arc<Document>>>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Memoizes decoded sprites by source path.
#[derive(Default)]
pub struct SpriteCache {
    opts: DecodeOptions,
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose decodes use `opts`.
    pub fn with_options(opts: DecodeOptions) -> Self {
        Self {
            opts,
            slots: Mutex::default(),
        }
    }

    /// Return the cached document for `path`, decoding it on first use.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<Document>, DecodeError> {
        let path = path.as_ref();
        let slot = Arc::clone(lock(&self.slots).entry(path.to_path_buf()).or_default());

        let mut cached = lock(&slot);
        if let Some(doc) = cached.as_ref() {
            log::trace!("cache hit: {}", path.display());
            return Ok(Arc::clone(doc));
        }

        let doc = Arc::new(decode_file_with_options(path, &self.opts)?);
        *cached = Some(Arc::clone(&doc));
        Ok(doc)
    }

    /// Load a batch of paths on the rayon pool. Results keep input order.
    #[cfg(feature = "parallel")]
    pub fn load_many<P>(&self, paths: &[P]) -> Vec<Result<Arc<Document>, DecodeError>>
    where
        P: AsRef<Path> + Sync,
    {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.load(p)).collect()
    }

    /// Whether a decoded document for `path` is cached.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let slot = lock(&self.slots).get(path.as_ref()).cloned();
        slot.is_some_and(|s| lock(&s).is_some())
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|s| lock(s).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached document. Documents already handed out stay alive.
    pub fn clear(&self) {
        lock(&self.slots).clear();
    }
}
