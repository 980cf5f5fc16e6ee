// Shared RGBA pixel storage.
//
// Linked cels alias the buffer of the cel they point at, so storage is
// reference-counted. A lock guards the bytes so a decoded document can be
// shared across threads (e.g. through `SpriteCache`) and still allow
// in-place edits that every aliasing cel observes.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Tightly packed RGBA bytes (`width * height * 4`), possibly shared by several cels.
#[derive(Clone)]
pub struct PixelBuffer(Arc<RwLock<Vec<u8>>>);

impl PixelBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(RwLock::new(bytes)))
    }

    /// Whether `self` and `other` are the same underlying storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of handles (cels) sharing this storage.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Vec<u8>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<u8>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy the bytes out.
    pub fn to_vec(&self) -> Vec<u8> {
        self.read().clone()
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl Eq for PixelBuffer {}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("len", &self.len())
            .field("shared", &self.share_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_alias_storage() {
        let a = PixelBuffer::new(vec![0; 8]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.share_count(), 2);

        b.write()[3] = 0xFF;
        assert_eq!(a.read()[3], 0xFF);
    }

    #[test]
    fn equality_is_by_content() {
        let a = PixelBuffer::new(vec![1, 2, 3, 4]);
        let b = PixelBuffer::new(vec![1, 2, 3, 4]);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_ne!(a, PixelBuffer::new(vec![1, 2, 3, 5]));
    }
}
