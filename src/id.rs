//! Widget identity.
//!
//! Every control is identified by an [`Id`] folded from the ids of its
//! enclosing scopes and a caller-supplied key. Declaring the same key in the
//! same scope on the next frame reproduces the same id, which is how focus,
//! hover and container state survive between frames.

use std::borrow::Cow;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

/// FNV-1a offset basis, also the seed for ids derived at the root scope.
const HASH_INITIAL: u32 = 2_166_136_261;
const HASH_PRIME: u32 = 16_777_619;

/// Marks binding keys so they never collide with text or integer keys.
const BINDING_KEY_TAG: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(pub u32);

/// Folds `data` into `seed` byte by byte. Order-sensitive.
pub fn hash_bytes(seed: u32, data: &[u8]) -> u32 {
    let mut hash = seed;
    for &b in data {
        hash = (hash ^ b as u32).wrapping_mul(HASH_PRIME);
    }
    hash
}

/// Anything that can key a widget: labels, loop indices, binding keys.
pub trait IdSource {
    fn id_bytes(&self) -> Cow<'_, [u8]>;
}

impl IdSource for str {
    fn id_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl IdSource for String {
    fn id_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl IdSource for [u8] {
    fn id_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

macro_rules! int_id_source {
    ($($t:ty),*) => {
        $(impl IdSource for $t {
            fn id_bytes(&self) -> Cow<'_, [u8]> {
                Cow::Owned(self.to_le_bytes().to_vec())
            }
        })*
    };
}

int_id_source!(u32, i32, u64, usize);

impl<T: IdSource + ?Sized> IdSource for &T {
    fn id_bytes(&self) -> Cow<'_, [u8]> {
        (**self).id_bytes()
    }
}

/// A process-unique key for a bound value.
///
/// Allocate it once where the value lives and pass it every frame, so that
/// controls bound to values without a meaningful label still get a stable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingKey(u64);

impl BindingKey {
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Default for BindingKey {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for BindingKey {
    fn id_bytes(&self) -> Cow<'_, [u8]> {
        let mut bytes = Vec::with_capacity(9);
        bytes.push(BINDING_KEY_TAG);
        bytes.extend_from_slice(&self.0.to_le_bytes());
        Cow::Owned(bytes)
    }
}

/// A value carrying its own [`BindingKey`].
///
/// ```
/// use ply_imui::id::Bound;
/// let mut volume = Bound::new(0.5_f64);
/// *volume += 0.25;
/// assert_eq!(*volume, 0.75);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bound<T> {
    key: BindingKey,
    pub value: T,
}

impl<T> Bound<T> {
    pub fn new(value: T) -> Self {
        Self {
            key: BindingKey::new(),
            value,
        }
    }

    pub fn key(&self) -> BindingKey {
        self.key
    }

    /// Splits into the key and a mutable borrow of the value, for widget calls.
    pub fn parts(&mut self) -> (BindingKey, &mut T) {
        (self.key, &mut self.value)
    }
}

impl<T> Deref for Bound<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Bound<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// The scope chain ids are derived from.
#[derive(Debug, Clone, Default)]
pub struct IdStack {
    ids: Vec<Id>,
}

impl IdStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `source` against the current scope without entering it.
    pub fn derive<S: IdSource + ?Sized>(&self, source: &S) -> Id {
        let seed = self.ids.last().map(|id| id.0).unwrap_or(HASH_INITIAL);
        Id(hash_bytes(seed, &source.id_bytes()))
    }

    /// Enters the scope of `source` and returns its id.
    pub fn push<S: IdSource + ?Sized>(&mut self, source: &S) -> Id {
        let id = self.derive(source);
        self.ids.push(id);
        id
    }

    /// Enters an already computed scope.
    pub fn push_id(&mut self, id: Id) {
        self.ids.push(id);
    }

    pub fn pop(&mut self) -> Option<Id> {
        self.ids.pop()
    }

    pub fn current(&self) -> Option<Id> {
        self.ids.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
