/// A memoised value with a dirty flag.
///
/// `get` recomputes only after `invalidate` (or on first use). Not shared
/// across threads: each owner keeps its own slot.
#[derive(Debug, Clone)]
pub struct CachedValue<T> {
    value: Option<T>,
}

impl<T> Default for CachedValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CachedValue<T> {
    pub fn new() -> Self {
        Self { value: None }
    }

    pub fn with_value(value: T) -> Self {
        Self { value: Some(value) }
    }

    pub fn is_dirty(&self) -> bool {
        self.value.is_none()
    }

    pub fn invalidate(&mut self) {
        self.value = None;
    }

    /// The cached value, computing it with `compute` if the slot is dirty.
    pub fn get<F: FnOnce() -> T>(&mut self, compute: F) -> &T {
        self.value.get_or_insert_with(compute)
    }

    /// Fallible variant of [`CachedValue::get`]; an error leaves the slot dirty.
    pub fn try_get<E, F: FnOnce() -> Result<T, E>>(&mut self, compute: F) -> Result<&T, E> {
        let value = match self.value.take() {
            Some(v) => v,
            None => compute()?,
        };
        Ok(self.value.insert(value))
    }

    /// The cached value without computing anything.
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
