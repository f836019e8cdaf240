use lasso::{Rodeo, RodeoReader, Spur};
use std::fmt;

/// Interned string key - 4 bytes instead of 24 for String.
pub type IStr = Spur;

/// Mutable side of the string table, only alive while rows are normalized.
#[derive(Default)]
pub struct StringTableBuilder {
    rodeo: Rodeo,
}

impl StringTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning a key.
    pub fn intern(&mut self, s: &str) -> IStr {
        self.rodeo.get_or_intern(s)
    }

    /// Stop accepting new strings. Lookups after this point never allocate.
    pub fn freeze(self) -> StringTable {
        StringTable {
            reader: self.rodeo.into_reader(),
        }
    }
}

/// Frozen table of country, region, faction and dyad names.
///
/// Owned by the event store; every [`IStr`] held by an event resolves here.
pub struct StringTable {
    reader: RodeoReader,
}

impl StringTable {
    /// Key for a name, or None if no loaded event ever used it.
    pub fn get(&self, s: &str) -> Option<IStr> {
        self.reader.get(s)
    }

    /// Resolve an interned key back to a string.
    pub fn resolve(&self, key: IStr) -> &str {
        self.reader.resolve(&key)
    }

    pub fn len(&self) -> usize {
        self.reader.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }
}

impl Default for StringTable {
    fn default() -> Self {
        StringTableBuilder::new().freeze()
    }
}

impl fmt::Debug for StringTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringTable")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interned_keys_are_stable() {
        let mut builder = StringTableBuilder::new();
        let a = builder.intern("Somalia");
        let b = builder.intern("Sudan");
        assert_eq!(builder.intern("Somalia"), a);

        let table = builder.freeze();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Somalia"), Some(a));
        assert_eq!(table.resolve(b), "Sudan");
        assert_eq!(table.get("Chad"), None);
    }
}
