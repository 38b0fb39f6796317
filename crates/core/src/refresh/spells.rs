//! Known spells of the local player

use zzrust_engine::{AddressSpace, AddressSpaceExt, ReadError};
use zzrust_sdk::Address;

use crate::gamedata::Offsets;

/// Upper bound on spell book slots scanned
pub const MAX_SPELLS: usize = 1024;

/// Spell ids from the client spell book, in book order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellBook {
    ids: Vec<u32>,
}

impl SpellBook {
    /// Read the spell book array up to the first empty slot
    pub fn read(memory: &dyn AddressSpace, offsets: &Offsets) -> Result<Self, ReadError> {
        let base = Address::new(offsets.spell_book);
        let mut ids = Vec::new();

        for slot in 0..MAX_SPELLS {
            let id = memory.read::<u32>(base.offset(slot * 4))?;
            if id == 0 {
                break;
            }
            ids.push(id);
        }

        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn contains(&self, spell_id: u32) -> bool {
        self.ids.contains(&spell_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProcess;

    #[test]
    fn test_read_until_empty_slot() {
        let process = FakeProcess::new();
        let offsets = Offsets::default();
        for (i, id) in [133u32, 168, 5504, 0, 999].iter().enumerate() {
            process.write(offsets.spell_book + i * 4, *id);
        }

        let book = SpellBook::read(&*process, &offsets).unwrap();
        assert_eq!(book.ids(), &[133, 168, 5504]);
        assert!(book.contains(168));
        assert!(!book.contains(999));
    }

    #[test]
    fn test_unmapped_book_fails() {
        let process = FakeProcess::new();
        assert!(SpellBook::read(&*process, &Offsets::default()).is_err());
    }
}
