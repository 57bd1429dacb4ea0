/// Non-owning reference from a component back to the character that owns it.
///
/// # Bit layout
/// A handle is a packed `u64` (least-significant bit = bit 0):
///
/// - bits 0..=31  : slot index in the [`CharacterRegistry`]
/// - bits 32..=63 : slot generation (never zero for a live handle)
///
/// # Invariants
/// - A handle stays valid until its character is removed; a removed slot bumps its generation,
///   so stale handles never alias a newer character in the same slot.
/// - Generation `0` is reserved, so `0` is never a valid packed handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CharacterHandle(u64);

impl CharacterHandle {
    pub fn index(self) -> u32 {
        unpack_index(self.0)
    }

    pub fn generation(self) -> u32 {
        unpack_generation(self.0)
    }

    pub fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from its packed form, rejecting values no registry could have issued.
    pub fn from_bits(bits: u64) -> Result<Self, &'static str> {
        validate_handle(bits)?;
        Ok(Self(bits))
    }
}

/// Packs a slot index and generation into a [`CharacterHandle`].
pub fn pack_handle(index: u32, generation: u32) -> CharacterHandle {
    CharacterHandle((index as u64) | ((generation as u64) << u32::BITS))
}

fn unpack_index(bits: u64) -> u32 {
    const INDEX_MASK: u64 = u32::MAX as u64;
    (bits & INDEX_MASK) as u32
}

fn unpack_generation(bits: u64) -> u32 {
    (bits >> u32::BITS) as u32
}

/// Validates that packed bits conform to the handle contract.
///
/// Use this at boundaries (e.g. handles stored by the host as plain integers).
pub fn validate_handle(bits: u64) -> Result<(), &'static str> {
    if unpack_generation(bits) == 0 {
        return Err("Handle generation is zero");
    }
    Ok(())
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational store of characters addressed by [`CharacterHandle`].
#[derive(Debug)]
pub struct CharacterRegistry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for CharacterRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CharacterRegistry<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `value`, reusing a freed slot when one is available.
    pub fn insert(&mut self, value: T) -> CharacterHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(value);
                pack_handle(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 1,
                    value: Some(value),
                });
                pack_handle(index, 1)
            }
        };
        self.len += 1;

        log::info!(
            "registered character (index={}, generation={})",
            handle.index(),
            handle.generation()
        );
        handle
    }

    /// Store the value produced by `make`, which receives the handle it will live under.
    ///
    /// Lets components record their owner before they are stored.
    pub fn insert_with(&mut self, make: impl FnOnce(CharacterHandle) -> T) -> CharacterHandle {
        let (index, generation) = match self.free.last() {
            Some(&index) => (index, self.slots[index as usize].generation),
            None => (self.slots.len() as u32, 1),
        };
        let handle = self.insert(make(pack_handle(index, generation)));
        debug_assert_eq!(handle, pack_handle(index, generation));
        handle
    }

    pub fn remove(&mut self, handle: CharacterHandle) -> Option<T> {
        let Some(slot) = self.live_slot_mut(handle) else {
            log::error!("remove: stale or unknown character handle {:?}", handle);
            return None;
        };

        let value = slot.value.take();
        // Skip zero on wrap so packed handles stay non-zero.
        slot.generation = slot.generation.wrapping_add(1).max(1);
        self.free.push(handle.index());
        self.len -= 1;
        value
    }

    pub fn contains(&self, handle: CharacterHandle) -> bool {
        self.live_slot(handle).is_some()
    }

    pub fn get(&self, handle: CharacterHandle) -> Option<&T> {
        let Some(slot) = self.live_slot(handle) else {
            log::error!("get: stale or unknown character handle {:?}", handle);
            return None;
        };
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: CharacterHandle) -> Option<&mut T> {
        let Some(slot) = self.live_slot_mut(handle) else {
            log::error!("get_mut: stale or unknown character handle {:?}", handle);
            return None;
        };
        slot.value.as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharacterHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value
                .as_ref()
                .map(|v| (pack_handle(i as u32, slot.generation), v))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CharacterHandle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(move |v| (pack_handle(i as u32, generation), v))
        })
    }

    fn live_slot(&self, handle: CharacterHandle) -> Option<&Slot<T>> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation() && slot.value.is_some())
    }

    fn live_slot_mut(&mut self, handle: CharacterHandle) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation() && slot.value.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_places_index_low_and_generation_high() {
        let handle = pack_handle(0x0123_4567, 0x89AB_CDEF);

        assert_eq!(handle.to_bits(), 0x89AB_CDEF_0123_4567);
        assert_eq!(handle.index(), 0x0123_4567);
        assert_eq!(handle.generation(), 0x89AB_CDEF);
    }

    #[test]
    fn from_bits_rejects_zero_generation() {
        assert_eq!(
            CharacterHandle::from_bits(42),
            Err("Handle generation is zero")
        );
        assert_eq!(validate_handle(0), Err("Handle generation is zero"));

        let handle = pack_handle(7, 3);
        assert_eq!(CharacterHandle::from_bits(handle.to_bits()), Ok(handle));
    }

    #[test]
    fn removed_slots_invalidate_old_handles() {
        let mut registry = CharacterRegistry::new();
        let a = registry.insert("a");
        let b = registry.insert("b");
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.remove(a), Some("a"));
        assert!(!registry.contains(a));
        assert_eq!(registry.get(a), None);
        assert_eq!(registry.remove(a), None);

        // Slot reuse bumps the generation.
        let c = registry.insert("c");
        assert_eq!(c.index(), a.index());
        assert_ne!(c.generation(), a.generation());
        assert_eq!(registry.get(c), Some(&"c"));
        assert_eq!(registry.get(a), None);

        assert_eq!(registry.get(b), Some(&"b"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn insert_with_sees_its_own_handle() {
        let mut registry = CharacterRegistry::new();
        let first = registry.insert(pack_handle(0, 0));
        registry.remove(first);

        let h = registry.insert_with(|own| own);
        assert_eq!(registry.get(h), Some(&h));
    }

    #[test]
    fn iter_yields_live_entries_only() {
        let mut registry = CharacterRegistry::new();
        let a = registry.insert(1);
        let b = registry.insert(2);
        let c = registry.insert(3);
        registry.remove(b);

        for (_, v) in registry.iter_mut() {
            *v *= 10;
        }

        let live: Vec<_> = registry.iter().collect();
        assert_eq!(live, vec![(a, &10), (c, &30)]);
        assert!(!registry.is_empty());
    }
}
