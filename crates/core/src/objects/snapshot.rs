//! Immutable object snapshots

use std::sync::Arc;

use zzrust_sdk::Guid;

use super::kind::KindFilter;
use super::object::MirroredObject;

/// Point-in-time list of mirrored objects
///
/// Cloning is a reference count bump. A snapshot never changes after it is
/// published; readers holding an old one stay consistent with themselves.
#[derive(Debug, Clone)]
pub struct ObjectSnapshot {
    objects: Arc<[Arc<MirroredObject>]>,
    generation: u64,
}

impl Default for ObjectSnapshot {
    fn default() -> Self {
        Self {
            objects: Arc::from(Vec::new()),
            generation: 0,
        }
    }
}

impl ObjectSnapshot {
    pub(crate) fn new(objects: Vec<Arc<MirroredObject>>, generation: u64) -> Self {
        Self {
            objects: Arc::from(objects),
            generation,
        }
    }

    /// Number of the cycle that published this snapshot (0 = never synced)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<MirroredObject>> {
        self.objects.iter()
    }

    pub fn as_slice(&self) -> &[Arc<MirroredObject>] {
        &self.objects
    }

    /// Find an object by identity (linear scan)
    pub fn find(&self, guid: Guid) -> Option<&Arc<MirroredObject>> {
        self.objects.iter().find(|object| object.guid() == guid)
    }

    /// Copy out the objects whose kind is in `filter`, in snapshot order
    pub fn filtered(&self, filter: KindFilter) -> Vec<Arc<MirroredObject>> {
        self.objects
            .iter()
            .filter(|object| filter.contains(object.kind().filter()))
            .cloned()
            .collect()
    }

    /// Identities in snapshot order
    pub fn guids(&self) -> Vec<Guid> {
        self.objects.iter().map(|object| object.guid()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectKind;
    use zzrust_sdk::Address;

    fn object(guid: Guid, kind: ObjectKind) -> Arc<MirroredObject> {
        Arc::new(MirroredObject::new(guid, Address::new(0x1000 * guid as usize), kind))
    }

    #[test]
    fn test_find_and_filter() {
        let snapshot = ObjectSnapshot::new(
            vec![
                object(1, ObjectKind::Player),
                object(2, ObjectKind::Unit),
                object(3, ObjectKind::Item),
                object(4, ObjectKind::Container),
            ],
            1,
        );

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.find(2).map(|o| o.kind()), Some(ObjectKind::Unit));
        assert!(snapshot.find(9).is_none());

        let items: Vec<Guid> = snapshot
            .filtered(KindFilter::ITEMS)
            .iter()
            .map(|o| o.guid())
            .collect();
        assert_eq!(items, vec![3, 4]);
        assert_eq!(snapshot.filtered(KindFilter::UNITS).len(), 2);
    }

    #[test]
    fn test_default_is_empty() {
        let snapshot = ObjectSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.generation(), 0);
    }
}
