//! Mirrored object kinds

use bitflags::bitflags;
use zzrust_sdk::ObjectType;

/// Kind of a mirrored object, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Item,
    Container,
    Unit,
    Player,
    GameObject,
}

bitflags! {
    /// Set of kinds used to filter a snapshot
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindFilter: u8 {
        const ITEM = 0x01;
        const CONTAINER = 0x02;
        const UNIT = 0x04;
        const PLAYER = 0x08;
        const GAME_OBJECT = 0x10;

        /// Items and containers
        const ITEMS = Self::ITEM.bits() | Self::CONTAINER.bits();
        /// Npcs and players
        const UNITS = Self::UNIT.bits() | Self::PLAYER.bits();
    }
}

impl ObjectKind {
    /// Map a raw client type to a mirrored kind
    ///
    /// Returns `None` for types the mirror does not track (corpses, dynamic
    /// objects, the "none" type).
    pub fn from_object_type(object_type: ObjectType) -> Option<Self> {
        match object_type {
            ObjectType::Item => Some(Self::Item),
            ObjectType::Container => Some(Self::Container),
            ObjectType::Unit => Some(Self::Unit),
            ObjectType::Player => Some(Self::Player),
            ObjectType::GameObject => Some(Self::GameObject),
            ObjectType::None | ObjectType::DynamicObject | ObjectType::Corpse => None,
        }
    }

    /// The single-kind filter for this kind
    pub fn filter(self) -> KindFilter {
        match self {
            Self::Item => KindFilter::ITEM,
            Self::Container => KindFilter::CONTAINER,
            Self::Unit => KindFilter::UNIT,
            Self::Player => KindFilter::PLAYER,
            Self::GameObject => KindFilter::GAME_OBJECT,
        }
    }

    /// Units and players carry unit descriptors
    pub fn is_unit(self) -> bool {
        KindFilter::UNITS.contains(self.filter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_object_type() {
        assert_eq!(
            ObjectKind::from_object_type(ObjectType::Container),
            Some(ObjectKind::Container)
        );
        assert_eq!(ObjectKind::from_object_type(ObjectType::Corpse), None);
        assert_eq!(ObjectKind::from_object_type(ObjectType::DynamicObject), None);
    }

    #[test]
    fn test_filters() {
        assert!(KindFilter::ITEMS.contains(ObjectKind::Container.filter()));
        assert!(!KindFilter::ITEMS.contains(ObjectKind::Unit.filter()));
        assert!(ObjectKind::Player.is_unit());
        assert!(ObjectKind::Unit.is_unit());
        assert!(!ObjectKind::GameObject.is_unit());
    }
}
