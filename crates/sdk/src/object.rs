//! Raw object type codes
//!
//! The client stores one byte per object describing its concrete type. The
//! numbering matches the client's `TYPEID_*` constants.

/// Object type code read from an object's header
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    None = 0,
    Item = 1,
    Container = 2,
    Unit = 3,
    Player = 4,
    GameObject = 5,
    DynamicObject = 6,
    Corpse = 7,
}

impl ObjectType {
    /// Decode a raw type byte, `None` for values outside the known range
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Item),
            2 => Some(Self::Container),
            3 => Some(Self::Unit),
            4 => Some(Self::Player),
            5 => Some(Self::GameObject),
            6 => Some(Self::DynamicObject),
            7 => Some(Self::Corpse),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        assert_eq!(ObjectType::from_raw(3), Some(ObjectType::Unit));
        assert_eq!(ObjectType::from_raw(4), Some(ObjectType::Player));
        assert_eq!(ObjectType::from_raw(8), None);
    }
}
