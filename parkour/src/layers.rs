//! Collision layer masks.
//!
//! Every collider in a [`crate::collision::StaticWorld`] carries a membership mask and
//! every query carries a filter mask. A collider takes part in a query when the two
//! masks share at least one bit.

use num_traits::{One, PrimInt};

/// Storage used for collision layer masks.
pub type LayerBits = u32;

/// Trait implemented by layer enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container over any primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    /// A mask with every bit set.
    pub fn everything() -> Self {
        Self { bits: !T::zero() }
    }

    /// A mask with no bit set. Queries filtered by it never match anything.
    pub fn nothing() -> Self {
        Self { bits: T::zero() }
    }

    /// Build a mask from a list of flags.
    pub fn of<U: FlagBitmask<Storage = T> + Copy>(tags: &[U]) -> Self {
        let mut flags = Self::nothing();
        flags.add_many(tags);
        flags
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, tags: &[U]) {
        for &tag in tags {
            self.add(tag);
        }
    }

    pub fn has_any<U: FlagBitmask<Storage = T> + Copy>(&self, tags: &[U]) -> bool {
        if tags.is_empty() {
            return false;
        }
        let combined = tags.iter().fold(T::zero(), |acc, t| acc | t.mask());
        (self.bits & combined) != T::zero()
    }

    /// Do the two masks share at least one layer?
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }
}

/// Declare a layer enum and implement `FlagBitmask` for it.
///
/// Example:
/// ```text
/// define_layer_flags!(CollisionLayer, u32, {
///     Ground,
///     Wall,
/// });
/// ```
#[macro_export]
macro_rules! define_layer_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::layers::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_layer_flags!(CollisionLayer, LayerBits, {
    Ground,
    Wall,
    Climbable,
    Prop,
    Player,
});

/// Mask used by colliders (membership) and by queries (filter).
pub type LayerMask = BitmaskFlags<LayerBits>;

/// Layers the grounded check, crouch clearance and ledge detectors collide with by default.
pub fn default_ground_layers() -> LayerMask {
    LayerMask::of(&[
        CollisionLayer::Ground,
        CollisionLayer::Wall,
        CollisionLayer::Climbable,
        CollisionLayer::Prop,
    ])
}

/// Layers the wall climber scans by default.
pub fn default_wall_layers() -> LayerMask {
    LayerMask::of(&[
        CollisionLayer::Ground,
        CollisionLayer::Wall,
        CollisionLayer::Climbable,
    ])
}
