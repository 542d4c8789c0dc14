//! Collision layer system for filtering collision detection
//!
//! A body belongs to one or more layers and collides with the layers in its
//! mask. Two bodies interact only when each one's layer is in the other's
//! mask.

use bitflags::bitflags;

bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Default layer for scene props
        const DEFAULT = 1 << 0;
        /// Player-controlled bodies
        const PLAYER = 1 << 1;
        /// Static environment geometry (ground, walls)
        const ENVIRONMENT = 1 << 3;
        /// Debris and small physics objects
        const DEBRIS = 1 << 5;
    }
}

impl CollisionLayers {
    /// Every bit set, including user-defined ones
    pub const EVERYTHING: Self = Self::from_bits_retain(u32::MAX);

    /// Build from raw bits, keeping bits that have no named constant
    pub const fn from_raw(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }

    /// Check if two bodies should collide based on their layers and masks
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::DEBRIS,
        ));
    }

    #[test]
    fn test_raw_bits_survive() {
        let custom = CollisionLayers::from_raw(1 << 20);
        assert_eq!(custom.bits(), 1 << 20);
        assert!(CollisionLayers::EVERYTHING.contains(custom));
    }
}
