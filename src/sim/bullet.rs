//! Fixed-capacity bullet pool
//!
//! Bullets live in a preallocated slab with a free list of slot indices.
//! Firing when the pool is exhausted returns `None` and the shot is simply
//! dropped; nothing ever grows. Every bullet also carries a monotonically
//! increasing id so a slot being recycled can never be mistaken for the
//! bullet that previously occupied it.

use glam::Vec3;

/// Renderer-facing tint for a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletColor {
    #[default]
    Standard,
    /// Power buff active at fire time
    Powered,
    /// Stun round
    Stun,
}

/// Presentation and behavior flags carried per shot
#[derive(Debug, Clone, Copy)]
pub struct BulletStyle {
    pub color: BulletColor,
    /// Visual scale multiplier (power buff enlarges shots)
    pub scale_mul: f32,
    /// Stun rounds apply a stun instead of damage on hit
    pub stun: bool,
}

impl Default for BulletStyle {
    fn default() -> Self {
        Self {
            color: BulletColor::Standard,
            scale_mul: 1.0,
            stun: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u64,
    pub pos: Vec3,
    pub vel: Vec3,
    pub age_ms: f32,
    pub style: BulletStyle,
    pub active: bool,
}

impl Bullet {
    fn vacant() -> Self {
        Self {
            id: 0,
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            age_ms: 0.0,
            style: BulletStyle::default(),
            active: false,
        }
    }
}

#[derive(Debug)]
pub struct BulletPool {
    slots: Vec<Bullet>,
    free: Vec<usize>,
    next_id: u64,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Bullet::vacant(); capacity],
            free: (0..capacity).rev().collect(),
            next_id: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Claim a slot and launch a bullet, or `None` if the pool is exhausted
    pub fn fire(&mut self, pos: Vec3, vel: Vec3, style: BulletStyle) -> Option<u64> {
        let index = self.free.pop()?;
        self.next_id += 1;
        let slot = &mut self.slots[index];
        debug_assert!(!slot.active, "free list handed out a live slot");
        *slot = Bullet {
            id: self.next_id,
            pos,
            vel,
            age_ms: 0.0,
            style,
            active: true,
        };
        Some(self.next_id)
    }

    /// Return a slot to the free list. Releasing an already-free slot is a
    /// no-op.
    pub fn release(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if !slot.active {
            return;
        }
        slot.active = false;
        self.free.push(index);
    }

    pub fn get(&self, index: usize) -> &Bullet {
        &self.slots[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Bullet {
        &mut self.slots[index]
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Bullet)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, b)| b.active)
    }

    /// Deactivate every bullet (restart, respawn)
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
        self.free.clear();
        self.free.extend((0..self.slots.len()).rev());
    }
}
