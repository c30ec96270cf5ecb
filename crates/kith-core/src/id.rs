//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a particle within a [`ParticleSystem`](crate::ParticleSystem).
///
/// `ParticleId(n)` is the n-th particle in the system's storage order.
/// Neighbour lists, contact graphs, and faces all refer to particles by
/// this index and never own particle data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u32);

impl ParticleId {
    /// The particle's position in storage order, as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ParticleId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one full neighbour-list build.
///
/// Incremented on every rebuild. Readers holding a generation can compare
/// IDs to detect that the list they consulted has since been replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationId(pub u64);

impl GenerationId {
    /// The generation that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GenerationId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
