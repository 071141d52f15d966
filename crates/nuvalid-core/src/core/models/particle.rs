use super::four_vector::FourMomentum;

/// A single entry in an event's initial- or final-state particle list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// PDG Monte Carlo particle code (ions use the `10LZZZAAAI` convention).
    pub pdg: i32,
    /// Four-momentum in the lab frame.
    pub p4: FourMomentum,
    /// Per-species ordering tag written by the producer for final-state particles.
    pub rank: Option<i32>,
}

impl Particle {
    pub fn new(pdg: i32, p4: FourMomentum) -> Self {
        Self {
            pdg,
            p4,
            rank: None,
        }
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = Some(rank);
        self
    }

    #[inline]
    pub fn energy(&self) -> f64 {
        self.p4.energy
    }
}
