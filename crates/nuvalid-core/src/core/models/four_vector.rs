use nalgebra::Vector3;
use std::f64::consts::PI;
use std::ops::{Add, Neg, Sub};

/// A Minkowski four-momentum `(E, p⃗)` in GeV.
///
/// The metric is (+,−,−,−), so [`FourMomentum::dot`] of a vector with itself is the
/// squared invariant mass. Three-momenta are stored as `nalgebra` vectors so that angular
/// quantities reuse the linear algebra already available there.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FourMomentum {
    /// Total energy in GeV.
    pub energy: f64,
    /// Three-momentum in GeV, with the beam along +z.
    pub momentum: Vector3<f64>,
}

impl FourMomentum {
    /// Creates a four-momentum from Cartesian momentum components and energy.
    ///
    /// The argument order follows the flat-tree branches (`px`, `py`, `pz`, `E`).
    pub fn new(px: f64, py: f64, pz: f64, energy: f64) -> Self {
        Self {
            energy,
            momentum: Vector3::new(px, py, pz),
        }
    }

    pub fn from_parts(energy: f64, momentum: Vector3<f64>) -> Self {
        Self { energy, momentum }
    }

    /// A particle of the given mass with zero three-momentum.
    pub fn at_rest(mass: f64) -> Self {
        Self::from_parts(mass, Vector3::zeros())
    }

    /// Minkowski scalar product `E₁E₂ − p⃗₁·p⃗₂`.
    #[inline]
    pub fn dot(&self, other: &FourMomentum) -> f64 {
        self.energy * other.energy - self.momentum.dot(&other.momentum)
    }

    /// Squared invariant mass, `E² − |p|²`. Negative for space-like vectors.
    #[inline]
    pub fn mag2(&self) -> f64 {
        self.dot(self)
    }

    /// Invariant mass with a sign-preserving square root.
    ///
    /// Space-like vectors return `−√(−m²)`, so a momentum transfer `q` yields a negative
    /// value instead of NaN.
    pub fn mag(&self) -> f64 {
        let m2 = self.mag2();
        if m2 < 0.0 { -(-m2).sqrt() } else { m2.sqrt() }
    }

    /// Magnitude of the three-momentum.
    #[inline]
    pub fn p(&self) -> f64 {
        self.momentum.norm()
    }

    /// Momentum component transverse to the beam axis.
    pub fn perp(&self) -> f64 {
        self.momentum.x.hypot(self.momentum.y)
    }

    /// Kinetic energy `E − m` for a given rest mass.
    #[inline]
    pub fn kinetic_energy(&self, mass: f64) -> f64 {
        self.energy - mass
    }

    /// Cosine of the polar angle with respect to +z. A null momentum points along the beam.
    pub fn cos_theta(&self) -> f64 {
        let p = self.p();
        if p == 0.0 { 1.0 } else { self.momentum.z / p }
    }

    pub fn theta(&self) -> f64 {
        if self.momentum == Vector3::zeros() {
            0.0
        } else {
            self.perp().atan2(self.momentum.z)
        }
    }

    pub fn phi(&self) -> f64 {
        if self.momentum.x == 0.0 && self.momentum.y == 0.0 {
            0.0
        } else {
            self.momentum.y.atan2(self.momentum.x)
        }
    }

    /// Opening angle between the two three-momenta, in radians.
    ///
    /// Returns 0 if either momentum is null.
    pub fn angle(&self, other: &FourMomentum) -> f64 {
        let norm_product = (self.momentum.norm_squared() * other.momentum.norm_squared()).sqrt();
        if norm_product <= 0.0 {
            return 0.0;
        }
        let cosine = (self.momentum.dot(&other.momentum) / norm_product).clamp(-1.0, 1.0);
        cosine.acos()
    }

    /// Azimuthal difference `φ − φ_other`, wrapped into [−π, π).
    pub fn delta_phi(&self, other: &FourMomentum) -> f64 {
        wrap_phi(self.phi() - other.phi())
    }
}

fn wrap_phi(mut phi: f64) -> f64 {
    if !phi.is_finite() {
        return phi;
    }
    while phi >= PI {
        phi -= 2.0 * PI;
    }
    while phi < -PI {
        phi += 2.0 * PI;
    }
    phi
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum::from_parts(self.energy + rhs.energy, self.momentum + rhs.momentum)
    }
}

impl Sub for FourMomentum {
    type Output = FourMomentum;

    fn sub(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum::from_parts(self.energy - rhs.energy, self.momentum - rhs.momentum)
    }
}

impl Neg for FourMomentum {
    type Output = FourMomentum;

    fn neg(self) -> FourMomentum {
        FourMomentum::from_parts(-self.energy, -self.momentum)
    }
}

impl std::iter::Sum for FourMomentum {
    fn sum<I: Iterator<Item = FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), |acc, p4| acc + p4)
    }
}
