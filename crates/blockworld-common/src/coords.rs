//! Coordinate types for the block lattice.

use glam::{DVec3, IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Integer lattice position occupied by at most one block.
///
/// Ordering is lexicographic on `(x, y, z)`, which is what gives saved
/// worlds a stable line order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// X coordinate
    pub x: i32,
    /// Y coordinate (up)
    pub y: i32,
    /// Z coordinate
    pub z: i32,
}

impl BlockPos {
    /// The lattice origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the neighbouring position across the given face.
    ///
    /// Returns `None` when the neighbour would fall off the edge of the
    /// `i32` lattice.
    #[must_use]
    pub fn offset(self, normal: FaceNormal) -> Option<Self> {
        let n = normal.as_ivec3();
        Some(Self {
            x: self.x.checked_add(n.x)?,
            y: self.y.checked_add(n.y)?,
            z: self.z.checked_add(n.z)?,
        })
    }

    /// Snaps a world-space position to the nearest lattice point.
    ///
    /// Rounds half away from zero. Returns `None` for non-finite components
    /// or components outside the `i32` range.
    #[must_use]
    pub fn from_world(position: DVec3) -> Option<Self> {
        Some(Self {
            x: round_component(position.x)?,
            y: round_component(position.y)?,
            z: round_component(position.z)?,
        })
    }

    /// World-space position of the block's lattice point.
    #[must_use]
    pub fn to_world(self) -> DVec3 {
        DVec3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Returns the position as a glam vector.
    #[must_use]
    pub const fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

impl From<IVec3> for BlockPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl std::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

fn round_component(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    if rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return None;
    }
    Some(rounded as i32)
}

/// Outward unit normal of a cube face, always axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceNormal(IVec3);

impl FaceNormal {
    /// +Y
    pub const UP: Self = Self(IVec3::Y);
    /// -Y
    pub const DOWN: Self = Self(IVec3::NEG_Y);
    /// +X
    pub const EAST: Self = Self(IVec3::X);
    /// -X
    pub const WEST: Self = Self(IVec3::NEG_X);
    /// +Z
    pub const SOUTH: Self = Self(IVec3::Z);
    /// -Z
    pub const NORTH: Self = Self(IVec3::NEG_Z);

    /// All six face normals.
    pub const ALL: [Self; 6] = [
        Self::UP,
        Self::DOWN,
        Self::EAST,
        Self::WEST,
        Self::SOUTH,
        Self::NORTH,
    ];

    /// Creates a face normal from an integer vector.
    ///
    /// Returns `None` unless exactly one component is `±1` and the others are 0.
    #[must_use]
    pub fn new(v: IVec3) -> Option<Self> {
        let manhattan = u64::from(v.x.unsigned_abs())
            + u64::from(v.y.unsigned_abs())
            + u64::from(v.z.unsigned_abs());
        (manhattan == 1).then_some(Self(v))
    }

    /// Creates a face normal from a float normal reported by a hit test.
    ///
    /// Each component is rounded to the nearest integer before validation.
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Option<Self> {
        if !v.is_finite() {
            return None;
        }
        Self::new(v.round().as_ivec3())
    }

    /// Returns the normal as a glam vector.
    #[must_use]
    pub const fn as_ivec3(self) -> IVec3 {
        self.0
    }
}
