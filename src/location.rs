use serde::*;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_coords(x: u32, y: u32) -> Self {
        Location {
            packed: ((x << 8) | y) as u16,
        }
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Shift by a signed offset. Returns `None` if the result leaves the
    /// 28x28 bounding square (diamond bounds are checked separately).
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x() as i16 + dx as i16;
        let y = self.y() as i16 + dy as i16;
        if (0..crate::constants::ARENA_SIZE as i16).contains(&x)
            && (0..crate::constants::ARENA_SIZE as i16).contains(&y)
        {
            Some(Location::from_coords(x as u32, y as u32))
        } else {
            None
        }
    }

    pub fn distance_sq(self, other: Self) -> u32 {
        let dx = (self.x() as i32 - other.x() as i32).unsigned_abs();
        let dy = (self.y() as i32 - other.y() as i32).unsigned_abs();
        dx * dx + dy * dy
    }

    /// Euclidean distance, which is what turret ranges are measured in.
    pub fn distance_to(self, other: Self) -> f32 {
        (self.distance_sq(other) as f32).sqrt()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x(), self.y())
    }
}

impl From<[u8; 2]> for Location {
    fn from(xy: [u8; 2]) -> Self {
        Location::from_coords(xy[0] as u32, xy[1] as u32)
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.x(), self.y()].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <[u8; 2]>::deserialize(deserializer).map(Location::from)
    }
}
