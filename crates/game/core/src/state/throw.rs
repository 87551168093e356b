/// Outcome of throwing the four two-faced sticks.
///
/// `true` marks a stick that landed flat side up. The move value is always
/// derived from the faces: no flats is Chakkhan (4), all four flats is
/// Changa (8), otherwise the number of flats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickThrow {
    pub sticks: [bool; 4],
}

impl StickThrow {
    pub const fn new(sticks: [bool; 4]) -> Self {
        Self { sticks }
    }

    /// Smallest throw producing `value`, if the value can be thrown at all.
    pub fn for_value(value: u8) -> Option<Self> {
        let flats = match value {
            4 => 0,
            1 => 1,
            2 => 2,
            3 => 3,
            8 => 4,
            _ => return None,
        };
        let mut sticks = [false; 4];
        sticks.iter_mut().take(flats).for_each(|s| *s = true);
        Some(Self { sticks })
    }

    pub fn flats(&self) -> usize {
        self.sticks.iter().filter(|&&flat| flat).count()
    }

    pub fn value(&self) -> u8 {
        match self.flats() {
            0 => 4,
            4 => 8,
            n => n as u8,
        }
    }

    /// 4 and 8 grant a further roll and count toward the forfeit streak.
    pub fn is_high(&self) -> bool {
        is_high_value(self.value())
    }
}

pub const fn is_high_value(value: u8) -> bool {
    value == 4 || value == 8
}
