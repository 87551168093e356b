use arrayvec::ArrayVec;

/// Pending roll values plus the bonus rolls owed to the current seat.
///
/// Bonus entitlements (capture, piece reaching the center) are counted apart
/// from the numeric values so the queue only ever holds spendable values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollPool {
    pub values: Vec<u8>,
    pub bonus: u8,
}

impl RollPool {
    pub fn push_value(&mut self, value: u8) {
        self.values.push(value);
    }

    /// Removes one occurrence of `value`; returns false if none was pending.
    pub fn take_value(&mut self, value: u8) -> bool {
        match self.values.iter().position(|&v| v == value) {
            Some(index) => {
                self.values.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn grant_bonus(&mut self) {
        self.bonus = self.bonus.saturating_add(1);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.bonus = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.bonus == 0
    }

    /// Nothing left to spend except owed bonus rolls.
    pub fn has_only_bonus(&self) -> bool {
        self.values.is_empty() && self.bonus > 0
    }

    /// Distinct pending values in first-rolled order.
    pub fn distinct_values(&self) -> ArrayVec<u8, 5> {
        let mut distinct = ArrayVec::new();
        for &value in &self.values {
            if !distinct.contains(&value) && !distinct.is_full() {
                distinct.push(value);
            }
        }
        distinct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_value_removes_a_single_occurrence() {
        let mut pool = RollPool {
            values: vec![4, 2, 4],
            bonus: 0,
        };
        assert!(pool.take_value(4));
        assert_eq!(pool.values, vec![2, 4]);
        assert!(!pool.take_value(3));
    }

    #[test]
    fn distinct_values_keep_roll_order() {
        let pool = RollPool {
            values: vec![8, 4, 8, 1],
            bonus: 0,
        };
        assert_eq!(pool.distinct_values().as_slice(), &[8, 4, 1]);
    }

    #[test]
    fn bonus_alone_is_not_empty() {
        let mut pool = RollPool::default();
        pool.grant_bonus();
        assert!(!pool.is_empty());
        assert!(pool.has_only_bonus());

        pool.clear();
        assert!(pool.is_empty());
    }
}
