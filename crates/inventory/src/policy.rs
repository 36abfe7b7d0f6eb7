//! Low-stock policies.

use ims_core::{DomainError, DomainResult};

use crate::item::Item;

/// Decides whether an item counts as "low stock".
pub trait LowStockPolicy: Send + Sync {
    fn is_low(&self, item: &Item) -> bool;
}

/// Inline rules: any `Fn(&Item) -> bool` closure is a policy.
impl<F> LowStockPolicy for F
where
    F: Fn(&Item) -> bool + Send + Sync,
{
    fn is_low(&self, item: &Item) -> bool {
        self(item)
    }
}

/// Fixed global threshold: an item is low when `quantity < threshold`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ThresholdPolicy {
    threshold: i32,
}

impl ThresholdPolicy {
    pub fn new(threshold: i32) -> DomainResult<Self> {
        if threshold < 0 {
            return Err(DomainError::validation("threshold must be >= 0"));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl LowStockPolicy for ThresholdPolicy {
    fn is_low(&self, item: &Item) -> bool {
        item.quantity() < self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(qty: i32) -> Item {
        Item::new("A", "n", qty, 1.0, "s").unwrap()
    }

    #[test]
    fn threshold_is_strictly_less_than() {
        let policy = ThresholdPolicy::new(10).unwrap();
        assert!(policy.is_low(&item(9)));
        assert!(!policy.is_low(&item(10)));
        assert!(!policy.is_low(&item(15)));
    }

    #[test]
    fn threshold_is_reported_as_configured() {
        assert_eq!(ThresholdPolicy::new(10).unwrap().threshold(), 10);
        assert_eq!(ThresholdPolicy::new(0).unwrap().threshold(), 0);
    }

    #[test]
    fn zero_threshold_never_reports_low() {
        let policy = ThresholdPolicy::new(0).unwrap();
        assert!(!policy.is_low(&item(0)));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        assert!(matches!(
            ThresholdPolicy::new(-1),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn closures_act_as_policies() {
        let out_of_stock = |i: &Item| i.quantity() == 0;
        assert!(out_of_stock.is_low(&item(0)));
        assert!(!out_of_stock.is_low(&item(1)));
    }
}
