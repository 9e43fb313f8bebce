use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeductions {
    pub single: Decimal,
    pub joint: Decimal,
    pub head: Decimal,
}

impl StandardDeductions {
    pub fn for_status(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::Joint => self.joint,
            FilingStatus::Head => self.head,
        }
    }
}
