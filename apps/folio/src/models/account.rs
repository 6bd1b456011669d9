use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in account as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl Account {
    pub fn new(id: Uuid) -> Self {
        Account {
            id,
            email: None,
            full_name: None,
        }
    }
}

/// Subscription tier. Accounts with no recorded plan are on `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTier::Free => f.write_str("Free"),
            PlanTier::Pro => f.write_str("Pro"),
        }
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            other => Err(format!("unknown plan '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_tier_from_str() {
        assert_eq!("Pro".parse::<PlanTier>(), Ok(PlanTier::Pro));
        assert_eq!(" free ".parse::<PlanTier>(), Ok(PlanTier::Free));
        assert!("enterprise".parse::<PlanTier>().is_err());
    }
}
