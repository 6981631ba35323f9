use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Business classification of an expense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Healthcare,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Utilities,
        Self::Healthcare,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Healthcare => "healthcare",
            Self::Other => "other",
        }
    }
}

impl core::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "entertainment" => Ok(Self::Entertainment),
            "utilities" => Ok(Self::Utilities),
            "healthcare" => Ok(Self::Healthcare),
            "other" => Ok(Self::Other),
            _ => Err(ValidationError::new(
                "category",
                "Category must be one of: food, transport, entertainment, utilities, healthcare, other",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for category in ExpenseCategory::ALL {
            assert_eq!(ExpenseCategory::try_from(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn defaults_to_other() {
        assert_eq!(ExpenseCategory::default(), ExpenseCategory::Other);
    }

    #[test]
    fn rejects_unknown_value() {
        assert_eq!(ExpenseCategory::try_from("Food").unwrap_err().field, "category");
        assert!(ExpenseCategory::try_from("groceries").is_err());
    }
}
