use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::str::FromStr;
use utoipa::ToSchema;

/// Fixed classification of a report's subject, matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    RoadDamage,
    Garbage,
    Flood,
    StreetLight,
    Other,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 5] = [
        ReportCategory::RoadDamage,
        ReportCategory::Garbage,
        ReportCategory::Flood,
        ReportCategory::StreetLight,
        ReportCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCategory::RoadDamage => "road_damage",
            ReportCategory::Garbage => "garbage",
            ReportCategory::Flood => "flood",
            ReportCategory::StreetLight => "street_light",
            ReportCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid category '{}'. Allowed: road_damage, garbage, flood, street_light, other",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_categories() {
        assert_eq!(
            "road_damage".parse::<ReportCategory>().unwrap(),
            ReportCategory::RoadDamage
        );
        assert_eq!(
            " street_light ".parse::<ReportCategory>().unwrap(),
            ReportCategory::StreetLight
        );
    }

    #[test]
    fn test_parse_rejects_unknown_or_display_forms() {
        assert!("pothole".parse::<ReportCategory>().is_err());
        assert!("RoadDamage".parse::<ReportCategory>().is_err());
        assert!("".parse::<ReportCategory>().is_err());
    }
}
