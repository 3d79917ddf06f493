//! Catalog filter - structured criteria over the recipe collection.
//!
//! Filter criteria combine by logical AND; an absent constraint matches
//! everything. The repository translates the same filter into SQL, this
//! module holds the canonical in-memory predicate.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::recipe::{Difficulty, Recipe};
use crate::errors::{AppError, AppResult};

/// Sentinel query value meaning "no difficulty constraint"
pub const ALL_DIFFICULTIES: &str = "All Difficulties";

/// Sentinel query value meaning "no time constraint"
pub const ANY_TIME: &str = "Any Time";

/// Cooking-time buckets partitioning the catalog.
///
/// Boundaries are gap-free and overlap-free: 30 belongs to the first
/// bucket, 60 to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TimeBucket {
    #[serde(rename = "Under 30 min")]
    Under30,
    #[serde(rename = "30-60 min")]
    Between30And60,
    #[serde(rename = "Over 60 min")]
    Over60,
}

impl TimeBucket {
    /// Whether a cooking time in minutes falls into this bucket
    pub fn contains(&self, minutes: i32) -> bool {
        match self {
            TimeBucket::Under30 => minutes <= 30,
            TimeBucket::Between30And60 => minutes > 30 && minutes <= 60,
            TimeBucket::Over60 => minutes > 60,
        }
    }
}

impl TryFrom<&str> for TimeBucket {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "Under 30 min" => Ok(TimeBucket::Under30),
            "30-60 min" => Ok(TimeBucket::Between30And60),
            "Over 60 min" => Ok(TimeBucket::Over60),
            other => Err(AppError::validation(format!(
                "Unknown time filter '{}'",
                other
            ))),
        }
    }
}

/// Combined catalog filter criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub difficulty: Option<Difficulty>,
    pub time: Option<TimeBucket>,
    pub search: Option<String>,
}

impl RecipeFilter {
    /// Parse user-supplied query values. Absent values and the
    /// `"All Difficulties"` / `"Any Time"` sentinels mean unconstrained;
    /// anything else must be a valid enumerated value.
    pub fn from_query(
        difficulty: Option<&str>,
        time: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<Self> {
        let difficulty = match difficulty {
            None => None,
            Some(ALL_DIFFICULTIES) => None,
            Some(value) => Some(Difficulty::try_from(value)?),
        };

        let time = match time {
            None => None,
            Some(ANY_TIME) => None,
            Some(value) => Some(TimeBucket::try_from(value)?),
        };

        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            difficulty,
            time,
            search,
        })
    }

    /// The canonical predicate: all present constraints must hold.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(difficulty) = self.difficulty {
            if recipe.difficulty != difficulty {
                return false;
            }
        }

        if let Some(bucket) = self.time {
            if !bucket.contains(recipe.cooking_time) {
                return false;
            }
        }

        if let Some(term) = &self.search {
            let needle = term.to_lowercase();
            let in_title = recipe.title.to_lowercase().contains(&needle);
            let in_description = recipe.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recipe::RecipeOwner;
    use chrono::Utc;
    use uuid::Uuid;

    fn recipe(cooking_time: i32, difficulty: Difficulty) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            title: "Lentil Soup".to_string(),
            description: "Hearty winter soup".to_string(),
            image_url: "https://example.com/soup.jpg".to_string(),
            cooking_time,
            difficulty,
            ingredients: vec!["lentils".to_string()],
            instructions: "Boil until soft.".to_string(),
            owner: RecipeOwner {
                id: Uuid::new_v4(),
                username: "alice".to_string(),
            },
            likes: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bucket_boundary_at_30() {
        // 30 belongs to the first bucket, never the second
        assert!(TimeBucket::Under30.contains(30));
        assert!(!TimeBucket::Between30And60.contains(30));
        assert!(TimeBucket::Between30And60.contains(31));
    }

    #[test]
    fn test_bucket_boundary_at_60() {
        // 60 belongs to the second bucket, never the third
        assert!(TimeBucket::Between30And60.contains(60));
        assert!(!TimeBucket::Over60.contains(60));
        assert!(TimeBucket::Over60.contains(61));
    }

    #[test]
    fn test_buckets_are_disjoint_and_cover() {
        for minutes in 1..=120 {
            let hits = [
                TimeBucket::Under30,
                TimeBucket::Between30And60,
                TimeBucket::Over60,
            ]
            .iter()
            .filter(|b| b.contains(minutes))
            .count();
            assert_eq!(hits, 1, "minute {} must land in exactly one bucket", minutes);
        }
    }

    #[test]
    fn test_sentinels_mean_unconstrained() {
        let filter =
            RecipeFilter::from_query(Some("All Difficulties"), Some("Any Time"), None).unwrap();
        assert_eq!(filter, RecipeFilter::default());
        assert!(filter.matches(&recipe(200, Difficulty::Hard)));
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(RecipeFilter::from_query(Some("Impossible"), None, None).is_err());
        assert!(RecipeFilter::from_query(None, Some("Under 10 min"), None).is_err());
    }

    #[test]
    fn test_constraints_combine_with_and() {
        let filter =
            RecipeFilter::from_query(Some("Easy"), Some("Under 30 min"), None).unwrap();

        assert!(filter.matches(&recipe(25, Difficulty::Easy)));
        assert!(filter.matches(&recipe(30, Difficulty::Easy)));
        assert!(!filter.matches(&recipe(25, Difficulty::Medium)));
        assert!(!filter.matches(&recipe(31, Difficulty::Easy)));
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_or_description() {
        let filter = RecipeFilter::from_query(None, None, Some("LENTIL")).unwrap();
        assert!(filter.matches(&recipe(40, Difficulty::Medium)));

        let filter = RecipeFilter::from_query(None, None, Some("winter")).unwrap();
        assert!(filter.matches(&recipe(40, Difficulty::Medium)));

        let filter = RecipeFilter::from_query(None, None, Some("biscuit")).unwrap();
        assert!(!filter.matches(&recipe(40, Difficulty::Medium)));
    }

    #[test]
    fn test_search_ands_with_structured_filters() {
        let filter =
            RecipeFilter::from_query(Some("Medium"), Some("30-60 min"), Some("soup")).unwrap();
        assert!(filter.matches(&recipe(45, Difficulty::Medium)));
        assert!(!filter.matches(&recipe(45, Difficulty::Easy)));
    }

    #[test]
    fn test_blank_search_ignored() {
        let filter = RecipeFilter::from_query(None, None, Some("   ")).unwrap();
        assert!(filter.search.is_none());
    }
}
