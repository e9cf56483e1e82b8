// ABOUTME: The fixed set of top-level categories that have a trending-websites page.
// ABOUTME: Converts between TrendCategory values and their URL slugs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A top-level website category with its own ranking page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendCategory {
    ArtsAndEntertainment,
    BusinessAndConsumerServices,
    CommunityAndSociety,
    ComputersElectronicsAndTechnology,
    ECommerceAndShopping,
    Finance,
    FoodAndDrink,
    Gambling,
    Games,
    Health,
    HeavyIndustryAndEngineering,
    HobbiesAndLeisure,
    HomeAndGarden,
    JobsAndCareer,
    LawAndGovernment,
    Lifestyle,
    NewsAndMedia,
    PetsAndAnimals,
    ReferenceMaterials,
    ScienceAndEducation,
    Sports,
    TravelAndTourism,
    Vehicles,
}

impl TrendCategory {
    pub const ALL: [TrendCategory; 23] = [
        TrendCategory::ArtsAndEntertainment,
        TrendCategory::BusinessAndConsumerServices,
        TrendCategory::CommunityAndSociety,
        TrendCategory::ComputersElectronicsAndTechnology,
        TrendCategory::ECommerceAndShopping,
        TrendCategory::Finance,
        TrendCategory::FoodAndDrink,
        TrendCategory::Gambling,
        TrendCategory::Games,
        TrendCategory::Health,
        TrendCategory::HeavyIndustryAndEngineering,
        TrendCategory::HobbiesAndLeisure,
        TrendCategory::HomeAndGarden,
        TrendCategory::JobsAndCareer,
        TrendCategory::LawAndGovernment,
        TrendCategory::Lifestyle,
        TrendCategory::NewsAndMedia,
        TrendCategory::PetsAndAnimals,
        TrendCategory::ReferenceMaterials,
        TrendCategory::ScienceAndEducation,
        TrendCategory::Sports,
        TrendCategory::TravelAndTourism,
        TrendCategory::Vehicles,
    ];

    /// The path segment used on the ranking page URL.
    pub fn slug(self) -> &'static str {
        match self {
            TrendCategory::ArtsAndEntertainment => "arts-and-entertainment",
            TrendCategory::BusinessAndConsumerServices => "business-and-consumer-services",
            TrendCategory::CommunityAndSociety => "community-and-society",
            TrendCategory::ComputersElectronicsAndTechnology => {
                "computers-electronics-and-technology"
            }
            TrendCategory::ECommerceAndShopping => "e-commerce-and-shopping",
            TrendCategory::Finance => "finance",
            TrendCategory::FoodAndDrink => "food-and-drink",
            TrendCategory::Gambling => "gambling",
            TrendCategory::Games => "games",
            TrendCategory::Health => "health",
            TrendCategory::HeavyIndustryAndEngineering => "heavy-industry-and-engineering",
            TrendCategory::HobbiesAndLeisure => "hobbies-and-leisure",
            TrendCategory::HomeAndGarden => "home-and-garden",
            TrendCategory::JobsAndCareer => "jobs-and-career",
            TrendCategory::LawAndGovernment => "law-and-government",
            TrendCategory::Lifestyle => "lifestyle",
            TrendCategory::NewsAndMedia => "news-and-media",
            TrendCategory::PetsAndAnimals => "pets-and-animals",
            TrendCategory::ReferenceMaterials => "reference-materials",
            TrendCategory::ScienceAndEducation => "science-and-education",
            TrendCategory::Sports => "sports",
            TrendCategory::TravelAndTourism => "travel-and-tourism",
            TrendCategory::Vehicles => "vehicles",
        }
    }
}

impl fmt::Display for TrendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TrendCategory {
    type Err = ParseError;

    /// Accepts slugs, case-insensitively, with `_` or spaces in place of `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', ' '], "-");
        TrendCategory::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == wanted)
            .ok_or_else(|| ParseError::field("category", s))
    }
}
