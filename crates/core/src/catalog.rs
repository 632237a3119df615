//! The reference grant catalog seeded into the `grants` table.
//!
//! The catalog is fixed and versionless. Rows are identified by their
//! title (the natural key); the generated `id` plays no part in
//! de-duplication.

use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::CoreError;

/// Value written to `grants.source` for every seeded row.
pub const SEED_SOURCE: &str = "Government";

/// One entry of the reference catalog.
///
/// Amounts are whole US dollars. `success_rate` is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[validate(schema(function = "validate_amount_range"))]
pub struct SeedGrant {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[validate(length(max = 255))]
    pub agency: String,
    pub amount_min: i64,
    pub amount_max: i64,
    #[validate(length(max = 100))]
    pub category: String,
    pub description: String,
    pub keywords: String,
    pub eligibility: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub success_rate: f64,
    #[validate(url, length(max = 500))]
    pub url: String,
}

impl SeedGrant {
    /// Check the entry against the `grants` column constraints before it is
    /// sent to the store.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        Ok(())
    }
}

fn validate_amount_range(grant: &SeedGrant) -> Result<(), ValidationError> {
    if grant.amount_min < 0 || grant.amount_min > grant.amount_max {
        let mut err = ValidationError::new("amount_range");
        err.message = Some(
            format!(
                "amount_min ({}) must be non-negative and not exceed amount_max ({})",
                grant.amount_min, grant.amount_max
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn entry(
    title: &str,
    agency: &str,
    amount_min: i64,
    amount_max: i64,
    category: &str,
    description: &str,
    keywords: &str,
    eligibility: &str,
    success_rate: f64,
    url: &str,
) -> SeedGrant {
    SeedGrant {
        title: title.to_string(),
        agency: agency.to_string(),
        amount_min,
        amount_max,
        category: category.to_string(),
        description: description.to_string(),
        keywords: keywords.to_string(),
        eligibility: eligibility.to_string(),
        success_rate,
        url: url.to_string(),
    }
}

/// The eight sample grants, in insertion order.
pub fn reference_catalog() -> Vec<SeedGrant> {
    vec![
        entry(
            "Environmental Innovation Grant 2024",
            "EPA",
            50_000,
            500_000,
            "Environment",
            "Supporting innovative environmental protection technologies and research",
            "environment, climate, sustainability, green tech",
            "Non-profit organizations, educational institutions",
            32.5,
            "https://www.epa.gov/grants",
        ),
        entry(
            "Small Business Innovation Research (SBIR) Phase I",
            "NSF",
            100_000,
            275_000,
            "Technology",
            "Seed funding for technology startups and innovative small businesses",
            "technology, innovation, startup, R&D",
            "Small businesses with fewer than 500 employees",
            18.7,
            "https://www.nsf.gov/sbir",
        ),
        entry(
            "NIH Research Project Grant (R01)",
            "NIH",
            250_000,
            500_000,
            "Health",
            "Support for health-related research and development",
            "health, medical, research, clinical",
            "Research institutions, universities",
            21.0,
            "https://grants.nih.gov",
        ),
        entry(
            "Education Innovation and Research Grant",
            "Department of Education",
            100_000,
            4_000_000,
            "Education",
            "Supporting evidence-based innovations in education",
            "education, learning, schools, innovation",
            "Educational agencies, non-profits",
            15.3,
            "https://www.ed.gov/grants",
        ),
        entry(
            "Community Development Block Grant",
            "HUD",
            50_000,
            2_000_000,
            "Community Development",
            "Funding for community development and housing projects",
            "community, housing, urban development",
            "Local governments, community organizations",
            28.9,
            "https://www.hud.gov/cdbg",
        ),
        entry(
            "Arts and Culture Grant Program",
            "NEA",
            10_000,
            100_000,
            "Arts",
            "Supporting artistic excellence and cultural preservation",
            "arts, culture, music, theater, visual arts",
            "Arts organizations, individual artists",
            24.5,
            "https://www.arts.gov",
        ),
        entry(
            "Clean Energy Innovation Fund",
            "DOE",
            500_000,
            5_000_000,
            "Energy",
            "Advancing clean energy technologies and renewable solutions",
            "clean energy, solar, wind, renewable, battery",
            "Research institutions, energy companies",
            16.8,
            "https://www.energy.gov/grants",
        ),
        entry(
            "Rural Development Grant",
            "USDA",
            25_000,
            500_000,
            "Agriculture",
            "Supporting rural communities and agricultural innovation",
            "rural, agriculture, farming, community development",
            "Rural communities, agricultural businesses",
            31.2,
            "https://www.usda.gov/rural",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn catalog_has_eight_entries() {
        assert_eq!(reference_catalog().len(), 8);
    }

    #[test]
    fn catalog_titles_are_unique() {
        let catalog = reference_catalog();
        let titles: HashSet<&str> = catalog.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles.len(), catalog.len());
    }

    #[test]
    fn every_catalog_entry_passes_validation() {
        for grant in reference_catalog() {
            assert!(grant.check().is_ok(), "{} failed validation", grant.title);
        }
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut grant = reference_catalog().remove(0);
        grant.title = "x".repeat(501);
        assert_matches!(grant.check(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut grant = reference_catalog().remove(0);
        grant.title.clear();
        assert_matches!(grant.check(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn inverted_amount_range_is_rejected() {
        let mut grant = reference_catalog().remove(1);
        grant.amount_min = 1_000_000;
        grant.amount_max = 10;
        let err = grant.check().unwrap_err();
        assert!(err.to_string().contains("amount_min"), "got: {err}");
    }

    #[test]
    fn success_rate_above_hundred_is_rejected() {
        let mut grant = reference_catalog().remove(2);
        grant.success_rate = 120.0;
        assert_matches!(grant.check(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn malformed_url_is_rejected() {
        let mut grant = reference_catalog().remove(3);
        grant.url = "not a url".to_string();
        assert_matches!(grant.check(), Err(CoreError::Validation(_)));
    }
}
