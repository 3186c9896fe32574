//! Aggregate catalog statistics.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Record count per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Windows records.
    pub windows: u64,
    /// Office records.
    pub office: u64,
    /// Tools records.
    pub tools: u64,
    /// Antivirus records.
    pub antivirus: u64,
}

impl CategoryBreakdown {
    /// Set the count of one category.
    pub fn set(&mut self, category: Category, count: u64) {
        match category {
            Category::Windows => self.windows = count,
            Category::Office => self.office = count,
            Category::Tools => self.tools = count,
            Category::Antivirus => self.antivirus = count,
        }
    }

    /// Sum over all categories.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.windows + self.office + self.tools + self.antivirus
    }
}

/// Summary shown by the statistics widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    /// Records across all categories.
    pub total_software: u64,
    /// Links known to be broken. Link checking is not wired up, so always 0.
    pub broken_links: u64,
    /// Rounded share of records without broken links, 100 for an empty catalog.
    pub safety_percentage: u8,
    /// Per-category counts.
    pub category_breakdown: CategoryBreakdown,
}

impl CatalogStats {
    /// Compute statistics from per-category counts.
    #[must_use]
    pub fn from_breakdown(category_breakdown: CategoryBreakdown) -> Self {
        let total_software = category_breakdown.total();
        let broken_links = 0;
        Self {
            total_software,
            broken_links,
            safety_percentage: safety_percentage(total_software, broken_links),
            category_breakdown,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn safety_percentage(total: u64, broken: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let safe = total.saturating_sub(broken) as f64;
    ((safe / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_and_percentage() {
        let stats = CatalogStats::from_breakdown(CategoryBreakdown {
            windows: 10,
            office: 5,
            tools: 3,
            antivirus: 2,
        });
        assert_eq!(stats.total_software, 20);
        assert_eq!(stats.broken_links, 0);
        assert_eq!(stats.safety_percentage, 100);
    }

    #[test]
    fn empty_catalog_is_fully_safe() {
        let stats = CatalogStats::from_breakdown(CategoryBreakdown::default());
        assert_eq!(stats.total_software, 0);
        assert_eq!(stats.safety_percentage, 100);
    }

    #[test]
    fn percentage_rounds() {
        assert_eq!(safety_percentage(3, 1), 67);
        assert_eq!(safety_percentage(8, 1), 88);
        assert_eq!(safety_percentage(2, 2), 0);
    }

    #[test]
    fn wire_format() {
        let json = serde_json::to_value(CatalogStats::from_breakdown(CategoryBreakdown {
            tools: 1,
            ..CategoryBreakdown::default()
        }))
        .unwrap();
        assert_eq!(json["totalSoftware"], 1);
        assert_eq!(json["brokenLinks"], 0);
        assert_eq!(json["safetyPercentage"], 100);
        assert_eq!(json["categoryBreakdown"]["tools"], 1);
    }
}
