//! Downloadable PDF brochure records.
//!
//! Not to be confused with the product catalog: a brochure is a marketing
//! PDF the storefront offers for download. Pure data - the store layer
//! owns the CRUD, and nothing here couples to products or orders.

use serde::{Deserialize, Serialize};

use crate::types::BrochureId;

/// A downloadable PDF brochure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brochure {
    /// Unique identifier.
    pub id: BrochureId,
    /// Display title.
    pub title: String,
    /// Short description shown next to the download link.
    pub description: String,
    /// Cover image URL.
    pub cover_image: String,
    /// URL of the PDF file.
    pub pdf_url: String,
    /// Original file name, shown in the admin list.
    pub pdf_file_name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let brochure = Brochure {
            id: BrochureId::new(1),
            title: "2025 lineup".to_owned(),
            description: "All models with floor plans".to_owned(),
            cover_image: "/uploads/catalog-cover.jpg".to_owned(),
            pdf_url: "/uploads/catalog-2025.pdf".to_owned(),
            pdf_file_name: "catalog-2025.pdf".to_owned(),
        };

        let json = serde_json::to_string(&brochure).unwrap();
        let back: Brochure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, brochure);
    }
}
