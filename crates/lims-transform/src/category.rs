//! Category assignment.

use lims_model::{Category, NormalizedSample, SpecimenType, Unit};

/// Assign a category by precedence: cell-count units are hematology, then
/// swabs are microbiology, and everything else is chemistry.
pub fn categorize(sample: &NormalizedSample) -> Category {
    if sample.unit.contains(Unit::HEMATOLOGY_MARKER) {
        Category::Hematology
    } else if sample.specimen_type == SpecimenType::Swab.as_str() {
        Category::Microbiology
    } else {
        Category::Chemistry
    }
}
