//! # Marking Detection
//!
//! Decides whether a product needs a KIZ (control and identification mark).
//!
//! The rule that tells a marked product from an unmarked one is not defined
//! yet, so detection is a pluggable predicate evaluated once, when a product
//! is first seen in a box. [`NoMarking`] is the default and reports every
//! product as unmarked.
//!
//! ```rust
//! use packlist_core::marking::{MarkingDetector, NoMarking};
//!
//! assert!(!NoMarking.has_marking("4601234567890"));
//!
//! // Any closure works as a detector.
//! let datamatrix = |code: &str| code.starts_with("01") && code.len() > 30;
//! assert!(!datamatrix.has_marking("4601234567890"));
//! ```

/// Predicate deciding the marking flag for a product barcode.
pub trait MarkingDetector: Send + Sync {
    /// Returns true if the product identified by `barcode` carries a KIZ.
    fn has_marking(&self, barcode: &str) -> bool;
}

/// Detector that never flags a product.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarking;

impl MarkingDetector for NoMarking {
    fn has_marking(&self, _barcode: &str) -> bool {
        false
    }
}

impl<F> MarkingDetector for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn has_marking(&self, barcode: &str) -> bool {
        self(barcode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_marking_is_always_false() {
        assert!(!NoMarking.has_marking(""));
        assert!(!NoMarking.has_marking("ABC123"));
    }

    #[test]
    fn test_closure_detector() {
        let detector = |code: &str| code.ends_with('M');
        assert!(detector.has_marking("ABCM"));
        assert!(!detector.has_marking("ABC"));
    }
}
