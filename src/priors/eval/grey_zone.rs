//! Decision table for the grey zone and the region downstream of it.

use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{Prior, Variant};
use crate::priors::eval::result::PriorsRecord;

/// Evaluation of variants in or after the grey zone.
///
/// This is mainly used to encapsulate the functionality.  Creating new such
/// objects is very straightforward and cheap.
pub struct Evaluator<'a> {
    /// The parent evaluator.
    parent: &'a super::Evaluator,
}

impl<'a> Evaluator<'a> {
    /// Create a new `Evaluator`.
    pub fn with_parent(parent: &'a super::Evaluator) -> Self {
        Self { parent }
    }

    /// Fill the record for a grey-zone or after-grey-zone variant.
    ///
    /// Inside the grey zone no evidence-based prior exists and the record
    /// stays at the sentinel.  Past the grey zone the transcript tail is
    /// tolerant and a fixed low prior applies.
    ///
    /// # Arguments
    ///
    /// * `variant` - Variant to be evaluated.
    /// * `tx` - Transcript of the variant's gene.
    /// * `record` - Record to fill.
    /// * `after` - Whether the variant lies past the grey zone rather
    ///   than inside it.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn evaluate(
        &self,
        _variant: &Variant,
        _tx: &Transcript,
        record: &mut PriorsRecord,
        after: bool,
    ) -> Result<(), anyhow::Error> {
        let floor = if after {
            Prior::DeNovoLow
        } else {
            Prior::NotApplicable
        };
        self.parent.finish(record, floor);
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use rstest::rstest;

    use crate::priors::ds::{EnigmaClass, Prior};
    use crate::priors::eval::fixtures::{brca2_variant, uniform_evaluator};
    use crate::priors::eval::location::Location;
    use crate::priors::eval::result::LocationReport;

    #[rstest]
    fn grey_zone_abstains(
        uniform_evaluator: crate::priors::eval::Evaluator,
    ) -> Result<(), anyhow::Error> {
        let variant = brca2_variant(32398450, "G", "A");
        let record = uniform_evaluator.evaluate(&variant)?;
        assert_eq!(record.location, LocationReport::Single(Location::GreyZone));
        assert_eq!(record.applicable_prior, Prior::NotApplicable);
        assert_eq!(record.applicable_class, EnigmaClass::NotApplicable);
        Ok(())
    }

    #[rstest]
    fn after_grey_zone_takes_fixed_low_prior(
        uniform_evaluator: crate::priors::eval::Evaluator,
    ) -> Result<(), anyhow::Error> {
        let variant = brca2_variant(32398600, "A", "C");
        let record = uniform_evaluator.evaluate(&variant)?;
        assert_eq!(
            record.location,
            LocationReport::Single(Location::AfterGreyZone)
        );
        assert_eq!(record.applicable_prior, Prior::DeNovoLow);
        assert_eq!(record.applicable_class, EnigmaClass::Class1);
        Ok(())
    }
}
