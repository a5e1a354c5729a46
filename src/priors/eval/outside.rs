//! Decision table for variants outside the transcript boundaries.

use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{Prior, Variant};
use crate::priors::eval::result::PriorsRecord;

/// Evaluation of variants outside the transcript.
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

    /// Fill the record for a variant outside the transcript.
    ///
    /// No pathway applies; every section keeps the sentinel.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn evaluate(
        &self,
        _variant: &Variant,
        _tx: &Transcript,
        record: &mut PriorsRecord,
    ) -> Result<(), anyhow::Error> {
        self.parent.finish(record, Prior::NotApplicable);
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use rstest::rstest;

    use crate::priors::ds::{EnigmaClass, Prior};
    use crate::priors::eval::fixtures::{brca2_variant, uniform_evaluator};
    use crate::priors::eval::location::Location;
    use crate::priors::eval::result::{Determination, LocationReport};

    #[rstest]
    fn everything_stays_sentinel(
        uniform_evaluator: crate::priors::eval::Evaluator,
    ) -> Result<(), anyhow::Error> {
        let variant = brca2_variant(32315100, "A", "C");
        let record = uniform_evaluator.evaluate(&variant)?;
        assert_eq!(record.determination, Determination::Computed);
        assert_eq!(
            record.location,
            LocationReport::Single(Location::OutsideTranscriptBoundaries)
        );
        assert_eq!(record.applicable_prior, Prior::NotApplicable);
        assert_eq!(record.applicable_class, EnigmaClass::NotApplicable);
        assert_eq!(record.ref_donor.prior, Prior::NotApplicable);
        assert_eq!(record.rescue.prior, Prior::NotApplicable);
        Ok(())
    }
}
