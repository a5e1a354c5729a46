//! Decision table for deep intronic variants.

use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{Prior, SiteType, Variant};
use crate::priors::eval::result::PriorsRecord;

/// Evaluation of deep intronic variants.
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

    /// Fill the record for a deep intronic variant.
    ///
    /// The de novo searches abstain this far from any exon, so the record
    /// keeps the regional floor.
    ///
    /// # Arguments
    ///
    /// * `variant` - Variant to be evaluated.
    /// * `tx` - Transcript of the variant's gene.
    /// * `record` - Record to fill.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn evaluate(
        &self,
        variant: &Variant,
        tx: &Transcript,
        record: &mut PriorsRecord,
    ) -> Result<(), anyhow::Error> {
        let (donor_report, _) = self.parent.de_novo_report(variant, tx, SiteType::Donor)?;
        let (acceptor_report, _) = self.parent.de_novo_report(variant, tx, SiteType::Acceptor)?;
        record.de_novo_donor = donor_report;
        record.de_novo_acceptor = acceptor_report;

        self.parent.finish(record, Prior::DeNovoLow);
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use rstest::rstest;

    use crate::priors::ds::{EnigmaClass, Prior};
    use crate::priors::eval::fixtures::{brca2_variant, uniform_evaluator};

    #[rstest]
    fn deep_intron_keeps_floor_and_sentinel_sections(
        uniform_evaluator: crate::priors::eval::Evaluator,
    ) -> Result<(), anyhow::Error> {
        let variant = brca2_variant(32320000, "A", "C");
        let record = uniform_evaluator.evaluate(&variant)?;
        assert_eq!(record.de_novo_donor.prior, Prior::NotApplicable);
        assert_eq!(record.de_novo_acceptor.prior, Prior::NotApplicable);
        assert_eq!(record.applicable_prior, Prior::DeNovoLow);
        assert_eq!(record.applicable_class, EnigmaClass::Class1);
        Ok(())
    }
}
