//! Decision table for exonic variants outside the reference splice
//! windows, with or without a clinically important domain around them.

use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{Consequence, Prior, SiteType, Variant};
use crate::priors::eval::result::PriorsRecord;

/// Evaluation of exonic variants.
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

    /// Fill the record for an exonic variant.
    ///
    /// No reference splice site is touched, so the pathways are the two
    /// de novo searches, the protein-level prior, and the splice rescue
    /// assessment for premature stops.
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
        let (donor_report, donor_outcome) =
            self.parent.de_novo_report(variant, tx, SiteType::Donor)?;
        let (acceptor_report, _) = self.parent.de_novo_report(variant, tx, SiteType::Acceptor)?;
        record.de_novo_donor = donor_report;
        record.de_novo_acceptor = acceptor_report;

        record.protein = self.parent.protein_report(variant);
        if record.protein.consequence == Consequence::Nonsense {
            record.rescue = self
                .parent
                .rescue_for_nonsense(variant, tx, donor_outcome.as_ref());
        }

        self.parent.finish(record, Prior::NotApplicable);
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use crate::priors::data::repo::{InMemoryProteinPriors, ProteinImpact};
    use crate::priors::ds::{Consequence, EnigmaClass, Prior};
    use crate::priors::eval::fixtures::{brca2_variant_with_cdna, evaluator_with};
    use crate::priors::eval::scoring::TableScorer;

    #[test]
    fn missense_takes_protein_prior() -> Result<(), anyhow::Error> {
        let mut proteins = InMemoryProteinPriors::default();
        proteins.insert(
            "c.10G>A",
            ProteinImpact {
                consequence: Consequence::Missense,
                prior: Prior::ProteinModerate,
            },
        );
        let evaluator = evaluator_with(TableScorer::with_default(1.0), proteins);

        let variant = brca2_variant_with_cdna(32325130, "G", "A", "c.10G>A");
        let record = evaluator.evaluate(&variant)?;
        assert_eq!(record.protein.consequence, Consequence::Missense);
        assert_eq!(record.protein.prior, Prior::ProteinModerate);
        assert_eq!(record.applicable_prior, Prior::ProteinModerate);
        assert_eq!(record.applicable_class, EnigmaClass::Class2);
        Ok(())
    }

    #[test]
    fn unknown_protein_change_stays_not_applicable() -> Result<(), anyhow::Error> {
        let evaluator = evaluator_with(TableScorer::with_default(1.0), Default::default());

        let variant = brca2_variant_with_cdna(32325130, "G", "A", "c.10G>A");
        let record = evaluator.evaluate(&variant)?;
        assert_eq!(record.protein.consequence, Consequence::NotApplicable);
        assert_eq!(record.protein.prior, Prior::NotApplicable);
        assert_eq!(record.applicable_prior, Prior::NotApplicable);
        assert_eq!(record.applicable_class, EnigmaClass::NotApplicable);
        Ok(())
    }
}
