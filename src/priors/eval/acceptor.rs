//! Decision table for variants in a reference splice acceptor window.

use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{Consequence, Prior, SiteType, Variant};
use crate::priors::eval::result::PriorsRecord;

/// Evaluation of variants located in a reference acceptor window.
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

    /// Fill the record for an acceptor-window variant.
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
        record.ref_acceptor = self
            .parent
            .reference_site(variant, tx, SiteType::Acceptor)
            .map_err(|e| {
                anyhow::anyhow!("issue scoring the acceptor site of {:?}: {}", variant, e)
            })?;

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
    use crate::priors::ds::{EnigmaClass, Prior, SiteType};
    use crate::priors::eval::fixtures::{brca2_variant, evaluator_with, synthetic_seq};
    use crate::priors::eval::result::Text;
    use crate::priors::eval::scoring::TableScorer;

    #[test]
    fn modest_strength_loss_yields_moderate() -> Result<(), anyhow::Error> {
        // Intronic base of the exon4 acceptor window.
        let ref_window = synthetic_seq(32325056, 23);
        let mut alt_window = ref_window.clone();
        alt_window.replace_range(4..5, "C");
        let mut table = TableScorer::with_default(0.0);
        table.insert(SiteType::Acceptor, &ref_window, 9.0);
        table.insert(SiteType::Acceptor, &alt_window, 8.8);
        let evaluator = evaluator_with(table, Default::default());

        let variant = brca2_variant(32325060, "A", "C");
        let record = evaluator.evaluate(&variant)?;
        assert_eq!(record.ref_acceptor.exon, Text::Value("exon4".into()));
        // Healthy site, small drop, alternate z below the improvement bar.
        assert_eq!(record.ref_acceptor.prior, Prior::Moderate);
        assert_eq!(record.applicable_prior, Prior::Moderate);
        assert_eq!(record.applicable_class, EnigmaClass::Class3);
        Ok(())
    }
}
