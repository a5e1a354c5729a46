//! Decision table for variants in a reference splice donor window.

use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{Consequence, Prior, SiteType, Variant};
use crate::priors::eval::result::PriorsRecord;

/// Evaluation of variants located in a reference donor window.
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

    /// Fill the record for a donor-window variant.
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
        record.ref_donor = self
            .parent
            .reference_site(variant, tx, SiteType::Donor)
            .map_err(|e| anyhow::anyhow!("issue scoring the donor site of {:?}: {}", variant, e))?;

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
