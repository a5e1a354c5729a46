//! Decision table for untranslated-region variants.

use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{Prior, SiteType, Variant};
use crate::priors::eval::result::PriorsRecord;

/// Evaluation of UTR variants.
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

    /// Fill the record for a UTR variant.
    ///
    /// There is no protein-level pathway outside the CDS; only the two
    /// de novo searches can raise the prior above the regional floor.
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
