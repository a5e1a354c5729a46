//! Implementation of the prior-probability evaluation.
//!
//! The parent `Evaluator` owns the static configuration, the transcript
//! models, and the injected collaborators (sequence retrieval, motif
//! scoring, protein priors).  `evaluate()` locates the variant against
//! the region model and hands the record to the region's decision table;
//! the tables share the pathway subroutines defined on the parent and
//! end by resolving precedence over the contributed priors.

pub mod acceptor;
pub mod boundaries;
pub mod denovo;
pub mod donor;
pub mod exonic;
pub mod frame;
pub mod grey_zone;
pub mod intron;
pub mod location;
pub mod outside;
pub mod rescue;
pub mod result;
pub mod scoring;
pub mod sequence;
pub mod utr;

use crate::priors::data::config::SpliceConfig;
use crate::priors::data::repo::{ProteinPriorRepo, SequenceRepo};
use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{BoundarySource, Gene, Prior, SiteType, Variant, VariantType};
use crate::priors::eval::denovo::DeNovoOutcome;
use crate::priors::eval::location::Location;
use crate::priors::eval::rescue::{RescueInputs, RescueOutcome};
use crate::priors::eval::result::{
    DeNovoReport, Determination, LocationReport, PriorsRecord, ProteinReport, SiteScores,
};
use crate::priors::eval::scoring::{MotifScorer, ScorePair, Scoring};
use crate::priors::eval::sequence::ref_alt_window;

/// Evaluator for prior probabilities of pathogenicity.
pub struct Evaluator {
    /// Static configuration tables.
    config: SpliceConfig,
    /// Which curation source supplies the CI domain boundaries.
    boundary_source: BoundarySource,
    /// Transcript models, one per supported gene.
    transcripts: rustc_hash::FxHashMap<Gene, Transcript>,
    /// Reference sequence provider.
    sequences: Box<dyn SequenceRepo + Send + Sync>,
    /// Splice motif scorer.
    scorer: Box<dyn MotifScorer + Send + Sync>,
    /// Curated protein-impact priors.
    protein_priors: Box<dyn ProteinPriorRepo + Send + Sync>,
}

impl Evaluator {
    /// Construct the `Evaluator` from its collaborators.
    pub fn new(
        config: SpliceConfig,
        boundary_source: BoundarySource,
        transcripts: Vec<Transcript>,
        sequences: Box<dyn SequenceRepo + Send + Sync>,
        scorer: Box<dyn MotifScorer + Send + Sync>,
        protein_priors: Box<dyn ProteinPriorRepo + Send + Sync>,
    ) -> Self {
        Self {
            config,
            boundary_source,
            transcripts: transcripts.into_iter().map(|tx| (tx.gene, tx)).collect(),
            sequences,
            scorer,
            protein_priors,
        }
    }

    /// Return the transcript model for `gene`.
    ///
    /// # Errors
    ///
    /// A missing transcript is a configuration error and returns a
    /// generic `anyhow::Error`.
    fn transcript(&self, gene: Gene) -> Result<&Transcript, anyhow::Error> {
        self.transcripts
            .get(&gene)
            .ok_or_else(|| anyhow::anyhow!("no transcript model loaded for {}", gene))
    }

    /// Perform the evaluation of one variant.
    ///
    /// Every call yields a record with the full key set; sections whose
    /// pathway was not exercised keep the `"N/A"` sentinel.  Unusable
    /// input (wrong chromosome, malformed alleles) is reported in the
    /// record rather than as an error.
    ///
    /// # Arguments
    ///
    /// * `variant` - Variant to be evaluated.
    ///
    /// # Returns
    ///
    /// The diagnostic record for the variant.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn evaluate(&self, variant: &Variant) -> Result<PriorsRecord, anyhow::Error> {
        let var_type = variant.var_type();
        let mut record = PriorsRecord::skeleton(
            variant.gene,
            &variant.chrom,
            variant.position,
            &variant.reference,
            &variant.alternate,
            &variant.hgvs_cdna,
            var_type,
            self.boundary_source,
        );

        if !variant.chrom_matches_gene() || var_type == VariantType::Other {
            tracing::debug!("cannot place variant {:?}; reporting undetermined", variant);
            record.determination = Determination::UnableToDetermine;
            return Ok(record);
        }
        let tx = self.transcript(variant.gene)?;

        if var_type != VariantType::Substitution {
            let (lo, hi) = variant.span();
            record.location = LocationReport::Ranged(location::locate_structural(
                tx,
                &self.config,
                self.boundary_source,
                lo,
                hi,
            ));
            return Ok(record);
        }

        let loc = location::locate_sns(tx, &self.config, self.boundary_source, variant.position);
        tracing::debug!("variant {:?} located as {}", variant, loc);
        record.location = LocationReport::Single(loc);
        match loc {
            Location::OutsideTranscriptBoundaries => {
                outside::Evaluator::with_parent(self).evaluate(variant, tx, &mut record)?
            }
            Location::CiSpliceDonor | Location::SpliceDonor => {
                donor::Evaluator::with_parent(self).evaluate(variant, tx, &mut record)?
            }
            Location::CiSpliceAcceptor | Location::SpliceAcceptor => {
                acceptor::Evaluator::with_parent(self).evaluate(variant, tx, &mut record)?
            }
            Location::CiDomain | Location::Exon => {
                exonic::Evaluator::with_parent(self).evaluate(variant, tx, &mut record)?
            }
            Location::GreyZone => {
                grey_zone::Evaluator::with_parent(self).evaluate(variant, tx, &mut record, false)?
            }
            Location::AfterGreyZone => {
                grey_zone::Evaluator::with_parent(self).evaluate(variant, tx, &mut record, true)?
            }
            Location::Utr => utr::Evaluator::with_parent(self).evaluate(variant, tx, &mut record)?,
            Location::Intron => {
                intron::Evaluator::with_parent(self).evaluate(variant, tx, &mut record)?
            }
        }
        Ok(record)
    }

    /// Score the reference splice window the variant falls in and run the
    /// reference-site decision table.
    ///
    /// # Errors
    ///
    /// Fails when the variant is not actually inside a reference window
    /// of the given type, or on sequence/scorer failures.
    pub(crate) fn reference_site(
        &self,
        variant: &Variant,
        tx: &Transcript,
        site: SiteType,
    ) -> Result<SiteScores, anyhow::Error> {
        let (exon, window) = boundaries::splice_region_containing(
            tx,
            &self.config.windows,
            variant.position,
            site,
        )
        .ok_or_else(|| {
            anyhow::anyhow!(
                "position {} is not in a reference {} window",
                variant.position,
                site
            )
        })?;
        let seqs = ref_alt_window(self.sequences.as_ref(), variant, &window)?;
        let scoring = Scoring::new(self.scorer.as_ref(), &self.config.zscores);
        let ref_scores = scoring.score(site, &seqs.ref_seq)?;
        let alt_scores = scoring.score(site, &seqs.alt_seq)?;
        let prior = self.reference_site_prior(site, ref_scores, alt_scores);
        Ok(SiteScores::from_scores(
            &exon.label,
            &seqs,
            ref_scores,
            alt_scores,
            prior,
        ))
    }

    /// Reference-site decision table.
    ///
    /// A variant that does not lower the raw motif strength is benign at
    /// this site.  Otherwise an already-weak site losing a further
    /// sizable margin is strong evidence; a site that stays above the
    /// improved/neutral cutoff remains weak evidence, everything in
    /// between is moderate.
    fn reference_site_prior(
        &self,
        site: SiteType,
        ref_scores: ScorePair,
        alt_scores: ScorePair,
    ) -> Prior {
        let thresholds = &self.config.thresholds;
        if alt_scores.mes >= ref_scores.mes {
            Prior::Low
        } else if ref_scores.z < thresholds.ref_z_weak(site)
            && (ref_scores.z - alt_scores.z) > thresholds.z_drop_high
        {
            Prior::High
        } else if alt_scores.z > thresholds.alt_z_improved(site) {
            Prior::Low
        } else {
            Prior::Moderate
        }
    }

    /// Run the de novo search for one site type and shape its record
    /// section; the raw outcome is also returned for the rescue
    /// assessment.
    ///
    /// # Errors
    ///
    /// Propagates sequence/scorer failures.
    pub(crate) fn de_novo_report(
        &self,
        variant: &Variant,
        tx: &Transcript,
        site: SiteType,
    ) -> Result<(DeNovoReport, Option<DeNovoOutcome>), anyhow::Error> {
        let outcome = denovo::assess(
            tx,
            &self.config,
            self.sequences.as_ref(),
            self.scorer.as_ref(),
            variant,
            site,
        )?;
        let report = outcome
            .as_ref()
            .map(DeNovoReport::from)
            .unwrap_or_default();
        Ok((report, outcome))
    }

    /// Look up the curated protein-level prior for the variant.
    pub(crate) fn protein_report(&self, variant: &Variant) -> ProteinReport {
        match self.protein_priors.lookup(&variant.hgvs_cdna) {
            Some(impact) => ProteinReport {
                consequence: impact.consequence,
                prior: impact.prior,
            },
            None => ProteinReport::default(),
        }
    }

    /// Run the splice rescue assessment for a premature stop variant.
    ///
    /// The rescue benchmark is the de novo donor candidate; without one
    /// (the variant anchors on the final exon) rescue is impossible.
    pub(crate) fn rescue_for_nonsense(
        &self,
        variant: &Variant,
        tx: &Transcript,
        donor_outcome: Option<&DeNovoOutcome>,
    ) -> RescueOutcome {
        let in_last_exon = tx
            .exon_containing(variant.position)
            .map(|exon| exon.label == tx.last_exon().label)
            .unwrap_or(false);
        let inputs = match donor_outcome {
            Some(outcome) => RescueInputs {
                in_last_exon,
                in_exonic_portion: outcome.scan.in_exonic_portion,
                exon_length: outcome.frame.ref_exon_length,
                ci_domain_in_region: rescue::ci_domain_in_region(
                    &self.config,
                    variant.gene,
                    outcome.frame.new_splice_position,
                    outcome.frame.wild_type_position,
                ),
                distance_divisible: outcome.frame.distance_divisible,
                alt_greater_ref: outcome.alt_greater_closest_ref,
                alt_z: outcome.scan.alt_scores.z,
                capped_exon: self
                    .config
                    .is_capped_exon(variant.gene, &outcome.exon_label),
            },
            None => RescueInputs {
                in_last_exon: true,
                in_exonic_portion: false,
                exon_length: 0,
                ci_domain_in_region: false,
                distance_divisible: false,
                alt_greater_ref: false,
                alt_z: 0.0,
                capped_exon: false,
            },
        };
        rescue::evaluate(&self.config.thresholds, &inputs)
    }

    /// Resolve precedence over the contributed priors and fill the
    /// applicable prior/class.
    ///
    /// A granted splice rescue overrides everything: the variant is
    /// handed to a non-prior pathway and the applicable fields stay at
    /// the sentinel.  Otherwise the highest contributed tier wins, with
    /// `region_floor` as the region's default contribution.
    pub(crate) fn finish(&self, record: &mut PriorsRecord, region_floor: Prior) {
        if record.rescue.splice_rescue.is_true() {
            record.applicable_prior = Prior::NotApplicable;
            record.applicable_class = record.applicable_prior.enigma_class();
            return;
        }
        let applicable = [
            record.rescue.prior,
            record.ref_donor.prior,
            record.ref_acceptor.prior,
            record.de_novo_donor.prior,
            record.de_novo_acceptor.prior,
            record.protein.prior,
            region_floor,
        ]
        .into_iter()
        .max()
        .unwrap_or_default();
        record.applicable_prior = applicable;
        record.applicable_class = applicable.enigma_class();
    }
}
