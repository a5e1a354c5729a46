//! Splice rescue assessment for premature stop variants.
//!
//! A nonsense variant defaults to the pathogenic tier unless splicing can
//! remove the affected region while preserving frame and every clinically
//! important domain.  The branches run in a fixed order; every branch
//! fills the complete flag set, with the sentinel on flags whose branch
//! was never reached.

use crate::priors::data::config::{DecisionThresholds, SpliceConfig};
use crate::priors::ds::{BoundarySource, Flag, Gene, Prior};

/// Facts the rescue decision runs on, computed upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescueInputs {
    /// The variant sits in the transcript's final exon.
    pub in_last_exon: bool,
    /// The maximal de novo donor window places the variant in its exonic
    /// portion.
    pub in_exonic_portion: bool,
    /// Length of the affected exon (skipping it shifts frame unless this
    /// is a multiple of three).
    pub exon_length: i64,
    /// The region lost under the predicted splice overlaps a clinically
    /// important domain (either curation source).
    pub ci_domain_in_region: bool,
    /// De-novo-to-wild-type splice distance is a multiple of three.
    pub distance_divisible: bool,
    /// The candidate motif beats the natural site's reference score.
    pub alt_greater_ref: bool,
    /// Candidate motif z-score.
    pub alt_z: f64,
    /// The affected exon is on the empirically capped list.
    pub capped_exon: bool,
}

/// Result of the rescue assessment: the prior it forces plus the full
/// audit flag set.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct RescueOutcome {
    /// Pathogenic or capped when rescue fails; the sentinel when rescue
    /// is granted and a non-prior pathway must take over.
    pub prior: Prior,
    /// Rescue granted.
    pub splice_rescue: Flag,
    /// The variant needs splicing-level assessment downstream.
    pub splice_flag: Flag,
    pub frameshift: Flag,
    pub in_exonic_portion: Flag,
    pub ci_domain_in_region: Flag,
    pub divisible_by_three: Flag,
    pub low_mes: Flag,
}

impl RescueOutcome {
    fn no_rescue(prior: Prior) -> Self {
        Self {
            prior,
            splice_rescue: Flag::False,
            splice_flag: Flag::False,
            frameshift: Flag::NotApplicable,
            in_exonic_portion: Flag::NotApplicable,
            ci_domain_in_region: Flag::NotApplicable,
            divisible_by_three: Flag::NotApplicable,
            low_mes: Flag::NotApplicable,
        }
    }
}

/// Whether the region between the predicted and wild-type splice
/// positions overlaps a clinically important domain under either
/// curation source.
pub fn ci_domain_in_region(cfg: &SpliceConfig, gene: Gene, new_pos: i64, wt_pos: i64) -> bool {
    let (lo, hi) = (new_pos.min(wt_pos), new_pos.max(wt_pos));
    [BoundarySource::Enigma, BoundarySource::Priors]
        .into_iter()
        .any(|source| {
            cfg.ci_domains(gene, source)
                .iter()
                .any(|d| d.window.overlaps(lo, hi))
        })
}

/// Run the rescue decision.
pub fn evaluate(thresholds: &DecisionThresholds, inputs: &RescueInputs) -> RescueOutcome {
    // 1. No donor downstream of the final exon: nothing to rescue with.
    if inputs.in_last_exon {
        return RescueOutcome::no_rescue(Prior::Pathogenic);
    }
    // 2. Variant inside the exonic portion of the winning donor window:
    //    the splicing consequence is ambiguous, treated as pathogenic.
    if inputs.in_exonic_portion {
        return RescueOutcome {
            in_exonic_portion: Flag::True,
            ..RescueOutcome::no_rescue(Prior::Pathogenic)
        };
    }
    // 3. Skipping the exon must preserve frame.
    if inputs.exon_length % 3 != 0 {
        return RescueOutcome {
            frameshift: Flag::True,
            in_exonic_portion: Flag::False,
            ..RescueOutcome::no_rescue(Prior::Pathogenic)
        };
    }
    // 4. The rescued transcript must keep every CI domain intact.
    if inputs.ci_domain_in_region {
        return RescueOutcome {
            frameshift: Flag::False,
            in_exonic_portion: Flag::False,
            ci_domain_in_region: Flag::True,
            ..RescueOutcome::no_rescue(Prior::Pathogenic)
        };
    }
    // 5. The splice-position shift itself must be a multiple of three.
    if !inputs.distance_divisible {
        return RescueOutcome {
            frameshift: Flag::False,
            in_exonic_portion: Flag::False,
            ci_domain_in_region: Flag::False,
            divisible_by_three: Flag::False,
            ..RescueOutcome::no_rescue(Prior::Pathogenic)
        };
    }
    // 6. The rescuing motif must be real: stronger than the reference
    //    benchmark and above the functional strength floor.  A short list
    //    of curated exons caps the prior here instead of keeping the
    //    full pathogenic tier.
    if !inputs.alt_greater_ref || inputs.alt_z < thresholds.functional_z_floor {
        let prior = if inputs.capped_exon {
            Prior::Capped
        } else {
            Prior::Pathogenic
        };
        return RescueOutcome {
            frameshift: Flag::False,
            in_exonic_portion: Flag::False,
            ci_domain_in_region: Flag::False,
            divisible_by_three: Flag::True,
            low_mes: Flag::True,
            ..RescueOutcome::no_rescue(prior)
        };
    }
    // 7. Rescue granted: the prior pathway abstains.
    RescueOutcome {
        prior: Prior::NotApplicable,
        splice_rescue: Flag::True,
        splice_flag: Flag::True,
        frameshift: Flag::False,
        in_exonic_portion: Flag::False,
        ci_domain_in_region: Flag::False,
        divisible_by_three: Flag::True,
        low_mes: Flag::False,
    }
}
