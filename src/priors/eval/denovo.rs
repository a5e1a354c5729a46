//! De novo splice site search.
//!
//! The search slides the scoring window across the sequence flanking the
//! variant, scores every offset under both reference and alternate
//! sequence, and keeps the offset with the strongest alternate score.
//! The candidate is then judged against the nearest natural site of the
//! same type (by exon adjacency) and against the frame analysis to pick
//! a de novo prior tier.

use crate::priors::data::config::{DecisionThresholds, SpliceConfig, TxWindow, WindowConfig};
use crate::priors::data::repo::SequenceRepo;
use crate::priors::data::transcript::{Exon, Transcript};
use crate::priors::ds::{Prior, SiteType, Strand, Variant};
use crate::priors::eval::boundaries;
use crate::priors::eval::frame::{self, FrameAnalysis};
use crate::priors::eval::scoring::{MotifScorer, ScorePair, Scoring};
use crate::priors::eval::sequence::{ref_alt_window, PosMap};

/// Winning offset of the sliding-window scan.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SlidingWindowResult {
    /// Reference scores at the winning offset.
    pub ref_scores: ScorePair,
    /// Alternate scores at the winning offset.
    pub alt_scores: ScorePair,
    /// 1-based position of the first variant base covered by the winning
    /// window.  For multi-base variants whose 5' base lies upstream of the
    /// window this is 1, the first window position the variant reaches.
    pub window_pos: i64,
    /// Whether the winning window places the variant in its exonic
    /// portion (donor positions 1-3, acceptor positions 21-23).
    pub in_exonic_portion: bool,
    /// Window sequences at the winning offset.
    pub ref_window: String,
    pub alt_window: String,
}

/// Scores of the nearest natural splice site of the searched type.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ClosestSite {
    /// Exon anchoring the natural site.
    pub exon_label: String,
    /// The natural site's reference window.
    pub window: TxWindow,
    pub ref_scores: ScorePair,
    pub alt_scores: ScorePair,
}

/// Full de novo assessment for one site type.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DeNovoOutcome {
    pub site: SiteType,
    /// Context exon the candidate is anchored on.
    pub exon_label: String,
    pub scan: SlidingWindowResult,
    pub closest: ClosestSite,
    pub frame: FrameAnalysis,
    /// Alternate beats reference at the winning offset (raw scores).
    pub alt_greater_ref: bool,
    /// Alternate z beats the natural site's reference z.
    pub alt_greater_closest_ref: bool,
    /// Alternate z beats the natural site's alternate z.
    pub alt_greater_closest_alt: bool,
    /// De novo prior tier; the sentinel when no candidate qualifies.
    pub prior: Prior,
}

/// Slide the scoring window over precomputed reference/alternate spans.
///
/// The spans must be `2 * window + var_len - 2` bases in transcription
/// orientation with the variant's 5' base at span position `window`
/// (1-based); this yields `window + var_len - 1` offsets, every window
/// that touches the variant.  Ties keep the earliest offset.
///
/// # Errors
///
/// Fails on span/window length mismatches or scorer failures.
pub fn scan_windows(
    scoring: &Scoring,
    site: SiteType,
    windows: &WindowConfig,
    ref_span: &str,
    alt_span: &str,
    var_len: usize,
) -> Result<SlidingWindowResult, anyhow::Error> {
    let w = windows.window_size(site) as usize;
    let expected = 2 * w + var_len - 2;
    if ref_span.len() != expected || alt_span.len() != expected {
        anyhow::bail!(
            "sliding-window spans must have {} bases, got {} (ref) and {} (alt)",
            expected,
            ref_span.len(),
            alt_span.len()
        );
    }

    let mut best: Option<(usize, ScorePair, ScorePair)> = None;
    for offset in 0..(w + var_len - 1) {
        let ref_window = &ref_span[offset..offset + w];
        let alt_window = &alt_span[offset..offset + w];
        let ref_scores = scoring.score(site, ref_window)?;
        let alt_scores = scoring.score(site, alt_window)?;
        let better = match &best {
            Some((_, _, best_alt)) => alt_scores.mes > best_alt.mes,
            None => true,
        };
        if better {
            best = Some((offset, ref_scores, alt_scores));
        }
    }
    let (offset, ref_scores, alt_scores) =
        best.ok_or_else(|| anyhow::anyhow!("sliding-window scan produced no offsets"))?;

    // Offsets past `w - 1` (reachable for multi-base variants only) start
    // the window downstream of the variant's 5' base; the first variant
    // base the window covers is then position 1.
    let window_pos = (w as i64 - offset as i64).max(1);
    let in_exonic_portion = match site {
        SiteType::Donor => window_pos <= windows.exonic_portion,
        SiteType::Acceptor => window_pos > windows.acceptor_intronic,
    };
    Ok(SlidingWindowResult {
        ref_scores,
        alt_scores,
        window_pos,
        in_exonic_portion,
        ref_window: ref_span[offset..offset + w].to_string(),
        alt_window: alt_span[offset..offset + w].to_string(),
    })
}

/// Score the reference window of the natural site anchored on `exon`
/// under both alleles.
///
/// # Errors
///
/// Propagates sequence retrieval and scorer failures.
pub fn closest_natural_site(
    tx: &Transcript,
    cfg: &SpliceConfig,
    repo: &dyn SequenceRepo,
    scorer: &dyn MotifScorer,
    variant: &Variant,
    exon: &Exon,
    site: SiteType,
) -> Result<ClosestSite, anyhow::Error> {
    let window = match site {
        SiteType::Donor => boundaries::ref_donor_window(tx, &cfg.windows, exon),
        SiteType::Acceptor => boundaries::ref_acceptor_window(tx, &cfg.windows, exon),
    };
    let seqs = ref_alt_window(repo, variant, &window)?;
    let scoring = Scoring::new(scorer, &cfg.zscores);
    Ok(ClosestSite {
        exon_label: exon.label.clone(),
        window,
        ref_scores: scoring.score(site, &seqs.ref_seq)?,
        alt_scores: scoring.score(site, &seqs.alt_seq)?,
    })
}

/// Context exon of a de novo candidate at `pos`: the enclosing exon for
/// exonic positions, otherwise the exon anchoring the de novo detection
/// window that covers `pos`.
fn context_exon<'a>(
    tx: &'a Transcript,
    windows: &WindowConfig,
    pos: i64,
    site: SiteType,
) -> Option<&'a Exon> {
    if let Some(exon) = tx.exon_containing(pos) {
        return Some(exon);
    }
    boundaries::de_novo_region_containing(tx, windows, pos, site).map(|(exon, _)| exon)
}

/// De novo prior tier from the candidate's flags.
///
/// Base tier from the alternate z-score; one step up when the candidate
/// beats the natural site's reference score, one step down when the
/// predicted event preserves frame.
pub(crate) fn de_novo_prior(
    thresholds: &DecisionThresholds,
    alt_greater_ref: bool,
    alt_greater_closest_ref: bool,
    frameshift: bool,
    alt_z: f64,
) -> Prior {
    if !alt_greater_ref {
        return Prior::NotApplicable;
    }
    let mut prior = if alt_z < thresholds.de_novo_low_ceiling {
        Prior::DeNovoLow
    } else if alt_z < thresholds.de_novo_high_floor {
        Prior::DeNovoModerate
    } else {
        Prior::DeNovoHigh
    };
    if alt_greater_closest_ref {
        prior = match prior {
            Prior::DeNovoLow => Prior::DeNovoModerate,
            Prior::DeNovoModerate => Prior::DeNovoHigh,
            other => other,
        };
    }
    if !frameshift {
        prior = match prior {
            Prior::DeNovoHigh => Prior::DeNovoModerate,
            Prior::DeNovoModerate => Prior::DeNovoLow,
            other => other,
        };
    }
    prior
}

/// Run the full de novo assessment for one site type.
///
/// Returns `None` when the variant is ineligible: anchored on the
/// terminal exon (donor) or initial exon (acceptor), outside both the
/// exon and the de novo detection window, or not length-preserving.
///
/// # Errors
///
/// Propagates sequence retrieval and scorer failures.
pub fn assess(
    tx: &Transcript,
    cfg: &SpliceConfig,
    repo: &dyn SequenceRepo,
    scorer: &dyn MotifScorer,
    variant: &Variant,
    site: SiteType,
) -> Result<Option<DeNovoOutcome>, anyhow::Error> {
    if variant.reference.len() != variant.alternate.len() {
        return Ok(None);
    }
    let strand = tx.strand;
    let (vlo, vhi) = variant.span();
    let pos5 = match strand {
        Strand::Plus => vlo,
        Strand::Minus => vhi,
    };

    let exon = match context_exon(tx, &cfg.windows, pos5, site) {
        Some(exon) => exon,
        None => return Ok(None),
    };
    let ineligible = match site {
        SiteType::Donor => exon.label == tx.last_exon().label,
        SiteType::Acceptor => exon.label == tx.first_exon().label,
    };
    if ineligible {
        return Ok(None);
    }

    let var_len = variant.reference.len();
    let w = cfg.windows.window_size(site);
    let span_start = strand.offset(pos5, -(w - 1));
    let span = TxWindow {
        start: span_start,
        end: strand.offset(span_start, 2 * w + var_len as i64 - 3),
    };
    let (lo, hi) = span.genomic();
    let mut map = PosMap::fetch(repo, &variant.chrom, strand, lo, hi)?;
    let ref_span = map.assemble();
    map.apply(variant)?;
    let alt_span = map.assemble();

    let scoring = Scoring::new(scorer, &cfg.zscores);
    let scan = scan_windows(&scoring, site, &cfg.windows, &ref_span, &alt_span, var_len)?;
    let closest = closest_natural_site(tx, cfg, repo, scorer, variant, exon, site)?;
    let frame = frame::analyze(strand, &cfg.windows, site, exon, pos5, scan.window_pos);

    let alt_greater_ref = scan.alt_scores.mes > scan.ref_scores.mes;
    let alt_greater_closest_ref = scan.alt_scores.z > closest.ref_scores.z;
    let alt_greater_closest_alt = scan.alt_scores.z > closest.alt_scores.z;
    let prior = de_novo_prior(
        &cfg.thresholds,
        alt_greater_ref,
        alt_greater_closest_ref,
        frame.frameshift,
        scan.alt_scores.z,
    );

    Ok(Some(DeNovoOutcome {
        site,
        exon_label: exon.label.clone(),
        scan,
        closest,
        frame,
        alt_greater_ref,
        alt_greater_closest_ref,
        alt_greater_closest_alt,
        prior,
    }))
}
