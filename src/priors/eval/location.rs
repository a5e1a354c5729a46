//! Variant location against the transcript region model.
//!
//! Single-position substitutions get exactly one region tag via a strict
//! priority order; ranged variants get the ordered set of all regions their
//! span touches, with out-of-bounds and grey-zone spans short-circuiting.

use crate::priors::data::config::SpliceConfig;
use crate::priors::data::transcript::Transcript;
use crate::priors::ds::{BoundarySource, SiteType};
use crate::priors::eval::boundaries;

/// Primary region tag of a single-position variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Location {
    OutsideTranscriptBoundaries,
    CiSpliceDonor,
    CiSpliceAcceptor,
    CiDomain,
    SpliceDonor,
    SpliceAcceptor,
    GreyZone,
    AfterGreyZone,
    Utr,
    Exon,
    Intron,
}

impl Location {
    /// The reference splice site type the location sits in, if any.
    pub fn site_type(self) -> Option<SiteType> {
        match self {
            Location::CiSpliceDonor | Location::SpliceDonor => Some(SiteType::Donor),
            Location::CiSpliceAcceptor | Location::SpliceAcceptor => Some(SiteType::Acceptor),
            _ => None,
        }
    }
}

/// Region tags a ranged variant can carry, in canonical report order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RegionTag {
    CiDomain,
    SpliceDonor,
    SpliceAcceptor,
    Exon,
    Utr,
    Intron,
}

/// Location result for a ranged (multi-base) variant.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralLocation {
    /// The whole span lies outside the transcript bounds.
    OutsideTranscriptBoundaries,
    /// The span touches the grey zone; no other tag applies.
    GreyZone,
    /// All region tags touched by the span, in canonical order.
    Regions(Vec<RegionTag>),
}

/// Whether `pos` lies in a clinically important domain window of the
/// gene under the given boundary source.
pub fn in_ci_domain(
    tx: &Transcript,
    cfg: &SpliceConfig,
    source: BoundarySource,
    pos: i64,
) -> bool {
    cfg.ci_domains(tx.gene, source)
        .iter()
        .any(|d| d.window.contains(tx.strand, pos))
}

/// Locate a single-position variant.
///
/// Priority order: outside transcript; then, for exonic positions, CI
/// domain combined with a reference splice window, plain CI domain,
/// donor, acceptor, grey zone, after grey zone, UTR, exon body; for
/// non-exonic positions, donor, acceptor, UTR, intron.
pub fn locate_sns(
    tx: &Transcript,
    cfg: &SpliceConfig,
    source: BoundarySource,
    pos: i64,
) -> Location {
    if !tx.in_tx(pos) {
        return Location::OutsideTranscriptBoundaries;
    }
    let in_donor =
        boundaries::splice_region_containing(tx, &cfg.windows, pos, SiteType::Donor).is_some();
    let in_acceptor =
        boundaries::splice_region_containing(tx, &cfg.windows, pos, SiteType::Acceptor).is_some();

    if tx.exon_containing(pos).is_some() {
        let in_ci = in_ci_domain(tx, cfg, source, pos);
        if in_ci && in_donor {
            Location::CiSpliceDonor
        } else if in_ci && in_acceptor {
            Location::CiSpliceAcceptor
        } else if in_ci {
            Location::CiDomain
        } else if in_donor {
            Location::SpliceDonor
        } else if in_acceptor {
            Location::SpliceAcceptor
        } else if boundaries::in_grey_zone(cfg, tx.gene, tx.strand, pos) {
            Location::GreyZone
        } else if boundaries::after_grey_zone(tx, cfg, pos) {
            Location::AfterGreyZone
        } else if tx.in_utr(pos) {
            Location::Utr
        } else {
            Location::Exon
        }
    } else if in_donor {
        Location::SpliceDonor
    } else if in_acceptor {
        Location::SpliceAcceptor
    } else if tx.in_utr(pos) {
        Location::Utr
    } else {
        Location::Intron
    }
}

/// Intersection of two ascending inclusive ranges.
fn intersect(a: (i64, i64), b: (i64, i64)) -> Option<(i64, i64)> {
    let lo = a.0.max(b.0);
    let hi = a.1.min(b.1);
    (lo <= hi).then_some((lo, hi))
}

fn range_overlaps(range: Option<(i64, i64)>, lo: i64, hi: i64) -> bool {
    range
        .map(|(rlo, rhi)| lo <= rhi && hi >= rlo)
        .unwrap_or(false)
}

/// UTR extents of the transcript as ascending genomic ranges (intronic
/// UTR positions included).
fn utr_ranges(tx: &Transcript) -> Vec<(i64, i64)> {
    let strand = tx.strand;
    let mut ranges = Vec::new();
    if strand.distance(tx.tx.start, tx.cds.start) > 0 {
        let a = tx.tx.start;
        let b = strand.offset(tx.cds.start, -1);
        ranges.push((a.min(b), a.max(b)));
    }
    if strand.distance(tx.cds.end, tx.tx.end) > 0 {
        let a = strand.offset(tx.cds.end, 1);
        let b = tx.tx.end;
        ranges.push((a.min(b), a.max(b)));
    }
    ranges
}

/// Locate a ranged variant covering the ascending genomic span `lo..=hi`.
///
/// Region predicates are evaluated independently over the whole span; a
/// span touching a reference splice window is classified by the splice
/// tag alone, the domain tag is reserved for spans confined to the exon
/// body.  Intron tags cover only coding intron sequence beyond the
/// splice windows.
pub fn locate_structural(
    tx: &Transcript,
    cfg: &SpliceConfig,
    source: BoundarySource,
    lo: i64,
    hi: i64,
) -> StructuralLocation {
    if !tx.tx.overlaps(lo, hi) {
        return StructuralLocation::OutsideTranscriptBoundaries;
    }
    if let Some(zone) = cfg.grey_zone(tx.gene) {
        if zone.overlaps(lo, hi) {
            return StructuralLocation::GreyZone;
        }
    }

    let windows = &cfg.windows;
    let in_donor = boundaries::ref_windows(tx, windows, SiteType::Donor)
        .iter()
        .any(|(_, w)| w.overlaps(lo, hi));
    let in_acceptor = boundaries::ref_windows(tx, windows, SiteType::Acceptor)
        .iter()
        .any(|(_, w)| w.overlaps(lo, hi));

    let cds = tx.cds.genomic();
    let mut tags = Vec::new();

    if !in_donor && !in_acceptor {
        let in_ci = cfg.ci_domains(tx.gene, source).iter().any(|d| {
            tx.exons.iter().any(|e| {
                range_overlaps(intersect(d.window.genomic(), e.window().genomic()), lo, hi)
            })
        });
        if in_ci {
            tags.push(RegionTag::CiDomain);
        }
    }
    if in_donor {
        tags.push(RegionTag::SpliceDonor);
    }
    if in_acceptor {
        tags.push(RegionTag::SpliceAcceptor);
    }
    if tx
        .exons
        .iter()
        .any(|e| range_overlaps(intersect(e.window().genomic(), cds), lo, hi))
    {
        tags.push(RegionTag::Exon);
    }
    if utr_ranges(tx)
        .into_iter()
        .any(|range| range_overlaps(Some(range), lo, hi))
    {
        tags.push(RegionTag::Utr);
    }
    // Coding intron sequence beyond the donor/acceptor windows.
    let strand = tx.strand;
    let intron_middle = tx.exons.windows(2).any(|pair| {
        let start = strand.offset(pair[0].end, windows.donor_intronic + 1);
        let end = strand.offset(pair[1].start, -(windows.acceptor_intronic + 1));
        if strand.distance(start, end) < 0 {
            return false;
        }
        let range = (start.min(end), start.max(end));
        range_overlaps(intersect(range, cds), lo, hi)
    });
    if intron_middle {
        tags.push(RegionTag::Intron);
    }

    StructuralLocation::Regions(tags)
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;
    use crate::priors::eval::fixtures::{brca1_tx, brca2_tx};

    #[rstest]
    #[case(32315000, Location::OutsideTranscriptBoundaries)] // before tx start
    #[case(32315500, Location::Utr)] // 5' UTR exon
    #[case(32316000, Location::Utr)] // 5' UTR intron
    #[case(32325130, Location::Exon)] // coding exon body
    #[case(32320000, Location::Intron)]
    #[case(32325183, Location::SpliceDonor)] // exonic half of exon4 donor
    #[case(32325185, Location::SpliceDonor)] // intronic half
    #[case(32325077, Location::SpliceAcceptor)] // exonic half of exon4 acceptor
    #[case(32325075, Location::SpliceAcceptor)] // intronic half
    #[case(32356500, Location::CiDomain)] // dnb domain, exon6 body
    #[case(32356608, Location::CiSpliceDonor)] // dnb domain, exon6 donor window
    #[case(32396899, Location::CiSpliceAcceptor)] // dnb domain, exon7 acceptor window
    #[case(32398450, Location::GreyZone)]
    #[case(32398600, Location::AfterGreyZone)]
    #[case(32398800, Location::Utr)] // 3' UTR, past the last coding base
    fn sns_location_brca2(#[case] pos: i64, #[case] expected: Location) {
        let tx = brca2_tx();
        let cfg = SpliceConfig::default();
        assert_eq!(
            locate_sns(&tx, &cfg, BoundarySource::Enigma, pos),
            expected,
            "position {}",
            pos
        );
    }

    #[rstest]
    #[case(43124018, Location::CiSpliceDonor)] // ring domain, exon2 donor window
    #[case(43124050, Location::CiDomain)] // ring domain, exon2 body
    #[case(43097250, Location::Exon)] // exon7 body, outside both domains
    #[case(43100000, Location::Intron)]
    #[case(43125480, Location::Utr)] // 5' UTR on the minus strand
    #[case(43126000, Location::OutsideTranscriptBoundaries)]
    fn sns_location_brca1(#[case] pos: i64, #[case] expected: Location) {
        let tx = brca1_tx();
        let cfg = SpliceConfig::default();
        assert_eq!(
            locate_sns(&tx, &cfg, BoundarySource::Enigma, pos),
            expected,
            "position {}",
            pos
        );
    }

    #[test]
    fn sns_location_depends_on_boundary_source() {
        let tx = brca2_tx();
        let cfg = SpliceConfig::default();
        // The palb2 interaction region is curated only in the priors set.
        let pos = 32316500;
        assert_eq!(
            locate_sns(&tx, &cfg, BoundarySource::Enigma, pos),
            Location::Exon
        );
        assert_eq!(
            locate_sns(&tx, &cfg, BoundarySource::Priors, pos),
            Location::CiDomain
        );
    }

    #[test]
    fn donor_boundary_deletion_is_tagged_splice_donor_and_exon() {
        // Deletion of the last 2 exonic and first 4 intronic bases of the
        // exon2 donor site on the minus strand.
        let tx = brca1_tx();
        let cfg = SpliceConfig::default();
        let result = locate_structural(&tx, &cfg, BoundarySource::Enigma, 43124013, 43124018);
        assert_eq!(
            result,
            StructuralLocation::Regions(vec![RegionTag::SpliceDonor, RegionTag::Exon])
        );
    }

    #[test]
    fn span_inside_one_region_yields_singleton() {
        let tx = brca2_tx();
        let cfg = SpliceConfig::default();
        assert_eq!(
            locate_structural(&tx, &cfg, BoundarySource::Enigma, 32325100, 32325110),
            StructuralLocation::Regions(vec![RegionTag::Exon])
        );
        assert_eq!(
            locate_structural(&tx, &cfg, BoundarySource::Enigma, 32320000, 32320050),
            StructuralLocation::Regions(vec![RegionTag::Intron])
        );
        assert_eq!(
            locate_structural(&tx, &cfg, BoundarySource::Enigma, 32315500, 32315520),
            StructuralLocation::Regions(vec![RegionTag::Utr])
        );
    }

    #[test]
    fn span_crossing_regions_collects_tags_in_canonical_order() {
        let tx = brca2_tx();
        let cfg = SpliceConfig::default();
        // From deep intron 3 across the acceptor window into exon 4.
        assert_eq!(
            locate_structural(&tx, &cfg, BoundarySource::Enigma, 32325050, 32325100),
            StructuralLocation::Regions(vec![
                RegionTag::SpliceAcceptor,
                RegionTag::Exon,
                RegionTag::Intron
            ])
        );
        // From the 5' UTR exon into the coding part of exon 2.
        assert_eq!(
            locate_structural(&tx, &cfg, BoundarySource::Enigma, 32316440, 32316470),
            StructuralLocation::Regions(vec![RegionTag::Exon, RegionTag::Utr])
        );
    }

    #[test]
    fn structural_short_circuits() {
        let tx = brca2_tx();
        let cfg = SpliceConfig::default();
        assert_eq!(
            locate_structural(&tx, &cfg, BoundarySource::Enigma, 32315000, 32315100),
            StructuralLocation::OutsideTranscriptBoundaries
        );
        assert_eq!(
            locate_structural(&tx, &cfg, BoundarySource::Enigma, 32398480, 32398500),
            StructuralLocation::GreyZone
        );
    }

    #[test]
    fn domain_tag_suppressed_inside_splice_windows() {
        let tx = brca2_tx();
        let cfg = SpliceConfig::default();
        // Span over the exon6 donor boundary, inside the dnb domain.
        let result = locate_structural(&tx, &cfg, BoundarySource::Enigma, 32356607, 32356611);
        assert_eq!(
            result,
            StructuralLocation::Regions(vec![RegionTag::SpliceDonor, RegionTag::Exon])
        );
        // Same exon, clear of the windows: the domain tag applies.
        let result = locate_structural(&tx, &cfg, BoundarySource::Enigma, 32356500, 32356510);
        assert_eq!(
            result,
            StructuralLocation::Regions(vec![RegionTag::CiDomain, RegionTag::Exon])
        );
    }
}
