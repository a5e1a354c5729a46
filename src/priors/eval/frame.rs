//! Reading-frame and exon-length analysis for predicted splice changes.
//!
//! All functions here are pure arithmetic over explicit inputs.  Positions
//! follow the window convention of the sliding search: donor windows have
//! their last exonic base at window position 3, acceptor windows their
//! first exonic base at window position 21.

use crate::priors::data::config::WindowConfig;
use crate::priors::data::transcript::Exon;
use crate::priors::ds::{SiteType, Strand};

/// Genomic position where splicing would occur if the winning window
/// became the active site: the last exonic base of the new exon for
/// donors, the first exonic base for acceptors.
pub fn new_splice_position(
    strand: Strand,
    windows: &WindowConfig,
    site: SiteType,
    var_pos: i64,
    window_pos: i64,
) -> i64 {
    match site {
        SiteType::Donor => strand.offset(var_pos, windows.exonic_portion - window_pos),
        SiteType::Acceptor => strand.offset(var_pos, windows.acceptor_intronic + 1 - window_pos),
    }
}

/// Where splicing occurs in the reference transcript for the exon's site.
pub fn wild_type_splice_position(site: SiteType, exon: &Exon) -> i64 {
    match site {
        SiteType::Donor => exon.end,
        SiteType::Acceptor => exon.start,
    }
}

/// Exon length under the predicted splice position.
///
/// A de novo donor trims (or extends) the exon's 3' edge; a de novo
/// acceptor moves its 5' edge.  The result can be negative when the
/// predicted cut lies outside the exon on the shrinking side; the frame
/// comparison only depends on the difference, so the raw value is kept.
pub fn alt_exon_length(strand: Strand, site: SiteType, exon: &Exon, new_pos: i64) -> i64 {
    match site {
        SiteType::Donor => strand.distance(exon.start, new_pos) + 1,
        SiteType::Acceptor => strand.distance(new_pos, exon.end) + 1,
    }
}

/// Whether the length change between reference and alternate splicing
/// preserves the reading frame.
pub fn is_in_frame(ref_len: i64, alt_len: i64) -> bool {
    (ref_len - alt_len) % 3 == 0
}

/// Whether the distance between two splice positions is a multiple of
/// three bases.
pub fn distance_divisible_by_three(strand: Strand, from: i64, to: i64) -> bool {
    strand.distance(from, to) % 3 == 0
}

/// Combined frame assessment for one predicted de novo splice position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct FrameAnalysis {
    /// Predicted splice position under the winning window.
    pub new_splice_position: i64,
    /// Splice position of the reference transcript.
    pub wild_type_position: i64,
    /// Exon length under reference splicing.
    pub ref_exon_length: i64,
    /// Exon length under the predicted splice position.
    pub alt_exon_length: i64,
    /// `(ref - alt) % 3 == 0`.
    pub in_frame: bool,
    /// De-novo-to-wild-type distance is a multiple of three.
    pub distance_divisible: bool,
    /// `!(in_frame && distance_divisible)`.
    pub frameshift: bool,
}

/// Run the full frame assessment for a variant at `window_pos` of the
/// winning window anchored on `exon`.
pub fn analyze(
    strand: Strand,
    windows: &WindowConfig,
    site: SiteType,
    exon: &Exon,
    var_pos: i64,
    window_pos: i64,
) -> FrameAnalysis {
    let new_pos = new_splice_position(strand, windows, site, var_pos, window_pos);
    let wt_pos = wild_type_splice_position(site, exon);
    let ref_len = exon.len();
    let alt_len = alt_exon_length(strand, site, exon, new_pos);
    let in_frame = is_in_frame(ref_len, alt_len);
    let distance_divisible = distance_divisible_by_three(strand, new_pos, wt_pos);
    FrameAnalysis {
        new_splice_position: new_pos,
        wild_type_position: wt_pos,
        ref_exon_length: ref_len,
        alt_exon_length: alt_len,
        in_frame,
        distance_divisible,
        frameshift: !(in_frame && distance_divisible),
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;
    use crate::priors::data::config::SpliceConfig;

    fn exon(start: i64, end: i64) -> Exon {
        Exon {
            label: "exon2".into(),
            number: 2,
            start,
            end,
        }
    }

    #[rstest]
    #[case(Strand::Plus, SiteType::Donor, 1495, 3, 1495)] // last exonic window position
    #[case(Strand::Plus, SiteType::Donor, 1495, 1, 1497)]
    #[case(Strand::Plus, SiteType::Donor, 1495, 7, 1491)] // intronic half pulls the cut back
    #[case(Strand::Minus, SiteType::Donor, 1495, 1, 1493)]
    #[case(Strand::Plus, SiteType::Acceptor, 2005, 21, 2005)] // first exonic window position
    #[case(Strand::Plus, SiteType::Acceptor, 2005, 10, 2016)]
    #[case(Strand::Minus, SiteType::Acceptor, 2005, 23, 2007)]
    fn new_splice_position_by_window_offset(
        #[case] strand: Strand,
        #[case] site: SiteType,
        #[case] var_pos: i64,
        #[case] window_pos: i64,
        #[case] expected: i64,
    ) {
        let cfg = SpliceConfig::default().windows;
        assert_eq!(
            new_splice_position(strand, &cfg, site, var_pos, window_pos),
            expected
        );
    }

    #[test]
    fn alt_exon_length_moves_one_edge() {
        let e = exon(1000, 1500);
        assert_eq!(alt_exon_length(Strand::Plus, SiteType::Donor, &e, 1490), 491);
        assert_eq!(alt_exon_length(Strand::Plus, SiteType::Acceptor, &e, 1010), 491);

        let e = exon(1500, 1000);
        assert_eq!(
            alt_exon_length(Strand::Minus, SiteType::Donor, &e, 1010),
            491
        );
        assert_eq!(
            alt_exon_length(Strand::Minus, SiteType::Acceptor, &e, 1490),
            491
        );
    }

    #[rstest]
    #[case(501, 501, true)]
    #[case(501, 498, true)]
    #[case(501, 504, true)]
    #[case(501, 500, false)]
    #[case(501, 499, false)]
    #[case(0, 0, true)]
    fn frame_check_is_symmetric_in_sign(
        #[case] ref_len: i64,
        #[case] alt_len: i64,
        #[case] expected: bool,
    ) {
        assert_eq!(is_in_frame(ref_len, alt_len), expected);
        assert_eq!(is_in_frame(alt_len, ref_len), expected);
    }

    #[test]
    fn frameshift_requires_both_checks() {
        let cfg = SpliceConfig::default().windows;
        let e = exon(1000, 1500);
        // Variant at 1494, window position 5: cut at 1492, shift of 8 bases.
        let analysis = analyze(Strand::Plus, &cfg, SiteType::Donor, &e, 1494, 5);
        assert_eq!(analysis.new_splice_position, 1492);
        assert_eq!(analysis.wild_type_position, 1500);
        assert_eq!(analysis.ref_exon_length, 501);
        assert_eq!(analysis.alt_exon_length, 493);
        assert!(!analysis.in_frame);
        assert!(!analysis.distance_divisible);
        assert!(analysis.frameshift);

        // Variant at 1494, window position 3: cut at 1494, shift of 6 bases.
        let analysis = analyze(Strand::Plus, &cfg, SiteType::Donor, &e, 1494, 3);
        assert_eq!(analysis.new_splice_position, 1494);
        assert!(analysis.in_frame);
        assert!(analysis.distance_divisible);
        assert!(!analysis.frameshift);
    }
}
