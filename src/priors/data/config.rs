//! Immutable per-gene configuration tables.
//!
//! Everything here is static curation input: window lengths, score
//! normalization statistics, decision thresholds, clinically important
//! domain boundaries, and the BRCA2 grey zone.  The tables are constructed
//! once and passed down; nothing in the engine mutates them.

use crate::priors::ds::{BoundarySource, Gene, SiteType, Strand};

/// A genomic window in transcription order (`start` is 5', `end` is 3';
/// for minus-strand genes `start > end`).  Both endpoints are inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct TxWindow {
    pub start: i64,
    pub end: i64,
}

#[allow(clippy::len_without_is_empty)]
impl TxWindow {
    /// Closed-interval membership honoring strand direction.
    pub fn contains(&self, strand: Strand, pos: i64) -> bool {
        strand.contains(pos, self.start, self.end)
    }

    /// The window as an ascending genomic range `(lo, hi)`, inclusive.
    pub fn genomic(&self) -> (i64, i64) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    /// Whether the ascending genomic range `(lo, hi)` overlaps the window.
    pub fn overlaps(&self, lo: i64, hi: i64) -> bool {
        let (wlo, whi) = self.genomic();
        lo <= whi && hi >= wlo
    }

    /// Number of bases in the window; closed intervals are never empty.
    pub fn len(&self) -> i64 {
        let (lo, hi) = self.genomic();
        hi - lo + 1
    }
}

/// One clinically important protein domain, as a genomic window.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CiDomain {
    /// Curation name of the domain, e.g., `"ring"`.
    pub name: String,
    /// Domain extent in transcription order.
    pub window: TxWindow,
}

impl CiDomain {
    fn new(name: &str, start: i64, end: i64) -> Self {
        Self {
            name: name.to_string(),
            window: TxWindow { start, end },
        }
    }
}

/// Standard splice-window lengths, in bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct WindowConfig {
    /// Exonic bases in a reference donor/acceptor window.
    pub exonic_portion: i64,
    /// Intronic bases in a reference donor window.
    pub donor_intronic: i64,
    /// Intronic bases in a reference acceptor window.
    pub acceptor_intronic: i64,
    /// Exonic bases covered by de novo detection windows.
    pub de_novo_length: i64,
}

impl WindowConfig {
    /// Length of the scoring window for the given site type (9 or 23).
    pub fn window_size(&self, site: SiteType) -> i64 {
        match site {
            SiteType::Donor => self.exonic_portion + self.donor_intronic,
            SiteType::Acceptor => self.acceptor_intronic + self.exonic_portion,
        }
    }

    /// Intronic bases in the scoring window for the given site type.
    pub fn intronic_portion(&self, site: SiteType) -> i64 {
        match site {
            SiteType::Donor => self.donor_intronic,
            SiteType::Acceptor => self.acceptor_intronic,
        }
    }
}

/// Population mean/standard deviation for one site type.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SiteStats {
    pub mean: f64,
    pub std: f64,
}

/// Score normalization statistics per site type.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ZScoreConfig {
    pub donor: SiteStats,
    pub acceptor: SiteStats,
}

impl ZScoreConfig {
    pub fn stats(&self, site: SiteType) -> SiteStats {
        match site {
            SiteType::Donor => self.donor,
            SiteType::Acceptor => self.acceptor,
        }
    }
}

/// Numeric thresholds of the decision tables.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DecisionThresholds {
    /// A reference donor site with z below this is considered weak.
    pub donor_ref_z_weak: f64,
    /// Alt z above this at a donor site counts as improved/neutral.
    pub donor_alt_z_improved: f64,
    /// A reference acceptor site with z below this is considered weak.
    pub acceptor_ref_z_weak: f64,
    /// Alt z above this at an acceptor site counts as improved/neutral.
    pub acceptor_alt_z_improved: f64,
    /// Minimal ref-to-alt z drop for the high tier at a weak reference site.
    pub z_drop_high: f64,
    /// De novo candidates with alt z below this stay in the low tier.
    pub de_novo_low_ceiling: f64,
    /// De novo candidates with alt z at or above this reach the high tier.
    pub de_novo_high_floor: f64,
    /// Minimal z for a motif to count as functional in splice rescue.
    pub functional_z_floor: f64,
}

impl DecisionThresholds {
    /// Weak-reference-site cutoff for the given site type.
    pub fn ref_z_weak(&self, site: SiteType) -> f64 {
        match site {
            SiteType::Donor => self.donor_ref_z_weak,
            SiteType::Acceptor => self.acceptor_ref_z_weak,
        }
    }

    /// Improved/neutral alt-z cutoff for the given site type.
    pub fn alt_z_improved(&self, site: SiteType) -> f64 {
        match site {
            SiteType::Donor => self.donor_alt_z_improved,
            SiteType::Acceptor => self.acceptor_alt_z_improved,
        }
    }
}

/// Full static configuration of the engine.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SpliceConfig {
    pub windows: WindowConfig,
    pub zscores: ZScoreConfig,
    pub thresholds: DecisionThresholds,
    /// CI domains for BRCA1, per boundary source.
    pub brca1_ci_domains_enigma: Vec<CiDomain>,
    pub brca1_ci_domains_priors: Vec<CiDomain>,
    /// CI domains for BRCA2, per boundary source.
    pub brca2_ci_domains_enigma: Vec<CiDomain>,
    pub brca2_ci_domains_priors: Vec<CiDomain>,
    /// Grey zone around the BRCA2 alternative stop codon.
    pub brca2_grey_zone: TxWindow,
    /// Exons for which splice rescue caps rather than clears the prior.
    /// Curated empirically; kept as data, not derived.
    pub capped_exons: Vec<(Gene, String)>,
}

impl SpliceConfig {
    /// CI domain set for a gene and boundary source.
    pub fn ci_domains(&self, gene: Gene, source: BoundarySource) -> &[CiDomain] {
        match (gene, source) {
            (Gene::Brca1, BoundarySource::Enigma) => &self.brca1_ci_domains_enigma,
            (Gene::Brca1, BoundarySource::Priors) => &self.brca1_ci_domains_priors,
            (Gene::Brca2, BoundarySource::Enigma) => &self.brca2_ci_domains_enigma,
            (Gene::Brca2, BoundarySource::Priors) => &self.brca2_ci_domains_priors,
        }
    }

    /// Grey zone window for the gene, if it has one.
    pub fn grey_zone(&self, gene: Gene) -> Option<&TxWindow> {
        match gene {
            Gene::Brca1 => None,
            Gene::Brca2 => Some(&self.brca2_grey_zone),
        }
    }

    /// Whether splice rescue for the given exon is capped instead of
    /// granted in full.
    pub fn is_capped_exon(&self, gene: Gene, exon_label: &str) -> bool {
        self.capped_exons
            .iter()
            .any(|(g, label)| *g == gene && label == exon_label)
    }
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            windows: WindowConfig {
                exonic_portion: 3,
                donor_intronic: 6,
                acceptor_intronic: 20,
                de_novo_length: 10,
            },
            zscores: ZScoreConfig {
                donor: SiteStats {
                    mean: 7.938_090_909_090_907,
                    std: 2.328_995_685_016_708,
                },
                acceptor: SiteStats {
                    mean: 7.984_909_090_909_091,
                    std: 2.433_662_315_207_845,
                },
            },
            thresholds: DecisionThresholds {
                donor_ref_z_weak: -1.5,
                donor_alt_z_improved: 0.0,
                acceptor_ref_z_weak: -1.0,
                acceptor_alt_z_improved: 0.5,
                z_drop_high: 0.5,
                de_novo_low_ceiling: -2.0,
                de_novo_high_floor: 0.0,
                functional_z_floor: -2.0,
            },
            brca1_ci_domains_enigma: vec![
                CiDomain::new("ring", 43124096, 43104260),
                CiDomain::new("brct", 43070966, 43045705),
            ],
            brca1_ci_domains_priors: vec![
                CiDomain::new("initiation", 43124096, 43124094),
                CiDomain::new("ring", 43124084, 43104875),
                CiDomain::new("brct", 43070966, 43045705),
            ],
            brca2_ci_domains_enigma: vec![CiDomain::new("dnb", 32356433, 32396954)],
            brca2_ci_domains_priors: vec![
                CiDomain::new("initiation", 32316461, 32316463),
                CiDomain::new("palb2", 32316491, 32319108),
                CiDomain::new("dnb", 32356433, 32396954),
                CiDomain::new("tr2/rad51", 32398318, 32398428),
            ],
            brca2_grey_zone: TxWindow {
                start: 32398438,
                end: 32398488,
            },
            capped_exons: vec![
                (Gene::Brca1, "exon9".to_string()),
                (Gene::Brca1, "exon10".to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn window_sizes() {
        let cfg = SpliceConfig::default();
        assert_eq!(cfg.windows.window_size(SiteType::Donor), 9);
        assert_eq!(cfg.windows.window_size(SiteType::Acceptor), 23);
    }

    #[test]
    fn tx_window_membership_both_strands() {
        let plus = TxWindow { start: 100, end: 110 };
        assert!(plus.contains(Strand::Plus, 100));
        assert!(plus.contains(Strand::Plus, 110));
        assert!(!plus.contains(Strand::Plus, 111));

        let minus = TxWindow { start: 110, end: 100 };
        assert!(minus.contains(Strand::Minus, 110));
        assert!(minus.contains(Strand::Minus, 100));
        assert!(!minus.contains(Strand::Minus, 99));
    }

    #[test]
    fn tx_window_overlap() {
        let w = TxWindow { start: 110, end: 100 };
        assert!(w.overlaps(105, 120));
        assert!(w.overlaps(90, 100));
        assert!(!w.overlaps(111, 120));
        assert_eq!(w.len(), 11);
    }

    #[test]
    fn grey_zone_only_for_brca2() {
        let cfg = SpliceConfig::default();
        assert!(cfg.grey_zone(Gene::Brca1).is_none());
        assert!(cfg.grey_zone(Gene::Brca2).is_some());
    }

    #[test]
    fn ci_domain_sources_differ() {
        let cfg = SpliceConfig::default();
        assert_eq!(cfg.ci_domains(Gene::Brca1, BoundarySource::Enigma).len(), 2);
        assert_eq!(cfg.ci_domains(Gene::Brca1, BoundarySource::Priors).len(), 3);
        assert_eq!(cfg.ci_domains(Gene::Brca2, BoundarySource::Enigma).len(), 1);
        assert_eq!(cfg.ci_domains(Gene::Brca2, BoundarySource::Priors).len(), 4);
    }

    #[test]
    fn capped_exon_table() {
        let cfg = SpliceConfig::default();
        assert!(cfg.is_capped_exon(Gene::Brca1, "exon9"));
        assert!(cfg.is_capped_exon(Gene::Brca1, "exon10"));
        assert!(!cfg.is_capped_exon(Gene::Brca1, "exon11"));
        assert!(!cfg.is_capped_exon(Gene::Brca2, "exon9"));
    }
}
