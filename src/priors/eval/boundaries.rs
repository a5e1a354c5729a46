//! Splice-site boundary windows derived from the exon table.
//!
//! Windows are computed in transcription order and are inclusive on both
//! ends.  Reference windows use the standard lengths (3 exonic bases plus
//! 6 intronic for donors, 20 intronic plus 3 exonic for acceptors); de novo
//! detection windows stretch the exonic side to the configured de novo
//! length.  The strand-terminal exon has no donor window and the first exon
//! has no acceptor window.

use crate::priors::data::config::{SpliceConfig, TxWindow, WindowConfig};
use crate::priors::data::transcript::{Exon, Transcript};
use crate::priors::ds::{Gene, SiteType, Strand};

/// Clamp a window against the transcript bounds.
fn clamp(window: TxWindow, tx: &Transcript) -> TxWindow {
    let strand = tx.strand;
    let start = if strand.distance(tx.tx.start, window.start) < 0 {
        tx.tx.start
    } else {
        window.start
    };
    let end = if strand.distance(window.end, tx.tx.end) < 0 {
        tx.tx.end
    } else {
        window.end
    };
    TxWindow { start, end }
}

/// Reference donor window of `exon`: the last `exonic_portion` exonic bases
/// plus the first `donor_intronic` intronic bases.
pub fn ref_donor_window(tx: &Transcript, cfg: &WindowConfig, exon: &Exon) -> TxWindow {
    donor_window(tx, exon, cfg.exonic_portion, cfg.donor_intronic)
}

/// De novo donor detection window of `exon`: like the reference window but
/// covering `de_novo_length` exonic bases.
pub fn de_novo_donor_window(tx: &Transcript, cfg: &WindowConfig, exon: &Exon) -> TxWindow {
    donor_window(tx, exon, cfg.de_novo_length, cfg.donor_intronic)
}

fn donor_window(tx: &Transcript, exon: &Exon, exonic: i64, intronic: i64) -> TxWindow {
    let strand = tx.strand;
    clamp(
        TxWindow {
            start: strand.offset(exon.end, -(exonic - 1)),
            end: strand.offset(exon.end, intronic),
        },
        tx,
    )
}

/// Reference acceptor window of `exon`: the last `acceptor_intronic`
/// intronic bases plus the first `exonic_portion` exonic bases.
pub fn ref_acceptor_window(tx: &Transcript, cfg: &WindowConfig, exon: &Exon) -> TxWindow {
    acceptor_window(tx, exon, cfg.exonic_portion, cfg.acceptor_intronic)
}

/// De novo acceptor detection window of `exon`.
pub fn de_novo_acceptor_window(tx: &Transcript, cfg: &WindowConfig, exon: &Exon) -> TxWindow {
    acceptor_window(tx, exon, cfg.de_novo_length, cfg.acceptor_intronic)
}

fn acceptor_window(tx: &Transcript, exon: &Exon, exonic: i64, intronic: i64) -> TxWindow {
    let strand = tx.strand;
    clamp(
        TxWindow {
            start: strand.offset(exon.start, -intronic),
            end: strand.offset(exon.start, exonic - 1),
        },
        tx,
    )
}

/// Exons carrying a splice site of the given type: all but the terminal
/// exon for donors, all but the first exon for acceptors.
pub fn exons_with_site<'a>(tx: &'a Transcript, site: SiteType) -> &'a [Exon] {
    match site {
        SiteType::Donor => &tx.exons[..tx.exons.len() - 1],
        SiteType::Acceptor => &tx.exons[1..],
    }
}

/// Reference splice windows of the given type, paired with their exons.
pub fn ref_windows<'a>(
    tx: &'a Transcript,
    cfg: &WindowConfig,
    site: SiteType,
) -> Vec<(&'a Exon, TxWindow)> {
    exons_with_site(tx, site)
        .iter()
        .map(|exon| {
            let window = match site {
                SiteType::Donor => ref_donor_window(tx, cfg, exon),
                SiteType::Acceptor => ref_acceptor_window(tx, cfg, exon),
            };
            (exon, window)
        })
        .collect()
}

/// The reference splice window (and its exon) containing `pos`, if any.
pub fn splice_region_containing<'a>(
    tx: &'a Transcript,
    cfg: &WindowConfig,
    pos: i64,
    site: SiteType,
) -> Option<(&'a Exon, TxWindow)> {
    ref_windows(tx, cfg, site)
        .into_iter()
        .find(|(_, window)| window.contains(tx.strand, pos))
}

/// The de novo detection window (and its exon) containing `pos`, if any.
pub fn de_novo_region_containing<'a>(
    tx: &'a Transcript,
    cfg: &WindowConfig,
    pos: i64,
    site: SiteType,
) -> Option<(&'a Exon, TxWindow)> {
    exons_with_site(tx, site)
        .iter()
        .map(|exon| {
            let window = match site {
                SiteType::Donor => de_novo_donor_window(tx, cfg, exon),
                SiteType::Acceptor => de_novo_acceptor_window(tx, cfg, exon),
            };
            (exon, window)
        })
        .find(|(_, window)| window.contains(tx.strand, pos))
}

/// Whether `pos` falls into the gene's grey zone.
pub fn in_grey_zone(cfg: &SpliceConfig, gene: Gene, strand: Strand, pos: i64) -> bool {
    cfg.grey_zone(gene)
        .map(|zone| zone.contains(strand, pos))
        .unwrap_or(false)
}

/// Whether `pos` lies transcriptionally past the grey zone (and is neither
/// in the grey zone nor in the UTR).
pub fn after_grey_zone(tx: &Transcript, cfg: &SpliceConfig, pos: i64) -> bool {
    match cfg.grey_zone(tx.gene) {
        Some(zone) => {
            !zone.contains(tx.strand, pos)
                && !tx.in_utr(pos)
                && tx.strand.distance(zone.end, pos) > 0
        }
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::priors::data::transcript::TranscriptRecord;

    fn plus_tx() -> Transcript {
        Transcript::from_record(&TranscriptRecord {
            gene: Gene::Brca2,
            accession: "NM_000059.3".into(),
            chrom: "chr13".into(),
            strand: Strand::Plus,
            tx_start: 1000,
            tx_end: 5000,
            cds_start: 1200,
            cds_end: 4500,
            exon_count: 3,
            exon_starts: vec![1000, 2000, 4000],
            exon_ends: vec![1500, 2500, 5000],
        })
        .expect("valid")
    }

    fn minus_tx() -> Transcript {
        Transcript::from_record(&TranscriptRecord {
            gene: Gene::Brca1,
            accession: "NM_007294.3".into(),
            chrom: "chr17".into(),
            strand: Strand::Minus,
            tx_start: 1000,
            tx_end: 5000,
            cds_start: 1200,
            cds_end: 4500,
            exon_count: 3,
            exon_starts: vec![1000, 2000, 4000],
            exon_ends: vec![1500, 2500, 5000],
        })
        .expect("valid")
    }

    #[test]
    fn plus_strand_donor_window() {
        let tx = plus_tx();
        let cfg = SpliceConfig::default().windows;
        let window = ref_donor_window(&tx, &cfg, &tx.exons[0]);
        // Last 3 exonic bases 1498..=1500, first 6 intronic 1501..=1506.
        assert_eq!(window, TxWindow { start: 1498, end: 1506 });
        assert_eq!(window.len(), 9);
    }

    #[test]
    fn plus_strand_acceptor_window() {
        let tx = plus_tx();
        let cfg = SpliceConfig::default().windows;
        let window = ref_acceptor_window(&tx, &cfg, &tx.exons[1]);
        // 20 intronic bases 1980..=1999, first 3 exonic 2000..=2002.
        assert_eq!(window, TxWindow { start: 1980, end: 2002 });
        assert_eq!(window.len(), 23);
    }

    #[test]
    fn minus_strand_windows_mirror() {
        let tx = minus_tx();
        let cfg = SpliceConfig::default().windows;
        // First exon in transcription order is genomic 4000..=5000; its
        // donor boundary sits at the exon's low-coordinate edge.
        let donor = ref_donor_window(&tx, &cfg, &tx.exons[0]);
        assert_eq!(donor, TxWindow { start: 4002, end: 3994 });
        let acceptor = ref_acceptor_window(&tx, &cfg, &tx.exons[1]);
        assert_eq!(acceptor, TxWindow { start: 2520, end: 2498 });
    }

    #[test]
    fn de_novo_windows_stretch_exonic_side() {
        let tx = plus_tx();
        let cfg = SpliceConfig::default().windows;
        let donor = de_novo_donor_window(&tx, &cfg, &tx.exons[0]);
        assert_eq!(donor, TxWindow { start: 1491, end: 1506 });
        let acceptor = de_novo_acceptor_window(&tx, &cfg, &tx.exons[1]);
        assert_eq!(acceptor, TxWindow { start: 1980, end: 2009 });
    }

    #[test]
    fn terminal_exons_lack_sites() {
        let tx = plus_tx();
        assert_eq!(exons_with_site(&tx, SiteType::Donor).len(), 2);
        assert!(exons_with_site(&tx, SiteType::Donor)
            .iter()
            .all(|e| e.label != "exon3"));
        assert_eq!(exons_with_site(&tx, SiteType::Acceptor).len(), 2);
        assert!(exons_with_site(&tx, SiteType::Acceptor)
            .iter()
            .all(|e| e.label != "exon1"));
    }

    #[test]
    fn splice_region_lookup_covers_edges() {
        let tx = plus_tx();
        let cfg = SpliceConfig::default().windows;
        // Donor window of exon1 is 1498..=1506.
        assert!(splice_region_containing(&tx, &cfg, 1498, SiteType::Donor).is_some());
        assert!(splice_region_containing(&tx, &cfg, 1506, SiteType::Donor).is_some());
        assert!(splice_region_containing(&tx, &cfg, 1497, SiteType::Donor).is_none());
        assert!(splice_region_containing(&tx, &cfg, 1507, SiteType::Donor).is_none());
        let (exon, _) = splice_region_containing(&tx, &cfg, 1500, SiteType::Donor).unwrap();
        assert_eq!(exon.label, "exon1");
    }

    #[test]
    fn grey_zone_membership() {
        let cfg = SpliceConfig::default();
        assert!(in_grey_zone(&cfg, Gene::Brca2, Strand::Plus, 32398438));
        assert!(in_grey_zone(&cfg, Gene::Brca2, Strand::Plus, 32398488));
        assert!(!in_grey_zone(&cfg, Gene::Brca2, Strand::Plus, 32398489));
        assert!(!in_grey_zone(&cfg, Gene::Brca1, Strand::Minus, 32398450));
    }
}
