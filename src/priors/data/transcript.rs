//! Transcript/exon model for the supported genes.
//!
//! The on-disk form uses plus-strand, 1-based, inclusive coordinates with
//! ascending exon lists; loading converts everything into transcription
//! order so that downstream window arithmetic is strand-agnostic.

use std::path::Path;

use crate::priors::data::config::TxWindow;
use crate::priors::ds::{Gene, Strand};

/// RefSeq accession whose legacy exon numbering omits exon 4.
const BRCA1_REFSEQ: &str = "NM_007294.3";

/// On-disk transcript record (plus-strand coordinates, ascending exons).
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TranscriptRecord {
    /// Gene symbol.
    pub gene: Gene,
    /// RefSeq accession, e.g., `"NM_000059.3"`.
    pub accession: String,
    /// Chromosome name.
    pub chrom: String,
    /// Coding strand.
    pub strand: Strand,
    /// Transcript bounds, 1-based inclusive, ascending.
    pub tx_start: i64,
    pub tx_end: i64,
    /// CDS bounds, 1-based inclusive, ascending.
    pub cds_start: i64,
    pub cds_end: i64,
    /// Declared exon count; must match the coordinate lists.
    pub exon_count: usize,
    /// Exon starts/ends, 1-based inclusive, ascending, paired by index.
    pub exon_starts: Vec<i64>,
    pub exon_ends: Vec<i64>,
}

/// One exon in transcription order.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Exon {
    /// Exon identifier, e.g., `"exon9"`.
    pub label: String,
    /// Exon number as used in the identifier.
    pub number: u32,
    /// First base in transcription order.
    pub start: i64,
    /// Last base in transcription order.
    pub end: i64,
}

#[allow(clippy::len_without_is_empty)]
impl Exon {
    /// Exon length in bases; closed intervals are never empty.
    pub fn len(&self) -> i64 {
        (self.start - self.end).abs() + 1
    }

    /// The exon body as a transcription-order window.
    pub fn window(&self) -> TxWindow {
        TxWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// Closed-interval membership.
    pub fn contains(&self, strand: Strand, pos: i64) -> bool {
        strand.contains(pos, self.start, self.end)
    }
}

/// Validated transcript model in transcription order.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Transcript {
    pub gene: Gene,
    pub accession: String,
    pub chrom: String,
    pub strand: Strand,
    /// Transcript bounds in transcription order.
    pub tx: TxWindow,
    /// First/last coding base in transcription order.
    pub cds: TxWindow,
    /// Exons in transcription order.
    pub exons: Vec<Exon>,
}

impl Transcript {
    /// Build and validate a transcript from its on-disk record.
    ///
    /// # Errors
    ///
    /// Fails loudly on any violation of the exon-table invariants; a
    /// malformed gene model is a configuration error, not a runtime
    /// condition to classify around.
    pub fn from_record(record: &TranscriptRecord) -> Result<Self, anyhow::Error> {
        if record.exon_starts.len() != record.exon_ends.len() {
            anyhow::bail!(
                "{}: exon start/end lists have different lengths ({} vs {})",
                record.accession,
                record.exon_starts.len(),
                record.exon_ends.len()
            );
        }
        if record.exon_starts.is_empty() {
            anyhow::bail!("{}: transcript has no exons", record.accession);
        }
        if record.exon_starts.len() != record.exon_count {
            anyhow::bail!(
                "{}: declared exon count {} does not match {} exon records",
                record.accession,
                record.exon_count,
                record.exon_starts.len()
            );
        }

        let strand = record.strand;
        let mut pairs: Vec<(i64, i64)> = record
            .exon_starts
            .iter()
            .zip(record.exon_ends.iter())
            .map(|(&lo, &hi)| match strand {
                Strand::Plus => (lo, hi),
                Strand::Minus => (hi, lo),
            })
            .collect();
        if strand == Strand::Minus {
            pairs.reverse();
        }

        let exons = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (start, end))| {
                let number = Self::exon_number(&record.accession, idx);
                Exon {
                    label: format!("exon{}", number),
                    number,
                    start,
                    end,
                }
            })
            .collect::<Vec<_>>();

        let tx = match strand {
            Strand::Plus => TxWindow {
                start: record.tx_start,
                end: record.tx_end,
            },
            Strand::Minus => TxWindow {
                start: record.tx_end,
                end: record.tx_start,
            },
        };
        let cds = match strand {
            Strand::Plus => TxWindow {
                start: record.cds_start,
                end: record.cds_end,
            },
            Strand::Minus => TxWindow {
                start: record.cds_end,
                end: record.cds_start,
            },
        };

        let transcript = Self {
            gene: record.gene,
            accession: record.accession.clone(),
            chrom: record.chrom.clone(),
            strand,
            tx,
            cds,
            exons,
        };
        transcript.validate()?;
        Ok(transcript)
    }

    /// Exon number for the exon at `idx` (0-based, transcription order).
    /// The legacy BRCA1 numbering has no exon 4.
    fn exon_number(accession: &str, idx: usize) -> u32 {
        let number = idx as u32 + 1;
        if accession == BRCA1_REFSEQ && number >= 4 {
            number + 1
        } else {
            number
        }
    }

    /// Check the exon-table invariants: every exon is a forward range in
    /// transcription order, exons are strictly ordered and non-overlapping,
    /// and all coordinates lie within the transcript bounds.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let strand = self.strand;
        for exon in &self.exons {
            if strand.distance(exon.start, exon.end) < 0 {
                anyhow::bail!(
                    "{}: {} is reversed against transcription direction",
                    self.accession,
                    exon.label
                );
            }
            if !self.tx.contains(strand, exon.start) || !self.tx.contains(strand, exon.end) {
                anyhow::bail!(
                    "{}: {} extends past transcript bounds",
                    self.accession,
                    exon.label
                );
            }
        }
        for pair in self.exons.windows(2) {
            if strand.distance(pair[0].end, pair[1].start) <= 0 {
                anyhow::bail!(
                    "{}: {} does not start beyond the end of {}",
                    self.accession,
                    pair[1].label,
                    pair[0].label
                );
            }
        }
        if strand.distance(self.cds.start, self.cds.end) < 0
            || !self.tx.contains(strand, self.cds.start)
            || !self.tx.contains(strand, self.cds.end)
        {
            anyhow::bail!("{}: CDS bounds are inconsistent", self.accession);
        }
        Ok(())
    }

    /// Load a transcript from a JSON file.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn load_json<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let reader = std::fs::File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("problem opening file: {}", e))
            .map(std::io::BufReader::new)?;
        let record: TranscriptRecord = serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("problem parsing transcript JSON: {}", e))?;
        Self::from_record(&record)
    }

    /// The first exon in transcription order.
    pub fn first_exon(&self) -> &Exon {
        self.exons.first().expect("validated transcript has exons")
    }

    /// The last exon in transcription order.
    pub fn last_exon(&self) -> &Exon {
        self.exons.last().expect("validated transcript has exons")
    }

    /// Whether `pos` lies within the transcript bounds.
    pub fn in_tx(&self, pos: i64) -> bool {
        self.tx.contains(self.strand, pos)
    }

    /// Whether `pos` lies in the 5' or 3' UTR region (inside the transcript
    /// bounds but transcriptionally before the first or after the last
    /// coding base; intronic positions in UTR regions count).
    pub fn in_utr(&self, pos: i64) -> bool {
        self.in_tx(pos)
            && (self.strand.distance(self.cds.start, pos) < 0
                || self.strand.distance(self.cds.end, pos) > 0)
    }

    /// Whether `pos` lies transcriptionally after the last coding base.
    pub fn after_cds(&self, pos: i64) -> bool {
        self.strand.distance(self.cds.end, pos) > 0
    }

    /// The exon containing `pos`, if any.
    pub fn exon_containing(&self, pos: i64) -> Option<&Exon> {
        self.exons.iter().find(|e| e.contains(self.strand, pos))
    }

    /// Index of the exon containing `pos`.
    pub fn exon_index_containing(&self, pos: i64) -> Option<usize> {
        self.exons.iter().position(|e| e.contains(self.strand, pos))
    }

    /// For an intronic `pos`, the exons flanking the enclosing intron:
    /// `(upstream, downstream)` in transcription order.
    pub fn flanking_exons(&self, pos: i64) -> Option<(&Exon, &Exon)> {
        if !self.in_tx(pos) || self.exon_containing(pos).is_some() {
            return None;
        }
        self.exons.windows(2).find_map(|pair| {
            let after_upstream = self.strand.distance(pair[0].end, pos) > 0;
            let before_downstream = self.strand.distance(pos, pair[1].start) > 0;
            if after_upstream && before_downstream {
                Some((&pair[0], &pair[1]))
            } else {
                None
            }
        })
    }

    /// Look up an exon by its label.
    pub fn exon_by_label(&self, label: &str) -> Option<&Exon> {
        self.exons.iter().find(|e| e.label == label)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn plus_record() -> TranscriptRecord {
        TranscriptRecord {
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
        }
    }

    fn minus_record() -> TranscriptRecord {
        TranscriptRecord {
            gene: Gene::Brca1,
            accession: BRCA1_REFSEQ.into(),
            chrom: "chr17".into(),
            strand: Strand::Minus,
            tx_start: 1000,
            tx_end: 5000,
            cds_start: 1200,
            cds_end: 4500,
            exon_count: 5,
            exon_starts: vec![1000, 2000, 2800, 3500, 4600],
            exon_ends: vec![1500, 2500, 3100, 4000, 5000],
        }
    }

    #[test]
    fn plus_strand_transcription_order() {
        let tx = Transcript::from_record(&plus_record()).expect("valid");
        assert_eq!(tx.exons.len(), 3);
        assert_eq!(tx.exons[0].label, "exon1");
        assert_eq!(tx.exons[0].start, 1000);
        assert_eq!(tx.exons[0].end, 1500);
        assert_eq!(tx.last_exon().label, "exon3");
        assert_eq!(tx.cds.start, 1200);
    }

    #[test]
    fn minus_strand_transcription_order_and_numbering() {
        let tx = Transcript::from_record(&minus_record()).expect("valid");
        // Transcription starts at the highest genomic coordinate.
        assert_eq!(tx.exons[0].start, 5000);
        assert_eq!(tx.exons[0].end, 4600);
        assert_eq!(tx.last_exon().start, 1500);
        assert_eq!(tx.last_exon().end, 1000);
        // Legacy numbering: exon 4 is skipped.
        let labels: Vec<&str> = tx.exons.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["exon1", "exon2", "exon3", "exon5", "exon6"]);
        assert_eq!(tx.cds.start, 4500);
        assert_eq!(tx.cds.end, 1200);
    }

    #[test]
    fn declared_exon_count_must_match() {
        let mut record = plus_record();
        record.exon_count = 4;
        assert!(Transcript::from_record(&record).is_err());
    }

    #[test]
    fn overlapping_exons_are_rejected() {
        let mut record = plus_record();
        record.exon_starts = vec![1000, 1400, 4000];
        assert!(Transcript::from_record(&record).is_err());
    }

    #[test]
    fn exon_membership_is_closed_interval() {
        let tx = Transcript::from_record(&minus_record()).expect("valid");
        assert!(tx.exon_containing(5000).is_some());
        assert!(tx.exon_containing(4600).is_some());
        assert!(tx.exon_containing(4599).is_none());
        assert!(tx.exon_containing(4001).is_none());
    }

    #[test]
    fn utr_detection_both_ends() {
        let plus = Transcript::from_record(&plus_record()).expect("valid");
        assert!(plus.in_utr(1100));
        assert!(plus.in_utr(4600));
        assert!(!plus.in_utr(1200));
        assert!(!plus.in_utr(4500));
        assert!(!plus.in_utr(999));

        let minus = Transcript::from_record(&minus_record()).expect("valid");
        assert!(minus.in_utr(4700)); // 5' UTR on minus strand
        assert!(minus.in_utr(1100)); // 3' UTR
        assert!(!minus.in_utr(4500));
    }

    #[test]
    fn flanking_exons_for_intronic_position() {
        let tx = Transcript::from_record(&plus_record()).expect("valid");
        let (up, down) = tx.flanking_exons(1800).expect("intronic");
        assert_eq!(up.label, "exon1");
        assert_eq!(down.label, "exon2");
        assert!(tx.flanking_exons(1200).is_none()); // exonic
        assert!(tx.flanking_exons(1).is_none()); // outside
    }
}
