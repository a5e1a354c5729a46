//! Reference/alternate sequence assembly around a variant.
//!
//! Sequence is fetched on the plus strand and kept as a position-to-bases
//! map so that the alternate allele can be substituted at its genomic
//! coordinate before re-assembling a contiguous string in transcription
//! orientation (reverse-complemented for minus-strand genes).

use crate::priors::data::config::TxWindow;
use crate::priors::data::repo::SequenceRepo;
use crate::priors::ds::{Strand, Variant};

/// Reference and alternate sequence for one window, 5'-to-3' in
/// transcription orientation.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RefAltSeqs {
    pub ref_seq: String,
    pub alt_seq: String,
}

/// Position-keyed sequence map over an ascending genomic range.
///
/// Each entry holds the bases replacing the reference base at that
/// position: a single base initially, the whole alternate allele at a
/// variant's anchor, or nothing for deleted bases.
#[derive(Debug, Clone)]
pub struct PosMap {
    strand: Strand,
    start: i64,
    entries: Vec<String>,
}

impl PosMap {
    /// Fetch the plus-strand bases for `lo..=hi` and key them by position.
    pub fn fetch(
        repo: &dyn SequenceRepo,
        chrom: &str,
        strand: Strand,
        lo: i64,
        hi: i64,
    ) -> Result<Self, anyhow::Error> {
        let bases = repo.seq(chrom, lo, hi)?;
        if bases.len() as i64 != hi - lo + 1 {
            anyhow::bail!(
                "sequence provider returned {} bases for {}:{}-{}",
                bases.len(),
                chrom,
                lo,
                hi
            );
        }
        Ok(Self {
            strand,
            start: lo,
            entries: bases.chars().map(String::from).collect(),
        })
    }

    /// Ascending genomic range covered by the map.
    pub fn range(&self) -> (i64, i64) {
        (self.start, self.start + self.entries.len() as i64 - 1)
    }

    /// Substitute the variant's alternate allele.
    ///
    /// The variant's reference bases must match the fetched sequence; a
    /// mismatch means the caller combined inconsistent data sources.  A
    /// variant that does not overlap the map is a no-op; one that only
    /// partially overlaps is rejected.
    pub fn apply(&mut self, variant: &Variant) -> Result<(), anyhow::Error> {
        let (var_lo, var_hi) = variant.span();
        let (lo, hi) = self.range();
        if var_hi < lo || var_lo > hi {
            return Ok(());
        }
        if var_lo < lo || var_hi > hi {
            anyhow::bail!(
                "variant at {}:{} extends past the fetched window {}-{}",
                variant.chrom,
                variant.position,
                lo,
                hi
            );
        }
        let idx = (var_lo - self.start) as usize;
        let len = variant.reference.len();
        let observed: String = self.entries[idx..idx + len].concat();
        if observed != variant.reference {
            anyhow::bail!(
                "reference allele mismatch at {}:{}: expected {}, found {}",
                variant.chrom,
                variant.position,
                variant.reference,
                observed
            );
        }
        self.entries[idx] = variant.alternate.clone();
        for entry in &mut self.entries[idx + 1..idx + len] {
            entry.clear();
        }
        Ok(())
    }

    /// Assemble the map into a 5'-to-3' transcription-oriented string.
    pub fn assemble(&self) -> String {
        let plus: String = self.entries.concat();
        match self.strand {
            Strand::Plus => plus,
            Strand::Minus => {
                String::from_utf8(bio::alphabets::dna::revcomp(plus.as_bytes()))
                    .expect("reverse complement of valid bases is valid UTF-8")
            }
        }
    }
}

/// Reference and alternate sequence for a fixed-length window.
///
/// Only length-preserving substitutions are accepted here; the sliding de
/// novo search assembles indel sequences through [`PosMap`] directly.
pub fn ref_alt_window(
    repo: &dyn SequenceRepo,
    variant: &Variant,
    window: &TxWindow,
) -> Result<RefAltSeqs, anyhow::Error> {
    let strand = variant.strand();
    let (lo, hi) = window.genomic();
    let map = PosMap::fetch(repo, &variant.chrom, strand, lo, hi)?;
    let ref_seq = map.assemble();

    let (var_lo, var_hi) = variant.span();
    let overlaps = var_hi >= lo && var_lo <= hi;
    let alt_seq = if overlaps {
        if variant.reference.len() != variant.alternate.len() {
            anyhow::bail!(
                "length-changing variant cannot be applied to a fixed window at {}:{}",
                variant.chrom,
                variant.position
            );
        }
        let mut alt_map = map;
        alt_map.apply(variant)?;
        alt_map.assemble()
    } else {
        ref_seq.clone()
    };

    Ok(RefAltSeqs { ref_seq, alt_seq })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::priors::data::repo::{InMemorySequenceRepo, SequenceRegion};
    use crate::priors::ds::Gene;

    fn repo() -> InMemorySequenceRepo {
        InMemorySequenceRepo::new(vec![SequenceRegion {
            chrom: "chr13".into(),
            start: 100,
            sequence: "ACGTACGTACGTACGT".into(),
        }])
    }

    fn variant(pos: i64, reference: &str, alternate: &str) -> Variant {
        Variant {
            gene: Gene::Brca2,
            chrom: "chr13".into(),
            position: pos,
            reference: reference.into(),
            alternate: alternate.into(),
            hgvs_cdna: "-".into(),
        }
    }

    #[test]
    fn substitution_on_plus_strand() {
        let window = TxWindow { start: 102, end: 107 };
        let seqs = ref_alt_window(&repo(), &variant(104, "A", "G"), &window).unwrap();
        assert_eq!(seqs.ref_seq, "GTACGT");
        assert_eq!(seqs.alt_seq, "GTGCGT");
    }

    #[test]
    fn substitution_on_minus_strand_is_reverse_complemented() {
        let mut var = variant(104, "A", "G");
        var.gene = Gene::Brca1;
        var.chrom = "chr17".into();
        let repo = InMemorySequenceRepo::new(vec![SequenceRegion {
            chrom: "chr17".into(),
            start: 100,
            sequence: "ACGTACGTACGTACGT".into(),
        }]);
        let window = TxWindow { start: 107, end: 102 };
        let seqs = ref_alt_window(&repo, &var, &window).unwrap();
        // Plus-strand 102..=107 is GTACGT; transcription orientation is its
        // reverse complement.
        assert_eq!(seqs.ref_seq, "ACGTAC");
        assert_eq!(seqs.alt_seq, "ACGCAC");
    }

    #[test]
    fn variant_outside_window_leaves_alt_equal_to_ref() {
        let window = TxWindow { start: 102, end: 107 };
        let seqs = ref_alt_window(&repo(), &variant(110, "G", "A"), &window).unwrap();
        assert_eq!(seqs.ref_seq, seqs.alt_seq);
    }

    #[test]
    fn reference_mismatch_is_rejected() {
        let window = TxWindow { start: 102, end: 107 };
        let result = ref_alt_window(&repo(), &variant(104, "C", "G"), &window);
        assert!(result.is_err());
    }

    #[test]
    fn pos_map_handles_deletion_and_insertion() {
        // Deletion of TA anchored at 103 (ref TAC -> T).
        let mut map = PosMap::fetch(&repo(), "chr13", Strand::Plus, 100, 109).unwrap();
        map.apply(&variant(103, "TAC", "T")).unwrap();
        assert_eq!(map.assemble(), "ACGTGTAC");

        // Insertion of GG after 103.
        let mut map = PosMap::fetch(&repo(), "chr13", Strand::Plus, 100, 109).unwrap();
        map.apply(&variant(103, "T", "TGG")).unwrap();
        assert_eq!(map.assemble(), "ACGTGGACGTAC");
    }

    #[test]
    fn pos_map_rejects_partial_overlap() {
        let mut map = PosMap::fetch(&repo(), "chr13", Strand::Plus, 100, 104).unwrap();
        assert!(map.apply(&variant(103, "TAC", "T")).is_err());
    }
}
