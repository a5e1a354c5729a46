//! External collaborators of the engine, as injected interfaces.
//!
//! Sequence retrieval and the protein-impact prior table are outside the
//! core; the engine only consumes them through the traits defined here.

use std::path::Path;

use crate::priors::ds::{Consequence, Prior};

/// Provider of genomic reference sequence.
pub trait SequenceRepo {
    /// Return the plus-strand sequence for the inclusive 1-based range
    /// `start..=end` on `chrom`, 5'-to-3' on the plus strand.
    ///
    /// # Errors
    ///
    /// Any failure is unrecoverable for the current variant and propagates
    /// as a generic `anyhow::Error`.
    fn seq(&self, chrom: &str, start: i64, end: i64) -> Result<String, anyhow::Error>;
}

/// In-memory sequence region, e.g., one gene locus loaded at startup.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SequenceRegion {
    /// Chromosome name.
    pub chrom: String,
    /// 1-based genomic position of the first base of `sequence`.
    pub start: i64,
    /// Plus-strand bases.
    pub sequence: String,
}

/// Sequence repository backed by in-memory regions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySequenceRepo {
    regions: Vec<SequenceRegion>,
}

impl InMemorySequenceRepo {
    /// Create a repository over the given regions.
    pub fn new(regions: Vec<SequenceRegion>) -> Self {
        Self { regions }
    }

    /// Load regions from a JSON file holding a list of `SequenceRegion`s.
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
        let regions: Vec<SequenceRegion> = serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("problem parsing sequence JSON: {}", e))?;
        Ok(Self::new(regions))
    }
}

impl SequenceRepo for InMemorySequenceRepo {
    fn seq(&self, chrom: &str, start: i64, end: i64) -> Result<String, anyhow::Error> {
        if start > end {
            anyhow::bail!("invalid sequence range {}:{}-{}", chrom, start, end);
        }
        let region = self
            .regions
            .iter()
            .find(|r| {
                r.chrom == chrom
                    && start >= r.start
                    && end < r.start + r.sequence.len() as i64
            })
            .ok_or_else(|| {
                anyhow::anyhow!("no sequence region covering {}:{}-{}", chrom, start, end)
            })?;
        let lo = (start - region.start) as usize;
        let hi = (end - region.start) as usize;
        Ok(region.sequence[lo..=hi].to_string())
    }
}

/// One entry of the protein-impact prior table.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ProteinImpact {
    /// Protein-level consequence.
    pub consequence: Consequence,
    /// Precomputed prior for the coding change.
    pub prior: Prior,
}

/// Lookup table of curated protein-impact priors, keyed by the variant's
/// HGVS cDNA description.
pub trait ProteinPriorRepo {
    /// Return the curated impact for the coding change, if known.
    fn lookup(&self, hgvs_cdna: &str) -> Option<ProteinImpact>;
}

/// In-memory protein prior table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProteinPriors {
    entries: rustc_hash::FxHashMap<String, ProteinImpact>,
}

impl InMemoryProteinPriors {
    /// Create a table from explicit entries.
    pub fn new(entries: rustc_hash::FxHashMap<String, ProteinImpact>) -> Self {
        Self { entries }
    }

    /// Load the table from a tab-delimited file with a header line and the
    /// columns `hgvs_cdna`, `consequence`, `prior_prob`.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn load_tsv<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        #[derive(Debug, serde::Deserialize)]
        struct Row {
            hgvs_cdna: String,
            consequence: Consequence,
            prior_prob: f64,
        }

        let reader = std::fs::File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("problem opening file: {}", e))
            .map(std::io::BufReader::new)?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);
        let mut entries = rustc_hash::FxHashMap::default();
        for record in csv_reader.deserialize() {
            let row: Row = record.map_err(|e| anyhow::anyhow!("problem parsing record: {}", e))?;
            let prior = Prior::from_probability(row.prior_prob).ok_or_else(|| {
                anyhow::anyhow!(
                    "{}: {} is not a fixed prior probability",
                    row.hgvs_cdna,
                    row.prior_prob
                )
            })?;
            entries.insert(
                row.hgvs_cdna,
                ProteinImpact {
                    consequence: row.consequence,
                    prior,
                },
            );
        }
        Ok(Self::new(entries))
    }

    /// Insert a single entry (used when assembling tables in code).
    pub fn insert(&mut self, hgvs_cdna: &str, impact: ProteinImpact) {
        self.entries.insert(hgvs_cdna.to_string(), impact);
    }
}

impl ProteinPriorRepo for InMemoryProteinPriors {
    fn lookup(&self, hgvs_cdna: &str) -> Option<ProteinImpact> {
        self.entries.get(hgvs_cdna).copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn in_memory_sequence_lookup() {
        let repo = InMemorySequenceRepo::new(vec![SequenceRegion {
            chrom: "chr13".into(),
            start: 100,
            sequence: "ACGTACGTAC".into(),
        }]);
        assert_eq!(repo.seq("chr13", 100, 103).unwrap(), "ACGT");
        assert_eq!(repo.seq("chr13", 109, 109).unwrap(), "C");
        assert!(repo.seq("chr13", 99, 103).is_err());
        assert!(repo.seq("chr13", 105, 110).is_err());
        assert!(repo.seq("chr17", 100, 103).is_err());
        assert!(repo.seq("chr13", 103, 100).is_err());
    }

    #[test]
    fn protein_prior_lookup() {
        let mut table = InMemoryProteinPriors::default();
        table.insert(
            "c.123A>T",
            ProteinImpact {
                consequence: Consequence::Nonsense,
                prior: Prior::Pathogenic,
            },
        );
        let hit = table.lookup("c.123A>T").expect("present");
        assert_eq!(hit.consequence, Consequence::Nonsense);
        assert_eq!(hit.prior, Prior::Pathogenic);
        assert!(table.lookup("c.999G>C").is_none());
    }

    #[test]
    fn protein_prior_tsv_round_trip() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("protein.tsv");
        std::fs::write(
            &path,
            "hgvs_cdna\tconsequence\tprior_prob\nc.1A>G\tmissense\t0.29\nc.2C>T\tnonsense\t0.99\n",
        )?;
        let table = InMemoryProteinPriors::load_tsv(&path)?;
        assert_eq!(
            table.lookup("c.1A>G").unwrap().prior,
            Prior::ProteinModerate
        );
        assert_eq!(
            table.lookup("c.2C>T").unwrap().consequence,
            Consequence::Nonsense
        );
        Ok(())
    }
}
