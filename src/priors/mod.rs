//! Splicing-based prior probabilities of pathogenicity for BRCA1/BRCA2.

pub mod data;
pub mod ds;
pub mod eval;

use std::path::{Path, PathBuf};

use clap::Parser;

use self::data::config::SpliceConfig;
use self::data::repo::{InMemoryProteinPriors, InMemorySequenceRepo};
use self::data::transcript::Transcript;
use self::ds::{BoundarySource, Gene, Variant};
use self::eval::scoring::PssmScorer;

/// Command line arguments for `priors` command.
#[derive(Parser, Debug)]
#[command(about = "Splicing-based priors for BRCA1/BRCA2 variants", long_about = None)]
pub struct Args {
    /// Curation source for the clinically important domain boundaries.
    #[clap(long, value_enum, default_value_t = BoundarySource::Enigma)]
    pub boundary_source: BoundarySource,
    /// Paths to transcript model JSON files (one per gene).
    #[clap(long, required = true)]
    pub path_transcripts: Vec<PathBuf>,
    /// Path to reference sequence regions JSON file.
    #[clap(long)]
    pub path_sequences: PathBuf,
    /// Path to splice position-weight-matrix JSON file.
    #[clap(long)]
    pub path_pssm: PathBuf,
    /// Path to protein-impact priors TSV file.
    #[clap(long)]
    pub path_protein_priors: Option<PathBuf>,
    /// Path to a TSV file with variants to evaluate.
    #[clap(long)]
    pub path_variants: Option<PathBuf>,

    /// Variants to evaluate, given as `GENE:POS:REF>ALT`.
    pub variants: Vec<Variant>,
}

/// One row of the batch variant TSV.
#[derive(Debug, serde::Deserialize)]
struct VariantRow {
    #[serde(rename = "Gene_Symbol")]
    gene_symbol: String,
    #[serde(rename = "Chr")]
    chrom: String,
    #[serde(rename = "Pos")]
    position: i64,
    #[serde(rename = "Ref")]
    reference: String,
    #[serde(rename = "Alt")]
    alternate: String,
    #[serde(rename = "HGVS_cDNA")]
    hgvs_cdna: String,
}

/// Load variants from a tab-delimited file with a header line and the
/// columns `Gene_Symbol`, `Chr`, `Pos`, `Ref`, `Alt`, `HGVS_cDNA`.
///
/// Rows that cannot be parsed into a variant record (malformed position,
/// unknown gene symbol) are logged and skipped so one bad row cannot take
/// down a batch run.  Rows that parse but carry unsupported chromosomes or
/// alleles are kept; the evaluator reports those as unable to determine.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
fn load_variants_tsv<P>(path: P) -> Result<Vec<Variant>, anyhow::Error>
where
    P: AsRef<Path>,
{
    let reader = std::fs::File::open(path.as_ref())
        .map_err(|e| anyhow::anyhow!("problem opening file: {}", e))
        .map(std::io::BufReader::new)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);
    let mut variants = Vec::new();
    for (i, record) in csv_reader.deserialize().enumerate() {
        let row: VariantRow = match record {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("skipping unparseable variant row {}: {}", i + 1, e);
                continue;
            }
        };
        let Some(gene) = Gene::from_symbol(&row.gene_symbol) else {
            tracing::warn!(
                "skipping variant row {}: unknown gene symbol {}",
                i + 1,
                row.gene_symbol
            );
            continue;
        };
        variants.push(Variant {
            gene,
            chrom: row.chrom,
            position: row.position,
            reference: row.reference,
            alternate: row.alternate,
            hgvs_cdna: row.hgvs_cdna,
        });
    }
    Ok(variants)
}

/// Main entry point for the `priors` command.
///
/// # Arguments
///
/// * `common_args` - Commonly used command line arguments.
/// * `args` - Command line arguments specific to `priors` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `priors`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let mut variants = args.variants.clone();
    if let Some(path) = &args.path_variants {
        variants.extend(load_variants_tsv(path)?);
    }
    if variants.is_empty() {
        anyhow::bail!("no variants given on the command line or via --path-variants");
    }

    let transcripts = args
        .path_transcripts
        .iter()
        .map(Transcript::load_json)
        .collect::<Result<Vec<_>, _>>()?;
    let sequences = InMemorySequenceRepo::load_json(&args.path_sequences)?;
    let scorer = PssmScorer::load_json(&args.path_pssm)?;
    let protein_priors = match &args.path_protein_priors {
        Some(path) => InMemoryProteinPriors::load_tsv(path)?,
        None => InMemoryProteinPriors::default(),
    };

    let evaluator = eval::Evaluator::new(
        SpliceConfig::default(),
        args.boundary_source,
        transcripts,
        Box::new(sequences),
        Box::new(scorer),
        Box::new(protein_priors),
    );
    for variant in &variants {
        tracing::info!("- assessing {:?}", variant);
        let record = evaluator.evaluate(variant)?;
        println!("{}", serde_json::to_string(&record)?);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::priors::data::repo::SequenceRegion;
    use crate::priors::data::transcript::TranscriptRecord;
    use crate::priors::ds::{Gene, Strand};
    use crate::priors::eval::fixtures::synthetic_seq;
    use crate::priors::eval::scoring::{PssmScorer, WeightMatrix};

    fn write_data_files(dir: &std::path::Path) -> Result<(), anyhow::Error> {
        let record = TranscriptRecord {
            gene: Gene::Brca2,
            accession: "NM_000059.3".into(),
            chrom: "chr13".into(),
            strand: Strand::Plus,
            tx_start: 32315474,
            tx_end: 32399668,
            cds_start: 32316461,
            cds_end: 32398770,
            exon_count: 8,
            exon_starts: vec![
                32315474, 32316422, 32319077, 32325076, 32326101, 32356408, 32396898, 32398162,
            ],
            exon_ends: vec![
                32315667, 32316527, 32319325, 32325184, 32326150, 32356609, 32397044, 32399668,
            ],
        };
        std::fs::write(
            dir.join("brca2.json"),
            serde_json::to_string(&record)?,
        )?;

        let regions = vec![SequenceRegion {
            chrom: "chr13".into(),
            start: 32315000,
            sequence: synthetic_seq(32315000, 85_000),
        }];
        std::fs::write(
            dir.join("sequences.json"),
            serde_json::to_string(&regions)?,
        )?;

        let scorer = PssmScorer {
            donor: WeightMatrix(vec![[0.25, 0.25, 0.25, 0.25]; 9]),
            acceptor: WeightMatrix(vec![[0.25, 0.25, 0.25, 0.25]; 23]),
        };
        std::fs::write(dir.join("pssm.json"), serde_json::to_string(&scorer)?)?;

        std::fs::write(
            dir.join("protein.tsv"),
            "hgvs_cdna\tconsequence\tprior_prob\nc.1A>G\tmissense\t0.29\n",
        )?;
        std::fs::write(
            dir.join("variants.tsv"),
            "Gene_Symbol\tChr\tPos\tRef\tAlt\tHGVS_cDNA\nBRCA2\tchr13\t32325130\tG\tA\tc.10G>A\n",
        )?;
        Ok(())
    }

    #[test]
    fn run_smoke() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        write_data_files(dir.path())?;

        let common = crate::common::Args {
            verbose: clap_verbosity_flag::Verbosity::new(1, 0),
        };
        let args = super::Args {
            boundary_source: crate::priors::ds::BoundarySource::Enigma,
            path_transcripts: vec![dir.path().join("brca2.json")],
            path_sequences: dir.path().join("sequences.json"),
            path_pssm: dir.path().join("pssm.json"),
            path_protein_priors: Some(dir.path().join("protein.tsv")),
            path_variants: Some(dir.path().join("variants.tsv")),
            variants: vec!["BRCA2:32325183:T>A".parse()?],
        };

        super::run(&common, &args)
    }

    #[test]
    fn variant_tsv_parsing() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("variants.tsv"),
            "Gene_Symbol\tChr\tPos\tRef\tAlt\tHGVS_cDNA\n\
             BRCA1\tchr17\t43124018\tC\tT\tc.80C>T\n\
             BRCA2\t13\t32316461\tA\tG\tc.1A>G\n",
        )?;
        let variants = super::load_variants_tsv(dir.path().join("variants.tsv"))?;
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].gene, Gene::Brca1);
        assert_eq!(variants[0].hgvs_cdna, "c.80C>T");
        assert_eq!(variants[1].chrom, "13");
        assert!(variants[1].chrom_matches_gene());
        Ok(())
    }

    #[test]
    fn bad_variant_rows_are_skipped_not_fatal() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("variants.tsv"),
            "Gene_Symbol\tChr\tPos\tRef\tAlt\tHGVS_cDNA\n\
             BRCA2\tchr13\tnot_a_number\tA\tG\tc.1A>G\n\
             TP53\tchr17\t7675000\tC\tT\tc.100C>T\n\
             BRCA2\tchr13\t32325130\tG\tA\tc.10G>A\n",
        )?;
        let variants = super::load_variants_tsv(dir.path().join("variants.tsv"))?;
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].gene, Gene::Brca2);
        assert_eq!(variants[0].position, 32325130);
        Ok(())
    }
}
