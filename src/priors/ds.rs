//! Shared data structures for `priors`.

use std::str::FromStr;

/// The two genes handled by the engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
pub enum Gene {
    /// BRCA1 on chr17, minus strand.
    #[serde(rename = "BRCA1")]
    #[strum(serialize = "BRCA1")]
    Brca1,
    /// BRCA2 on chr13, plus strand.
    #[serde(rename = "BRCA2")]
    #[strum(serialize = "BRCA2")]
    Brca2,
}

impl Gene {
    /// Return the coding strand of the gene.
    pub fn strand(self) -> Strand {
        match self {
            Gene::Brca1 => Strand::Minus,
            Gene::Brca2 => Strand::Plus,
        }
    }

    /// Return the chromosome name, e.g., `"chr17"`.
    pub fn chrom(self) -> &'static str {
        match self {
            Gene::Brca1 => "chr17",
            Gene::Brca2 => "chr13",
        }
    }

    /// Return the bare chromosome number, e.g., `"17"`.
    pub fn chrom_no(self) -> &'static str {
        match self {
            Gene::Brca1 => "17",
            Gene::Brca2 => "13",
        }
    }

    /// Resolve a gene symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "BRCA1" => Some(Gene::Brca1),
            "BRCA2" => Some(Gene::Brca2),
            _ => None,
        }
    }
}

/// Coding strand of a transcript.
///
/// All window and boundary arithmetic is carried out in transcription order;
/// the strand decides how transcription order maps to genomic coordinates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
pub enum Strand {
    /// Transcription runs with increasing genomic coordinate.
    #[serde(rename = "+")]
    Plus,
    /// Transcription runs against increasing genomic coordinate.
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// Move `pos` by `delta` bases in transcription direction.
    pub fn offset(self, pos: i64, delta: i64) -> i64 {
        match self {
            Strand::Plus => pos + delta,
            Strand::Minus => pos - delta,
        }
    }

    /// Signed distance from `from` to `to` in transcription direction.
    pub fn distance(self, from: i64, to: i64) -> i64 {
        match self {
            Strand::Plus => to - from,
            Strand::Minus => from - to,
        }
    }

    /// Closed-interval membership of `pos` in a window given in
    /// transcription order (`start` is 5', `end` is 3').
    ///
    /// Both endpoints belong to the window, on either strand.
    pub fn contains(self, pos: i64, start: i64, end: i64) -> bool {
        match self {
            Strand::Plus => pos >= start && pos <= end,
            Strand::Minus => pos <= start && pos >= end,
        }
    }
}

/// Splice site type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SiteType {
    /// Splice donor (5' splice site), scored over a 9-base window.
    Donor,
    /// Splice acceptor (3' splice site), scored over a 23-base window.
    Acceptor,
}

/// Variant type derived from reference/alternate allele lengths.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariantType {
    Substitution,
    Insertion,
    Deletion,
    Delins,
    /// Alleles outside the accepted alphabet or otherwise unusable.
    Other,
}

/// Accepted nucleotide alphabet (four canonical bases plus the ambiguity
/// codes carried through from upstream curation).
pub fn check_sequence(sequence: &str) -> bool {
    !sequence.is_empty()
        && sequence
            .chars()
            .all(|c| matches!(c, 'A' | 'C' | 'G' | 'T' | 'N' | 'R' | 'Y'))
}

/// Representation of one input variant.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Variant {
    /// Gene symbol.
    pub gene: Gene,
    /// Chromosome name as given by the caller, e.g., `"chr13"` or `"13"`.
    pub chrom: String,
    /// 1-based genomic position of the first reference base.
    pub position: i64,
    /// Reference allele.
    pub reference: String,
    /// Alternate allele.
    pub alternate: String,
    /// Transcript-relative HGVS description, diagnostics only.
    pub hgvs_cdna: String,
}

impl Variant {
    /// Derive the variant type from the allele strings.
    pub fn var_type(&self) -> VariantType {
        if !check_sequence(&self.reference) || !check_sequence(&self.alternate) {
            return VariantType::Other;
        }
        let (r, a) = (self.reference.len(), self.alternate.len());
        if r == a {
            if r == 1 {
                VariantType::Substitution
            } else {
                VariantType::Delins
            }
        } else if r > a {
            if a == 1 {
                VariantType::Deletion
            } else {
                VariantType::Delins
            }
        } else if r == 1 {
            VariantType::Insertion
        } else {
            VariantType::Delins
        }
    }

    /// Genomic extent covered by the reference allele, ascending, inclusive.
    pub fn span(&self) -> (i64, i64) {
        (
            self.position,
            self.position + self.reference.len() as i64 - 1,
        )
    }

    /// Whether the chromosome field matches the gene's chromosome.
    pub fn chrom_matches_gene(&self) -> bool {
        self.chrom == self.gene.chrom() || self.chrom == self.gene.chrom_no()
    }

    /// Strand of the variant's gene.
    pub fn strand(&self) -> Strand {
        self.gene.strand()
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    /// Parse a variant literal of the form `GENE:POS:REF>ALT`, e.g.,
    /// `BRCA2:32316461:A>G`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(':');
        let gene = fields
            .next()
            .and_then(Gene::from_symbol)
            .ok_or_else(|| anyhow::anyhow!("unknown gene symbol in variant literal: {}", s))?;
        let position = fields
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing position in variant literal: {}", s))?
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("invalid position in {}: {}", s, e))?;
        let alleles = fields
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing alleles in variant literal: {}", s))?;
        let (reference, alternate) = alleles
            .split_once('>')
            .ok_or_else(|| anyhow::anyhow!("alleles must be given as REF>ALT: {}", s))?;
        if fields.next().is_some() {
            anyhow::bail!("trailing fields in variant literal: {}", s);
        }
        Ok(Variant {
            chrom: gene.chrom().to_string(),
            gene,
            position,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
            hgvs_cdna: "-".to_string(),
        })
    }
}

/// Three-state flag: several decisions must distinguish "evaluated false"
/// from "branch never evaluated for this variant category".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize,
)]
pub enum Flag {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
    /// The branch computing this flag was short-circuited.
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value {
            Flag::True
        } else {
            Flag::False
        }
    }
}

impl Flag {
    /// Whether the flag was evaluated and is true.
    pub fn is_true(self) -> bool {
        self == Flag::True
    }
}

/// Fixed prior probability tiers.
///
/// Each tier is bound one-to-one to a probability value; the mapping is
/// monotonic.  `NotApplicable` is the context-only sentinel used when a
/// decision path was not exercised or defers to a non-prior pathway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prior {
    DeNovoLow,
    ProteinLow,
    Low,
    ProteinModerate,
    DeNovoModerate,
    Moderate,
    /// Empirically capped tier for the excepted exons in splice rescue.
    Capped,
    DeNovoHigh,
    ProteinHigh,
    High,
    Pathogenic,
    #[default]
    NotApplicable,
}

impl Prior {
    /// The fixed probability bound to the tier; `None` for the sentinel.
    pub fn probability(self) -> Option<f64> {
        match self {
            Prior::DeNovoLow => Some(0.02),
            Prior::ProteinLow => Some(0.03),
            Prior::Low => Some(0.04),
            Prior::ProteinModerate => Some(0.29),
            Prior::DeNovoModerate => Some(0.30),
            Prior::Moderate => Some(0.34),
            Prior::Capped => Some(0.50),
            Prior::DeNovoHigh => Some(0.64),
            Prior::ProteinHigh => Some(0.81),
            Prior::High => Some(0.97),
            Prior::Pathogenic => Some(0.99),
            Prior::NotApplicable => None,
        }
    }

    /// Resolve a probability value back to its tier.
    pub fn from_probability(p: f64) -> Option<Self> {
        [
            Prior::DeNovoLow,
            Prior::ProteinLow,
            Prior::Low,
            Prior::ProteinModerate,
            Prior::DeNovoModerate,
            Prior::Moderate,
            Prior::Capped,
            Prior::DeNovoHigh,
            Prior::ProteinHigh,
            Prior::High,
            Prior::Pathogenic,
        ]
        .into_iter()
        .find(|tier| {
            tier.probability()
                .map(|q| (q - p).abs() < 1e-9)
                .unwrap_or(false)
        })
    }

    /// The ENIGMA class matching the tier's probability.
    pub fn enigma_class(self) -> EnigmaClass {
        match self.probability() {
            Some(p) => EnigmaClass::from_probability(p),
            None => EnigmaClass::NotApplicable,
        }
    }
}

impl PartialOrd for Prior {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Prior {
    /// Tiers order by probability; the sentinel orders below every tier so
    /// that `max` over candidates never selects it when a real tier applies.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.probability(), other.probability()) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(a), Some(b)) => a.partial_cmp(&b).expect("tier probabilities are finite"),
        }
    }
}

// The wire form of a prior is its probability value (or "N/A"), matching
// the original report format.
impl serde::Serialize for Prior {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.probability() {
            Some(p) => serializer.serialize_f64(p),
            None => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Prior {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PriorVisitor;

        impl serde::de::Visitor<'_> for PriorVisitor {
            type Value = Prior;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a fixed prior probability or \"N/A\"")
            }

            fn visit_f64<E>(self, v: f64) -> Result<Prior, E>
            where
                E: serde::de::Error,
            {
                Prior::from_probability(v)
                    .ok_or_else(|| E::custom(format!("not a fixed prior probability: {}", v)))
            }

            fn visit_str<E>(self, v: &str) -> Result<Prior, E>
            where
                E: serde::de::Error,
            {
                if v == "N/A" {
                    Ok(Prior::NotApplicable)
                } else {
                    Err(E::custom(format!("expected \"N/A\", got {:?}", v)))
                }
            }
        }

        deserializer.deserialize_any(PriorVisitor)
    }
}

/// Discrete ENIGMA classification tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Deserialize,
    serde::Serialize,
)]
pub enum EnigmaClass {
    #[serde(rename = "class_1")]
    Class1,
    #[serde(rename = "class_2")]
    Class2,
    #[serde(rename = "class_3")]
    Class3,
    #[serde(rename = "class_4")]
    Class4,
    #[serde(rename = "class_5")]
    Class5,
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl EnigmaClass {
    /// Bucket a probability into its class.  Tier boundaries are inclusive
    /// on the lower bound of each class.
    pub fn from_probability(p: f64) -> Self {
        if p < 0.03 {
            EnigmaClass::Class1
        } else if p < 0.34 {
            EnigmaClass::Class2
        } else if p < 0.97 {
            EnigmaClass::Class3
        } else if p < 0.99 {
            EnigmaClass::Class4
        } else {
            EnigmaClass::Class5
        }
    }
}

/// Which curation source supplies the clinically important domain windows.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    clap::ValueEnum,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BoundarySource {
    /// ENIGMA consortium domain boundaries.
    Enigma,
    /// Boundaries curated for the priors computation.
    Priors,
}

/// Protein-level consequence of a variant, as supplied by the protein
/// prior table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Consequence {
    Missense,
    /// Premature stop codon.
    Nonsense,
    Synonymous,
    #[default]
    #[serde(rename = "N/A")]
    #[strum(serialize = "N/A")]
    NotApplicable,
}
