//! Output record of the engine.
//!
//! Every evaluation produces the same key set; branches not exercised
//! for a variant carry the `"N/A"` sentinel instead of being omitted, so
//! consumers can distinguish "not evaluated" from "evaluated and zero".

use crate::priors::ds::{
    BoundarySource, Consequence, EnigmaClass, Flag, Gene, Prior, VariantType,
};
use crate::priors::eval::denovo::DeNovoOutcome;
use crate::priors::eval::location::{Location, StructuralLocation};
use crate::priors::eval::rescue::RescueOutcome;
use crate::priors::eval::scoring::ScorePair;
use crate::priors::eval::sequence::RefAltSeqs;

/// Numeric record field with the `"N/A"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    Value(f64),
    #[default]
    NotApplicable,
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Metric::Value(value)
    }
}

impl serde::Serialize for Metric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Metric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MetricVisitor;

        impl serde::de::Visitor<'_> for MetricVisitor {
            type Value = Metric;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a number or \"N/A\"")
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Metric, E> {
                Ok(Metric::Value(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Metric, E> {
                Ok(Metric::Value(v as f64))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Metric, E> {
                Ok(Metric::Value(v as f64))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Metric, E> {
                if v == "N/A" {
                    Ok(Metric::NotApplicable)
                } else {
                    Err(E::custom(format!("expected \"N/A\", got {:?}", v)))
                }
            }
        }

        deserializer.deserialize_any(MetricVisitor)
    }
}

/// Coordinate/length record field with the `"N/A"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coord {
    Value(i64),
    #[default]
    NotApplicable,
}

impl From<i64> for Coord {
    fn from(value: i64) -> Self {
        Coord::Value(value)
    }
}

impl serde::Serialize for Coord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Coord::Value(v) => serializer.serialize_i64(*v),
            Coord::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Coord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct CoordVisitor;

        impl serde::de::Visitor<'_> for CoordVisitor {
            type Value = Coord;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an integer or \"N/A\"")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Coord, E> {
                Ok(Coord::Value(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Coord, E> {
                i64::try_from(v)
                    .map(Coord::Value)
                    .map_err(|_| E::custom("coordinate out of range"))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Coord, E> {
                if v == "N/A" {
                    Ok(Coord::NotApplicable)
                } else {
                    Err(E::custom(format!("expected \"N/A\", got {:?}", v)))
                }
            }
        }

        deserializer.deserialize_any(CoordVisitor)
    }
}

/// String record field (sequences, exon labels) with the `"N/A"`
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Text {
    Value(String),
    #[default]
    NotApplicable,
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::Value(value.to_string())
    }
}

impl serde::Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Text::Value(v) => serializer.serialize_str(v),
            Text::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TextVisitor;

        impl serde::de::Visitor<'_> for TextVisitor {
            type Value = Text;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a string")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Text, E> {
                if v == "N/A" {
                    Ok(Text::NotApplicable)
                } else {
                    Ok(Text::Value(v.to_string()))
                }
            }
        }

        deserializer.deserialize_str(TextVisitor)
    }
}

/// Whether the engine could classify the variant at all.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Determination {
    #[default]
    Computed,
    /// Garbage input: unsupported chromosome, malformed alleles, or a
    /// position the model cannot place.  The record is sentinel-filled.
    UnableToDetermine,
}

/// Location section of the record: one tag for single-position
/// variants, the tag set for ranged ones.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationReport {
    Single(Location),
    Ranged(StructuralLocation),
    NotApplicable,
}

/// Reference splice site scores under both alleles.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct SiteScores {
    pub exon: Text,
    pub ref_seq: Text,
    pub alt_seq: Text,
    pub ref_mes: Metric,
    pub ref_z: Metric,
    pub alt_mes: Metric,
    pub alt_z: Metric,
    /// Prior contributed by the reference-site decision table.
    pub prior: Prior,
}

impl SiteScores {
    /// Build the section from scored windows.
    pub fn from_scores(
        exon_label: &str,
        seqs: &RefAltSeqs,
        ref_scores: ScorePair,
        alt_scores: ScorePair,
        prior: Prior,
    ) -> Self {
        Self {
            exon: Text::Value(exon_label.to_string()),
            ref_seq: Text::Value(seqs.ref_seq.clone()),
            alt_seq: Text::Value(seqs.alt_seq.clone()),
            ref_mes: Metric::Value(ref_scores.mes),
            ref_z: Metric::Value(ref_scores.z),
            alt_mes: Metric::Value(alt_scores.mes),
            alt_z: Metric::Value(alt_scores.z),
            prior,
        }
    }
}

/// De novo search section of the record.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct DeNovoReport {
    pub exon: Text,
    pub ref_seq: Text,
    pub alt_seq: Text,
    pub ref_mes: Metric,
    pub ref_z: Metric,
    pub alt_mes: Metric,
    pub alt_z: Metric,
    pub window_pos: Coord,
    pub in_exonic_portion: Flag,
    pub new_splice_position: Coord,
    pub ref_exon_length: Coord,
    pub alt_exon_length: Coord,
    pub frameshift: Flag,
    pub alt_greater_ref: Flag,
    pub alt_greater_closest_ref: Flag,
    pub alt_greater_closest_alt: Flag,
    pub closest_exon: Text,
    pub closest_ref_mes: Metric,
    pub closest_ref_z: Metric,
    pub closest_alt_mes: Metric,
    pub closest_alt_z: Metric,
    /// Prior contributed by the de novo decision ladder.
    pub prior: Prior,
}

impl From<&DeNovoOutcome> for DeNovoReport {
    fn from(outcome: &DeNovoOutcome) -> Self {
        Self {
            exon: Text::Value(outcome.exon_label.clone()),
            ref_seq: Text::Value(outcome.scan.ref_window.clone()),
            alt_seq: Text::Value(outcome.scan.alt_window.clone()),
            ref_mes: Metric::Value(outcome.scan.ref_scores.mes),
            ref_z: Metric::Value(outcome.scan.ref_scores.z),
            alt_mes: Metric::Value(outcome.scan.alt_scores.mes),
            alt_z: Metric::Value(outcome.scan.alt_scores.z),
            window_pos: Coord::Value(outcome.scan.window_pos),
            in_exonic_portion: Flag::from(outcome.scan.in_exonic_portion),
            new_splice_position: Coord::Value(outcome.frame.new_splice_position),
            ref_exon_length: Coord::Value(outcome.frame.ref_exon_length),
            alt_exon_length: Coord::Value(outcome.frame.alt_exon_length),
            frameshift: Flag::from(outcome.frame.frameshift),
            alt_greater_ref: Flag::from(outcome.alt_greater_ref),
            alt_greater_closest_ref: Flag::from(outcome.alt_greater_closest_ref),
            alt_greater_closest_alt: Flag::from(outcome.alt_greater_closest_alt),
            closest_exon: Text::Value(outcome.closest.exon_label.clone()),
            closest_ref_mes: Metric::Value(outcome.closest.ref_scores.mes),
            closest_ref_z: Metric::Value(outcome.closest.ref_scores.z),
            closest_alt_mes: Metric::Value(outcome.closest.alt_scores.mes),
            closest_alt_z: Metric::Value(outcome.closest.alt_scores.z),
            prior: outcome.prior,
        }
    }
}

/// Protein-impact section of the record.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, serde::Deserialize, serde::Serialize,
)]
pub struct ProteinReport {
    pub consequence: Consequence,
    pub prior: Prior,
}

/// Full diagnostic record for one variant.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PriorsRecord {
    pub gene: Gene,
    pub chrom: String,
    pub position: i64,
    pub reference: String,
    pub alternate: String,
    pub hgvs_cdna: String,
    pub var_type: VariantType,
    pub boundary_source: BoundarySource,
    pub determination: Determination,
    pub location: LocationReport,
    /// The single applicable prior after precedence resolution.
    pub applicable_prior: Prior,
    pub applicable_class: EnigmaClass,
    pub ref_donor: SiteScores,
    pub ref_acceptor: SiteScores,
    pub de_novo_donor: DeNovoReport,
    pub de_novo_acceptor: DeNovoReport,
    pub protein: ProteinReport,
    pub rescue: RescueOutcome,
}

impl PriorsRecord {
    /// Sentinel-filled record skeleton for a variant.
    pub fn skeleton(
        gene: Gene,
        chrom: &str,
        position: i64,
        reference: &str,
        alternate: &str,
        hgvs_cdna: &str,
        var_type: VariantType,
        boundary_source: BoundarySource,
    ) -> Self {
        Self {
            gene,
            chrom: chrom.to_string(),
            position,
            reference: reference.to_string(),
            alternate: alternate.to_string(),
            hgvs_cdna: hgvs_cdna.to_string(),
            var_type,
            boundary_source,
            determination: Determination::Computed,
            location: LocationReport::NotApplicable,
            applicable_prior: Prior::NotApplicable,
            applicable_class: EnigmaClass::NotApplicable,
            ref_donor: SiteScores::default(),
            ref_acceptor: SiteScores::default(),
            de_novo_donor: DeNovoReport::default(),
            de_novo_acceptor: DeNovoReport::default(),
            protein: ProteinReport::default(),
            rescue: RescueOutcome::default(),
        }
    }
}
