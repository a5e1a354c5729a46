//! Splice motif strength scoring.
//!
//! The positional scoring model itself is an external collaborator behind
//! the [`MotifScorer`] trait; this module wraps it with the gene-wide
//! normalization statistics to produce `(raw, z)` score pairs.  Windows are
//! expected in 5'-to-3' transcription orientation.

use std::path::Path;

use crate::priors::data::config::ZScoreConfig;
use crate::priors::ds::SiteType;

/// Raw motif strength score and its normalized z-score.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ScorePair {
    /// Raw motif strength score (unbounded; higher is stronger).
    pub mes: f64,
    /// `(mes - mean) / std` under the site-type population statistics.
    pub z: f64,
}

/// Positional scoring model for splice motifs.
pub trait MotifScorer {
    /// Score a 9-base donor window.
    ///
    /// # Errors
    ///
    /// Fails on malformed windows (wrong length, unexpected characters).
    fn score_donor(&self, window: &str) -> Result<f64, anyhow::Error>;

    /// Score a 23-base acceptor window.
    ///
    /// # Errors
    ///
    /// Fails on malformed windows (wrong length, unexpected characters).
    fn score_acceptor(&self, window: &str) -> Result<f64, anyhow::Error>;
}

/// Scoring facade combining the model with normalization statistics.
pub struct Scoring<'a> {
    scorer: &'a dyn MotifScorer,
    zscores: &'a ZScoreConfig,
}

impl<'a> Scoring<'a> {
    pub fn new(scorer: &'a dyn MotifScorer, zscores: &'a ZScoreConfig) -> Self {
        Self { scorer, zscores }
    }

    /// Score one window, returning the raw score and its z-score.
    ///
    /// # Errors
    ///
    /// Propagates scorer failures.
    pub fn score(&self, site: SiteType, window: &str) -> Result<ScorePair, anyhow::Error> {
        let mes = match site {
            SiteType::Donor => self.scorer.score_donor(window)?,
            SiteType::Acceptor => self.scorer.score_acceptor(window)?,
        };
        let stats = self.zscores.stats(site);
        Ok(ScorePair {
            mes,
            z: (mes - stats.mean) / stats.std,
        })
    }
}

/// Position weight matrix over `A`, `C`, `G`, `T`.
///
/// Ambiguity codes are tolerated and contribute nothing to the score.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WeightMatrix(pub Vec<[f64; 4]>);

impl WeightMatrix {
    fn score(&self, window: &str) -> Result<f64, anyhow::Error> {
        if window.len() != self.0.len() {
            anyhow::bail!(
                "window length {} does not match matrix length {}",
                window.len(),
                self.0.len()
            );
        }
        Ok(window
            .chars()
            .zip(self.0.iter())
            .map(|(base, row)| match base {
                'A' => row[0],
                'C' => row[1],
                'G' => row[2],
                'T' => row[3],
                _ => 0.0,
            })
            .sum())
    }
}

/// Position-weight-matrix scoring model, loadable from JSON.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PssmScorer {
    /// 9 rows for the donor motif.
    pub donor: WeightMatrix,
    /// 23 rows for the acceptor motif.
    pub acceptor: WeightMatrix,
}

impl PssmScorer {
    /// Load the matrices from a JSON file.
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
        let scorer: PssmScorer = serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("problem parsing matrix JSON: {}", e))?;
        if scorer.donor.0.len() != 9 || scorer.acceptor.0.len() != 23 {
            anyhow::bail!(
                "matrix dimensions must be 9 (donor) and 23 (acceptor), got {} and {}",
                scorer.donor.0.len(),
                scorer.acceptor.0.len()
            );
        }
        Ok(scorer)
    }
}

impl MotifScorer for PssmScorer {
    fn score_donor(&self, window: &str) -> Result<f64, anyhow::Error> {
        self.donor.score(window)
    }

    fn score_acceptor(&self, window: &str) -> Result<f64, anyhow::Error> {
        self.acceptor.score(window)
    }
}

/// Table-backed scorer: explicit per-window scores with a default for
/// everything else.  Used for tests and for precomputed score dumps.
#[derive(Debug, Clone, Default)]
pub struct TableScorer {
    donor: rustc_hash::FxHashMap<String, f64>,
    acceptor: rustc_hash::FxHashMap<String, f64>,
    default: f64,
}

impl TableScorer {
    /// Create an empty table returning `default` for unknown windows.
    pub fn with_default(default: f64) -> Self {
        Self {
            default,
            ..Default::default()
        }
    }

    /// Register a window score.
    pub fn insert(&mut self, site: SiteType, window: &str, score: f64) {
        match site {
            SiteType::Donor => self.donor.insert(window.to_string(), score),
            SiteType::Acceptor => self.acceptor.insert(window.to_string(), score),
        };
    }
}

impl MotifScorer for TableScorer {
    fn score_donor(&self, window: &str) -> Result<f64, anyhow::Error> {
        if window.len() != 9 {
            anyhow::bail!("donor window must have 9 bases, got {}", window.len());
        }
        Ok(self.donor.get(window).copied().unwrap_or(self.default))
    }

    fn score_acceptor(&self, window: &str) -> Result<f64, anyhow::Error> {
        if window.len() != 23 {
            anyhow::bail!("acceptor window must have 23 bases, got {}", window.len());
        }
        Ok(self.acceptor.get(window).copied().unwrap_or(self.default))
    }
}
