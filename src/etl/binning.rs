use crate::error::{EtlError, Result};

pub const DEFAULT_AGE_EDGES: [i64; 5] = [16, 25, 40, 65, 100];
pub const DEFAULT_AGE_LABELS: [&str; 4] = ["16-25", "26-40", "41-65", "65+"];

/// Ordered age buckets.
///
/// Bucket `i` covers `[edges[i], edges[i + 1])`, except the last bucket which
/// also contains its upper edge. Values outside `[edges[0], edges[n]]` have no
/// bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeBins {
    edges: Vec<i64>,
    labels: Vec<String>,
}

impl AgeBins {
    /// # Errors
    ///
    /// Returns [`EtlError::Config`] unless there are at least two strictly
    /// increasing edges and exactly one label per bucket.
    pub fn new(edges: Vec<i64>, labels: Vec<String>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(EtlError::Config(format!(
                "age bins need at least two edges, got {}",
                edges.len()
            )));
        }
        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(EtlError::Config(format!(
                "age bin edges must be strictly increasing: {edges:?}"
            )));
        }
        if labels.len() != edges.len() - 1 {
            return Err(EtlError::Config(format!(
                "{} age bin edges need {} labels, got {}",
                edges.len(),
                edges.len() - 1,
                labels.len()
            )));
        }
        Ok(Self { edges, labels })
    }

    pub fn label_for(&self, age: i64) -> Option<&str> {
        let last = self.labels.len() - 1;
        self.edges
            .windows(2)
            .zip(&self.labels)
            .enumerate()
            .find(|(i, (edge, _))| {
                let (lower, upper) = (edge[0], edge[1]);
                if *i == last {
                    (lower..=upper).contains(&age)
                } else {
                    (lower..upper).contains(&age)
                }
            })
            .map(|(_, (_, label))| label.as_str())
    }
}

impl Default for AgeBins {
    fn default() -> Self {
        Self {
            edges: DEFAULT_AGE_EDGES.to_vec(),
            labels: DEFAULT_AGE_LABELS.iter().map(|l| (*l).to_owned()).collect(),
        }
    }
}
