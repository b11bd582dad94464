//! JSON-serializable views of solver output, used by the CLI's `--json`
//! mode. Tiles serialize as notation strings (`"r13"`, `"u7"`).

use serde::{Deserialize, Serialize};

use crate::solver::{BestMove, Decomposition, Meld, MeldKind};

/// JSON representation of a meld.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MeldJson {
    #[serde(rename = "set")]
    Set { tiles: Vec<String> },
    #[serde(rename = "run")]
    Run { tiles: Vec<String> },
}

impl From<&Meld> for MeldJson {
    fn from(meld: &Meld) -> Self {
        let tiles = meld.tiles().iter().map(|t| t.to_string()).collect();
        match meld.kind() {
            MeldKind::Set => MeldJson::Set { tiles },
            MeldKind::Run => MeldJson::Run { tiles },
        }
    }
}

/// JSON representation of one decomposition.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecompositionJson {
    pub melds: Vec<MeldJson>,
    pub residual: Vec<String>,
    pub residual_count: usize,
    pub residual_points: u32,
}

impl From<&Decomposition> for DecompositionJson {
    fn from(decomposition: &Decomposition) -> Self {
        DecompositionJson {
            melds: decomposition.melds.iter().map(MeldJson::from).collect(),
            residual: decomposition.residual.iter().map(|t| t.to_string()).collect(),
            residual_count: decomposition.residual.len(),
            residual_points: decomposition.residual.point_sum(),
        }
    }
}

/// Full solver report: one decomposition per objective.
#[derive(Debug, Serialize, Deserialize)]
pub struct SolveReport {
    pub by_count: DecompositionJson,
    pub by_sum: DecompositionJson,
}

impl From<&BestMove> for SolveReport {
    fn from(best: &BestMove) -> Self {
        SolveReport {
            by_count: DecompositionJson::from(&best.by_count),
            by_sum: DecompositionJson::from(&best.by_sum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::find_best_move;
    use crate::TileCollection;

    #[test]
    fn test_report_shape() {
        let hand: TileCollection = "r5.y5.u5.k5.r1".parse().unwrap();
        let report = SolveReport::from(&find_best_move(&hand));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["by_count"]["melds"][0]["kind"], "set");
        assert_eq!(json["by_count"]["residual"][0], "r1");
        assert_eq!(json["by_count"]["residual_count"], 1);
        assert_eq!(json["by_count"]["residual_points"], 1);
        assert_eq!(json["by_sum"]["residual_count"], 1);
    }

    #[test]
    fn test_report_roundtrip() {
        let hand: TileCollection = "r1.r2.r3".parse().unwrap();
        let report = SolveReport::from(&find_best_move(&hand));

        let json = serde_json::to_string(&report).unwrap();
        let parsed: SolveReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.by_count.residual_count, 0);
        assert!(matches!(parsed.by_count.melds[0], MeldJson::Run { .. }));
    }
}
