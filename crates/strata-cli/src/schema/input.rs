use serde::{Deserialize, Serialize};
use strata_core::{
    MatrixError,
    model::{BurndownHeader, SparseAgeBandMatrix},
};

/// A decoded burndown record, as produced by an upstream extractor.
///
/// ```json
/// {
///   "name": "my-project",
///   "header": {
///     "start": 1704067200,
///     "last": 1735603200,
///     "sampling": 30,
///     "granularity": 30,
///     "tick_size": 86400
///   },
///   "matrix": [[1200, 1100], [0, 800]]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurndownInput {
    /// Name of the analyzed entity (project, file or author)
    pub name: String,
    pub header: BurndownHeader,
    /// Surviving line counts, one row per age band, one column per sample
    pub matrix: Vec<Vec<u64>>,
}

impl BurndownInput {
    pub fn sparse_matrix(&self) -> Result<SparseAgeBandMatrix, MatrixError> {
        SparseAgeBandMatrix::from_rows(self.matrix.clone())
    }

    /// Whether no band of `matrix` reports lines before it was written,
    /// judged with this record's sampling and granularity.
    pub fn is_causal(&self, matrix: &SparseAgeBandMatrix) -> bool {
        let params = self.header.params;
        matrix.is_causal(params.granularity as usize, params.sampling as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_document() {
        let input: BurndownInput = serde_json::from_str(
            r#"{
                "name": "demo",
                "header": {"start": 0, "last": 86400, "sampling": 1, "granularity": 1, "tick_size": 86400},
                "matrix": [[10, 9], [0, 5]]
            }"#,
        )
        .unwrap();
        assert_eq!(input.name, "demo");
        assert_eq!(input.header.params.sampling, 1);
        let matrix = input.sparse_matrix().unwrap();
        assert_eq!((matrix.rows(), matrix.cols()), (2, 2));
    }

    #[test]
    fn test_causality_uses_header_parameters() {
        let mut input: BurndownInput = serde_json::from_str(
            r#"{
                "name": "demo",
                "header": {"start": 0, "last": 0, "sampling": 1, "granularity": 3, "tick_size": 86400},
                "matrix": [[9, 9], [4, 4]]
            }"#,
        )
        .unwrap();
        // Band 1 starts on day 3, after both one-day samples.
        let matrix = input.sparse_matrix().unwrap();
        assert!(!input.is_causal(&matrix));

        input.header.params.granularity = 1;
        assert!(input.is_causal(&matrix));
    }

    #[test]
    fn test_ragged_matrix_is_rejected() {
        let input = BurndownInput {
            name: "demo".to_owned(),
            header: serde_json::from_str(
                r#"{"start": 0, "last": 0, "sampling": 1, "granularity": 1, "tick_size": 86400}"#,
            )
            .unwrap(),
            matrix: vec![vec![1, 2], vec![3]],
        };
        assert!(matches!(
            input.sparse_matrix(),
            Err(MatrixError::Ragged { row: 1, .. })
        ));
    }
}
