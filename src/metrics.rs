use crate::table::LabelSet;

/// Unions the metric labels of both reports. The annual report defines the
/// catalogue, so its labels come first in their original order; metrics that
/// only the quarterly report carries are appended in quarterly order.
pub fn merge_metric_keys(annual: &LabelSet, quarterly: &LabelSet) -> LabelSet {
    annual.iter().chain(quarterly.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_order_first_then_quarterly_additions() {
        let annual: LabelSet = ["Revenue", "EBITDA", "Net income"].into_iter().collect();
        let quarterly: LabelSet = ["Net income", "Dividend", "Revenue", "Capex"]
            .into_iter()
            .collect();

        let merged = merge_metric_keys(&annual, &quarterly);

        assert_eq!(
            merged.as_slice(),
            &["Revenue", "EBITDA", "Net income", "Dividend", "Capex"]
        );
    }

    #[test]
    fn test_empty_sides() {
        let annual = LabelSet::new();
        let quarterly: LabelSet = ["Revenue"].into_iter().collect();

        assert_eq!(merge_metric_keys(&annual, &quarterly).as_slice(), &["Revenue"]);
        assert_eq!(merge_metric_keys(&quarterly, &annual).as_slice(), &["Revenue"]);
    }
}
