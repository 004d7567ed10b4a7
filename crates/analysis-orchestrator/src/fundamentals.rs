use analysis_core::{FinancialStatement, StatementPeriod};
use serde::Serialize;

const REVENUE: &str = "totalRevenue";
const NET_INCOME: &str = "netIncome";

/// Year-over-year screen used alongside the Golden Cross.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FundamentalSnapshot {
    pub revenue_growth: Option<f64>,
    pub profit_margin: Option<f64>,
}

fn item_or_zero(period: &StatementPeriod, name: &str) -> f64 {
    period.line_item(name).unwrap_or(0.0)
}

impl FundamentalSnapshot {
    /// Built from the two newest income-statement periods; absent line items read as 0.
    pub fn from_income_statement(statement: &FinancialStatement) -> Self {
        let Some(current) = statement.periods.first() else {
            return Self::default();
        };

        let revenue = item_or_zero(current, REVENUE);
        let profit_margin = if revenue == 0.0 {
            None
        } else {
            Some(item_or_zero(current, NET_INCOME) / revenue)
        };

        let revenue_growth = statement.periods.get(1).and_then(|previous| {
            let previous_revenue = item_or_zero(previous, REVENUE);
            if previous_revenue == 0.0 {
                None
            } else {
                Some((revenue - previous_revenue) / previous_revenue)
            }
        });

        Self {
            revenue_growth,
            profit_margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::StatementKind;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn period(year: i32, items: &[(&str, f64)]) -> StatementPeriod {
        StatementPeriod {
            end_date: NaiveDate::from_ymd_opt(year, 3, 31).unwrap(),
            line_items: items
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn income(periods: Vec<StatementPeriod>) -> FinancialStatement {
        FinancialStatement {
            symbol: "TCS.NS".to_string(),
            kind: StatementKind::ProfitAndLoss,
            periods,
        }
    }

    #[test]
    fn test_growth_and_margin() {
        let statement = income(vec![
            period(2023, &[(REVENUE, 1100.0), (NET_INCOME, 220.0)]),
            period(2022, &[(REVENUE, 1000.0), (NET_INCOME, 150.0)]),
        ]);
        let snapshot = FundamentalSnapshot::from_income_statement(&statement);

        assert!((snapshot.revenue_growth.unwrap() - 0.1).abs() < 1e-12);
        assert!((snapshot.profit_margin.unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_previous_revenue() {
        let statement = income(vec![
            period(2023, &[(REVENUE, 500.0), (NET_INCOME, 50.0)]),
            period(2022, &[(NET_INCOME, -10.0)]),
        ]);
        let snapshot = FundamentalSnapshot::from_income_statement(&statement);

        assert_eq!(snapshot.revenue_growth, None);
        assert_eq!(snapshot.profit_margin, Some(0.1));
    }

    #[test]
    fn test_zero_current_revenue() {
        let statement = income(vec![period(2023, &[(NET_INCOME, 5.0)])]);
        let snapshot = FundamentalSnapshot::from_income_statement(&statement);

        assert_eq!(snapshot, FundamentalSnapshot::default());
    }

    #[test]
    fn test_single_period_has_no_growth() {
        let statement = income(vec![period(2023, &[(REVENUE, 100.0)])]);
        let snapshot = FundamentalSnapshot::from_income_statement(&statement);

        assert_eq!(snapshot.revenue_growth, None);
        assert_eq!(snapshot.profit_margin, Some(0.0));
    }
}
