//! Decoding of quote-summary statements and quote snapshots.

use std::collections::BTreeMap;

use analysis_core::{
    AnalysisError, FetchFailure, FinancialStatement, QuoteSnapshot, StatementKind, StatementPeriod,
};
use chrono::DateTime;
use serde_json::Value;

/// quoteSummary module holding each statement kind
pub fn module_name(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::BalanceSheet => "balanceSheetHistory",
        StatementKind::ProfitAndLoss => "incomeStatementHistory",
        StatementKind::CashFlow => "cashflowStatementHistory",
    }
}

fn list_name(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::BalanceSheet => "balanceSheetStatements",
        StatementKind::ProfitAndLoss => "incomeStatementHistory",
        StatementKind::CashFlow => "cashflowStatements",
    }
}

fn parse_period(entry: &Value) -> Option<StatementPeriod> {
    let fields = entry.as_object()?;
    let end_date = fields
        .get("endDate")
        .and_then(|d| d.get("raw"))
        .and_then(Value::as_i64)
        .and_then(|t| DateTime::from_timestamp(t, 0))?
        .date_naive();

    let line_items: BTreeMap<String, f64> = fields
        .iter()
        .filter(|(name, _)| name.as_str() != "endDate" && name.as_str() != "maxAge")
        .filter_map(|(name, value)| {
            value
                .get("raw")
                .and_then(Value::as_f64)
                .map(|raw| (name.clone(), raw))
        })
        .collect();

    Some(StatementPeriod { end_date, line_items })
}

pub fn parse_statement(
    symbol: &str,
    kind: StatementKind,
    json: &Value,
) -> Result<FinancialStatement, AnalysisError> {
    let entries = json
        .get("quoteSummary")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|r| r.get(module_name(kind)))
        .and_then(|m| m.get(list_name(kind)))
        .and_then(|l| l.as_array())
        .ok_or_else(|| {
            AnalysisError::data_unavailable(
                FetchFailure::Empty,
                format!("No {} found for {}", kind, symbol),
            )
        })?;

    let mut periods: Vec<StatementPeriod> = entries.iter().filter_map(parse_period).collect();
    if periods.is_empty() {
        return Err(AnalysisError::data_unavailable(
            FetchFailure::Empty,
            format!("{} for {} has no dated periods", kind, symbol),
        ));
    }
    periods.sort_by(|a, b| b.end_date.cmp(&a.end_date));

    Ok(FinancialStatement {
        symbol: symbol.to_string(),
        kind,
        periods,
    })
}

pub fn parse_quote(symbol: &str, json: &Value) -> Result<QuoteSnapshot, AnalysisError> {
    let quote = json
        .get("quoteResponse")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| {
            AnalysisError::data_unavailable(
                FetchFailure::NotFound,
                format!("No quote data found for {}", symbol),
            )
        })?;

    Ok(QuoteSnapshot {
        symbol: symbol.to_string(),
        price: quote.get("regularMarketPrice").and_then(|v| v.as_f64()),
        pe_ratio: quote.get("trailingPE").and_then(|v| v.as_f64()),
        market_cap: quote.get("marketCap").and_then(|v| v.as_f64()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn income_json() -> Value {
        json!({
            "quoteSummary": {
                "result": [{
                    "incomeStatementHistory": {
                        "incomeStatementHistory": [
                            {
                                "maxAge": 1,
                                "endDate": { "raw": 1648684800, "fmt": "2022-03-31" },
                                "totalRevenue": { "raw": 900.0, "fmt": "900" },
                                "netIncome": { "raw": 90.0, "fmt": "90" }
                            },
                            {
                                "maxAge": 1,
                                "endDate": { "raw": 1680220800, "fmt": "2023-03-31" },
                                "totalRevenue": { "raw": 1000.0, "fmt": "1k" },
                                "netIncome": { "raw": 120.0, "fmt": "120" },
                                "researchDevelopment": {}
                            }
                        ]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn test_parse_income_statement_newest_first() {
        let statement = parse_statement("TCS.NS", StatementKind::ProfitAndLoss, &income_json()).unwrap();

        assert_eq!(statement.periods.len(), 2);
        let latest = &statement.periods[0];
        assert_eq!(latest.end_date, NaiveDate::from_ymd_opt(2023, 3, 31).unwrap());
        assert_eq!(latest.line_item("totalRevenue"), Some(1000.0));
        assert_eq!(latest.line_item("researchDevelopment"), None);
        assert!(!latest.line_items.contains_key("maxAge"));
    }

    #[test]
    fn test_parse_statement_missing_module() {
        let err = parse_statement("TCS.NS", StatementKind::CashFlow, &income_json()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DataUnavailable { kind: FetchFailure::Empty, .. }
        ));
    }

    #[test]
    fn test_parse_quote() {
        let json = json!({
            "quoteResponse": {
                "result": [{
                    "symbol": "ITC.NS",
                    "regularMarketPrice": 430.5,
                    "trailingPE": 26.4,
                    "marketCap": 5.4e12
                }]
            }
        });
        let quote = parse_quote("ITC.NS", &json).unwrap();
        assert_eq!(quote.price, Some(430.5));
        assert_eq!(quote.pe_ratio, Some(26.4));
        assert_eq!(quote.market_cap, Some(5.4e12));
    }

    #[test]
    fn test_parse_quote_empty_result() {
        let json = json!({ "quoteResponse": { "result": [] } });
        assert!(parse_quote("NOPE", &json).is_err());
    }
}
