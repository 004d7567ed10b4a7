//! Decoding of the `/v8/finance/chart` payload.

use analysis_core::{AnalysisError, Bar, FetchFailure, PriceSeries};
use chrono::DateTime;
use serde_json::Value;

fn column<'a>(quote: &'a Value, name: &str) -> Result<&'a Vec<Value>, AnalysisError> {
    quote
        .get(name)
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            AnalysisError::data_unavailable(FetchFailure::Malformed, format!("No {} prices", name))
        })
}

/// Build a price series from a chart response.
///
/// Rows with a missing open, high, low or close are skipped; a repeated
/// timestamp keeps the later row.
pub fn parse_chart(symbol: &str, json: &Value) -> Result<PriceSeries, AnalysisError> {
    let chart = json.get("chart").ok_or_else(|| {
        AnalysisError::data_unavailable(FetchFailure::Malformed, "No chart object in response")
    })?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("unknown error");
        return Err(AnalysisError::data_unavailable(
            FetchFailure::NotFound,
            format!("{}: {}", symbol, description),
        ));
    }

    let result = chart
        .get("result")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| {
            AnalysisError::data_unavailable(FetchFailure::Empty, format!("No chart data for {}", symbol))
        })?;

    let Some(timestamps) = result.get("timestamp").and_then(|v| v.as_array()) else {
        return Err(AnalysisError::data_unavailable(
            FetchFailure::Empty,
            format!("No bars returned for {}", symbol),
        ));
    };

    let quote = result
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| {
            AnalysisError::data_unavailable(FetchFailure::Malformed, "No quote data found")
        })?;

    let opens = column(quote, "open")?;
    let highs = column(quote, "high")?;
    let lows = column(quote, "low")?;
    let closes = column(quote, "close")?;
    let volumes = quote.get("volume").and_then(|v| v.as_array());

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let row = (
            ts.as_i64().and_then(|t| DateTime::from_timestamp(t, 0)),
            opens.get(i).and_then(Value::as_f64),
            highs.get(i).and_then(Value::as_f64),
            lows.get(i).and_then(Value::as_f64),
            closes.get(i).and_then(Value::as_f64),
        );

        let (Some(timestamp), Some(open), Some(high), Some(low), Some(close)) = row else {
            continue;
        };

        let volume = volumes
            .and_then(|v| v.get(i))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => *last = bar,
            _ => deduped.push(bar),
        }
    }

    if deduped.is_empty() {
        return Err(AnalysisError::data_unavailable(
            FetchFailure::Empty,
            format!("No complete bars returned for {}", symbol),
        ));
    }

    PriceSeries::new(symbol, deduped)
}
