//! Indicator math over closing prices.
//!
//! Every output is aligned with its input: element `i` describes the bar at
//! index `i`. Rolling indicators yield `None` until their window is filled.

/// Simple Moving Average over a trailing window
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; data.len()];
    }

    (0..data.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                let sum: f64 = data[i + 1 - period..=i].iter().sum();
                Some(sum / period as f64)
            }
        })
        .collect()
}

/// Exponential Moving Average with `alpha = 2 / (span + 1)`, seeded by the
/// first value and without bias adjustment.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = data.first() else {
        return vec![];
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(first);

    for &value in &data[1..] {
        let prev = result[result.len() - 1];
        result.push((value - prev) * alpha + prev);
    }

    result
}

/// MACD (Moving Average Convergence Divergence)
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(data: &[f64], fast_span: usize, slow_span: usize, signal_span: usize) -> MacdResult {
    let ema_fast = ema(data, fast_span);
    let ema_slow = ema(data, slow_span);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();

    let signal_line = ema(&macd_line, signal_span);

    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// RSI from average gain and loss. No losses means RSI 100; no movement at
/// all is treated as neutral (50).
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Relative Strength Index using plain rolling means of the last `period`
/// close-to-close deltas.
pub fn rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period + 1 {
        return result;
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    // delta j sits between bar j and bar j + 1
    for j in period - 1..gains.len() {
        let avg_gain = gains[j + 1 - period..=j].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[j + 1 - period..=j].iter().sum::<f64>() / period as f64;
        result[j + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}
