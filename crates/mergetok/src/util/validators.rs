//! Validators for various configuration options.

/// Validates and returns parallel processing options.
pub fn try_parallel(parallel: bool) -> anyhow::Result<bool> {
    #[cfg(not(feature = "rayon"))]
    if parallel {
        return Err(anyhow::anyhow!(
            "Parallel processing requires the `rayon` feature to be enabled."
        ));
    }
    Ok(parallel)
}

/// Validates and returns parallel processing options, panicking if it's not enabled.
pub fn expect_parallel(parallel: bool) -> bool {
    try_parallel(parallel).unwrap()
}

/// Validates and returns a train/validation split ratio in ``[0.0, 1.0]``.
pub fn try_train_ratio(ratio: f64) -> anyhow::Result<f64> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(anyhow::anyhow!(
            "train_ratio ({ratio}) must be within [0.0, 1.0]"
        ))
    }
}

/// Validates and returns a train/validation split ratio, panicking if out of range.
pub fn expect_train_ratio(ratio: f64) -> f64 {
    try_train_ratio(ratio).unwrap()
}
