#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Fractional digits written for every float.
    pub precision: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { precision: 6 }
    }
}
