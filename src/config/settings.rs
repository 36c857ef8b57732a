#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub default_rating: f64,
    pub base_k_factor: f64,
    pub draw_tolerance_seconds: f64,
    pub margin_scale_seconds: f64,
    pub margin_factor_cap: f64,
    pub confidence_full_races: i64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            default_rating: 1000.0,
            base_k_factor: 32.0,
            draw_tolerance_seconds: 0.5,
            margin_scale_seconds: 5.0,
            margin_factor_cap: 2.0,
            confidence_full_races: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Swings and performance diffs smaller than this are reported as noise.
    pub negligible_seconds: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            negligible_seconds: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub analysis: AnalysisSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            analysis: AnalysisSettings::default(),
        }
    }
}
