/// Termination policy of a retrieval.
///
/// Both fields are optional and unset by default; unset is distinct from any
/// value, including zero. With no limit set, a retrieval expands its viewport
/// until every admitted tile is fully covered.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    min_num_features: Option<u64>,
    max_viewport_scale: Option<f64>,
}

impl Limits {
    pub fn new() -> Limits {
        Limits::default()
    }

    /// Requests an early stop once at least `min_num_features` features have
    /// been retrieved across all tiles.
    pub fn set_min_num_features(&mut self, min_num_features: u64) {
        self.min_num_features = Some(min_num_features);
    }

    /// The minimum feature count.
    ///
    /// # Panics
    /// Panics when the limit has not been set; check
    /// [`Limits::is_min_num_features_set`] first.
    pub fn min_num_features(&self) -> u64 {
        match self.min_num_features {
            Some(value) => value,
            None => panic!("min_num_features limit is not set"),
        }
    }

    pub fn is_min_num_features_set(&self) -> bool {
        self.min_num_features.is_some()
    }

    /// Caps the viewport expansion at `max_viewport_scale` times the base
    /// viewport.
    pub fn set_max_viewport_scale(&mut self, max_viewport_scale: f64) {
        self.max_viewport_scale = Some(max_viewport_scale);
    }

    /// The maximum viewport scale.
    ///
    /// # Panics
    /// Panics when the limit has not been set; check
    /// [`Limits::is_max_viewport_scale_set`] first.
    pub fn max_viewport_scale(&self) -> f64 {
        match self.max_viewport_scale {
            Some(value) => value,
            None => panic!("max_viewport_scale limit is not set"),
        }
    }

    pub fn is_max_viewport_scale_set(&self) -> bool {
        self.max_viewport_scale.is_some()
    }
}
