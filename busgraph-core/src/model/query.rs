/// Default number of stops returned by a lookup
pub const DEFAULT_STOP_LIMIT: usize = 100;
/// Hard cap on the number of stops a lookup may return
pub const MAX_STOP_LIMIT: usize = 2000;
/// Limit used when the caller passes an explicit zero
const ZERO_LIMIT_FALLBACK: usize = 500;

/// Inclusive latitude/longitude box, typically a map viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// False when any corner is NaN; such boxes are ignored by lookups
    pub fn is_valid(&self) -> bool {
        ![self.min_lat, self.min_lon, self.max_lat, self.max_lon]
            .iter()
            .any(|v| v.is_nan())
    }
}

/// Parameters of a stop lookup: text search first, then the box filter, then truncation
#[derive(Debug, Clone, Default)]
pub struct StopQuery {
    pub search: String,
    pub bbox: Option<BoundingBox>,
    pub limit: Option<usize>,
}

impl StopQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn effective_limit(&self) -> usize {
        match self.limit {
            None => DEFAULT_STOP_LIMIT,
            Some(0) => ZERO_LIMIT_FALLBACK,
            Some(n) => n.min(MAX_STOP_LIMIT),
        }
    }
}
