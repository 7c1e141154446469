pub use crate::{
    Error, MERGE_RADIUS_M, RouteIdx, Seconds, StopIdx, TRANSFER_PENALTY, TRANSFER_RADIUS_M,
    WALKING_SPEED_MPS,
};

// Re-export key components
pub use crate::distance::distance_meters;
pub use crate::loading::{
    GraphConfig, RelationalSource, deduplicate_stops, load_from_feed_files,
    load_from_relational_source,
};
pub use crate::model::{BoundingBox, CanonicalStop, Edge, GraphState, RawStop, StopQuery};
pub use crate::routing::{
    Itinerary, PathEntry, PathResult, SearchMode, Step, fewest_stops, find_path,
    route_aware_dijkstra, segment_path,
};
pub use crate::store::GraphStore;
