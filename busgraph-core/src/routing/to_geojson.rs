use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::{Map, json};

use super::itinerary::{Itinerary, Step};
use crate::{Error, model::GraphState};

impl Itinerary {
    /// Converts the itinerary to a `GeoJSON` `FeatureCollection`, one feature per step.
    pub fn to_geojson(&self, graph: &GraphState) -> Result<FeatureCollection, Error> {
        let features = self
            .steps
            .iter()
            .enumerate()
            .map(|(idx, step)| create_step_feature(graph, idx, step))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self, graph: &GraphState) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(graph)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn create_step_feature(graph: &GraphState, leg_idx: usize, step: &Step) -> Result<Feature, Error> {
    let coords: Vec<Coord<f64>> = step
        .stop_ids
        .iter()
        .map(|id| {
            graph
                .stop_by_id(id)
                .map(|s| s.point().0)
                .ok_or_else(|| Error::UnknownStop(id.clone()))
        })
        .collect::<Result<_, _>>()?;

    let geometry = match coords.as_slice() {
        [single] => Geometry::new(GeoJsonValue::from(&Point::from(*single))),
        _ => Geometry::new(GeoJsonValue::from(&LineString::new(coords))),
    };

    let stop_name = |id: &str| graph.stop_by_id(id).map(|s| s.name.clone()).unwrap_or_default();

    let mut properties = Map::new();
    properties.insert(
        "leg_type".to_string(),
        json!(if step.is_walk() { "walk" } else { "ride" }),
    );
    properties.insert("leg_index".to_string(), json!(leg_idx));
    properties.insert("route_id".to_string(), json!(step.route_id));
    properties.insert("from_stop".to_string(), json!(step.from_stop));
    properties.insert("to_stop".to_string(), json!(step.to_stop));
    properties.insert("from_name".to_string(), json!(stop_name(&step.from_stop)));
    properties.insert("to_name".to_string(), json!(stop_name(&step.to_stop)));
    properties.insert("stop_count".to_string(), json!(step.stop_count));

    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalStop, GraphBuilder};

    fn graph() -> GraphState {
        let mut builder = GraphBuilder::default();
        for (id, lat) in [("A", 21.0), ("B", 21.01), ("C", 21.02)] {
            builder.add_stop(CanonicalStop {
                id: id.into(),
                name: format!("Stop {id}"),
                lat,
                lon: 105.8,
            });
        }
        builder.build()
    }

    fn step(route: Option<&str>, stops: &[&str]) -> Step {
        Step {
            route_id: route.map(str::to_owned),
            from_stop: stops[0].into(),
            to_stop: stops[stops.len() - 1].into(),
            stop_ids: stops.iter().map(|s| (*s).to_owned()).collect(),
            stop_count: stops.len(),
        }
    }

    fn itinerary(steps: Vec<Step>) -> Itinerary {
        Itinerary {
            distance: 3,
            time: 0,
            transfers: steps.len().saturating_sub(1),
            path_stop_ids: Vec::new(),
            steps,
        }
    }

    #[test]
    fn one_feature_per_step() {
        let graph = graph();
        let itinerary = itinerary(vec![step(Some("R1"), &["A", "B"]), step(None, &["C"])]);
        let collection = itinerary.to_geojson(&graph).unwrap();
        assert_eq!(collection.features.len(), 2);

        let ride = &collection.features[0];
        assert_eq!(ride.property("leg_type").unwrap(), "ride");
        assert_eq!(ride.property("route_id").unwrap(), "R1");
        assert_eq!(ride.property("from_name").unwrap(), "Stop A");
        let geometry = serde_json::to_value(ride.geometry.as_ref().unwrap()).unwrap();
        assert_eq!(geometry["type"], "LineString");
        assert_eq!(geometry["coordinates"], json!([[105.8, 21.0], [105.8, 21.01]]));

        let walk = &collection.features[1];
        assert_eq!(walk.property("leg_type").unwrap(), "walk");
        assert!(walk.property("route_id").unwrap().is_null());
        assert_eq!(walk.property("leg_index").unwrap(), 1);
        assert_eq!(walk.property("stop_count").unwrap(), 1);
        let geometry = serde_json::to_value(walk.geometry.as_ref().unwrap()).unwrap();
        assert_eq!(geometry["type"], "Point");
    }

    #[test]
    fn unknown_stop_is_an_error() {
        let itinerary = itinerary(vec![step(Some("R1"), &["A", "Z"])]);
        assert!(matches!(
            itinerary.to_geojson(&graph()),
            Err(Error::UnknownStop(id)) if id == "Z"
        ));
    }

    #[test]
    fn serializes_to_string() {
        let itinerary = itinerary(vec![step(Some("R1"), &["A", "B", "C"])]);
        let text = itinerary.to_geojson_string(&graph()).unwrap();
        assert!(text.contains("\"FeatureCollection\""));
        assert!(text.contains("\"stop_count\":3"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["properties"]["to_name"], "Stop C");
    }
}
