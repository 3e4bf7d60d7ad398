use std::collections::HashMap;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use geom::Pt2D;

use crate::RoadSet;

impl RoadSet {
    /// Reads a FeatureCollection of LineStrings and MultiLineStrings. Features with the same
    /// `name` property belong to the same road, in order of first appearance. Every line becomes
    /// one segment. Features without a name are each their own road.
    pub fn from_geojson(raw: &str) -> Result<RoadSet> {
        let geojson = raw
            .parse::<GeoJson>()
            .context("parsing road GeoJSON")?;
        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => bail!("Expected a FeatureCollection, not a bare Geometry"),
        };

        let mut input: Vec<(String, Vec<Vec<Pt2D>>)> = Vec::new();
        let mut road_per_name: HashMap<String, usize> = HashMap::new();
        for (idx, feature) in features.into_iter().enumerate() {
            let segments = parse_lines(&feature)
                .with_context(|| format!("feature {} of the road GeoJSON", idx))?;
            match feature
                .property("name")
                .and_then(|x| x.as_str())
                .map(|x| x.to_string())
            {
                Some(name) => {
                    if let Some(road) = road_per_name.get(&name) {
                        input[*road].1.extend(segments);
                    } else {
                        road_per_name.insert(name.clone(), input.len());
                        input.push((name, segments));
                    }
                }
                None => {
                    input.push((format!("unnamed road {}", input.len()), segments));
                }
            }
        }
        RoadSet::new(input)
    }

    /// One MultiLineString per road, with its `name` and `road_index`.
    pub fn to_geojson(&self) -> String {
        let mut features = Vec::new();
        for (idx, road) in self.roads.iter().enumerate() {
            let lines = road
                .segments
                .iter()
                .map(|segment| {
                    segment
                        .vertices
                        .iter()
                        .map(|id| {
                            let pt = self.pt(*id);
                            vec![pt.x(), pt.y()]
                        })
                        .collect()
                })
                .collect();

            let mut properties = serde_json::Map::new();
            properties.insert("name".to_string(), road.name.clone().into());
            properties.insert("road_index".to_string(), idx.into());
            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::MultiLineString(lines))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }

        GeoJson::from(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
        .to_string()
    }
}

fn parse_lines(feature: &Feature) -> Result<Vec<Vec<Pt2D>>> {
    let geometry = match feature.geometry {
        Some(ref geometry) => geometry,
        None => bail!("no geometry"),
    };
    match geometry.value {
        Value::LineString(ref line) => Ok(vec![parse_line(line)?]),
        Value::MultiLineString(ref lines) => lines.iter().map(|line| parse_line(line)).collect(),
        _ => bail!("only LineStrings and MultiLineStrings are supported"),
    }
}

fn parse_line(positions: &[Vec<f64>]) -> Result<Vec<Pt2D>> {
    let mut pts = Vec::new();
    for position in positions {
        if position.len() < 2 {
            bail!("position {:?} doesn't have x and y", position);
        }
        match Pt2D::maybe_new(position[0], position[1]) {
            Some(pt) => pts.push(pt),
            None => bail!("bad position {:?}", position),
        }
    }
    Ok(pts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VertexID;

    #[test]
    fn test_grouping_by_name() {
        let raw = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "I-5" },
                    "geometry": { "type": "LineString", "coordinates": [[0, 0], [10, 0]] }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": { "type": "LineString", "coordinates": [[5, -5], [5, 5]] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "I-5" },
                    "geometry": {
                        "type": "MultiLineString",
                        "coordinates": [[[20, 0], [30, 0]], [[40, 0], [50, 0], [60, 1]]]
                    }
                }
            ]
        }"#;
        let roads = RoadSet::from_geojson(raw).unwrap();
        assert_eq!(roads.roads.len(), 2);
        assert_eq!(roads.roads[0].name, "I-5");
        assert_eq!(roads.roads[0].segments.len(), 3);
        assert_eq!(roads.roads[1].name, "unnamed road 1");
        // IDs follow the order the roads wind up in, not the order of features
        assert_eq!(
            roads.roads[1].segments[0].vertices,
            vec![VertexID(7), VertexID(8)]
        );

        let copy = RoadSet::from_geojson(&roads.to_geojson()).unwrap();
        assert_eq!(copy, roads);
    }

    #[test]
    fn test_bad_input() {
        assert!(RoadSet::from_geojson("not json").is_err());
        assert!(RoadSet::from_geojson(
            r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "properties": {},
            "geometry": {"type": "Point", "coordinates": [0, 0]}}]}"#
        )
        .is_err());
        // One point isn't a line
        assert!(RoadSet::from_geojson(
            r#"{"type": "FeatureCollection", "features": [{"type": "Feature", "properties": {},
            "geometry": {"type": "LineString", "coordinates": [[0, 0]]}}]}"#
        )
        .is_err());
        assert!(
            RoadSet::from_geojson(r#"{"type": "FeatureCollection", "features": []}"#).is_err()
        );
    }
}
