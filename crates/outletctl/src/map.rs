//! Map layers for the outlet directory
//!
//! One marker and one green 5 km catchment circle per located outlet, plus a
//! faint yellow circle over every position flagged as overlapping. Layers
//! render to a standalone Leaflet page or to GeoJSON.

use anyhow::Result;
use outlet_common::{overlapping_positions, Outlet, Position, SERVICE_RADIUS_M};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::MapConfig;

pub const SERVICE_AREA_COLOR: &str = "#028940";
pub const OVERLAP_COLOR: &str = "#FFC20D";

/// Kuala Lumpur city centre, used when no outlet has coordinates
const FALLBACK_CENTER: Position = Position {
    latitude: 3.1390,
    longitude: 101.6869,
};

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub position: Position,
    pub tooltip: String,
    pub popup: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Circle {
    pub position: Position,
    pub radius_m: f64,
    pub color: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl Circle {
    fn service_area(position: Position) -> Self {
        Self {
            position,
            radius_m: SERVICE_RADIUS_M,
            color: SERVICE_AREA_COLOR,
            weight: 8.0,
            fill_opacity: 0.3,
        }
    }

    fn overlap(position: Position) -> Self {
        Self {
            position,
            radius_m: SERVICE_RADIUS_M,
            color: OVERLAP_COLOR,
            weight: 1.5,
            fill_opacity: 0.07,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MapLayers {
    pub center: Position,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub service_areas: Vec<Circle>,
    pub overlap_areas: Vec<Circle>,
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build every layer from the outlet list; unlocated outlets are left off
pub fn build_layers(outlets: &[Outlet], zoom: u8) -> MapLayers {
    let mut markers = Vec::new();
    let mut service_areas = Vec::new();

    for outlet in outlets {
        let Some(position) = outlet.position() else {
            continue;
        };
        markers.push(Marker {
            position,
            tooltip: escape_html(&outlet.name),
            popup: format!(
                "<b>{}</b><br>{}",
                escape_html(&outlet.name),
                escape_html(&outlet.address)
            ),
        });
        service_areas.push(Circle::service_area(position));
    }

    let overlap_areas = overlapping_positions(outlets)
        .into_iter()
        .map(Circle::overlap)
        .collect();

    MapLayers {
        center: markers.first().map(|m| m.position).unwrap_or(FALLBACK_CENTER),
        zoom,
        markers,
        service_areas,
        overlap_areas,
    }
}

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Subway Outlets Map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body, #map { height: 100%; margin: 0; }
  .legend { background: white; padding: 6px 10px; font: 12px sans-serif; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const layers = __LAYERS__;
const icon = L.icon({ iconUrl: __ICON_URL__, iconSize: [__ICON_W__, __ICON_H__] });
const map = L.map("map").setView([layers.center.latitude, layers.center.longitude], layers.zoom);
L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
  attribution: "&copy; OpenStreetMap contributors"
}).addTo(map);

function circle(c) {
  L.circle([c.position.latitude, c.position.longitude], {
    radius: c.radius_m, color: c.color, fill: true, fillColor: c.color,
    weight: c.weight, fillOpacity: c.fill_opacity
  }).addTo(map);
}

layers.markers.forEach(m => {
  L.marker([m.position.latitude, m.position.longitude], { icon: icon })
    .bindPopup(m.popup).bindTooltip(m.tooltip).addTo(map);
});
layers.service_areas.forEach(circle);
layers.overlap_areas.forEach(circle);

const legend = L.control({ position: "bottomleft" });
legend.onAdd = () => {
  const div = L.DomUtil.create("div", "legend");
  div.innerHTML = '<span style="color:#028940;font-weight:bold">Green circle</span> 5 km service area<br>' +
    '<span style="color:#FFC20D;font-weight:bold">Yellow overlay</span> overlapping service areas';
  return div;
};
legend.addTo(map);
</script>
</body>
</html>
"#;

/// Standalone Leaflet page with the layers embedded as JSON
pub fn render_html(layers: &MapLayers, config: &MapConfig) -> Result<String> {
    // keep "</script>" inside strings from closing the script block
    let layers_json = serde_json::to_string(layers)?.replace("</", "<\\/");
    let icon_url = serde_json::to_string(&config.marker_icon)?.replace("</", "<\\/");

    Ok(HTML_TEMPLATE
        .replace("__LAYERS__", &layers_json)
        .replace("__ICON_URL__", &icon_url)
        .replace("__ICON_W__", &config.icon_width.to_string())
        .replace("__ICON_H__", &config.icon_height.to_string()))
}

fn point_feature(position: &Position, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [position.longitude, position.latitude],
        },
        "properties": properties,
    })
}

/// GeoJSON FeatureCollection; circles are points carrying `radius_m`
pub fn render_geojson(layers: &MapLayers) -> Value {
    let mut features = Vec::new();

    for marker in &layers.markers {
        features.push(point_feature(
            &marker.position,
            json!({ "layer": "marker", "name": marker.tooltip, "popup": marker.popup }),
        ));
    }
    for (layer, circles) in [
        ("service_area", &layers.service_areas),
        ("overlap", &layers.overlap_areas),
    ] {
        for c in circles {
            features.push(point_feature(
                &c.position,
                json!({
                    "layer": layer,
                    "radius_m": c.radius_m,
                    "color": c.color,
                    "weight": c.weight,
                    "fill_opacity": c.fill_opacity,
                }),
            ));
        }
    }

    json!({ "type": "FeatureCollection", "features": features })
}
