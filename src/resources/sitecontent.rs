//! Site content: text blocks, fixed facilities and animated routes.
//!
//! One [`SiteContent`] describes a whole page variant. The built-in
//! [`SiteContent::biochar`] is what the preview binary shows when no content
//! file is given; any other variant (text only, a single ping-pong van, a
//! fleet of shuttles) is the same structure with different data.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "title": "Biochar",
//!   "viewport": { "center": { "lat": 51.505, "lng": -0.09 }, "zoom": 13 },
//!   "facilities": [ { "label": "Works", "position": { "lat": 51.505, "lng": -0.09 } } ],
//!   "routes": [
//!     { "id": "van-1",
//!       "start": { "lat": 51.505, "lng": -0.09 },
//!       "end": { "lat": 51.51, "lng": -0.1 },
//!       "mode": { "kind": "ping_pong", "epsilon": 0.0001 } }
//!   ],
//!   "sections": [ { "type": "hero", "heading": "Biochar", "body": "..." } ]
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::components::geoposition::Coordinate;
use crate::components::route::{Route, RouteMode};
use crate::resources::mapconfig::MapConfig;

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const DEFAULT_ZOOM: u8 = 13;

/// What the map widget initially shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Coordinate,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

fn default_tile_url() -> String {
    DEFAULT_TILE_URL.to_owned()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacilitySpec {
    pub label: String,
    pub position: Coordinate,
}

/// One animated vehicle. `mode` and `step` fall back to [`MapConfig`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub id: String,
    pub start: Coordinate,
    pub end: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RouteMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl RouteSpec {
    pub fn new(id: impl Into<String>, start: Coordinate, end: Coordinate) -> Self {
        RouteSpec {
            id: id.into(),
            start,
            end,
            mode: None,
            step: None,
        }
    }

    pub fn with_mode(mut self, mode: RouteMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve defaults into the component a vehicle is spawned with.
    pub fn to_route(&self, config: &MapConfig) -> Route {
        Route::new(self.start, self.end, self.step.unwrap_or(config.step))
            .with_mode(self.mode.unwrap_or(config.mode))
    }
}

/// A sub-headed bullet list inside a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListGroup {
    pub heading: String,
    pub items: Vec<String>,
}

/// A block of page text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Hero {
        heading: String,
        body: String,
    },
    Card {
        heading: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        items: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        groups: Vec<ListGroup>,
    },
    Contact {
        heading: String,
        #[serde(default)]
        lines: Vec<String>,
        email: String,
    },
}

#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    pub title: String,
    pub viewport: Viewport,
    #[serde(default)]
    pub facilities: Vec<FacilitySpec>,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl SiteContent {
    /// Parse content from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read content file {}: {}", path.display(), e))?;
        Self::from_json(&text)
            .map_err(|e| format!("Invalid content file {}: {}", path.display(), e))
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    /// Check every coordinate and route before anything is spawned.
    pub fn validate(&self, config: &MapConfig) -> Result<(), String> {
        if !self.viewport.center.is_finite() {
            return Err("viewport center is not finite".to_owned());
        }
        for facility in &self.facilities {
            if !facility.position.is_finite() {
                return Err(format!(
                    "facility '{}': non-finite position {:?}",
                    facility.label, facility.position
                ));
            }
        }
        validate_routes(&self.routes, config)
    }

    /// The company site: text blocks, the works and depot, and two vans.
    pub fn biochar() -> Self {
        let works = Coordinate::new(51.505, -0.09);
        let depot = Coordinate::new(51.51, -0.1);
        SiteContent {
            title: "Biochar".to_owned(),
            viewport: Viewport {
                center: works,
                zoom: DEFAULT_ZOOM,
                tile_url: DEFAULT_TILE_URL.to_owned(),
            },
            facilities: vec![
                FacilitySpec {
                    label: "Pyrolysis Works".to_owned(),
                    position: works,
                },
                FacilitySpec {
                    label: "Distribution Depot".to_owned(),
                    position: depot,
                },
            ],
            routes: vec![
                RouteSpec::new("van-1", works, depot),
                RouteSpec::new(
                    "van-2",
                    Coordinate::new(51.5, -0.12),
                    Coordinate::new(51.52, -0.08),
                ),
            ],
            sections: biochar_sections(),
        }
    }
}

/// Reject non-finite input, bad tuning and duplicate identifiers.
pub fn validate_routes(routes: &[RouteSpec], config: &MapConfig) -> Result<(), String> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for spec in routes {
        if spec.id.trim().is_empty() {
            return Err("route with an empty id".to_owned());
        }
        if !seen.insert(spec.id.as_str()) {
            return Err(format!("duplicate route id '{}'", spec.id));
        }
        spec.to_route(config)
            .validate()
            .map_err(|e| format!("route '{}': {}", spec.id, e))?;
    }
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn biochar_sections() -> Vec<Section> {
    vec![
        Section::Hero {
            heading: "Biochar: Transforming Soil & Climate".to_owned(),
            body: "Biochar is a sustainable, carbon-rich material improving soil health, \
                   increasing crop yields, and helping reduce climate impact."
                .to_owned(),
        },
        Section::Card {
            heading: "What Is Biochar?".to_owned(),
            body: Some(
                "Biochar is produced through pyrolysis, heating organic material in low \
                 oxygen. Its porous structure and high surface area make it excellent for \
                 soil enhancement and long-term carbon storage."
                    .to_owned(),
            ),
            items: Vec::new(),
            groups: Vec::new(),
        },
        Section::Card {
            heading: "How Biochar Is Made".to_owned(),
            body: None,
            items: strings(&[
                "Biomass feedstock preparation",
                "Low-oxygen pyrolysis heating",
                "Gas and vapor release",
                "Carbon-rich char formation",
                "Cooling and activation",
            ]),
            groups: Vec::new(),
        },
        Section::Card {
            heading: "Benefits of Biochar".to_owned(),
            body: None,
            items: Vec::new(),
            groups: vec![
                ListGroup {
                    heading: "Agricultural".to_owned(),
                    items: strings(&[
                        "Improves fertility",
                        "Boosts water retention",
                        "Enhances nutrient uptake",
                        "Supports soil microbes",
                    ]),
                },
                ListGroup {
                    heading: "Environmental".to_owned(),
                    items: strings(&[
                        "Long-term carbon sequestration",
                        "Reduces greenhouse gas emissions",
                        "Recycles organic waste",
                    ]),
                },
                ListGroup {
                    heading: "Economic".to_owned(),
                    items: strings(&[
                        "Lower fertilizer costs",
                        "Higher crop yields",
                        "Supports green job growth",
                    ]),
                },
            ],
        },
        Section::Card {
            heading: "Applications of Biochar".to_owned(),
            body: None,
            items: strings(&[
                "Agriculture: Soil amendment, compost enhancer",
                "Urban: Landscaping, green roofs",
                "Industrial: Filtration, construction additives",
                "Livestock: Bedding & odor reduction",
            ]),
            groups: Vec::new(),
        },
        Section::Card {
            heading: "How to Use Biochar".to_owned(),
            body: None,
            items: strings(&[
                "Soil: Mix 5-10% with compost",
                "Gardens: 1 cup per sq. ft",
                "Compost: Add 10-15% for odor control & microbe activity",
            ]),
            groups: Vec::new(),
        },
        Section::Contact {
            heading: "Contact Us".to_owned(),
            lines: strings(&["Have questions or need support regarding biochar products?"]),
            email: "info@biochar.com".to_owned(),
        },
    ]
}
