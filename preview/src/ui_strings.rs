use serde::{Deserialize, Serialize};

/// Labels printed around the preview output; overridable from a JSON file.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiStrings {
    pub map: MapStrings,
    pub summary: SummaryStrings,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MapStrings {
    pub title_2d: String,
    pub title_noise: String,
    pub slice: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SummaryStrings {
    pub title: String,
    pub vertices: String,
    pub triangles: String,
    pub outlines: String,
    pub walls: String,
    pub bounds: String,
}

impl Default for UiStrings {
    fn default() -> Self {
        Self {
            map: MapStrings {
                title_2d: "Cave map".to_string(),
                title_noise: "Noise field".to_string(),
                slice: "Slice".to_string(),
            },
            summary: SummaryStrings {
                title: "Summary".to_string(),
                vertices: "vertices".to_string(),
                triangles: "triangles".to_string(),
                outlines: "outlines".to_string(),
                walls: "wall triangles".to_string(),
                bounds: "bounds".to_string(),
            },
        }
    }
}

pub fn load_from_file(path: &str) -> anyhow::Result<UiStrings> {
    let s = std::fs::read_to_string(path)?;
    let ui: UiStrings = serde_json::from_str(&s)?;
    Ok(ui)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let ui: UiStrings = serde_json::from_str(r#"{ "summary": { "title": "Resumen" } }"#).unwrap();
        assert_eq!(ui.summary.title, "Resumen");
        assert_eq!(ui.summary.vertices, "");
        assert_eq!(ui.map.title_2d, "Cave map");
    }
}
