use crate::ir::AnchorSpec;
use crate::theme::Theme;
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Minimum canvas size; larger diagrams grow past it.
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub anchor_radius: f32,
    pub padding: f32,
    pub edge_stroke_width: f32,
    /// Control-point distance for bezier edges, as a fraction of the anchor gap.
    pub bezier_curvature: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
            anchor_radius: 4.0,
            padding: 24.0,
            edge_stroke_width: 1.4,
            bezier_curvature: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorConfig {
    /// Strategy for scene edges that do not name one.
    pub default_strategy: AnchorSpec,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub render: RenderConfig,
    pub anchors: AnchorConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            render,
            anchors: AnchorConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    node_color: Option<String>,
    node_text_color: Option<String>,
    node_border_color: Option<String>,
    line_color: Option<String>,
    anchor_color: Option<String>,
    anchor_border_color: Option<String>,
    edge_label_background: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
    anchor_radius: Option<f32>,
    padding: Option<f32>,
    edge_stroke_width: Option<f32>,
    bezier_curvature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorConfigFile {
    default_strategy: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    render: Option<RenderConfigFile>,
    anchors: Option<AnchorConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::from_name(theme_name) {
            Some(theme) => {
                config.render.background = theme.background.clone();
                config.theme = theme;
            }
            None => bail!("unknown theme: {theme_name}"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.node_color {
            config.theme.node_color = v;
        }
        if let Some(v) = vars.node_text_color {
            config.theme.node_text_color = v;
        }
        if let Some(v) = vars.node_border_color {
            config.theme.node_border_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.anchor_color {
            config.theme.anchor_color = v;
        }
        if let Some(v) = vars.anchor_border_color {
            config.theme.anchor_border_color = v;
        }
        if let Some(v) = vars.edge_label_background {
            config.theme.edge_label_background = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.anchor_radius {
            config.render.anchor_radius = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.edge_stroke_width {
            config.render.edge_stroke_width = v;
        }
        if let Some(v) = render.bezier_curvature {
            config.render.bezier_curvature = v;
        }
    }

    if let Some(token) = parsed.anchors.and_then(|anchors| anchors.default_strategy) {
        config.anchors.default_strategy = AnchorSpec::from_token(&token)
            .with_context(|| format!("unknown anchor strategy: {token}"))?;
    }

    Ok(config)
}
