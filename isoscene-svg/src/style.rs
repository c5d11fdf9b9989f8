/// Stroke and fill styling values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Square,
    Round,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Square => "square",
            LineCap::Round => "round",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

/// Styling state owned by each figure. A plain value type: figures
/// compose one of these instead of inheriting shared styling behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke_color: String,
    pub stroke_dash_array: Vec<f64>,
    pub stroke_linecap: LineCap,
    pub stroke_linejoin: LineJoin,
    pub stroke_opacity: f64,
    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill_color: "white".to_string(),
            fill_opacity: 1.0,
            stroke_color: "black".to_string(),
            stroke_dash_array: Vec::new(),
            stroke_linecap: LineCap::Butt,
            stroke_linejoin: LineJoin::Round,
            stroke_opacity: 1.0,
            stroke_width: 1.0,
        }
    }
}

impl Style {
    pub fn dash_array_string(&self) -> String {
        self.stroke_dash_array
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
