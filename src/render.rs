use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::graph::Graph;
use crate::layout::{Layout, Point};
use crate::xml::escape_xml;

/// Colours and sizes used when drawing a laid-out graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_node_color")]
    pub node_fill: String,
    #[serde(default = "default_node_color")]
    pub node_stroke: String,
    #[serde(default = "default_node_radius")]
    pub node_radius: f64,
    #[serde(default = "default_ink")]
    pub label_color: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Distance from the node centre up to the label baseline
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
    #[serde(default = "default_ink")]
    pub edge_stroke: String,
    #[serde(default = "default_edge_width")]
    pub edge_width: f64,
    /// Draw arrowheads at edge targets
    #[serde(default)]
    pub arrows: bool,
    /// Blank margin around the canvas
    #[serde(default = "default_padding")]
    pub padding: f64,
}

fn default_background() -> String {
    "white".to_string()
}
fn default_node_color() -> String {
    "red".to_string()
}
fn default_ink() -> String {
    "blue".to_string()
}
fn default_font_family() -> String {
    "sans-serif".to_string()
}
fn default_node_radius() -> f64 {
    8.0
}
fn default_font_size() -> f64 {
    15.0
}
fn default_label_offset() -> f64 {
    10.0
}
fn default_edge_width() -> f64 {
    1.0
}
fn default_padding() -> f64 {
    20.0
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: default_background(),
            node_fill: default_node_color(),
            node_stroke: default_node_color(),
            node_radius: default_node_radius(),
            label_color: default_ink(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            label_offset: default_label_offset(),
            edge_stroke: default_ink(),
            edge_width: default_edge_width(),
            arrows: false,
            padding: default_padding(),
        }
    }
}

/// Render `graph` at the positions in `layout` as a standalone SVG document.
///
/// The canvas is `scale` units square plus padding, grown if the layout
/// reaches past it. Edges are drawn first so nodes sit on top of them.
pub fn render_svg(
    graph: &Graph,
    layout: &Layout,
    scale: u32,
    style: &RenderStyle,
) -> Result<String, LayoutError> {
    let mut positions = Vec::with_capacity(graph.len());
    for node in graph.nodes() {
        let p = layout.get(&node.key).ok_or_else(|| {
            LayoutError::LayoutMismatch(format!("no position for node '{}'", node.key))
        })?;
        if !p.is_finite() {
            return Err(LayoutError::Render(format!(
                "node '{}' has a non-finite position",
                node.key
            )));
        }
        positions.push(p);
    }

    let scale = f64::from(scale);
    let bounds = layout.bounds().unwrap_or_default();
    let shift_x = style.padding - bounds.x.min(0.0);
    let shift_y = style.padding - bounds.y.min(0.0);
    let width = scale.max(bounds.right()) - bounds.x.min(0.0) + style.padding * 2.0;
    let height = scale.max(bounds.bottom()) - bounds.y.min(0.0) + style.padding * 2.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}">
"#,
        w = width,
        h = height,
    ));
    if style.arrows {
        svg.push_str(&arrow_marker(style));
    }
    svg.push_str(&format!(
        r#"<rect width="{:.2}" height="{:.2}" fill="{}"/>
"#,
        width,
        height,
        escape_xml(&style.background)
    ));
    svg.push_str(&format!(
        "<g transform=\"translate({:.2},{:.2})\">\n",
        shift_x, shift_y
    ));

    for (from, to) in graph.edge_indices() {
        svg.push_str(&render_edge(positions[from], positions[to], style));
    }

    for (node, p) in graph.nodes().iter().zip(&positions) {
        svg.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}"/>
"#,
            p.x,
            p.y,
            style.node_radius,
            escape_xml(&style.node_fill),
            escape_xml(&style.node_stroke)
        ));
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="{}" font-size="{:.2}" fill="{}">{}</text>
"#,
            p.x,
            p.y - style.label_offset,
            escape_xml(&style.font_family),
            style.font_size,
            escape_xml(&style.label_color),
            escape_xml(node.label())
        ));
    }

    svg.push_str("</g>\n</svg>\n");
    Ok(svg)
}

fn render_edge(from: Point, to: Point, style: &RenderStyle) -> String {
    let stroke = escape_xml(&style.edge_stroke);

    if from == to {
        // Self-loop: a small ring touching the node's upper right.
        let r = style.node_radius;
        return format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="{:.2}"/>
"#,
            from.x + r,
            from.y - r,
            r,
            stroke,
            style.edge_width
        );
    }

    let mut end = to;
    let mut marker = "";
    if style.arrows {
        // Stop at the target's rim so the arrowhead stays visible.
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len > style.node_radius {
            let t = (len - style.node_radius) / len;
            end = Point::new(from.x + dx * t, from.y + dy * t);
        }
        marker = r#" marker-end="url(#arrow)""#;
    }

    format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}"{}/>
"#,
        from.x, from.y, end.x, end.y, stroke, style.edge_width, marker
    )
}

fn arrow_marker(style: &RenderStyle) -> String {
    format!(
        r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{}"/></marker></defs>
"#,
        escape_xml(&style.edge_stroke)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AdjacencyList, adjacency, diamond, keys};
    use crate::layout::arc_layout;

    #[test]
    fn draws_every_node_and_edge() {
        let graph = diamond();
        let layout = arc_layout(&graph, 500.0);
        let svg = render_svg(&graph, &layout, 500, &RenderStyle::default()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 4);
        assert_eq!(svg.matches("<line").count(), 5);
        assert_eq!(svg.matches("<text").count(), 4);
        assert!(svg.contains(
            r#"<circle cx="100.00" cy="250.00" r="8.00" fill="red" stroke="red"/>"#
        ));
        assert!(svg.contains(r#"y="240.00""#));
        assert!(svg.contains(">a</text>"));
        assert!(!svg.contains("marker-end"));
    }

    #[test]
    fn edges_are_drawn_beneath_nodes() {
        let graph = diamond();
        let layout = arc_layout(&graph, 100.0);
        let svg = render_svg(&graph, &layout, 100, &RenderStyle::default()).unwrap();
        let last_line = svg.rfind("<line").unwrap();
        let first_circle = svg.find("<circle").unwrap();
        assert!(last_line < first_circle);
    }

    #[test]
    fn labels_use_payload_and_are_escaped() {
        let graph = Graph::with_values(
            AdjacencyList::new(),
            vec![("n".to_string(), Some("a < b & c".to_string()))],
        )
        .unwrap();
        let layout = arc_layout(&graph, 100.0);
        let svg = render_svg(&graph, &layout, 100, &RenderStyle::default()).unwrap();
        assert!(svg.contains(">a &lt; b &amp; c</text>"));
    }

    #[test]
    fn arrows_and_self_loops() {
        let graph = Graph::new(adjacency(&[("a", "a"), ("a", "b")]), keys(&["a", "b"])).unwrap();
        let style = RenderStyle {
            arrows: true,
            ..RenderStyle::default()
        };
        let svg = render_svg(&graph, &arc_layout(&graph, 300.0), 300, &style).unwrap();

        assert!(svg.contains(r#"<marker id="arrow""#));
        assert_eq!(svg.matches(r#"marker-end="url(#arrow)""#).count(), 1);
        // The arrow stops one radius short of b at x = 200.
        assert!(svg.contains(r#"x2="192.00""#));
        assert!(svg.contains(r#"fill="none""#));
    }

    #[test]
    fn canvas_grows_to_fit_layout() {
        let graph = Graph::new(AdjacencyList::new(), keys(&["a", "b"])).unwrap();
        let mut layout = Layout::new();
        layout.insert("a", Point::new(-10.0, 0.0));
        layout.insert("b", Point::new(600.0, 50.0));

        let style = RenderStyle::default();
        let svg = render_svg(&graph, &layout, 512, &style).unwrap();
        assert!(svg.contains(r#"width="650.00""#));
        assert!(svg.contains(r#"translate(30.00,20.00)"#));
    }

    #[test]
    fn missing_positions_are_rejected() {
        let graph = diamond();
        let mut layout = arc_layout(&graph, 100.0);
        layout = layout
            .iter()
            .filter(|(k, _)| *k != "c")
            .map(|(k, p)| (k.to_string(), p))
            .collect();
        assert!(matches!(
            render_svg(&graph, &layout, 100, &RenderStyle::default()),
            Err(LayoutError::LayoutMismatch(_))
        ));
    }
}
