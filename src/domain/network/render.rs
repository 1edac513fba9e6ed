//! Tree rendering — scene layout, zoom, hover tooltips, hit testing, SVG export.
//!
//! [`render`] is a pure function of (tree, zoom, hover state). Every member is
//! a fixed-size marker placed beneath its parent. A node with at least one
//! child gets a row of two slots, left and right, under one shared horizontal
//! connector; an empty slot next to a present sibling shows a dashed
//! placeholder. Zoom scales the whole scene about the top-centre so the root
//! never moves.

use super::{NetworkTree, NodeId, Side};
use crate::shared::{MembershipStatus, Username};

use svg::node::element::{Circle, Group, Line, Rectangle, Text};
use svg::Document;

/// Diameter of a member marker.
pub const MARKER_DIAMETER: f32 = 36.0;
/// Diameter of an empty-slot placeholder.
pub const PLACEHOLDER_DIAMETER: f32 = 24.0;
/// Horizontal gap between sibling slots.
pub const SIBLING_GAP: f32 = 16.0;
/// Vertical gap between a marker and its children's row.
pub const LEVEL_GAP: f32 = 16.0;
/// Length of the vertical drop from the shared connector to a child slot.
pub const CONNECTOR_DROP: f32 = 8.0;
/// Padding around the laid-out tree.
pub const CANVAS_PADDING: f32 = 32.0;

const ACTIVE_FILL: &str = "#10b981";
const ACTIVE_STROKE: &str = "#a7f3d0";
const INACTIVE_FILL: &str = "#fb7185";
const INACTIVE_STROKE: &str = "#fecdd3";
const LINE_COLOR: &str = "#d1d5db";

// ─── Zoom ────────────────────────────────────────────────────────────────────

/// Zoom level in percent, bounded to `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zoom(u16);

impl Zoom {
    pub const MIN: u16 = 50;
    pub const MAX: u16 = 150;
    pub const STEP: u16 = 10;
    pub const DEFAULT: u16 = 100;

    /// Clamp `percent` into the allowed range.
    pub fn new(percent: u16) -> Self {
        Self(percent.clamp(Self::MIN, Self::MAX))
    }

    pub fn percent(&self) -> u16 {
        self.0
    }

    pub fn scale(&self) -> f32 {
        f32::from(self.0) / 100.0
    }

    pub fn zoom_in(self) -> Self {
        Self::new(self.0.saturating_add(Self::STEP))
    }

    pub fn zoom_out(self) -> Self {
        Self::new(self.0.saturating_sub(Self::STEP))
    }

    pub fn reset(self) -> Self {
        Self::default()
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl std::fmt::Display for Zoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ─── Hover ───────────────────────────────────────────────────────────────────

/// Per-node hover toggles.
///
/// Each node has its own flag, set on pointer enter and cleared on pointer
/// leave. There is no global "hovered node": two nodes can both be hovered if
/// both received an enter without a leave.
///
/// Sized to one tree; ids outside it are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverState {
    toggles: Vec<bool>,
}

impl HoverState {
    /// Hover state for no tree at all. Every `enter` is ignored.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_tree(tree: &NetworkTree) -> Self {
        Self {
            toggles: vec![false; tree.len()],
        }
    }

    /// Returns `false` when `node` is not part of the tree.
    pub fn enter(&mut self, node: NodeId) -> bool {
        match self.toggles.get_mut(node) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        }
    }

    pub fn leave(&mut self, node: NodeId) {
        if let Some(flag) = self.toggles.get_mut(node) {
            *flag = false;
        }
    }

    pub fn is_hovered(&self, node: NodeId) -> bool {
        self.toggles.get(node).copied().unwrap_or(false)
    }

    pub fn hovered(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.toggles
            .iter()
            .enumerate()
            .filter_map(|(id, on)| on.then_some(id))
    }

    /// Drop every toggle, keeping the tree size.
    pub fn clear(&mut self) {
        self.toggles.iter_mut().for_each(|flag| *flag = false);
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned bounds of the scaled scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

/// A member marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub node: NodeId,
    pub username: Username,
    /// First four characters of the username.
    pub label: String,
    pub placement_code: String,
    pub status: MembershipStatus,
    pub center: Point,
    pub radius: f32,
}

/// Dashed circle standing in for an absent child next to a present sibling.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub parent: NodeId,
    pub side: Side,
    pub center: Point,
    pub radius: f32,
}

/// A straight connector line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub from: Point,
    pub to: Point,
}

/// Detail box shown above a hovered marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub node: NodeId,
    /// Bottom-centre of the box, just above the marker.
    pub anchor: Point,
    pub title: String,
    pub placement_line: String,
    pub status_line: String,
}

/// Everything needed to draw one tree at one zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderScene {
    pub zoom: Zoom,
    /// Unscaled canvas width; the zoom pivot sits at `(canvas_width / 2, 0)`.
    pub canvas_width: f32,
    pub bounds: Bounds,
    pub markers: Vec<Marker>,
    pub placeholders: Vec<Placeholder>,
    pub connectors: Vec<Connector>,
    pub tooltips: Vec<Tooltip>,
}

impl RenderScene {
    pub fn marker(&self, node: NodeId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.node == node)
    }

    /// The marker under `point`, if any. Used to turn a click into a re-root.
    pub fn hit_test(&self, point: Point) -> Option<&Marker> {
        self.markers
            .iter()
            .filter(|m| m.center.distance_to(point) <= m.radius)
            .min_by(|a, b| {
                a.center
                    .distance_to(point)
                    .total_cmp(&b.center.distance_to(point))
            })
    }

    /// Export the scene as an SVG document.
    pub fn to_svg(&self) -> Document {
        let b = self.bounds;
        let mut document = Document::new()
            .set("width", b.width)
            .set("height", b.height)
            .set("viewBox", (b.min_x, b.min_y, b.width, b.height));

        document = document.add(
            Rectangle::new()
                .set("x", b.min_x)
                .set("y", b.min_y)
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", "white"),
        );

        let scale = self.zoom.scale();
        let mut lines = Group::new().set("id", "connectors");
        for c in &self.connectors {
            lines = lines.add(
                Line::new()
                    .set("x1", c.from.x)
                    .set("y1", c.from.y)
                    .set("x2", c.to.x)
                    .set("y2", c.to.y)
                    .set("stroke", LINE_COLOR)
                    .set("stroke-width", scale),
            );
        }
        document = document.add(lines);

        let mut empty = Group::new().set("id", "placeholders").set("opacity", 0.3);
        for p in &self.placeholders {
            empty = empty
                .add(
                    Circle::new()
                        .set("cx", p.center.x)
                        .set("cy", p.center.y)
                        .set("r", p.radius)
                        .set("fill", "#f9fafb")
                        .set("stroke", LINE_COLOR)
                        .set("stroke-dasharray", "3,2"),
                )
                .add(centered_text("-", p.center, 6.0 * scale, "#9ca3af"));
        }
        document = document.add(empty);

        let mut members = Group::new().set("id", "members");
        for m in &self.markers {
            let (fill, stroke) = match m.status {
                MembershipStatus::Active => (ACTIVE_FILL, ACTIVE_STROKE),
                MembershipStatus::Inactive => (INACTIVE_FILL, INACTIVE_STROKE),
            };
            let node = Group::new()
                .set("data-username", m.username.as_str())
                .add(
                    Circle::new()
                        .set("cx", m.center.x)
                        .set("cy", m.center.y)
                        .set("r", m.radius)
                        .set("fill", fill)
                        .set("stroke", stroke)
                        .set("stroke-width", 2.0 * scale),
                )
                .add(centered_text(
                    &m.label,
                    Point::new(m.center.x, m.center.y - 3.0 * scale),
                    7.0 * scale,
                    "white",
                ))
                .add(centered_text(
                    &m.placement_code,
                    Point::new(m.center.x, m.center.y + 6.0 * scale),
                    5.0 * scale,
                    "white",
                ));
            members = members.add(node);
        }
        document = document.add(members);

        let mut tips = Group::new().set("id", "tooltips");
        for t in &self.tooltips {
            let width = 120.0 * scale;
            let height = 40.0 * scale;
            let top = t.anchor.y - height;
            tips = tips
                .add(
                    Rectangle::new()
                        .set("x", t.anchor.x - width / 2.0)
                        .set("y", top)
                        .set("width", width)
                        .set("height", height)
                        .set("rx", 4.0 * scale)
                        .set("fill", "#0f172a"),
                )
                .add(centered_text(
                    &t.title,
                    Point::new(t.anchor.x, top + 11.0 * scale),
                    10.0 * scale,
                    "white",
                ))
                .add(centered_text(
                    &t.placement_line,
                    Point::new(t.anchor.x, top + 22.0 * scale),
                    8.0 * scale,
                    "white",
                ))
                .add(centered_text(
                    &t.status_line,
                    Point::new(t.anchor.x, top + 32.0 * scale),
                    8.0 * scale,
                    "white",
                ));
        }
        document.add(tips)
    }
}

fn centered_text(content: &str, at: Point, size: f32, fill: &str) -> Text {
    Text::new("")
        .set("x", at.x)
        .set("y", at.y)
        .set("font-size", size)
        .set("fill", fill)
        .set("text-anchor", "middle")
        .set("dominant-baseline", "middle")
        .add(svg::node::Text::new(content))
}

// ─── Layout ──────────────────────────────────────────────────────────────────

fn slot_width(widths: &[f32], child: Option<NodeId>) -> f32 {
    child.map(|id| widths[id]).unwrap_or(PLACEHOLDER_DIAMETER)
}

/// Lay out `tree` and build its scene at `zoom` with tooltips for `hover`.
pub fn render(tree: &NetworkTree, zoom: Zoom, hover: &HoverState) -> RenderScene {
    let order = tree.breadth_first(tree.root());
    let nodes = tree.nodes();

    // Subtree widths, children before parents.
    let mut widths = vec![MARKER_DIAMETER; nodes.len()];
    for &id in order.iter().rev() {
        let node = &nodes[id];
        if node.has_children() {
            let row = slot_width(&widths, node.left) + SIBLING_GAP + slot_width(&widths, node.right);
            widths[id] = row.max(MARKER_DIAMETER);
        }
    }

    let content_width = widths[tree.root()];
    let canvas_width = content_width + 2.0 * CANVAS_PADDING;
    let pivot_x = canvas_width / 2.0;
    let scale = zoom.scale();
    let project = |p: Point| Point::new(pivot_x + (p.x - pivot_x) * scale, p.y * scale);

    // Unscaled centres, parents before children.
    let mut centers = vec![Point::default(); nodes.len()];
    centers[tree.root()] = Point::new(pivot_x, CANVAS_PADDING + MARKER_DIAMETER / 2.0);

    let mut markers = Vec::with_capacity(nodes.len());
    let mut placeholders = Vec::new();
    let mut connectors = Vec::new();
    let mut max_y = centers[tree.root()].y + MARKER_DIAMETER / 2.0;

    for &id in &order {
        let node = &nodes[id];
        let center = centers[id];
        markers.push(Marker {
            node: id,
            username: node.member.username.clone(),
            label: node.member.username.short_label().to_string(),
            placement_code: node.member.placement_code.clone(),
            status: node.member.status,
            center: project(center),
            radius: MARKER_DIAMETER / 2.0 * scale,
        });

        if !node.has_children() {
            continue;
        }

        let left_w = slot_width(&widths, node.left);
        let right_w = slot_width(&widths, node.right);
        let row_left = center.x - (left_w + SIBLING_GAP + right_w) / 2.0;
        let row_top = center.y + MARKER_DIAMETER / 2.0 + LEVEL_GAP;
        let bar_y = row_top - CONNECTOR_DROP;

        let slots = [
            (Side::Left, node.left, row_left + left_w / 2.0),
            (
                Side::Right,
                node.right,
                row_left + left_w + SIBLING_GAP + right_w / 2.0,
            ),
        ];

        connectors.push(Connector {
            from: project(Point::new(center.x, center.y + MARKER_DIAMETER / 2.0)),
            to: project(Point::new(center.x, bar_y)),
        });
        connectors.push(Connector {
            from: project(Point::new(slots[0].2, bar_y)),
            to: project(Point::new(slots[1].2, bar_y)),
        });

        for (side, child, x) in slots {
            connectors.push(Connector {
                from: project(Point::new(x, bar_y)),
                to: project(Point::new(x, row_top)),
            });
            match child {
                Some(child_id) => {
                    centers[child_id] = Point::new(x, row_top + MARKER_DIAMETER / 2.0);
                    max_y = max_y.max(row_top + MARKER_DIAMETER);
                }
                None => {
                    placeholders.push(Placeholder {
                        parent: id,
                        side,
                        center: project(Point::new(x, row_top + PLACEHOLDER_DIAMETER / 2.0)),
                        radius: PLACEHOLDER_DIAMETER / 2.0 * scale,
                    });
                    max_y = max_y.max(row_top + PLACEHOLDER_DIAMETER);
                }
            }
        }
    }

    let tooltips = markers
        .iter()
        .filter(|m| hover.is_hovered(m.node))
        .map(|m| Tooltip {
            node: m.node,
            anchor: Point::new(m.center.x, m.center.y - m.radius - 8.0 * scale),
            title: m.username.to_string(),
            placement_line: format!("ID: {}", m.placement_code),
            status_line: format!("Status: {}", m.status.label()),
        })
        .collect();

    let top_left = project(Point::new(0.0, 0.0));
    let bottom_right = project(Point::new(canvas_width, max_y + CANVAS_PADDING));
    RenderScene {
        zoom,
        canvas_width,
        bounds: Bounds {
            min_x: top_left.x,
            min_y: top_left.y,
            width: bottom_right.x - top_left.x,
            height: bottom_right.y - top_left.y,
        },
        markers,
        placeholders,
        connectors,
        tooltips,
    }
}
