//! SVG import - build a drawing from an SVG export of a plan.
//!
//! Geometry goes through usvg for complete SVG resolution (shapes, CSS,
//! `use` references), and Bézier curves are flattened with lyon_geom.
//! usvg lays text out as glyph outlines, which loses the label strings,
//! so `<text>` elements are read separately with quick-xml.
//!
//! Transforms are not applied to either; plans exported flat (no group
//! transforms) import with their drawing coordinates intact.

use std::collections::HashSet;

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

use crate::drawing::{Entity, MemoryDrawing};
use crate::geometry::Point3;

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),
    #[error("XML error at position {position}: {message}")]
    Xml { position: u64, message: String },
    #[error("no paths or text found in SVG")]
    Empty,
}

/// Tolerance for curve flattening.
/// Lower = more points, smoother curves, slower.
const CURVE_TOLERANCE: f32 = 0.1;

/// Build a drawing from SVG content: one polyline entity per subpath, one
/// text entity per `<text>` element.
pub fn drawing_from_svg(svg_content: &str) -> Result<MemoryDrawing, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| SvgError::Parse(e.to_string()))?;

    let mut imported = Vec::new();
    extract_from_group(tree.root(), &mut imported);
    let path_count = imported.len();

    imported.extend(extract_text(svg_content)?);

    if imported.is_empty() {
        return Err(SvgError::Empty);
    }

    tracing::debug!(paths = path_count, texts = imported.len() - path_count, "imported SVG");
    MemoryDrawing::new(with_unique_ids(imported)).map_err(|e| SvgError::Parse(e.to_string()))
}

/// An imported entity and whether its id came from the file.
struct Imported {
    entity: Entity,
    named: bool,
}

/// Resolve id collisions with a numeric suffix.
///
/// Ids written in the file are reserved first, in document order, so a
/// generated id (`path-3`, `outline-0`) never takes a name the author used.
fn with_unique_ids(mut imported: Vec<Imported>) -> Vec<Entity> {
    let mut taken: HashSet<String> = HashSet::new();

    for named in [true, false] {
        for item in imported.iter_mut().filter(|item| item.named == named) {
            let id = unique_id(&item.entity.id, &taken);
            if id != item.entity.id {
                tracing::debug!(from = %item.entity.id, to = %id, "renamed duplicate id");
            }
            taken.insert(id.clone());
            item.entity.id = id;
        }
    }

    imported.into_iter().map(|item| item.entity).collect()
}

fn unique_id(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_default()
}

fn extract_from_group(group: &usvg::Group, entities: &mut Vec<Imported>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => extract_from_group(group, entities),
            usvg::Node::Path(path) => path_to_polylines(path, entities),
            // Text is read from the source; images carry no geometry.
            _ => {}
        }
    }
}

/// Convert a usvg path into polyline entities, one per subpath.
fn path_to_polylines(path: &usvg::Path, entities: &mut Vec<Imported>) {
    let base_id = if path.id().is_empty() {
        format!("path-{}", entities.len())
    } else {
        path.id().to_string()
    };

    let mut subpaths: Vec<(Vec<Point3>, bool)> = Vec::new();
    let mut points: Vec<Point3> = Vec::new();
    let mut closed = false;
    let mut last_point: Option<(f32, f32)> = None;

    let to_point = |x: f32, y: f32| Point3::new(x as f64, y as f64, 0.0);

    for cmd in path.data().segments() {
        match cmd {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                if !points.is_empty() {
                    subpaths.push((std::mem::take(&mut points), closed));
                }
                closed = false;
                points.push(to_point(p.x, p.y));
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                points.push(to_point(p.x, p.y));
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last_point {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                        points.push(to_point(segment.to.x, segment.to.y));
                    });
                } else {
                    points.push(to_point(p.x, p.y));
                }
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last_point {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
                        points.push(to_point(segment.to.x, segment.to.y));
                    });
                } else {
                    points.push(to_point(p.x, p.y));
                }
                last_point = Some((p.x, p.y));
            }
            usvg::tiny_skia_path::PathSegment::Close => {
                closed = true;
            }
        }
    }
    if !points.is_empty() {
        subpaths.push((points, closed));
    }

    let count = subpaths.len();
    for (i, (mut pts, closed)) in subpaths.into_iter().enumerate() {
        // Curve flattening can emit repeated points.
        pts.dedup_by(|a, b| (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
        // Closure is logical; drop an explicit repeat of the first vertex.
        if closed && pts.len() > 2 && pts.first() == pts.last() {
            pts.pop();
        }
        if pts.len() < 2 {
            continue;
        }

        let id = if count == 1 { base_id.clone() } else { format!("{}-{}", base_id, i) };
        entities.push(Imported {
            entity: Entity::polyline(id, pts, closed),
            named: count == 1 && !path.id().is_empty(),
        });
    }
}

/// Pending `<text>` element while its content is being read.
struct OpenText {
    id: Option<String>,
    anchor: Option<Point3>,
    content: String,
    depth: usize,
}

/// Read every `<text>` element: its character content (tspans included)
/// and its anchor from the `x`/`y` attributes.
fn extract_text(svg_content: &str) -> Result<Vec<Imported>, SvgError> {
    let mut reader = Reader::from_str(svg_content);

    let mut texts = Vec::new();
    let mut open: Option<OpenText> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if let Some(text) = open.as_mut() {
                    // A tspan can carry the position when the text doesn't.
                    if text.anchor.is_none() {
                        text.anchor = anchor_of(e);
                    }
                    text.depth += 1;
                } else if e.name().as_ref() == b"text" {
                    open = Some(OpenText {
                        id: attr(e, b"id"),
                        anchor: anchor_of(e),
                        content: String::new(),
                        depth: 0,
                    });
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(text) = open.as_mut() {
                    let chunk = e.unescape().map_err(|err| SvgError::Xml {
                        position: reader.error_position() as u64,
                        message: err.to_string(),
                    })?;
                    text.content.push_str(&chunk);
                }
            }
            Ok(Event::End(_)) => {
                let finished = match open.as_mut() {
                    Some(text) if text.depth > 0 => {
                        text.depth -= 1;
                        false
                    }
                    Some(_) => true,
                    None => false,
                };
                if let Some(done) = open.take_if(|_| finished) {
                    let named = done.id.is_some();
                    let id = done.id.unwrap_or_else(|| format!("text-{}", texts.len()));
                    texts.push(Imported {
                        entity: Entity::text(id, done.content.trim(), done.anchor),
                        named,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SvgError::Xml {
                    position: reader.error_position() as u64,
                    message: e.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(texts)
}

fn attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// First coordinate of an SVG length list such as `x="10 20 30"`.
fn first_coordinate(value: &str) -> Option<f64> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .find(|s| !s.is_empty())
        .and_then(|s| s.trim_end_matches("px").parse().ok())
}

fn anchor_of(e: &BytesStart) -> Option<Point3> {
    let x = attr(e, b"x").as_deref().and_then(first_coordinate)?;
    let y = attr(e, b"y").as_deref().and_then(first_coordinate)?;
    Some(Point3::new(x, y, 0.0))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{Drawing, EntityKind};

    #[test]
    fn rect_becomes_closed_polyline() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect id="pad" x="10" y="10" width="80" height="80"/>
            </svg>
        "#;

        let drawing = drawing_from_svg(svg).unwrap();
        let pad = drawing.entity("pad").unwrap();
        match &pad.kind {
            EntityKind::Polyline { vertices, closed, .. } => {
                assert!(*closed);
                assert_eq!(vertices.len(), 4);
            }
            other => panic!("expected polyline, got {:?}", other),
        }
    }

    #[test]
    fn polyline_stays_open() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <polyline id="edge" points="0,0 50,0 50,50" fill="none" stroke="black"/>
            </svg>
        "#;

        let drawing = drawing_from_svg(svg).unwrap();
        let edge = drawing.entity("edge").unwrap();
        assert!(matches!(edge.kind, EntityKind::Polyline { closed: false, .. }));
        assert_eq!(edge.vertices().unwrap().len(), 3);
    }

    #[test]
    fn text_with_anchor_and_tspan() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <rect x="0" y="0" width="10" height="10"/>
                <text id="lbl" x="12" y="34">FG=<tspan>23.5</tspan></text>
                <text><tspan x="5" y="6">H 7,25</tspan></text>
            </svg>
        "#;

        let drawing = drawing_from_svg(svg).unwrap();

        let lbl = drawing.entity("lbl").unwrap().text_candidate().unwrap();
        assert_eq!(lbl.text, "FG=23.5");
        assert_eq!(lbl.anchor, Some(Point3::new(12.0, 34.0, 0.0)));

        let texts: Vec<_> = drawing
            .entities
            .iter()
            .filter_map(|e| e.text_candidate())
            .collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[1].text, "H 7,25");
        assert_eq!(texts[1].anchor, Some(Point3::new(5.0, 6.0, 0.0)));
    }

    #[test]
    fn bezier_is_flattened() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <path id="curve" d="M 10,10 C 40,10 60,90 90,90" fill="none" stroke="black"/>
            </svg>
        "#;

        let drawing = drawing_from_svg(svg).unwrap();
        let curve = drawing.entity("curve").unwrap();
        assert!(curve.vertices().unwrap().len() > 5);
    }

    #[test]
    fn subpaths_split() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <path id="two" d="M 0,0 L 10,0 L 10,10 Z M 20,20 L 30,20" fill="none" stroke="black"/>
            </svg>
        "#;

        let drawing = drawing_from_svg(svg).unwrap();
        assert_eq!(drawing.entity_ids(), vec!["two-0", "two-1"]);
        assert!(matches!(drawing.entity("two-0").unwrap().kind, EntityKind::Polyline { closed: true, .. }));
        assert!(matches!(drawing.entity("two-1").unwrap().kind, EntityKind::Polyline { closed: false, .. }));
    }

    #[test]
    fn generated_ids_never_collide() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <path id="two" d="M 0,0 L 10,0 L 10,10 Z M 20,20 L 30,20" fill="none" stroke="black"/>
                <path id="two-0" d="M 50,50 L 60,50" fill="none" stroke="black"/>
                <path d="M 70,70 L 80,70" fill="none" stroke="black"/>
                <text id="path-3" x="1" y="1">FG=1.0</text>
                <text x="2" y="2">FG=2.0</text>
                <text id="text-1" x="3" y="3">FG=3.0</text>
            </svg>
        "#;

        let drawing = drawing_from_svg(svg).unwrap();
        assert_eq!(
            drawing.entity_ids(),
            vec!["two-0-1", "two-1", "two-0", "path-3-1", "path-3", "text-1-1", "text-1"]
        );

        // Ids written in the file keep their entity.
        let authored = drawing.entity("two-0").unwrap().vertices().unwrap();
        assert_eq!(authored[0], Point3::new(50.0, 50.0, 0.0));
        let label = drawing.entity("path-3").unwrap().text_candidate().unwrap();
        assert_eq!(label.text, "FG=1.0");
    }

    #[test]
    fn text_keeps_space_before_tspan() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <text id="top" x="1" y="2">
                    TOP <tspan>14,75</tspan>
                </text>
            </svg>
        "#;

        let drawing = drawing_from_svg(svg).unwrap();
        let top = drawing.entity("top").unwrap().text_candidate().unwrap();
        assert_eq!(top.text, "TOP 14,75");
    }

    #[test]
    fn empty_svg_error() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"></svg>"#;
        assert!(matches!(drawing_from_svg(svg), Err(SvgError::Empty)));
    }

    #[test]
    fn coordinate_lists() {
        assert_eq!(first_coordinate("10 20 30"), Some(10.0));
        assert_eq!(first_coordinate(" 4.5,6"), Some(4.5));
        assert_eq!(first_coordinate("12px"), Some(12.0));
        assert_eq!(first_coordinate(""), None);
    }
}
