// src/debug/visualization/svg.rs
use crate::math::{geometry::surface::Surface, types::*};
use crate::sim::resources::TrackPoint;
use crate::survey::error::SurveyResult;
use std::path::Path;
use svg::Document;
use svg::node::element::{Circle, Polygon, Polyline, Rectangle, Style};

/// Oberhalb dieser Flächenanzahl wird das Dreiecksnetz nicht gezeichnet.
const MAX_DRAWN_FACES: usize = 5_000;
const SVG_PIXEL_SIZE: f64 = 1024.0;

// ===================================================================================
// 1. HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Baut ein SVG-Dokument in Weltkoordinaten auf.
///
/// Die Y-Achse wird gespiegelt, damit Norden oben liegt.
struct SvgBuilder {
    document: Document,
    stroke_w_normal: f64,
    point_radius: f64,
}

impl SvgBuilder {
    /// Erstellt ein neues SVG-Grundgerüst mit Stil und Hintergrund.
    fn new(display_bounds: &Bounds2D) -> Self {
        let width = display_bounds.width().max(f64::EPSILON);
        let height = display_bounds.height().max(f64::EPSILON);
        let extent = (width + height) / 2.0;

        let stroke_w_normal = extent * 0.004;
        let stroke_w_thin = extent * 0.0015;
        let point_radius = extent * 0.004;

        let style = format!(
            r#"
    .background {{ fill: #f0f0f0; }}
    .surface-bounds {{ fill: none; stroke: #888888; stroke-width: {stroke_w_thin}; stroke-dasharray: {dash},{dash}; }}
    .face {{ fill: #dde8f0; stroke: #aabbcc; stroke-width: {stroke_w_thin}; }}
    .debris {{ fill: rgba(200, 80, 40, 0.5); stroke: #aa3300; stroke-width: {stroke_w_thin}; }}
    .track {{ fill: none; stroke: #0044cc; stroke-width: {stroke_w_normal}; }}
    .miss {{ fill: #cc0000; }}
    .start {{ fill: #00aa00; }}
"#,
            dash = extent * 0.01,
        );

        // Gespiegelte Y-Achse: die Oberkante der ViewBox ist -max_y
        let document = Document::new()
            .set("width", SVG_PIXEL_SIZE)
            .set("height", SVG_PIXEL_SIZE * height / width)
            .set(
                "viewBox",
                (display_bounds.min.x, -display_bounds.max.y, width, height),
            )
            .add(Style::new(style))
            .add(
                Rectangle::new()
                    .set("x", display_bounds.min.x)
                    .set("y", -display_bounds.max.y)
                    .set("width", width)
                    .set("height", height)
                    .set("class", "background"),
            );

        Self {
            document,
            stroke_w_normal,
            point_radius,
        }
    }

    fn points_attr(points: impl IntoIterator<Item = Point2D>) -> String {
        points
            .into_iter()
            .map(|p| format!("{:.3},{:.3}", p.x, -p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Zeichnet ein geschlossenes Polygon.
    fn draw_polygon(mut self, vertices: &[Point2D], class: &str) -> Self {
        if vertices.len() < 3 {
            return self;
        }
        self.document = self.document.add(
            Polygon::new()
                .set("points", Self::points_attr(vertices.iter().copied()))
                .set("class", class),
        );
        self
    }

    /// Zeichnet einen offenen Linienzug.
    fn draw_polyline(mut self, vertices: &[Point2D], class: &str) -> Self {
        if vertices.len() < 2 {
            return self;
        }
        self.document = self.document.add(
            Polyline::new()
                .set("points", Self::points_attr(vertices.iter().copied()))
                .set("class", class),
        );
        self
    }

    /// Zeichnet einen Kreis.
    fn draw_circle(mut self, center: Point2D, radius: f64, class: &str) -> Self {
        self.document = self.document.add(
            Circle::new()
                .set("cx", center.x)
                .set("cy", -center.y)
                .set("r", radius)
                .set("class", class),
        );
        self
    }

    /// Zeichnet ein Rechteck.
    fn draw_rect(mut self, bounds: &Bounds2D, class: &str) -> Self {
        self.document = self.document.add(
            Rectangle::new()
                .set("x", bounds.min.x)
                .set("y", -bounds.max.y)
                .set("width", bounds.width())
                .set("height", bounds.height())
                .set("class", class),
        );
        self
    }

    fn finish(self) -> Document {
        self.document
    }
}

/// Erstellt das Dokument für einen Vermessungslauf: Oberfläche, Trümmerflächen,
/// gefahrene Spur und Positionen ohne Tiefenwert.
pub fn build_track_plot(
    surface: &Surface,
    footprints: &[[Point2D; 4]],
    track: &[TrackPoint],
) -> Document {
    let surface_bounds = surface.bounds().xy();
    let mut display_bounds = surface_bounds;
    for point in track {
        display_bounds.expand_to_include_point(point.position);
    }
    let margin = (display_bounds.width() + display_bounds.height()) * 0.02;
    let display_bounds = display_bounds.expand(margin.max(1.0));

    let mut svg = SvgBuilder::new(&display_bounds);

    if surface.face_count() <= MAX_DRAWN_FACES {
        for face in 0..surface.face_count() {
            let corners = surface.face_vertices(face).map(|v| v.truncate());
            svg = svg.draw_polygon(&corners, "face");
        }
    }
    svg = svg.draw_rect(&surface_bounds, "surface-bounds");

    for &[p1, p2, p3, p4] in footprints {
        // Umlaufreihenfolge des Rechtecks: P1, P2, P4, P3
        svg = svg.draw_polygon(&[p1, p2, p4, p3], "debris");
    }

    let positions: Vec<Point2D> = track.iter().map(|p| p.position).collect();
    svg = svg.draw_polyline(&positions, "track");

    let miss_radius = svg.point_radius;
    for point in track.iter().filter(|p| p.depth.is_none()) {
        svg = svg.draw_circle(point.position, miss_radius, "miss");
    }
    if let Some(first) = positions.first() {
        let start_radius = svg.point_radius * 1.5 + svg.stroke_w_normal;
        svg = svg.draw_circle(*first, start_radius, "start");
    }

    svg.finish()
}

/// Schreibt den Track-Plot als SVG-Datei.
pub fn write_track_plot(
    path: &Path,
    surface: &Surface,
    footprints: &[[Point2D; 4]],
    track: &[TrackPoint],
) -> SurveyResult<()> {
    let document = build_track_plot(surface, footprints, track);
    svg::save(path, &document)?;
    Ok(())
}
