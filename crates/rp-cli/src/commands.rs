//! Subcommand implementations. Each takes the layout text and returns what
//! to print; file I/O stays in `main`.

use rp_core::codec::{self, from_json, to_json};
use rp_core::{EditorConfig, GeometryModel, LayoutError, RoomGraph, RoomNode, ShapeId, ShapeRegistry};
use rp_render::{SvgTheme, compute_connections, render_svg};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Summary,
    Check,
    Prune,
    Svg,
    Graph,
}

impl Command {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "summary" => Some(Self::Summary),
            "check" => Some(Self::Check),
            "prune" => Some(Self::Prune),
            "svg" => Some(Self::Svg),
            "graph" => Some(Self::Graph),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Check => "check",
            Self::Prune => "prune",
            Self::Svg => "svg",
            Self::Graph => "graph",
        }
    }

    /// Commands whose output is a document rather than a report.
    pub fn writes_output(self) -> bool {
        matches!(self, Self::Prune | Self::Svg)
    }
}

#[derive(Debug, Default)]
pub struct Report {
    pub stdout: String,
    /// Printed to stderr.
    pub notice: Option<String>,
    /// Exit non-zero.
    pub failed: bool,
}

pub fn execute(command: Command, text: &str, config: &EditorConfig) -> Result<Report, LayoutError> {
    let document = from_json(text)?;
    let (registry, geometry) = codec::deserialize_with(&document, config)?;

    match command {
        Command::Summary => Ok(summary(&registry)),
        Command::Check => Ok(check(&registry)),
        Command::Prune => prune(registry, &geometry),
        Command::Svg => Ok(svg(&registry, &geometry)),
        Command::Graph => Ok(graph(&registry)),
    }
}

fn display_name(registry: &ShapeRegistry, id: ShapeId) -> String {
    match registry.get(id).and_then(|s| s.kind.label()) {
        Some(label) if !label.is_empty() => format!("{label} ({id})"),
        _ => id.to_string(),
    }
}

fn summary(registry: &ShapeRegistry) -> Report {
    let rooms = registry.rooms().count();
    let apertures = registry.apertures().count();
    let links: usize = registry
        .apertures()
        .map(|a| a.kind.connected_rooms().len())
        .sum();
    let dangling = registry.dangling_links().len();

    let mut out = String::new();
    let _ = writeln!(out, "shapes:    {}", registry.len());
    let _ = writeln!(out, "rooms:     {rooms}");
    let _ = writeln!(out, "apertures: {apertures}");
    let _ = writeln!(out, "links:     {links}");
    let _ = writeln!(out, "dangling:  {dangling}");
    Report {
        stdout: out,
        ..Report::default()
    }
}

fn check(registry: &ShapeRegistry) -> Report {
    let dangling = registry.dangling_links();
    if dangling.is_empty() {
        return Report {
            stdout: "ok\n".to_string(),
            ..Report::default()
        };
    }

    let mut out = String::new();
    for (aperture, room) in &dangling {
        let _ = writeln!(out, "{aperture}: links missing room {room}");
    }
    log::warn!("{} dangling link(s)", dangling.len());
    Report {
        stdout: out,
        notice: None,
        failed: true,
    }
}

fn prune(mut registry: ShapeRegistry, geometry: &GeometryModel) -> Result<Report, LayoutError> {
    let removed = registry.prune_dangling_links();
    let mut stdout = to_json(&codec::serialize(&registry, geometry))?;
    stdout.push('\n');
    Ok(Report {
        stdout,
        notice: Some(format!("pruned {removed} dangling link(s)")),
        failed: false,
    })
}

fn svg(registry: &ShapeRegistry, geometry: &GeometryModel) -> Report {
    let lines = compute_connections(registry, geometry);
    let mut stdout = render_svg(registry, geometry, &lines, &SvgTheme::default());
    stdout.push('\n');
    Report {
        stdout,
        ..Report::default()
    }
}

fn graph(registry: &ShapeRegistry) -> Report {
    let graph = RoomGraph::build(registry);
    let mut out = String::new();

    for room in registry.rooms() {
        let neighbors: Vec<String> = graph
            .neighbors(room.id)
            .into_iter()
            .map(|n| match n {
                RoomNode::Room(id) => display_name(registry, id),
                RoomNode::Outside => "outside".to_string(),
            })
            .collect();
        let _ = writeln!(
            out,
            "{} -> [{}]{}",
            display_name(registry, room.id),
            neighbors.join(", "),
            if graph.reaches_outside(room.id) {
                ""
            } else {
                "  (sealed)"
            }
        );
    }
    // Component count includes the outside node.
    let _ = writeln!(
        out,
        "rooms: {}, apertures in graph: {}, components: {}",
        graph.room_count(),
        graph.aperture_count(),
        graph.component_count()
    );
    Report {
        stdout: out,
        ..Report::default()
    }
}
