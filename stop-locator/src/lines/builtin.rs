//! Built-in line data: line 400 Udine-Grado.

use crate::domain::{Coordinate, Line};

/// Stops of line 400 in travel order, with coordinates.
const LINE_400_STOPS: [(&str, f64, f64); 16] = [
    ("Udine", 46.0625, 13.2354),
    ("Lauzacco", 45.9833, 13.2833),
    ("S. Stefano Udinese", 45.9667, 13.3000),
    ("S. Maria La Longa", 45.9333, 13.3167),
    ("Mereto Di Capitolo", 45.9167, 13.3333),
    ("Palmanova", 45.9000, 13.3500),
    ("Sevegliano", 45.8833, 13.3667),
    ("Strassoldo", 45.8667, 13.3833),
    ("Muscoli", 45.8500, 13.4000),
    ("Cervignano SS14", 45.8333, 13.4167),
    ("Cervignano FS", 45.8300, 13.4200),
    ("Cervignano AUT", 45.8275, 13.4225),
    ("Terzo Di Aquileia", 45.8167, 13.4333),
    ("Aquileia", 45.8000, 13.4500),
    ("Belvedere", 45.7833, 13.4667),
    ("Grado", 45.7667, 13.4833),
];

/// Anchor stops for nearest-start assignment, in priority order.
const LINE_400_ANCHORS: [&str; 4] = ["Udine", "Palmanova", "Cervignano FS", "Grado"];

pub(super) fn line_400() -> Line {
    Line {
        id: "400".to_string(),
        name: "Udine-Grado".to_string(),
        stops: LINE_400_STOPS
            .iter()
            .map(|(name, _, _)| name.to_string())
            .collect(),
        anchors: LINE_400_ANCHORS.iter().map(|s| s.to_string()).collect(),
    }
}

pub(super) fn line_400_coordinates() -> impl Iterator<Item = (String, Coordinate)> {
    LINE_400_STOPS
        .iter()
        .map(|(name, lat, lon)| (name.to_string(), Coordinate::new(*lat, *lon)))
}
