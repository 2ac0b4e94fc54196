//! Core data models for the pace note pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point as delivered by the routing/elevation provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub lat: f64,
    pub lon: f64,
    /// Missing elevation is treated as 0.
    #[serde(default)]
    pub elevation_m: Option<f64>,
}

impl RawPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            elevation_m: None,
        }
    }

    pub fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = Some(elevation_m);
        self
    }
}

/// A completed route ready for analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteInput {
    pub points: Vec<RawPoint>,
    /// Route length reported by the provider. Falls back to the measured length.
    #[serde(default)]
    pub total_distance_m: Option<f64>,
}

impl RouteInput {
    pub fn new(points: Vec<RawPoint>) -> Self {
        Self {
            points,
            total_distance_m: None,
        }
    }
}

/// A route point annotated with its cumulative distance from the start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation_m: f64,
    pub distance_m: f64,
}

impl RoutePoint {
    pub fn position(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Direction of a signed heading change (positive = clockwise).
    pub fn from_turn(turn_deg: f64) -> Option<Self> {
        if turn_deg > 0.0 {
            Some(Direction::Right)
        } else if turn_deg < 0.0 {
            Some(Direction::Left)
        } else {
            None
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// McRae corner class: 1 is the tightest, 6 is nearly flat out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const TIGHTEST: Grade = Grade(1);
    pub const FLATTEST: Grade = Grade(6);

    pub fn new(value: u8) -> Option<Self> {
        (1..=6).contains(&value).then_some(Grade(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn diff(self, other: Grade) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value).ok_or_else(|| format!("grade {value} is outside 1..=6"))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named corner shapes. Each is an alias for a tight enough numeric class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnShape {
    Hairpin,
    Square,
    Acute,
}

impl TurnShape {
    /// Loosest grade the shape may stand for.
    pub fn max_grade(self) -> Grade {
        match self {
            TurnShape::Hairpin => Grade(2),
            TurnShape::Square | TurnShape::Acute => Grade(3),
        }
    }
}

impl fmt::Display for TurnShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnShape::Hairpin => write!(f, "Hairpin"),
            TurnShape::Square => write!(f, "Square"),
            TurnShape::Acute => write!(f, "Acute"),
        }
    }
}

/// Corner severity: a numeric grade, optionally called by its shape name.
///
/// The shape can only be attached when the grade is at least as tight as the
/// shape's cap, so a "Hairpin" is never looser than a plain "2".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SeverityRepr")]
pub struct Severity {
    grade: Grade,
    shape: Option<TurnShape>,
}

#[derive(Deserialize)]
struct SeverityRepr {
    grade: Grade,
    #[serde(default)]
    shape: Option<TurnShape>,
}

impl TryFrom<SeverityRepr> for Severity {
    type Error = String;

    fn try_from(repr: SeverityRepr) -> Result<Self, Self::Error> {
        match repr.shape {
            None => Ok(Severity::numeric(repr.grade)),
            Some(shape) => Severity::shaped(repr.grade, shape).ok_or_else(|| {
                format!("{shape} cannot stand for grade {}", repr.grade)
            }),
        }
    }
}

impl Severity {
    pub fn numeric(grade: Grade) -> Self {
        Self { grade, shape: None }
    }

    pub fn shaped(grade: Grade, shape: TurnShape) -> Option<Self> {
        (grade <= shape.max_grade()).then_some(Self {
            grade,
            shape: Some(shape),
        })
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn shape(&self) -> Option<TurnShape> {
        self.shape
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Some(shape) => write!(f, "{shape}"),
            None => write!(f, "{}", self.grade),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "to", rename_all = "snake_case")]
pub enum Modifier {
    Long,
    Short,
    /// Radius closes up mid-corner to the given grade.
    Tightens(Grade),
    /// Radius opens out mid-corner to the given grade.
    Widens(Grade),
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Long => write!(f, "Long"),
            Modifier::Short => write!(f, "Short"),
            Modifier::Tightens(grade) => write!(f, "tightens {grade}"),
            Modifier::Widens(grade) => write!(f, "widens {grade}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hazard {
    Crest,
    Dip,
    Jump,
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hazard::Crest => write!(f, "Crest"),
            Hazard::Dip => write!(f, "Dip"),
            Hazard::Jump => write!(f, "Jump"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    Caution,
    HeavyBraking,
    /// Reduced forward visibility.
    Blind,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::Caution => write!(f, "Caution"),
            Advisory::HeavyBraking => write!(f, "Heavy Braking"),
            Advisory::Blind => write!(f, "Blind"),
        }
    }
}

/// Second corner of a chicane, kept only for display/export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChicaneLink {
    pub direction: Direction,
    pub severity: Severity,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub position_m: f64,
}

/// Everything the co-driver calls for a single corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnCall {
    pub direction: Direction,
    pub severity: Severity,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Total heading change through the corner (unsigned).
    pub angle_deg: f64,
    /// Radius the severity was classified from.
    pub radius_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chicane: Option<ChicaneLink>,
}

impl TurnCall {
    /// "4", "Hairpin", or a compound "4 into 6" for chicanes.
    pub fn severity_label(&self) -> String {
        match &self.chicane {
            Some(link) => format!("{} into {}", self.severity, link.severity),
            None => self.severity.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Callout {
    Start,
    Turn(TurnCall),
    /// Elevation hazard between corners.
    Straight,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Start,
    Turn,
    SpecialTurn,
    Straight,
    Finish,
}

/// A single pace note in route order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceNote {
    pub position_m: f64,
    #[serde(flatten)]
    pub callout: Callout,
    #[serde(default)]
    pub hazards: Vec<Hazard>,
    #[serde(default)]
    pub advisories: Vec<Advisory>,
    /// Distance to the following note, `None` on the last note.
    pub distance_to_next_m: Option<f64>,
}

impl PaceNote {
    pub fn new(position_m: f64, callout: Callout) -> Self {
        Self {
            position_m,
            callout,
            hazards: Vec::new(),
            advisories: Vec::new(),
            distance_to_next_m: None,
        }
    }

    pub fn start() -> Self {
        Self::new(0.0, Callout::Start)
    }

    pub fn finish(position_m: f64) -> Self {
        Self::new(position_m, Callout::Finish)
    }

    pub fn kind(&self) -> NoteKind {
        match &self.callout {
            Callout::Start => NoteKind::Start,
            Callout::Turn(turn) if turn.severity.shape().is_some() => NoteKind::SpecialTurn,
            Callout::Turn(_) => NoteKind::Turn,
            Callout::Straight => NoteKind::Straight,
            Callout::Finish => NoteKind::Finish,
        }
    }

    pub fn turn(&self) -> Option<&TurnCall> {
        match &self.callout {
            Callout::Turn(turn) => Some(turn),
            _ => None,
        }
    }

    pub fn turn_mut(&mut self) -> Option<&mut TurnCall> {
        match &mut self.callout {
            Callout::Turn(turn) => Some(turn),
            _ => None,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        self.turn().map(|turn| turn.direction)
    }

    pub fn grade(&self) -> Option<Grade> {
        self.turn().map(|turn| turn.severity.grade())
    }

    pub fn add_hazard(&mut self, hazard: Hazard) {
        if !self.hazards.contains(&hazard) {
            self.hazards.push(hazard);
        }
    }

    pub fn add_advisory(&mut self, advisory: Advisory) {
        if !self.advisories.contains(&advisory) {
            self.advisories.push(advisory);
        }
    }
}

fn write_modifiers(f: &mut fmt::Formatter<'_>, modifiers: &[Modifier]) -> fmt::Result {
    for modifier in modifiers {
        write!(f, " {modifier}")?;
    }
    Ok(())
}

impl fmt::Display for PaceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6.0}m  ", self.position_m)?;
        match &self.callout {
            Callout::Start => write!(f, "Start")?,
            Callout::Finish => write!(f, "Finish")?,
            Callout::Straight => write!(f, "Straight")?,
            Callout::Turn(turn) => {
                write!(f, "{} {}", turn.direction, turn.severity)?;
                write_modifiers(f, &turn.modifiers)?;
                if let Some(link) = &turn.chicane {
                    write!(f, " into {} {}", link.direction, link.severity)?;
                    write_modifiers(f, &link.modifiers)?;
                }
            }
        }
        for hazard in &self.hazards {
            write!(f, " {hazard}")?;
        }
        if !self.advisories.is_empty() {
            let advisories: Vec<String> = self.advisories.iter().map(|a| a.to_string()).collect();
            write!(f, " ! {}", advisories.join(", "))?;
        }
        if let Some(distance) = self.distance_to_next_m {
            write!(f, "  [{distance:.0}m]")?;
        }
        Ok(())
    }
}
