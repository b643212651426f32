#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the outpost scenario generator.
//!
//! This crate defines the value types that flow through the generation
//! pipeline and out to the fairness harness. The generator produces a
//! [`Scenario`] from a [`Seed`], the metrics engine reads it back as an
//! immutable value, and adapters serialise it for inspection. Nothing here
//! mutates a scenario after construction.

pub mod geometry;
pub mod rng;

use serde::{Deserialize, Serialize};

pub use rng::{Rng, XorShiftRng};

/// Width of the playable map measured in world units.
pub const MAP_WIDTH: f64 = 2_000.0;

/// Height of the playable map measured in world units.
pub const MAP_HEIGHT: f64 = 1_800.0;

/// Number of players seated in every generated scenario.
pub const PLAYER_COUNT: usize = 5;

/// Number of structures each player owns at the start of a session.
pub const OWNED_PER_PLAYER: usize = 4;

/// Number of unowned outposts placed in every scenario.
pub const NEUTRAL_COUNT: usize = 10;

/// Total structure count of a valid scenario.
pub const STRUCTURE_COUNT: usize = PLAYER_COUNT * OWNED_PER_PLAYER + NEUTRAL_COUNT;

/// Normalised generator seed. Always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// Creates a seed, clamping zero up to one.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        if value == 0 { Self(1) } else { Self(value) }
    }

    /// Normalises an arbitrary float by taking its absolute value, flooring it
    /// and clamping the result to at least one.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self(1);
        }
        let floored = value.abs().floor();
        if floored >= u64::MAX as f64 {
            return Self(u64::MAX);
        }
        Self::new(floored as u64)
    }

    /// Numeric value of the seed.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Seed used when a generation attempt has to be restarted.
    #[must_use]
    pub const fn successor(&self) -> Self {
        Self::new(self.0.wrapping_add(1))
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

/// Location in map space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal coordinate, nominally within `[0, MAP_WIDTH]`.
    pub x: f64,
    /// Vertical coordinate, nominally within `[0, MAP_HEIGHT]`.
    pub y: f64,
}

impl Point2D {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle in radians of the ray from `self` toward `other`.
    #[must_use]
    pub fn angle_to(self, other: Point2D) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Point reached by travelling `radius` units from `self` along `angle`.
    #[must_use]
    pub fn polar_offset(self, angle: f64, radius: f64) -> Point2D {
        Point2D::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }

    /// Returns `true` when the point lies inside the rectangle inset by `margin`.
    #[must_use]
    pub fn within_bounds(self, width: f64, height: f64, margin: f64) -> bool {
        self.x >= margin
            && self.x <= width - margin
            && self.y >= margin
            && self.y <= height - margin
    }
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Display colour assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl PlayerColor {
    /// Creates a new player color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Participant seated in a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    color: PlayerColor,
}

impl Player {
    /// Creates a new player.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            id,
            name: name.into(),
            color,
        }
    }

    /// Identifier of the player.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Display name of the player.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display colour of the player.
    #[must_use]
    pub const fn color(&self) -> PlayerColor {
        self.color
    }
}

/// Unique identifier assigned to an outpost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutpostId(u32);

impl OutpostId {
    /// Creates a new outpost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Building types an outpost can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutpostKind {
    /// Player command hub.
    Hq,
    /// Drone production building.
    Foundry,
    /// Power building.
    Reactor,
    /// Resource building. Never produced by the generator.
    Extractor,
}

impl OutpostKind {
    /// Radius of the outpost footprint in world units.
    #[must_use]
    pub const fn footprint_radius(self) -> f64 {
        match self {
            Self::Hq => 34.0,
            Self::Foundry => 24.0,
            Self::Reactor => 22.0,
            Self::Extractor => 20.0,
        }
    }

    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hq => "hq",
            Self::Foundry => "foundry",
            Self::Reactor => "reactor",
            Self::Extractor => "extractor",
        }
    }
}

/// Drone garrison carried by an outpost.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DroneStock {
    /// Drones stationed at the outpost when the session starts.
    pub count: u32,
    /// Maximum number of drones the outpost can hold.
    pub capacity: u32,
    /// Drones generated per second, absent for outposts that do not produce.
    pub generation_rate: Option<f64>,
}

impl DroneStock {
    /// Creates a new drone stock description.
    #[must_use]
    pub const fn new(count: u32, capacity: u32, generation_rate: Option<f64>) -> Self {
        Self {
            count,
            capacity,
            generation_rate,
        }
    }
}

/// Structure placed on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outpost {
    id: OutpostId,
    kind: OutpostKind,
    position: Point2D,
    owner: Option<PlayerId>,
    label: String,
    size: f64,
    drones: DroneStock,
}

impl Outpost {
    /// Creates an outpost whose footprint is derived from its kind.
    #[must_use]
    pub fn new(
        id: OutpostId,
        kind: OutpostKind,
        position: Point2D,
        owner: Option<PlayerId>,
        label: impl Into<String>,
        drones: DroneStock,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            owner,
            label: label.into(),
            size: kind.footprint_radius(),
            drones,
        }
    }

    /// Identifier of the outpost.
    #[must_use]
    pub const fn id(&self) -> OutpostId {
        self.id
    }

    /// Building type of the outpost.
    #[must_use]
    pub const fn kind(&self) -> OutpostKind {
        self.kind
    }

    /// Centre of the outpost footprint.
    #[must_use]
    pub const fn position(&self) -> Point2D {
        self.position
    }

    /// Owning player, `None` for neutral outposts.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Returns `true` when no player owns the outpost.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.owner.is_none()
    }

    /// Display label of the outpost.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Footprint radius of the outpost.
    #[must_use]
    pub const fn size(&self) -> f64 {
        self.size
    }

    /// Drone garrison of the outpost.
    #[must_use]
    pub const fn drones(&self) -> DroneStock {
        self.drones
    }

    /// Center distance to `other` minus both footprint radii.
    #[must_use]
    pub fn clearance(&self, other: &Outpost) -> f64 {
        self.position.distance(other.position) - self.size - other.size
    }
}

/// Per-player tally of owned structures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnedCounts {
    /// Total owned structures.
    pub total: usize,
    /// Owned headquarters.
    pub hq: usize,
    /// Owned foundries.
    pub foundry: usize,
    /// Owned reactors.
    pub reactor: usize,
}

impl OwnedCounts {
    /// Starting composition every player must receive.
    pub const EXPECTED: OwnedCounts = OwnedCounts {
        total: OWNED_PER_PLAYER,
        hq: 1,
        foundry: 2,
        reactor: 1,
    };

    /// Tallies the kinds of `outposts`.
    #[must_use]
    pub fn tally<'a, I>(outposts: I) -> Self
    where
        I: IntoIterator<Item = &'a Outpost>,
    {
        let mut counts = Self::default();
        for outpost in outposts {
            counts.total += 1;
            match outpost.kind() {
                OutpostKind::Hq => counts.hq += 1,
                OutpostKind::Foundry => counts.foundry += 1,
                OutpostKind::Reactor => counts.reactor += 1,
                OutpostKind::Extractor => {}
            }
        }
        counts
    }
}

/// Complete starting layout of a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    players: Vec<Player>,
    structures: Vec<Outpost>,
    active_player_index: usize,
}

impl Scenario {
    /// Creates a scenario from its players and structures.
    #[must_use]
    pub fn new(players: Vec<Player>, structures: Vec<Outpost>, active_player_index: usize) -> Self {
        Self {
            players,
            structures,
            active_player_index,
        }
    }

    /// Players seated in the scenario, in wedge order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Every structure, owned ones first.
    #[must_use]
    pub fn structures(&self) -> &[Outpost] {
        &self.structures
    }

    /// Index of the player controlled locally.
    #[must_use]
    pub const fn active_player_index(&self) -> usize {
        self.active_player_index
    }

    /// Iterator over the structures owned by `player`.
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &Outpost> {
        self.structures
            .iter()
            .filter(move |outpost| outpost.owner() == Some(player))
    }

    /// Iterator over the unowned structures.
    pub fn neutrals(&self) -> impl Iterator<Item = &Outpost> {
        self.structures
            .iter()
            .filter(|outpost| outpost.is_neutral())
    }

    /// Headquarters of `player`, if present.
    #[must_use]
    pub fn hq_of(&self, player: PlayerId) -> Option<&Outpost> {
        self.owned_by(player)
            .find(|outpost| outpost.kind() == OutpostKind::Hq)
    }

    /// Number of unowned structures.
    #[must_use]
    pub fn neutral_count(&self) -> usize {
        self.neutrals().count()
    }

    /// Tally of the structures owned by `player`.
    #[must_use]
    pub fn owned_counts(&self, player: PlayerId) -> OwnedCounts {
        OwnedCounts::tally(self.owned_by(player))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DroneStock, Outpost, OutpostId, OutpostKind, OwnedCounts, Player, PlayerColor, PlayerId,
        Point2D, Scenario, Seed,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn outpost(id: u32, kind: OutpostKind, x: f64, y: f64, owner: Option<u32>) -> Outpost {
        Outpost::new(
            OutpostId::new(id),
            kind,
            Point2D::new(x, y),
            owner.map(PlayerId::new),
            format!("Outpost {id}"),
            DroneStock::new(5, 20, None),
        )
    }

    #[test]
    fn seed_normalisation_clamps_to_one() {
        assert_eq!(Seed::new(0).get(), 1);
        assert_eq!(Seed::new(7).get(), 7);
        assert_eq!(Seed::from_f64(-12.8).get(), 12);
        assert_eq!(Seed::from_f64(0.4).get(), 1);
        assert_eq!(Seed::from_f64(f64::NAN).get(), 1);
    }

    #[test]
    fn seed_successor_skips_zero() {
        assert_eq!(Seed::new(41).successor().get(), 42);
        assert_eq!(Seed::new(u64::MAX).successor().get(), 1);
    }

    #[test]
    fn polar_offset_travels_requested_distance() {
        let origin = Point2D::new(100.0, 100.0);
        let moved = origin.polar_offset(std::f64::consts::FRAC_PI_2, 50.0);
        assert!((moved.x - 100.0).abs() < 1e-9);
        assert!((moved.y - 150.0).abs() < 1e-9);
        assert!((origin.distance(moved) - 50.0).abs() < 1e-9);
        assert!((origin.angle_to(moved) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn clearance_subtracts_both_footprints() {
        let hq = outpost(1, OutpostKind::Hq, 0.0, 0.0, Some(1));
        let reactor = outpost(2, OutpostKind::Reactor, 100.0, 0.0, None);
        assert!((hq.clearance(&reactor) - (100.0 - 34.0 - 22.0)).abs() < 1e-9);
    }

    #[test]
    fn owned_counts_tally_by_kind() {
        let owner = PlayerId::new(3);
        let structures = vec![
            outpost(1, OutpostKind::Hq, 0.0, 0.0, Some(3)),
            outpost(2, OutpostKind::Foundry, 10.0, 0.0, Some(3)),
            outpost(3, OutpostKind::Foundry, 20.0, 0.0, Some(3)),
            outpost(4, OutpostKind::Reactor, 30.0, 0.0, Some(3)),
            outpost(5, OutpostKind::Reactor, 40.0, 0.0, None),
        ];
        let scenario = Scenario::new(
            vec![Player::new(owner, "Amber", PlayerColor::from_rgb(1, 2, 3))],
            structures,
            0,
        );

        assert_eq!(scenario.owned_counts(owner), OwnedCounts::EXPECTED);
        assert_eq!(scenario.neutral_count(), 1);
        assert_eq!(
            scenario.hq_of(owner).map(Outpost::id),
            Some(OutpostId::new(1))
        );
        assert!(scenario.hq_of(PlayerId::new(9)).is_none());
    }

    #[test]
    fn outpost_round_trips_through_bincode() {
        let mut value = outpost(9, OutpostKind::Foundry, 12.5, 99.0, Some(2));
        value.drones = DroneStock::new(10, 30, Some(0.5));
        assert_round_trip(&value);
    }

    #[test]
    fn scenario_round_trips_through_bincode() {
        let scenario = Scenario::new(
            vec![Player::new(
                PlayerId::new(1),
                "Cobalt",
                PlayerColor::from_rgb(0x2f, 0x6f, 0xdb),
            )],
            vec![
                outpost(1, OutpostKind::Hq, 1.0, 2.0, Some(1)),
                outpost(2, OutpostKind::Extractor, 3.0, 4.0, None),
            ],
            0,
        );
        assert_round_trip(&scenario);
    }

    #[test]
    fn seed_round_trips_through_bincode() {
        assert_round_trip(&Seed::new(42));
    }
}
