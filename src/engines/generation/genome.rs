//! Genome representation for the vehicle genetic algorithm
//!
//! A genome is a fixed 14-slot attribute vector describing one two-wheeled
//! vehicle:
//!
//! | slots  | meaning                                         |
//! |--------|-------------------------------------------------|
//! | 0..=7  | chassis polygon vertices, counter-clockwise     |
//! | 8..=10 | wheel 1 density, radius, axle vertex index      |
//! | 11..=13| wheel 2 density, radius, axle vertex index      |
//!
//! Every chassis slot has a fixed sign per axis so the polygon stays
//! star-shaped around the origin: slot 0 lies on +x, slot 1 in the (+,+)
//! quadrant, slot 2 on +y and so on around the circle.
//!
//! Crossover and mutation treat all 14 slots as one flat chromosome. Both
//! only ever copy or resample whole slots, so their output is always within
//! the declared domain.
//!
//! Genomes are immutable: operators return new genomes.

use crate::error::{GeneticCarsError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const ATTRIBUTE_COUNT: usize = 14;
pub const CHASSIS_VERTEX_COUNT: usize = 8;
pub const WHEEL_COUNT: usize = 2;

const WHEEL_SLOT_OFFSET: usize = CHASSIS_VERTEX_COUNT;
const WHEEL_ATTRIBUTE_COUNT: usize = 3;

/// Sign of one chassis axis at a given slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSign {
    Positive,
    Negative,
    Zero,
}

/// (x, y) signs of the eight chassis vertices.
pub const CHASSIS_SIGNS: [(AxisSign, AxisSign); CHASSIS_VERTEX_COUNT] = [
    (AxisSign::Positive, AxisSign::Zero),
    (AxisSign::Positive, AxisSign::Positive),
    (AxisSign::Zero, AxisSign::Positive),
    (AxisSign::Negative, AxisSign::Positive),
    (AxisSign::Negative, AxisSign::Zero),
    (AxisSign::Negative, AxisSign::Negative),
    (AxisSign::Zero, AxisSign::Negative),
    (AxisSign::Positive, AxisSign::Negative),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One slot of the chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Attribute {
    Vertex(Point),
    Density(f64),
    Radius(f64),
    AxleVertex(usize),
}

/// What kind of attribute a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Vertex { x: AxisSign, y: AxisSign },
    Density,
    Radius,
    AxleVertex,
}

impl SlotKind {
    pub fn of(slot: usize) -> Self {
        if slot < CHASSIS_VERTEX_COUNT {
            let (x, y) = CHASSIS_SIGNS[slot];
            return SlotKind::Vertex { x, y };
        }
        match (slot - WHEEL_SLOT_OFFSET) % WHEEL_ATTRIBUTE_COUNT {
            0 => SlotKind::Density,
            1 => SlotKind::Radius,
            _ => SlotKind::AxleVertex,
        }
    }
}

/// Declared domain of every attribute. Ranges are half-open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeDomain {
    pub chassis_min_axis: f64,
    pub chassis_max_axis: f64,
    pub wheel_density: Range<f64>,
    pub wheel_radius: Range<f64>,
}

impl Default for GenomeDomain {
    fn default() -> Self {
        Self {
            chassis_min_axis: 0.1,
            chassis_max_axis: 1.2,
            wheel_density: 40.0..140.0,
            wheel_radius: 0.2..0.7,
        }
    }
}

impl GenomeDomain {
    /// Rejects empty, inverted or non-positive ranges.
    pub fn validate(&self) -> Result<()> {
        check_range(
            "chassis axis",
            &(self.chassis_min_axis..self.chassis_max_axis),
        )?;
        check_range("wheel density", &self.wheel_density)?;
        check_range("wheel radius", &self.wheel_radius)?;
        Ok(())
    }

    /// Draw a fresh value for `slot`.
    pub fn sample<R: Rng>(&self, slot: usize, rng: &mut R) -> Attribute {
        match SlotKind::of(slot) {
            SlotKind::Vertex { x, y } => Attribute::Vertex(Point::new(
                self.sample_axis(x, rng),
                self.sample_axis(y, rng),
            )),
            SlotKind::Density => Attribute::Density(rng.gen_range(self.wheel_density.clone())),
            SlotKind::Radius => Attribute::Radius(rng.gen_range(self.wheel_radius.clone())),
            SlotKind::AxleVertex => Attribute::AxleVertex(rng.gen_range(0..CHASSIS_VERTEX_COUNT)),
        }
    }

    fn sample_axis<R: Rng>(&self, sign: AxisSign, rng: &mut R) -> f64 {
        match sign {
            AxisSign::Zero => 0.0,
            AxisSign::Positive => rng.gen_range(self.chassis_min_axis..self.chassis_max_axis),
            AxisSign::Negative => -rng.gen_range(self.chassis_min_axis..self.chassis_max_axis),
        }
    }

    /// Whether `attribute` is a legal value for `slot`.
    pub fn contains(&self, slot: usize, attribute: &Attribute) -> bool {
        match (SlotKind::of(slot), attribute) {
            (SlotKind::Vertex { x, y }, Attribute::Vertex(p)) => {
                self.axis_contains(x, p.x) && self.axis_contains(y, p.y)
            }
            (SlotKind::Density, Attribute::Density(d)) => self.wheel_density.contains(d),
            (SlotKind::Radius, Attribute::Radius(r)) => self.wheel_radius.contains(r),
            (SlotKind::AxleVertex, Attribute::AxleVertex(v)) => *v < CHASSIS_VERTEX_COUNT,
            _ => false,
        }
    }

    fn axis_contains(&self, sign: AxisSign, value: f64) -> bool {
        let magnitude = self.chassis_min_axis..self.chassis_max_axis;
        match sign {
            AxisSign::Zero => value == 0.0,
            AxisSign::Positive => magnitude.contains(&value),
            AxisSign::Negative => magnitude.contains(&-value),
        }
    }
}

fn check_range(name: &str, range: &Range<f64>) -> Result<()> {
    if !range.start.is_finite() || !range.end.is_finite() {
        return Err(GeneticCarsError::Configuration(format!(
            "{} bounds must be finite",
            name
        )));
    }
    if range.start <= 0.0 || range.start >= range.end {
        return Err(GeneticCarsError::Configuration(format!(
            "{} range must be positive and non-empty, got {}..{}",
            name, range.start, range.end
        )));
    }
    Ok(())
}

/// Attributes of one wheel, read out of the flat chromosome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSpec {
    pub density: f64,
    pub radius: f64,
    pub vertex: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genome {
    attributes: [Attribute; ATTRIBUTE_COUNT],
}

impl Genome {
    /// Sample every slot independently and uniformly.
    pub fn random<R: Rng>(domain: &GenomeDomain, rng: &mut R) -> Self {
        let attributes = std::array::from_fn(|slot| domain.sample(slot, rng));
        Self { attributes }
    }

    /// Build a genome from externally supplied attributes.
    ///
    /// Fails with `InvalidGenome` on a wrong length, a wrong attribute kind
    /// for a slot, or any value outside `domain`. Values are never clamped.
    pub fn from_attributes(attributes: Vec<Attribute>, domain: &GenomeDomain) -> Result<Self> {
        let attributes: [Attribute; ATTRIBUTE_COUNT] =
            attributes.try_into().map_err(|rejected: Vec<Attribute>| {
                GeneticCarsError::InvalidGenome(format!(
                    "expected {} attributes, got {}",
                    ATTRIBUTE_COUNT,
                    rejected.len()
                ))
            })?;

        for (slot, attribute) in attributes.iter().enumerate() {
            if !domain.contains(slot, attribute) {
                return Err(GeneticCarsError::InvalidGenome(format!(
                    "slot {} ({:?}) holds out-of-domain value {:?}",
                    slot,
                    SlotKind::of(slot),
                    attribute
                )));
            }
        }

        Ok(Self { attributes })
    }

    /// Parse and validate a genome serialized with [`Genome::to_json`].
    pub fn from_json(json: &str, domain: &GenomeDomain) -> Result<Self> {
        #[derive(Deserialize)]
        struct Raw {
            attributes: Vec<Attribute>,
        }

        let raw: Raw = serde_json::from_str(json)?;
        Self::from_attributes(raw.attributes, domain)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Single-point crossover with a split drawn uniformly from `[0, 14)`.
    pub fn crossover<R: Rng>(&self, other: &Genome, rng: &mut R) -> Genome {
        let split = rng.gen_range(0..ATTRIBUTE_COUNT);
        self.crossover_at(other, split)
    }

    /// Slots before `split` come from `self`, the rest from `other`.
    pub fn crossover_at(&self, other: &Genome, split: usize) -> Genome {
        let attributes = std::array::from_fn(|slot| {
            if slot < split {
                self.attributes[slot]
            } else {
                other.attributes[slot]
            }
        });
        Genome { attributes }
    }

    /// Resample each slot independently with probability `rate`.
    ///
    /// One decision is drawn per slot regardless of outcome, so the random
    /// stream consumed does not depend on which slots were hit.
    pub fn mutate<R: Rng>(&self, rate: f64, domain: &GenomeDomain, rng: &mut R) -> Genome {
        let mut attributes = self.attributes;
        for (slot, attribute) in attributes.iter_mut().enumerate() {
            if rng.gen::<f64>() < rate {
                *attribute = domain.sample(slot, rng);
            }
        }
        Genome { attributes }
    }

    pub fn attributes(&self) -> &[Attribute; ATTRIBUTE_COUNT] {
        &self.attributes
    }

    /// Slot kinds are pinned by every constructor, so a mismatch here is a bug.
    pub fn chassis(&self) -> [Point; CHASSIS_VERTEX_COUNT] {
        std::array::from_fn(|slot| match self.attributes[slot] {
            Attribute::Vertex(p) => p,
            other => unreachable!("slot {} holds {:?}, expected a vertex", slot, other),
        })
    }

    pub fn wheels(&self) -> [WheelSpec; WHEEL_COUNT] {
        std::array::from_fn(|wheel| {
            let base = WHEEL_SLOT_OFFSET + wheel * WHEEL_ATTRIBUTE_COUNT;
            match self.attributes[base..base + WHEEL_ATTRIBUTE_COUNT] {
                [Attribute::Density(density), Attribute::Radius(radius), Attribute::AxleVertex(vertex)] => {
                    WheelSpec {
                        density,
                        radius,
                        vertex,
                    }
                }
                ref other => unreachable!(
                    "slots {}..{} hold {:?}, expected a wheel",
                    base,
                    base + WHEEL_ATTRIBUTE_COUNT,
                    other
                ),
            }
        })
    }

    /// Area of the chassis polygon (shoelace formula).
    pub fn chassis_area(&self) -> f64 {
        let points = self.chassis();
        let twice_area: f64 = (0..CHASSIS_VERTEX_COUNT)
            .map(|i| {
                let a = points[i];
                let b = points[(i + 1) % CHASSIS_VERTEX_COUNT];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice_area.abs() / 2.0
    }

    pub fn is_within(&self, domain: &GenomeDomain) -> bool {
        self.attributes
            .iter()
            .enumerate()
            .all(|(slot, attribute)| domain.contains(slot, attribute))
    }
}
