//! Property lookup by semantic role, resolved once per element.

use crate::ply::header::{ElementDecl, Record};
use crate::ply::types::PropertyValue;

/// Semantic role a property can play in mesh assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    X,
    Y,
    Z,
    Nx,
    Ny,
    Nz,
    Red,
    Green,
    Blue,
    Alpha,
    S,
    T,
    Vertex1,
    Vertex2,
}

impl Slot {
    pub const ALL: [Slot; 14] = [
        Slot::X,
        Slot::Y,
        Slot::Z,
        Slot::Nx,
        Slot::Ny,
        Slot::Nz,
        Slot::Red,
        Slot::Green,
        Slot::Blue,
        Slot::Alpha,
        Slot::S,
        Slot::T,
        Slot::Vertex1,
        Slot::Vertex2,
    ];

    /// Property name looked up for this slot.
    pub const fn property_name(self) -> &'static str {
        match self {
            Slot::X => "x",
            Slot::Y => "y",
            Slot::Z => "z",
            Slot::Nx => "nx",
            Slot::Ny => "ny",
            Slot::Nz => "nz",
            Slot::Red => "red",
            Slot::Green => "green",
            Slot::Blue => "blue",
            Slot::Alpha => "alpha",
            Slot::S => "s",
            Slot::T => "t",
            Slot::Vertex1 => "vertex1",
            Slot::Vertex2 => "vertex2",
        }
    }
}

/// Positional index of each slot's property within one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotMap {
    indices: [Option<usize>; 14],
}

impl SlotMap {
    /// Probes `element` for every slot name. Missing names stay absent.
    pub fn resolve(element: &ElementDecl) -> Self {
        let mut map = SlotMap::default();
        for slot in Slot::ALL {
            map.indices[slot as usize] = element.property(slot.property_name()).map(|p| p.index);
        }
        map
    }

    pub fn get(&self, slot: Slot) -> Option<usize> {
        self.indices[slot as usize]
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    pub fn contains_all(&self, slots: &[Slot]) -> bool {
        slots.iter().all(|s| self.contains(*s))
    }

    /// Value of `slot` in `record`, when the slot is mapped.
    pub fn value(&self, element: &ElementDecl, record: &Record, slot: Slot) -> Option<PropertyValue> {
        record.scalar(element, self.get(slot)?)
    }
}
