//! Quantized spatial hashing behind the epsilon-welded attribute tables.

use crate::float_types::Real;
use hashbrown::HashMap;
use nalgebra::{Point2, Point3, Vector3, Vector4};

/// A value that can live in a [`WeldTable`]: it hashes into a coarse grid
/// cell and measures its distance to other values.
pub trait Welded: Copy {
    /// Coordinates used for grid bucketing (2D values pad with zero).
    fn grid_coords(&self) -> [Real; 3];
    fn distance_squared(&self, other: &Self) -> Real;
}

impl Welded for Point3<Real> {
    fn grid_coords(&self) -> [Real; 3] {
        [self.x, self.y, self.z]
    }
    fn distance_squared(&self, other: &Self) -> Real {
        (self - other).norm_squared()
    }
}

impl Welded for Vector3<Real> {
    fn grid_coords(&self) -> [Real; 3] {
        [self.x, self.y, self.z]
    }
    fn distance_squared(&self, other: &Self) -> Real {
        (self - other).norm_squared()
    }
}

impl Welded for Vector4<Real> {
    fn grid_coords(&self) -> [Real; 3] {
        [self.x, self.y, self.z]
    }
    fn distance_squared(&self, other: &Self) -> Real {
        (self - other).norm_squared()
    }
}

impl Welded for Point2<Real> {
    fn grid_coords(&self) -> [Real; 3] {
        [self.x, self.y, 0.0]
    }
    fn distance_squared(&self, other: &Self) -> Real {
        (self - other).norm_squared()
    }
}

/// Arena of attribute values with stable `u32` indices and a grid-hash
/// nearest-within-distance lookup.
///
/// Indices are handles: values are never relocated, so an index stays valid
/// for as long as the table lives.
#[derive(Debug, Clone)]
pub struct WeldTable<T: Welded> {
    cell_size: Real,
    values: Vec<T>,
    cells: HashMap<(i64, i64, i64), Vec<u32>>,
}

impl<T: Welded> WeldTable<T> {
    pub fn new(cell_size: Real) -> Self {
        WeldTable {
            cell_size,
            values: Vec::new(),
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, coords: [Real; 3]) -> (i64, i64, i64) {
        (
            (coords[0] / self.cell_size).floor() as i64,
            (coords[1] / self.cell_size).floor() as i64,
            (coords[2] / self.cell_size).floor() as i64,
        )
    }

    /// Append `value` and return its index.
    pub fn add(&mut self, value: T) -> u32 {
        let id = self.values.len() as u32;
        self.values.push(value);
        let cell = self.cell_of(value.grid_coords());
        self.cells.entry(cell).or_default().push(id);
        id
    }

    /// Index of the value nearest to `value` within `distance`, if any.
    pub fn find(&self, value: &T, distance: Real) -> Option<u32> {
        let coords = value.grid_coords();
        let lo = self.cell_of([coords[0] - distance, coords[1] - distance, coords[2] - distance]);
        let hi = self.cell_of([coords[0] + distance, coords[1] + distance, coords[2] + distance]);

        let mut best: Option<u32> = None;
        let mut best_distance = distance * distance;
        for x in lo.0..=hi.0 {
            for y in lo.1..=hi.1 {
                for z in lo.2..=hi.2 {
                    let Some(ids) = self.cells.get(&(x, y, z)) else {
                        continue;
                    };
                    for &id in ids {
                        let d = value.distance_squared(&self.values[id as usize]);
                        if d <= best_distance {
                            best = Some(id);
                            best_distance = d;
                        }
                    }
                }
            }
        }
        best
    }

    pub fn get(&self, id: u32) -> &T {
        &self.values[id as usize]
    }

    /// Overwrite the value at `id`, re-bucketing it in the grid.
    pub fn set(&mut self, id: u32, value: T) {
        let old_cell = self.cell_of(self.values[id as usize].grid_coords());
        if let Some(ids) = self.cells.get_mut(&old_cell) {
            ids.retain(|&other| other != id);
        }
        self.values[id as usize] = value;
        let cell = self.cell_of(value.grid_coords());
        self.cells.entry(cell).or_default().push(id);
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.cells.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.values.reserve(additional);
    }
}
