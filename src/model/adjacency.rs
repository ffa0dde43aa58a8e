//! Half-edge adjacency index over a [`Model`].
//!
//! Each polygon edge becomes one directed half-edge record; two half-edges
//! share an edge when their endpoint keys match with opposite winding. The
//! index does not borrow the model: `build`/`add`/`update` take `&Model`
//! explicitly so callers can interleave model mutation with incremental
//! index maintenance.

use crate::model::{INVALID_INDEX, Model};
use hashbrown::HashMap;

/// Equivalence applied to edge endpoints before pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Endpoints are the vertex indices themselves.
    ByVertex,
    /// Endpoints are the vertices' position indices; positions are already
    /// epsilon-welded by the model's tables, so index equality is the
    /// position equality.
    ByPosition,
    /// Endpoints are the vertices' texcoord indices for the given channel.
    ByTexCoord(u32),
}

/// One directed half-edge.
#[derive(Debug, Clone)]
struct Edge {
    polygon: u32,
    polygon_edge: u32,
    key0: u32,
    key1: u32,
    shares: Vec<u32>,
}

impl Edge {
    const fn tombstone() -> Self {
        Edge {
            polygon: INVALID_INDEX,
            polygon_edge: INVALID_INDEX,
            key0: INVALID_INDEX,
            key1: INVALID_INDEX,
            shares: Vec::new(),
        }
    }

    fn is_live(&self) -> bool {
        self.polygon != INVALID_INDEX
    }
}

/// Read/write half-edge index.
///
/// Share symmetry is an invariant: if edge `a`'s share list contains `b`,
/// then `b`'s contains `a`. Every mutating call re-establishes it for the
/// edges it touches. Edge ids are stable handles; removal tombstones a slot
/// rather than relocating ids, and later `add`s reuse free slots.
#[derive(Debug, Clone)]
pub struct ModelAdjacency {
    mode: EdgeMode,
    edges: Vec<Edge>,
    free: Vec<u32>,
    /// Directed endpoint-key pair -> live edge ids with that key.
    by_key: HashMap<(u32, u32), Vec<u32>>,
    /// Polygon id -> its edge ids, in polygon-edge order.
    polygon_edges: HashMap<u32, Vec<u32>>,
}

impl ModelAdjacency {
    /// Build the index over every polygon of `model`.
    pub fn new(model: &Model, mode: EdgeMode) -> Self {
        let mut adjacency = Self::empty(mode);
        for polygon in 0..model.polygon_count() {
            adjacency.add(model, polygon);
        }
        adjacency
    }

    /// Build the index over a polygon subset.
    pub fn with_polygons(model: &Model, polygons: &[u32], mode: EdgeMode) -> Self {
        let mut adjacency = Self::empty(mode);
        for &polygon in polygons {
            adjacency.add(model, polygon);
        }
        adjacency
    }

    fn empty(mode: EdgeMode) -> Self {
        ModelAdjacency {
            mode,
            edges: Vec::new(),
            free: Vec::new(),
            by_key: HashMap::new(),
            polygon_edges: HashMap::new(),
        }
    }

    pub fn mode(&self) -> EdgeMode {
        self.mode
    }

    fn key_of(&self, model: &Model, vertex: u32) -> u32 {
        match self.mode {
            EdgeMode::ByVertex => vertex,
            EdgeMode::ByPosition => model.vertex(vertex).position(),
            EdgeMode::ByTexCoord(channel) => model.vertex(vertex).tex_coord(channel),
        }
    }

    fn alloc(&mut self, edge: Edge) -> u32 {
        match self.free.pop() {
            Some(id) => {
                self.edges[id as usize] = edge;
                id
            },
            None => {
                let id = self.edges.len() as u32;
                self.edges.push(edge);
                id
            },
        }
    }

    /// Index `polygon`'s edges and pair them with existing opposite-winding
    /// edges, restoring share symmetry on both sides.
    pub fn add(&mut self, model: &Model, polygon: u32) {
        debug_assert!(
            !self.polygon_edges.contains_key(&polygon),
            "polygon {polygon} already indexed"
        );

        let count = model.polygon(polygon).vertex_count();
        let mut ids = Vec::with_capacity(count as usize);
        for polygon_edge in 0..count {
            let v0 = model.polygon(polygon).vertex(polygon_edge);
            let v1 = model.polygon(polygon).vertex((polygon_edge + 1) % count);
            let key0 = self.key_of(model, v0);
            let key1 = self.key_of(model, v1);

            let id = self.alloc(Edge {
                polygon,
                polygon_edge,
                key0,
                key1,
                shares: Vec::new(),
            });

            // Unkeyed endpoints (a missing texcoord channel) never pair.
            if key0 != INVALID_INDEX && key1 != INVALID_INDEX {
                let opposite = self
                    .by_key
                    .get(&(key1, key0))
                    .cloned()
                    .unwrap_or_default();
                for other in opposite {
                    if other != id {
                        self.edges[other as usize].shares.push(id);
                        self.edges[id as usize].shares.push(other);
                    }
                }
                self.by_key.entry((key0, key1)).or_default().push(id);
            }
            ids.push(id);
        }
        self.polygon_edges.insert(polygon, ids);
    }

    /// Drop `polygon`'s edges from the index.
    ///
    /// With `rebuild_shares`, the removed edges are also scrubbed from their
    /// partners' share lists, keeping symmetry intact. Passing `false` skips
    /// that surgery; only callers that immediately `update` every affected
    /// polygon may do so.
    pub fn remove(&mut self, polygon: u32, rebuild_shares: bool) {
        let Some(ids) = self.polygon_edges.remove(&polygon) else {
            return;
        };
        for id in ids {
            let edge = std::mem::replace(&mut self.edges[id as usize], Edge::tombstone());
            if edge.key0 != INVALID_INDEX && edge.key1 != INVALID_INDEX {
                if let Some(keyed) = self.by_key.get_mut(&(edge.key0, edge.key1)) {
                    keyed.retain(|&other| other != id);
                    if keyed.is_empty() {
                        self.by_key.remove(&(edge.key0, edge.key1));
                    }
                }
            }
            if rebuild_shares {
                for share in edge.shares {
                    self.edges[share as usize].shares.retain(|&other| other != id);
                }
            }
            self.free.push(id);
        }
    }

    /// Re-index `polygon` after its vertex loop changed.
    pub fn update(&mut self, model: &Model, polygon: u32) {
        self.remove(polygon, true);
        self.add(model, polygon);
    }

    /// Edge id of `polygon`'s `polygon_edge`-th edge, or `INVALID_INDEX`.
    pub fn edge(&self, polygon: u32, polygon_edge: u32) -> u32 {
        self.polygon_edges
            .get(&polygon)
            .and_then(|ids| ids.get(polygon_edge as usize))
            .copied()
            .unwrap_or(INVALID_INDEX)
    }

    pub fn polygon(&self, edge: u32) -> u32 {
        self.edges[edge as usize].polygon
    }

    pub fn polygon_edge(&self, edge: u32) -> u32 {
        self.edges[edge as usize].polygon_edge
    }

    /// Number of edge slots, tombstones included; use [`edge_ids`](Self::edge_ids)
    /// to enumerate live edges.
    pub fn edge_count(&self) -> u32 {
        self.edges.len() as u32
    }

    /// Ids of all live edges.
    pub fn edge_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.is_live())
            .map(|(id, _)| id as u32)
    }

    /// Edges sharing `edge`: empty for a boundary edge, one entry for a
    /// manifold edge, more for a non-manifold fan.
    pub fn shared_edges(&self, edge: u32) -> &[u32] {
        &self.edges[edge as usize].shares
    }

    pub fn shared_edge_count(&self, edge: u32) -> u32 {
        self.edges[edge as usize].shares.len() as u32
    }

    /// Share list addressed by polygon and polygon-local edge number; empty
    /// when the polygon is not indexed.
    pub fn shared_edges_of(&self, polygon: u32, polygon_edge: u32) -> &[u32] {
        let edge = self.edge(polygon, polygon_edge);
        if edge == INVALID_INDEX {
            &[]
        } else {
            self.shared_edges(edge)
        }
    }
}
