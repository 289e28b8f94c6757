use crate::graph::Vertex;
use bitvec::prelude::*;
use bitvec::slice::IterOnes;
use derive_more::*;
use std::fmt::Debug;
use std::ops::*;

////////////////////////////////////////////////////////////////////////////////
//
// VertexBitSet
//
////////////////////////////////////////////////////////////////////////////////

/// Fixed-width bit-set of vertices.
///
/// One set holds either source or target vertices, so the width must be at
/// least `max(|V(G)|, |V(H)|)`. The default backing storage of `BitArray` is
/// `usize`, but its size may differ depending on platforms. For simplicity,
/// we assume that backing storage is always 64 bits.
pub trait VertexBitSet:
    BitAnd<Output = Self>
    + BitAndAssign
    + BitOr<Output = Self>
    + BitOrAssign
    + Clone
    + Copy
    + Debug
    + Default
    + Eq
    + Index<usize, Output = bool>
    + Sized
    + Send
{
    const ZERO: Self;

    fn from_vertex(u: Vertex) -> Self;
    fn from_vertices<I: IntoIterator<Item = Vertex>>(us: I) -> Self;

    // Following functions are derived from `BitSlice`
    fn any(&self) -> bool;
    fn count_ones(&self) -> usize;
    fn iter_ones(&self) -> IterOnes<u64, Lsb0>;
    fn len(&self) -> usize;
    fn not_any(&self) -> bool;
    fn set(&mut self, index: usize, value: bool);
}

impl<const N: usize> VertexBitSet for BitArray<[u64; N]> {
    const ZERO: Self = BitArray::<[u64; N]>::ZERO;

    fn from_vertex(u: Vertex) -> Self {
        let mut b = Self::ZERO;
        b.set(u as usize, true);
        b
    }

    fn from_vertices<I: IntoIterator<Item = Vertex>>(us: I) -> Self {
        let mut b = Self::ZERO;
        for u in us {
            b.set(u as usize, true);
        }
        b
    }

    fn any(&self) -> bool {
        self.as_bitslice().any()
    }

    fn count_ones(&self) -> usize {
        self.as_bitslice().count_ones()
    }

    fn iter_ones(&self) -> IterOnes<u64, Lsb0> {
        self.as_bitslice().iter_ones()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn not_any(&self) -> bool {
        self.as_bitslice().not_any()
    }

    fn set(&mut self, index: usize, value: bool) {
        self.as_mut_bitslice().set(index, value)
    }
}

pub type VertexBitSet128 = BitArray<[u64; 2]>;
pub type VertexBitSet256 = BitArray<[u64; 4]>;
pub type VertexBitSet1024 = BitArray<[u64; 16]>;
pub type VertexBitSet4096 = BitArray<[u64; 64]>;

////////////////////////////////////////////////////////////////////////////////
//
// VertexBitSet64
//
////////////////////////////////////////////////////////////////////////////////

/// Implementation of VertexBitSet for up to 64 vertices
#[derive(
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
)]
pub struct VertexBitSet64(u64);

impl VertexBitSet for VertexBitSet64 {
    const ZERO: Self = VertexBitSet64(0);

    fn from_vertex(u: Vertex) -> Self {
        VertexBitSet64((1 as u64) << u)
    }

    fn from_vertices<I: IntoIterator<Item = Vertex>>(us: I) -> Self {
        let mut b = 0;
        for u in us {
            b |= (1 as u64) << u;
        }
        VertexBitSet64(b)
    }

    fn any(&self) -> bool {
        self.0 != 0
    }

    fn count_ones(&self) -> usize {
        self.0.count_ones() as usize
    }

    fn iter_ones(&self) -> IterOnes<u64, Lsb0> {
        self.0.view_bits::<Lsb0>().iter_ones()
    }

    fn len(&self) -> usize {
        64
    }

    fn not_any(&self) -> bool {
        self.0 == 0
    }

    fn set(&mut self, index: usize, value: bool) {
        let b = (1 as u64) << index;
        if value {
            self.0 |= b;
        } else {
            self.0 &= !b;
        }
    }
}

impl Index<usize> for VertexBitSet64 {
    type Output = bool;
    fn index(&self, index: usize) -> &Self::Output {
        if (self.0 & ((1 as u64) << index)) == 0 {
            &false
        } else {
            &true
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Public Free Functions
//
////////////////////////////////////////////////////////////////////////////////

#[allow(dead_code)]
pub fn iter_vertices<Q: VertexBitSet>(
    b: &Q,
) -> impl DoubleEndedIterator<Item = Vertex> + '_ {
    b.iter_ones().map(|x| x as Vertex)
}

////////////////////////////////////////////////////////////////////////////////
//
// Tests
//
////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_from_vertices() {
    let b = VertexBitSet64::from_vertices([0, 3, 63]);
    assert_eq!(b.count_ones(), 3);
    assert!(b[0] && b[3] && b[63]);
    assert!(!b[1]);
    itertools::assert_equal(iter_vertices(&b), [0, 3, 63]);

    let w = VertexBitSet256::from_vertices([2, 70, 255]);
    assert_eq!(w.count_ones(), 3);
    assert!(w[70]);
    itertools::assert_equal(iter_vertices(&w), [2, 70, 255]);
}

#[test]
fn test_set_and_clear() {
    let mut b = VertexBitSet64::ZERO;
    assert!(b.not_any());

    b.set(5, true);
    assert!(b.any() && b[5]);

    b.set(5, false);
    assert!(b.not_any());

    let mut w = VertexBitSet128::ZERO;
    w.set(100, true);
    assert_eq!(w.count_ones(), 1);
    assert!(w[100]);
}

#[test]
fn test_intersection_union() {
    let mut b = VertexBitSet64::from_vertices([1, 2, 3]);
    b &= VertexBitSet64::from_vertices([2, 3, 4]);
    itertools::assert_equal(iter_vertices(&b), [2, 3]);

    b |= VertexBitSet64::from_vertex(9);
    itertools::assert_equal(iter_vertices(&b), [2, 3, 9]);
}
