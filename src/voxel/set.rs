use std::collections::HashSet;

use super::{Voxel, VERTICAL_WINDOW};

/// An unordered set of voxels with O(1) membership tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelSet {
    voxels: HashSet<Voxel>,
}

impl VoxelSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a voxel. Returns `false` if it was already present.
    pub fn insert(&mut self, voxel: Voxel) -> bool {
        self.voxels.insert(voxel)
    }

    /// Removes a voxel. Returns `false` if it was not present.
    pub fn remove(&mut self, voxel: &Voxel) -> bool {
        self.voxels.remove(voxel)
    }

    #[must_use]
    pub fn contains(&self, voxel: &Voxel) -> bool {
        self.voxels.contains(voxel)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.iter()
    }

    /// Removes and returns an arbitrary voxel.
    pub fn pop(&mut self) -> Option<Voxel> {
        let voxel = *self.voxels.iter().next()?;
        self.voxels.remove(&voxel);
        Some(voxel)
    }

    /// Finds the voxel at horizontal offset `(dx, dz)` from `voxel`, searching
    /// the vertical window from lowest to highest.
    #[must_use]
    pub fn find_near(&self, voxel: Voxel, dx: i32, dz: i32) -> Option<Voxel> {
        VERTICAL_WINDOW
            .iter()
            .map(|&dy| voxel.offset(dx, dy, dz))
            .find(|v| self.contains(v))
    }

    /// Removes every voxel for which `predicate` holds.
    ///
    /// The predicate sees the set as it was before the pass started.
    pub fn filter<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&Voxel, &VoxelSet) -> bool,
    {
        let snapshot: &VoxelSet = self;
        let doomed: Vec<Voxel> = snapshot
            .voxels
            .iter()
            .filter(|v| predicate(*v, snapshot))
            .copied()
            .collect();
        for voxel in &doomed {
            self.voxels.remove(voxel);
        }
        self
    }
}

impl FromIterator<Voxel> for VoxelSet {
    fn from_iter<I: IntoIterator<Item = Voxel>>(iter: I) -> Self {
        Self {
            voxels: iter.into_iter().collect(),
        }
    }
}

impl Extend<Voxel> for VoxelSet {
    fn extend<I: IntoIterator<Item = Voxel>>(&mut self, iter: I) {
        self.voxels.extend(iter);
    }
}

impl IntoIterator for VoxelSet {
    type Item = Voxel;
    type IntoIter = std::collections::hash_set::IntoIter<Voxel>;

    fn into_iter(self) -> Self::IntoIter {
        self.voxels.into_iter()
    }
}

impl<'a> IntoIterator for &'a VoxelSet {
    type Item = &'a Voxel;
    type IntoIter = std::collections::hash_set::Iter<'a, Voxel>;

    fn into_iter(self) -> Self::IntoIter {
        self.voxels.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut set = VoxelSet::new();
        assert!(set.insert(Voxel::new(1, 2, 3)));
        assert!(!set.insert(Voxel::new(1, 2, 3)));
        assert_eq!(set.len(), 1);
        assert!(set.remove(&Voxel::new(1, 2, 3)));
        assert!(set.is_empty());
    }

    #[test]
    fn filter_sees_unmodified_set() {
        // Remove every voxel that has a neighbor at +x. If the predicate saw
        // the shrinking set, the result would depend on iteration order.
        let mut set: VoxelSet = (0..5).map(|x| Voxel::new(x, 0, 0)).collect();
        set.filter(|v, all| all.contains(&v.offset(1, 0, 0)));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&Voxel::new(4, 0, 0)));
    }

    #[test]
    fn clone_is_independent() {
        let mut a: VoxelSet = [Voxel::new(0, 0, 0)].into_iter().collect();
        let b = a.clone();
        a.insert(Voxel::new(1, 0, 0));
        assert_eq!(b.len(), 1);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn find_near_searches_vertical_window() {
        let set: VoxelSet = [Voxel::new(1, 1, 0), Voxel::new(0, 5, 1)]
            .into_iter()
            .collect();
        let origin = Voxel::new(0, 0, 0);
        assert_eq!(set.find_near(origin, 1, 0), Some(Voxel::new(1, 1, 0)));
        assert_eq!(set.find_near(origin, 0, 1), None);
    }

    #[test]
    fn pop_drains() {
        let mut set: VoxelSet = (0..3).map(|x| Voxel::new(x, 0, 0)).collect();
        let mut seen = Vec::new();
        while let Some(v) = set.pop() {
            seen.push(v);
        }
        seen.sort();
        assert_eq!(seen.len(), 3);
        assert!(set.is_empty());
    }
}
