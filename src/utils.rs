use fnv::FnvBuildHasher;
use std::{
    collections::{HashMap, HashSet},
    hash::Hash
};

/// FNV hashed containers. Every key in this crate is short: lattice coordinates, graph cells or
/// `Rc` addresses, where FNV beats SipHash. None of them come from untrusted input.
pub type FnvHashSet<T> = HashSet<T, FnvBuildHasher>;
pub type FnvHashMap<K, V> = HashMap<K, V, FnvBuildHasher>;

pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    HashSet::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}

pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    HashMap::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}
