//! Home-slot oracles.
//!
//! The table never hashes keys itself. It asks a `HomeOracle` for a key's
//! home and reduces the answer modulo its capacity. The answer must stay the
//! same for as long as the key is resident.

use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use rand::Rng;
use std::collections::hash_map::RandomState;

pub trait HomeOracle<K: ?Sized> {
    /// Home position of `key` before reduction modulo the table capacity.
    fn home(&self, key: &K) -> usize;
}

impl<K: ?Sized, F> HomeOracle<K> for F
where
    F: Fn(&K) -> usize,
{
    #[inline]
    fn home(&self, key: &K) -> usize {
        self(key)
    }
}

/// Oracle that derives the home from a `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct HashedHome<S = RandomState> {
    hasher: S,
}

impl HashedHome {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> HashedHome<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

impl<K, S> HomeOracle<K> for HashedHome<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn home(&self, key: &K) -> usize {
        self.hasher.hash_one(key) as usize
    }
}

/// Explicit key -> home assignment.
///
/// Keys without an assignment map to home 0.
#[derive(Clone, Debug)]
pub struct AssignedHomes<K> {
    homes: HashMap<K, usize>,
}

impl<K> Default for AssignedHomes<K> {
    fn default() -> Self {
        Self {
            homes: HashMap::new(),
        }
    }
}

impl<K> AssignedHomes<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign every key a home drawn uniformly from `0..capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn random<I, R>(keys: I, capacity: usize, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = K>,
        R: Rng + ?Sized,
    {
        assert!(capacity > 0, "capacity must be positive");
        let homes = keys
            .into_iter()
            .map(|k| (k, rng.random_range(0..capacity)))
            .collect();
        Self { homes }
    }

    /// Set the home of `key`, returning the previous assignment.
    pub fn assign(&mut self, key: K, home: usize) -> Option<usize> {
        self.homes.insert(key, home)
    }

    pub fn get(&self, key: &K) -> Option<usize> {
        self.homes.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.homes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.homes.is_empty()
    }
}

impl<K> FromIterator<(K, usize)> for AssignedHomes<K>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        Self {
            homes: iter.into_iter().collect(),
        }
    }
}

impl<K> HomeOracle<K> for AssignedHomes<K>
where
    K: Eq + Hash,
{
    #[inline]
    fn home(&self, key: &K) -> usize {
        self.homes.get(key).copied().unwrap_or(0)
    }
}
