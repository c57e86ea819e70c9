use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher;

/// A named geographic point used as the provider query key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

const BUILTIN_CITIES: &[(&str, f64, f64)] = &[
    ("北京", 39.9042, 116.4074),
    ("上海", 31.2304, 121.4737),
    ("广州", 23.1291, 113.2644),
    ("深圳", 22.5431, 114.0579),
    ("成都", 30.5728, 104.0668),
    ("杭州", 30.2741, 120.1551),
    ("纽约", 40.7128, -74.0060),
    ("伦敦", 51.5074, -0.1278),
    ("东京", 35.6762, 139.6503),
    ("巴黎", 48.8566, 2.3522),
    ("悉尼", -33.8688, 151.2093),
    ("开罗", 30.0444, 31.2357),
    ("里约热内卢", -22.9068, -43.1729),
    ("莫斯科", 55.7558, 37.6173),
    ("开普敦", -33.9249, 18.4241),
];

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("city directory must contain at least one location")]
    Empty,

    #[error("duplicate city name '{0}' in directory")]
    DuplicateName(String),

    #[error("city '{name}' has out-of-range coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        name: String,
        latitude: f64,
        longitude: f64,
    },
}

/// Fixed, non-empty list of locations with unique names.
#[derive(Debug, Clone)]
pub struct CityDirectory {
    locations: Vec<Location>,
}

impl CityDirectory {
    pub fn new(locations: Vec<Location>) -> Result<Self, CatalogError> {
        if locations.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(locations.len());
        for location in &locations {
            if !location.has_valid_coordinates() {
                return Err(CatalogError::InvalidCoordinates {
                    name: location.name.clone(),
                    latitude: location.latitude,
                    longitude: location.longitude,
                });
            }
            if !seen.insert(location.name.as_str()) {
                return Err(CatalogError::DuplicateName(location.name.clone()));
            }
        }

        Ok(Self { locations })
    }

    /// The fifteen cities shipped with the application.
    pub fn builtin() -> Self {
        let locations = BUILTIN_CITIES
            .iter()
            .map(|&(name, latitude, longitude)| Location::new(name, latitude, longitude))
            .collect();

        Self { locations }
    }

    /// Exact name lookup.
    pub fn find(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.name == name)
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> &Location {
        let index = rng.random_range(0..self.locations.len());
        &self.locations[index]
    }

    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        matcher::suggest(query, &self.locations, limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Default for CityDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}
