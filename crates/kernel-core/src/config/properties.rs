//! Key-value resource stage
//!
//! Loads every resource named `kernel.properties` from the search path at
//! construction, plus any configured `paths` and their profile variants.
//! Files are merged in ascending `(order, location)`:
//!
//! | Source                         | Order        |
//! |--------------------------------|--------------|
//! | bundled defaults               | 0 (pinned)   |
//! | `kernel.properties`            | 100          |
//! | `paths[i]`                     | 1000 + i     |
//! | `base-profile.ext` variants    | 10000 + i    |
//!
//! A file may pin its own order with `properties.order=N`.

use super::Resolver;
use crate::chain::Successor;
use crate::plugin::{
    Component, Configurable, Kind, Lifecycle, Linkable, Object, Plugin, Property, Teardown,
};
use crate::{Error, Result};
use kernel_resource::{Properties, ResourceSearchPath};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

/// Resource loaded at construction.
pub const DEFAULT_PROPERTIES: &str = "kernel.properties";

const PROPERTIES_URLS: &str = "properties.urls+";
const PROPERTIES_ORDER: &str = "properties.order";
const PROPERTIES_PROFILES: &str = "properties.profiles";
const DEFAULT_ORDER: i32 = 100;
const PROFILE_SEPARATOR: char = '-';

const PATHS: &str = "paths";
const PROFILES: &str = "profiles";

struct LoadedFile {
    order: i32,
    location: String,
    properties: Properties,
}

/// Terminal stage reading ordered key-value resources.
pub struct PropertiesResolver {
    next: Successor<dyn Resolver>,
    resources: Arc<dyn ResourceSearchPath>,
    files: RwLock<Vec<LoadedFile>>,
    paths: Mutex<Vec<String>>,
    profiles: Mutex<Vec<String>>,
}

impl PropertiesResolver {
    /// A stage with nothing loaded.
    pub fn empty(resources: Arc<dyn ResourceSearchPath>) -> Self {
        Self {
            next: Successor::new(),
            resources,
            files: RwLock::new(Vec::new()),
            paths: Mutex::new(Vec::new()),
            profiles: Mutex::new(Vec::new()),
        }
    }

    /// A stage with every `kernel.properties` on the search path loaded.
    pub fn load(resources: Arc<dyn ResourceSearchPath>) -> Result<Self> {
        let stage = Self::empty(resources);
        stage.load_named(DEFAULT_PROPERTIES, DEFAULT_ORDER)?;
        Ok(stage)
    }

    /// Load additional resources; the i-th path gets order `1000 + i`.
    pub fn set_paths(&self, paths: Vec<String>) -> Result<()> {
        for (path, order) in paths.iter().zip(DEFAULT_ORDER * 10..) {
            self.load_named(path, order)?;
        }
        *self.paths.lock() = paths;
        Ok(())
    }

    /// Profiles applied to the configured paths during [`Lifecycle::init`].
    pub fn set_profiles(&self, profiles: Vec<String>) {
        *self.profiles.lock() = profiles;
    }

    /// Locations of every loaded file, in merge order.
    pub fn locations(&self) -> Vec<String> {
        self.files
            .read()
            .iter()
            .map(|file| file.location.clone())
            .collect()
    }

    fn load_named(&self, name: &str, order: i32) -> Result<()> {
        for resource in self.resources.find(name)? {
            let lines = self.resources.open(&resource)?;
            let mut properties = Properties::parse_lines(resource.location(), lines)?;
            let order = properties
                .get(PROPERTIES_ORDER)
                .and_then(|value| value.parse::<i32>().ok())
                .unwrap_or(order);
            properties.set(PROPERTIES_ORDER, order.to_string());
            properties.set(PROPERTIES_URLS, resource.location());

            tracing::debug!(
                name,
                location = resource.location(),
                order,
                keys = properties.len(),
                "Loaded properties"
            );

            let file = LoadedFile {
                order,
                location: resource.location().to_string(),
                properties,
            };
            let mut files = self.files.write();
            let position = files.binary_search_by(|probe| {
                (probe.order, probe.location.as_str()).cmp(&(file.order, file.location.as_str()))
            });
            if let Err(idx) = position {
                files.insert(idx, file);
            }
        }
        Ok(())
    }

    fn own_values(&self, key: &str) -> Vec<String> {
        self.files
            .read()
            .iter()
            .filter_map(|file| file.properties.get(key))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// `conf/app.properties` + `debug` -> `conf/app-debug.properties`.
fn profile_name(base: &str, profile: &str) -> String {
    let file_start = base.rfind('/').map_or(0, |idx| idx + 1);
    match base[file_start..].rfind('.') {
        Some(dot) => {
            let (stem, ext) = base.split_at(file_start + dot);
            format!("{stem}{PROFILE_SEPARATOR}{profile}{ext}")
        }
        None => format!("{base}{PROFILE_SEPARATOR}{profile}"),
    }
}

impl Resolver for PropertiesResolver {
    fn resolve(&self, key: &str) -> Result<Vec<String>> {
        let mut values = self.next.resolve(key)?;
        values.extend(self.own_values(key));
        Ok(values)
    }
}

impl Lifecycle for PropertiesResolver {
    fn init(&self) -> Result<bool> {
        let mut profiles = self.profiles.lock().clone();
        if profiles.is_empty() {
            profiles = self
                .resolve(PROPERTIES_PROFILES)?
                .iter()
                .flat_map(|value| value.split(','))
                .map(str::trim)
                .filter(|profile| !profile.is_empty())
                .map(str::to_string)
                .collect();
        }
        if profiles.is_empty() {
            return Ok(true);
        }

        let mut bases = vec![DEFAULT_PROPERTIES.to_string()];
        bases.extend(self.paths.lock().iter().cloned());
        let variants: Vec<String> = bases
            .iter()
            .flat_map(|base| profiles.iter().map(|p| profile_name(base, p)))
            .collect();
        for (variant, order) in variants.iter().zip(DEFAULT_ORDER * 100..) {
            self.load_named(variant, order)?;
        }
        Ok(true)
    }
}

impl Teardown for PropertiesResolver {
    fn close(&self) -> Result<()> {
        self.files.write().clear();
        Ok(())
    }
}

impl Configurable for PropertiesResolver {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new(PATHS, Kind::array(Kind::String)),
            Property::new(PROFILES, Kind::array(Kind::String)),
        ]
    }

    fn set(&self, name: &str, value: Object) -> Result<()> {
        match name {
            PATHS => self.set_paths(value.into_strings()),
            PROFILES => {
                self.set_profiles(value.into_strings());
                Ok(())
            }
            other => Err(Error::plugin(format!(
                "PropertiesResolver has no property {other}"
            ))),
        }
    }
}

impl Linkable for PropertiesResolver {
    fn link(&self, next: Component) -> Result<()> {
        self.next.link(next)
    }
}

impl Plugin for PropertiesResolver {
    fn as_linkable(&self) -> Option<&dyn Linkable> {
        Some(self)
    }

    fn as_lifecycle(&self) -> Option<&dyn Lifecycle> {
        Some(self)
    }

    fn as_teardown(&self) -> Option<&dyn Teardown> {
        Some(self)
    }

    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }

    fn into_resolver(self: Arc<Self>) -> Option<Arc<dyn Resolver>> {
        Some(self)
    }
}

impl fmt::Debug for PropertiesResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertiesResolver")
            .field("locations", &self.locations())
            .finish_non_exhaustive()
    }
}
