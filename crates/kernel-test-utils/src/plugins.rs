//! Sample capabilities and plugin implementations.
//!
//! | Capability | Implementations                                        |
//! |------------|--------------------------------------------------------|
//! | `Car`      | `RacingCar` (configurable), `SportCar`, `BrokenCar`     |
//! |            | `VetoCar` (declines), `FaultyCar` (lifecycle error)     |
//! | `Wheel`    | `AlloyWheel`, `SteelWheel`                             |
//! | `Filter`   | `XFilter` 30, `YFilter` 10, `ZFilter` 20, `FirstFilter` (p5)  |
//! |            | `TraceFilter`, `TerminalFilter`, `ConflictedFilter`     |
//! | `Engine`   | `V8Engine` (needs a gearbox)                           |
//! | `Gearbox`  | `ManualGearbox` (needs an engine)                      |
//! | `Probe`    | `XProbe`, `YProbe` (fails to close), `ZProbe`          |

use kernel_core::plugin::{Configurable, Lifecycle, Linkable, Prioritized, Property, Teardown};
use kernel_core::{Capability, Component, Error, Implementation, Kind, Object, Plugin, Result};
use parking_lot::Mutex;
use std::sync::Arc;

pub const CAR: Capability = Capability::new("Car");
pub const WHEEL: Capability = Capability::new("Wheel");
pub const FILTER: Capability = Capability::new("Filter");
pub const ENGINE: Capability = Capability::new("Engine");
pub const GEARBOX: Capability = Capability::new("Gearbox");
pub const PROBE: Capability = Capability::new("Probe");

fn unknown_property(owner: &str, name: &str) -> Error {
    Error::plugin(format!("{owner} has no property {name}"))
}

fn component_value(owner: &str, name: &str, value: Object) -> Result<Component> {
    value
        .into_component()
        .ok_or_else(|| Error::plugin(format!("{owner}.{name} expects a component")))
}

// Cars

/// A car with an injectable wheel, top speed and tow car.
///
/// `tow` has the car's own capability and is never injected.
#[derive(Default)]
pub struct RacingCar {
    wheel: Mutex<Option<Component>>,
    top_speed: Mutex<Option<i32>>,
    tow: Mutex<Option<Component>>,
}

impl RacingCar {
    pub fn wheel(&self) -> Option<Component> {
        self.wheel.lock().clone()
    }

    pub fn top_speed(&self) -> Option<i32> {
        *self.top_speed.lock()
    }

    pub fn tow(&self) -> Option<Component> {
        self.tow.lock().clone()
    }
}

impl Configurable for RacingCar {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("wheel", Kind::Capability(WHEEL)),
            Property::new("top.speed", Kind::Int),
            Property::new("tow", Kind::Capability(CAR)),
        ]
    }

    fn set(&self, name: &str, value: Object) -> Result<()> {
        match (name, value) {
            ("wheel", value) => {
                *self.wheel.lock() = Some(component_value("RacingCar", name, value)?);
            }
            ("top.speed", Object::Int(speed)) => *self.top_speed.lock() = Some(speed),
            ("tow", value) => {
                *self.tow.lock() = Some(component_value("RacingCar", name, value)?);
            }
            (other, _) => return Err(unknown_property("RacingCar", other)),
        }
        Ok(())
    }
}

impl Plugin for RacingCar {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

pub struct SportCar;

impl Plugin for SportCar {}

/// Always declines its lifecycle check.
pub struct VetoCar;

impl Lifecycle for VetoCar {
    fn init(&self) -> Result<bool> {
        Ok(false)
    }
}

impl Plugin for VetoCar {
    fn as_lifecycle(&self) -> Option<&dyn Lifecycle> {
        Some(self)
    }
}

/// Its lifecycle check fails with an error.
pub struct FaultyCar;

impl Lifecycle for FaultyCar {
    fn init(&self) -> Result<bool> {
        Err(Error::plugin("ignition fault"))
    }
}

impl Plugin for FaultyCar {
    fn as_lifecycle(&self) -> Option<&dyn Lifecycle> {
        Some(self)
    }
}

// Wheels

pub struct AlloyWheel;

impl Plugin for AlloyWheel {}

pub struct SteelWheel;

impl Plugin for SteelWheel {}

// Filters

/// A linkable filter recording its successor.
pub struct ChainFilter {
    label: &'static str,
    priority: Option<i32>,
    next: Mutex<Option<Component>>,
}

impl ChainFilter {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            priority: None,
            next: Mutex::new(None),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn label(&self) -> &str {
        self.label
    }

    pub fn next(&self) -> Option<Component> {
        self.next.lock().clone()
    }
}

impl Linkable for ChainFilter {
    fn link(&self, next: Component) -> Result<()> {
        *self.next.lock() = Some(next);
        Ok(())
    }
}

impl Prioritized for ChainFilter {
    fn priority(&self) -> i32 {
        self.priority.unwrap_or_default()
    }
}

impl Plugin for ChainFilter {
    fn as_linkable(&self) -> Option<&dyn Linkable> {
        Some(self)
    }

    fn as_prioritized(&self) -> Option<&dyn Prioritized> {
        self.priority.map(|_| self as &dyn Prioritized)
    }
}

/// End of a filter chain; cannot be linked.
pub struct TerminalFilter;

impl Plugin for TerminalFilter {}

/// Labels of a filter chain, head first.
pub fn filter_labels(head: &Component) -> Vec<String> {
    let mut labels = Vec::new();
    let mut current = Some(head.clone());
    while let Some(component) = current {
        if let Some(filter) = component.downcast_ref::<ChainFilter>() {
            labels.push(filter.label().to_string());
            current = filter.next();
        } else {
            labels.push(component.implementation().spi_name().to_lowercase());
            current = None;
        }
    }
    labels
}

// Engine and gearbox depend on each other

#[derive(Default)]
pub struct V8Engine {
    gearbox: Mutex<Option<Component>>,
}

impl V8Engine {
    pub fn gearbox(&self) -> Option<Component> {
        self.gearbox.lock().clone()
    }
}

impl Configurable for V8Engine {
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("gearbox", Kind::Capability(GEARBOX))]
    }

    fn set(&self, name: &str, value: Object) -> Result<()> {
        match name {
            "gearbox" => {
                *self.gearbox.lock() = Some(component_value("V8Engine", name, value)?);
                Ok(())
            }
            other => Err(unknown_property("V8Engine", other)),
        }
    }
}

impl Plugin for V8Engine {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

#[derive(Default)]
pub struct ManualGearbox {
    engine: Mutex<Option<Component>>,
}

impl ManualGearbox {
    pub fn engine(&self) -> Option<Component> {
        self.engine.lock().clone()
    }
}

impl Configurable for ManualGearbox {
    fn properties(&self) -> Vec<Property> {
        vec![Property::new("engine", Kind::Capability(ENGINE))]
    }

    fn set(&self, name: &str, value: Object) -> Result<()> {
        match name {
            "engine" => {
                *self.engine.lock() = Some(component_value("ManualGearbox", name, value)?);
                Ok(())
            }
            other => Err(unknown_property("ManualGearbox", other)),
        }
    }
}

impl Plugin for ManualGearbox {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

// Probes

/// Names of closed probes, in closing order.
pub type ProbeLog = Arc<Mutex<Vec<String>>>;

pub struct Probe {
    name: String,
    fail: bool,
    log: ProbeLog,
}

impl Teardown for Probe {
    fn close(&self) -> Result<()> {
        self.log.lock().push(self.name.clone());
        if self.fail {
            Err(Error::plugin(format!("{} refused to close", self.name)))
        } else {
            Ok(())
        }
    }
}

impl Plugin for Probe {
    fn as_teardown(&self) -> Option<&dyn Teardown> {
        Some(self)
    }
}

fn probe(type_name: &str, fail: bool, log: &ProbeLog) -> Implementation {
    let log = Arc::clone(log);
    let name = type_name.to_string();
    Implementation::new(PROBE, type_name, move |_| {
        Ok(Probe {
            name: name.clone(),
            fail,
            log: Arc::clone(&log),
        })
    })
}

/// `XProbe`, `YProbe` and `ZProbe`; only `YProbe` fails to close.
pub fn probe_implementations(log: &ProbeLog) -> Vec<Implementation> {
    vec![
        probe("XProbe", false, log),
        probe("YProbe", true, log),
        probe("ZProbe", false, log),
    ]
}

/// Every fixture implementation except the probes.
pub fn implementations() -> Vec<Implementation> {
    vec![
        Implementation::new(CAR, "RacingCar", |_| Ok(RacingCar::default())),
        Implementation::new(CAR, "SportCar", |_| Ok(SportCar)),
        Implementation::new(CAR, "VetoCar", |_| Ok(VetoCar)),
        Implementation::new(CAR, "FaultyCar", |_| Ok(FaultyCar)),
        Implementation::new(CAR, "BrokenCar", |_| {
            Err::<SportCar, _>(Error::plugin("no engine fitted"))
        }),
        Implementation::new(WHEEL, "AlloyWheel", |_| Ok(AlloyWheel)),
        Implementation::new(WHEEL, "SteelWheel", |_| Ok(SteelWheel)),
        Implementation::new(FILTER, "XFilter", |_| Ok(ChainFilter::new("x"))).with_order(30),
        Implementation::new(FILTER, "YFilter", |_| Ok(ChainFilter::new("y"))).with_order(10),
        Implementation::new(FILTER, "ZFilter", |_| Ok(ChainFilter::new("z"))).with_order(20),
        Implementation::new(FILTER, "FirstFilter", |_| {
            Ok(ChainFilter::new("first").with_priority(5))
        }),
        Implementation::new(FILTER, "TraceFilter", |_| Ok(ChainFilter::new("trace"))),
        Implementation::new(FILTER, "TerminalFilter", |_| Ok(TerminalFilter)),
        Implementation::new(FILTER, "ConflictedFilter", |_| {
            Ok(ChainFilter::new("conflicted").with_priority(1))
        })
        .with_order(1),
        Implementation::new(ENGINE, "V8Engine", |_| Ok(V8Engine::default())),
        Implementation::new(GEARBOX, "ManualGearbox", |_| Ok(ManualGearbox::default())),
    ]
}
