//! Scenario Tests
//!
//! Production scenarios for the kernel's documented guarantees: operator
//! edits, reference cycles, chain ordering, singleton identity, teardown
//! aggregation and optional injection.

use kernel_core::plugin::{Configurable, Property};
use kernel_core::{Capability, Component, Error, Implementation, Kind, Object, Plugin, Result};
use kernel_test_utils::kernel::{inline_builder, inline_kernel};
use kernel_test_utils::plugins::{
    CAR, FILTER, PROBE, ProbeLog, RacingCar, WHEEL, filter_labels, probe_implementations,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

// =============================================================================
// Test Infrastructure
// =============================================================================

const GARAGE: Capability = Capability::new("Garage");

/// Holds two wheels of the same capability, injected in one construction.
#[derive(Default)]
struct PitGarage {
    front: Mutex<Option<Component>>,
    rear: Mutex<Option<Component>>,
}

impl Configurable for PitGarage {
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("front.wheel", Kind::Capability(WHEEL)),
            Property::new("rear.wheel", Kind::Capability(WHEEL)),
        ]
    }

    fn set(&self, name: &str, value: Object) -> Result<()> {
        let slot = match name {
            "front.wheel" => &self.front,
            "rear.wheel" => &self.rear,
            other => return Err(Error::plugin(format!("no property {other}"))),
        };
        *slot.lock() = value.into_component();
        Ok(())
    }
}

impl Plugin for PitGarage {
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

// =============================================================================
// Value resolution
// =============================================================================

mod resolution_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unanchored_prepend_goes_first() {
        let kernel = inline_kernel("filters=aaa,bbb\nfilters^=ccc\n");
        assert_eq!(kernel.resolve("filters").unwrap(), vec!["ccc", "aaa", "bbb"]);
    }

    #[test]
    fn test_anchored_append_follows_anchor() {
        let kernel = inline_kernel("filters=trace,aaa\nfilters+=trace:zzz\n");
        assert_eq!(kernel.resolve("filters").unwrap(), vec!["trace", "zzz", "aaa"]);
    }

    #[test]
    fn test_reference_cycle_names_both_keys() {
        let kernel = inline_kernel("a=$b\nb=$a\n");
        let message = kernel.resolve("a").unwrap_err().to_string();
        assert!(message.contains("a -> b"), "{message}");
    }
}

// =============================================================================
// Object assembly
// =============================================================================

mod assembly_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_end_to_end_car_without_wheel() {
        let kernel = inline_kernel("car=racing\n");
        let car = kernel.component(&CAR).unwrap().unwrap();

        assert_eq!(car.implementation().spi_name(), "Racing");
        let racing = car.downcast_ref::<RacingCar>().unwrap();
        assert!(racing.wheel().is_none());
    }

    #[test]
    fn test_chain_head_has_lowest_priority() {
        let kernel = inline_kernel("");
        let head = kernel
            .create_with(&Kind::Capability(FILTER), &["x", "y", "z"])
            .unwrap()
            .and_then(Object::into_component)
            .unwrap();
        assert_eq!(filter_labels(&head), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_one_instance_per_token_within_a_construction() {
        let kernel = inline_builder("garage=pit\nfront.wheel=alloy\nrear.wheel=alloy\n")
            .register(Implementation::new(GARAGE, "PitGarage", |_| {
                Ok(PitGarage::default())
            }))
            .build()
            .unwrap();

        let garage = kernel.component(&GARAGE).unwrap().unwrap();
        let garage = garage.downcast_ref::<PitGarage>().unwrap();
        let front = garage.front.lock().clone().unwrap();
        let rear = garage.rear.lock().clone().unwrap();
        assert!(front.ptr_eq(&rear));
    }

    #[test]
    fn test_concurrent_first_builds_share_one_instance() {
        let kernel = inline_kernel("car=racing\nwheel=steel\n");
        let built: Vec<Component> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| kernel.component(&CAR).unwrap().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = &built[0];
        assert!(built.iter().all(|car| car.ptr_eq(first)));
    }
}

// =============================================================================
// Shutdown
// =============================================================================

mod teardown_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_teardown_does_not_stop_the_others() {
        let log: ProbeLog = Arc::new(Mutex::new(Vec::new()));
        let kernel = probe_implementations(&log)
            .into_iter()
            .fold(inline_builder(""), |builder, imp| builder.register(imp))
            .build()
            .unwrap();
        for token in ["x", "y", "z"] {
            kernel.create_with(&Kind::Capability(PROBE), &[token]).unwrap();
        }

        let err = kernel.close().unwrap_err();
        assert_eq!(*log.lock(), vec!["ZProbe", "YProbe", "XProbe"]);
        match err {
            Error::Teardown { failures } => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].starts_with("YProbe"), "{failures:?}");
            }
            other => panic!("expected one aggregate error, got {other:?}"),
        }
    }
}
