//! End-to-end integration test for the vertical slice
//!
//! Exercises the complete flow: resources on disk -> bootstrap -> value
//! resolution -> object assembly -> shutdown.

use kernel_core::{Kernel, Kind, Object};
use kernel_resource::{DirectorySearchPath, OverrideProperties};
use kernel_test_utils::plugins::{self, AlloyWheel, CAR, FILTER, RacingCar, filter_labels};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Set up a directory with a kernel.properties and an included list file
fn setup_config_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("kernel.properties"),
        r#"
# Vehicle
car=racing
racing.wheel=alloy

# Filters come from a managed list, edited in place
filter=@filters.list
filter^=first
filter-=trace
"#,
    )
    .unwrap();
    fs::write(temp.path().join("filters.list"), "trace\nx\ny\nz\n").unwrap();
    temp
}

fn kernel_over(temp: &TempDir, args: &[&str]) -> Kernel {
    plugins::implementations()
        .into_iter()
        .fold(
            Kernel::builder()
                .resources(Arc::new(DirectorySearchPath::new([temp.path()])))
                .environment(Arc::new(OverrideProperties::new()))
                .overrides(Arc::new(OverrideProperties::from_args(args.iter().copied()))),
            |builder, implementation| builder.register(implementation),
        )
        .build()
        .unwrap()
}

#[test]
fn test_resolve_configuration_from_disk() {
    let temp = setup_config_dir();
    let kernel = kernel_over(&temp, &[]);

    assert_eq!(kernel.resolve("car").unwrap(), vec!["racing"]);
    assert_eq!(kernel.resolve("filter").unwrap(), vec!["first", "x", "y", "z"]);
}

#[test]
fn test_assemble_configured_objects() {
    let temp = setup_config_dir();
    let kernel = kernel_over(&temp, &[]);

    let car = kernel.component(&CAR).unwrap().unwrap();
    let wheel = car.downcast_ref::<RacingCar>().unwrap().wheel().unwrap();
    assert!(wheel.is::<AlloyWheel>());

    let head = kernel.component(&FILTER).unwrap().unwrap();
    assert_eq!(filter_labels(&head), vec!["first", "y", "z", "x"]);

    kernel.close().unwrap();
}

#[test]
fn test_command_line_overrides_win() {
    let temp = setup_config_dir();
    let kernel = kernel_over(&temp, &["-Dcar=sport", "-Dfilter=z,x"]);

    assert_eq!(kernel.resolve("car").unwrap(), vec!["sport"]);
    let head = kernel.component(&FILTER).unwrap().unwrap();
    assert_eq!(filter_labels(&head), vec!["first", "z", "x"]);
}

#[test]
fn test_overrides_can_reach_injected_properties() {
    let temp = setup_config_dir();
    let kernel = kernel_over(&temp, &["-Dracing.top.speed=333"]);

    let car = kernel
        .create_with(&Kind::Capability(CAR), &["racing"])
        .unwrap()
        .and_then(Object::into_component)
        .unwrap();
    assert_eq!(car.downcast_ref::<RacingCar>().unwrap().top_speed(), Some(333));
}
