#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for itinerary planning, fallback and caching.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use ridevote_core::test_support::{StubOptimiser, attraction, ids};
use ridevote_core::{Attraction, ItineraryPath, ItineraryPlanner, Land, OptimiseError, PathSource};

/// State shared by the itinerary steps.
pub struct ItineraryWorld {
    attractions: RefCell<Vec<Attraction>>,
    planner: RefCell<Option<ItineraryPlanner<StubOptimiser>>>,
    path: RefCell<Option<ItineraryPath>>,
}

#[fixture]
/// Start every scenario with no attractions and no planner.
pub fn world() -> ItineraryWorld {
    ItineraryWorld {
        attractions: RefCell::new(Vec::new()),
        planner: RefCell::new(None),
        path: RefCell::new(None),
    }
}

fn install(world: &ItineraryWorld, optimiser: StubOptimiser) {
    world
        .planner
        .replace(Some(ItineraryPlanner::new(optimiser)));
}

fn plan(world: &ItineraryWorld, attractions: &[Attraction]) {
    let guard = world.planner.borrow();
    let planner = guard.as_ref().expect("planner should be configured");
    world.path.replace(Some(planner.plan(attractions)));
}

fn path_ids(world: &ItineraryWorld) -> Vec<String> {
    world
        .path
        .borrow()
        .as_ref()
        .expect("itinerary should be planned")
        .ids()
        .into_iter()
        .map(String::from)
        .collect()
}

fn path_source(world: &ItineraryWorld) -> PathSource {
    world
        .path
        .borrow()
        .as_ref()
        .expect("itinerary should be planned")
        .source()
}

fn calls(world: &ItineraryWorld) -> usize {
    world
        .planner
        .borrow()
        .as_ref()
        .expect("planner should be configured")
        .optimiser()
        .calls()
}

#[given("three top attractions A, B and C")]
fn three_attractions(world: &ItineraryWorld) {
    world.attractions.replace(vec![
        attraction("A", Land::Frontierland),
        attraction("B", Land::Fantasyland),
        attraction("C", Land::MainStreet),
    ]);
}

#[given("a reasoning service answering C, A, B")]
fn service_cab(world: &ItineraryWorld) {
    install(world, StubOptimiser::with_path(ids(&["C", "A", "B"])));
}

#[given("a reasoning service answering A, B")]
fn service_ab(world: &ItineraryWorld) {
    install(world, StubOptimiser::with_path(ids(&["A", "B"])));
}

#[given("a reasoning service that times out")]
fn service_timeout(world: &ItineraryWorld) {
    install(
        world,
        StubOptimiser::with_error(OptimiseError::Timeout {
            url: "https://reasoning.example".to_owned(),
            timeout_secs: 10,
        }),
    );
}

#[given("a reasoning service that reverses its input")]
fn service_reverse(world: &ItineraryWorld) {
    install(world, StubOptimiser::reversing());
}

#[when("the itinerary is planned")]
fn plan_all(world: &ItineraryWorld) {
    let attractions = world.attractions.borrow().clone();
    plan(world, &attractions);
}

#[when("the itinerary is planned again")]
fn plan_again(world: &ItineraryWorld) {
    plan_all(world);
}

#[when("the itinerary is planned for A and B only")]
fn plan_subset(world: &ItineraryWorld) {
    let subset: Vec<Attraction> = world.attractions.borrow().iter().take(2).cloned().collect();
    plan(world, &subset);
}

#[then("the path is C, A, B")]
fn path_cab(world: &ItineraryWorld) {
    assert_eq!(path_ids(world), ["C", "A", "B"]);
}

#[then("the path is A, B, C")]
fn path_abc(world: &ItineraryWorld) {
    assert_eq!(path_ids(world), ["A", "B", "C"]);
}

#[then("the path is B, A")]
fn path_ba(world: &ItineraryWorld) {
    assert_eq!(path_ids(world), ["B", "A"]);
}

#[then("the path is marked as optimised")]
fn marked_optimised(world: &ItineraryWorld) {
    assert_eq!(path_source(world), PathSource::Optimised);
}

#[then("the path is marked as a fallback")]
fn marked_fallback(world: &ItineraryWorld) {
    assert_eq!(path_source(world), PathSource::Fallback);
}

#[then("the reasoning service was called once")]
fn called_once(world: &ItineraryWorld) {
    assert_eq!(calls(world), 1);
}

#[then("the reasoning service was called twice")]
fn called_twice(world: &ItineraryWorld) {
    assert_eq!(calls(world), 2);
}

#[scenario(path = "tests/features/itinerary.feature", index = 0)]
fn valid_reordering(world: ItineraryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/itinerary.feature", index = 1)]
fn failing_service(world: ItineraryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/itinerary.feature", index = 2)]
fn incomplete_answer(world: ItineraryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/itinerary.feature", index = 3)]
fn cached_plan(world: ItineraryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/itinerary.feature", index = 4)]
fn changed_set(world: ItineraryWorld) {
    let _ = world;
}
