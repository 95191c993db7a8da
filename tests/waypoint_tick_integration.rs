//! Waypoint tick integration tests: vehicles, arrival events and map frames
//! running through a real bevy_ecs schedule.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use biocharmap::components::facility::Facility;
use biocharmap::components::geoposition::{Coordinate, GeoPosition};
use biocharmap::components::route::{DEFAULT_STEP, Route, RouteMode};
use biocharmap::components::vehicle::Vehicle;
use biocharmap::events::arrival::{ArrivalEvent, arrival_observer};
use biocharmap::resources::arrivallog::ArrivalLog;
use biocharmap::resources::mapsurface::MapSurface;
use biocharmap::resources::worldtime::WorldTime;
use biocharmap::systems::mapsurface::publish_map_frame;
use biocharmap::systems::time::update_world_time;
use biocharmap::systems::waypoint::waypoint_system;

const EPSILON: f64 = 1e-12;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(ArrivalLog::default());
    world.insert_resource(MapSurface::default());
    world.add_observer(arrival_observer);
    world
}

fn make_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((waypoint_system, publish_map_frame).chain());
    schedule
}

fn tick(world: &mut World, schedule: &mut Schedule) {
    update_world_time(world, 1.0 / 60.0);
    schedule.run(world);
}

fn spawn_vehicle(world: &mut World, id: &str, start: Coordinate, end: Coordinate) -> Entity {
    world
        .spawn((
            Vehicle::new(id),
            GeoPosition::from(start),
            Route::new(start, end, DEFAULT_STEP),
        ))
        .id()
}

#[test]
fn empty_world_ticks_are_noops() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    for _ in 0..5 {
        tick(&mut world, &mut schedule);
    }
    let surface = world.resource::<MapSurface>();
    assert_eq!(surface.published(), 5);
    assert!(surface.latest().unwrap().vehicles.is_empty());
    assert_eq!(world.resource::<ArrivalLog>().total(), 0);
}

#[test]
fn scenario_route_arrives_after_twenty_ticks() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let start = Coordinate::new(50.0, 8.0);
    let end = Coordinate::new(50.0, 8.01);
    let van = spawn_vehicle(&mut world, "van", start, end);

    for _ in 0..19 {
        tick(&mut world, &mut schedule);
    }
    assert_eq!(world.resource::<ArrivalLog>().count("van"), 0);

    tick(&mut world, &mut schedule);
    assert_eq!(world.get::<GeoPosition>(van).unwrap().pos, end);
    let route = world.get::<Route>(van).unwrap();
    assert_eq!(route.end, start);
    assert_eq!(route.start, end);
    assert_eq!(world.resource::<ArrivalLog>().count("van"), 1);
}

#[test]
fn two_vehicles_advance_in_the_same_tick_independently() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let a = spawn_vehicle(
        &mut world,
        "a",
        Coordinate::new(50.0, 8.0),
        Coordinate::new(50.0, 8.01),
    );
    let b = spawn_vehicle(
        &mut world,
        "b",
        Coordinate::new(-10.0, 100.0),
        Coordinate::new(-10.01, 100.0),
    );

    tick(&mut world, &mut schedule);

    let pa = world.get::<GeoPosition>(a).unwrap().pos;
    let pb = world.get::<GeoPosition>(b).unwrap().pos;
    assert!(approx_eq(pa.lat, 50.0));
    assert!(approx_eq(pa.lng, 8.0005));
    assert!(approx_eq(pb.lat, -10.0005));
    assert!(approx_eq(pb.lng, 100.0));

    let frame = world.resource::<MapSurface>().latest().unwrap().clone();
    assert_eq!(frame.frame, 1);
    let ids: Vec<&str> = frame.vehicles.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(frame.vehicle("a").unwrap().position, pa);
    assert_eq!(frame.vehicle("b").unwrap().heading_to, Coordinate::new(-10.01, 100.0));
}

#[test]
fn one_vehicle_arriving_does_not_disturb_another() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let here = Coordinate::new(1.0, 1.0);
    let parked = spawn_vehicle(&mut world, "parked", here, here);
    let mover = spawn_vehicle(
        &mut world,
        "mover",
        Coordinate::new(0.0, 0.0),
        Coordinate::new(0.0, 1.0),
    );

    for _ in 0..10 {
        tick(&mut world, &mut schedule);
    }

    assert_eq!(world.get::<GeoPosition>(parked).unwrap().pos, here);
    assert_eq!(world.resource::<ArrivalLog>().count("parked"), 10);
    assert_eq!(world.resource::<ArrivalLog>().count("mover"), 0);
    let p = world.get::<GeoPosition>(mover).unwrap().pos;
    assert!(approx_eq(p.lng, 10.0 * DEFAULT_STEP));
}

#[test]
fn arrival_event_carries_next_target() {
    #[derive(Resource, Default)]
    struct Seen(Vec<ArrivalEvent>);

    let mut world = make_world();
    world.init_resource::<Seen>();
    world.add_observer(|trigger: On<ArrivalEvent>, mut seen: ResMut<Seen>| {
        seen.0.push(trigger.event().clone());
    });
    let mut schedule = make_schedule();
    let start = Coordinate::new(0.0, 0.0);
    let end = Coordinate::new(0.0, 0.0004);
    let van = spawn_vehicle(&mut world, "van", start, end);

    tick(&mut world, &mut schedule);

    let seen = world.resource::<Seen>();
    assert_eq!(seen.0.len(), 1);
    let ev = &seen.0[0];
    assert_eq!(ev.entity, van);
    assert_eq!(ev.vehicle, "van");
    assert_eq!(ev.at, end);
    assert_eq!(ev.next_target, start);
    assert_eq!(ev.arrivals, 1);
    assert!(!ev.halted);
}

#[test]
fn approach_vehicle_halts_and_reports_once() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let start = Coordinate::new(51.505, -0.09);
    let end = Coordinate::new(51.51, -0.1);
    let car = world
        .spawn((
            Vehicle::new("car"),
            GeoPosition::from(start),
            Route::new(start, end, DEFAULT_STEP).with_mode(RouteMode::Approach {
                rate: 0.2,
                epsilon: 0.0001,
            }),
        ))
        .id();

    for _ in 0..100 {
        tick(&mut world, &mut schedule);
    }

    assert!(world.get::<Route>(car).unwrap().halted);
    assert_eq!(world.resource::<ArrivalLog>().count("car"), 1);
    let pos = world.get::<GeoPosition>(car).unwrap().pos;
    assert!(pos.within_axis_epsilon(end, 0.0001));
    let frame = world.resource::<MapSurface>().latest().unwrap();
    assert!(frame.vehicle("car").unwrap().halted);
}

#[test]
fn facilities_are_published_but_never_move() {
    let mut world = make_world();
    let mut schedule = make_schedule();
    let works = Coordinate::new(51.505, -0.09);
    world.spawn((Facility::new("Works"), GeoPosition::from(works)));
    world.spawn((Facility::new("Depot"), GeoPosition::new(51.51, -0.1)));

    for _ in 0..3 {
        tick(&mut world, &mut schedule);
    }

    let frame = world.resource::<MapSurface>().latest().unwrap();
    let labels: Vec<&str> = frame.facilities.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["Depot", "Works"]);
    assert_eq!(frame.facilities[1].position, works);
    assert!(frame.vehicles.is_empty());
}
