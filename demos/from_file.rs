//! Loads a tree definition from a file and runs it against a small house
//! simulation.
//!
//! ```text
//! cargo run --example from_file -- demos/guard.bt
//! cargo run --example from_file -- demos/guard.yaml
//! ```

use ::resumable_bt::{
    boxify, from_fn, load_str, load_yaml, wait, Behavior, BehaviorResult, Body, Context, FromArgs,
    Procedure, Registry, Step,
};
use anyhow::Context as _;
use serde::Deserialize;
use std::fs;

#[derive(Default)]
struct House {
    door_open: bool,
    lines: usize,
}

struct DoorOpen;

impl Behavior<House> for DoorOpen {
    fn run(&mut self, ctx: &mut Context<House>) -> Body<House> {
        let result = if ctx.env().door_open {
            BehaviorResult::Success
        } else {
            BehaviorResult::Fail
        };
        result.into()
    }
}

#[derive(Deserialize)]
struct SayArgs {
    message: String,
}

/// Speaks a line, then pauses for a second.
struct Say(SayArgs);

impl FromArgs for Say {
    type Args = SayArgs;

    fn from_args(args: SayArgs) -> Self {
        Say(args)
    }
}

impl Behavior<House> for Say {
    fn run(&mut self, ctx: &mut Context<House>) -> Body<House> {
        println!("{:5.2}s: {}", ctx.time(), self.0.message);
        ctx.env_mut().lines += 1;
        Body::steps(Procedure::<House>::new().step(|_, _| Step::Descend(wait(1.))))
    }
}

#[derive(Deserialize)]
struct PatrolArgs {
    rounds: usize,
}

/// Walks around the house, a round takes two seconds. Only while the door is
/// closed.
struct Patrol(PatrolArgs);

impl FromArgs for Patrol {
    type Args = PatrolArgs;

    fn from_args(args: PatrolArgs) -> Self {
        Patrol(args)
    }
}

impl Behavior<House> for Patrol {
    fn on_exit(&mut self, result: BehaviorResult, _house: &mut House) {
        println!("patrol finished: {:?}", result);
    }

    fn condition(&self, ctx: &Context<House>) -> bool {
        !ctx.env().door_open
    }

    fn run(&mut self, _ctx: &mut Context<House>) -> Body<House> {
        let rounds = self.0.rounds;
        let mut round = 0;
        Body::Steps(from_fn(move |ctx: &mut Context<House>, nested| {
            if nested.is_some() {
                round += 1;
                println!("{:5.2}s: round {} of {} done", ctx.time(), round, rounds);
            }
            if round < rounds {
                Step::Descend(wait(2.))
            } else {
                Step::Done(BehaviorResult::Success)
            }
        }))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/guard.bt".to_owned());

    let mut registry = Registry::<House>::default();
    registry.register("DoorOpen", boxify(|| DoorOpen));
    registry.register_from_args::<Say>("Say");
    registry.register_from_args::<Patrol>("Patrol");

    let source = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let mut tree = if path.ends_with(".yaml") || path.ends_with(".yml") {
        load_yaml(&source, &registry)?
    } else {
        load_str(&source, &registry)?
    };

    let mut house = House::default();
    let dt = 0.25;
    for frame in 0..60 {
        let time = frame as f64 * dt;
        house.door_open = (8..16).contains(&frame);
        let result = tree.tick(time, dt, &mut house);
        if result.is_terminal() {
            println!("{:5.2}s: tree {:?}", time, result);
        }
    }
    tree.abort(&mut house);

    println!("{} lines spoken", house.lines);

    Ok(())
}
