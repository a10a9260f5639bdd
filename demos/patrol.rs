//! Two guards patrolling a corridor, ticked side by side by a fixed-step loop.
//!
//! Run with `RUST_LOG=resumable_bt=trace` to see the node lifecycle.

use resumable_bt::{
    from_fn, wait, Action, BehaviorResult, Body, Context, Node, Procedure, SelectorNode,
    SequenceNode, Step,
};

#[derive(Debug)]
struct Guard {
    name: &'static str,
    position: f64,
    intruder: Option<f64>,
    alarms: usize,
}

impl Guard {
    fn new(name: &'static str, position: f64) -> Self {
        Self {
            name,
            position,
            intruder: None,
            alarms: 0,
        }
    }
}

struct Waypoints(Vec<f64>);

const SPEED: f64 = 2.;

/// Moves towards `target`, returns true once it is reached.
fn walk(guard: &mut Guard, target: f64, dt: f64) -> bool {
    let step = SPEED * dt;
    let delta = target - guard.position;
    if delta.abs() <= step {
        guard.position = target;
        true
    } else {
        guard.position += step * delta.signum();
        false
    }
}

fn patrol() -> Node<Guard> {
    Node::new(Action::new(
        Waypoints(vec![0., 4., 8.]),
        |waypoints, _ctx: &mut Context<Guard>| {
            let points = waypoints.0.clone();
            let mut next = 0;
            Body::Steps(from_fn(move |ctx: &mut Context<Guard>, _| {
                let dt = ctx.dt();
                if walk(ctx.env_mut(), points[next], dt) {
                    next += 1;
                    if points.len() <= next {
                        return Step::Done(BehaviorResult::Success);
                    }
                }
                Step::Yield
            }))
        },
    ))
    .named("Patrol")
}

fn intercept() -> Node<Guard> {
    Node::new(
        Action::new(1.5, |pause: &f64, _ctx: &mut Context<Guard>| {
            let pause = *pause;
            Body::steps(
                Procedure::<Guard>::new()
                    .step(|ctx, _| {
                        let guard = ctx.env_mut();
                        let Some(target) = guard.intruder else {
                            return Step::Done(BehaviorResult::Fail);
                        };
                        guard.alarms += 1;
                        println!("{}: Halt! (alarm #{})", guard.name, guard.alarms);
                        Step::Descend(from_fn(move |ctx: &mut Context<Guard>, _| {
                            let dt = ctx.dt();
                            if walk(ctx.env_mut(), target, dt) {
                                Step::Done(BehaviorResult::Success)
                            } else {
                                Step::Yield
                            }
                        }))
                    })
                    .step(move |ctx, _| {
                        println!("{}: caught the intruder, resting", ctx.env().name);
                        Step::Descend(wait(pause))
                    })
                    .step(|ctx, _| {
                        ctx.env_mut().intruder = None;
                        Step::Done(BehaviorResult::Success)
                    }),
            )
        })
        // Look around twice a second
        .with_condition(|_, ctx| ctx.env().intruder.is_some())
        .with_check_interval(0.5),
    )
    .named("Intercept")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut guards = vec![Guard::new("north", 0.), Guard::new("south", 8.)];
    let mut trees: Vec<_> = guards
        .iter()
        .map(|_| Node::new(SelectorNode::new(vec![intercept(), patrol()])))
        .collect();

    let dt = 0.25;
    for frame in 0..40 {
        let time = frame as f64 * dt;
        if frame == 10 {
            guards[1].intruder = Some(5.);
        }
        for (guard, tree) in guards.iter_mut().zip(trees.iter_mut()) {
            let result = tree.tick(time, dt, guard);
            if result.is_terminal() {
                println!("{:5.2}s {}: {:?}", time, guard.name, result);
            }
        }
    }

    for (guard, tree) in guards.iter_mut().zip(trees.iter_mut()) {
        tree.abort(guard);
        println!("{:?}", guard);
    }

    // A sequence stops at the first failing step
    let mut checklist = Node::new(SequenceNode::new(vec![
        Node::new(Action::new((), |_, ctx: &mut Context<Guard>| {
            let result = if ctx.env().alarms == 0 {
                BehaviorResult::Success
            } else {
                BehaviorResult::Fail
            };
            result.into()
        }))
        .named("NoAlarms"),
        patrol(),
    ]));
    let result = checklist.tick(0., dt, &mut guards[1]);
    println!("south checklist: {:?}", result);

    Ok(())
}
