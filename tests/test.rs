use resumable_bt::{
    boxify, load_str, wait, Action, Behavior, BehaviorResult, Body, Context, DecoratorNode,
    FromArgs, Node, ParallelNode, Procedure, Registry, SelectorNode, SequenceNode, Step,
};
use serde::Deserialize;

/// Every hook call is recorded in the environment of the tree.
type Trace = Vec<String>;

/// Plays back a fixed list of results, repeating the last one.
struct Script {
    name: &'static str,
    results: Vec<BehaviorResult>,
    played: usize,
}

impl Script {
    fn node(name: &'static str, results: &[BehaviorResult]) -> Node<Trace> {
        Node::new(Script {
            name,
            results: results.to_vec(),
            played: 0,
        })
        .named(name)
    }
}

impl Behavior<Trace> for Script {
    fn on_enter(&mut self, ctx: &mut Context<Trace>) {
        ctx.env_mut().push(format!("{} enter", self.name));
    }

    fn on_exit(&mut self, result: BehaviorResult, env: &mut Trace) {
        env.push(format!("{} exit {:?}", self.name, result));
    }

    fn run(&mut self, _ctx: &mut Context<Trace>) -> Body<Trace> {
        let last = self.results.len() - 1;
        let result = self.results[self.played.min(last)];
        self.played += 1;
        result.into()
    }
}

use BehaviorResult::{Fail, Running, Success};

fn count(trace: &Trace, entry: &str) -> usize {
    trace.iter().filter(|e| *e == entry).count()
}

#[test]
fn active_matches_enter_exit_history() {
    let pattern = [Running, Success, Running, Running, Fail, Success, Running];
    let mut node = Script::node("A", &pattern);
    let mut trace = Trace::new();

    for (i, _) in pattern.iter().enumerate() {
        node.tick(i as f64, 1., &mut trace);
        let enters = count(&trace, "A enter");
        let exits = trace.iter().filter(|e| e.starts_with("A exit")).count();
        assert_eq!(node.is_active(), enters > exits, "after tick {}", i);
        assert!(enters - exits <= 1);
    }

    node.abort(&mut trace);
    assert!(!node.is_active());
}

#[test]
fn sequence_runs_children_in_order() {
    let mut trace = Trace::new();
    let mut seq = Node::new(SequenceNode::new(vec![
        Script::node("A", &[Success]),
        Script::node("B", &[Success]),
        Script::node("C", &[Running, Running, Running, Success]),
    ]));

    let results: Vec<_> = (0..4)
        .map(|i| seq.tick(i as f64, 1., &mut trace))
        .collect();
    assert_eq!(results, vec![Running, Running, Running, Success]);
    for name in ["A", "B"] {
        assert_eq!(count(&trace, &format!("{} enter", name)), 1);
        assert_eq!(count(&trace, &format!("{} exit Success", name)), 1);
    }
}

#[test]
fn sequence_failure_restarts_from_first_child() {
    let mut trace = Trace::new();
    let mut seq = Node::new(SequenceNode::new(vec![
        Script::node("A", &[Success]),
        Script::node("B", &[Fail]),
        Script::node("C", &[Success]),
    ]));

    assert_eq!(seq.tick(0., 1., &mut trace), Fail);
    assert!(!seq.is_active());
    assert_eq!(trace, vec!["A enter", "A exit Success", "B enter", "B exit Fail"]);

    trace.clear();
    seq.tick(1., 1., &mut trace);
    assert_eq!(trace[0], "A enter");
}

#[test]
fn selector_tries_children_in_order() {
    let mut trace = Trace::new();
    let mut sel = Node::new(SelectorNode::new(vec![
        Script::node("A", &[Fail]),
        Script::node("B", &[Success]),
    ]));

    assert_eq!(sel.tick(0., 1., &mut trace), Success);
    assert_eq!(trace, vec!["A enter", "A exit Fail", "B enter", "B exit Success"]);
}

#[test]
fn parallel_abort_exits_running_children() {
    let mut trace = Trace::new();
    let mut par = Node::new(ParallelNode::new(vec![
        Script::node("A", &[Running]),
        Script::node("B", &[Running]),
    ]));

    for i in 0..10 {
        assert_eq!(par.tick(i as f64, 1., &mut trace), Running);
    }
    par.abort(&mut trace);

    assert_eq!(count(&trace, "A exit Fail"), 1);
    assert_eq!(count(&trace, "B exit Fail"), 1);
    assert_eq!(trace.len(), 4);
}

#[test]
fn stale_condition_keeps_node_running() {
    #[derive(Default)]
    struct World {
        enemy_visible: bool,
        chase_ticks: usize,
        exits: Vec<BehaviorResult>,
    }

    struct Chase;

    impl Behavior<World> for Chase {
        fn on_exit(&mut self, result: BehaviorResult, world: &mut World) {
            world.exits.push(result);
        }

        fn condition(&self, ctx: &Context<World>) -> bool {
            ctx.env().enemy_visible
        }

        fn check_interval(&self) -> f64 {
            1.
        }

        fn run(&mut self, ctx: &mut Context<World>) -> Body<World> {
            ctx.env_mut().chase_ticks += 1;
            Running.into()
        }
    }

    let mut world = World {
        enemy_visible: true,
        ..World::default()
    };
    let mut node = Node::new(Chase);
    let dt = 0.25;

    assert_eq!(node.tick(0., dt, &mut world), Running);
    world.enemy_visible = false;

    // Still chasing on the cached answer
    let mut time = dt;
    while time < 1. {
        assert_eq!(node.tick(time, dt, &mut world), Running);
        time += dt;
    }
    assert_eq!(world.chase_ticks, 4);
    assert!(world.exits.is_empty());

    // The interval elapsed and the predicate is evaluated again
    assert_eq!(node.tick(time, dt, &mut world), Fail);
    assert_eq!(world.chase_ticks, 4);
    assert_eq!(world.exits, vec![Fail]);
    assert!(!node.is_active());
}

#[test]
fn skipped_branch_rechecks_condition() {
    struct Door {
        open: bool,
        walked_through: usize,
    }

    let walk_through = Action::new((), |_, ctx: &mut Context<Door>| {
        ctx.env_mut().walked_through += 1;
        Success.into()
    })
    .with_condition(|_, ctx| ctx.env().open)
    .with_check_interval(1.);
    let wait_ten_seconds = Action::new((), |_, ctx: &mut Context<Door>| {
        let result = if 10. <= ctx.time() { Success } else { Running };
        result.into()
    });
    let mut tree = Node::new(SelectorNode::new(vec![
        Node::new(walk_through),
        Node::new(wait_ten_seconds),
    ]));

    let mut door = Door {
        open: false,
        walked_through: 0,
    };
    let dt = 0.1;
    let mut tick = 0;
    while tree.tick(tick as f64 * dt, dt, &mut door) == Running {
        // Opens while the selector is busy with the second branch
        door.open = true;
        tick += 1;
    }
    assert_eq!(door.walked_through, 0);

    // The first branch was last checked ten seconds ago
    tick += 1;
    assert_eq!(tree.tick(tick as f64 * dt, dt, &mut door), Success);
    assert_eq!(door.walked_through, 1);
}

#[test]
fn abort_twice_is_abort_once() {
    let build = || {
        Node::new(SequenceNode::new(vec![
            Script::node("A", &[Success]),
            Node::new(DecoratorNode::inverter(Script::node("B", &[Running]))),
        ]))
    };

    let mut once = build();
    let mut trace_once = Trace::new();
    once.tick(0., 1., &mut trace_once);
    once.abort(&mut trace_once);

    let mut twice = build();
    let mut trace_twice = Trace::new();
    twice.tick(0., 1., &mut trace_twice);
    twice.abort(&mut trace_twice);
    twice.abort(&mut trace_twice);

    assert_eq!(trace_once, trace_twice);
    assert_eq!(count(&trace_twice, "B exit Fail"), 1);
    assert_eq!(once.is_active(), twice.is_active());
    assert_eq!(once.last_result(), twice.last_result());

    // Aborting an idle node
    let mut idle = build();
    let mut trace = Trace::new();
    idle.abort(&mut trace);
    idle.abort(&mut trace);
    assert!(trace.is_empty());
}

fn logged(
    label: &'static str,
    step: Step<Trace>,
) -> impl FnMut(&mut Context<'_, Trace>, Option<BehaviorResult>) -> Step<Trace> {
    let mut step = Some(step);
    move |ctx, _| {
        ctx.env_mut().push(label.to_owned());
        step.take().unwrap_or(Step::Done(Success))
    }
}

fn inner() -> Procedure<Trace> {
    Procedure::new()
        .step(logged("inner-start", Step::Yield))
        .step(logged("inner-complete", Step::Done(Success)))
}

fn middle() -> Procedure<Trace> {
    Procedure::<Trace>::new()
        .step(|ctx, _| {
            ctx.env_mut().push("middle-start".to_owned());
            Step::descend(inner())
        })
        .step(|ctx, nested| {
            assert_eq!(nested, Some(Success));
            ctx.env_mut().push("middle-resume".to_owned());
            ctx.env_mut().push("middle-complete".to_owned());
            Step::Done(Success)
        })
}

fn outer() -> Procedure<Trace> {
    Procedure::<Trace>::new()
        .step(|ctx, _| {
            ctx.env_mut().push("outer-start".to_owned());
            Step::descend(middle())
        })
        .step(|ctx, nested| {
            assert_eq!(nested, Some(Success));
            ctx.env_mut().push("outer-resume".to_owned());
            ctx.env_mut().push("outer-complete".to_owned());
            Step::Done(Success)
        })
}

#[test]
fn nested_generators_resume_depth_first() {
    let mut node = Node::new(Action::new((), |_, _| Body::steps(outer())));
    let mut trace = Trace::new();

    let mut ticks = 0;
    let result = loop {
        ticks += 1;
        match node.tick(ticks as f64, 1., &mut trace) {
            Running => continue,
            result => break result,
        }
    };

    assert_eq!(result, Success);
    assert_eq!(ticks, 4);
    assert_eq!(
        trace,
        vec![
            "outer-start",
            "middle-start",
            "inner-start",
            "inner-complete",
            "middle-resume",
            "middle-complete",
            "outer-resume",
            "outer-complete",
        ]
    );
}

#[test]
fn side_effects_before_a_wait_run_once() {
    let mut node = Node::new(Action::new("rifle", |name, _| {
        let name = *name;
        Body::steps(
            Procedure::<Trace>::new()
                .step(move |ctx, _| {
                    ctx.env_mut().push(format!("reload {}", name));
                    Step::Descend(wait(0.5))
                })
                .step(move |ctx, nested| {
                    assert_eq!(nested, Some(Success));
                    ctx.env_mut().push(format!("fire {}", name));
                    Step::Done(Success)
                }),
        )
    }));

    let mut trace = Trace::new();
    let mut ticks = 1;
    while node.tick(ticks as f64 * 0.2, 0.2, &mut trace) == Running {
        ticks += 1;
    }
    // One tick to start the wait and three to accumulate half a second
    assert_eq!(ticks, 4);
    assert_eq!(trace, vec!["reload rifle", "fire rifle"]);
}

#[derive(Deserialize)]
struct PatrolArgs {
    waypoints: usize,
}

struct Patrol {
    args: PatrolArgs,
    reached: usize,
}

impl FromArgs for Patrol {
    type Args = PatrolArgs;

    fn from_args(args: PatrolArgs) -> Self {
        Self { args, reached: 0 }
    }
}

impl Behavior<Trace> for Patrol {
    fn on_enter(&mut self, _ctx: &mut Context<Trace>) {
        self.reached = 0;
    }

    fn run(&mut self, ctx: &mut Context<Trace>) -> Body<Trace> {
        self.reached += 1;
        ctx.env_mut().push(format!("waypoint {}", self.reached));
        let result = if self.reached < self.args.waypoints {
            Running
        } else {
            Success
        };
        result.into()
    }
}

#[test]
fn tree_from_text() {
    struct Alert;

    impl Behavior<Trace> for Alert {
        fn run(&mut self, ctx: &mut Context<Trace>) -> Body<Trace> {
            ctx.env_mut().push("alert".to_owned());
            Fail.into()
        }
    }

    let mut registry = Registry::<Trace>::default();
    registry.register("Alert", boxify(|| Alert));
    registry.register_from_args::<Patrol>("Patrol");

    let source = r#"
tree main = Selector {
    Alert
    rounds
}

tree rounds = Sequence {
    Patrol (waypoints = 2)
    ForceSuccess { Alert }
}
"#;
    let mut tree = load_str(source, &registry).unwrap();
    let mut trace = Trace::new();
    assert_eq!(tree.tick(0., 1., &mut trace), Running);
    assert_eq!(tree.tick(1., 1., &mut trace), Success);
    assert_eq!(trace, vec!["alert", "waypoint 1", "waypoint 2", "alert"]);
}

#[test]
fn action_condition_sees_payload() {
    let mut node = Node::new(
        Action::new(10, |_: &i32, _: &mut Context<i32>| Running.into())
            .with_condition(|limit, ctx| *ctx.env() < *limit),
    );

    let mut fuel = 8;
    assert_eq!(node.tick(0., 1., &mut fuel), Running);
    fuel = 12;
    assert_eq!(node.tick(1., 1., &mut fuel), Fail);
    assert!(!node.is_active());
}
