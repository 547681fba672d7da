use desim::core::distributions::{Constant, ExponentialSampler, Sampler};
use desim::core::replication::run_replications;
use desim::core::trace::Transition;
use desim::{
    ComponentId, ComponentState, Environment, Process, RequestOutcome, ResourceId, SimError,
};

/// Minimal client process used across the public-API tests: claim the
/// server, hold for a sampled service time, release, finish.
enum Phase {
    Arrive,
    Service,
    Leave,
}

struct Client {
    phase: Phase,
    server: ResourceId,
    service: Box<dyn Sampler>,
}

impl Client {
    fn new(server: ResourceId, service: Box<dyn Sampler>) -> Self {
        Self {
            phase: Phase::Arrive,
            server,
            service,
        }
    }
}

impl Process for Client {
    fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError> {
        loop {
            match self.phase {
                Phase::Arrive => {
                    self.phase = Phase::Service;
                    if env.request_one(me, self.server)? == RequestOutcome::Queued {
                        return Ok(());
                    }
                }
                Phase::Service => {
                    self.phase = Phase::Leave;
                    let duration = env.sample(self.service.as_mut());
                    env.hold(me, duration)?;
                    return Ok(());
                }
                Phase::Leave => {
                    env.release(me, self.server)?;
                    return Ok(());
                }
            }
        }
    }
}

#[test]
fn test_end_to_end_single_server_run() {
    let mut env = Environment::new(0);
    let server = env.add_resource("server", 1);

    for index in 0..5 {
        env.spawn_at(
            format!("client.{}", index),
            Box::new(Client::new(server, Box::new(Constant(4.0)))),
            index as f64,
        )
        .unwrap();
    }

    env.run(100.0).unwrap();
    let now = env.now();

    // Five back-to-back services of 4 time units each
    let resource = env.resource(server);
    assert_eq!(resource.claimed(), 0);
    assert_eq!(resource.claimers().length_of_stay().count(), 5);
    assert!((resource.claimers().length_of_stay().mean() - 4.0).abs() < 1e-12);

    // Inspection surface: monitors expose finite means and full series
    assert!(resource.occupancy().mean(now).is_finite());
    assert!(resource.requesters().length().mean(now).is_finite());
    assert!(!resource.occupancy().samples().is_empty());

    // The trace saw every client finish
    let terminations = env
        .trace()
        .records()
        .iter()
        .filter(|r| r.transition == Transition::Terminate)
        .count();
    assert_eq!(terminations, 5);
}

#[test]
fn test_step_interleaves_with_assertions() {
    let mut env = Environment::new(0);
    let server = env.add_resource("server", 1);
    let first = env
        .spawn("first", Box::new(Client::new(server, Box::new(Constant(10.0)))))
        .unwrap();
    let second = env
        .spawn("second", Box::new(Client::new(server, Box::new(Constant(10.0)))))
        .unwrap();

    env.step().unwrap();
    assert!(env.resource(server).is_claiming(first));

    env.step().unwrap();
    assert_eq!(env.state(second), Ok(ComponentState::Waiting));
    assert_eq!(env.resource(server).length(), 1);

    // first finishes at t=10; second is promoted in the same instant
    let time = env.step().unwrap();
    assert_eq!(time, 10.0);
    assert!(env.resource(server).is_claiming(second));
}

#[test]
fn test_misuse_error_surfaces_without_poisoning_the_run() {
    struct DoubleReleaser {
        server: ResourceId,
    }

    impl Process for DoubleReleaser {
        fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError> {
            env.request_one(me, self.server)?;
            env.release(me, self.server)?;
            env.release(me, self.server)?; // propagates NotClaiming
            Ok(())
        }
    }

    let mut env = Environment::new(0);
    let server = env.add_resource("server", 1);
    env.spawn("rogue", Box::new(DoubleReleaser { server }))
        .unwrap();
    let survivor = env
        .spawn_at(
            "survivor",
            Box::new(Client::new(server, Box::new(Constant(2.0)))),
            1.0,
        )
        .unwrap();

    assert!(matches!(
        env.step(),
        Err(SimError::NotClaiming { .. })
    ));

    env.run(50.0).unwrap();
    assert_eq!(env.state(survivor), Ok(ComponentState::Terminated));
    assert_eq!(env.resource(server).claimed(), 0);
}

#[test]
fn test_parallel_replications_expose_seed_and_output() {
    let seeds = [10, 20, 30];
    let results = run_replications(&seeds, |env| {
        let server = env.add_resource("server", 1);
        for index in 0..3 {
            env.spawn_at(
                format!("client.{}", index),
                Box::new(Client::new(
                    server,
                    Box::new(ExponentialSampler::new(5.0)),
                )),
                index as f64,
            )
            .unwrap();
        }
        env.run(500.0).unwrap();
        env.resource(server).claimers().length_of_stay().mean()
    });

    assert_eq!(results.len(), 3);
    for (result, &seed) in results.iter().zip(seeds.iter()) {
        assert_eq!(result.seed, seed);
        assert!(result.output.is_finite());
        assert!(result.output > 0.0);
    }
}
