#[cfg(test)]
mod tests {
    use crate::core::component::Process;
    use crate::core::distributions::ExponentialSampler;
    use crate::core::environment::Environment;
    use crate::core::error::SimError;
    use crate::core::replication::run_replications;
    use crate::core::types::{ComponentId, QueueId, RequestOutcome, ResourceId};

    /// Poisson source: spawns one client per resume, then holds for an
    /// exponential interarrival time
    struct Source {
        server: ResourceId,
        system: QueueId,
        interarrival: ExponentialSampler,
        service_mean: f64,
        spawned: usize,
    }

    impl Process for Source {
        fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError> {
            let index = self.spawned;
            self.spawned += 1;
            env.spawn(
                format!("client.{}", index),
                Box::new(Client {
                    phase: ClientPhase::Arrive,
                    server: self.server,
                    system: self.system,
                    service: ExponentialSampler::new(self.service_mean),
                }),
            )?;
            let gap = env.sample(&mut self.interarrival);
            env.hold(me, gap)
        }
    }

    enum ClientPhase {
        Arrive,
        Service,
        Leave,
    }

    /// Enter the system queue, claim the server, stay in service for an
    /// exponential time, then leave
    struct Client {
        phase: ClientPhase,
        server: ResourceId,
        system: QueueId,
        service: ExponentialSampler,
    }

    impl Process for Client {
        fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError> {
            loop {
                match self.phase {
                    ClientPhase::Arrive => {
                        self.phase = ClientPhase::Service;
                        env.queue_add(self.system, me);
                        if env.request_one(me, self.server)? == RequestOutcome::Queued {
                            return Ok(());
                        }
                    }
                    ClientPhase::Service => {
                        self.phase = ClientPhase::Leave;
                        let duration = env.sample(&mut self.service);
                        env.hold(me, duration)?;
                        return Ok(());
                    }
                    ClientPhase::Leave => {
                        env.release(me, self.server)?;
                        env.queue_remove(self.system, me);
                        return Ok(());
                    }
                }
            }
        }
    }

    struct Model {
        server: ResourceId,
        system: QueueId,
    }

    fn build_mm1(env: &mut Environment, interarrival_mean: f64, service_mean: f64) -> Model {
        let server = env.add_resource("server", 1);
        let system = env.add_queue("system");
        env.spawn(
            "source",
            Box::new(Source {
                server,
                system,
                interarrival: ExponentialSampler::new(interarrival_mean),
                service_mean,
                spawned: 0,
            }),
        )
        .expect("spawn at time zero cannot fail");
        Model { server, system }
    }

    /// Little's law, L = lambda * W, with the arrival rate measured from the
    /// run itself. Long horizon, rho = 0.5.
    #[test]
    fn test_littles_law_holds_on_long_run() {
        let mut env = Environment::new(42);
        env.set_tracing(false);
        let model = build_mm1(&mut env, 10.0, 5.0);

        env.run(100_000.0).unwrap();

        let now = env.now();
        let system = env.queue(model.system);
        let l = system.length().mean(now);
        let w = system.length_of_stay().mean();
        let completed = system.length_of_stay().count();
        assert!(completed > 5_000, "run too short: {} completions", completed);

        let lambda = completed as f64 / now;
        let relative_gap = (l - lambda * w).abs() / l;
        assert!(
            relative_gap < 0.05,
            "Little's law off by {:.1}%: L={:.3}, lambda*W={:.3}",
            relative_gap * 100.0,
            l,
            lambda * w
        );
    }

    /// Steady-state statistics land near the analytic M/M/1 values
    #[test]
    fn test_mm1_statistics_near_analytic_values() {
        let interarrival_mean = 10.0;
        let service_mean = 5.0;
        let lambda = 1.0 / interarrival_mean;
        let mu = 1.0 / service_mean;
        let rho = lambda / mu;

        let mut env = Environment::new(7);
        env.set_tracing(false);
        let model = build_mm1(&mut env, interarrival_mean, service_mean);

        env.run(200_000.0).unwrap();
        let now = env.now();

        let occupancy = env.resource(model.server).occupancy().mean(now);
        assert!(
            (occupancy - rho).abs() / rho < 0.10,
            "occupancy {:.3} too far from rho {:.3}",
            occupancy,
            rho
        );

        let wq = env
            .resource(model.server)
            .requesters()
            .length_of_stay()
            .mean();
        let wq_analytic = rho / (mu - lambda);
        assert!(
            (wq - wq_analytic).abs() / wq_analytic < 0.15,
            "Wq {:.3} too far from analytic {:.3}",
            wq,
            wq_analytic
        );

        let lq = env
            .resource(model.server)
            .requesters()
            .length()
            .mean(now);
        let lq_analytic = rho * rho / (1.0 - rho);
        assert!(
            (lq - lq_analytic).abs() / lq_analytic < 0.15,
            "Lq {:.3} too far from analytic {:.3}",
            lq,
            lq_analytic
        );

        // Output contract: all retrievable means are finite
        for value in [occupancy, wq, lq] {
            assert!(value.is_finite());
        }
    }

    /// Same seed, same model: identical monitor series, sample for sample
    #[test]
    fn test_mm1_runs_are_reproducible() {
        let run_once = |seed: u64| {
            let mut env = Environment::new(seed);
            let model = build_mm1(&mut env, 10.0, 5.0);
            env.run(5_000.0).unwrap();
            env.queue(model.system).length().samples().to_vec()
        };

        assert_eq!(run_once(3), run_once(3));
    }

    /// Replication batches produce one independent finite estimate per seed
    #[test]
    fn test_mm1_replication_batch() {
        let seeds: Vec<u64> = (0..4).collect();
        let results = run_replications(&seeds, |env| {
            env.set_tracing(false);
            let model = build_mm1(env, 10.0, 5.0);
            env.run(20_000.0).unwrap();
            env.queue(model.system).length().mean(env.now())
        });

        assert_eq!(results.len(), seeds.len());
        for result in &results {
            assert!(result.output.is_finite());
            assert!(result.output > 0.0);
        }

        // Different seeds, different estimates
        assert_ne!(results[0].output, results[1].output);
    }

    /// Warm-up exclusion: statistics restart cleanly mid-run
    #[test]
    fn test_mm1_warmup_exclusion() {
        let mut env = Environment::new(11);
        env.set_tracing(false);
        let model = build_mm1(&mut env, 10.0, 5.0);

        env.run(1_000.0).unwrap();
        env.reset_monitors();
        let warmup_end = env.now();
        env.run(50_000.0).unwrap();

        let system = env.queue(model.system);
        assert!(system
            .length()
            .samples()
            .iter()
            .all(|&(time, _)| time >= warmup_end));
        assert!(system.length().mean(env.now()).is_finite());
    }
}
