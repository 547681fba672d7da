use desim::core::distributions::ExponentialSampler;
use desim::core::replication::run_replications;
use desim::{ComponentId, Environment, Process, QueueId, RequestOutcome, ResourceId, SimError};

/// M/M/1 queue: Poisson arrivals into a capacity-1 server, exponential
/// service. Prints the simulated steady-state statistics next to the
/// analytic formulas, then runs a replication batch across seeds.

struct Mm1Config {
    interarrival_mean: f64,
    service_mean: f64,
    horizon: f64,
    seed: u64,
    batch_seeds: u64,
}

impl Default for Mm1Config {
    fn default() -> Self {
        Self {
            interarrival_mean: 10.0,
            service_mean: 5.0,
            horizon: 100_000.0,
            seed: 42,
            batch_seeds: 10,
        }
    }
}

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

fn build_model(env: &mut Environment, config: &Mm1Config) -> Result<Model, SimError> {
    let server = env.add_resource("server", 1);
    let system = env.add_queue("system");
    env.spawn(
        "source",
        Box::new(Source {
            server,
            system,
            interarrival: ExponentialSampler::new(config.interarrival_mean),
            service_mean: config.service_mean,
            spawned: 0,
        }),
    )?;
    Ok(Model { server, system })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let config = Mm1Config::default();
    let lambda = 1.0 / config.interarrival_mean;
    let mu = 1.0 / config.service_mean;
    let rho = lambda / mu;

    println!("M/M/1 queue simulation");
    println!("  interarrival mean: {}", config.interarrival_mean);
    println!("  service mean:      {}", config.service_mean);
    println!("  utilization rho:   {:.3}", rho);
    println!("  horizon:           {}", config.horizon);
    println!();

    let mut env = Environment::new(config.seed);
    env.set_tracing(false);
    let model = build_model(&mut env, &config)?;
    env.run(config.horizon)?;
    let now = env.now();

    let system = env.queue(model.system);
    let server = env.resource(model.server);
    let l = system.length().mean(now);
    let w = system.length_of_stay().mean();
    let lq = server.requesters().length().mean(now);
    let wq = server.requesters().length_of_stay().mean();
    let occupancy = server.occupancy().mean(now);

    println!("single run (seed {}):", config.seed);
    println!("  L  (number in system):   {:8.3}  analytic {:8.3}", l, rho / (1.0 - rho));
    println!("  W  (time in system):     {:8.3}  analytic {:8.3}", w, 1.0 / (mu - lambda));
    println!("  Lq (number in queue):    {:8.3}  analytic {:8.3}", lq, rho * rho / (1.0 - rho));
    println!("  Wq (waiting time):       {:8.3}  analytic {:8.3}", wq, rho / (mu - lambda));
    println!("  occupancy:               {:8.3}  analytic {:8.3}", occupancy, rho);
    println!("  completed stays:         {:8}", system.length_of_stay().count());
    println!();

    // Replication batch: one isolated environment per seed, in parallel
    let seeds: Vec<u64> = (0..config.batch_seeds).collect();
    let results = run_replications(&seeds, |env| {
        env.set_tracing(false);
        let model = build_model(env, &Mm1Config::default()).expect("spawn at time zero");
        env.run(Mm1Config::default().horizon).expect("model code reports no errors");
        env.queue(model.system).length().mean(env.now())
    });

    let batch_mean: f64 =
        results.iter().map(|r| r.output).sum::<f64>() / results.len() as f64;
    println!("replication batch ({} seeds):", results.len());
    for result in &results {
        println!("  seed {:2}  L = {:6.3}  run {}", result.seed, result.output, result.run_id);
    }
    println!("  batch mean L = {:.3}  analytic {:.3}", batch_mean, rho / (1.0 - rho));

    Ok(())
}
