use desim::core::distributions::UniformSampler;
use desim::{ComponentId, Environment, Process, QueueId, SimError};

/// Bank teller model: customers arrive with uniform(5, 15) interarrival
/// times and join a waiting line. A single clerk serves each customer for
/// 30 time units; when the line drains the clerk passivates, and the next
/// arriving customer wakes it up again.

const SERVICE_TIME: f64 = 30.0;

struct CustomerGenerator {
    waitingline: QueueId,
    clerk: ComponentId,
    interarrival: UniformSampler,
    spawned: usize,
}

impl Process for CustomerGenerator {
    fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError> {
        let index = self.spawned;
        self.spawned += 1;
        env.spawn(
            format!("customer.{}", index),
            Box::new(Customer {
                waitingline: self.waitingline,
                clerk: self.clerk,
                served: false,
            }),
        )?;
        let gap = env.sample(&mut self.interarrival);
        env.hold(me, gap)
    }
}

struct Customer {
    waitingline: QueueId,
    clerk: ComponentId,
    served: bool,
}

impl Process for Customer {
    fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError> {
        if self.served {
            // Woken by the clerk after service: done
            return Ok(());
        }
        self.served = true;
        env.queue_add(self.waitingline, me);
        if env.is_passive(self.clerk) {
            env.activate(self.clerk, None)?;
        }
        env.passivate(me)
    }
}

struct Clerk {
    waitingline: QueueId,
    serving: Option<ComponentId>,
}

impl Process for Clerk {
    fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError> {
        if let Some(customer) = self.serving.take() {
            env.activate(customer, None)?;
        }
        match env.queue_pop(self.waitingline) {
            None => env.passivate(me),
            Some(customer) => {
                self.serving = Some(customer);
                env.hold(me, SERVICE_TIME)
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let seed = 42;
    let horizon = 5_000.0;

    let mut env = Environment::new(seed);
    let waitingline = env.add_queue("waitingline");
    let clerk = env.spawn(
        "clerk",
        Box::new(Clerk {
            waitingline,
            serving: None,
        }),
    )?;
    env.spawn(
        "generator",
        Box::new(CustomerGenerator {
            waitingline,
            clerk,
            interarrival: UniformSampler::new(5.0, 15.0),
            spawned: 0,
        }),
    )?;

    env.run(horizon)?;
    let now = env.now();

    let line = env.queue(waitingline);
    println!("bank teller simulation (seed {}, horizon {})", seed, horizon);
    println!("  customers served:        {}", line.length_of_stay().count());
    println!("  still waiting:           {}", line.len());
    println!("  mean queue length:       {:.3}", line.length().mean(now));
    println!("  mean waiting time:       {:.3}", line.length_of_stay().mean());
    println!(
        "  longest recorded wait:   {:.3}",
        line.length_of_stay()
            .samples()
            .iter()
            .map(|&(_, stay)| stay)
            .fold(0.0, f64::max)
    );

    Ok(())
}
