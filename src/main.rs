use clap::Parser;

use queue_planner::config::{load_run_config, QueuePolicyKind};
use queue_planner::logger;
use queue_planner::planner_from_config;
use queue_planner::queue_policy::{BackfillHybridQueuePolicy, FcfsQueuePolicy, QueuePolicy};
use queue_planner::service::Broker;

/// Drives a reservation planner and queue policy from a JSON run-config
/// file, submitting a fixed demo workload and printing the resulting
/// schedule. Intended for manual inspection, not as a production service
/// entry point (there is no message bus wired up — see `service::Broker`'s
/// doc comment).
#[derive(Parser, Debug)]
#[command(name = "queue_planner", about = "Reservation planner demo runner")]
struct Cli {
    /// Path to a JSON run-config file (see `config::RunConfig`).
    #[arg(long)]
    config: String,
}

fn run<P: QueuePolicy>(mut broker: Broker<P>, mut planner: queue_planner::planner::Planner) {
    for pass in 0..4 {
        let admitted = broker.run_sched_loop(&mut planner);
        log::info!("pass {pass}: admitted jobs {:?}", admitted);
    }
    log::info!("final span count: {}", planner.span_count());
}

fn main() {
    logger::init();
    log::info!("Logger initialized. Starting queue_planner.");

    let cli = Cli::parse();

    let config = match load_run_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            log::error!("failed to load run config '{}': {}", cli.config, e);
            std::process::exit(1);
        }
    };

    let planner = match planner_from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            log::error!("failed to construct planner: {}", e);
            std::process::exit(1);
        }
    };

    let mut broker_fcfs;
    let mut broker_bf;

    match config.queue_policy {
        QueuePolicyKind::Fcfs => {
            broker_fcfs = Broker::new(FcfsQueuePolicy::new());
            broker_fcfs.submit(planner.base_time(), 4, 1);
            broker_fcfs.submit(planner.base_time() + 4, 4, 1);
            run(broker_fcfs, planner);
        }
        QueuePolicyKind::BackfillHybrid => {
            let policy = match config.reservation_depth {
                Some(depth) => BackfillHybridQueuePolicy::with_reservation_depth(depth),
                None => BackfillHybridQueuePolicy::new(),
            };
            broker_bf = Broker::new(policy);
            broker_bf.submit(planner.base_time(), 4, 1);
            broker_bf.submit(planner.base_time() + 4, 4, 1);
            run(broker_bf, planner);
        }
    }
}
