//! Log ranked decisions, then replay them offline.
//!
//! Replay re-derives every ranking from `(app_id, key)` and the logged
//! context, confirming the log is reproducible, and then computes an
//! inverse-propensity estimate of a different top-slot policy's reward.

use mwt::{ActionCount, ActionIndex, Context, Explorer, MwtExplorer, VecRecorder};

#[derive(Debug, Clone, PartialEq)]
struct Query {
    id: u32,
    candidates: u32,
}

impl Context for Query {
    fn action_count(&self) -> Option<u32> {
        Some(self.candidates)
    }
}

fn relevance(q: &Query) -> Vec<f32> {
    (1..=q.candidates)
        .map(|c| 1.0 / (c as f32 + (q.id % 3) as f32))
        .collect()
}

// Simulated click: the user likes the candidate matching `id % candidates`.
fn clicked(q: &Query, top: ActionIndex) -> f64 {
    if top == q.id % q.candidates + 1 {
        1.0
    } else {
        0.0
    }
}

fn main() {
    env_logger::init();

    const APP: &str = "search-ranker";
    let explorer = match Explorer::<Query>::ranked(ActionCount::Variable, relevance) {
        Ok(ex) => ex,
        Err(e) => {
            eprintln!("bad explorer config: {e}");
            std::process::exit(2);
        }
    };

    let log: VecRecorder<Query> = VecRecorder::new();
    let mwt = MwtExplorer::new(APP, &log);
    for id in 0..500u32 {
        let q = Query {
            id,
            candidates: 3 + id % 4,
        };
        if let Err(e) = mwt.choose_ranking(&explorer, &format!("q{id}"), &q) {
            eprintln!("q{id}: {e}");
        }
    }

    // Offline: a fresh orchestrator with a throwaway recorder replays the log.
    let sink = mwt::NoopRecorder;
    let replay = MwtExplorer::new(APP, &sink);
    let mut mismatches = 0;
    let mut ips = 0.0f64;
    let interactions = log.interactions();
    for it in &interactions {
        match replay.choose_ranking(&explorer, &it.key, &it.context) {
            Ok(ranking) if ranking == it.actions => {}
            _ => mismatches += 1,
        }
        // Target policy: always put candidate 1 on top.
        let top = it.actions[0];
        if top == 1 {
            ips += clicked(&it.context, top) / it.probability as f64;
        }
    }

    println!(
        "replayed {} rankings, {} mismatches",
        interactions.len(),
        mismatches
    );
    println!(
        "IPS estimate of click rate for 'always candidate 1': {:.4}",
        ips / interactions.len() as f64
    );
}
