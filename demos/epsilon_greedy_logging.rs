//! Epsilon-greedy decisions with a text log, ready for batch upload.
//!
//! Run with `RUST_LOG=trace cargo run --example epsilon_greedy_logging` to see
//! per-decision trace lines from the library.

use mwt::{ActionCount, ActionIndex, Context, Explorer, MwtExplorer, StringRecorder};
use std::fmt;

struct Visitor {
    id: u32,
    hour: u32,
}

impl Context for Visitor {}

impl fmt::Display for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visitor={} hour={}", self.id, self.hour)
    }
}

fn main() {
    env_logger::init();

    // Morning visitors get article 1, everyone else article 3.
    let baseline = |v: &Visitor| -> ActionIndex { if v.hour < 12 { 1 } else { 3 } };
    let explorer = match Explorer::<Visitor>::epsilon_greedy(0.2, ActionCount::Fixed(4), baseline) {
        Ok(ex) => ex,
        Err(e) => {
            eprintln!("bad explorer config: {e}");
            std::process::exit(2);
        }
    };

    let recorder = StringRecorder::new();
    let mwt = MwtExplorer::new("news-frontpage", &recorder);

    for id in 0..12u32 {
        let visitor = Visitor { id, hour: (id * 5) % 24 };
        let key = format!("visit-{id}");
        match mwt.choose_action(&explorer, &key, &visitor) {
            Ok(article) => log::info!("{key}: showing article {article}"),
            Err(e) => log::warn!("{key}: no decision ({e})"),
        }
    }

    print!("{}", recorder.take());
}
