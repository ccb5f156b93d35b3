//! Arc command: stream a profile's ARC player bests.

use std::io::{self, Write};

use anyhow::Result;
use tachi_import::import::parse_arc_iidx;
use tachi_import::{Settings, UreqFetch};
use tracing::info;

pub fn run(profile: &str, base_url: Option<&str>, limit: Option<usize>, settings: &Settings) -> Result<()> {
    let fetch = UreqFetch::new(settings.timeout());
    let base_url = base_url.unwrap_or(settings.arc_base_url.as_str());

    let parsed = parse_arc_iidx(profile, &fetch, base_url);
    let mut stdout = io::stdout().lock();
    let mut count = 0;

    for item in parsed.iterable.take(limit.unwrap_or(usize::MAX)) {
        writeln!(stdout, "{}", serde_json::to_string(&item?)?)?;
        count += 1;
    }

    info!(profile, items = count, "ARC import finished");
    Ok(())
}
