//! Shared fixtures.

use std::time::Duration;

use wikigraph::BuildConfig;
use wikigraph_fetch::ScriptedApi;

/// Config over `seeds` with rate limiting switched off and a page size
/// small enough that the scripted batches are all followed.
pub fn fast_config(seeds: &[&str]) -> BuildConfig {
    BuildConfig::new()
        .seeds(seeds.iter().copied())
        .page_size(2)
        .delays(Duration::ZERO, Duration::ZERO)
}

/// A small topic neighborhood:
///
/// ```text
/// Physics     -> Energy, Mathematics, Matter
/// Mathematics -> Logic, Physics
/// Logic       -> (missing)
/// ```
pub fn science_api() -> ScriptedApi {
    ScriptedApi::new()
        .batches("Physics", &[&["Energy", "Mathematics"], &["Matter"]])
        .page("Mathematics", &["Logic", "Physics"])
        .missing("Logic")
}
