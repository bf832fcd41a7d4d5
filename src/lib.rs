// Shared code for the two admin programs in `src/bin/`.
//
// **Architecture Overview:**
// - `core/` = Business logic (moderation runs, extension packaging) and the traits it needs
// - `infra/` = Implementations of core traits (the moderation HTTP API)
//
// The binaries only load configuration, wire services together and turn
// results into exit codes.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a pile of mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;
