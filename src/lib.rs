use shadow_rs::shadow;

shadow!(build);

// Costs
// -----
pub mod cost;
pub mod float_cost;

// Search space and problems
// -------------------------
pub mod problems;
pub mod space;

// Internals
// ---------
pub mod frontier;

// Algorithms
// ----------
pub mod algorithms;
