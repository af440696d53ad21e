/// Event rainfall handling: hyetograph construction, the initial-loss /
/// continuing-loss abstraction, and the excess-depth to runoff-rate
/// conversion.
pub mod hyetograph;
pub mod losses;
pub mod runoff;
